//! Stable event names attached to structured `tracing` records.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GameEvent {
    SessionStoreInitialized,
    SessionTurnsLoaded,
    SessionTurnsAppended,
    SessionTurnsCleared,
    SessionTurnsReplaced,
    SessionUserIssued,
    RoundSelected,
    RoundRejected,
    CompletionRequested,
    CompletionFailed,
    ScenarioParseFailed,
    ScenarioIdsBackfilled,
    ScenarioDelivered,
    StoryConcluded,
}

impl GameEvent {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::SessionStoreInitialized => "session.store.initialized",
            Self::SessionTurnsLoaded => "session.turns.loaded",
            Self::SessionTurnsAppended => "session.turns.appended",
            Self::SessionTurnsCleared => "session.turns.cleared",
            Self::SessionTurnsReplaced => "session.turns.replaced",
            Self::SessionUserIssued => "session.user.issued",
            Self::RoundSelected => "game.round.selected",
            Self::RoundRejected => "game.round.rejected",
            Self::CompletionRequested => "game.completion.requested",
            Self::CompletionFailed => "game.completion.failed",
            Self::ScenarioParseFailed => "game.scenario.parse_failed",
            Self::ScenarioIdsBackfilled => "game.scenario.ids_backfilled",
            Self::ScenarioDelivered => "game.scenario.delivered",
            Self::StoryConcluded => "game.story.concluded",
        }
    }
}
