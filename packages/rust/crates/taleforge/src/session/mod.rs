//! Session namespace: turn types, conversation store, per-user gate, identity.

mod gate;
mod identity;
mod message;
mod store;

pub use gate::{SessionGate, SessionGuard};
pub use identity::{
    CookieUserIdResolver, DEFAULT_SESSION_COOKIE_NAME, ResolvedUser, UserIdResolver,
};
pub use message::{Role, Turn, count_assistant_turns};
pub use store::{ConversationStore, InMemoryConversationStore};
