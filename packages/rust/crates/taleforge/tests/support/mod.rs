#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use taleforge::{
    CompletionClient, CompletionError, ConversationStore, GameConfig, InMemoryConversationStore,
    ScenarioExchange, Turn,
};

/// Completion fake: replies are popped in order, every transcript is recorded.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<Vec<Turn>>>,
    missing_key: bool,
    delay_ms: u64,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            missing_key: true,
            ..Self::default()
        }
    }

    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn push(&self, reply: Result<String, CompletionError>) {
        self.replies.lock().expect("replies lock").push_back(reply);
    }

    pub fn calls(&self) -> Vec<Vec<Turn>> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn last_instruction(&self) -> String {
        self.calls()
            .last()
            .and_then(|turns| turns.last())
            .map(|turn| turn.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn ensure_configured(&self) -> Result<(), String> {
        if self.missing_key {
            return Err(taleforge::MISSING_API_KEY_MESSAGE.to_string());
        }
        Ok(())
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(turns.to_vec());
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or(Err(CompletionError::EmptyReply))
    }
}

pub fn scenario_json(desc: &str, options: &[(&str, &str)]) -> String {
    let options: Vec<serde_json::Value> = options
        .iter()
        .map(|(id, label)| serde_json::json!({"id": id, "label": label}))
        .collect();
    serde_json::json!({"desc": desc, "options": options}).to_string()
}

pub fn three_options(desc: &str) -> String {
    scenario_json(
        desc,
        &[
            ("option1", "Follow the whisper"),
            ("option2", "Light a torch"),
            ("option3", "Leave the cave"),
        ],
    )
}

pub fn config_with_rounds(max_rounds: usize) -> GameConfig {
    GameConfig {
        max_rounds,
        api_key: Some("sk-test".to_string()),
        ..GameConfig::default()
    }
}

pub fn exchange_with(
    max_rounds: usize,
    completion: Arc<ScriptedCompletion>,
) -> (ScenarioExchange, Arc<InMemoryConversationStore>) {
    let store = Arc::new(InMemoryConversationStore::new());
    let exchange = ScenarioExchange::new(config_with_rounds(max_rounds), store.clone(), completion);
    (exchange, store)
}

/// In-memory store whose writes can be made to fail or stall before they land.
#[derive(Default)]
pub struct UnreliableStore {
    inner: InMemoryConversationStore,
    fail_writes: AtomicBool,
    write_delay_ms: AtomicU64,
    appends: AtomicUsize,
}

impl UnreliableStore {
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn delay_writes_ms(&self, delay_ms: u64) {
        self.write_delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    pub fn appends(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    async fn before_write(&self) -> anyhow::Result<()> {
        let delay_ms = self.write_delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for UnreliableStore {
    async fn get(&self, user_id: &str) -> anyhow::Result<Vec<Turn>> {
        self.inner.get(user_id).await
    }

    async fn append(&self, user_id: &str, turns: Vec<Turn>) -> anyhow::Result<()> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        self.before_write().await?;
        self.inner.append(user_id, turns).await
    }

    async fn clear(&self, user_id: &str) -> anyhow::Result<()> {
        self.before_write().await?;
        self.inner.clear(user_id).await
    }

    async fn replace(&self, user_id: &str, turns: Vec<Turn>) -> anyhow::Result<()> {
        self.before_write().await?;
        self.inner.replace(user_id, turns).await
    }

    async fn session_count(&self) -> anyhow::Result<usize> {
        self.inner.session_count().await
    }

    fn backend_name(&self) -> &'static str {
        "unreliable"
    }
}

pub fn exchange_with_store(
    max_rounds: usize,
    completion: Arc<ScriptedCompletion>,
    store: Arc<UnreliableStore>,
) -> ScenarioExchange {
    ScenarioExchange::new(config_with_rounds(max_rounds), store, completion)
}
