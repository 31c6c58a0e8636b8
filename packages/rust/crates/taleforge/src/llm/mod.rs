//! Completion collaborator: transcript in, assistant text out.

mod client;
mod mock;

use async_trait::async_trait;

use crate::error::CompletionError;
use crate::session::Turn;

pub use client::LlmClient;
pub use mock::MockCompletionClient;

#[async_trait]
pub trait CompletionClient: Send + Sync {
    fn name(&self) -> &'static str;

    /// Checked before any work; `Err` carries the message returned to the caller.
    fn ensure_configured(&self) -> Result<(), String> {
        Ok(())
    }

    async fn complete(&self, turns: &[Turn]) -> Result<String, CompletionError>;
}
