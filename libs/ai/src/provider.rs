//! Completion provider seam

use crate::error::ChatResult;
use async_trait::async_trait;

/// Anything that can turn a prompt into a completion.
///
/// Implementations never panic: every failure is reported through the `Err`
/// side of [`ChatResult`].
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name used in logs
    fn provider_id(&self) -> &str;

    /// Send `prompt` as a single user message and return the cleaned reply
    async fn complete(&self, prompt: &str) -> ChatResult;
}

