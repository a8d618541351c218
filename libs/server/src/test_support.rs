use async_trait::async_trait;
use deepculture_ai::{ChatResult, CompletionError, CompletionProvider};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// Completion provider that replays canned replies in order and records prompts.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<ChatResult>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<ChatResult>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    pub fn calls(&self) -> usize {
        lock(&self.prompts).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    fn provider_id(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> ChatResult {
        lock(&self.prompts).push(prompt.to_string());
        lock(&self.replies).pop_front().unwrap_or_else(|| {
            Err(CompletionError::Transport(
                "no scripted reply left".to_string(),
            ))
        })
    }
}
