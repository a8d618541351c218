use crate::{config::AppConfig, dispatcher::Dispatcher, session_log::SessionLogger};
use deepculture_ai::{ChatCompletionClient, CompletionError, CompletionProvider};
use std::{sync::Arc, time::Instant};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            started_at: Instant::now(),
        }
    }

    /// Wire the real chat-completion client and the file logger from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, CompletionError> {
        let completion: Arc<dyn CompletionProvider> =
            Arc::new(ChatCompletionClient::new(config.completion_config())?);
        let logger = SessionLogger::new(config.log_dir.clone());
        Ok(Self::new(Dispatcher::new(completion, logger)))
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
