//! Paced, single-flight execution of an analysis list.
//!
//! Each step announces the pending item, waits [`ANALYSIS_DELAY`], then awaits
//! exactly one `analyze_subject` round trip before moving on. A failed step is
//! reported and skipped; the run always reaches the end of the list.

use crate::client::{ClientError, DeepCultureClient};
use crate::types::{AnalysisEntry, AnalysisReply};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const ANALYSIS_DELAY: Duration = Duration::from_millis(3000);

#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn analyze_subject(
        &self,
        subject: &str,
        analysis_type: &str,
        index: u64,
    ) -> Result<AnalysisReply, ClientError>;
}

#[async_trait]
impl AnalysisTransport for DeepCultureClient {
    async fn analyze_subject(
        &self,
        subject: &str,
        analysis_type: &str,
        index: u64,
    ) -> Result<AnalysisReply, ClientError> {
        DeepCultureClient::analyze_subject(self, subject, analysis_type, index).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceEvent {
    Pending {
        index: u64,
        analysis_type: String,
    },
    Completed {
        index: u64,
        reply: AnalysisReply,
    },
    Failed {
        index: u64,
        analysis_type: String,
        error: String,
    },
    Finished(SequenceSummary),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceSummary {
    pub completed: usize,
    pub failed: usize,
}

pub struct Sequencer<T> {
    transport: T,
    delay: Duration,
}

impl<T: AnalysisTransport> Sequencer<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            delay: ANALYSIS_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run every entry of `analyses` against `subject`, in order.
    ///
    /// Events are best effort: a closed receiver does not stop the run.
    pub async fn run(
        &self,
        subject: &str,
        analyses: &[AnalysisEntry],
        events: &mpsc::Sender<SequenceEvent>,
    ) -> SequenceSummary {
        let mut summary = SequenceSummary::default();

        for (index, entry) in (0u64..).zip(analyses) {
            emit(
                events,
                SequenceEvent::Pending {
                    index,
                    analysis_type: entry.analysis_type.clone(),
                },
            )
            .await;

            tokio::time::sleep(self.delay).await;

            let event = match self
                .transport
                .analyze_subject(subject, &entry.analysis_type, index)
                .await
            {
                Ok(reply) => {
                    summary.completed += 1;
                    SequenceEvent::Completed { index, reply }
                }
                Err(error) => {
                    warn!(index, analysis_type = %entry.analysis_type, %error, "analysis failed");
                    summary.failed += 1;
                    SequenceEvent::Failed {
                        index,
                        analysis_type: entry.analysis_type.clone(),
                        error: error.to_string(),
                    }
                }
            };
            emit(events, event).await;
        }

        emit(events, SequenceEvent::Finished(summary)).await;
        summary
    }
}

async fn emit(events: &mpsc::Sender<SequenceEvent>, event: SequenceEvent) {
    if events.send(event).await.is_err() {
        debug!("sequence event receiver dropped");
    }
}
