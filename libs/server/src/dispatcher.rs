//! The two request flows behind the single POST endpoint.
//!
//! Nothing is kept between requests: the analysis list travels to the browser
//! and comes back one entry at a time inside `analyze_subject` calls.

use crate::analysis::{AnalysisListGenerator, analysis_prompt};
use crate::error::{AnalysisListError, DispatchError, SessionLogError};
use crate::session_log::{LogEntry, LogKind, SessionLogger};
use crate::types::{
    AnalysisItem, AnalysisResponse, DispatchRequest, DispatchResponse, InitialQuestionResponse,
    RawForm,
};
use deepculture_ai::{ChatResult, CompletionProvider};
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything that happened while answering an initial question, before it
/// is flattened into the JSON reply.
#[derive(Debug)]
pub struct InitialQuestionOutcome {
    pub initial: ChatResult,
    pub initial_log: Result<PathBuf, SessionLogError>,
    pub analyses: Result<Vec<AnalysisItem>, AnalysisListError>,
    /// Only attempted when the analysis list was obtained.
    pub analyses_log: Option<Result<PathBuf, SessionLogError>>,
}

impl InitialQuestionOutcome {
    pub fn into_response(self) -> InitialQuestionResponse {
        let initial_response = render_chat_result(self.initial);
        let json_file_message = match &self.initial_log {
            Ok(path) => format!("Initial JSON file created: {}", path.display()),
            Err(_) => "Failed to create the initial JSON file.".to_string(),
        };

        match self.analyses {
            Ok(items) => {
                let analyses_json_file_message = match &self.analyses_log {
                    Some(Ok(path)) => format!("Analyses JSON file created: {}", path.display()),
                    Some(Err(_)) | None => {
                        "Failed to create the analyses JSON file.".to_string()
                    }
                };
                InitialQuestionResponse {
                    initial_response,
                    json_file_message,
                    analyses_list: Some(items),
                    analyses_json_file_message: Some(analyses_json_file_message),
                    analyses_list_error: None,
                }
            }
            Err(error) => InitialQuestionResponse {
                initial_response,
                json_file_message,
                analyses_list: None,
                analyses_json_file_message: None,
                analyses_list_error: Some(error.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub analysis_type: String,
    pub index: u64,
    pub result: ChatResult,
}

impl AnalysisOutcome {
    pub fn into_response(self) -> AnalysisResponse {
        AnalysisResponse {
            analysis_type: self.analysis_type,
            analysis_response: render_chat_result(self.result),
            index: self.index,
        }
    }
}

fn render_chat_result(result: ChatResult) -> String {
    match result {
        Ok(text) => text,
        Err(error) => error.to_string(),
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    completion: Arc<dyn CompletionProvider>,
    analyses: AnalysisListGenerator,
    logger: SessionLogger,
}

impl Dispatcher {
    pub fn new(completion: Arc<dyn CompletionProvider>, logger: SessionLogger) -> Self {
        Self {
            analyses: AnalysisListGenerator::new(completion.clone()),
            completion,
            logger,
        }
    }

    /// Validate `form` and run the matching flow.
    pub async fn dispatch(
        &self,
        client: IpAddr,
        form: RawForm,
    ) -> Result<DispatchResponse, DispatchError> {
        match DispatchRequest::try_from(form)? {
            DispatchRequest::InitialQuestion { user_input } => Ok(DispatchResponse::InitialQuestion(
                self.initial_question(client, &user_input)
                    .await
                    .into_response(),
            )),
            DispatchRequest::AnalyzeSubject {
                analysis_type,
                subject,
                index,
            } => Ok(DispatchResponse::Analysis(
                self.analyze_subject(&analysis_type, &subject, index)
                    .await
                    .into_response(),
            )),
        }
    }

    /// Answer the question, log it, fetch the analysis list and log that too.
    ///
    /// Every step runs even when an earlier one failed; a failed answer is
    /// logged as its error text and the list is still requested for the
    /// original question.
    pub async fn initial_question(&self, client: IpAddr, user_input: &str) -> InitialQuestionOutcome {
        info!(
            %client,
            provider = self.completion.provider_id(),
            "initial question received"
        );

        let initial = self.completion.complete(user_input).await;
        let initial_text = match &initial {
            Ok(text) => text.clone(),
            Err(error) => error.to_string(),
        };

        let initial_log = self
            .logger
            .log_now(&LogEntry {
                client,
                question: user_input,
                response: &initial_text,
                kind: LogKind::Initial,
                analyses: None,
            })
            .await;
        if let Err(error) = &initial_log {
            warn!(%client, %error, "failed to write initial session log");
        }

        let analyses = self.analyses.list_analyses(user_input).await;

        let analyses_log = match &analyses {
            Ok(items) => {
                let encoded = serde_json::to_string(items).unwrap_or_default();
                let result = self
                    .logger
                    .log_now(&LogEntry {
                        client,
                        question: user_input,
                        response: &encoded,
                        kind: LogKind::Analyses,
                        analyses: Some(items),
                    })
                    .await;
                if let Err(error) = &result {
                    warn!(%client, %error, "failed to write analyses session log");
                }
                Some(result)
            }
            Err(_) => None,
        };

        InitialQuestionOutcome {
            initial,
            initial_log,
            analyses,
            analyses_log,
        }
    }

    pub async fn analyze_subject(
        &self,
        analysis_type: &str,
        subject: &str,
        index: u64,
    ) -> AnalysisOutcome {
        info!(
            index,
            analysis_type,
            provider = self.completion.provider_id(),
            "analysis requested"
        );

        let result = self
            .completion
            .complete(&analysis_prompt(subject, analysis_type))
            .await;

        AnalysisOutcome {
            analysis_type: analysis_type.to_string(),
            index,
            result,
        }
    }
}
