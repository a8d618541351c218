//! HTTP front end for the Deep Culture assistant.
//!
//! A single page posts form-encoded actions to `/`: `initial_question`
//! answers the user, logs the exchange and proposes a list of analyses,
//! `analyze_subject` runs one analysis from that list.

pub mod analysis;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod routes;
pub mod session_log;
pub mod state;
pub mod types;

#[cfg(test)]
mod test_support;

pub use analysis::{ANALYSIS_COUNT, AnalysisListGenerator, analysis_list_prompt, analysis_prompt};
pub use config::{AppConfig, ServeCliFlags};
pub use dispatcher::{AnalysisOutcome, Dispatcher, InitialQuestionOutcome};
pub use error::{AnalysisListError, DispatchError, SessionLogError};
pub use routes::router;
pub use session_log::{LogEntry, LogKind, SessionLogger};
pub use state::AppState;
pub use types::{
    AnalysisItem, AnalysisResponse, DispatchRequest, DispatchResponse, ErrorResponse,
    InitialQuestionResponse, RawForm,
};
