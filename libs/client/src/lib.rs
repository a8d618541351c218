//! Talks to a running Deep Culture server the way its page does: one
//! `initial_question`, then one `analyze_subject` per listed analysis, paced
//! and strictly one at a time.

pub mod client;
pub mod sequencer;
pub mod types;

pub use client::{ClientError, DeepCultureClient};
pub use sequencer::{
    ANALYSIS_DELAY, AnalysisTransport, SequenceEvent, SequenceSummary, Sequencer,
};
pub use types::{AnalysisEntry, AnalysisReply, InitialAnswer};
