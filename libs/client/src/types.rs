use serde::{Deserialize, Serialize};

/// One entry of the analysis list, in display and execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisEntry {
    #[serde(rename = "type", default)]
    pub analysis_type: String,
    #[serde(default)]
    pub description: String,
}

impl AnalysisEntry {
    pub fn new(analysis_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            analysis_type: analysis_type.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialAnswer {
    pub initial_response: String,
    pub json_file_message: String,
    #[serde(default)]
    pub analyses_list: Option<Vec<AnalysisEntry>>,
    #[serde(default)]
    pub analyses_json_file_message: Option<String>,
    #[serde(default)]
    pub analyses_list_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReply {
    pub analysis_type: String,
    pub analysis_response: String,
    pub index: u64,
}
