use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ACTION_INITIAL_QUESTION: &str = "initial_question";
pub const ACTION_ANALYZE_SUBJECT: &str = "analyze_subject";

/// One analytical lens proposed by the model. Order is display and execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisItem {
    #[serde(rename = "type", default)]
    pub analysis_type: String,
    #[serde(default)]
    pub description: String,
    /// Keys the model added beyond `type` and `description`, echoed back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisItem {
    pub fn new(analysis_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            analysis_type: analysis_type.into(),
            description: description.into(),
            extra: Map::new(),
        }
    }

    /// Lenient conversion: missing keys become empty strings and scalars
    /// become an item named after their text.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => {
                let analysis_type = fields.remove("type").map(text_of).unwrap_or_default();
                let description = fields
                    .remove("description")
                    .map(text_of)
                    .unwrap_or_default();
                Self {
                    analysis_type,
                    description,
                    extra: fields,
                }
            }
            other => Self::new(text_of(other), String::new()),
        }
    }
}

fn text_of(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Form fields as posted by the browser page. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawForm {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub user_input: Option<String>,
    #[serde(default)]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub index: Option<String>,
}

/// A validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchRequest {
    InitialQuestion {
        user_input: String,
    },
    AnalyzeSubject {
        analysis_type: String,
        subject: String,
        index: u64,
    },
}

impl TryFrom<RawForm> for DispatchRequest {
    type Error = DispatchError;

    fn try_from(form: RawForm) -> Result<Self, Self::Error> {
        let action = form
            .action
            .unwrap_or_else(|| ACTION_INITIAL_QUESTION.to_string());

        match action.as_str() {
            ACTION_INITIAL_QUESTION => Ok(DispatchRequest::InitialQuestion {
                user_input: form.user_input.unwrap_or_default(),
            }),
            ACTION_ANALYZE_SUBJECT => {
                let analysis_type = form.analysis_type.unwrap_or_default();
                let subject = form.subject.unwrap_or_default();
                if analysis_type.is_empty() || subject.is_empty() {
                    return Err(DispatchError::MissingTypeOrSubject);
                }
                let index = parse_index(form.index.as_deref())?;
                Ok(DispatchRequest::AnalyzeSubject {
                    analysis_type,
                    subject,
                    index,
                })
            }
            _ => Err(DispatchError::UnknownAction(action)),
        }
    }
}

fn parse_index(raw: Option<&str>) -> Result<u64, DispatchError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(0),
        Some(text) => text
            .parse::<u64>()
            .map_err(|_| DispatchError::InvalidIndex(text.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialQuestionResponse {
    pub initial_response: String,
    pub json_file_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyses_list: Option<Vec<AnalysisItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyses_json_file_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyses_list_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub analysis_type: String,
    pub analysis_response: String,
    pub index: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON body returned for a POST, shaped by the action that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DispatchResponse {
    InitialQuestion(InitialQuestionResponse),
    Analysis(AnalysisResponse),
    Error(ErrorResponse),
}

impl From<DispatchError> for DispatchResponse {
    fn from(error: DispatchError) -> Self {
        DispatchResponse::Error(ErrorResponse {
            error: error.to_string(),
        })
    }
}
