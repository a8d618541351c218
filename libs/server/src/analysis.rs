//! Analysis list generation and per-analysis prompts.

use crate::error::AnalysisListError;
use crate::types::AnalysisItem;
use deepculture_ai::CompletionProvider;
use deepculture_ai::fence::strip_json_fence;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

pub const ANALYSIS_COUNT: usize = 20;

static LEADING_PROSE: LazyLock<Option<Regex>> =
    LazyLock::new(|| match Regex::new(r"(?s)^.*?([\[{])") {
        Ok(re) => Some(re),
        Err(error) => {
            tracing::error!(%error, "failed to compile leading prose regex");
            None
        }
    });

pub fn analysis_list_prompt(subject: &str) -> String {
    format!(
        "Generate a JSON list of {ANALYSIS_COUNT} relevant and distinct types of analysis for the \
         following subject: \"{subject}\". Adapt the list dynamically to the subject to make it as \
         relevant as possible. The JSON list must be an array of objects, where each object has a \
         'type' key (string) and a 'description' key (string). Reply only with valid JSON. Do not \
         include any additional text."
    )
}

pub fn analysis_prompt(subject: &str, analysis_type: &str) -> String {
    format!(
        "Analyze the following subject: \"{subject}\" using a {analysis_type} approach. Provide a \
         detailed and relevant analysis. Answer masterfully, as a grand master historian would, \
         in HTML, with titles."
    )
}

/// Drop any prose before the first `[` or `{`, then any json code fence.
pub fn clean_analysis_reply(reply: &str) -> String {
    let without_prose = match LEADING_PROSE.as_ref() {
        Some(re) => re.replace(reply, "$1").into_owned(),
        None => reply.to_string(),
    };
    strip_json_fence(&without_prose)
}

pub fn parse_analysis_list(cleaned: &str) -> Result<Vec<AnalysisItem>, AnalysisListError> {
    let parse_error = || AnalysisListError::Parse {
        raw: cleaned.to_string(),
    };

    match serde_json::from_str::<Value>(cleaned).map_err(|_| parse_error())? {
        Value::Array(items) => Ok(items.into_iter().map(AnalysisItem::from_value).collect()),
        Value::Object(mut fields) => {
            let wrapped = fields
                .iter()
                .find_map(|(key, value)| value.is_array().then(|| key.clone()));

            match wrapped.and_then(|key| fields.remove(&key)) {
                Some(Value::Array(items)) => {
                    Ok(items.into_iter().map(AnalysisItem::from_value).collect())
                }
                _ => Ok(vec![AnalysisItem::from_value(Value::Object(fields))]),
            }
        }
        _ => Err(parse_error()),
    }
}

#[derive(Clone)]
pub struct AnalysisListGenerator {
    completion: Arc<dyn CompletionProvider>,
}

impl AnalysisListGenerator {
    pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
        Self { completion }
    }

    pub async fn list_analyses(&self, subject: &str) -> Result<Vec<AnalysisItem>, AnalysisListError> {
        let reply = self
            .completion
            .complete(&analysis_list_prompt(subject))
            .await?;

        let cleaned = clean_analysis_reply(&reply);
        match parse_analysis_list(&cleaned) {
            Ok(items) => {
                if items.len() != ANALYSIS_COUNT {
                    debug!(
                        expected = ANALYSIS_COUNT,
                        received = items.len(),
                        "model returned an unexpected number of analyses"
                    );
                }
                Ok(items)
            }
            Err(error) => {
                warn!(%error, "analysis list reply rejected");
                Err(error)
            }
        }
    }
}
