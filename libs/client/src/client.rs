use crate::types::{AnalysisReply, InitialAnswer};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct DeepCultureClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with an `{"error": ...}` body.
    #[error("server rejected the request: {0}")]
    Server(String),

    #[error("server returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl DeepCultureClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub async fn initial_question(&self, user_input: &str) -> Result<InitialAnswer, ClientError> {
        self.post_form(&[("action", "initial_question"), ("user_input", user_input)])
            .await
    }

    pub async fn analyze_subject(
        &self,
        subject: &str,
        analysis_type: &str,
        index: u64,
    ) -> Result<AnalysisReply, ClientError> {
        let index = index.to_string();
        self.post_form(&[
            ("action", "analyze_subject"),
            ("subject", subject),
            ("analysis_type", analysis_type),
            ("index", index.as_str()),
        ])
        .await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        fields: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let response = self
            .http
            .post(format!("{}/", self.base_url))
            .form(fields)
            .send()
            .await
            .map_err(|error| {
                if error.is_connect() {
                    ClientError::Connection(error.to_string())
                } else {
                    ClientError::Http(error)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;
        decode_body(status, &body)
    }
}

fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ClientError> {
    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(error) if status.is_success() => return Err(ClientError::Decode(error.to_string())),
        Err(_) => {
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                body: body.to_string(),
            });
        }
    };

    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(ClientError::Server(message.to_string()));
    }

    if !status.is_success() {
        return Err(ClientError::ApiError {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    serde_json::from_value(value).map_err(|error| ClientError::Decode(error.to_string()))
}
