use thiserror::Error;

/// Outcome of one completion exchange.
pub type ChatResult = std::result::Result<String, CompletionError>;

/// Ways a completion can fail. Rendered to text at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The request never produced a response body (connect error, reset, timeout).
    #[error("request to the chat completion API failed: {0}")]
    Transport(String),

    /// The body was not valid JSON.
    #[error("failed to decode the upstream JSON response")]
    Decode,

    /// The JSON did not expose `choices[0].message.content` as a string.
    #[error("upstream response does not contain the expected format")]
    Format,

    /// The HTTP client itself could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl CompletionError {
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Transport(_) => "transport",
            CompletionError::Decode => "decode",
            CompletionError::Format => "format",
            CompletionError::Client(_) => "client",
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(error: reqwest::Error) -> Self {
        CompletionError::Transport(error.to_string())
    }
}
