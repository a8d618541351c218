//! # Deep Culture AI client
//!
//! A small client for OpenAI-compatible chat-completion endpoints (Mistral by
//! default). Every call resolves to a [`ChatResult`]: either the cleaned text
//! of the first choice or a [`CompletionError`] describing what went wrong.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deepculture_ai::{ChatCompletionClient, ChatCompletionConfig, CompletionProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatCompletionClient::new(ChatCompletionConfig::new("sk-..."))?;
//!
//!     match client.complete("Who founded Rome?").await {
//!         Ok(text) => println!("{text}"),
//!         Err(error) => eprintln!("{error}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod fence;
pub mod provider;
pub mod tls;
pub mod types;

pub use client::ChatCompletionClient;
pub use error::{ChatResult, CompletionError};
pub use fence::strip_html_fence;
pub use provider::CompletionProvider;
pub use types::{ChatCompletionConfig, ChatCompletionRequest, ChatMessage};
