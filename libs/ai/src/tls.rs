//! HTTP client construction.
//!
//! Certificates are checked against the operating system's trust store via
//! `rustls-platform-verifier`, so corporate proxies with private CAs work.
//! No request timeout is set: a completion waits as long as the HTTP stack
//! allows.

use crate::error::CompletionError;
use reqwest::Client;
use rustls_platform_verifier::BuilderVerifierExt;

pub fn create_platform_tls_client() -> Result<Client, CompletionError> {
    let crypto_provider = std::sync::Arc::new(rustls::crypto::ring::default_provider());
    let tls_config = rustls::ClientConfig::builder_with_provider(crypto_provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| CompletionError::Client(format!("invalid TLS protocol versions: {}", e)))?
        .with_platform_verifier()
        .with_no_client_auth();

    Client::builder()
        .use_preconfigured_tls(tls_config)
        .build()
        .map_err(|e| CompletionError::Client(e.to_string()))
}
