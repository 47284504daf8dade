//! Glossa Admin HTTP Client
//!
//! A typed client for the Glossa content platform admin API.
//!
//! Backend job endpoints disagree on field naming and envelope shape,
//! so every job-bearing response is routed through the normalization
//! core in `glossa-core` before it reaches a caller: the transport
//! returns canonical [`Job`](glossa_core::domain::job::Job) values,
//! never raw payloads. The [`poller`] module tracks a submitted job to
//! a terminal status.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use glossa_client::{AdminClient, JobPoller, PollConfig};
//! use glossa_core::domain::job::TerminalSet;
//! use glossa_core::dto::job::CreateAlignmentJob;
//!
//! #[tokio::main]
//! async fn main() -> glossa_client::Result<()> {
//!     let client = AdminClient::new("https://admin.glossa.example");
//!
//!     let job_id = client.submit_alignment_job(&CreateAlignmentJob {
//!         lesson_id: 12,
//!         audio_object: "lesson-12.mp3".to_string(),
//!         transcript: None,
//!     }).await?;
//!
//!     let poller = JobPoller::new(
//!         client,
//!         PollConfig::new(Duration::from_secs(2), TerminalSet::audio_alignment()),
//!     );
//!     let (handle, mut events) = poller.spawn(job_id);
//!     while let Some(event) = events.recv().await {
//!         println!("{:?}", event);
//!     }
//!     println!("{:?}", handle.join().await);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
pub mod poller;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use poller::{JobPoller, JobStatusSource, PollConfig, PollEvent, PollHandle, PollOutcome};

use reqwest::Client;
use serde_json::Value;

/// HTTP client for the Glossa admin API
///
/// Provides methods for the job-related admin endpoints:
/// - Job submission (audio alignment, bulk vocabulary creation)
/// - Job queries (single job, filtered listings)
/// - Server-side job cancellation
#[derive(Debug, Clone)]
pub struct AdminClient {
    /// Base URL of the admin API (e.g., "https://admin.glossa.example")
    base_url: String,
    /// Bearer token attached to every request when set
    auth_token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl AdminClient {
    /// Create a new admin client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the admin API
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            client: Client::new(),
        }
    }

    /// Create a new admin client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the admin API
    /// * `client` - A configured reqwest Client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
            client,
        }
    }

    /// Attach a bearer token sent with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Get the base URL of the admin API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request & Response Handling
    // =============================================================================

    /// Build a request with the bearer token applied when configured
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Handle an API response, returning the raw JSON body.
    ///
    /// Job-bearing responses stay untyped here; the normalization core
    /// decides what the payload actually contains.
    async fn handle_raw_response(&self, response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AdminClient::new("https://admin.glossa.example");
        assert_eq!(client.base_url(), "https://admin.glossa.example");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = AdminClient::new("https://admin.glossa.example/");
        assert_eq!(client.base_url(), "https://admin.glossa.example");
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = AdminClient::with_client("https://admin.glossa.example", http_client);
        assert_eq!(client.base_url(), "https://admin.glossa.example");
        assert!(client.auth_token.is_none());
    }
}
