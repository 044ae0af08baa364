//! Document store client.
//!
//! # Responsibilities
//! - Point reads of a tree path (raw JSON snapshot)
//! - Ordered reads by the `created` field
//! - Atomic append with store-generated key
//!
//! # Design Decisions
//! - The store is external; this is a thin REST driver, not a database
//! - Absence is a `null` snapshot, never an error
//! - Errors keep the store's own code and message for response mapping

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Failure talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status.
    #[error("{message}")]
    Status { code: u16, message: String },

    /// The request never completed (connect, timeout, decode).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl StoreError {
    /// Store-reported error code, used verbatim in response bodies.
    pub fn code(&self) -> String {
        match self {
            StoreError::Status { code, .. } => code.to_string(),
            StoreError::Transport(e) => e
                .status()
                .map(|s| s.as_u16().to_string())
                .unwrap_or_else(|| "unavailable".to_string()),
        }
    }
}

/// Abstract tree-structured document store.
///
/// Production uses [`RtdbClient`]; tests substitute in-memory doubles.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the snapshot at `path`. Missing data reads as `Value::Null`.
    async fn read(&self, path: &str, order_by_created: bool) -> Result<Value, StoreError>;

    /// Append `value` under `path` with a store-generated key; returns the key.
    async fn push(&self, path: &str, value: &Value) -> Result<String, StoreError>;
}

/// REST client for a realtime-tree database.
///
/// Paths map onto the store's REST surface as `{base_url}/{path}.json`;
/// pushes POST the value and receive the generated key back as `{"name": k}`.
pub struct RtdbClient {
    http: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

impl RtdbClient {
    pub fn new(base_url: Url, upstream_timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let key = path.trim_matches('/');
        format!("{base}/{key}.json")
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(StoreError::Status {
            code: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DocumentStore for RtdbClient {
    async fn read(&self, path: &str, order_by_created: bool) -> Result<Value, StoreError> {
        let mut request = self.http.get(self.endpoint(path));
        if order_by_created {
            request = request.query(&[("orderBy", "\"created\"")]);
        }
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn push(&self, path: &str, value: &Value) -> Result<String, StoreError> {
        let response = self.http.post(self.endpoint(path)).json(value).send().await?;
        let response = Self::check(response).await?;
        let push: PushResponse = response.json().await?;
        Ok(push.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_doubled_separators() {
        let client = RtdbClient::new(
            Url::parse("https://db.example.com/").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("app/posts/"),
            "https://db.example.com/app/posts.json"
        );
        assert_eq!(
            client.endpoint("app/posts/abc"),
            "https://db.example.com/app/posts/abc.json"
        );
    }

    #[test]
    fn status_error_keeps_store_code() {
        let err = StoreError::Status {
            code: 503,
            message: "backend unavailable".into(),
        };
        assert_eq!(err.code(), "503");
        assert_eq!(err.to_string(), "backend unavailable");
    }
}
