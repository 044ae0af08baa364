//! Bearer-token verification.
//!
//! Token cryptography lives in the identity service, not here. The gateway
//! submits the opaque token and gets back the subject it belongs to, or a
//! rejection whose message is surfaced to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Authenticated subject attached to a request after verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Stable subject id; becomes the post's `author.uid`.
    #[serde(rename = "sub")]
    pub subject: String,

    /// Display name, present only when the name claim was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Token rejected or the identity service was unreachable.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("{0}")]
    Rejected(String),

    #[error("identity service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Collaborator that verifies bearer tokens.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}

/// Verifier backed by a remote identity service endpoint.
pub struct HttpTokenVerifier {
    http: reqwest::Client,
    endpoint: Url,
    request_name_claim: bool,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
    /// Claims the gateway wants in the response.
    claims: &'a [&'a str],
}

impl HttpTokenVerifier {
    pub fn new(
        endpoint: Url,
        request_name_claim: bool,
        upstream_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            request_name_claim,
        })
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let claims: &[&str] = if self.request_name_claim {
            &["sub", "name"]
        } else {
            &["sub"]
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&VerifyRequest { token, claims })
            .send()
            .await?;

        if !response.status().is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "token rejected".to_string());
            return Err(VerifyError::Rejected(message));
        }

        let mut identity: Identity = response.json().await?;
        if !self.request_name_claim {
            identity.name = None;
        }
        Ok(identity)
    }
}
