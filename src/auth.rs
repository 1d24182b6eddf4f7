use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AuthConfig;

/// Identity returned by the remote verification endpoint for a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct VerifiedIdentity {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The token was presented but the identity service did not accept it.
    #[error("invalid or expired token")]
    Rejected,
    /// The identity service could not be reached or answered garbage.
    #[error("identity service error: {0}")]
    Transport(String),
}

/// Resolves a bearer token to the identity that owns it, or rejects it.
/// The trait is the seam that lets tests substitute a fake verifier.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError>;
}

pub struct HttpIdentityVerifier {
    user_info_url: String,
    service_key: Option<String>,
    client: reqwest::Client,
}

impl HttpIdentityVerifier {
    pub fn new(config: AuthConfig) -> HttpIdentityVerifier {
        HttpIdentityVerifier {
            user_info_url: config.user_info_url,
            service_key: config.service_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        let mut request = self
            .client
            .get(&self.user_info_url)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        if let Some(service_key) = &self.service_key {
            request = request.header("apikey", service_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| VerifyError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(VerifyError::Rejected);
        }

        response
            .json::<VerifiedIdentity>()
            .await
            .map_err(|err| VerifyError::Transport(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_deserializes_from_user_info_payload() {
        // Identity endpoints return more fields than we care about.
        let payload = r#"{
            "id": "5f8f1f2c-0000-4000-8000-000000000000",
            "aud": "authenticated",
            "email": "someone@example.com",
            "role": "authenticated"
        }"#;

        let identity: VerifiedIdentity = serde_json::from_str(payload).unwrap();
        assert_eq!(identity.id, "5f8f1f2c-0000-4000-8000-000000000000");
        assert_eq!(identity.email.as_deref(), Some("someone@example.com"));
    }

    #[test]
    fn identity_tolerates_missing_email() {
        let identity: VerifiedIdentity = serde_json::from_str(r#"{"id": "u1"}"#).unwrap();
        assert_eq!(identity.email, None);
    }
}
