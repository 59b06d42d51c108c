// src/services/provider.rs
//! Identity-provider seam
//!
//! The auth handlers talk to the provider through the `IdentityProvider`
//! trait so tests can substitute a deterministic fake instead of the real
//! Google endpoints.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider credentials not configured")]
    NotConfigured,

    #[error("code exchange rejected: {0}")]
    ExchangeRejected(String),

    #[error("provider response missing {0}")]
    MissingField(&'static str),

    #[error("id token verification failed: {0}")]
    Verification(String),

    #[error("required claim missing: {0}")]
    MissingClaim(&'static str),

    #[error("provider request failed: {0}")]
    RequestFailed(String),
}

/// Result of exchanging an authorization code at the provider's token
/// endpoint. `id_token` is required to proceed; `access_token` is opaque
/// and passed through to the client uninterpreted.
#[derive(Debug, Deserialize)]
pub struct ProviderTokenBundle {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
}

/// Raw claim set extracted from a verified provider ID token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityClaims {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Identity claims after the mandatory-email check. Lives for a single
/// request; never persisted.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl TryFrom<IdentityClaims> for VerifiedIdentity {
    type Error = ProviderError;

    fn try_from(claims: IdentityClaims) -> Result<Self, Self::Error> {
        let email = claims
            .email
            .filter(|e| !e.is_empty())
            .ok_or(ProviderError::MissingClaim("email"))?;
        Ok(VerifiedIdentity {
            email,
            name: claims.name,
            picture: claims.picture,
        })
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange an authorization code for the provider's token bundle.
    ///
    /// Codes are single-use by provider contract: retrying a code after a
    /// prior successful exchange fails at the provider, so callers must
    /// not auto-retry.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProviderTokenBundle, ProviderError>;

    /// Verify a provider-signed ID token and extract its identity claims.
    async fn verify_id_token(&self, id_token: &str) -> Result<IdentityClaims, ProviderError>;
}
