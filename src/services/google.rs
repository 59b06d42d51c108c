// src/services/google.rs
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::provider::{IdentityClaims, IdentityProvider, ProviderError, ProviderTokenBundle};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const JWKS_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/certs";
const ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

/// How long a fetched key set is served before the next verification
/// triggers a refresh. Correctness never depends on the cache; re-fetching
/// is always safe.
const JWKS_TTL: Duration = Duration::from_secs(3600);

struct CachedKeys {
    keys: Arc<JwkSet>,
    retrieved: Instant,
}

/// Google OAuth2/OIDC provider client.
///
/// Exchanges authorization codes at the token endpoint and verifies ID
/// tokens locally against Google's published JWKS, cached with a bounded
/// TTL. The cache holds an immutable `Arc<JwkSet>` swapped whole under a
/// write lock, so concurrent verifications never observe a partial set.
pub struct GoogleProvider {
    client_id: String,
    client_secret: String,
    client: Client,
    jwks_cache: RwLock<Option<CachedKeys>>,
}

impl GoogleProvider {
    pub fn new(client_id: String, client_secret: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client_id,
            client_secret,
            client,
            jwks_cache: RwLock::new(None),
        }
    }

    /// Returns the current key set, fetching from Google when the cache is
    /// empty, stale, or a refresh is forced (key rotation).
    async fn jwks(&self, force_refresh: bool) -> Result<Arc<JwkSet>, ProviderError> {
        if !force_refresh {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.retrieved.elapsed() < JWKS_TTL {
                    debug!("Using cached Google JWKS");
                    return Ok(cached.keys.clone());
                }
            }
        }

        debug!(endpoint = JWKS_ENDPOINT, "Fetching Google JWKS");

        let response = self.client.get(JWKS_ENDPOINT).send().await.map_err(|e| {
            error!(error = %e, "Failed to fetch Google JWKS");
            ProviderError::RequestFailed(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(http_status = %status, "Google JWKS endpoint returned error status");
            return Err(ProviderError::RequestFailed(format!(
                "JWKS fetch returned HTTP {}",
                status
            )));
        }

        let keys: JwkSet = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Google JWKS response");
            ProviderError::RequestFailed(e.to_string())
        })?;

        let keys = Arc::new(keys);
        let mut cache = self.jwks_cache.write().await;
        *cache = Some(CachedKeys {
            keys: keys.clone(),
            retrieved: Instant::now(),
        });

        info!(key_count = keys.keys.len(), "Refreshed Google JWKS cache");
        Ok(keys)
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ProviderTokenBundle, ProviderError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(ProviderError::NotConfigured);
        }

        let params = [
            ("code", code),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code at Google token endpoint");

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, endpoint = TOKEN_ENDPOINT, "HTTP error during code exchange");
                ProviderError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        debug!(http_status = %status, "Received code exchange response");

        if !status.is_success() {
            // Expired, already-consumed, or redirect_uri-mismatched codes
            // land here. Codes are single-use; the caller must obtain a
            // fresh one rather than retry.
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(
                http_status = %status,
                error = %error_text,
                "Google rejected the authorization code"
            );
            return Err(ProviderError::ExchangeRejected(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let bundle = response.json::<ProviderTokenBundle>().await.map_err(|e| {
            error!(error = %e, "Failed to parse token endpoint response");
            ProviderError::RequestFailed(e.to_string())
        })?;

        info!(
            has_id_token = bundle.id_token.is_some(),
            has_access_token = bundle.access_token.is_some(),
            "Authorization code exchanged successfully"
        );

        Ok(bundle)
    }

    async fn verify_id_token(&self, id_token: &str) -> Result<IdentityClaims, ProviderError> {
        let header = decode_header(id_token).map_err(|e| {
            warn!(error = %e, "Malformed ID token header");
            ProviderError::Verification(e.to_string())
        })?;

        let kid = header
            .kid
            .ok_or_else(|| ProviderError::Verification("token header missing kid".to_string()))?;

        let keys = self.jwks(false).await?;
        let jwk = match keys.find(&kid) {
            Some(jwk) => jwk.clone(),
            None => {
                // Google rotates keys; force one refresh before failing.
                warn!(kid = %kid, "Signing key not in cached JWKS, forcing refresh");
                let keys = self.jwks(true).await?;
                keys.find(&kid).cloned().ok_or_else(|| {
                    warn!(kid = %kid, "Signing key unknown after JWKS refresh");
                    ProviderError::Verification("unknown signing key".to_string())
                })?
            }
        };

        let decoding_key =
            DecodingKey::from_jwk(&jwk).map_err(|e| ProviderError::Verification(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&ISSUERS);

        let data = decode::<IdentityClaims>(id_token, &decoding_key, &validation).map_err(|e| {
            warn!(error = %e, "ID token verification failed");
            ProviderError::Verification(e.to_string())
        })?;

        debug!(
            has_email = data.claims.email.is_some(),
            has_name = data.claims.name.is_some(),
            "ID token verified"
        );

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exchange_code_requires_credentials() {
        let provider = GoogleProvider::new(String::new(), String::new());
        let result = provider
            .exchange_code("some-code", "http://localhost/cb")
            .await;
        assert!(matches!(result, Err(ProviderError::NotConfigured)));
    }

    #[tokio::test]
    async fn verify_rejects_garbage_token() {
        let provider = GoogleProvider::new("client".to_string(), "secret".to_string());
        let result = provider.verify_id_token("not-a-jwt").await;
        assert!(matches!(result, Err(ProviderError::Verification(_))));
    }

    #[tokio::test]
    async fn verify_rejects_token_without_kid() {
        // An HS256 token has a well-formed header but carries no kid, so
        // verification must fail before any network fetch.
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(Algorithm::HS256),
            &serde_json::json!({"sub": "x", "exp": 9999999999i64}),
            &jsonwebtoken::EncodingKey::from_secret(b"k"),
        )
        .unwrap();

        let provider = GoogleProvider::new("client".to_string(), "secret".to_string());
        let result = provider.verify_id_token(&token).await;
        assert!(matches!(result, Err(ProviderError::Verification(_))));
    }
}
