//! Session token issuance and validation
//!
//! Self-issued HS256 tokens embedding the authenticated subject (email)
//! plus issued-at and expiry timestamps. The signing secret and TTL come
//! in through an explicit `SessionConfig` rather than ambient globals, so
//! several signing configurations can coexist in one process.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::warn;

use super::models::SessionClaims;

/// Fixed session lifetime. Not configurable per token.
const SESSION_TTL_MINUTES: i64 = 60;

/// Uniform rejection for any session-token failure. Malformed, expired,
/// bad signature, and missing subject are deliberately indistinguishable
/// to the caller; the concrete cause is only logged.
#[derive(Debug, Error)]
#[error("invalid session token")]
pub struct InvalidToken;

/// Signing configuration for self-issued session tokens.
#[derive(Clone)]
pub struct SessionConfig {
    pub secret: String,
}

impl SessionConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

/// Issues and validates session tokens with a single HS256 key pair
/// derived from the configured secret.
pub struct SessionAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionAuth {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::minutes(SESSION_TTL_MINUTES),
        }
    }

    /// Mints a signed token for the given subject. Pure function of
    /// subject, current time, and the signing secret; no external calls.
    pub fn issue(&self, subject: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verifies signature and expiry and returns the embedded subject.
    /// Expiry is strict: a token is rejected from the embedded `exp`
    /// onward, with no clock-skew allowance.
    pub fn validate(&self, token: &str) -> Result<String, InvalidToken> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            warn!(error = %e, "Session token validation failed");
            InvalidToken
        })?;

        if data.claims.sub.is_empty() {
            warn!("Session token carries no subject");
            return Err(InvalidToken);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> SessionAuth {
        SessionAuth::new(&SessionConfig::new("test_secret_key"))
    }

    #[test]
    fn round_trips_subject() {
        let auth = auth();
        let token = auth.issue("demo@example.com").expect("issue");
        assert_eq!(auth.validate(&token).unwrap(), "demo@example.com");
    }

    #[test]
    fn embeds_sixty_minute_expiry() {
        let auth = auth();
        let token = auth.issue("demo@example.com").unwrap();

        // Decode without verification concerns to inspect the timestamps.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<SessionClaims>(
            &token,
            &DecodingKey::from_secret(b"test_secret_key"),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims.exp - data.claims.iat, 3600);
    }

    fn token_expiring_at(exp: chrono::DateTime<Utc>) -> String {
        let claims = SessionClaims {
            sub: "demo@example.com".to_string(),
            iat: (exp - Duration::minutes(60)).timestamp(),
            exp: exp.timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key"),
        )
        .unwrap()
    }

    #[test]
    fn rejects_expired_token() {
        let auth = auth();
        let token = token_expiring_at(Utc::now() - Duration::hours(1));
        assert!(auth.validate(&token).is_err());
    }

    #[test]
    fn rejects_token_just_past_expiry() {
        // Expiry is strict: a token only seconds past its exp must already
        // fail, with no leeway window.
        let auth = auth();
        let token = token_expiring_at(Utc::now() - Duration::seconds(30));
        assert!(auth.validate(&token).is_err());
    }

    #[test]
    fn accepts_token_within_expiry_window() {
        let auth = auth();
        let token = token_expiring_at(Utc::now() + Duration::minutes(5));
        assert_eq!(auth.validate(&token).unwrap(), "demo@example.com");
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = auth().issue("demo@example.com").unwrap();
        let other = SessionAuth::new(&SessionConfig::new("a_different_secret"));
        assert!(other.validate(&token).is_err());
    }

    #[test]
    fn rejects_tampered_signature() {
        let auth = auth();
        let token = auth.issue("demo@example.com").unwrap();

        // Flip a character inside the signature segment.
        let (prefix, signature) = token.rsplit_once('.').unwrap();
        let mut sig_bytes: Vec<u8> = signature.bytes().collect();
        sig_bytes[0] = if sig_bytes[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!("{}.{}", prefix, String::from_utf8(sig_bytes).unwrap());

        assert!(auth.validate(&tampered).is_err());
    }

    #[test]
    fn rejects_malformed_token() {
        let auth = auth();
        assert!(auth.validate("").is_err());
        assert!(auth.validate("not.a-real.jwt").is_err());
        assert!(auth.validate("onlyonesegment").is_err());
    }

    #[test]
    fn rejects_empty_subject() {
        let auth = auth();
        let token = auth.issue("").unwrap();
        assert!(auth.validate(&token).is_err());
    }
}
