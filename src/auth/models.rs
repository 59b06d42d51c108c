//! Authentication data models

use serde::{Deserialize, Serialize};

use crate::services::VerifiedIdentity;

/// Session token claims: subject (email), issued-at, expiry
#[derive(Serialize, Deserialize, Debug)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Request body for the authorization-code flow (Flow A). The redirect
/// URI must match the one the code was originally issued for.
#[derive(Deserialize)]
pub struct CodeExchangeRequest {
    pub code: String,
    pub redirect_uri: String,
}

/// Request body for the direct ID-token flow (Flow B)
#[derive(Deserialize)]
pub struct IdTokenRequest {
    pub id_token: String,
}

/// User fragment returned by both auth flows
#[derive(Serialize, Debug)]
pub struct UserPayload {
    pub name: Option<String>,
    pub email: String,
    pub picture: Option<String>,
}

impl From<VerifiedIdentity> for UserPayload {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            name: identity.name,
            email: identity.email,
            picture: identity.picture,
        }
    }
}
