//! Authentication handlers

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::extractors::AuthedUser;
use super::models::{CodeExchangeRequest, IdTokenRequest, UserPayload};
use crate::common::{safe_email_log, ApiError, AppState};
use crate::services::{ProviderError, VerifiedIdentity};

/// POST /auth/google/code
/// Flow A: exchange an authorization code for a session token.
///
/// # Request Body
/// ```json
/// {
///   "code": "<authorization code>",
///   "redirect_uri": "<uri the code was issued for>"
/// }
/// ```
///
/// # Response
/// ```json
/// {
///   "access_token": "<session token>",
///   "token_type": "bearer",
///   "user": { "name": ..., "email": ..., "picture": ... },
///   "provider_access_token": "<opaque pass-through>"
/// }
/// ```
pub async fn google_auth_with_code(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<CodeExchangeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("Received Google auth request (authorization code flow)");
    let state = state_lock.read().await.clone();

    // Single-use by provider contract: a rejected code aborts the flow,
    // no retry.
    let bundle = state
        .provider
        .exchange_code(&payload.code, &payload.redirect_uri)
        .await?;

    let id_token = bundle
        .id_token
        .ok_or(ProviderError::MissingField("id_token"))?;

    let claims = state.provider.verify_id_token(&id_token).await?;
    let identity = VerifiedIdentity::try_from(claims)?;

    let session_token = issue_session(&state, &identity.email)?;

    info!(
        email = %safe_email_log(&identity.email),
        provider = "google",
        "User authenticated via authorization code flow"
    );

    let resp = serde_json::json!({
        "access_token": session_token,
        "token_type": "bearer",
        "user": UserPayload::from(identity),
        "provider_access_token": bundle.access_token,
    });

    Ok(Json(resp))
}

/// POST /auth/google/id-token
/// Flow B: exchange a provider-issued ID token directly for a session
/// token. Same postcondition as Flow A minus the pass-through provider
/// access token.
pub async fn google_auth_with_id_token(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<IdTokenRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("Received Google auth request (direct ID token flow)");
    let state = state_lock.read().await.clone();

    let claims = state.provider.verify_id_token(&payload.id_token).await?;
    let identity = VerifiedIdentity::try_from(claims)?;

    let session_token = issue_session(&state, &identity.email)?;

    info!(
        email = %safe_email_log(&identity.email),
        provider = "google",
        "User authenticated via direct ID token flow"
    );

    let resp = serde_json::json!({
        "access_token": session_token,
        "token_type": "bearer",
        "user": UserPayload::from(identity),
    });

    Ok(Json(resp))
}

/// GET /api/me
/// Returns the authenticated subject extracted from the Bearer token.
pub async fn me_handler(authed: AuthedUser) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(email = %safe_email_log(&authed.email), "Protected resource accessed");
    let resp = serde_json::json!({
        "message": "session token accepted",
        "user_email": authed.email,
    });
    Ok(Json(resp))
}

/// GET /
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "OAuth session API" }))
}

// ---- Helper Functions ----

fn issue_session(state: &AppState, subject: &str) -> Result<String, ApiError> {
    state.session.issue(subject).map_err(|e| {
        error!(
            error = %e,
            email = %safe_email_log(subject),
            "JWT encoding error during session issuance"
        );
        ApiError::InternalServer("session issuance failed".to_string())
    })
}
