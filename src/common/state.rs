// Application state shared across all modules

use std::sync::Arc;

use crate::auth::session::SessionAuth;
use crate::services::IdentityProvider;

/// Application state containing the session signer and the identity
/// provider client. Both are read-only after startup; the provider keeps
/// its own interior key cache.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionAuth>,
    pub provider: Arc<dyn IdentityProvider>,
}
