//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Google OAuth credential exchange (authorization code and ID token flows)
//! - Session token issuance and validation
//! - AuthedUser extractor for protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;


pub use extractors::AuthedUser;
pub use routes::auth_routes;
pub use session::{SessionAuth, SessionConfig};
