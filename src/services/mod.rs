// src/services/mod.rs
//
// Shared services module containing the identity-provider integration
// used by the auth module

pub mod google;
pub mod provider;

// Re-export commonly used types for convenience
pub use google::GoogleProvider;
pub use provider::{
    IdentityClaims, IdentityProvider, ProviderError, ProviderTokenBundle, VerifiedIdentity,
};
