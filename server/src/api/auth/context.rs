//! Authentication context
//!
//! The middleware resolves every request to a principal id before any
//! handler runs; authorization decisions always start from this context and
//! re-resolve role/links from storage (the context never caches a role).

/// How the current request was authenticated
#[derive(Debug, Clone)]
pub enum AuthContext {
    /// Bearer token verified against the identity provider secret
    Session { user_id: String },
    /// Seeded local admin (`--no-auth` mode)
    LocalDefault { user_id: String },
}

impl AuthContext {
    /// The resolved principal id
    pub fn user_id(&self) -> &str {
        match self {
            Self::Session { user_id } | Self::LocalDefault { user_id } => user_id,
        }
    }
}
