//! Authentication and authorization plumbing for the API layer

pub mod context;
pub mod extractors;
pub mod jwt;
pub mod middleware;

pub use context::AuthContext;
pub use extractors::{
    AdminOnly, Auth, AuthRejection, EntryDelete, EntryUpdate, ProfileInsert, ProfileRead,
};
pub use jwt::TokenVerifier;
pub use middleware::{AuthState, require_auth};
