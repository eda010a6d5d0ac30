//! Access control engine
//!
//! Row-level security expressed as application logic: one module consulted
//! before every data access, instead of checks scattered through handlers.

mod engine;
mod error;
mod snapshot;

pub use engine::{AccessEngine, LinkGrant};
pub use error::{AccessError, DenyReason, Operation};
pub use snapshot::{AccessSnapshot, Visibility};
