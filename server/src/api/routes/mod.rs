//! API route handlers

pub mod analytics;
pub mod entries;
pub mod health;
pub mod profiles;
pub mod users;
