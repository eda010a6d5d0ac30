//! Shared data types
//!
//! Row types, asset breakdowns, and the role/permission enums used across
//! the data layer and both domain engines.

pub mod assets;
pub mod enums;
pub mod transactional;

pub use assets::{HighMediumRisk, LowRisk, invalid_amount_fields, is_valid_amount};
pub use enums::{Permission, Role};
pub use transactional::{EntryRow, LinkRow, NewEntry, ProfileRow, UserRow};
