//! Shared types for the EMS workspace
//!
//! Common types used across crates: the closed role set, viewer scopes
//! for the notification feed, and small time utilities.

pub mod roles;
pub mod util;

// Re-exports
pub use roles::{Role, RoleParseError};
pub use serde::{Deserialize, Serialize};
