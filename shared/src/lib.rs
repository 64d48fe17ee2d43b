//! Shared types for the dine-core workspace
//!
//! Error codes, error types, and common utilities used by the domain
//! core and by host processes embedding it.

pub mod error;
pub mod types;
pub mod util;
pub mod validation;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
pub use types::{Money, Timestamp};
