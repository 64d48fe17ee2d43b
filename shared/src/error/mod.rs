//! Unified error handling
//!
//! All domain-rule violations surface as an [`AppError`] carrying a stable
//! [`ErrorCode`]; callers map codes to transport-specific responses.

pub mod category;
pub mod codes;
pub mod types;

pub use category::ErrorCategory;
pub use codes::ErrorCode;
pub use types::{AppError, AppResult};
