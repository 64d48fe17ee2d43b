//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Failure taxonomy for domain errors
///
/// Every [`ErrorCode`] maps to exactly one category:
/// - `Validation`: malformed/missing input, recoverable by resubmission
/// - `NotFound`: referenced entity does not resolve (or is soft-deleted)
/// - `Transition`: state-machine rule violated
/// - `Conflict`: operation conflicts with current state
/// - `Dependency`: an external collaborator failed
/// - `System`: unexpected internal failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Validation,
    NotFound,
    Transition,
    Conflict,
    Dependency,
    System,
}

impl ErrorCode {
    /// Get the category for this error code
    pub const fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::InvalidFormat
            | ErrorCode::RequiredField
            | ErrorCode::ValueOutOfRange
            | ErrorCode::OrderEmpty
            | ErrorCode::InvalidOrderType
            | ErrorCode::InvalidReservationTime => ErrorCategory::Validation,

            ErrorCode::NotFound
            | ErrorCode::OrderNotFound
            | ErrorCode::OrderItemNotFound
            | ErrorCode::ReservationNotFound
            | ErrorCode::DishNotFound
            | ErrorCode::CategoryNotFound
            | ErrorCode::TableSessionNotFound => ErrorCategory::NotFound,

            ErrorCode::InvalidTransition
            | ErrorCode::OrderAlreadyCancelled
            | ErrorCode::OrderNotCancellable
            | ErrorCode::OrderStatusRegression
            | ErrorCode::ReservationAlreadyCancelled
            | ErrorCode::ReservationCompleted => ErrorCategory::Transition,

            ErrorCode::Conflict
            | ErrorCode::AlreadyExists
            | ErrorCode::DishNotAvailable
            | ErrorCode::TableSessionClosed
            | ErrorCode::TableSessionExists => ErrorCategory::Conflict,

            ErrorCode::DependencyFailed => ErrorCategory::Dependency,

            ErrorCode::InternalError | ErrorCode::StorageError => ErrorCategory::System,

            ErrorCode::Success | ErrorCode::Unknown => ErrorCategory::General,
        }
    }
}
