//! Unified error codes for the restaurant core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors (45xx: Reservation errors)
//! - 6xxx: Catalog errors
//! - 7xxx: Table session errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// State-machine rule violated
    InvalidTransition = 9,
    /// Conflicting state (closed session, unavailable dish, ...)
    Conflict = 10,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4002,
    /// Unknown order type
    InvalidOrderType = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Order can no longer be cancelled
    OrderNotCancellable = 4005,
    /// Attempted to move order status backwards
    OrderStatusRegression = 4006,
    /// Order item not found
    OrderItemNotFound = 4007,

    // ==================== 45xx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4501,
    /// Reservation has already been cancelled
    ReservationAlreadyCancelled = 4502,
    /// Reservation has already been completed
    ReservationCompleted = 4503,
    /// Reservation time is not valid HH:mm
    InvalidReservationTime = 4504,

    // ==================== 6xxx: Catalog ====================
    /// Dish not found (or soft-deleted)
    DishNotFound = 6001,
    /// Dish is currently unavailable
    DishNotAvailable = 6002,
    /// Dish category not found
    CategoryNotFound = 6101,

    // ==================== 7xxx: Table Session ====================
    /// Table session not found
    TableSessionNotFound = 7001,
    /// Table session is closed
    TableSessionClosed = 7002,
    /// Table already has an active session
    TableSessionExists = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage error
    StorageError = 9002,
    /// External dependency failed (image storage, ...)
    DependencyFailed = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::InvalidTransition => "State transition is not allowed",
            ErrorCode::Conflict => "Operation conflicts with current state",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::InvalidOrderType => "Invalid order type",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderNotCancellable => "Order can no longer be cancelled",
            ErrorCode::OrderStatusRegression => "Order status cannot move backwards",
            ErrorCode::OrderItemNotFound => "Order item not found",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationAlreadyCancelled => "Reservation has already been cancelled",
            ErrorCode::ReservationCompleted => "Reservation has already been completed",
            ErrorCode::InvalidReservationTime => "Reservation time must be HH:mm",

            // Catalog
            ErrorCode::DishNotFound => "Dish not found",
            ErrorCode::DishNotAvailable => "Dish is currently not available",
            ErrorCode::CategoryNotFound => "Dish category not found",

            // Table session
            ErrorCode::TableSessionNotFound => "Table session not found",
            ErrorCode::TableSessionClosed => "Table session is closed",
            ErrorCode::TableSessionExists => "Table already has an active session",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::DependencyFailed => "External dependency failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::InvalidTransition),
            10 => Ok(ErrorCode::Conflict),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::InvalidOrderType),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4005 => Ok(ErrorCode::OrderNotCancellable),
            4006 => Ok(ErrorCode::OrderStatusRegression),
            4007 => Ok(ErrorCode::OrderItemNotFound),

            // Reservation
            4501 => Ok(ErrorCode::ReservationNotFound),
            4502 => Ok(ErrorCode::ReservationAlreadyCancelled),
            4503 => Ok(ErrorCode::ReservationCompleted),
            4504 => Ok(ErrorCode::InvalidReservationTime),

            // Catalog
            6001 => Ok(ErrorCode::DishNotFound),
            6002 => Ok(ErrorCode::DishNotAvailable),
            6101 => Ok(ErrorCode::CategoryNotFound),

            // Table session
            7001 => Ok(ErrorCode::TableSessionNotFound),
            7002 => Ok(ErrorCode::TableSessionClosed),
            7003 => Ok(ErrorCode::TableSessionExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9003 => Ok(ErrorCode::DependencyFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
