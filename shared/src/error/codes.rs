//! Unified error codes for FreshMart
//!
//! This module defines all error codes used by the edge node and surfaced to the
//! storefront, owner dashboard and delivery app. Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Order errors
//! - 5xxx: Delivery errors
//! - 6xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, JavaScript front ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Auth ====================
    /// No agent is logged in on this device
    NotAuthenticated = 1001,
    /// Invalid credentials (agent id / secret)
    InvalidCredentials = 1002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no items
    OrderEmpty = 4007,
    /// Requested status change is not allowed from the current status
    OrderInvalidTransition = 4010,
    /// Order has already been delivered
    OrderAlreadyDelivered = 4011,

    // ==================== 5xxx: Delivery ====================
    /// Delivery agent not found
    AgentNotFound = 5001,
    /// No delivery agent is currently available
    NoAgentsAvailable = 5002,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product price is invalid
    ProductInvalidPrice = 6002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::ValidationFailed => "Validation failed",
            Self::AlreadyExists => "Resource already exists",

            // Auth
            Self::NotAuthenticated => "No delivery agent is logged in",
            Self::InvalidCredentials => "Invalid agent id or password",

            // Order
            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order has no items",
            Self::OrderInvalidTransition => "Order status change not allowed",
            Self::OrderAlreadyDelivered => "Order has already been delivered",

            // Delivery
            Self::AgentNotFound => "Delivery agent not found",
            Self::NoAgentsAvailable => "No delivery agents available",

            // Product
            Self::ProductNotFound => "Product not found",
            Self::ProductInvalidPrice => "Product price must be positive",

            // System
            Self::InternalError => "Internal error",
            Self::NetworkError => "Network error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
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
            2 => Ok(ErrorCode::ValidationFailed),
            4 => Ok(ErrorCode::AlreadyExists),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4010 => Ok(ErrorCode::OrderInvalidTransition),
            4011 => Ok(ErrorCode::OrderAlreadyDelivered),

            // Delivery
            5001 => Ok(ErrorCode::AgentNotFound),
            5002 => Ok(ErrorCode::NoAgentsAvailable),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::OrderInvalidTransition.code(), 4010);
        assert_eq!(ErrorCode::NoAgentsAvailable.code(), 5002);
        assert_eq!(ErrorCode::ProductNotFound.code(), 6001);
        assert_eq!(ErrorCode::ConfigError.code(), 9005);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(2), Ok(ErrorCode::ValidationFailed));
        assert_eq!(ErrorCode::try_from(4011), Ok(ErrorCode::OrderAlreadyDelivered));
        assert_eq!(ErrorCode::try_from(9005), Ok(ErrorCode::ConfigError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(9999), Err(InvalidErrorCode(9999)));
        assert_eq!(
            InvalidErrorCode(9999).to_string(),
            "invalid error code: 9999"
        );
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::NoAgentsAvailable).unwrap();
        assert_eq!(json, "5002");
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }

    #[test]
    fn test_roundtrip() {
        let codes = [
            ErrorCode::AlreadyExists,
            ErrorCode::OrderEmpty,
            ErrorCode::AgentNotFound,
            ErrorCode::ProductInvalidPrice,
            ErrorCode::NetworkError,
        ];
        for code in codes {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::OrderNotFound.to_string(), "4001");
        assert_eq!(ErrorCode::NoAgentsAvailable.message(), "No delivery agents available");
    }
}
