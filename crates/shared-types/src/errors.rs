//! # Error Types
//!
//! Parsing errors for the shared value objects.

use thiserror::Error;

/// Errors raised when a textual identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Address is not `0x` followed by 40 hex digits.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// On-chain card id is not a base-10 unsigned integer.
    #[error("Invalid on-chain card id: {0:?}")]
    InvalidCardId(String),

    /// Ciphertext handle is not `0x` followed by 64 hex digits.
    #[error("Invalid ciphertext handle: {0}")]
    InvalidHandle(String),

    /// Ether amount is not a non-negative decimal with at most 18 fractional digits.
    #[error("Invalid ether amount: {0:?}")]
    InvalidAmount(String),

    /// A 256-bit word does not fit the target integer.
    #[error("Value overflows {target}")]
    Overflow {
        /// Name of the integer type that overflowed.
        target: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_card_id_message() {
        let err = ParseError::InvalidCardId("abc".to_string());
        assert!(err.to_string().contains("\"abc\""));
    }

    #[test]
    fn test_overflow_message() {
        let err = ParseError::Overflow { target: "u64" };
        assert_eq!(err.to_string(), "Value overflows u64");
    }
}
