//! # Shared Types Crate
//!
//! Value objects used across the Private-Ratings subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifiers that cross a subsystem boundary
//!   (addresses, on-chain ids, ciphertext handles) are defined once, here.
//! - **Parse, don't validate**: every identifier parsed from text goes through
//!   `FromStr` and returns a typed [`ParseError`] on malformed input.
//! - **Opaque ciphertexts**: a [`CiphertextHandle`] is a 32-byte reference;
//!   nothing in this crate knows how to decrypt it.

pub mod entities;
pub mod errors;
pub mod fhe;
pub mod hashing;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use fhe::{EvaluationError, HandleEvaluator};
pub use hashing::keccak256;
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource, Timestamp};
