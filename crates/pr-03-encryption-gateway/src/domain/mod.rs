//! # Domain Module
//!
//! Network binding, encrypted inputs, decrypted aggregates and errors.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
