//! # Domain Module
//!
//! ABI encoding, contract events, values and errors for the Chain Client.

pub mod abi;
pub mod entities;
pub mod errors;
pub mod events;

pub use entities::*;
pub use errors::*;
pub use events::*;
