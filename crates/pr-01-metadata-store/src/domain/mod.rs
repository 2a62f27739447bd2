//! # Domain Module
//!
//! Records, document paths and errors for the Metadata Store.

pub mod entities;
pub mod errors;
pub mod paths;

pub use entities::*;
pub use errors::*;
pub use paths::*;
