//! # Adapters Module
//!
//! Review contract implementations and wallet sessions.

pub mod json_rpc;
pub mod memory_contract;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use json_rpc::{JsonRpcClient, JsonRpcProvider, JsonRpcReviewContract};
pub use memory_contract::InMemoryReviewContract;
pub use session::SessionProvider;
