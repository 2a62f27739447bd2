//! # Adapters
//!
//! Wallet session implementations.

pub mod wallet;

pub use wallet::LocalWallet;
