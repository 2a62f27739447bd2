//! # Domain Errors
//!
//! Error types for the Chain Client.

use shared_types::{EvaluationError, OnChainCardId, ParseError, TxHash, Wei};
use thiserror::Error;

/// Chain client error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// No wallet provider is injected.
    #[error("No wallet provider available")]
    NoProvider,

    /// Payable call sent less than the creation fee.
    #[error("Insufficient creation fee: required {required}, provided {provided}")]
    InsufficientFee {
        /// Fee the contract demands.
        required: Wei,
        /// Value attached to the transaction.
        provided: Wei,
    },

    /// Sender cannot cover the transaction value.
    #[error("Insufficient funds: balance {balance}, needed {needed}")]
    InsufficientFunds {
        /// Sender balance.
        balance: Wei,
        /// Value attached to the transaction.
        needed: Wei,
    },

    /// Card id was never created on-chain.
    #[error("Unknown card: {0}")]
    UnknownCard(OnChainCardId),

    /// Encrypted input was not bound to this contract and sender.
    #[error("Input proof rejected for card {0}")]
    InvalidInputProof(OnChainCardId),

    /// Gas ceiling below what execution needs.
    #[error("Out of gas: limit {limit}, required {required}")]
    OutOfGas {
        /// Gas ceiling supplied.
        limit: u64,
        /// Gas execution needs.
        required: u64,
    },

    /// Mined with a failed status.
    #[error("Transaction {0} reverted")]
    TransactionFailed(TxHash),

    /// Receipt did not appear within the polling window.
    #[error("Transaction {0} was not mined in time")]
    ReceiptTimeout(TxHash),

    /// Transport or node error.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Return data did not match the expected ABI layout.
    #[error("ABI decode error: {0}")]
    Decode(String),

    /// Malformed identifier or amount.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Homomorphic evaluation failed inside the contract.
    #[error("Coprocessor error: {0}")]
    Evaluation(#[from] EvaluationError),
}
