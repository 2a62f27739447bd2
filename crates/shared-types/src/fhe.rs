//! # Homomorphic Evaluation Port
//!
//! The contract never sees plaintexts: it combines ciphertext handles through
//! an FHE coprocessor. This trait is the coprocessor surface the contract
//! simulator consumes; the encryption gateway's local runtime implements it.

use crate::entities::{Address, CiphertextHandle, InputProof};
use thiserror::Error;

/// Coprocessor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The handle was never produced by this coprocessor.
    #[error("Unknown ciphertext handle: {0}")]
    UnknownHandle(CiphertextHandle),
}

/// Homomorphic operations over encrypted 64-bit integers.
pub trait HandleEvaluator: Send + Sync {
    /// Encrypt a public constant (e.g. the initial zero sum, a `+1` count step).
    fn trivial_encrypt(&self, value: u64) -> CiphertextHandle;

    /// Encrypted addition; returns a fresh handle.
    fn add(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EvaluationError>;

    /// Check that `proof` binds `handle` to this contract and user.
    fn verify_input(
        &self,
        handle: &CiphertextHandle,
        proof: &InputProof,
        contract: &Address,
        user: &Address,
    ) -> bool;

    /// Forget a handle nothing references any more. The default keeps it.
    fn release(&self, _handle: &CiphertextHandle) {}
}
