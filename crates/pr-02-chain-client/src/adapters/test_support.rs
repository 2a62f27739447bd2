//! Plaintext-backed coprocessor double for adapter and service tests.

use parking_lot::Mutex;
use shared_types::hashing::keccak256_many;
use shared_types::{Address, CiphertextHandle, EvaluationError, HandleEvaluator, InputProof};
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct PlainEvaluator {
    values: Mutex<HashMap<CiphertextHandle, u64>>,
}

impl PlainEvaluator {
    fn store(&self, value: u64) -> CiphertextHandle {
        let mut values = self.values.lock();
        let handle = CiphertextHandle(keccak256_many(&[
            &(values.len() as u64).to_be_bytes(),
            &value.to_be_bytes(),
        ]));
        values.insert(handle, value);
        handle
    }

    fn proof(handle: &CiphertextHandle, contract: &Address, user: &Address) -> InputProof {
        InputProof(
            keccak256_many(&[
                handle.as_bytes(),
                contract.to_lowercase().as_bytes(),
                user.to_lowercase().as_bytes(),
            ])
            .to_vec(),
        )
    }

    pub(crate) fn encrypt_for(
        &self,
        value: u64,
        contract: &Address,
        user: &Address,
    ) -> (CiphertextHandle, InputProof) {
        let handle = self.store(value);
        let proof = Self::proof(&handle, contract, user);
        (handle, proof)
    }

    pub(crate) fn reveal(&self, handle: &CiphertextHandle) -> Option<u64> {
        self.values.lock().get(handle).copied()
    }
}

impl HandleEvaluator for PlainEvaluator {
    fn trivial_encrypt(&self, value: u64) -> CiphertextHandle {
        self.store(value)
    }

    fn add(
        &self,
        lhs: &CiphertextHandle,
        rhs: &CiphertextHandle,
    ) -> Result<CiphertextHandle, EvaluationError> {
        let a = self.reveal(lhs).ok_or(EvaluationError::UnknownHandle(*lhs))?;
        let b = self.reveal(rhs).ok_or(EvaluationError::UnknownHandle(*rhs))?;
        Ok(self.store(a.wrapping_add(b)))
    }

    fn verify_input(
        &self,
        handle: &CiphertextHandle,
        proof: &InputProof,
        contract: &Address,
        user: &Address,
    ) -> bool {
        self.reveal(handle).is_some() && *proof == Self::proof(handle, contract, user)
    }
}
