//! # Contract ABI
//!
//! Minimal Solidity ABI encoding for the four review contract functions.
//! Only static words and a single trailing `bytes` argument are needed.

use shared_types::{
    hashing::keccak256, CiphertextHandle, InputProof, OnChainCardId, Word, U256,
};

use super::errors::ChainError;

/// `creationFee() -> uint256`
pub const CREATION_FEE_SIGNATURE: &str = "creationFee()";

/// `createReviewCard() payable`
pub const CREATE_REVIEW_CARD_SIGNATURE: &str = "createReviewCard()";

/// `submitEncryptedRating(uint256 cardId, bytes32 rating, bytes proof)`
pub const SUBMIT_ENCRYPTED_RATING_SIGNATURE: &str = "submitEncryptedRating(uint256,bytes32,bytes)";

/// `getEncryptedStats(uint256 cardId) -> (bytes32 sum, bytes32 count)`
pub const GET_ENCRYPTED_STATS_SIGNATURE: &str = "getEncryptedStats(uint256)";

/// ABI word size.
pub const WORD_SIZE: usize = 32;

/// Four-byte function selector.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for a function taking only static 32-byte arguments.
pub fn encode_call(signature: &str, args: &[Word]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD_SIZE);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(arg);
    }
    data
}

/// `uint256` word.
pub fn uint_word(value: U256) -> Word {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Calldata for `submitEncryptedRating`.
///
/// Head: card id, handle, offset of the proof. Tail: proof length followed by
/// the proof bytes right-padded to a whole word.
pub fn encode_submit_encrypted_rating(
    card_id: OnChainCardId,
    handle: &CiphertextHandle,
    proof: &InputProof,
) -> Vec<u8> {
    let head = [
        card_id.to_word(),
        *handle.as_bytes(),
        uint_word(U256::from(3 * WORD_SIZE)),
    ];
    let mut data = encode_call(SUBMIT_ENCRYPTED_RATING_SIGNATURE, &head);
    data.extend_from_slice(&uint_word(U256::from(proof.0.len())));
    data.extend_from_slice(&proof.0);
    let padding = (WORD_SIZE - proof.0.len() % WORD_SIZE) % WORD_SIZE;
    data.extend(std::iter::repeat(0u8).take(padding));
    data
}

/// Split return data into words; fails unless it is word-aligned.
pub fn decode_words(data: &[u8]) -> Result<Vec<Word>, ChainError> {
    if data.len() % WORD_SIZE != 0 {
        return Err(ChainError::Decode(format!(
            "return data of {} bytes is not word-aligned",
            data.len()
        )));
    }
    Ok(data
        .chunks_exact(WORD_SIZE)
        .map(|chunk| {
            let mut word = [0u8; 32];
            word.copy_from_slice(chunk);
            word
        })
        .collect())
}

/// Decode return data holding exactly `N` words.
pub fn decode_exact<const N: usize>(data: &[u8]) -> Result<[Word; N], ChainError> {
    let words = decode_words(data)?;
    let got = words.len();
    words
        .try_into()
        .map_err(|_| ChainError::Decode(format!("expected {} words, got {}", N, got)))
}
