//! # Contract Events
//!
//! Typed decoding of `CardCreated(address indexed creator, uint256 cardId)`.
//!
//! Decoding fails closed: a log is only accepted when it was emitted by the
//! configured contract, carries exactly the signature topic plus one indexed
//! creator topic holding a well-formed address, and its data is a single
//! 32-byte word that fits an on-chain card id.

use shared_types::{keccak256, Address, LogEntry, OnChainCardId, ParseError, Receipt, Word};

/// Canonical event signature.
pub const CARD_CREATED_SIGNATURE: &str = "CardCreated(address,uint256)";

/// `topic0` of every `CardCreated` log.
pub fn card_created_topic() -> Word {
    keccak256(CARD_CREATED_SIGNATURE.as_bytes())
}

/// A decoded `CardCreated` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardCreated {
    /// Account that paid for the card.
    pub creator: Address,
    /// Id assigned by the contract.
    pub card_id: OnChainCardId,
}

impl CardCreated {
    /// Decode one log emitted by `contract`; `None` for anything else.
    pub fn decode(log: &LogEntry, contract: &Address) -> Option<Self> {
        if log.address != *contract {
            return None;
        }
        let [topic0, creator_topic] = log.topics.as_slice() else {
            return None;
        };
        if *topic0 != card_created_topic() {
            return None;
        }
        let creator = Address::from_word(creator_topic)?;
        let data: Word = log.data.as_slice().try_into().ok()?;
        let card_id = OnChainCardId::from_word(&data).ok()?;
        Some(Self { creator, card_id })
    }

    /// Encode as a log emitted by `contract`.
    pub fn to_log(&self, contract: &Address) -> Result<LogEntry, ParseError> {
        Ok(LogEntry {
            address: contract.clone(),
            topics: vec![card_created_topic(), self.creator.to_word()?],
            data: self.card_id.to_word().to_vec(),
        })
    }
}

/// Card id created by `creator` in this receipt; the first matching log wins.
pub fn find_card_created(
    receipt: &Receipt,
    contract: &Address,
    creator: &Address,
) -> Option<OnChainCardId> {
    receipt
        .logs
        .iter()
        .filter_map(|log| CardCreated::decode(log, contract))
        .find(|event| event.creator == *creator)
        .map(|event| event.card_id)
}
