//! # Core Value Objects
//!
//! ## Clusters
//!
//! - **Identity**: [`Address`], [`OnChainCardId`]
//! - **Ciphertexts**: [`CiphertextHandle`], [`InputProof`]
//! - **Transactions**: [`TxHash`], [`Receipt`], [`LogEntry`], [`Wei`]

use std::fmt;
use std::hash::{Hash as StdHash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;
use crate::hashing::keccak256;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

/// A 32-byte word (event topic, storage slot, hash).
pub type Word = [u8; 32];

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Wallet or contract address as reported by the wallet.
///
/// The original spelling is preserved (it is used verbatim as a document key)
/// while equality and hashing are case-insensitive, matching how EVM
/// addresses compare.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string without validating it.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Address as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form, used for comparisons and binding.
    pub fn to_lowercase(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Decode the 20 raw bytes.
    pub fn to_bytes(&self) -> Result<[u8; 20], ParseError> {
        let hex_part = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .ok_or_else(|| ParseError::InvalidAddress(self.0.clone()))?;
        if hex_part.len() != 40 {
            return Err(ParseError::InvalidAddress(self.0.clone()));
        }
        let mut out = [0u8; 20];
        hex::decode_to_slice(hex_part, &mut out)
            .map_err(|_| ParseError::InvalidAddress(self.0.clone()))?;
        Ok(out)
    }

    /// Build from raw bytes (lowercase hex).
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// EIP-55 mixed-case checksum form.
    pub fn to_checksum(&self) -> Result<Address, ParseError> {
        let lower = hex::encode(self.to_bytes()?);
        let digest = keccak256(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                digest[i / 2] >> 4
            } else {
                digest[i / 2] & 0x0f
            };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        Ok(Address(out))
    }

    /// Left-pad the raw address into a 32-byte ABI word.
    pub fn to_word(&self) -> Result<Word, ParseError> {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.to_bytes()?);
        Ok(word)
    }

    /// Decode an ABI word holding an address; the upper 12 bytes must be zero.
    pub fn from_word(word: &Word) -> Option<Address> {
        if word[..12].iter().any(|b| *b != 0) {
            return None;
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Some(Address::from_bytes(bytes))
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl StdHash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_lowercase().hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Address::new(value)
    }
}

/// Card identifier assigned by the contract on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OnChainCardId(pub u64);

impl OnChainCardId {
    /// ABI encoding (uint256).
    pub fn to_word(self) -> Word {
        let mut word = [0u8; 32];
        U256::from(self.0).to_big_endian(&mut word);
        word
    }

    /// Decode a uint256 word; fails if the value exceeds `u64`.
    pub fn from_word(word: &Word) -> Result<Self, ParseError> {
        u256_to_u64(U256::from_big_endian(word)).map(OnChainCardId)
    }
}

impl fmt::Display for OnChainCardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OnChainCardId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidCardId(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(OnChainCardId)
            .map_err(|_| ParseError::InvalidCardId(s.to_string()))
    }
}

// =============================================================================
// CLUSTER B: CIPHERTEXTS
// =============================================================================

/// Opaque 32-byte reference to an encrypted value held by the coprocessor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CiphertextHandle(pub Word);

impl CiphertextHandle {
    /// Raw bytes.
    pub fn as_bytes(&self) -> &Word {
        &self.0
    }

    /// The all-zero handle a contract returns for uninitialized state.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle({})", self)
    }
}

impl FromStr for CiphertextHandle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| ParseError::InvalidHandle(s.to_string()))?;
        if hex_part.len() != 64 {
            return Err(ParseError::InvalidHandle(s.to_string()));
        }
        let mut out = [0u8; 32];
        hex::decode_to_slice(hex_part, &mut out)
            .map_err(|_| ParseError::InvalidHandle(s.to_string()))?;
        Ok(CiphertextHandle(out))
    }
}

/// Zero-knowledge proof accompanying an encrypted input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputProof(pub Vec<u8>);

impl InputProof {
    /// `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

// =============================================================================
// CLUSTER C: TRANSACTIONS
// =============================================================================

/// Transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TxHash(pub Word);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self)
    }
}

/// One event log emitted during a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Emitting contract.
    pub address: Address,
    /// Indexed topics; topic 0 is the event signature hash.
    pub topics: Vec<Word>,
    /// ABI-encoded non-indexed arguments.
    pub data: Vec<u8>,
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block the transaction was mined in.
    pub block_number: u64,
    /// Execution succeeded.
    pub success: bool,
    /// Gas consumed.
    pub gas_used: u64,
    /// Logs in emission order.
    pub logs: Vec<LogEntry>,
}

/// Amount of ether in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Wei(pub U256);

/// Wei per ether.
const ETHER_DECIMALS: usize = 18;

impl Wei {
    /// Zero wei.
    pub fn zero() -> Self {
        Wei(U256::zero())
    }

    /// Parse a decimal ether string such as `"0.15"`.
    pub fn from_ether(amount: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidAmount(amount.to_string());
        let trimmed = amount.trim();
        let (int_part, frac_part) = match trimmed.split_once('.') {
            Some((i, f)) => (i, f),
            None => (trimmed, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let digits_ok = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !digits_ok(int_part) || !digits_ok(frac_part) || frac_part.len() > ETHER_DECIMALS {
            return Err(invalid());
        }

        let int_value = if int_part.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(int_part).map_err(|_| invalid())?
        };
        let padded = format!("{:0<width$}", frac_part, width = ETHER_DECIMALS);
        let frac_value = U256::from_dec_str(&padded).map_err(|_| invalid())?;

        int_value
            .checked_mul(U256::exp10(ETHER_DECIMALS))
            .and_then(|v| v.checked_add(frac_value))
            .map(Wei)
            .ok_or_else(invalid)
    }

    /// Decimal ether string, at least one fractional digit (`"0.15"`, `"1.0"`).
    pub fn to_ether_string(&self) -> String {
        let unit = U256::exp10(ETHER_DECIMALS);
        let int_part = self.0 / unit;
        let frac_part = self.0 % unit;
        let frac = format!("{:0>width$}", frac_part.to_string(), width = ETHER_DECIMALS);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            format!("{}.0", int_part)
        } else {
            format!("{}.{}", int_part, frac)
        }
    }

    /// ABI encoding (uint256).
    pub fn to_word(self) -> Word {
        let mut word = [0u8; 32];
        self.0.to_big_endian(&mut word);
        word
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

/// Narrow a 256-bit value to `u64`.
pub fn u256_to_u64(value: U256) -> Result<u64, ParseError> {
    if value > U256::from(u64::MAX) {
        return Err(ParseError::Overflow { target: "u64" });
    }
    Ok(value.low_u64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_address_case_insensitive_equality() {
        let a = Address::new("0xABC");
        let b = Address::new("0xabc");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "0xABC");

        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_address_checksum() {
        // EIP-55 reference vector
        let addr = Address::new("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        assert_eq!(
            addr.to_checksum().unwrap().as_str(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_address_rejects_short_hex() {
        assert!(matches!(
            Address::new("0xABC").to_bytes(),
            Err(ParseError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_address_word_roundtrip_rejects_dirty_padding() {
        let addr = Address::new("0x00000000000000000000000000000000000000ff");
        let mut word = addr.to_word().unwrap();
        assert_eq!(Address::from_word(&word), Some(addr));
        word[0] = 1;
        assert_eq!(Address::from_word(&word), None);
    }

    #[test]
    fn test_card_id_parse() {
        assert_eq!("7".parse::<OnChainCardId>().unwrap(), OnChainCardId(7));
        assert_eq!(" 12 ".parse::<OnChainCardId>().unwrap(), OnChainCardId(12));
        assert!("".parse::<OnChainCardId>().is_err());
        assert!("-1".parse::<OnChainCardId>().is_err());
        assert!("0x7".parse::<OnChainCardId>().is_err());
    }

    #[test]
    fn test_card_id_word_overflow() {
        let word = [0xFFu8; 32];
        assert!(matches!(
            OnChainCardId::from_word(&word),
            Err(ParseError::Overflow { .. })
        ));
    }

    #[test]
    fn test_handle_parse_and_display() {
        let text = format!("0x{}", "ab".repeat(32));
        let handle: CiphertextHandle = text.parse().unwrap();
        assert_eq!(handle.to_string(), text);
        assert!("0x1234".parse::<CiphertextHandle>().is_err());
        assert!("ab".repeat(33).parse::<CiphertextHandle>().is_err());
    }

    #[test]
    fn test_wei_from_ether() {
        let fee = Wei::from_ether("0.15").unwrap();
        assert_eq!(fee.0, U256::from(150_000_000_000_000_000u64));
        assert_eq!(Wei::from_ether("1").unwrap().0, U256::exp10(18));
        assert_eq!(Wei::from_ether(".5").unwrap().0, U256::from(5u64) * U256::exp10(17));
        assert!(Wei::from_ether("").is_err());
        assert!(Wei::from_ether("1.2.3").is_err());
        assert!(Wei::from_ether("-1").is_err());
        assert!(Wei::from_ether("0.0000000000000000001").is_err());
    }

    #[test]
    fn test_wei_to_ether_string() {
        assert_eq!(Wei::zero().to_ether_string(), "0.0");
        assert_eq!(Wei(U256::exp10(18)).to_ether_string(), "1.0");
        assert_eq!(
            Wei(U256::from(150_000_000_000_000_000u64)).to_ether_string(),
            "0.15"
        );
        assert_eq!(Wei(U256::from(1u64)).to_ether_string(), "0.000000000000000001");
    }

    #[test]
    fn test_address_serializes_transparently() {
        let json = serde_json::to_string(&Address::new("0xABC")).unwrap();
        assert_eq!(json, "\"0xABC\"");
    }

    proptest! {
        #[test]
        fn prop_card_id_display_parses_back(id in any::<u64>()) {
            let parsed: OnChainCardId = OnChainCardId(id).to_string().parse().unwrap();
            prop_assert_eq!(parsed, OnChainCardId(id));
        }

        #[test]
        fn prop_card_id_word_decodes(id in any::<u64>()) {
            prop_assert_eq!(OnChainCardId::from_word(&OnChainCardId(id).to_word()).unwrap(), OnChainCardId(id));
        }

        #[test]
        fn prop_ether_string_is_stable(milli in 0u64..10_000_000) {
            let wei = Wei(U256::from(milli) * U256::exp10(15));
            let reparsed = Wei::from_ether(&wei.to_ether_string()).unwrap();
            prop_assert_eq!(reparsed, wei);
        }
    }
}
