//! # Domain Entities
//!
//! The card as held in the card book, and its decryption state machine.
//!
//! ```text
//! Unloaded ──publish──▶ Listed ──dispatch──▶ StatsPending ──┬──▶ StatsReady
//!                                                           └──▶ StatsDegraded
//! ```
//!
//! A card without an on-chain id stays `Listed`, as does every card of a
//! pass run without a chain provider. Ready and degraded are
//! terminal for a pass; the next pass starts the card over.

use pr_01_metadata_store::RawCardRecord;
use pr_03_encryption_gateway::{format_average_rating, DecryptedStats, GatewayError};
use shared_types::{Address, OnChainCardId, Timestamp};

/// Why a card's statistics could not be decrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedReason {
    /// The relayer could not be reached.
    ServiceUnavailable,
    /// Any other failure.
    Failed,
}

impl From<&GatewayError> for DegradedReason {
    fn from(err: &GatewayError) -> Self {
        if err.is_service_unavailable() {
            DegradedReason::ServiceUnavailable
        } else {
            DegradedReason::Failed
        }
    }
}

/// Per-card decryption state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatsState {
    /// Built from a record but not yet published.
    Unloaded,
    /// Published; no decryption scheduled.
    Listed,
    /// Background decryption in flight.
    StatsPending,
    /// Decryption succeeded.
    StatsReady(DecryptedStats),
    /// Decryption failed; no automatic retry.
    StatsDegraded(DegradedReason),
}

impl StatsState {
    /// Whether `next` is a legal successor.
    pub fn can_transition_to(&self, next: &StatsState) -> bool {
        matches!(
            (self, next),
            (StatsState::Unloaded, StatsState::Listed)
                | (StatsState::Listed, StatsState::StatsPending)
                | (StatsState::StatsPending, StatsState::StatsReady(_))
                | (StatsState::StatsPending, StatsState::StatsDegraded(_))
        )
    }
}

/// One feedback card.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Metadata store key; the stable identity.
    pub doc_id: String,
    /// On-chain id; absent while creation is unconfirmed.
    pub id: Option<OnChainCardId>,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Creator wallet, if recorded.
    pub creator: Option<Address>,
    /// Creation time in ms.
    pub created_at: Timestamp,
    /// Review counter from the metadata store.
    pub total_reviews: u64,
    /// Decryption state.
    pub stats: StatsState,
    /// Reconciliation pass that published this card.
    pub generation: u64,
}

impl Card {
    /// Build an unloaded card from a raw record; `None` if the record is
    /// missing its key, a non-blank title or a creation time.
    pub fn from_record(record: &RawCardRecord) -> Option<Card> {
        if record.doc_id.is_empty() {
            return None;
        }
        let title = record.title.as_deref().filter(|t| !t.trim().is_empty())?;
        let created_at = record.created_at?;
        Some(Card {
            doc_id: record.doc_id.clone(),
            id: record.on_chain_id(),
            title: title.to_string(),
            description: record.description.clone(),
            creator: record.creator.as_deref().map(Address::new),
            created_at,
            total_reviews: 0,
            stats: StatsState::Unloaded,
            generation: 0,
        })
    }

    /// Whether the creation transaction is still unconfirmed.
    pub fn is_pending(&self) -> bool {
        self.id.is_none()
    }

    /// Decrypted average, 0 unless stats are ready.
    pub fn average_rating(&self) -> f64 {
        match self.stats {
            StatsState::StatsReady(stats) => stats.average,
            _ => 0.0,
        }
    }

    /// Background decryption in flight.
    pub fn is_decrypting(&self) -> bool {
        self.stats == StatsState::StatsPending
    }

    /// Decryption failed.
    pub fn decryption_error(&self) -> bool {
        matches!(self.stats, StatsState::StatsDegraded(_))
    }

    /// Failure reason, when degraded.
    pub fn degraded_reason(&self) -> Option<DegradedReason> {
        match self.stats {
            StatsState::StatsDegraded(reason) => Some(reason),
            _ => None,
        }
    }

    /// Average as display text.
    pub fn formatted_average(&self) -> String {
        format_average_rating(self.average_rating(), self.total_reviews)
    }
}
