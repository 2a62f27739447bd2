//! # Domain Value Objects
//!
//! Workflow inputs, outcomes, review status and user-facing notices.

use shared_types::OnChainCardId;

use super::errors::OrchestratorError;

/// Lowest star rating.
pub const MIN_RATING: u8 = 1;

/// Highest star rating.
pub const MAX_RATING: u8 = 5;

/// Progress of the submit-rating workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Building the encrypted input.
    Encrypting,
    /// Waiting for the rating transaction.
    Reviewing,
}

impl ReviewStatus {
    /// Status line for the review form.
    pub fn label(&self) -> &'static str {
        match self {
            ReviewStatus::Idle => "Submit rating",
            ReviewStatus::Encrypting => "Encrypting rating...",
            ReviewStatus::Reviewing => "Submitting to chain...",
        }
    }
}

/// Kind of toast notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    /// A workflow needed a wallet.
    ConnectWallet,
    /// Card written to the store; chain confirmation outstanding.
    CardPending,
    /// Card id recovered and backfilled.
    CardConfirmed,
    /// Creation mined but no matching event found.
    EventNotFound,
    /// Rating stored on-chain and recorded.
    RatingSubmitted,
    /// Workflow failed.
    Error,
}

/// A toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Kind.
    pub kind: NoticeKind,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// "Connect your wallet first!"
    pub fn connect_wallet() -> Self {
        Self {
            kind: NoticeKind::ConnectWallet,
            message: "Connect your wallet first!".to_string(),
        }
    }

    /// Card written, awaiting the chain.
    pub fn card_pending() -> Self {
        Self {
            kind: NoticeKind::CardPending,
            message: "Card created! Waiting for on-chain confirmation...".to_string(),
        }
    }

    /// Card confirmed.
    pub fn card_confirmed() -> Self {
        Self {
            kind: NoticeKind::CardConfirmed,
            message: "Card confirmed on-chain!".to_string(),
        }
    }

    /// Creation event missing from the receipt.
    pub fn event_not_found() -> Self {
        Self {
            kind: NoticeKind::EventNotFound,
            message: "On-chain card creation event not found.".to_string(),
        }
    }

    /// Rating accepted.
    pub fn rating_submitted() -> Self {
        Self {
            kind: NoticeKind::RatingSubmitted,
            message: "Rating submitted!".to_string(),
        }
    }

    /// Workflow error with the underlying text.
    pub fn error(context: &str, err: &OrchestratorError) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: format!("{}: {}", context, err),
        }
    }
}

/// Create-card form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCardData {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Trimmed description; `None` when blank.
    pub description: Option<String>,
}

impl CreateCardData {
    /// Validate form input.
    pub fn new(title: &str, description: Option<&str>) -> Result<Self, OrchestratorError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(OrchestratorError::Validation("title is required".to_string()));
        }
        Ok(Self {
            title: title.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        })
    }
}

/// Review form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReviewData {
    /// Stars, 1 to 5.
    pub rating: u8,
}

impl SubmitReviewData {
    /// Validate a star rating.
    pub fn new(rating: u8) -> Result<Self, OrchestratorError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(OrchestratorError::Validation(format!(
                "rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, rating
            )));
        }
        Ok(Self { rating })
    }
}

/// Result of the create-card workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// No wallet; a connection was requested.
    WalletRequired,
    /// Created and backfilled.
    Confirmed {
        /// Metadata store key.
        doc_id: String,
        /// On-chain id.
        card_id: OnChainCardId,
    },
    /// Mined, but the record keeps an empty on-chain id.
    EventNotFound {
        /// Metadata store key of the orphaned record.
        doc_id: String,
    },
    /// Failed; the message was shown as a notice.
    Failed(String),
}

/// Result of the submit-rating workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingOutcome {
    /// Preconditions not met; nothing happened.
    Skipped,
    /// Stored on-chain and recorded.
    Submitted,
    /// Failed; the message was shown as a notice.
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_card_data_validation() {
        assert!(CreateCardData::new("   ", None).is_err());
        let data = CreateCardData::new("  Coffee quality ", Some("  ")).unwrap();
        assert_eq!(data.title, "Coffee quality");
        assert_eq!(data.description, None);
    }

    #[test]
    fn test_rating_bounds() {
        assert!(SubmitReviewData::new(0).is_err());
        assert!(SubmitReviewData::new(6).is_err());
        for stars in MIN_RATING..=MAX_RATING {
            assert_eq!(SubmitReviewData::new(stars).unwrap().rating, stars);
        }
    }

    #[test]
    fn test_error_notice_interpolates() {
        let notice = Notice::error(
            "Error creating card",
            &OrchestratorError::Validation("boom".to_string()),
        );
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Error creating card: Invalid input: boom");
    }
}
