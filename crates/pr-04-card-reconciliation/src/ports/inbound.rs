//! # Inbound Ports
//!
//! API trait defining what the Card Reconciliation subsystem can do.

use async_trait::async_trait;

use crate::application::{FanOut, OrchestratorSnapshot};
use crate::domain::{
    Card, CreateCardData, CreateOutcome, Notice, OrchestratorError, RatingOutcome,
    SubmitReviewData,
};

/// Card reconciliation API - inbound port.
///
/// Workflows never return errors for backend failures: those end as a
/// [`Notice`] and a `Failed` outcome. Only `reconcile` and `initialize`
/// surface errors, and a failed pass leaves the previous list published.
#[async_trait]
pub trait CardReconciliationApi: Send + Sync {
    /// Initialize the encryption gateway (failure is logged), fetch the
    /// creation fee, then run a first pass.
    async fn initialize(&self) -> Result<FanOut, OrchestratorError>;

    /// Rebuild the card list and dispatch background decryption.
    async fn reconcile(&self) -> Result<FanOut, OrchestratorError>;

    /// Create a card in the metadata store and on-chain.
    async fn create_card(&self, data: CreateCardData) -> CreateOutcome;

    /// Encrypt and submit a rating for the selected card.
    async fn submit_rating(&self, data: SubmitReviewData) -> RatingOutcome;

    /// Re-read the on-chain creation fee.
    async fn refresh_creation_fee(&self) -> Option<String>;

    /// Re-read the connected wallet's balance.
    async fn refresh_balance(&self) -> Option<String>;

    /// Open a card for review; returns `false` for an unknown key.
    async fn select_card(&self, doc_id: &str) -> bool;

    /// Close the review form.
    fn clear_selection(&self);

    /// Cards in display order.
    fn visible_cards(&self) -> Vec<Card>;

    /// Visible cards whose title contains `query`, ignoring case.
    fn search(&self, query: &str) -> Vec<Card>;

    /// Everything a renderer needs, copied out of the locks.
    fn snapshot(&self) -> OrchestratorSnapshot;

    /// Drain queued notices, oldest first.
    fn take_notices(&self) -> Vec<Notice>;
}
