//! # Card Orchestrator
//!
//! Application service owning the card book and the UI-facing state.
//!
//! A reconciliation pass reserves a generation, pulls every record, fetches
//! review counts concurrently and publishes the result. Cards with an
//! on-chain id then get one spawned decryption task each. A task writes its
//! result by `doc_id`, and only while the card still carries the task's
//! generation, so passes may overlap freely.
//!
//! Locks (`parking_lot`) are taken for short synchronous sections and never
//! held across an `.await`.

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::fanout::FanOut;
use crate::config::RatingsConfig;
use crate::domain::{
    Card, CardBook, CreateCardData, CreateOutcome, DegradedReason, Notice, OrchestratorError,
    RatingOutcome, ReviewStatus, StatsState, SubmitReviewData, WalletError,
};
use crate::ports::{
    CardReconciliationApi, ChainClientApi, EncryptionGatewayApi, MetadataStoreApi, WalletSession,
};
use pr_01_metadata_store::{NewCardRecord, RatingRecord};
use pr_02_chain_client::ChainError;
use shared_types::{Address, OnChainCardId, Receipt, SystemTimeSource, TimeSource};

/// Notices kept before the oldest is dropped.
const MAX_QUEUED_NOTICES: usize = 32;

/// Mutable state behind the forms and toasts.
#[derive(Debug, Default)]
struct UiState {
    loading_passes: usize,
    is_creating: bool,
    pending_doc_id: Option<String>,
    review_status: ReviewStatus,
    selected: Option<String>,
    has_voted: bool,
    creation_fee: Option<String>,
    balance: Option<String>,
    notices: VecDeque<Notice>,
}

/// Resets a piece of [`UiState`] when dropped, whatever path the workflow took.
struct UiGuard<'a> {
    ui: &'a RwLock<UiState>,
    reset: fn(&mut UiState),
}

impl Drop for UiGuard<'_> {
    fn drop(&mut self) {
        let mut ui = self.ui.write();
        (self.reset)(&mut *ui);
    }
}

/// Copy of everything a renderer shows.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorSnapshot {
    /// Cards in display order.
    pub cards: Vec<Card>,
    /// Connected account.
    pub wallet: Option<Address>,
    /// Fee the next creation will send, in ether.
    pub creation_fee: String,
    /// Connected account's balance in ether.
    pub balance: Option<String>,
    /// A reconciliation pass is running.
    pub is_loading: bool,
    /// The create-card workflow is running.
    pub is_creating: bool,
    /// Record written by the running create-card workflow.
    pub pending_doc_id: Option<String>,
    /// Review workflow progress.
    pub review_status: ReviewStatus,
    /// Card open in the review form.
    pub selected: Option<Card>,
    /// The connected account already rated the selected card.
    pub has_voted: bool,
    /// The FHE gateway has an instance.
    pub gateway_ready: bool,
}

/// Card reconciliation orchestrator.
pub struct CardOrchestrator<S, C, G, W> {
    config: RatingsConfig,
    store: Arc<S>,
    chain: Arc<C>,
    gateway: Arc<G>,
    wallet: Arc<W>,
    time: Arc<dyn TimeSource>,
    book: Arc<RwLock<CardBook>>,
    ui: RwLock<UiState>,
}

impl<S, C, G, W> CardOrchestrator<S, C, G, W>
where
    S: MetadataStoreApi + 'static,
    C: ChainClientApi + 'static,
    G: EncryptionGatewayApi + 'static,
    W: WalletSession + 'static,
{
    /// Create an orchestrator with an empty card book.
    pub fn new(
        config: RatingsConfig,
        store: Arc<S>,
        chain: Arc<C>,
        gateway: Arc<G>,
        wallet: Arc<W>,
    ) -> Self {
        Self {
            config,
            store,
            chain,
            gateway,
            wallet,
            time: Arc::new(SystemTimeSource),
            book: Arc::new(RwLock::new(CardBook::new())),
            ui: RwLock::new(UiState::default()),
        }
    }

    /// Use a different clock for record timestamps.
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &RatingsConfig {
        &self.config
    }

    /// Wallet session.
    pub fn wallet(&self) -> &Arc<W> {
        &self.wallet
    }

    /// Metadata store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Chain client.
    pub fn chain(&self) -> &Arc<C> {
        &self.chain
    }

    /// Encryption gateway.
    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// One card by key.
    pub fn card(&self, doc_id: &str) -> Option<Card> {
        self.book.read().get(doc_id).cloned()
    }

    /// Fee the next creation sends: the last value read from the chain, or
    /// the configured default.
    pub fn creation_fee(&self) -> String {
        self.ui
            .read()
            .creation_fee
            .clone()
            .unwrap_or_else(|| self.config.default_creation_fee.clone())
    }

    /// The connected account already rated the selected card.
    pub fn has_voted(&self) -> bool {
        self.ui.read().has_voted
    }

    /// Review workflow progress.
    pub fn review_status(&self) -> ReviewStatus {
        self.ui.read().review_status
    }

    /// A reconciliation pass is running.
    pub fn is_loading(&self) -> bool {
        self.ui.read().loading_passes > 0
    }

    /// The create-card workflow is running.
    pub fn is_creating(&self) -> bool {
        self.ui.read().is_creating
    }

    fn connected_account(&self) -> Result<Address, WalletError> {
        self.wallet.address().ok_or(WalletError::NotConnected)
    }

    fn track(&self, set: fn(&mut UiState), reset: fn(&mut UiState)) -> UiGuard<'_> {
        set(&mut *self.ui.write());
        UiGuard {
            ui: &self.ui,
            reset,
        }
    }

    fn notify(&self, notice: Notice) {
        debug!("[pr-04] Notice: {}", notice.message);
        let mut ui = self.ui.write();
        if ui.notices.len() == MAX_QUEUED_NOTICES {
            ui.notices.pop_front();
        }
        ui.notices.push_back(notice);
    }

    fn fail(&self, context: &str, err: &OrchestratorError) -> String {
        let notice = Notice::error(context, err);
        let message = notice.message.clone();
        self.notify(notice);
        message
    }

    /// Reconcile for a workflow that has already succeeded; a failed pass
    /// is logged and the old list stays.
    async fn refresh_list(&self) {
        if let Err(e) = self.reconcile().await {
            warn!("[pr-04] Card list refresh failed: {}", e);
        }
    }

    fn dispatch_decryption(&self, generation: u64) -> FanOut {
        let pending: Vec<(String, OnChainCardId)> = self
            .book
            .read()
            .visible()
            .into_iter()
            .filter(|card| card.generation == generation && card.is_decrypting())
            .filter_map(|card| card.id.map(|id| (card.doc_id, id)))
            .collect();

        let mut fan_out = FanOut::empty(generation);
        for (doc_id, card_id) in pending {
            let task = tokio::spawn(decrypt_card(
                Arc::clone(&self.chain),
                Arc::clone(&self.gateway),
                Arc::clone(&self.book),
                doc_id.clone(),
                card_id,
                generation,
            ));
            fan_out.push(doc_id, task);
        }
        fan_out
    }

    fn selected_target(&self) -> Option<(String, OnChainCardId)> {
        let doc_id = self.ui.read().selected.clone()?;
        let card_id = self.book.read().get(&doc_id)?.id?;
        Some((doc_id, card_id))
    }

    async fn run_create(
        &self,
        data: &CreateCardData,
        creator: &Address,
    ) -> Result<CreateOutcome, OrchestratorError> {
        let record = NewCardRecord {
            title: data.title.clone(),
            description: data.description.clone(),
            creator: creator.clone(),
            created_at: self.time.now(),
        };
        let doc_id = self.store.create_card_record(record).await?;
        info!("[pr-04] Card record {} written, creating on-chain", doc_id);
        self.ui.write().pending_doc_id = Some(doc_id.clone());
        self.notify(Notice::card_pending());
        self.refresh_list().await;

        let cached_fee = self.ui.read().creation_fee.clone();
        let fee = match cached_fee {
            Some(fee) => fee,
            None => self
                .refresh_creation_fee()
                .await
                .unwrap_or_else(|| self.config.default_creation_fee.clone()),
        };
        let receipt = ensure_success(self.chain.create_card(creator, &fee).await?)?;

        match self.chain.find_card_created(&receipt, creator) {
            Some(card_id) => {
                self.store.backfill_on_chain_id(&doc_id, card_id).await?;
                info!("[pr-04] Card {} confirmed as on-chain card {}", doc_id, card_id);
                self.notify(Notice::card_confirmed());
                self.refresh_list().await;
                Ok(CreateOutcome::Confirmed { doc_id, card_id })
            }
            None => {
                warn!(
                    "[pr-04] No CardCreated event for {} in tx {}; record {} keeps an empty id",
                    creator, receipt.tx_hash, doc_id
                );
                self.notify(Notice::event_not_found());
                Ok(CreateOutcome::EventNotFound { doc_id })
            }
        }
    }

    async fn run_rating(
        &self,
        user: &Address,
        card_id: OnChainCardId,
        data: SubmitReviewData,
    ) -> Result<(), OrchestratorError> {
        let input = self
            .gateway
            .encrypt(u64::from(data.rating), self.chain.contract_address(), user)
            .await?;

        self.ui.write().review_status = ReviewStatus::Reviewing;
        let receipt = ensure_success(
            self.chain
                .submit_rating(user, card_id, &input.handle, &input.proof)
                .await?,
        )?;
        debug!(
            "[pr-04] Rating for card {} mined in block {}",
            card_id, receipt.block_number
        );

        self.store
            .record_rating(&RatingRecord {
                card_id,
                user_id: user.clone(),
                rating: data.rating,
                created_at: self.time.now(),
            })
            .await?;
        Ok(())
    }
}

fn ensure_success(receipt: Receipt) -> Result<Receipt, OrchestratorError> {
    if receipt.success {
        Ok(receipt)
    } else {
        Err(ChainError::TransactionFailed(receipt.tx_hash).into())
    }
}

/// One background decryption. Writes `StatsReady` or `StatsDegraded` into
/// the card unless a newer pass replaced it.
async fn decrypt_card<C, G>(
    chain: Arc<C>,
    gateway: Arc<G>,
    book: Arc<RwLock<CardBook>>,
    doc_id: String,
    card_id: OnChainCardId,
    generation: u64,
) where
    C: ChainClientApi + 'static,
    G: EncryptionGatewayApi + 'static,
{
    let next = match gateway.try_decrypt_stats(card_id, &*chain).await {
        Ok(stats) => StatsState::StatsReady(stats),
        Err(e) => {
            let reason = DegradedReason::from(&e);
            warn!(
                "[pr-04] Decryption of card {} failed ({:?}): {}",
                card_id, reason, e
            );
            StatsState::StatsDegraded(reason)
        }
    };

    let applied = book.write().apply_stats(&doc_id, generation, next);
    if !applied {
        debug!(
            "[pr-04] Dropped stale stats for {} from pass {}",
            doc_id, generation
        );
    }
}

#[async_trait]
impl<S, C, G, W> CardReconciliationApi for CardOrchestrator<S, C, G, W>
where
    S: MetadataStoreApi + 'static,
    C: ChainClientApi + 'static,
    G: EncryptionGatewayApi + 'static,
    W: WalletSession + 'static,
{
    async fn initialize(&self) -> Result<FanOut, OrchestratorError> {
        match self.gateway.initialize().await {
            Ok(()) => info!("[pr-04] Encryption gateway ready"),
            Err(e) => warn!("[pr-04] Encryption gateway unavailable: {}", e),
        }
        self.refresh_creation_fee().await;
        self.refresh_balance().await;
        self.reconcile().await
    }

    async fn reconcile(&self) -> Result<FanOut, OrchestratorError> {
        let generation = self.book.write().begin_pass();
        let _loading = self.track(
            |ui| ui.loading_passes += 1,
            |ui| ui.loading_passes = ui.loading_passes.saturating_sub(1),
        );
        debug!("[pr-04] Reconciliation pass {} started", generation);

        let records = self.store.list_all_card_records().await?;
        let mut cards: Vec<Card> = records.iter().filter_map(Card::from_record).collect();
        if cards.len() < records.len() {
            debug!(
                "[pr-04] Discarded {} malformed card records",
                records.len() - cards.len()
            );
        }

        let store = &self.store;
        let counts = join_all(cards.iter().map(|card| {
            let id = card.id;
            async move {
                match id {
                    Some(id) => store.get_rating_count(id).await,
                    None => Ok(0),
                }
            }
        }))
        .await;
        for (card, count) in cards.iter_mut().zip(counts) {
            card.total_reviews = count?;
        }

        let total = cards.len();
        let published = if self.chain.has_provider() {
            self.book.write().publish(generation, cards)
        } else {
            debug!("[pr-04] No provider; pass {} lists cards without stats", generation);
            self.book.write().publish_listed(generation, cards)
        };
        if !published {
            debug!("[pr-04] Pass {} superseded before publishing", generation);
            return Ok(FanOut::empty(generation));
        }

        let fan_out = self.dispatch_decryption(generation);
        info!(
            "[pr-04] Pass {} published {} cards, {} decrypting",
            generation,
            total,
            fan_out.len()
        );
        Ok(fan_out)
    }

    async fn create_card(&self, data: CreateCardData) -> CreateOutcome {
        let creator = match self.connected_account() {
            Ok(account) => account,
            Err(e) => {
                info!("[pr-04] Card creation blocked ({}), requesting connection", e);
                self.wallet.request_connection();
                self.notify(Notice::connect_wallet());
                return CreateOutcome::WalletRequired;
            }
        };

        let _creating = self.track(
            |ui| ui.is_creating = true,
            |ui| {
                ui.is_creating = false;
                ui.pending_doc_id = None;
            },
        );
        match self.run_create(&data, &creator).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("[pr-04] Card creation failed: {}", e);
                CreateOutcome::Failed(self.fail("Error creating card", &e))
            }
        }
    }

    async fn submit_rating(&self, data: SubmitReviewData) -> RatingOutcome {
        let user = match self.connected_account() {
            Ok(account) => account,
            Err(e) => {
                debug!("[pr-04] Rating ignored: {}", e);
                return RatingOutcome::Skipped;
            }
        };
        let Some((doc_id, card_id)) = self.selected_target() else {
            debug!("[pr-04] Rating ignored: no confirmed card selected");
            return RatingOutcome::Skipped;
        };

        let _status = self.track(
            |ui| ui.review_status = ReviewStatus::Encrypting,
            |ui| ui.review_status = ReviewStatus::Idle,
        );
        tokio::task::yield_now().await;

        match self.run_rating(&user, card_id, data).await {
            Ok(()) => {
                info!("[pr-04] Rating recorded for card {} ({})", card_id, doc_id);
                self.ui.write().has_voted = true;
                self.notify(Notice::rating_submitted());
                self.refresh_list().await;
                RatingOutcome::Submitted
            }
            Err(e) => {
                warn!("[pr-04] Rating for card {} failed: {}", card_id, e);
                RatingOutcome::Failed(self.fail("Error submitting rating", &e))
            }
        }
    }

    async fn refresh_creation_fee(&self) -> Option<String> {
        let fee = self.chain.read_creation_fee().await;
        if let Some(fee) = &fee {
            self.ui.write().creation_fee = Some(fee.clone());
        }
        fee
    }

    async fn refresh_balance(&self) -> Option<String> {
        let balance = match self.wallet.address() {
            Some(account) => self.chain.read_balance(&account).await,
            None => None,
        };
        self.ui.write().balance = balance.clone();
        balance
    }

    async fn select_card(&self, doc_id: &str) -> bool {
        let card_id = match self.book.read().get(doc_id) {
            Some(card) => card.id,
            None => return false,
        };
        {
            let mut ui = self.ui.write();
            ui.selected = Some(doc_id.to_string());
            ui.has_voted = false;
        }

        let voted = match (card_id, self.wallet.address()) {
            (Some(card_id), Some(user)) => self
                .store
                .has_user_rated(card_id, &user)
                .await
                .unwrap_or_else(|e| {
                    debug!("[pr-04] Vote lookup failed: {}", e);
                    false
                }),
            _ => false,
        };

        let mut ui = self.ui.write();
        if ui.selected.as_deref() == Some(doc_id) {
            ui.has_voted = voted;
        }
        true
    }

    fn clear_selection(&self) {
        let mut ui = self.ui.write();
        ui.selected = None;
        ui.has_voted = false;
    }

    fn visible_cards(&self) -> Vec<Card> {
        self.book.read().visible()
    }

    fn search(&self, query: &str) -> Vec<Card> {
        let needle = query.to_lowercase();
        self.visible_cards()
            .into_iter()
            .filter(|card| card.title.to_lowercase().contains(&needle))
            .collect()
    }

    fn snapshot(&self) -> OrchestratorSnapshot {
        let cards = self.visible_cards();
        let ui = self.ui.read();
        let selected = ui
            .selected
            .as_deref()
            .and_then(|doc_id| cards.iter().find(|card| card.doc_id == doc_id))
            .cloned();
        OrchestratorSnapshot {
            wallet: self.wallet.address(),
            creation_fee: ui
                .creation_fee
                .clone()
                .unwrap_or_else(|| self.config.default_creation_fee.clone()),
            balance: ui.balance.clone(),
            is_loading: ui.loading_passes > 0,
            is_creating: ui.is_creating,
            pending_doc_id: ui.pending_doc_id.clone(),
            review_status: ui.review_status,
            selected,
            has_voted: ui.has_voted,
            gateway_ready: self.gateway.is_initialized(),
            cards,
        }
    }

    fn take_notices(&self) -> Vec<Notice> {
        self.ui.write().notices.drain(..).collect()
    }
}
