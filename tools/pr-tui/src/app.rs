//! Application state management.
//!
//! Key handling is synchronous and returns an [`Action`]; the main loop runs
//! actions against the orchestrator. Workflows run as spawned tasks and
//! report back through a channel so the screen keeps redrawing while a
//! rating is encrypted or a transaction is mined.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use pr_04_card_reconciliation::{
    Card, CardReconciliationApi, CreateCardData, CreateOutcome, Notice, NoticeKind,
    OrchestratorSnapshot, RatingOutcome, ReviewStatus, SubmitReviewData, WalletSession,
    MAX_RATING, MIN_RATING,
};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::stack::Orchestrator;

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Cards per grid row.
pub const GRID_COLUMNS: usize = 3;

/// Input focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Moving around the grid.
    Browse,
    /// Typing into the search bar.
    Search,
    /// Create-card form open.
    Create(CreateForm),
    /// Review form open for the selected card.
    Review {
        /// Stars picked so far.
        stars: u8,
    },
}

/// Field of the create-card form with focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    /// Title input.
    #[default]
    Title,
    /// Description input.
    Description,
}

/// Create-card form contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateForm {
    /// Title as typed.
    pub title: String,
    /// Description as typed.
    pub description: String,
    /// Focused field.
    pub field: FormField,
}

/// Work for the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do.
    None,
    /// Run a reconciliation pass.
    Refresh,
    /// Create-card form opened: read fee and balance.
    LoadCreateForm,
    /// Open the review form for a card.
    OpenReview(String),
    /// Review form closed.
    CloseReview,
    /// Ask the wallet to connect.
    ConnectWallet,
    /// Start the create-card workflow.
    Create(CreateCardData),
    /// Start the submit-rating workflow.
    Rate(SubmitReviewData),
}

/// Workflow completions reported by spawned tasks.
#[derive(Debug)]
pub enum WorkflowEvent {
    /// Card selection and vote lookup finished.
    Selected {
        /// Card the review form was opened for.
        doc_id: String,
        /// Whether the card was still listed.
        found: bool,
    },
    /// Create-card workflow finished.
    Created(CreateOutcome),
    /// Submit-rating workflow finished.
    Rated(RatingOutcome),
}

/// A toast on screen.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Notice shown.
    pub notice: Notice,
    /// When it appeared.
    pub shown_at: Instant,
}

/// Application state.
pub struct App {
    orchestrator: Arc<Orchestrator>,

    /// Input focus.
    pub mode: Mode,

    /// Search text.
    pub query: String,

    /// Latest orchestrator state.
    pub snapshot: OrchestratorSnapshot,

    /// Cards matching the search, in display order.
    pub cards: Vec<Card>,

    /// Index of the highlighted card in `cards`.
    pub selected: usize,

    /// Toast on screen.
    pub toast: Option<Toast>,

    /// Whether the app should quit.
    pub should_quit: bool,

    /// Last reconciliation pass started from here.
    pub last_refresh: Instant,

    /// Card whose vote lookup is still running; submitting waits for it.
    pub review_loading: Option<String>,

    events_tx: mpsc::Sender<WorkflowEvent>,
}

impl App {
    /// Create a new application instance.
    pub fn new(orchestrator: Arc<Orchestrator>, events_tx: mpsc::Sender<WorkflowEvent>) -> Self {
        let snapshot = orchestrator.snapshot();
        Self {
            orchestrator,
            mode: Mode::Browse,
            query: String::new(),
            cards: snapshot.cards.clone(),
            snapshot,
            selected: 0,
            toast: None,
            should_quit: false,
            last_refresh: Instant::now(),
            review_loading: None,
            events_tx,
        }
    }

    /// Pull the orchestrator's state and queued notices.
    pub fn sync(&mut self) {
        self.snapshot = self.orchestrator.snapshot();
        self.cards = self.orchestrator.search(&self.query);
        if self.selected >= self.cards.len() {
            self.selected = self.cards.len().saturating_sub(1);
        }
        if let Some(notice) = self.orchestrator.take_notices().pop() {
            self.show(notice);
        }
        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.shown_at.elapsed() >= TOAST_DURATION)
        {
            self.toast = None;
        }
    }

    fn show(&mut self, notice: Notice) {
        self.toast = Some(Toast {
            notice,
            shown_at: Instant::now(),
        });
    }

    /// Highlighted card.
    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.selected)
    }

    /// Run a reconciliation pass; decryption continues in the background.
    pub async fn refresh(&mut self) {
        if let Err(e) = self.orchestrator.reconcile().await {
            warn!("[pr-tui] Refresh failed: {}", e);
        }
        self.orchestrator.refresh_balance().await;
        self.last_refresh = Instant::now();
        self.sync();
    }

    /// Handle a workflow completion.
    pub fn on_workflow_event(&mut self, event: WorkflowEvent) {
        debug!("[pr-tui] Workflow finished: {:?}", event);
        match event {
            WorkflowEvent::Selected { doc_id, found } => {
                if self.review_loading.as_deref() == Some(doc_id.as_str()) {
                    self.review_loading = None;
                    if !found {
                        self.mode = Mode::Browse;
                    }
                } else if !matches!(self.mode, Mode::Review { .. }) {
                    // Form closed before the lookup finished.
                    self.orchestrator.clear_selection();
                }
            }
            WorkflowEvent::Created(CreateOutcome::Confirmed { .. }) => {
                if matches!(self.mode, Mode::Create(_)) {
                    self.mode = Mode::Browse;
                }
            }
            WorkflowEvent::Rated(RatingOutcome::Submitted) => {
                if matches!(self.mode, Mode::Review { .. }) {
                    self.mode = Mode::Browse;
                    self.orchestrator.clear_selection();
                }
            }
            _ => {}
        }
        self.sync();
    }

    /// Run an action.
    pub async fn perform(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Refresh => self.refresh().await,
            Action::LoadCreateForm => {
                self.orchestrator.refresh_creation_fee().await;
                self.orchestrator.refresh_balance().await;
            }
            Action::OpenReview(doc_id) => {
                let orchestrator = Arc::clone(&self.orchestrator);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let found = orchestrator.select_card(&doc_id).await;
                    let _ = tx.send(WorkflowEvent::Selected { doc_id, found }).await;
                });
            }
            Action::CloseReview => {
                self.review_loading = None;
                self.orchestrator.clear_selection();
            }
            Action::ConnectWallet => {
                self.orchestrator.wallet().request_connection();
                self.orchestrator.refresh_balance().await;
            }
            Action::Create(data) => {
                let orchestrator = Arc::clone(&self.orchestrator);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = orchestrator.create_card(data).await;
                    let _ = tx.send(WorkflowEvent::Created(outcome)).await;
                });
            }
            Action::Rate(data) => {
                let orchestrator = Arc::clone(&self.orchestrator);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = orchestrator.submit_rating(data).await;
                    let _ = tx.send(WorkflowEvent::Rated(outcome)).await;
                });
            }
        }
        self.sync();
    }

    /// Handle key press events.
    pub fn on_key(&mut self, key: KeyCode) -> Action {
        match self.mode.clone() {
            Mode::Browse => self.on_browse_key(key),
            Mode::Search => self.on_search_key(key),
            Mode::Create(form) => self.on_create_key(form, key),
            Mode::Review { stars } => self.on_review_key(stars, key),
        }
    }

    fn on_browse_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
                Action::None
            }
            KeyCode::Char('r') | KeyCode::Char('R') => Action::Refresh,
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                Action::None
            }
            KeyCode::Char('c') | KeyCode::Char('C') => Action::ConnectWallet,
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.mode = Mode::Create(CreateForm::default());
                Action::LoadCreateForm
            }
            KeyCode::Enter => self.open_review(),
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected = self.selected.saturating_sub(1);
                Action::None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.move_to(self.selected + 1);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(GRID_COLUMNS);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_to(self.selected + GRID_COLUMNS);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn move_to(&mut self, index: usize) {
        if index < self.cards.len() {
            self.selected = index;
        }
    }

    fn open_review(&mut self) -> Action {
        let Some(card) = self.current_card() else {
            return Action::None;
        };
        if card.is_pending() {
            self.show(Notice {
                kind: NoticeKind::CardPending,
                message: "This card is still waiting for on-chain confirmation.".to_string(),
            });
            return Action::None;
        }
        let doc_id = card.doc_id.clone();
        self.mode = Mode::Review { stars: MAX_RATING };
        self.review_loading = Some(doc_id.clone());
        Action::OpenReview(doc_id)
    }

    fn on_search_key(&mut self, key: KeyCode) -> Action {
        match key {
            KeyCode::Esc => {
                self.query.clear();
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => self.mode = Mode::Browse,
            KeyCode::Backspace => {
                self.query.pop();
            }
            KeyCode::Char(c) => self.query.push(c),
            _ => {}
        }
        self.selected = 0;
        Action::None
    }

    fn on_create_key(&mut self, mut form: CreateForm, key: KeyCode) -> Action {
        if self.snapshot.is_creating {
            // Form is locked while the workflow runs.
            return Action::None;
        }
        let action = match key {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                return Action::None;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                form.field = match form.field {
                    FormField::Title => FormField::Description,
                    FormField::Description => FormField::Title,
                };
                Action::None
            }
            KeyCode::Backspace => {
                field_mut(&mut form).pop();
                Action::None
            }
            KeyCode::Char(c) => {
                field_mut(&mut form).push(c);
                Action::None
            }
            KeyCode::Enter => {
                let description = Some(form.description.as_str());
                match CreateCardData::new(&form.title, description) {
                    Ok(data) => Action::Create(data),
                    Err(e) => {
                        self.show(Notice {
                            kind: NoticeKind::Error,
                            message: e.to_string(),
                        });
                        Action::None
                    }
                }
            }
            _ => Action::None,
        };
        self.mode = Mode::Create(form);
        action
    }

    fn on_review_key(&mut self, stars: u8, key: KeyCode) -> Action {
        let busy = self.snapshot.review_status != ReviewStatus::Idle;
        let loading = self.review_loading.is_some();
        match key {
            KeyCode::Esc if !busy => {
                self.mode = Mode::Browse;
                Action::CloseReview
            }
            KeyCode::Char(c @ '1'..='5') if !busy => {
                self.mode = Mode::Review {
                    stars: c as u8 - b'0',
                };
                Action::None
            }
            KeyCode::Left | KeyCode::Char('h') if !busy => {
                self.mode = Mode::Review {
                    stars: stars.saturating_sub(1).max(MIN_RATING),
                };
                Action::None
            }
            KeyCode::Right | KeyCode::Char('l') if !busy => {
                self.mode = Mode::Review {
                    stars: (stars + 1).min(MAX_RATING),
                };
                Action::None
            }
            KeyCode::Enter if !busy && !loading && !self.snapshot.has_voted => {
                match SubmitReviewData::new(stars) {
                    Ok(data) => Action::Rate(data),
                    Err(_) => Action::None,
                }
            }
            _ => Action::None,
        }
    }
}

fn field_mut(form: &mut CreateForm) -> &mut String {
    match form.field {
        FormField::Title => &mut form.title,
        FormField::Description => &mut form.description,
    }
}
