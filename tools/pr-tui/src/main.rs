//! PR-TUI: Terminal User Interface for Private-Ratings.
//!
//! Browse feedback cards, create new ones and submit encrypted star
//! ratings. Averages are decrypted in the background after each refresh.
//!
//! ## Usage
//!
//! ```bash
//! # Self-contained local stack (simulated contract, dev wallet)
//! pr-tui
//!
//! # Contract on a node, averages decrypted by the relayer
//! pr-tui --backend rpc --rpc-url http://127.0.0.1:8545 \
//!     --relayer-url https://relayer.testnet.zama.cloud --account 0xf39F...
//! ```
//!
//! Logs go to `pr-tui.log` so they do not tear the screen.

mod app;
mod stack;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pr_04_card_reconciliation::{CardReconciliationApi, RatingsConfig};
use pr_telemetry::{init_telemetry, subsystem_span, TelemetryConfig};
use ratatui::prelude::*;
use shared_types::Address;
use tokio::sync::mpsc;
use tracing::{info, warn, Instrument};

use app::{App, WorkflowEvent};

/// Chain backend selectable on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BackendArg {
    /// Simulated contract in process
    Local,
    /// Contract on a JSON-RPC node
    Rpc,
}

/// Private-Ratings Terminal User Interface
#[derive(Parser, Debug)]
#[command(name = "pr-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chain backend
    #[arg(long, value_enum, default_value = "local")]
    backend: BackendArg,

    /// JSON-RPC endpoint URL (overrides PR_RPC_URL)
    #[arg(long)]
    rpc_url: Option<String>,

    /// FHE relayer endpoint URL (overrides PR_RELAYER_URL)
    #[arg(long)]
    relayer_url: Option<String>,

    /// Review contract address (overrides PR_CONTRACT_ADDRESS)
    #[arg(long)]
    contract: Option<String>,

    /// Connect the wallet as this account on startup
    #[arg(long)]
    account: Option<String>,

    /// Log file
    #[arg(long, default_value = "pr-tui.log")]
    log_file: PathBuf,

    /// Card refresh interval in milliseconds
    #[arg(long, default_value = "15000")]
    refresh_ms: u64,
}

impl Args {
    fn ratings_config(&self) -> RatingsConfig {
        let mut config = RatingsConfig::from_env();
        if let Some(url) = &self.rpc_url {
            config.rpc_url = url.clone();
        }
        if let Some(url) = &self.relayer_url {
            config.network.relayer_url = url.clone();
        }
        if let Some(contract) = &self.contract {
            config.contract_address = contract.clone();
        }
        config
    }

    fn chain_backend(&self) -> stack::Backend {
        match self.backend {
            BackendArg::Local => stack::Backend::Local,
            BackendArg::Rpc => stack::Backend::JsonRpc,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env().with_log_file(args.log_file.clone());
    telemetry.service_name = "pr-tui".to_string();
    telemetry.console_output = false;
    let _telemetry = init_telemetry(telemetry)?;

    let account = args.account.as_deref().map(Address::new);
    let orchestrator = Arc::new(stack::build(
        args.ratings_config(),
        args.chain_backend(),
        account,
    )?);
    info!("[pr-tui] Starting with {:?} backend", args.backend);

    // Setup terminal with panic hook for cleanup
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (events_tx, events_rx) = mpsc::channel(16);
    let mut app = App::new(Arc::clone(&orchestrator), events_tx);
    let refresh_interval = Duration::from_millis(args.refresh_ms);

    let result = run_app(
        &mut terminal,
        &mut app,
        &orchestrator,
        refresh_interval,
        events_rx,
    )
    .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Main application loop.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    orchestrator: &stack::Orchestrator,
    refresh_interval: Duration,
    mut events_rx: mpsc::Receiver<WorkflowEvent>,
) -> Result<()> {
    let initialized = orchestrator
        .initialize()
        .instrument(subsystem_span!("initialize", subsystem = "pr-tui"))
        .await;
    match initialized {
        Ok(fan_out) => info!("[pr-tui] Decrypting {} cards", fan_out.len()),
        Err(e) => warn!("[pr-tui] Initial load failed: {}", e),
    }
    app.sync();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        while let Ok(event) = events_rx.try_recv() {
            app.on_workflow_event(event);
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = app.on_key(key.code);
                    app.perform(action).await;
                }
            }
        }

        if app.last_refresh.elapsed() >= refresh_interval {
            app.refresh().await;
        }

        // Pick up background decryption results and expire toasts.
        app.sync();

        if app.should_quit {
            return Ok(());
        }
    }
}
