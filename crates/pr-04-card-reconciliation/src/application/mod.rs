//! # Application Module
//!
//! The orchestrator service and the handle it returns for background work.

pub mod fanout;
pub mod service;

pub use fanout::FanOut;
pub use service::{CardOrchestrator, OrchestratorSnapshot};
