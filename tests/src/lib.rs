//! # Private-Ratings Test Suite
//!
//! Cross-subsystem tests over the in-memory adapters: the orchestrator wired
//! to a real metadata store client, chain client and FHE gateway, with the
//! simulated contract and local FHE runtime underneath.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Shared in-memory deployment
//! └── integration/
//!     ├── flows.rs       # Create → rate → decrypt across clients
//!     ├── degraded.rs    # Outages and malformed data
//!     └── concurrency.rs # Overlapping passes and concurrent raters
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pr-tests
//! cargo test -p pr-tests integration::degraded::
//!
//! # Benchmarks
//! cargo bench -p pr-tests
//! ```

pub mod fixtures;
pub mod integration;
