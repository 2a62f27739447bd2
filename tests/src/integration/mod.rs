//! Cross-subsystem scenarios.

pub mod concurrency;
pub mod degraded;
pub mod flows;
