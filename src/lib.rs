//! Background file-lifecycle manager for the Rectify upload directory.
//!
//! Keeps the per-session upload folders bounded in age and total size:
//! a retention pass removes sessions idle past a fixed ceiling, and a
//! capacity pass evicts oldest sessions once usage crosses a proactive
//! threshold. Runs either as a daemon loop inside a long-lived process or
//! as a single sweep from a scheduler.

pub mod config;
pub mod daemon;
pub mod error;
pub mod sweep;

// re-export selected public API
pub use config::Policy;
pub use error::ConfigError;
pub use sweep::{SweepResult, run_sweep};
