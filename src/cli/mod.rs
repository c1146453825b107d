//! CLI command handlers.
//!
//! Each handler takes a fully merged [`AppConfig`](crate::config::AppConfig)
//! and returns the process exit code; `main` only parses arguments and
//! builds that config.

mod batch;
mod diff;

pub use batch::run_batch;
pub use diff::run_diff;
