//! # Lapse - task lifecycle and expiration engine
//!
//! Unfinished tasks expire on a per-category schedule, are flagged while
//! they are about to expire, and recurring tasks come back as incomplete on
//! their next occurrence instead of expiring.
//!
//! - **Engine**: expiration instants, warning windows and recurrence resets
//!   computed by one [`ExpirationEngine`](libs::expiration::ExpirationEngine)
//! - **Storage**: a local SQLite task store behind the
//!   [`TaskStore`](libs::store::TaskStore) trait
//! - **Sweeps**: one-shot or periodic passes that delete expired tasks and
//!   reset recurring ones
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lapse::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
