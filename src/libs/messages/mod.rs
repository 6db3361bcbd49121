//! Centralized user-facing messages.
//!
//! All output text is defined once as a [`Message`] variant with its wording
//! in `display.rs`; the `msg_*` macros decide where it is written.

pub mod display;
pub mod macros;
pub mod types;

pub use types::Message;
