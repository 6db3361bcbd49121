//! Macros for user-facing output and error creation.
//!
//! Output is routed by run mode. When `LAPSE_DEBUG` or `RUST_LOG` is set the
//! macros emit `tracing` events, so messages interleave with the structured
//! logs of the sweep daemon. Otherwise they print plain lines with an emoji
//! prefix to stdout (stderr for errors).
//!
//! ```text
//! msg_info!(msg) ──▶ debug mode? ──yes──▶ tracing::info!("ℹ️ {msg}")
//!                         │
//!                         └──no───▶ println!("ℹ️ {msg}")
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use lapse::{msg_info, msg_success};
//! use lapse::libs::messages::Message;
//!
//! msg_success!(Message::TaskCreated(7));
//! msg_info!(Message::NoTasksFound);
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Whether messages should go to `tracing` instead of the console. Checked
/// once per process.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("LAPSE_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Routes one formatted line either to a `tracing` event or to the console.
/// `spaced` surrounds the line with blank lines.
#[doc(hidden)]
#[macro_export]
macro_rules! msg_emit {
    ($event:ident, $console:ident, $prefix:expr, $msg:expr, $spaced:expr) => {{
        let line = format!("{}{}", $prefix, $msg);
        let line = if $spaced { format!("\n{}\n", line) } else { line };
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$event!("{}", line);
        } else {
            $console!("{}", line);
        }
    }};
}

/// Prints a message without prefix. A trailing `true` adds blank lines
/// around it, as used for table headers.
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        $crate::msg_emit!(info, println, "", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::msg_emit!(info, println, "", $msg, true)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        $crate::msg_emit!(info, println, "✅ ", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::msg_emit!(info, println, "✅ ", $msg, true)
    };
}

/// Errors go to stderr outside debug mode.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        $crate::msg_emit!(error, eprintln, "❌ ", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::msg_emit!(error, eprintln, "❌ ", $msg, true)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        $crate::msg_emit!(warn, println, "⚠️ ", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::msg_emit!(warn, println, "⚠️ ", $msg, true)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        $crate::msg_emit!(info, println, "ℹ️ ", $msg, false)
    };
    ($msg:expr, true) => {
        $crate::msg_emit!(info, println, "ℹ️ ", $msg, true)
    };
}

/// Returns early with an `anyhow::Error` built from a message.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}
