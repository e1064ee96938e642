//! Structured console logging with visual formatting.
//!
//! This module provides the console logging system used by every dusklapse command.
//! It includes the usual log levels plus structural helpers that draw a continuous
//! pipe down the left margin, so a whole capture session reads as one block of output.
//!
//! The logger supports runtime enable/disable for quiet operation during tests.
//! The per-session log file is a separate concern, see [`crate::io::session_log`].

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

/// Main logging interface.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: begins a new conceptual block (session overview, mode
///   change, completion). Prints an empty `┃` spacer followed by `┣ message`.
/// - **`log_decorated!`**: a line inside the current block, `┣ message`.
/// - **`log_indented!`**: nested detail, `┃   message`.
/// - **`log_pipe!`**: a lone `┃` spacer, used before level-prefixed messages.
/// - **`log_version!`** / **`log_end!`**: the `┏ dusklapse vX.Y.Z ━━╸` header and `╹` footer.
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`**: level-prefixed lines.
/// - **`log_error_exit!`**: closes the output with `┗[ERROR]` before a fatal exit.
pub struct Log;

impl Log {
    /// Enable or disable console logging.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if console logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }
}

// Public function that routes output (needed by macros)
pub fn write_output(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}

// # Logging Macros

/// Log a decorated message, typically as part of an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!("┣ {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::common::logger::write_output(&format!("┣ {expr}\n"));
        }
    }};
}

/// Log an indented message for sub-items or details within a block.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!("┃   {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::common::logger::write_output(&format!("┃   {expr}\n"));
        }
    }};
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            $crate::common::logger::write_output("┃\n");
        }
    }};
}

/// Log a block start message, initiating a new conceptual block of information.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(&format!("┃\n┣ {message}\n"));
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::common::logger::write_output(&format!("┃\n┣ {expr}\n"));
        }
    }};
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let version = env!("CARGO_PKG_VERSION");
            $crate::common::logger::write_output(&format!("┏ dusklapse v{version} ━━╸\n"));
        }
    }};
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            $crate::common::logger::write_output("╹\n");
        }
    }};
}

/// Log a warning message with pipe prefix and yellow-colored text.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(
                &format!("┣[\x1b[33mWARNING\x1b[0m] {message}\n"),
            );
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::common::logger::write_output(
                &format!("┣[\x1b[33mWARNING\x1b[0m] {expr}\n"),
            );
        }
    }};
}

/// Log an error message with pipe prefix and red-colored text.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(
                &format!("┣[\x1b[31mERROR\x1b[0m] {message}\n"),
            );
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::common::logger::write_output(
                &format!("┣[\x1b[31mERROR\x1b[0m] {expr}\n"),
            );
        }
    }};
}

/// Log an error message that terminates the output flow.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(
                &format!("┃\n┗[\x1b[31mERROR\x1b[0m] {message}\n"),
            );
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::common::logger::write_output(
                &format!("┃\n┗[\x1b[31mERROR\x1b[0m] {expr}\n"),
            );
        }
    }};
}

/// Log an informational message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(
                &format!("┣[\x1b[32mINFO\x1b[0m] {message}\n"),
            );
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::common::logger::write_output(
                &format!("┣[\x1b[32mINFO\x1b[0m] {expr}\n"),
            );
        }
    }};
}

/// Log a debug message with pipe prefix and green-colored text.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let message = format!($fmt $($arg)*);
            $crate::common::logger::write_output(
                &format!("┣[\x1b[32mDEBUG\x1b[0m] {message}\n"),
            );
        }
    }};
    ($expr:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let expr = $expr;
            $crate::common::logger::write_output(
                &format!("┣[\x1b[32mDEBUG\x1b[0m] {expr}\n"),
            );
        }
    }};
}
