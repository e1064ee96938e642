// External I/O operations module
pub mod session_log; // Append-only per-session log file

pub use session_log::SessionLog;
