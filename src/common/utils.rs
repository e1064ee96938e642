//! Shared formatting helpers.

use std::path::Path;
use std::time::Duration;

/// Format a shutter speed the way camera displays do: `1/125s` below one second,
/// `2.5s` from one second up.
pub fn format_shutter(seconds: f64) -> String {
    if seconds >= 1.0 {
        let rounded = (seconds * 10.0).round() / 10.0;
        format!("{rounded}s")
    } else if seconds > 0.0 {
        let denominator = (1.0 / seconds).round() as u64;
        format!("1/{denominator}s")
    } else {
        "0s".to_string()
    }
}

/// Format a duration as `1h 02m 03s`, dropping leading zero units.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// Replace the home directory prefix with `~` for display.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}
