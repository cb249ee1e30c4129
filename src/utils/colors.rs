/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const CYAN: &str = "\x1b[36m";

/// Placeholder shown for an absent check-in / check-out.
pub const MISSING: &str = "--:--:--";

/// The value itself, or the placeholder when absent or blank.
/// Plain text: table cells are measured without escape codes.
pub fn or_missing(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}
