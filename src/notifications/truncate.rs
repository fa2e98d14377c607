//! Bounds free-form text shown inside cards.

use std::collections::HashMap;

/// Maximum number of characters a text block may carry.
pub const MAX_OUTPUT_LENGTH: usize = 500;

pub const TRUNCATION_BANNER: &str =
    "Output truncated because it was too long, check Event log in sensu: \n";

const TRUNCATION_SUFFIX: &str = "\n[...]";

/// Trims `text` and, when it is longer than [`MAX_OUTPUT_LENGTH`], keeps the
/// head of it behind [`TRUNCATION_BANNER`].
pub fn truncate_text(text: &str) -> String {
    truncate_with(text, MAX_OUTPUT_LENGTH, TRUNCATION_BANNER)
}

/// Lengths are counted in chars. A banner longer than `max_len` leaves no
/// room for content but never underflows.
pub fn truncate_with(text: &str, max_len: usize, banner: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }

    let keep = max_len.saturating_sub(banner.chars().count());
    let head: String = trimmed.chars().take(keep).collect();
    format!("{banner}{head}{TRUNCATION_SUFFIX}")
}

/// Check output with newlines doubled so the card renders them as paragraphs.
pub fn truncate_output(output: &str) -> String {
    truncate_text(&output.trim().replace('\n', "\n\n"))
}

/// Renders every annotation as `key\nvalue\n\n`. Map order is not stable.
pub fn truncate_annotations(annotations: &HashMap<String, String>) -> String {
    let joined: String = annotations
        .iter()
        .map(|(key, value)| format!("{key}\n{value}\n\n"))
        .collect();
    truncate_text(&joined)
}
