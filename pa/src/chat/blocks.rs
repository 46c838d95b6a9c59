//! Action block extraction
//!
//! Model responses interleave prose with `[ACTION] ... [/ACTION]` spans
//! carrying JSON commands. Two pure functions split the two apart: stripping
//! feeds the live display and runs on the accumulated text after every
//! fragment, extraction runs once over the completed response.

use regex::Regex;
use std::sync::LazyLock;

/// Opening delimiter of an action block
pub const ACTION_START: &str = "[ACTION]";

/// Closing delimiter of an action block
pub const ACTION_END: &str = "[/ACTION]";

static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[ACTION\](.*?)\[/ACTION\]").expect("action block pattern is valid"));

/// Remove every well-formed action block, leaving the surrounding prose
///
/// Idempotent, so it can be re-applied to a growing buffer on every new
/// fragment. An opening delimiter whose closing delimiter has not streamed
/// in yet is left in place; it disappears once the block closes.
pub fn strip_action_blocks(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        // Removing a block can splice the text around it into a new
        // delimiter pair, so re-run until stable
        let next = BLOCK_RE.replace_all(&current, "").into_owned();
        if next == current {
            return current.trim().to_string();
        }
        current = next;
    }
}

/// Collect the inner payload of every well-formed action block, in order
///
/// Payloads are trimmed; blocks with nothing between the delimiters yield
/// nothing. An unterminated trailing block is dropped.
pub fn extract_action_blocks(text: &str) -> Vec<String> {
    BLOCK_RE
        .captures_iter(text)
        .map(|cap| cap[1].trim().to_string())
        .filter(|payload| !payload.is_empty())
        .collect()
}
