//! Phrase-delimited command extraction.
//!
//! The wearable streams a freeform transcript; commands are spoken between
//! paired trigger phrases ("start transaction ... end transaction"). Each
//! command family has its own trigger vocabulary and is segmented in an
//! independent pass over the same transcript.

use regex::Regex;

use crate::error::{MurmurError, Result};

pub const TRANSFER_START_PHRASES: &[&str] = &["start transaction", "start transaction."];
pub const TRANSFER_END_PHRASES: &[&str] = &["end transaction", "end transaction."];

pub const SWAP_START_PHRASES: &[&str] = &["start swap", "start swap."];
pub const SWAP_END_PHRASES: &[&str] = &["end swap", "end swap."];

/// Extract delimited utterances from `text`.
///
/// `text` must already be lower-cased by the caller. The scan is
/// left-to-right and non-overlapping, taking the shortest span between a
/// start trigger and the nearest following end trigger. A start trigger with
/// no following end trigger yields nothing: an unterminated command is
/// dropped, not an error. Matches are normalized via [`normalize_utterance`].
pub fn segment(text: &str, start_phrases: &[&str], end_phrases: &[&str]) -> Result<Vec<String>> {
    if start_phrases.is_empty() || end_phrases.is_empty() || text.is_empty() {
        return Ok(Vec::new());
    }

    let start_pattern = join_phrases(start_phrases);
    let end_pattern = join_phrases(end_phrases);
    let pattern = format!("(?:{start_pattern})(.*?)(?:{end_pattern})");
    let matcher = Regex::new(&pattern)
        .map_err(|e| MurmurError::Internal(format!("Invalid trigger phrase pattern: {e}")))?;

    Ok(matcher
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|body| normalize_utterance(body.as_str()))
        .collect())
}

fn join_phrases(phrases: &[&str]) -> String {
    phrases
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|")
}

/// Normalize a captured command body: trim, strip one leading period left
/// over from a trigger phrase, and capitalize word-initial letters.
///
/// Running this on an already-normalized string is a no-op.
pub fn normalize_utterance(raw: &str) -> String {
    let mut message = raw.trim();
    if let Some(rest) = message.strip_prefix('.') {
        message = rest.trim();
    }
    capitalize_words(message)
}

/// Upper-case the first letter of the string, of every whitespace-separated
/// word, and of any letter directly following a sentence terminator
/// (`.`, `!`, `?`).
fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;

    for c in text.chars() {
        if at_boundary && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            at_boundary = false;
            continue;
        }

        at_boundary = c.is_whitespace() || matches!(c, '.' | '!' | '?');
        out.push(c);
    }

    out
}
