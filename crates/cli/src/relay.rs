//! Decoding and bounding of captured tool output (plan/apply logs) before it
//! is shown to a human. Every failure ends up as text; nothing is returned to
//! the caller as an error.

use std::path::Path;
use thiserror::Error;

pub const MAX_OUTPUT_CHARS: usize = 30_000;
pub const TRUNCATION_SUFFIX: &str = "\n\n... (output truncated to 30000 characters)";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RelayError {
    #[error("malformed percent-escape at byte {offset}")]
    MalformedEscape { offset: usize },

    #[error("decoded output is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Render captured output for `action_label` (e.g. `plan`, `apply`).
pub fn render(raw: &str, action_label: &str) -> String {
    if raw.trim().is_empty() {
        return empty_output_message(action_label);
    }

    match percent_decode_utf8(raw) {
        Ok(decoded) => truncate_output(decoded),
        Err(err) => format!("Failed to decode {action_label} output: {err}"),
    }
}

/// Read a capture file and render it; a read failure becomes the rendered text.
pub fn render_file(path: &Path, action_label: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(raw) => render(&raw, action_label),
        Err(err) => format!(
            "Failed to read {action_label} output from {}: {err}",
            path.display()
        ),
    }
}

pub fn empty_output_message(action_label: &str) -> String {
    format!("No output was captured for {action_label}.")
}

/// `%XX` escapes only; `+` stays a literal plus.
fn percent_decode_utf8(input: &str) -> Result<String, RelayError> {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = |offset: usize| {
                    bytes
                        .get(offset)
                        .and_then(|b| (*b as char).to_digit(16))
                        .map(|d| d as u8)
                };
                let (Some(hi), Some(lo)) = (hex(i + 1), hex(i + 2)) else {
                    return Err(RelayError::MalformedEscape { offset: i });
                };
                out.push((hi << 4) | lo);
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    Ok(String::from_utf8(out)?)
}

fn truncate_output(decoded: String) -> String {
    match decoded.char_indices().nth(MAX_OUTPUT_CHARS) {
        None => decoded,
        Some((cut, _)) => {
            let mut out = decoded;
            out.truncate(cut);
            out.push_str(TRUNCATION_SUFFIX);
            out
        }
    }
}
