//! Extraction of block seeds from model output.
//!
//! Chat models asked for JSON still wrap it in markdown fences, chat around
//! it, drop trailing brackets when they hit the token limit, or leave
//! trailing commas. This module digs the array out, repairs what it can, and
//! falls back to scanning for individual objects before giving up.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A title/summary pair parsed from model output, not yet a block.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSeed {
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no JSON array found in response")]
    NoArray,
    #[error("response could not be parsed as JSON: {0}")]
    Unparseable(String),
    #[error("response contained no usable entries")]
    Empty,
}

/// Parses model output into block seeds, repairing malformed JSON along the
/// way. Fails only when nothing salvageable remains.
pub fn block_seeds(text: &str) -> Result<Vec<BlockSeed>, ExtractError> {
    let candidate = isolate_array(text).ok_or(ExtractError::NoArray)?;

    let values = match serde_json::from_str::<Vec<Value>>(&candidate) {
        Ok(values) => values,
        Err(first_err) => {
            debug!(error = %first_err, "array parse failed, attempting repair");
            let repaired = repair_array(&candidate);
            match serde_json::from_str::<Vec<Value>>(&repaired) {
                Ok(values) => values,
                Err(_) => scavenge_objects(&candidate)
                    .ok_or_else(|| ExtractError::Unparseable(first_err.to_string()))?,
            }
        }
    };

    let seeds: Vec<BlockSeed> = values.iter().filter_map(seed_from_value).collect();
    if seeds.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(seeds)
}

/// Strips markdown fences and slices from the first `[` onward (through the
/// last `]` when one exists, to the end otherwise).
fn isolate_array(text: &str) -> Option<String> {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body = body.trim();

    let start = body.find('[')?;
    let sliced = match body.rfind(']') {
        Some(end) if end > start => &body[start..=end],
        _ => &body[start..],
    };
    Some(sliced.to_string())
}

/// Two repairs: remove trailing commas before `}`/`]`, and close off an
/// array the model truncated mid-object by cutting back to the last
/// complete object.
fn repair_array(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len());
    let mut pending_comma = false;
    let mut in_string = false;
    let mut escaped = false;
    for ch in candidate.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => {
                flush_comma(&mut out, &mut pending_comma);
                out.push(ch);
                in_string = true;
            }
            ',' => {
                flush_comma(&mut out, &mut pending_comma);
                pending_comma = true;
            }
            '}' | ']' => {
                // A comma directly before a closer is dropped.
                pending_comma = false;
                out.push(ch);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                flush_comma(&mut out, &mut pending_comma);
                out.push(ch);
            }
        }
    }

    let trimmed = out.trim_end();
    if trimmed.starts_with('[') && !trimmed.ends_with(']') {
        if let Some(last) = last_balanced_object_end(trimmed) {
            let mut closed = trimmed[..=last].to_string();
            closed.push(']');
            return closed;
        }
        let mut closed = trimmed.to_string();
        closed.push_str("}]");
        return closed;
    }
    out
}

fn flush_comma(out: &mut String, pending: &mut bool) {
    if *pending {
        out.push(',');
        *pending = false;
    }
}

/// Byte offset of the `}` closing the last complete top-level object,
/// tracking string and escape state.
fn last_balanced_object_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut last = None;
    for (i, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    last = Some(i);
                }
            }
            _ => {}
        }
    }
    last
}

/// Last resort: walk the text for balanced `{...}` spans that parse on
/// their own and mention both fields.
fn scavenge_objects(text: &str) -> Option<Vec<Value>> {
    let mut values = Vec::new();
    let bytes = text.char_indices().collect::<Vec<_>>();
    let mut i = 0;
    while i < bytes.len() {
        let (start, ch) = bytes[i];
        if ch != '{' {
            i += 1;
            continue;
        }
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut end = None;
        for (j, &(offset, c)) in bytes[i..].iter().enumerate() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    in_string = false;
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some((i + j, offset));
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some((end_index, end_offset)) = end else {
            break;
        };
        let span = &text[start..end_offset + '}'.len_utf8()];
        if span.contains("\"title\"") && span.contains("\"summary\"") {
            if let Ok(value) = serde_json::from_str::<Value>(span) {
                values.push(value);
            }
        }
        i = end_index + 1;
    }
    if values.is_empty() { None } else { Some(values) }
}

/// Builds a seed from one parsed object, tolerating the field-name drift
/// models produce. An object with neither a title nor any summary-like
/// field is skipped.
fn seed_from_value(value: &Value) -> Option<BlockSeed> {
    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };
    let title = field("title");
    let summary = field("summary")
        .or_else(|| field("description"))
        .or_else(|| field("content"));
    if title.is_none() && summary.is_none() {
        return None;
    }
    Some(BlockSeed {
        title: title.or(summary).unwrap_or_default().to_string(),
        summary: summary
            .or(title)
            .unwrap_or("No description provided")
            .to_string(),
    })
}
