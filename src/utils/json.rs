//! Locating a JSON object inside free-form model output.

use serde::de::IgnoredAny;
use thiserror::Error;

const FENCE: &str = "```";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no JSON object found in text")]
    NoObject,
    #[error("JSON object is not terminated")]
    Unterminated,
}

/// Return the first complete JSON object in `text`, byte-for-byte.
///
/// When the text contains a markdown fence (with or without a language tag),
/// the search starts after the fence line, so braces in leading prose are
/// not mistaken for the object. A missing closing fence is tolerated, and
/// anything after the object, such as a closing fence or trailing prose, is
/// ignored. Balanced spans that are not valid JSON are stepped over; if none
/// is valid the first one is returned so the caller's parse reports why.
pub fn extract_json_object(text: &str) -> Result<&str, ExtractError> {
    let text = text.trim();
    match after_opening_fence(text) {
        Some(body) if body.contains('{') => first_object(body),
        _ => first_object(text),
    }
}

fn after_opening_fence(text: &str) -> Option<&str> {
    let rest = &text[text.find(FENCE)? + FENCE.len()..];
    // The fence line may carry a language tag such as `json`.
    Some(match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    })
}

fn first_object(text: &str) -> Result<&str, ExtractError> {
    let mut offset = text.find('{').ok_or(ExtractError::NoObject)?;
    let mut first_balanced = None;

    while let Some(start) = text[offset..].find('{').map(|i| offset + i) {
        let candidate = &text[start..];
        let Some(end) = object_end(candidate) else {
            break;
        };
        let object = &candidate[..=end];
        if serde_json::from_str::<IgnoredAny>(object).is_ok() {
            return Ok(object);
        }
        first_balanced.get_or_insert(object);
        offset = start + end + 1;
    }

    first_balanced.ok_or(ExtractError::Unterminated)
}

/// Byte index of the brace closing the object that opens at index 0.
fn object_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
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
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }

    None
}
