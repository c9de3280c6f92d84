/*!
 * Positional decoding of the translation endpoint's response body.
 *
 * The endpoint answers with an untyped nested JSON array. Only two positions
 * are read:
 * - index 0: the sentence segments; element 0 of each segment is a chunk of
 *   the primary translation
 * - index 5: alternate groups; element 2 of each group lists alternate
 *   readings whose element 0 is the alternate text
 *
 * Any other shape drift is absorbed here: absent, null or mistyped nodes yield
 * nothing rather than an error.
 */

use serde_json::Value;

use crate::errors::ProviderError;

const SEGMENTS_INDEX: usize = 0;
const ALTERNATES_INDEX: usize = 5;
const READINGS_INDEX: usize = 2;

/// One piece of decoded translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedSegment {
    /// A chunk of the primary translation, in order
    Primary(String),
    /// The `index`-th alternate reading of one group
    Alternate { index: usize, text: String },
}

/// Decode a response body into segments
pub fn decode_segments(body: &str) -> Result<Vec<DecodedSegment>, ProviderError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("response is not JSON: {}", e)))?;

    let top = value.as_array().ok_or_else(|| {
        ProviderError::ParseError("response is not a top-level array".to_string())
    })?;

    let mut segments = Vec::new();

    if let Some(chunks) = top.get(SEGMENTS_INDEX).and_then(Value::as_array) {
        for chunk in chunks {
            let Some(chunk) = chunk.as_array() else { continue };
            if chunk.is_empty() {
                break;
            }
            if let Some(text) = chunk[0].as_str() {
                segments.push(DecodedSegment::Primary(text.to_string()));
            }
        }
    }

    if let Some(groups) = top.get(ALTERNATES_INDEX).and_then(Value::as_array) {
        for group in groups {
            let Some(group) = group.as_array() else { continue };
            if group.is_empty() {
                break;
            }
            let Some(readings) = group.get(READINGS_INDEX).and_then(Value::as_array) else {
                continue;
            };
            for (index, reading) in readings.iter().enumerate() {
                let text = reading
                    .as_array()
                    .and_then(|r| r.first())
                    .and_then(Value::as_str);
                if let Some(text) = text {
                    segments.push(DecodedSegment::Alternate {
                        index,
                        text: text.to_string(),
                    });
                }
            }
        }
    }

    Ok(segments)
}

/// Fold decoded segments into slots: slot 0 is the primary translation, slot
/// `i + 1` collects the `i`-th alternate of every group
pub fn assemble(segments: &[DecodedSegment]) -> Vec<String> {
    let mut slots = vec![String::new()];

    for segment in segments {
        match segment {
            DecodedSegment::Primary(text) => slots[0].push_str(text),
            DecodedSegment::Alternate { index, text } => {
                let slot = index + 1;
                if slots.len() <= slot {
                    slots.resize(slot + 1, String::new());
                }
                slots[slot].push_str(text);
            }
        }
    }

    slots
}

/// Decode a body straight into slots
pub fn decode(body: &str) -> Result<Vec<String>, ProviderError> {
    decode_segments(body).map(|segments| assemble(&segments))
}
