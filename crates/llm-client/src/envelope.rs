//! Response envelope extraction.
//!
//! The API has returned text under several field layouts over time. Each layout
//! is an [`Extractor`]; a payload is read by trying the extractors of a list in
//! order and keeping the first non-empty result.

use serde_json::Value;

/// Reads text from one envelope layout.
pub type Extractor = fn(&Value) -> Option<String>;

/// Extractors for streamed chunks, in priority order.
pub const STREAM_EXTRACTORS: &[(&str, Extractor)] = &[
    ("choices.delta.content", choices_delta_content),
    ("output", flat_output),
    ("content", flat_content),
    ("text", flat_text),
    ("output_text.delta", output_text_delta),
];

/// Extractors for non-streamed responses, in priority order.
pub const COMPLETION_EXTRACTORS: &[(&str, Extractor)] = &[
    ("output", flat_output),
    ("content", flat_content),
    ("text", flat_text),
    ("choices.message.content", choices_message_content),
    ("output[].content[].text", output_items_text),
];

/// Returns the first non-empty text produced by `extractors`.
pub fn extract_text(value: &Value, extractors: &[(&str, Extractor)]) -> Option<String> {
    extractors
        .iter()
        .filter_map(|(_, extract)| extract(value))
        .find(|text| !text.is_empty())
}

fn string_at(value: &Value, pointer: &str) -> Option<String> {
    value.pointer(pointer)?.as_str().map(str::to_string)
}

fn choices_delta_content(value: &Value) -> Option<String> {
    string_at(value, "/choices/0/delta/content")
}

fn choices_message_content(value: &Value) -> Option<String> {
    string_at(value, "/choices/0/message/content")
}

fn flat_output(value: &Value) -> Option<String> {
    string_at(value, "/output")
}

fn flat_content(value: &Value) -> Option<String> {
    string_at(value, "/content")
}

fn flat_text(value: &Value) -> Option<String> {
    string_at(value, "/text")
}

fn output_text_delta(value: &Value) -> Option<String> {
    let kind = value.get("type")?.as_str()?;
    if !kind.ends_with("output_text.delta") {
        return None;
    }
    string_at(value, "/delta")
}

// {"output": [{"type": "message", "content": [{"type": "output_text", "text": "..."}]}]}
fn output_items_text(value: &Value) -> Option<String> {
    let items = value.get("output")?.as_array()?;
    let text: String = items
        .iter()
        .filter_map(|item| item.get("content")?.as_array())
        .flatten()
        .filter_map(|part| part.get("text")?.as_str())
        .collect();
    Some(text)
}
