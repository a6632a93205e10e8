//! Server-sent event parsing for streamed completions.
//!
//! Lines are split on `\n`; only `data:` lines are meaningful. `data: [DONE]`
//! ends the stream; anything else is a JSON chunk.

use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;

use crate::envelope::{extract_text, STREAM_EXTRACTORS};
use crate::LlmError;

const DONE_SENTINEL: &str = "[DONE]";

enum Line {
    Data(String),
    Done,
    Skip,
}

fn classify_line(raw: &[u8]) -> Result<Line, LlmError> {
    let line = std::str::from_utf8(raw)
        .map_err(|e| LlmError::Malformed(format!("invalid utf-8 in stream: {}", e)))?;
    let line = line.trim_end_matches('\r');
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(Line::Skip);
    };
    let data = data.trim_start();
    if data == DONE_SENTINEL {
        Ok(Line::Done)
    } else if data.is_empty() {
        Ok(Line::Skip)
    } else {
        Ok(Line::Data(data.to_string()))
    }
}

/// Parses one `data:` payload into a text fragment. `Ok(None)` for chunks carrying no text.
pub fn parse_sse_data(data: &str) -> Result<Option<String>, LlmError> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| LlmError::Malformed(format!("{}: {}", e, data)))?;
    Ok(extract_text(&value, STREAM_EXTRACTORS))
}

struct SseState<S> {
    body: S,
    buffer: Vec<u8>,
    finished: bool,
}

/// Turns a byte stream into a stream of `data:` payloads, ending at `[DONE]` or end of body.
pub(crate) fn sse_data_lines<S, B>(body: S) -> impl Stream<Item = Result<String, LlmError>>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    let state = SseState {
        body,
        buffer: Vec::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(pos) = state.buffer.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = state.buffer.drain(..=pos).collect();
                match classify_line(&raw[..raw.len() - 1]) {
                    Ok(Line::Data(data)) => return Some((Ok(data), state)),
                    Ok(Line::Done) => return None,
                    Ok(Line::Skip) => continue,
                    Err(e) => {
                        state.finished = true;
                        state.buffer.clear();
                        return Some((Err(e), state));
                    }
                }
            }

            if state.finished {
                if state.buffer.is_empty() {
                    return None;
                }
                let raw = std::mem::take(&mut state.buffer);
                return match classify_line(&raw) {
                    Ok(Line::Data(data)) => Some((Ok(data), state)),
                    Ok(_) => None,
                    Err(e) => Some((Err(e), state)),
                };
            }

            match state.body.next().await {
                Some(Ok(chunk)) => state.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    state.finished = true;
                    state.buffer.clear();
                    return Some((Err(LlmError::Network(e)), state));
                }
                None => state.finished = true,
            }
        }
    })
}

/// Text fragments of an SSE body: payloads parsed, empty chunks dropped.
pub(crate) fn sse_fragments<S, B>(body: S) -> impl Stream<Item = Result<String, LlmError>>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    sse_data_lines(body).filter_map(|item| async move {
        match item.and_then(|data| parse_sse_data(&data)) {
            Ok(Some(text)) => Some(Ok(text)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    })
}
