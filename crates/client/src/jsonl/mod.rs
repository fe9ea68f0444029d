//! Incremental JSON Lines decoding.
//!
//! Turns a byte stream of newline-delimited JSON into the ordered list of
//! records it carries. Chunk boundaries may fall anywhere: inside a record,
//! between `\r` and `\n`, or in the middle of a multi-byte character.
//!
//! ### Record policy
//! - Empty and whitespace-only lines are skipped.
//! - Lines that are not valid JSON are skipped and logged at `debug`.
//! - An unterminated final line is parsed at end of stream; if it is not
//!   valid JSON it is dropped the same way.
//!
//! ### Failure
//! Only the stream itself can fail a decode. Its error is returned as-is and
//! nothing decoded before it is handed back.

pub mod lines;
pub mod utf8;

pub use lines::LineBuffer;
pub use utf8::Utf8Decoder;

use futures_util::{Stream, StreamExt};
use serde_json::Value;

/// Stateful JSONL decoder for one stream.
#[derive(Debug, Default)]
pub struct JsonlDecoder {
    utf8: Utf8Decoder,
    lines: LineBuffer,
    text: String,
    skipped: usize,
}

impl JsonlDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning the records completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.text.clear();
        self.utf8.decode(chunk, &mut self.text);
        self.lines.push_str(&self.text);

        let mut records = Vec::new();
        let skipped = &mut self.skipped;
        self.lines.drain_lines(|line| match parse_line(line) {
            Some(Ok(value)) => records.push(value),
            Some(Err(err)) => {
                *skipped += 1;
                tracing::debug!(error = %err, len = line.len(), "skipping malformed JSONL record");
            }
            None => {}
        });
        records
    }

    /// Signal end of stream and return the trailing record, if any.
    pub fn finish(mut self) -> Option<Value> {
        self.text.clear();
        self.utf8.finish(&mut self.text);
        self.lines.push_str(&self.text);

        let remainder = self.lines.take_remainder();
        match parse_line(&remainder)? {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(error = %err, len = remainder.len(), "discarding unterminated trailing fragment");
                None
            }
        }
    }

    /// Number of non-blank lines dropped so far because they were not JSON.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// `None` for blank lines, otherwise the parse outcome.
fn parse_line(line: &str) -> Option<Result<Value, serde_json::Error>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}

/// Decode a whole JSONL byte stream.
///
/// The stream is consumed and dropped before this returns, whether it ended
/// normally or with an error.
pub async fn decode_jsonl<S, B, E>(stream: S) -> Result<Vec<Value>, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let mut stream = std::pin::pin!(stream);
    let mut decoder = JsonlDecoder::new();
    let mut records = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        records.extend(decoder.push(chunk.as_ref()));
    }

    let skipped = decoder.skipped();
    records.extend(decoder.finish());

    tracing::debug!(records = records.len(), skipped, "JSONL stream decoded");

    Ok(records)
}
