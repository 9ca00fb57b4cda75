//! Frame-level parser for Remote ID broadcast payloads
//!
//!  Splits a raw advertisement payload into 25-byte messages, handling
//!  the optional message-pack wrapper, and drives the message decoder
//!  over each slice. Stateless; one call per received frame.

use thiserror::Error;

use crate::message::{
    self, DecodedMessage, MESSAGE_BYTES, MESSAGE_PAYLOAD_BYTES, PACK_TYPE_NIBBLE,
};

/// Frame-level classification returned alongside the decoded messages.
///
/// Message-level anomalies (unknown types, sentinel values) never show
/// up here; they stay in-band in the `DecodedMessage` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every byte of the frame was consumed.
    Ok,
    /// Messages were decoded but `n` bytes at the end did not form a
    /// whole message and were dropped.
    TrailingBytes(usize),
    /// The frame was empty; nothing to decode.
    EmptyInput,
    /// The pack header declared a message size other than 25 (or was
    /// truncated before the size byte, reported as 0). The size field
    /// is load-bearing for splitting, so the whole frame is rejected.
    UnsupportedMessageSize(u8),
}

/// Parse one raw frame as received off the air.
///
/// Returns the decoded messages in frame byte order together with the
/// frame-level outcome. Never panics; the worst adversarial input
/// yields an empty list or a list of `Unknown` records.
pub fn parse(frame: &[u8]) -> (Vec<DecodedMessage>, ParseOutcome) {
    if frame.is_empty() {
        return (Vec::new(), ParseOutcome::EmptyInput);
    }

    let mut cursor = 0usize;
    let mut declared_count: Option<usize> = None;

    if frame[0] >> 4 == PACK_TYPE_NIBBLE {
        let size = match frame.get(1) {
            Some(&s) => s,
            None => return (Vec::new(), ParseOutcome::UnsupportedMessageSize(0)),
        };
        if size as usize != MESSAGE_BYTES {
            return (Vec::new(), ParseOutcome::UnsupportedMessageSize(size));
        }
        match frame.get(2) {
            Some(&count) => {
                declared_count = Some(count as usize);
                cursor = 3;
            }
            // Header with no payload: nothing to decode, but not an error.
            None => return (Vec::new(), ParseOutcome::Ok),
        }
    }

    let available = (frame.len() - cursor) / MESSAGE_BYTES;
    // The declared count is a hint only; trust the actual byte length.
    let count = declared_count.map_or(available, |d| d.min(available));

    let mut messages = Vec::with_capacity(count);
    for _ in 0..count {
        let slice = &frame[cursor..cursor + MESSAGE_BYTES];
        let mut payload = [0u8; MESSAGE_PAYLOAD_BYTES];
        payload.copy_from_slice(&slice[1..]);
        messages.push(message::decode_message(slice[0], &payload));
        cursor += MESSAGE_BYTES;
    }

    let trailing = frame.len() - cursor;
    let outcome = if trailing > 0 {
        ParseOutcome::TrailingBytes(trailing)
    } else {
        ParseOutcome::Ok
    };
    (messages, outcome)
}

/// Errors from the hex frame framing used by the file and network
/// ingest paths.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexFrameError {
    #[error("odd number of hex digits ({0})")]
    OddLength(usize),
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

/// Decode one hex-encoded frame line into raw bytes.
///
/// Whitespace around the line is ignored; an empty line yields an
/// empty frame.
pub fn decode_hex_frame(line: &str) -> Result<Vec<u8>, HexFrameError> {
    let hex = line.trim();
    if hex.len() % 2 != 0 {
        return Err(HexFrameError::OddLength(hex.len()));
    }

    let mut frame = Vec::with_capacity(hex.len() / 2);
    for chunk in hex.as_bytes().chunks(2) {
        let high = hex_digit_val(chunk[0])
            .ok_or(HexFrameError::InvalidDigit(chunk[0] as char))?;
        let low = hex_digit_val(chunk[1])
            .ok_or(HexFrameError::InvalidDigit(chunk[1] as char))?;
        frame.push((high << 4) | low);
    }
    Ok(frame)
}

fn hex_digit_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
