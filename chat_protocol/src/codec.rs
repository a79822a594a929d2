//! Wire framing for the chat protocol.
//!
//! Two kinds of units cross the wire:
//!
//! * the handshake handle, written raw with no terminator and read with a
//!   single bounded receive;
//! * chat turns, written as `payload + '\n'`. The receiver drops exactly the
//!   final byte of what it read, whatever that byte is.
//!
//! Ordinary turns carry `"<handle>> <text>"`. The quit sentinel is sent bare,
//! which is what lets the receiving side tell it apart from chat content.

use std::fmt;

use crate::error::{ChatError, Result};

pub const MAX_HANDLE_CHARS: usize = 10;
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Upper bound for one handshake receive.
pub const HANDSHAKE_MAX_BYTES: usize = 512;

pub const QUIT_SENTINEL: &str = "\\quit";
pub const TURN_DELIMITER: u8 = b'\n';

const PREFIX_SEPARATOR: &str = "> ";

/// Largest encoded turn: prefix and message at four UTF-8 bytes per char,
/// plus the delimiter.
pub const MAX_TURN_BYTES: usize =
    4 * (MAX_HANDLE_CHARS + PREFIX_SEPARATOR.len() + MAX_MESSAGE_CHARS) + 1;

/// Display name of the local peer, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle(String);

impl Handle {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if is_valid_handle(&text) {
            Ok(Handle(text))
        } else {
            Err(ChatError::InvalidHandle { handle: text })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_valid_handle(text: &str) -> bool {
    (1..=MAX_HANDLE_CHARS).contains(&text.chars().count())
}

pub fn encode_handle(handle: &Handle) -> Vec<u8> {
    handle.as_str().as_bytes().to_vec()
}

pub fn decode_handle(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

pub fn encode_turn(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(TURN_DELIMITER);
    bytes
}

pub fn decode_turn(bytes: &[u8]) -> String {
    match bytes.split_last() {
        Some((_, body)) => String::from_utf8_lossy(body).into_owned(),
        None => String::new(),
    }
}

pub fn format_outgoing(handle: &Handle, text: &str) -> String {
    format!("{handle}{PREFIX_SEPARATOR}{text}")
}

pub fn is_quit(text: &str) -> bool {
    text == QUIT_SENTINEL
}
