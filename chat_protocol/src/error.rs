use std::io;

use thiserror::Error;

/// Everything that can end a session (or the startup of one) abnormally.
///
/// A peer closing its side of the stream is *not* an error; that is reported
/// through [`crate::SessionEnd::PeerClosed`].
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("transport failure: {0}")]
    TransportFailure(#[from] io::Error),

    #[error("failed to accept a connection: {0}")]
    Accept(#[source] io::Error),

    #[error("invalid handle {handle:?}: must be 1 to 10 characters")]
    InvalidHandle { handle: String },

    #[error("peer sent an unusable handle {0:?}")]
    InvalidRemoteHandle(String),

    #[error("failed to read local input: {0}")]
    Input(#[source] io::Error),

    #[error("local input closed")]
    InputClosed,

    #[error("failed to write to the display: {0}")]
    Display(#[source] io::Error),
}

/// Coarse grouping of [`ChatError`] used by the accept loop to decide whether
/// a failure only ends the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TransportFailure,
    Listener,
    Handshake,
    Input,
    Output,
    Configuration,
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::TransportFailure(_) => ErrorKind::TransportFailure,
            ChatError::Accept(_) => ErrorKind::Listener,
            ChatError::InvalidRemoteHandle(_) => ErrorKind::Handshake,
            ChatError::Input(_) | ChatError::InputClosed => ErrorKind::Input,
            ChatError::Display(_) => ErrorKind::Output,
            ChatError::InvalidHandle { .. } => ErrorKind::Configuration,
        }
    }

    /// True when the failure is confined to one session and the listener may
    /// go back to accepting.
    pub fn is_session_local(&self) -> bool {
        matches!(self.kind(), ErrorKind::TransportFailure | ErrorKind::Handshake)
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
