//! Two-party, turn-based text chat over a TCP stream.
//!
//! A session goes through three phases:
//!
//! 1. a [`transport::Connection`] is accepted (responder) or dialled
//!    (initiator);
//! 2. both sides swap display handles once ([`handshake`]);
//! 3. the [`session`] loop alternates strictly between receiving a turn and
//!    sending one until someone types `\quit` or hangs up.
//!
//! Local input and display go through the [`LineSource`] and [`DisplaySink`]
//! traits, so a session can be driven by a terminal ([`terminal`]) or by
//! canned lines.

pub mod codec;
pub mod display;
pub mod error;
pub mod handshake;
pub mod input;
pub mod server;
pub mod session;
pub mod terminal;
pub mod transport;

pub use codec::{Handle, QUIT_SENTINEL};
pub use display::{DisplaySink, Displayed, RecordingSink};
pub use error::{ChatError, ErrorKind, Result};
pub use handshake::{HandshakePolicy, perform_handshake};
pub use input::{LineSource, ScriptedLines, read_handle, read_valid_line};
pub use server::{serve, serve_one};
pub use session::{Role, Session, SessionEnd, TurnState};
pub use terminal::{StdinLines, TerminalDisplay};
pub use transport::{Acceptor, Connection, Stream};
