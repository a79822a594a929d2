//! The alternating-turn state machine.
//!
//! After the handshake a session flips between waiting for the peer and
//! asking the local operator for a line. Nothing on the wire numbers the
//! turns; alternation holds only because each side blocks on exactly one
//! receive per send. A peer that writes out of turn corrupts the framing and
//! there is no way to resynchronise.

use std::net::TcpStream;

use tracing::{debug, info};

use crate::codec::{self, Handle, MAX_MESSAGE_CHARS, QUIT_SENTINEL};
use crate::display::DisplaySink;
use crate::error::{ChatError, Result};
use crate::handshake::{HandshakePolicy, perform_handshake};
use crate::input::{LineSource, read_valid_line};
use crate::transport::{Connection, Stream};

/// Which end of the connection we are. Fixes handshake order and who speaks
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Initiator,
    Responder,
}

impl Role {
    pub fn first_turn(self) -> TurnState {
        match self {
            Role::Initiator => TurnState::ProduceOutgoing,
            Role::Responder => TurnState::AwaitIncoming,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitIncoming,
    ProduceOutgoing,
}

/// Why a session reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The local operator typed the quit sentinel.
    LocalQuit,
    /// The peer sent the quit sentinel.
    PeerQuit,
    /// The peer closed the stream (zero-byte receive).
    PeerClosed,
    /// The local line source ran dry; treated like a quit.
    InputClosed,
}

pub struct Session<S: Stream = TcpStream> {
    connection: Connection<S>,
    local: Handle,
    remote: String,
    state: TurnState,
}

impl<S: Stream> Session<S> {
    /// Runs the handshake over a freshly established connection.
    pub fn establish(
        mut connection: Connection<S>,
        role: Role,
        local: Handle,
        policy: HandshakePolicy,
    ) -> Result<Self> {
        let remote = perform_handshake(&mut connection, role, &local, policy)?;
        Ok(Session {
            connection,
            local,
            remote,
            state: role.first_turn(),
        })
    }

    pub fn remote_handle(&self) -> &str {
        &self.remote
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Drives the session to completion. The connection is closed whichever
    /// way this returns.
    pub fn run<L, D>(mut self, source: &mut L, sink: &mut D) -> Result<SessionEnd>
    where
        L: LineSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        let outcome = self.drive(source, sink);
        if let Err(err) = self.connection.close() {
            debug!("closing connection: {err}");
        }
        let end = outcome?;
        info!(remote = %self.remote, ?end, "session finished");
        sink.notice(&self.end_notice(end)).map_err(ChatError::Display)?;
        Ok(end)
    }

    fn drive<L, D>(&mut self, source: &mut L, sink: &mut D) -> Result<SessionEnd>
    where
        L: LineSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        loop {
            if let Some(end) = self.step(source, sink)? {
                return Ok(end);
            }
        }
    }

    /// Performs exactly one turn.
    pub fn step<L, D>(&mut self, source: &mut L, sink: &mut D) -> Result<Option<SessionEnd>>
    where
        L: LineSource + ?Sized,
        D: DisplaySink + ?Sized,
    {
        match self.state {
            TurnState::AwaitIncoming => {
                let Some(bytes) = self.connection.receive_turn()? else {
                    return Ok(Some(SessionEnd::PeerClosed));
                };
                let text = codec::decode_turn(&bytes);
                debug!(bytes = bytes.len(), "received turn");
                if codec::is_quit(&text) {
                    return Ok(Some(SessionEnd::PeerQuit));
                }
                sink.message(&text).map_err(ChatError::Display)?;
                self.state = TurnState::ProduceOutgoing;
                Ok(None)
            }
            TurnState::ProduceOutgoing => {
                let prompt = format!("{}> ", self.local);
                let line = match read_valid_line(source, &prompt, 1, MAX_MESSAGE_CHARS) {
                    Ok(line) => line,
                    Err(ChatError::InputClosed) => {
                        self.connection.send(&codec::encode_turn(QUIT_SENTINEL))?;
                        return Ok(Some(SessionEnd::InputClosed));
                    }
                    Err(err) => return Err(err),
                };
                if codec::is_quit(&line) {
                    self.connection.send(&codec::encode_turn(QUIT_SENTINEL))?;
                    return Ok(Some(SessionEnd::LocalQuit));
                }
                let outgoing = codec::format_outgoing(&self.local, &line);
                self.connection.send(&codec::encode_turn(&outgoing))?;
                debug!(chars = line.chars().count(), "sent turn");
                self.state = TurnState::AwaitIncoming;
                Ok(None)
            }
        }
    }

    fn end_notice(&self, end: SessionEnd) -> String {
        match end {
            SessionEnd::LocalQuit | SessionEnd::InputClosed => "Connection closed.".to_string(),
            SessionEnd::PeerQuit => format!("{} closed the connection.", self.remote),
            SessionEnd::PeerClosed => "Peer disconnected.".to_string(),
        }
    }
}
