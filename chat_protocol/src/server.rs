use tracing::{info, warn};

use crate::codec::Handle;
use crate::display::DisplaySink;
use crate::error::{ChatError, Result};
use crate::handshake::HandshakePolicy;
use crate::input::LineSource;
use crate::session::{Role, Session, SessionEnd};
use crate::transport::Acceptor;

pub const WAITING_NOTICE: &str = "Waiting for a new connection.";

/// Accepts a single peer and chats with it until the session ends.
pub fn serve_one<L, D>(
    acceptor: &Acceptor,
    local: &Handle,
    policy: HandshakePolicy,
    source: &mut L,
    sink: &mut D,
) -> Result<SessionEnd>
where
    L: LineSource + ?Sized,
    D: DisplaySink + ?Sized,
{
    let (connection, peer) = acceptor.accept().map_err(ChatError::Accept)?;
    sink.notice(&format!("New connection from {peer}.")).map_err(ChatError::Display)?;
    let session = Session::establish(connection, Role::Responder, local.clone(), policy)?;
    info!(%peer, remote = session.remote_handle(), "session started");
    session.run(source, sink)
}

/// Serves peers one after another. Only returns once the local operator has
/// no more input, or on a failure that is not confined to one session (a
/// broken listener or display).
pub fn serve<L, D>(
    acceptor: &Acceptor,
    local: &Handle,
    policy: HandshakePolicy,
    source: &mut L,
    sink: &mut D,
) -> Result<()>
where
    L: LineSource + ?Sized,
    D: DisplaySink + ?Sized,
{
    loop {
        match serve_one(acceptor, local, policy, source, sink) {
            Ok(SessionEnd::InputClosed) => return Ok(()),
            Ok(_) => {}
            Err(err) if err.is_session_local() => warn!("session aborted: {err}"),
            Err(err) => return Err(err),
        }
        sink.notice(WAITING_NOTICE).map_err(ChatError::Display)?;
    }
}
