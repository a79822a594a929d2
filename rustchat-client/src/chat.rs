use anyhow::Context;
use chat_protocol::{
    Connection, DisplaySink, Handle, HandshakePolicy, LineSource, Role, Session, SessionEnd,
};

/*
Chat handshake protocol (initiator side):

    client -> server    raw handle bytes, no terminator
    server -> client    raw handle bytes, no terminator

After that the client speaks first and the two sides alternate, one
newline-terminated line per turn, until either sends "\quit" or hangs up.
*/

pub fn start_session_as_client<L, D>(
    address: &str,
    port: u16,
    local: Handle,
    policy: HandshakePolicy,
    source: &mut L,
    sink: &mut D,
) -> anyhow::Result<SessionEnd>
where
    L: LineSource + ?Sized,
    D: DisplaySink + ?Sized,
{
    let connection = Connection::connect(address, port)
        .with_context(|| format!("failed to connect to {address}:{port}"))?;
    let session = Session::establish(connection, Role::Initiator, local, policy)
        .context("handshake failed")?;
    sink.notice(&format!("Chatting with {}.", session.remote_handle()))?;
    Ok(session.run(source, sink)?)
}
