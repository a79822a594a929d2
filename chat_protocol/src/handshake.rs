use tracing::debug;

use crate::codec::{self, HANDSHAKE_MAX_BYTES, Handle};
use crate::error::{ChatError, Result};
use crate::session::Role;
use crate::transport::{Connection, Stream};

/// How much to trust the handle a peer announces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandshakePolicy {
    /// Take whatever arrives, including nothing at all.
    #[default]
    Lenient,
    /// Reject handles that would not pass local validation.
    Strict,
}

/// Exchanges handles once, right after the connection is established.
///
/// The responder reads first and the initiator writes first; both sides have
/// to agree on this or they deadlock.
pub fn perform_handshake<S: Stream>(
    connection: &mut Connection<S>,
    role: Role,
    local: &Handle,
    policy: HandshakePolicy,
) -> Result<String> {
    let remote = match role {
        Role::Responder => {
            let remote = codec::decode_handle(&connection.receive(HANDSHAKE_MAX_BYTES)?);
            connection.send(&codec::encode_handle(local))?;
            remote
        }
        Role::Initiator => {
            connection.send(&codec::encode_handle(local))?;
            codec::decode_handle(&connection.receive(HANDSHAKE_MAX_BYTES)?)
        }
    };
    debug!(?role, %local, %remote, "handshake complete");

    if policy == HandshakePolicy::Strict && !codec::is_valid_handle(&remote) {
        return Err(ChatError::InvalidRemoteHandle(remote));
    }
    Ok(remote)
}
