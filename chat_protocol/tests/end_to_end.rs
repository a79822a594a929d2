//! Both ends of a chat driven over loopback TCP, one thread per peer.

use std::thread;

use chat_protocol::server::WAITING_NOTICE;
use chat_protocol::{
    Acceptor, Connection, Displayed, Handle, HandshakePolicy, RecordingSink, Role, ScriptedLines,
    Session, SessionEnd, serve, serve_one,
};

fn listen() -> (Acceptor, u16) {
    let acceptor = Acceptor::listen("127.0.0.1", 0).unwrap();
    let port = acceptor.local_addr().unwrap().port();
    (acceptor, port)
}

fn run_client(port: u16, handle: &str, lines: &[&str]) -> (SessionEnd, RecordingSink) {
    let connection = Connection::connect("127.0.0.1", port).unwrap();
    let session = Session::establish(
        connection,
        Role::Initiator,
        Handle::new(handle).unwrap(),
        HandshakePolicy::Strict,
    )
    .unwrap();
    let mut source = ScriptedLines::new(lines.iter().copied());
    let mut sink = RecordingSink::new();
    let end = session.run(&mut source, &mut sink).unwrap();
    (end, sink)
}

fn notices(sink: &RecordingSink) -> Vec<&str> {
    sink.entries()
        .iter()
        .filter_map(|entry| match entry {
            Displayed::Notice(text) => Some(text.as_str()),
            Displayed::Message(_) => None,
        })
        .collect()
}

#[test]
fn ann_and_bob_exchange_one_round() {
    let (acceptor, port) = listen();
    let server = thread::spawn(move || {
        let mut source = ScriptedLines::new(["yo"]);
        let mut sink = RecordingSink::new();
        let bob = Handle::new("Bob").unwrap();
        let end = serve_one(&acceptor, &bob, HandshakePolicy::Strict, &mut source, &mut sink)
            .unwrap();
        (end, sink)
    });

    let (ann_end, ann_sink) = run_client(port, "Ann", &["hi", "\\quit"]);
    let (bob_end, bob_sink) = server.join().unwrap();

    assert_eq!(ann_end, SessionEnd::LocalQuit);
    assert_eq!(ann_sink.messages(), vec!["Bob> yo"]);

    assert_eq!(bob_end, SessionEnd::PeerQuit);
    assert_eq!(bob_sink.messages(), vec!["Ann> hi"]);
    assert_eq!(notices(&bob_sink).last(), Some(&"Ann closed the connection."));
}

#[test]
fn longest_message_arrives_intact() {
    let long = "m".repeat(500);
    let (acceptor, port) = listen();
    let server = thread::spawn(move || {
        let mut source = ScriptedLines::new(["\\quit"]);
        let mut sink = RecordingSink::new();
        let handle = Handle::new("abcdefghij").unwrap();
        serve_one(&acceptor, &handle, HandshakePolicy::Lenient, &mut source, &mut sink).unwrap();
        sink
    });

    let (end, _) = run_client(port, "0123456789", &[long.as_str()]);
    let sink = server.join().unwrap();

    assert_eq!(end, SessionEnd::PeerQuit);
    assert_eq!(sink.messages(), vec![format!("0123456789> {long}").as_str()]);
}

#[test]
fn accept_loop_survives_hangups_and_bad_handshakes() {
    let (acceptor, port) = listen();
    let server = thread::spawn(move || {
        // one reply for the second real session, nothing for the third
        let mut source = ScriptedLines::new(["yo"]);
        let mut sink = RecordingSink::new();
        let bob = Handle::new("Bob").unwrap();
        serve(&acceptor, &bob, HandshakePolicy::Strict, &mut source, &mut sink).unwrap();
        sink
    });

    // handshake, then hang up without a word
    let connection = Connection::connect("127.0.0.1", port).unwrap();
    let silent = Session::establish(
        connection,
        Role::Initiator,
        Handle::new("Ann").unwrap(),
        HandshakePolicy::Strict,
    )
    .unwrap();
    assert_eq!(silent.remote_handle(), "Bob");
    drop(silent);

    // announce a handle the strict server refuses
    let mut rude = Connection::connect("127.0.0.1", port).unwrap();
    rude.send(b"far-too-long-handle").unwrap();
    assert_eq!(rude.receive(512).unwrap(), b"Bob");
    assert!(rude.receive(512).unwrap().is_empty());
    drop(rude);

    let (end, sink) = run_client(port, "Cy", &["hi", "\\quit"]);
    assert_eq!(end, SessionEnd::LocalQuit);
    assert_eq!(sink.messages(), vec!["Bob> yo"]);

    let (end, _) = run_client(port, "Di", &["anyone there?"]);
    assert_eq!(end, SessionEnd::PeerQuit);

    let sink = server.join().unwrap();
    assert_eq!(sink.messages(), vec!["Cy> hi", "Di> anyone there?"]);
    let notices = notices(&sink);
    assert!(notices.contains(&"Peer disconnected."));
    assert_eq!(notices.iter().filter(|n| **n == WAITING_NOTICE).count(), 3);
}

#[test]
fn turn_ending_in_any_byte_is_delivered() {
    let (acceptor, port) = listen();
    let server = thread::spawn(move || {
        let mut source = ScriptedLines::new(["\\quit"]);
        let mut sink = RecordingSink::new();
        let bob = Handle::new("Bob").unwrap();
        let end = serve_one(&acceptor, &bob, HandshakePolicy::Strict, &mut source, &mut sink)
            .unwrap();
        (end, sink)
    });

    let mut peer = Connection::connect("127.0.0.1", port).unwrap();
    peer.send(b"Ann").unwrap();
    assert_eq!(peer.receive(512).unwrap(), b"Bob");
    peer.send(b"Ann> hi\0").unwrap();
    assert_eq!(peer.receive(512).unwrap(), b"\\quit\n");

    let (end, sink) = server.join().unwrap();
    assert_eq!(end, SessionEnd::LocalQuit);
    assert_eq!(sink.messages(), vec!["Ann> hi"]);
}
