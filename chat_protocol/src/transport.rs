use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use tracing::{debug, info};

use crate::codec::MAX_TURN_BYTES;

/// Byte stream a [`Connection`] runs over.
pub trait Stream: Read + Write {
    fn close_stream(&mut self) -> io::Result<()>;
}

impl Stream for TcpStream {
    fn close_stream(&mut self) -> io::Result<()> {
        self.shutdown(Shutdown::Both)
    }
}

/// Listening side. Connections are handed out one at a time; anything that
/// connects meanwhile waits in the OS backlog until the next `accept`.
pub struct Acceptor {
    listener: TcpListener,
}

impl Acceptor {
    pub fn listen(host: &str, port: u16) -> io::Result<Self> {
        let listener = TcpListener::bind((host, port))?;
        info!("listening on {}", listener.local_addr()?);
        Ok(Acceptor { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn accept(&self) -> io::Result<(Connection, SocketAddr)> {
        let (stream, addr) = self.listener.accept()?;
        info!("accepted connection from {addr}");
        Ok((Connection::new(stream), addr))
    }
}

pub struct Connection<S: Stream = TcpStream> {
    stream: S,
    closed: bool,
}

impl Connection<TcpStream> {
    pub fn connect(address: &str, port: u16) -> io::Result<Self> {
        let mut last_err = None;
        for addr in (address, port).to_socket_addrs()? {
            match TcpStream::connect(addr) {
                Ok(stream) => {
                    info!("connected to {addr}");
                    return Ok(Connection::new(stream));
                }
                Err(err) => {
                    debug!("connect to {addr} failed: {err}");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("{address}:{port} did not resolve to any address"),
            )
        }))
    }
}

impl<S: Stream> Connection<S> {
    pub fn new(stream: S) -> Self {
        Connection { stream, closed: false }
    }

    pub fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()
    }

    /// One read of at most `max` bytes. Empty means the peer closed.
    pub fn receive(&mut self, max: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; max];
        let n = read_retrying(&mut self.stream, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Reads one chat turn: a single receive of up to `MAX_TURN_BYTES`,
    /// trailing byte included. `None` when the peer closed.
    pub fn receive_turn(&mut self) -> io::Result<Option<Vec<u8>>> {
        let turn = self.receive(MAX_TURN_BYTES)?;
        Ok((!turn.is_empty()).then_some(turn))
    }

    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.stream.close_stream() {
            Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

impl<S: Stream> Drop for Connection<S> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn read_retrying<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
