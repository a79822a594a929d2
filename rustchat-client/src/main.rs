mod chat;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use chat_protocol::{Handle, HandshakePolicy, StdinLines, TerminalDisplay, read_handle};

#[derive(Parser, Debug)]
#[command(version, about = "Turn-based chat client", long_about = None)]
pub struct Args {
    /// Address of the chat server
    address: String,

    /// Port the chat server listens on
    port: u16,

    #[arg(long)]
    /// Handle to chat under (prompted for when omitted)
    handle: Option<String>,

    #[arg(long)]
    /// Refuse servers whose handle is empty or longer than 10 characters
    strict_handshake: bool,

    #[arg(short, long)]
    /// Enable debug logging
    debug: bool,
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let mut source = StdinLines::new();
    let mut display = TerminalDisplay::new();

    let handle = match args.handle {
        Some(handle) => Handle::new(handle)?,
        None => read_handle(&mut source).context("no handle entered")?,
    };
    let policy = if args.strict_handshake {
        HandshakePolicy::Strict
    } else {
        HandshakePolicy::Lenient
    };

    let end = chat::start_session_as_client(
        &args.address,
        args.port,
        handle,
        policy,
        &mut source,
        &mut display,
    )?;
    info!(?end, "client exiting");
    Ok(())
}
