use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use chat_protocol::{
    Acceptor, DisplaySink, Handle, HandshakePolicy, StdinLines, TerminalDisplay, read_handle,
    serve,
};

#[derive(Parser, Debug)]
#[command(version, about = "Turn-based chat server", long_about = None)]
pub struct Args {
    /// Port to listen on
    port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    /// Address to bind to
    host: String,

    #[arg(long)]
    /// Handle to chat under (prompted for when omitted)
    handle: Option<String>,

    #[arg(long)]
    /// Drop clients whose handle is empty or longer than 10 characters
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

    let acceptor = Acceptor::listen(&args.host, args.port)
        .with_context(|| format!("failed to listen on {}:{}", args.host, args.port))?;
    display.notice("Server is running.")?;
    info!(%handle, "accepting connections");

    serve(&acceptor, &handle, policy, &mut source, &mut display)?;
    info!("local input closed, shutting down");
    Ok(())
}
