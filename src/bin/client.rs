//! Terminal chat client over REST and a single WebSocket.
//!
//! Logs in against the backend (optionally signing up first), prints the
//! public-chat history, and enters an interactive loop where plain lines are
//! sent to the active channel and `/` lines are commands.
//!
//! Run with:
//! ```not_rust
//! cargo run -- --username alice --password secret
//! cargo run -- -n alice -p secret --register "Alice the Great"
//! ```

use clap::Parser;

use idobata::common::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "idobata")]
#[command(about = "Terminal chat client over REST and a single WebSocket", long_about = None)]
struct Args {
    /// Username for authentication
    #[arg(short = 'n', long)]
    username: String,

    /// Password for authentication (resent in every call; this backend has no tokens)
    #[arg(short = 'p', long)]
    password: String,

    /// Sign up with this display name before logging in
    #[arg(long)]
    register: Option<String>,

    /// Chat backend base URL
    #[arg(short = 'u', long, default_value = "http://127.0.0.1:8000")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) =
        idobata::client::run_client(args.url, args.username, args.password, args.register).await
    {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
