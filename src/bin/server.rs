use clap::Parser;
use tracing_subscriber::EnvFilter;

use bare_socket::{ServerConfig, WebSocketServer};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1")]
    addr: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Path serving the websocket upgrade
    #[arg(long, default_value = "/ws")]
    path: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("bare_socket=info".parse().unwrap()),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    WebSocketServer::bind(ServerConfig {
        addr: args.addr,
        port: args.port,
        path: args.path,
    })
    .await?
    .run()
    .await
}
