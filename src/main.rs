use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use log::info;

use streak_stats::server::{create_router, AppState};

#[derive(Parser)]
#[command(name = "streak-stats")]
#[command(about = "Serve GitHub contribution streak cards as SVG, PNG, or JSON")]
struct Args {
    /// GitHub token used for the contribution GraphQL queries
    #[arg(short, long, env = "GITHUB_TOKEN")]
    token: String,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let state = AppState {
        client: reqwest::Client::new(),
        token: args.token,
    };
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
