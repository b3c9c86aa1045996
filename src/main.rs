use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use signal_relay::registry::RegistryConfig;
use signal_relay::server::DEFAULT_PORT;
use signal_relay::{ServerConfig, SignalServer};
use tracing_subscriber::EnvFilter;

/// WebSocket signaling relay for WebRTC offer/answer/ICE exchange
#[derive(Parser, Debug)]
#[command(name = "signal-relay", version, about)]
struct Cli {
    /// Interface to listen on
    #[arg(long, env = "SIGNAL_RELAY_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Maximum concurrent connections (0 = unlimited)
    #[arg(long, env = "SIGNAL_RELAY_MAX_CONNECTIONS", default_value_t = 0)]
    max_connections: usize,

    /// Length of generated client identities
    #[arg(long, default_value_t = RegistryConfig::default().id_length)]
    id_length: usize,

    /// Log relay counters every N seconds (0 = disabled)
    #[arg(long, default_value_t = 0)]
    stats_interval_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("signal_relay=info")),
        )
        .init();

    let config = ServerConfig::with_addr(SocketAddr::new(cli.host, cli.port))
        .max_connections(cli.max_connections)
        .stats_interval(Duration::from_secs(cli.stats_interval_secs))
        .registry(RegistryConfig::default().id_length(cli.id_length));

    let server = SignalServer::new(config);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
