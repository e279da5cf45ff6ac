use clap::{Parser, Subcommand};
use sharded_kv::config::{PortRange, parse_assignments};
use sharded_kv::hashring::Strategy;
use sharded_kv::router::{DEFAULT_HOST, Router, RouterConfig};
use sharded_kv::storage::server::Cluster;
use std::net::IpAddr;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "sharded-kv")]
#[command(about = "Sharded in-memory key/value store with client-side hash routing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start one shard server per port in START-END
    Serve {
        ports: PortRange,
        /// Address the shard servers bind to
        #[arg(long, env = "SHARDED_KV_BIND", default_value = "127.0.0.1")]
        bind: IpAddr,
    },
    /// Route KEY->VALUE pairs to the shards on START-END and store them
    Put {
        ports: PortRange,
        /// Comma-separated KEY->VALUE pairs, e.g. "1->A,2->B,3->C"
        assignments: String,
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Print the shard owning KEY
    Route {
        ports: PortRange,
        key: String,
        #[command(flatten)]
        client: ClientArgs,
    },
}

#[derive(clap::Args)]
struct ClientArgs {
    #[arg(long, env = "SHARDED_KV_STRATEGY", value_enum, default_value_t = Strategy::Ring)]
    strategy: Strategy,
    /// Host the shard servers run on
    #[arg(long, env = "SHARDED_KV_HOST", default_value = DEFAULT_HOST)]
    host: String,
    /// Per-request timeout in milliseconds
    #[arg(long, env = "SHARDED_KV_TIMEOUT_MS", default_value_t = 2000)]
    timeout_ms: u64,
}

impl ClientArgs {
    fn router(&self, ports: PortRange) -> anyhow::Result<Router> {
        let config = RouterConfig {
            strategy: self.strategy,
            request_timeout: Duration::from_millis(self.timeout_ms),
            default_host: self.host.clone(),
        };
        Ok(Router::new(ports.node_urls(&self.host), config)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { ports, bind } => serve(ports, bind).await,
        Commands::Put {
            ports,
            assignments,
            client,
        } => put(ports, &assignments, &client).await,
        Commands::Route { ports, key, client } => {
            let router = client.router(ports)?;
            println!("{}", router.route(&key)?);
            Ok(())
        }
    }
}

async fn serve(ports: PortRange, bind: IpAddr) -> anyhow::Result<()> {
    tracing::info!("Starting {} shard servers on {}:{}", ports.len(), bind, ports);

    let cluster = Cluster::start(bind, ports.ports()).await?;
    tracing::info!("Press Ctrl+C to shutdown");

    tokio::select! {
        _ = cluster.wait() => {
            tracing::warn!("All shard servers exited");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}

async fn put(ports: PortRange, assignments: &str, client: &ClientArgs) -> anyhow::Result<()> {
    let pairs = parse_assignments(assignments)?;
    let router = client.router(ports)?;

    let reports = router.put_batch(&pairs).await;
    let failed = reports.iter().filter(|report| !report.is_success()).count();

    for report in &reports {
        match &report.outcome {
            Ok(node) => println!("{}->{} stored on {}", report.key, report.value, node),
            Err(e) => println!("{}->{} failed: {}", report.key, report.value, e),
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} writes failed", failed, reports.len());
    }
    Ok(())
}
