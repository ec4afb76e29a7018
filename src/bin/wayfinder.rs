//! wayfinder: gateway selection CLI
//!
//! Resolves the fastest healthy gateway and routable URLs, sharing the
//! persistent cache with any other process using the same store file.

use clap::{Parser, Subcommand};

use wayfinder::config::Config;

/// Wayfinder CLI
#[derive(Parser)]
#[command(name = "wayfinder")]
#[command(version = wayfinder::PKG_VERSION)]
#[command(about = "Health-ranked gateway selection")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "WAYFINDER_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Skip gateway selection and build URLs on the fallback host.
    #[arg(long)]
    no_routing: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the best gateway (optionally one that serves a resource)
    Best {
        /// Resource name or content address to verify
        resource: Option<String>,
    },

    /// Print the fetchable URL for a resource
    Url {
        /// Resource name or 43-character content address
        name: String,
        /// Parent name, for sub-names
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Probe the gateways now and print the ranking
    Rank,

    /// Forget the cached ranking and availability answers
    ClearCache,

    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Command::Version = args.command {
        println!("wayfinder {}", wayfinder::version_string());
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    let resolver = config.builder().build()?;

    match args.command {
        Command::Best { resource } => {
            let gateway = if args.no_routing {
                resolver.fallback_host().to_string()
            } else {
                match resource {
                    Some(resource) => resolver.best_gateway_for(&resource, None).await,
                    None => resolver.best_gateway().await,
                }
            };
            println!("{gateway}");
        }

        Command::Url { name, parent } => {
            let url = if args.no_routing {
                resolver.fallback_url(&name, parent.as_deref())
            } else {
                resolver.routable_url(&name, parent.as_deref()).await
            };
            println!("{url}");
        }

        Command::Rank => match resolver.refresh().await {
            Some(entry) => {
                println!("{:<4} {:<40} {:>10}", "#", "gateway", "latency");
                for (i, result) in entry.ranked_candidates.iter().enumerate() {
                    println!(
                        "{:<4} {:<40} {:>8.1}ms",
                        i + 1,
                        result.host,
                        result.latency_ms()
                    );
                }
            }
            None => {
                println!("no healthy gateways");
                println!("fallback: {}", resolver.fallback_host());
            }
        },

        Command::ClearCache => {
            resolver.clear().await;
            println!("cleared {}", config.store_path().display());
        }

        // handled before config loading
        Command::Version => {}
    }

    Ok(())
}
