//! Command-line front end for the recipient router.
//!
//! Loads a TOML configuration (chains, lookup policy, static key directory),
//! resolves delivery routes for the given recipients and prints them as JSON.
//! Exits with status 2 when any recipient cannot be routed.
//!
//! `watch` follows the config file and re-resolves whenever the chain list
//! changes. The key directory is loaded once at startup.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;

use recipient_router::config::{load_config, ConfigWatcher};
use recipient_router::observability::logging;
use recipient_router::routing::DirectoryRouteFinder;
use recipient_router::{unrouted_addresses, RouteResolver};

const EXIT_UNROUTABLE: u8 = 2;

#[derive(Parser)]
#[command(name = "route-cli")]
#[command(about = "Resolve encrypted message routes for recipient addresses", long_about = None)]
struct Cli {
    /// Router configuration file.
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve routes for one or more recipients
    Resolve {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
    /// Check whether a single address is routable
    Check { address: String },
    /// List registered chains in preference order
    Chains,
    /// Re-resolve the given recipients every time the chain list in the config file changes
    Watch {
        #[arg(required = true)]
        addresses: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.observability.log_level);

    tracing::debug!(
        config = %cli.config.display(),
        chains = config.chains.len(),
        selection = ?config.resolver.selection,
        "Configuration loaded"
    );

    let resolver = RouteResolver::from_config(&config);

    match cli.command {
        Commands::Resolve { addresses } => {
            if print_resolution(&resolver, &addresses).await? > 0 {
                return Ok(ExitCode::from(EXIT_UNROUTABLE));
            }
        }
        Commands::Check { address } => match resolver.is_address_routable(&address).await? {
            Some(route) => {
                print_json(&json!({
                    "type": route.route_type,
                    "blockchain": route.blockchain,
                }))?;
            }
            None => {
                print_json(&Value::Bool(false))?;
                return Ok(ExitCode::from(EXIT_UNROUTABLE));
            }
        },
        Commands::Chains => {
            let names: Vec<String> = resolver
                .registry()
                .list_registered_chains()
                .iter()
                .map(|c| c.name().to_string())
                .collect();
            print_json(&json!(names))?;
        }
        Commands::Watch { addresses } => {
            let (watcher, mut updates) = ConfigWatcher::new(&cli.config, &config);
            let _guard = watcher.run()?;

            print_resolution(&resolver, &addresses).await?;
            loop {
                tokio::select! {
                    update = updates.recv() => {
                        let Some(config) = update else { break };
                        resolver.registry().apply_config(&config.chains);
                        print_resolution(&resolver, &addresses).await?;
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Interrupted, stopping watch");
                        break;
                    }
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Resolve `addresses`, print routes and unrouted recipients, and return the unrouted count.
async fn print_resolution(
    resolver: &RouteResolver<DirectoryRouteFinder>,
    addresses: &[String],
) -> Result<usize, Box<dyn std::error::Error>> {
    let routes = resolver.resolve_routes(addresses).await?;
    let unrouted = unrouted_addresses(addresses, &routes);
    print_json(&json!({ "routes": routes, "unrouted": unrouted }))?;

    if !unrouted.is_empty() {
        tracing::warn!(
            count = unrouted.len(),
            "No keys found on the blockchain for some recipients"
        );
    }
    Ok(unrouted.len())
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
