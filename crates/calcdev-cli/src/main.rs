mod config;

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use calcdev_core::{Endpoint, OperandPolicy};
use calcdev_device::DeviceRegistry;
use calcdev_engine::{CalculatorState, EndpointRouter, ReadStatus};
use calcdev_network::CalcServer;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Four-endpoint integer calculator
#[derive(Parser, Debug)]
#[command(name = "calcdev")]
#[command(about = "Integer calculator exposed as four character-device endpoints")]
#[command(version)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Major number of the `first` endpoint (overrides config)
    #[arg(long, global = true)]
    base_major: Option<u32>,

    /// Operand parsing policy: strict or zero_fallback (overrides config)
    #[arg(long, global = true)]
    operand_policy: Option<OperandPolicy>,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the endpoints over TCP
    Serve {
        /// Address to listen on (overrides config)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Compute one expression through the endpoint devices
    Eval {
        #[arg(allow_hyphen_values = true)]
        first: String,
        sign: String,
        #[arg(allow_hyphen_values = true)]
        second: String,
    },
    /// Print the effective configuration as JSON and exit
    PrintConfig,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(base_major) = self.base_major {
            config.devices.base_major = base_major;
        }
        if let Some(policy) = self.operand_policy {
            config.engine.operand_policy = policy;
        }
        if let Commands::Serve { bind: Some(addr) } = &self.command {
            config.server.bind_addr = *addr;
        }
        match self.verbose {
            0 => {}
            1 => config.logging.level = "debug".to_string(),
            _ => config.logging.level = "trace".to_string(),
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_registry(config: &AppConfig) -> Result<DeviceRegistry> {
    let state = Arc::new(CalculatorState::with_policy(config.engine.operand_policy));
    let router = EndpointRouter::new(state);
    DeviceRegistry::with_calculator(router, config.devices.base_major)
        .context("failed to register calculator devices")
}

async fn serve(config: AppConfig) -> Result<()> {
    let registry = Arc::new(build_registry(&config)?);
    for info in registry.devices() {
        tracing::debug!(device = %info.name, major = ?info.major, "Endpoint available");
    }

    let server = CalcServer::bind(config.server.clone(), registry).await?;
    tracing::info!(addr = %server.local_addr()?, "calcdev started");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
        })
        .await?;

    tracing::info!("calcdev stopped");
    Ok(())
}

/// Run one computation and return the rendered result bytes.
fn eval(config: &AppConfig, first: &str, sign: &str, second: &str) -> Result<Vec<u8>> {
    let registry = build_registry(config)?;

    for (endpoint, text) in [
        (Endpoint::First, first),
        (Endpoint::Second, second),
        (Endpoint::Sign, sign),
    ] {
        let report = registry.open(endpoint.name())?.write(text.as_bytes())?;
        if report.consumed < text.len() {
            tracing::warn!(%endpoint, stored = report.consumed, "Input truncated");
        }
    }

    let outcome = registry.open(Endpoint::Result.name())?.read(64)?;
    match outcome.status {
        ReadStatus::Delivered { .. } => Ok(outcome.bytes),
        ReadStatus::Rejected(e) => bail!(e),
        status => bail!("no result produced: {status:?}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    init_logging(&config);

    match cli.command {
        Commands::Serve { .. } => serve(config).await,
        Commands::Eval {
            ref first,
            ref sign,
            ref second,
        } => {
            let result = eval(&config, first, sign, second)?;
            std::io::stdout()
                .write_all(&result)
                .context("failed to write result")
        }
        Commands::PrintConfig => {
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "calcdev",
            "--base-major",
            "120",
            "--operand-policy",
            "zero_fallback",
            "-vv",
            "serve",
            "--bind",
            "0.0.0.0:7000",
        ]);
        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.devices.base_major, 120);
        assert_eq!(config.engine.operand_policy, OperandPolicy::ZeroFallback);
        assert_eq!(config.server.bind_addr.port(), 7000);
        assert_eq!(config.logging.level, "trace");
    }

    #[test]
    fn test_eval_negative_operands() {
        let cli = Cli::parse_from(["calcdev", "eval", "-7", "*", "-6"]);
        assert!(matches!(
            cli.command,
            Commands::Eval { ref first, ref second, .. } if first == "-7" && second == "-6"
        ));
    }

    #[test]
    fn test_eval_results() {
        let config = AppConfig::default();
        assert_eq!(eval(&config, "7", "/", "0").unwrap(), b"Infinity\n");
        assert_eq!(eval(&config, "-7", "*", "6").unwrap(), b"-42\n");
        assert_eq!(eval(&config, "7\n", "/", "2").unwrap(), b"3\n");

        let err = eval(&config, "7", "%", "2").unwrap_err();
        assert!(err.to_string().contains('%'));
    }

    #[test]
    fn test_eval_zero_fallback() {
        let mut config = AppConfig::default();
        assert!(eval(&config, "abc", "+", "1").is_err());

        config.engine.operand_policy = OperandPolicy::ZeroFallback;
        assert_eq!(eval(&config, "abc", "+", "1").unwrap(), b"1\n");
    }
}
