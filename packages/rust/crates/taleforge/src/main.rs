//! taleforge CLI: HTTP gateway for the adventure game.
//!
//! Settings from `packages/conf/settings.yaml` merged with the user file; override
//! the user config directory with `--conf <dir>`.
//!
//! Logging: set `RUST_LOG=taleforge=info` (or `warn`, `debug`) to see game logs on stderr.

mod cli;
mod nodes;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taleforge::{load_runtime_settings, set_config_home_override};

use crate::cli::{Cli, Command};
use crate::nodes::{GatewayModeRequest, run_gateway_mode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "taleforge=debug"
        } else {
            "taleforge=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Some(conf_dir) = cli.conf.clone() {
        set_config_home_override(conf_dir);
    }
    let runtime_settings = load_runtime_settings();

    match cli.command {
        Command::Gateway {
            bind,
            turn_timeout,
            max_concurrent,
            max_rounds,
            model,
            inference_url,
            mock,
        } => {
            run_gateway_mode(
                GatewayModeRequest {
                    bind,
                    turn_timeout,
                    max_concurrent,
                    max_rounds,
                    model,
                    inference_url,
                    mock,
                },
                &runtime_settings,
            )
            .await
        }
    }
}
