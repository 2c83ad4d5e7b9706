//! jujuchat - Terminal chat client
//!
//! Main entry point for the jujuchat application.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jujuchat::cli::{Cli, Commands};
use jujuchat::commands;
use jujuchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Mirror a CLI snapshot path override into the environment so
    // `SnapshotStorage::new()` picks it up without threading it everywhere.
    if let Some(db_path) = &cli.snapshot_db {
        std::env::set_var("JUJUCHAT_SNAPSHOT_DB", db_path);
        tracing::info!("Using snapshot DB override from CLI: {}", db_path);
    }

    let config = Config::load(&cli.config)?;
    config.validate()?;

    match cli.command {
        Commands::Chat => {
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(command)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// An explicit `RUST_LOG` wins; otherwise `--verbose` raises the default
/// level from info to debug.
fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Default log directive when `RUST_LOG` is not set
fn default_log_directive(verbose: bool) -> &'static str {
    if verbose {
        "jujuchat=debug"
    } else {
        "jujuchat=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_flag_raises_default_log_level() {
        assert_eq!(default_log_directive(false), "jujuchat=info");
        assert_eq!(default_log_directive(true), "jujuchat=debug");
    }
}
