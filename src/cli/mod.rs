pub mod assess;
pub mod commands;
pub mod module;
pub mod summary;
pub mod watch;

pub use commands::{Cli, Commands};

use std::path::PathBuf;

use crate::config::{load_config, ConsoleConfig};
use crate::errors::ConsoleError;

/// Build the effective configuration: file (when given) under CLI flag
/// overrides, defaults for everything else.
pub async fn resolve_config(
    args: &commands::ConnectionArgs,
) -> Result<ConsoleConfig, ConsoleError> {
    let mut config = match &args.config {
        Some(path) => load_config(&PathBuf::from(path)).await?,
        None => ConsoleConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(org) = &args.org {
        config.organization = org.clone();
    }
    Ok(config)
}
