use clap::Parser;
use tracing_subscriber::EnvFilter;

use aegis_console::{cli, config, errors};

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let result = match cli.command {
        cli::Commands::Watch(args) => cli::watch::handle_watch(args).await,
        cli::Commands::Summary(args) => cli::summary::handle_summary(args).await,
        cli::Commands::Module(args) => cli::module::handle_module(args).await,
        cli::Commands::Assess(args) => cli::assess::handle_assess(args).await,
        cli::Commands::Validate(args) => handle_validate(args).await,
    };

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            let exit_code = match &e {
                errors::ConsoleError::Config(_) => 2,
                errors::ConsoleError::Network(_) | errors::ConsoleError::Timeout(_) => 3,
                errors::ConsoleError::Api(_) => 4,
                errors::ConsoleError::RunInFlight(_) => 5,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn handle_validate(args: cli::commands::ValidateArgs) -> Result<(), errors::ConsoleError> {
    let path = std::path::PathBuf::from(&args.config);
    let _config = config::load_config(&path).await?;
    println!("Configuration is valid: {}", args.config);
    Ok(())
}
