use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "aegis-console",
    version,
    about = "Terminal monitoring console for the SENTINEL AEGIS security-assessment platform"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Live dashboard: periodic summary refresh plus run tracking
    Watch(WatchArgs),
    /// Fetch and print the current summary once
    Summary(SummaryArgs),
    /// Fetch and print one module's detail view
    Module(ModuleArgs),
    /// Start an assessment run and track it to completion
    Assess(AssessArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ConnectionArgs {
    /// Platform API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Organization name shown in the summary header
    #[arg(long)]
    pub org: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Start an assessment run as soon as the session opens
    #[arg(long)]
    pub assess: bool,
}

#[derive(Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Show every recommendation, not just the inline top five
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Clone)]
pub struct ModuleArgs {
    /// Module identifier (e.g. vulnerability_scanner)
    pub module: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Print the raw JSON payload instead of the formatted panel
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct AssessArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
