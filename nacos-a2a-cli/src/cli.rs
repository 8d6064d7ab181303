use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "nacos-a2a")]
#[command(about = "Inspect how an A2A agent would be registered in Nacos", long_about = None)]
pub struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the agent's transports and print the registration plan
    Plan(PlanArgs),

    /// Print the transport overrides found in the environment
    Overlay {
        /// Environment variable prefix
        #[arg(long)]
        prefix: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Transport exposed by the agent, as NAME=URL (repeatable)
    #[arg(
        long = "interface",
        value_name = "NAME=URL",
        required = true,
        value_parser = parse_interface
    )]
    pub interfaces: Vec<(String, String)>,

    /// Agent name
    #[arg(long, default_value = "agent")]
    pub name: String,

    /// Agent version
    #[arg(long, default_value = "1.0.0")]
    pub version: String,

    /// TOML registration config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Environment variable prefix of transport overrides
    #[arg(long)]
    pub prefix: Option<String>,

    /// Transport the card advertises as its main one (default: the first interface)
    #[arg(long)]
    pub preferred_transport: Option<String>,

    /// Rewrite the card's preferred transport and URL to this transport
    #[arg(long)]
    pub overwrite_preferred_transport: Option<String>,

    /// Register the card only, without endpoints
    #[arg(long)]
    pub no_endpoints: bool,

    /// Do not mark the released version as latest
    #[arg(long)]
    pub not_latest: bool,
}

fn parse_interface(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((name, url)) if !name.trim().is_empty() && !url.trim().is_empty() => {
            Ok((name.trim().to_string(), url.trim().to_string()))
        }
        _ => Err(format!("expected NAME=URL, got '{value}'")),
    }
}
