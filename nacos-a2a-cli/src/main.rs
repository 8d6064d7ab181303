use anyhow::Result;
use clap::Parser;
use nacos_a2a_cli::{Cli, Commands, commands};
use nacos_a2a_registry::RegistrySettings;
use std::collections::HashMap;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let telemetry = if cli.json_logs {
        nacos_a2a_telemetry::init_json_telemetry("nacos-a2a")
    } else {
        nacos_a2a_telemetry::init_telemetry("nacos-a2a")
    };
    if let Err(e) = telemetry {
        eprintln!("Failed to initialize logging: {e}");
    }

    // Loads .env before the snapshot below.
    let settings = RegistrySettings::from_env();
    let env: HashMap<String, String> = std::env::vars().collect();

    let output = match &cli.command {
        Commands::Plan(args) => commands::plan(args, &settings, &env).await?,
        Commands::Overlay { prefix } => {
            commands::overlay(prefix.as_deref().unwrap_or(settings.env_prefix.as_str()), &env)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
