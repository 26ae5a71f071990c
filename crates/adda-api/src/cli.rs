//! CLI command definitions for the `adda` binary.
//!
//! Uses clap derive macros. The binary is server-first: `adda serve` runs
//! the gateway; `adda providers` inspects the configured fallback chain.

use clap::{Parser, Subcommand};
use console::style;

use crate::state::AppState;

/// Bengali-first chat gateway with provider fallback.
#[derive(Parser)]
#[command(name = "adda", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, env = "PORT", default_value = "5000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Show the configured provider chain in fallback order.
    Providers,
}

/// Print the provider chain with per-provider key status.
pub fn list_providers(state: &AppState) {
    let providers = &state.config.providers;

    if providers.is_empty() {
        println!();
        println!(
            "  {} No providers configured. Add one to config.toml in {}.",
            style("i").blue().bold(),
            style(state.data_dir.display()).cyan()
        );
        println!();
        return;
    }

    println!();
    println!("  {}", style("Fallback chain order").bold());
    println!();

    for (position, descriptor) in providers.iter().enumerate() {
        let key_status = if adda_infra::config::resolve_api_key(descriptor).is_some() {
            style("key set".to_string()).green()
        } else {
            style(format!("{} not set", descriptor.api_key_env)).red()
        };
        let streaming = if descriptor.streaming {
            style("streams").dim()
        } else {
            style("no streaming").dim()
        };
        println!(
            "  {}. {}  {}  {}  {}",
            position + 1,
            style(&descriptor.name).cyan(),
            style(&descriptor.model).dim(),
            streaming,
            key_status
        );
    }

    println!();
    println!(
        "  {} provider{} configured",
        style(providers.len()).bold(),
        if providers.len() == 1 { "" } else { "s" }
    );
    println!();
}
