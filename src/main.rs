// ABOUTME: Entry point for the hostkeys known_hosts search tool
// ABOUTME: Loads the file once, then runs every queried hostname against every record

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hostkeys::cli::Cli;
use hostkeys::known_hosts::KnownHosts;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let path = cli.known_hosts_path()?;
    let hosts = KnownHosts::load(&path, !cli.lenient)
        .with_context(|| format!("failed to load {}", path.display()))?;

    for hostname in &cli.hostnames {
        for record in hosts.find(hostname) {
            if cli.show_keys {
                println!("{record}");
            } else {
                println!("{hostname}");
            }
        }
    }

    Ok(())
}
