// ABOUTME: CLI argument parsing with clap derive
// ABOUTME: Accepts a known_hosts path, candidate hostnames, and output/leniency flags

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Search an SSH known_hosts file for hostnames, including hashed entries
#[derive(Debug, Parser)]
#[command(name = "hostkeys", version, arg_required_else_help = true)]
pub struct Cli {
    /// Hostnames to look up
    #[arg(required = true, value_name = "HOSTNAME")]
    pub hostnames: Vec<String>,

    /// Path to the known_hosts file (default: ~/.ssh/known_hosts)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Skip malformed lines instead of failing the whole load
    #[arg(long)]
    pub lenient: bool,

    /// Print the full matching entry (host, key type, key) instead of just the hostname
    #[arg(short = 'k', long)]
    pub show_keys: bool,
}

impl Cli {
    pub fn known_hosts_path(&self) -> Result<PathBuf> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".ssh").join("known_hosts"))
                .context("could not determine home directory; pass --file"),
        }
    }
}
