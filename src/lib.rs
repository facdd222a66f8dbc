// ABOUTME: Library surface for the hostkeys known_hosts search tool
// ABOUTME: Exposes the parsing/matching engine and the CLI argument types

pub mod cli;
pub mod known_hosts;

pub use known_hosts::{KnownHostRecord, KnownHosts, PublicKeyBlob};
