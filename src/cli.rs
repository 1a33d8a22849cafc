use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "proxbalance")]
#[command(version)]
#[command(about = "Rebalance VM workloads across the nodes of a Proxmox cluster")]
pub struct Cli {
    /// Path to the INI configuration file.
    #[arg(short, long)]
    pub config: PathBuf,

    /// Compute and print the migration plan without migrating anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Additionally emit the plan as a JSON object keyed by VM name.
    #[arg(long)]
    pub json: bool,
}
