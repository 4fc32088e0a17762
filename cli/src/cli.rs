use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use swiss_admin::config::BFS_URL;

/// Swiss administrative boundaries to GeoJSON and map tiles
#[derive(Parser, Debug)]
#[command(name = "swiss-admin", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the archive, write GeoJSON layers and convert them to tiles
    Refresh(RefreshArgs),

    /// List the objects of a topology archive with their feature counts
    Layers(LayersArgs),
}

#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Topology archive: an http(s) URL or a local file
    #[arg(long, default_value = BFS_URL)]
    pub source: String,

    /// Output directory for GeoJSON and tile files
    #[arg(long, default_value = "./tmp", value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Container build context (directory holding the Dockerfile)
    #[arg(long, default_value = "./docker", value_hint = ValueHint::DirPath)]
    pub context: PathBuf,

    /// Stop after writing GeoJSON (no container run)
    #[arg(long)]
    pub skip_tiles: bool,
}

#[derive(Args, Debug)]
pub struct LayersArgs {
    /// Topology archive: an http(s) URL or a local file
    #[arg(long, default_value = BFS_URL)]
    pub source: String,
}
