use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "utilityknife",
    about = "Utility Knife — diagnostic HTTP service with a key/value store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LockModeArg {
    Global,
    PerKey,
}

impl From<LockModeArg> for uk_store::LockMode {
    fn from(arg: LockModeArg) -> Self {
        match arg {
            LockModeArg::Global => Self::Global,
            LockModeArg::PerKey => Self::PerKey,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print the identifier (file name) for a key
    Hash(HashArgs),
    /// Write a stored value to stdout
    Get(GetArgs),
    /// List every record in a store directory
    List(ListArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Address to listen on
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    /// Directory to store the key/value data
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    #[arg(long)]
    pub lock_mode: Option<LockModeArg>,
    /// fsync record files before acknowledging a PUT
    #[arg(long)]
    pub sync_writes: bool,
}

#[derive(Args)]
pub struct StoreArgs {
    /// Store directory
    #[arg(long, default_value = "/var/lib/utilityknife")]
    pub data_dir: PathBuf,
}

#[derive(Args)]
pub struct HashArgs {
    /// Logical key, e.g. /data/hello
    pub key: String,
}

#[derive(Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    pub key: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}
