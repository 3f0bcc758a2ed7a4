use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chirpy", about = "Chirpy: a tiny microblogging server", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print every chirp in the database
    Chirps(DatabaseArgs),
    /// Print every user in the database
    Users(DatabaseArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Listen address, overriding config and environment
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Database file, overriding config and environment
    #[arg(long)]
    pub database: Option<PathBuf>,
    /// Delete the database before starting
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args)]
pub struct DatabaseArgs {
    /// Database file [default: $CHIRPY_DATABASE_PATH, else database.json]
    #[arg(long)]
    pub database: Option<PathBuf>,
}
