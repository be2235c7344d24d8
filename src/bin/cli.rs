//! SlotKV CLI
//!
//! Command-line access to a string-valued SlotKV container.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use slotkv::{
    Container, ContainerConfig, FixedStringSerializer, Key, SlotFileContainer, SyncPolicy,
};
use tracing_subscriber::{fmt, EnvFilter};

/// SlotKV CLI
#[derive(Parser, Debug)]
#[command(name = "slotkv")]
#[command(about = "Fixed-slot key-value record store")]
#[command(version)]
struct Args {
    /// Container directory
    #[arg(short, long, default_value = "./slotkv_data")]
    dir: PathBuf,

    /// File name prefix for the data and metadata files
    #[arg(short, long, default_value = "container")]
    prefix: String,

    /// Value width in bytes (must match the width the container was created with)
    #[arg(short, long, default_value = "32")]
    width: usize,

    /// fsync the data file after every write
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reserve a new key and print it
    Reserve,

    /// Store a value under a reserved key
    Put {
        /// The key to update
        key: Key,

        /// The value to store (truncated to the value width)
        value: String,
    },

    /// Print the value of a key
    Get {
        /// The key to read
        key: Key,
    },

    /// Remove a key
    Remove {
        /// The key to remove
        key: Key,
    },

    /// Print container metadata
    Info,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,slotkv=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> slotkv::Result<()> {
    let sync_policy = if args.sync {
        SyncPolicy::EveryWrite
    } else {
        SyncPolicy::OnClose
    };

    let config = ContainerConfig::builder()
        .directory(&args.dir)
        .prefix(&args.prefix)
        .sync_policy(sync_policy)
        .build();

    let mut container = SlotFileContainer::new(config, FixedStringSerializer::new(args.width))?;
    container.open()?;

    let result = execute(&mut container, args.command);
    let closed = container.close();

    result.and(closed)
}

fn execute<C: Container<String>>(container: &mut C, command: Commands) -> slotkv::Result<()> {
    match command {
        Commands::Reserve => {
            println!("{}", container.reserve()?);
        }
        Commands::Put { key, value } => {
            container.update(key, value)?;
            println!("OK");
        }
        Commands::Get { key } => {
            println!("{}", container.get(key)?);
        }
        Commands::Remove { key } => {
            container.remove(key)?;
            println!("OK");
        }
        Commands::Info => {
            for (name, value) in container.metadata()?.iter() {
                println!("{}: {:?}", name, value);
            }
        }
    }
    Ok(())
}
