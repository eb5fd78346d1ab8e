use clap::{Parser, Subcommand};
use keyhold::{KeyedStore, TransactionalStore};
use serde_json::Value;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the container file; ".db" is appended if missing.
    #[arg(short, long, default_value = keyhold::DEFAULT_FILENAME)]
    file: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Store a value under a new key. Fails if the key already exists.
    Store { key: String, value: String },
    /// Print the value stored under a key.
    Get { key: String },
    /// Delete the record stored under a key.
    Del { key: String },
    /// List every record in the container.
    List,
    /// Remove every entry from the container.
    Clear,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut store = TransactionalStore::with_filename(&cli.file)?;

    match cli.command {
        Commands::Store { key, value } => {
            let val: Value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            store.try_store(&key, val)?;
            println!("OK");
        }
        Commands::Get { key } => {
            let val = store.try_get(&key)?;
            println!("{}", serde_json::to_string_pretty(&val)?);
        }
        Commands::Del { key } => {
            store.try_delete(&key)?;
            println!("OK");
        }
        Commands::List => {
            let records = store.try_get_all()?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Commands::Clear => {
            store.try_clear()?;
            println!("OK");
        }
    }

    Ok(())
}
