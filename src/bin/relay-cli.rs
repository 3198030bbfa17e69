use clap::{Parser, Subcommand};
use relay_sdk::RelayClient;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for the entry relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    /// Hex private key; read from RELAY_PRIVATE_KEY when omitted.
    #[arg(short, long, env = "RELAY_PRIVATE_KEY", hide_env_values = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the entry list for the key's account
    CreateList,
    /// Append an entry to the key's list
    CreateEntry {
        content: String,
        /// Unix seconds; defaults to now
        #[arg(short, long)]
        timestamp: Option<u64>,
    },
    /// List the entries of an account
    Entries { address: String },
    /// Register an entity on the EVM registry
    AddEntity { data_uri: String },
    /// List the EVM entities of a user
    Entities { address: String },
    /// Check relay health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = RelayClient::new(&cli.url);

    match cli.command {
        Commands::CreateList => {
            let key = require_key(cli.key)?;
            print_json(&client.create_list(&key).await?)?;
        }
        Commands::CreateEntry { content, timestamp } => {
            let key = require_key(cli.key)?;
            let timestamp = match timestamp {
                Some(t) => t,
                None => std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)?
                    .as_secs(),
            };
            print_json(&client.create_entry(&key, &content, timestamp).await?)?;
        }
        Commands::Entries { address } => {
            print_json(&client.entries(&address).await?)?;
        }
        Commands::AddEntity { data_uri } => {
            let key = require_key(cli.key)?;
            print_json(&client.add_entity(&key, &data_uri).await?)?;
        }
        Commands::Entities { address } => {
            print_json(&client.entities(&address).await?)?;
        }
        Commands::Health => {
            print_json(&client.health().await?)?;
        }
    }

    Ok(())
}

fn require_key(key: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    key.ok_or_else(|| "a private key is required (--key or RELAY_PRIVATE_KEY)".into())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
