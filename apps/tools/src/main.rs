use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::PartyClient;
use serde::Serialize;
use shared::domain::{NewParty, PartyId, PartyPatch};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "partyctl", about = "Manage parties on a running ledger server")]
struct Cli {
    #[arg(
        long,
        env = "PARTYCTL_SERVER_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Get {
        id: PartyId,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        gstin: Option<String>,
    },
    /// Applies a JSON patch such as '{"phone":"123","email":null}'.
    Update {
        id: PartyId,
        #[arg(long)]
        json: String,
    },
    Delete {
        id: PartyId,
    },
}

impl Command {
    async fn run(self, client: &PartyClient) -> Result<()> {
        match self {
            Command::List => print_json(&client.list().await?),
            Command::Get { id } => print_json(&client.get(id).await?),
            Command::Create {
                name,
                phone,
                email,
                gstin,
            } => {
                let fields = NewParty {
                    phone,
                    email,
                    gstin,
                    ..NewParty::named(name)
                };
                print_json(&client.create(&fields).await?)
            }
            Command::Update { id, json } => {
                let patch = parse_patch(&json)?;
                print_json(&client.update(id, &patch).await?)
            }
            Command::Delete { id } => print_json(&client.delete(id).await?),
        }
    }
}

fn parse_patch(raw: &str) -> Result<PartyPatch> {
    serde_json::from_str(raw).context("--json must be a party patch object")
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = PartyClient::new(&cli.server_url)?;
    cli.command.run(&client).await
}
