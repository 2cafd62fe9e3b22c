//! TeckAdm CLI - Clients, tickets and quotes from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create the account named by TECKADM_EMAIL / TECKADM_PASSWORD
//! teckadm signup
//!
//! # Clients
//! teckadm clients add "Acme" --phone 555-1111
//! teckadm clients list
//!
//! # Tickets for the first client, or a chosen one
//! teckadm tickets add "No enciende" --priority alta
//! teckadm tickets advance <id>
//!
//! # Quotes with line items as description:quantity:price
//! teckadm quotes add --item "Mantenimiento:2:150.50" --item "Cable:1:99"
//! teckadm quotes rm <id> --yes
//! ```
//!
//! # Commands
//!
//! - `signup` / `whoami` - Account
//! - `clients` - List, add, edit and remove clients
//! - `tickets` - List, add, edit, advance, reprioritize and remove tickets
//! - `quotes` - List, add, edit and remove quotes

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "teckadm")]
#[command(author, version, about = "TeckAdm CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configured account and sign in
    Signup {
        /// Email to register (default: `TECKADM_EMAIL`)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Show the signed-in account
    Whoami,
    /// Manage clients
    Clients {
        #[command(subcommand)]
        action: ClientAction,
    },
    /// Manage tickets
    Tickets {
        #[command(subcommand)]
        action: TicketAction,
    },
    /// Manage quotes
    Quotes {
        #[command(subcommand)]
        action: QuoteAction,
    },
}

#[derive(Subcommand)]
enum ClientAction {
    /// List clients
    List,
    /// Add a client
    Add {
        name: String,
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Edit a client's name or phone
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// Remove a client (its tickets and quotes are kept)
    Rm { id: String },
}

#[derive(Subcommand)]
enum TicketAction {
    /// List tickets
    List,
    /// Add a ticket
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Client id (default: first client)
        #[arg(short, long)]
        client: Option<String>,
        /// `baja`, `media` or `alta`
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Edit a ticket
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// `abierta`, `en_proceso` or `cerrada`
        #[arg(short, long)]
        status: Option<String>,
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Move a ticket to its next status
    Advance { id: String },
    /// Change only a ticket's priority
    Priority { id: String, priority: String },
    /// Remove a ticket
    Rm { id: String },
}

#[derive(Subcommand)]
enum QuoteAction {
    /// List quotes
    List,
    /// Add a quote
    Add {
        /// Client id (default: newest client)
        #[arg(short, long)]
        client: Option<String>,
        #[arg(short, long)]
        title: Option<String>,
        /// Line item as `description:quantity:price`
        #[arg(short, long = "item")]
        items: Vec<String>,
        /// `MXN` or `USD` (default: `TECKADM_DEFAULT_CURRENCY`)
        #[arg(long)]
        currency: Option<String>,
    },
    /// Edit a quote; given items replace the existing ones
    Edit {
        id: String,
        #[arg(short, long)]
        client: Option<String>,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long = "item")]
        items: Vec<String>,
        #[arg(long)]
        currency: Option<String>,
    },
    /// Remove a quote
    Rm {
        id: String,
        /// Confirm the removal
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("teckadm=info,teckadm_client=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Signup { email } => commands::account::sign_up(email).await,
        Commands::Whoami => commands::account::whoami().await,
        Commands::Clients { action } => match action {
            ClientAction::List => commands::clients::list().await,
            ClientAction::Add { name, phone } => commands::clients::add(name, phone).await,
            ClientAction::Edit { id, name, phone } => {
                commands::clients::edit(&id, name, phone).await
            }
            ClientAction::Rm { id } => commands::clients::remove(&id).await,
        },
        Commands::Tickets { action } => match action {
            TicketAction::List => commands::tickets::list().await,
            TicketAction::Add {
                title,
                description,
                client,
                priority,
            } => commands::tickets::add(title, description, client, priority).await,
            TicketAction::Edit {
                id,
                title,
                description,
                status,
                priority,
            } => commands::tickets::edit(&id, title, description, status, priority).await,
            TicketAction::Advance { id } => commands::tickets::advance(&id).await,
            TicketAction::Priority { id, priority } => {
                commands::tickets::set_priority(&id, &priority).await
            }
            TicketAction::Rm { id } => commands::tickets::remove(&id).await,
        },
        Commands::Quotes { action } => match action {
            QuoteAction::List => commands::quotes::list().await,
            QuoteAction::Add {
                client,
                title,
                items,
                currency,
            } => commands::quotes::add(client, title, &items, currency).await,
            QuoteAction::Edit {
                id,
                client,
                title,
                items,
                currency,
            } => commands::quotes::edit(&id, client, title, &items, currency).await,
            QuoteAction::Rm { id, yes } => commands::quotes::remove(&id, yes).await,
        },
    }
}
