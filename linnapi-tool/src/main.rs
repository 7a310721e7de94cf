mod config;
mod error;
mod props;

use clap::{Parser, Subcommand};
use linnapi_client::{DEFAULT_AUTH_URL, LinnworksClient};
use linnapi_core::{ExtendedPropertyMapping, ItemField, StockItemId};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, resolve_credentials};
use crate::error::ToolError;
use crate::props::{format_summaries, upsert};

const DEFAULT_LOG_FILTER: &str = "linnapi_core=info,linnapi_client=info,lw=info";

#[derive(Parser)]
#[command(name = "lw")]
#[command(about = "Linnworks inventory tools", long_about = None)]
struct Cli {
    /// Account to log in as, overriding the environment and config file
    #[arg(long, global = true)]
    username: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect inventory items
    Item {
        #[command(subcommand)]
        command: ItemCommand,
    },
    /// Manage an item's extended properties
    Props {
        #[command(subcommand)]
        command: PropsCommand,
    },
    /// SKU helpers
    Sku {
        #[command(subcommand)]
        command: SkuCommand,
    },
}

#[derive(Subcommand)]
enum ItemCommand {
    /// Print an item and its extended properties
    Show { stock_id: String },
}

#[derive(Subcommand)]
enum PropsCommand {
    /// List an item's extended properties
    List { stock_id: String },
    /// Create or edit a property, then sync
    Set {
        stock_id: String,
        name: String,
        value: String,
        /// Property type, e.g. Attribute or Specification
        #[arg(long = "type")]
        property_type: Option<String>,
    },
    /// Delete a property, then sync
    Rm { stock_id: String, name: String },
}

#[derive(Subcommand)]
enum SkuCommand {
    /// Ask the server for an unused SKU
    New,
    /// Check whether a SKU is taken
    Exists { sku: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = connect(cli.username).await?;

    match cli.command {
        Command::Item {
            command: ItemCommand::Show { stock_id },
        } => {
            let mut item = client.get_inventory_item(&StockItemId::new(stock_id)).await?;
            println!("{}", item);
            for field in ItemField::ALL {
                println!("  {:<20} {}", field.api_name(), item.field(field));
            }
            for (label, name) in [
                ("Category", &item.category),
                ("PackageGroup", &item.package_group),
                ("PostalService", &item.postal_service),
            ] {
                println!("  {:<20} {}", label, name.as_deref().unwrap_or("-"));
            }

            let props = item
                .loaded_extended_properties(&client)
                .await
                .map_err(ToolError::from)?;
            if !props.is_empty() {
                println!();
                println!("{}", format_summaries(&props.summaries()));
            }
        }
        Command::Props { command } => match command {
            PropsCommand::List { stock_id } => {
                let mapping = load_mapping(&client, stock_id).await?;
                println!("{}", format_summaries(&mapping.summaries()));
            }
            PropsCommand::Set {
                stock_id,
                name,
                value,
                property_type,
            } => {
                let mut mapping = load_mapping(&client, stock_id).await?;
                upsert(&mut mapping, &name, &value, property_type.as_deref())
                    .map_err(ToolError::from)?;
                let report = mapping.sync(&client).await.map_err(ToolError::from)?;
                info!(?report, "synced");
            }
            PropsCommand::Rm { stock_id, name } => {
                let mut mapping = load_mapping(&client, stock_id).await?;
                mapping.remove(name.as_str()).map_err(ToolError::from)?;
                let report = mapping.sync(&client).await.map_err(ToolError::from)?;
                info!(?report, "synced");
            }
        },
        Command::Sku { command } => match command {
            SkuCommand::New => println!("{}", client.get_new_sku().await?),
            SkuCommand::Exists { sku } => {
                let exists = client.sku_exists(&sku).await?;
                println!("{}", if exists { "exists" } else { "available" });
            }
        },
    }

    Ok(())
}

async fn connect(username: Option<String>) -> Result<LinnworksClient, ToolError> {
    let config = load_config();
    let credentials = resolve_credentials(&config, username, |key| std::env::var(key).ok())?;

    let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
    let auth_url = config.auth_url.as_deref().unwrap_or(DEFAULT_AUTH_URL);
    Ok(LinnworksClient::login_with(http, &credentials, auth_url).await?)
}

async fn load_mapping(
    client: &LinnworksClient,
    stock_id: String,
) -> Result<ExtendedPropertyMapping, ToolError> {
    let mut mapping = ExtendedPropertyMapping::new(StockItemId::new(stock_id));
    mapping.load(client).await?;
    Ok(mapping)
}
