use anyhow::{Context, Result};
use betfair_session::dto::market::MarketFilter;
use betfair_session::{BettingApi, Config, RequestOptions, Session};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "betfair")]
#[command(about = "Betfair session CLI", long_about = None)]
struct Cli {
    /// Config file (default: config.toml, falling back to BETFAIR_* variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and report whether a token was issued
    Login,
    /// Log in, then extend the token once
    KeepAlive,
    /// List event types (sports)
    EventTypes {
        /// Exchange to query (uk or au)
        #[arg(short, long, default_value = "uk")]
        exchange: String,
        /// Locale for names
        #[arg(short, long, default_value = "en")]
        locale: String,
    },
    /// Count nodes in the navigation menu
    Navigation {
        /// Locale of the menu
        #[arg(short, long, default_value = "en")]
        locale: String,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None if std::path::Path::new("config.toml").exists() => Config::new()?,
        None => Config::from_env().context("no config.toml and BETFAIR_* not set")?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    let session = Session::new(Arc::new(config.account()?), config.session_config()?)?;

    let outcome = run(&session, cli.command).await;
    session.shutdown().await;
    outcome
}

async fn run(session: &Session, command: Commands) -> Result<()> {
    match command {
        Commands::Login => {
            let token = session.get_token().await?;
            println!("Login succeeded, token length {}", token.len());
        }
        Commands::KeepAlive => {
            session.get_token().await?;
            session.keep_alive().await?;
            println!("Keep-alive succeeded");
        }
        Commands::EventTypes { exchange, locale } => {
            let api = BettingApi::new(session.clone());
            let options = RequestOptions::default().exchange(exchange).locale(locale);
            let event_types = api
                .list_event_types(MarketFilter::default(), &options)
                .await?;

            info!("Found {} event types", event_types.len());
            for result in event_types {
                println!(
                    "{:>10}  {:<40} {:>6} markets",
                    result.event_type.id, result.event_type.name, result.market_count
                );
            }
        }
        Commands::Navigation { locale } => {
            let api = BettingApi::new(session.clone());
            let options = RequestOptions::default().locale(locale);
            let navigation = api.fetch_navigation(&options).await?;

            println!(
                "{} top-level nodes, {} nodes, {} markets",
                navigation.children.len(),
                navigation.iter().count(),
                navigation.markets().count()
            );
        }
    }
    Ok(())
}
