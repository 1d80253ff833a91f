//! Heroes - browse superhero data from the terminal
//!
//! Lists heroes and shows hero details, reading through a local cache so
//! repeated runs do not hit the upstream API again.

use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use capecache::cache::open_store;
use capecache::cli::{Cli, CliError, Command, Settings};
use capecache::data::SuperheroClient;
use capecache::view;

/// Sets up stderr logging; `RUST_LOG` directives take precedence over `--log-level`
fn init_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_cli(&cli)?;
    let store = open_store(&settings.cache);
    let client = SuperheroClient::new(settings.token.clone(), store.clone())
        .with_endpoints(settings.endpoints.clone());

    tracing::debug!(anonymous = client.is_anonymous(), "client ready");

    match cli.command {
        Command::List { from, to } => {
            let heroes = client.get_hero_list_in(from..=to).await;
            let rows = view::hero_rows(&client, &heroes);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", view::render_list(&rows));
            }
        }
        Command::Show { id } => {
            let hero = view::hero_detail(&client, &id)
                .await
                .ok_or_else(|| CliError::NotFound(id.clone()))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hero)?);
            } else {
                print!("{}", view::render_detail(&hero));
            }
        }
        Command::ImageUrl { id, name } => {
            println!("{}", client.hero_image_url(&id, &name));
        }
        Command::ClearCache => {
            store.clear()?;
            println!("Cache cleared");
        }
    }

    Ok(())
}
