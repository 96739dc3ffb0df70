use anyhow::{anyhow, Result};
use campuseats_common::{catalog, CategoryFilter};
use campuseats_core::cart::format_price;
use campuseats_core::client::client_from_config;
use campuseats_core::concierge;
use campuseats_core::geolocation::{Coordinates, FixedGeolocator};
use campuseats_core::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "campuseats")]
#[command(about = "Campus food ordering with an AI concierge")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the recommendation/chat model
    #[arg(long)]
    pub model: Option<String>,

    /// Write logs here instead of the default temp file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Send earlier chat turns along with each message
    #[arg(long)]
    pub thread_chat: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive ordering mode
    Interactive,
    /// Print the menu
    Menu {
        /// All, Burgers, Pizza, Sushi, Salads, Desserts or Drinks
        #[arg(short, long, default_value = "All")]
        category: CategoryFilter,
        /// Case-insensitive text to look for in names and descriptions
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Suggest dishes for a mood
    Recommend {
        mood: String,
    },
    /// Ask the assistant a single question
    Chat {
        message: String,
    },
    /// Describe a delivery location
    Locate {
        #[arg(long, allow_hyphen_values = true, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lng: Option<f64>,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        std::env::set_var("RUST_LOG", "debug");
    }

    let mut config = Config::load().await?;
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(path) = &cli.log_file {
        config.log_path = Some(path.clone());
    }
    if cli.thread_chat {
        config.thread_chat_history = true;
    }

    init_logging(&config)?;

    match cli.command {
        Some(Commands::Interactive) | None => {
            campuseats_tui::run_interactive(&config).await?;
        }
        Some(Commands::Menu { category, search }) => {
            print!("{}", render_menu(category, &search));
        }
        Some(Commands::Recommend { mood }) => {
            let client = client_from_config(&config);
            let recs = concierge::recommend(client.as_ref(), &mood, catalog::catalog()).await;
            if recs.is_empty() {
                println!("No recommendations right now.");
            }
            for (i, rec) in recs.iter().enumerate() {
                println!("{}. {} ({})\n   \"{}\"", i + 1, rec.item.name, format_price(rec.item.price), rec.reason);
            }
        }
        Some(Commands::Chat { message }) => {
            let client = client_from_config(&config);
            println!("{}", concierge::chat_reply(client.as_ref(), Vec::new(), &message).await);
        }
        Some(Commands::Locate { lat, lng }) => {
            let home = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
                _ => config.home,
            };
            let client = client_from_config(&config);
            let location = concierge::detect_location(&FixedGeolocator::new(home), client.as_ref()).await;
            println!("{}", location.address);
            if let Some(insight) = location.insight {
                println!("{insight}");
            }
        }
    }

    Ok(())
}

/// Logs go to a file so they never interleave with the TUI.
fn init_logging(config: &Config) -> Result<()> {
    let path = config.resolved_log_path();
    let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))?;
    tracing::debug!("logging to {}", path.display());
    Ok(())
}

pub fn render_menu(category: CategoryFilter, search: &str) -> String {
    let items = catalog::filter(catalog::catalog(), category, search);
    if items.is_empty() {
        return "No items match.\n".to_string();
    }
    let mut out = String::new();
    for item in items {
        out.push_str(&format!(
            "[{}] {:<24} {:>8}  {:<9} {:>5} kcal  ★ {:.1}\n    {}\n",
            item.id,
            item.name,
            format_price(item.price),
            item.category.as_str(),
            item.calories,
            item.rating,
            item.description
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn menu_args_parse_category() {
        let cli = Cli::try_parse_from(["campuseats", "menu", "--category", "pizza", "--search", "basil"]).unwrap();
        match cli.command {
            Some(Commands::Menu { category, search }) => {
                assert_eq!(category, CategoryFilter::Only(campuseats_common::Category::Pizza));
                assert_eq!(search, "basil");
            }
            _ => panic!("expected menu command"),
        }
    }

    #[test]
    fn unknown_category_is_a_parse_error() {
        assert!(Cli::try_parse_from(["campuseats", "menu", "--category", "tacos"]).is_err());
    }

    #[test]
    fn locate_requires_both_coordinates() {
        assert!(Cli::try_parse_from(["campuseats", "locate", "--lat", "13.0"]).is_err());
        assert!(Cli::try_parse_from(["campuseats", "locate", "--lat", "13.0", "--lng", "-80.2"]).is_ok());
    }

    #[test]
    fn render_menu_filters() {
        let out = render_menu(CategoryFilter::All, "lava");
        assert!(out.contains("Double Choco Lava Cake"));
        assert!(out.contains("$8.99"));
        assert!(!out.contains("Cheeseburger"));
        assert_eq!(render_menu(CategoryFilter::All, "zzz"), "No items match.\n");
    }
}
