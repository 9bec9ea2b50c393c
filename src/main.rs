mod config;
mod controller;
mod criteria;
mod error;
mod favorites;
mod filter;
mod http_client;
mod models;
mod remote;
mod sort;
mod source;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use controller::SearchController;
use criteria::{CriteriaField, FieldValue};
use models::ViewMode;
use remote::RemoteSource;
use sort::SortKey;
use source::{SampleSource, SourceRegistry};
use state::{AppEvent, AppState};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "colocsearch")]
#[command(about = "Search rental listings and display them as cards", long_about = None)]
struct Args {
    /// City, postcode or any part of the address
    #[arg(long)]
    location: Option<String>,

    #[arg(long)]
    property_type: Option<String>,

    /// Minimum number of rooms
    #[arg(long)]
    rooms: Option<String>,

    #[arg(long)]
    min_price: Option<String>,

    #[arg(long)]
    max_price: Option<String>,

    #[arg(long)]
    min_surface: Option<String>,

    #[arg(long)]
    max_surface: Option<String>,

    /// "included" or "excluded"
    #[arg(long)]
    charges: Option<String>,

    /// Minimum number of bedrooms
    #[arg(long)]
    bedrooms: Option<String>,

    #[arg(long)]
    floor: Option<String>,

    #[arg(long)]
    furnished: bool,

    #[arg(long)]
    balcony: bool,

    #[arg(long)]
    parking: bool,

    #[arg(long)]
    pets: bool,

    /// price, surface, date or relevance
    #[arg(long)]
    sort: Option<String>,

    /// grid or list
    #[arg(long)]
    view: Option<String>,

    /// Set any form field by name, e.g. --set minPrice=800 or --set pets=true
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,

    /// Toggle the listing at this position (1-based) in the results as favorite
    #[arg(long)]
    favorite: Vec<usize>,

    /// Search backend base URL, overrides the configured one
    #[arg(long)]
    remote: Option<String>,

    /// Write a default data/config.yaml and exit
    #[arg(long)]
    create_config: bool,
}

impl Args {
    fn text_fields(&self) -> Vec<(CriteriaField, &Option<String>)> {
        vec![
            (CriteriaField::Location, &self.location),
            (CriteriaField::PropertyType, &self.property_type),
            (CriteriaField::Rooms, &self.rooms),
            (CriteriaField::MinPrice, &self.min_price),
            (CriteriaField::MaxPrice, &self.max_price),
            (CriteriaField::MinSurface, &self.min_surface),
            (CriteriaField::MaxSurface, &self.max_surface),
            (CriteriaField::Charges, &self.charges),
            (CriteriaField::Bedrooms, &self.bedrooms),
            (CriteriaField::Floor, &self.floor),
        ]
    }

    fn flag_fields(&self) -> [(CriteriaField, bool); 4] {
        [
            (CriteriaField::Furnished, self.furnished),
            (CriteriaField::Balcony, self.balcony),
            (CriteriaField::Parking, self.parking),
            (CriteriaField::Pets, self.pets),
        ]
    }
}

/// Parses `FIELD=VALUE`; checkbox fields take `true` or `false`.
fn parse_assignment(assignment: &str) -> Result<(CriteriaField, FieldValue)> {
    let (name, value) = assignment
        .split_once('=')
        .with_context(|| format!("Expected FIELD=VALUE, got '{}'", assignment))?;
    let field: CriteriaField = name.parse()?;

    let value = if field.is_flag() {
        let flag: bool = value.trim().parse()
            .with_context(|| format!("Field '{}' expects true or false", field))?;
        FieldValue::Flag(flag)
    } else {
        FieldValue::Text(value.to_string())
    };

    Ok((field, value))
}

fn init_logging(config: &Config) {
    // RUST_LOG wins over the configured level
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
        tracing::debug!("Logging level set from RUST_LOG environment variable");
        return;
    }

    let level = config.tracing_level.to_lowercase();
    let max_level = match level.as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("Invalid tracing level '{}', using 'info'", level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .init();

    tracing::debug!("Logging level set to: {}", level);
}

fn build_registry(config: &Config, remote_override: Option<&str>) -> Result<SourceRegistry> {
    let mut registry = SourceRegistry::new();

    match remote_override.or(config.remote_url.as_deref()) {
        Some(url) => {
            let remote = RemoteSource::new(url, &config.user_agent, config.request_timeout_secs)?;
            tracing::info!("Using search backend at {}", url);
            registry.register(Box::new(remote));
        }
        None => registry.register(Box::new(SampleSource::new())),
    }

    tracing::debug!("Registered sources: {:?}", registry.list_sources());
    Ok(registry)
}

fn print_results(state: &AppState) {
    let ordered = state.ordered_view();

    println!("{}", "=".repeat(80));
    println!(
        "{} annonce(s) · tri: {} · vue: {} · ♥ {} favori(s)",
        ordered.len(),
        state.sort_key,
        state.view_mode,
        state.favorites.count()
    );
    println!("{}", "=".repeat(80));

    if let Some(e) = &state.last_error {
        println!("⚠️  {}", e);
        return;
    }

    if ordered.is_empty() {
        println!("Aucune annonce ne correspond à vos critères.");
        return;
    }

    for (i, listing) in ordered.iter().enumerate() {
        let card = listing.format_card(state.view_mode, state.favorites.contains(&listing.id));
        match state.view_mode {
            ViewMode::List => println!("{:>2}. {}", i + 1, card),
            ViewMode::Grid => {
                println!("#{}\n{}", i + 1, card);
                println!("{}", "-".repeat(80));
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.create_config {
        Config::create_default()?;
        println!("Wrote default configuration to {}", config::CONFIG_PATH);
        return Ok(());
    }

    let config = Config::load()?;
    init_logging(&config);

    let registry = build_registry(&config, args.remote.as_deref())?;
    let controller = SearchController::new(
        registry,
        Duration::from_millis(config.search_delay_ms),
        AppState::new(config.default_sort, config.default_view),
    );

    if let Some(sort) = args.sort.as_deref() {
        controller.dispatch(AppEvent::SortChanged(SortKey::from_name(sort))).await;
    }
    if let Some(view) = args.view.as_deref() {
        let view_mode: ViewMode = view.parse()?;
        controller.dispatch(AppEvent::ViewModeChanged(view_mode)).await;
    }

    for (field, value) in args.text_fields() {
        if let Some(value) = value {
            controller.update_field(field, value.as_str()).await?;
        }
    }
    for (field, checked) in args.flag_fields() {
        if checked {
            controller.update_field(field, true).await?;
        }
    }

    for assignment in &args.set {
        let (field, value) = parse_assignment(assignment)?;
        controller.update_field(field, value).await?;
    }

    controller.search().await;
    if controller.snapshot().await.loading {
        println!("Recherche en cours...");
    }
    controller.wait().await;

    if !args.favorite.is_empty() {
        let ordered = controller.snapshot().await.ordered_view();
        for position in &args.favorite {
            match position.checked_sub(1).and_then(|i| ordered.get(i)) {
                Some(listing) => {
                    controller.dispatch(AppEvent::FavoriteToggled(listing.id.clone())).await
                }
                None => tracing::warn!("No listing at position {}, ignoring favorite", position),
            }
        }
    }

    print_results(&controller.snapshot().await);

    Ok(())
}
