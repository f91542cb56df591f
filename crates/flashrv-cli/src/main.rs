use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use flashrv_core::Coordinate;
use flashrv_search::{SearchEngine, SearchFilters};
use rust_decimal::Decimal;

#[derive(Debug, Parser)]
#[command(name = "flashrv-cli")]
#[command(about = "Query a salon catalog from the command line")]
struct Cli {
    /// Path to the salon catalog file.
    #[arg(
        long,
        env = "FLASHRV_CATALOG_PATH",
        default_value = "./config/salons.yaml"
    )]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Text search with optional structured filters.
    Search(SearchArgs),
    /// Autocomplete suggestions for a prefix.
    Suggest {
        prefix: String,
    },
    /// Salons within a radius of a point, nearest first.
    Nearby(NearbyArgs),
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// Free-text query; may be empty.
    #[arg(default_value = "")]
    query: String,
    #[arg(long)]
    quarter: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    service: Option<String>,
    #[arg(long)]
    home_service: bool,
    #[arg(long)]
    mobile_payment: bool,
    #[arg(long)]
    min_rating: Option<f64>,
    /// Maximum price of the cheapest qualifying service, in CFA francs.
    #[arg(long)]
    max_price: Option<Decimal>,
    #[arg(long)]
    lat: Option<f64>,
    #[arg(long)]
    lng: Option<f64>,
    #[arg(long)]
    min_distance: Option<f64>,
    #[arg(long)]
    max_distance: Option<f64>,
}

#[derive(Debug, Args)]
struct NearbyArgs {
    #[arg(long)]
    lat: f64,
    #[arg(long)]
    lng: f64,
    /// Search radius in kilometres.
    #[arg(long, default_value_t = 5.0)]
    max_distance: f64,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let salons_file = flashrv_core::load_salons(&cli.catalog)?;
    let engine = SearchEngine::from_catalog(&salons_file.salons);

    match cli.command {
        Commands::Search(args) => {
            let filters = search_filters(&args)?;
            let hits = engine.search(&args.query, &filters);
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
        Commands::Suggest { prefix } => {
            let suggestions = engine.suggest(&prefix);
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
        }
        Commands::Nearby(args) => {
            let origin = checked_coordinate(args.lat, args.lng)?;
            let filters = SearchFilters {
                origin: Some(origin),
                max_distance_km: Some(args.max_distance),
                ..SearchFilters::default()
            };
            let hits = engine.search("", &filters);
            println!("{}", serde_json::to_string_pretty(&hits)?);
        }
    }

    Ok(())
}

fn search_filters(args: &SearchArgs) -> anyhow::Result<SearchFilters> {
    let origin = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Some(checked_coordinate(lat, lng)?),
        (None, None) => None,
        _ => anyhow::bail!("--lat and --lng must be supplied together"),
    };

    Ok(SearchFilters {
        quarter: args.quarter.clone(),
        city: args.city.clone(),
        service: args.service.clone(),
        home_service: args.home_service.then_some(true),
        mobile_payment: args.mobile_payment.then_some(true),
        min_rating: args.min_rating,
        max_price: args.max_price,
        min_distance_km: args.min_distance,
        max_distance_km: args.max_distance,
        origin,
    })
}

fn checked_coordinate(lat: f64, lng: f64) -> anyhow::Result<Coordinate> {
    let coord = Coordinate { lat, lng };
    anyhow::ensure!(
        coord.is_valid(),
        "latitude/longitude out of range: ({lat}, {lng})"
    );
    Ok(coord)
}
