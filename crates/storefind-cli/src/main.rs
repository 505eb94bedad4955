use anyhow::Context;
use clap::{Parser, Subcommand};
use storefind_core::Coordinate;
use storefind_places::PlacesClient;
use storefind_search::{run_search, GroceryFilter, SearchOutcome, SearchPolicy, SearchRadius};

#[derive(Debug, Parser)]
#[command(name = "storefind")]
#[command(about = "Nearby grocery store search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for grocery-like places around a coordinate.
    Search {
        /// Latitude of the search origin, in degrees.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the search origin, in degrees.
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Ingredient or store name to search for.
        #[arg(long)]
        keyword: String,
        /// Search radius in kilometers (one of 1, 3, 5, 10, 20).
        #[arg(long, default_value = "5", value_parser = parse_radius)]
        radius_km: u32,
    },
}

/// Accepts only the radius choices the flow offers.
fn parse_radius(s: &str) -> Result<u32, String> {
    let km: u32 = s.parse().map_err(|_| format!("not a number: {s}"))?;
    if SearchRadius::from_km(km).is_some() {
        Ok(km)
    } else {
        Err(format!("radius must be one of 1, 3, 5, 10, 20 (got {km})"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = storefind_core::load_app_config().context("loading configuration")?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::debug!(env = %cfg.env, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            lat,
            lng,
            keyword,
            radius_km,
        } => {
            let radius = SearchRadius::from_km(radius_km)
                .context("radius validated by the argument parser")?;
            let client = PlacesClient::from_config(&cfg).context("building places client")?;
            let policy = SearchPolicy {
                max_attempts: cfg.max_attempts,
                radius_multiplier: cfg.radius_multiplier,
            };
            let user = Coordinate::new(lat, lng);

            let outcome = run_search(
                &client,
                &GroceryFilter::default(),
                user,
                &keyword,
                radius.as_meters(),
                &policy,
            )
            .await
            .context("running search")?;

            print_outcome(&keyword, radius, &outcome);
        }
    }

    Ok(())
}

fn print_outcome(keyword: &str, radius: SearchRadius, outcome: &SearchOutcome) {
    match outcome {
        SearchOutcome::Found(places) => {
            println!(
                "{} result{} for \"{keyword}\" (radius {radius}):",
                places.len(),
                if places.len() == 1 { "" } else { "s" },
            );
            for (i, place) in places.iter().enumerate() {
                let mut line = format!(
                    "{:2}. {}  {:.1} km",
                    i + 1,
                    place.name,
                    place.distance_km
                );
                if let Some(address) = &place.address {
                    line.push_str(&format!("  {address}"));
                }
                if let Some(rating) = place.rating {
                    line.push_str(&format!("  {rating}"));
                    if let Some(count) = place.rating_count {
                        line.push_str(&format!(" ({count})"));
                    }
                }
                match place.open_now {
                    Some(true) => line.push_str("  open now"),
                    Some(false) => line.push_str("  closed"),
                    None => {}
                }
                println!("{line}");
            }
        }
        SearchOutcome::NoResults { attempts } => {
            println!(
                "No matching stores found for \"{keyword}\" after {attempts} attempts. \
                 Try a larger radius or another keyword."
            );
        }
        SearchOutcome::Superseded => {
            // Only the session controller produces this; a one-shot CLI
            // search is never superseded.
            println!("Search was superseded.");
        }
    }
}
