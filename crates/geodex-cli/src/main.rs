//! geodex — command-line interface for geodex-core
//!
//! Usage examples
//! --------------
//!
//! - Forward geocode
//!   $ geodex geocode "Austin, TX"
//!   $ geodex geocode --fuzzy 1 "Londn"
//!
//! - Reverse geocode
//!   $ geodex reverse 30.26715 -97.74306
//!
//! - Show database statistics
//!   $ geodex stats
//!
//! - Rebuild and validate the cache after downloading fresh Geonames data
//!   $ geodex update-cache
//!
//! The first run without a cache performs a cold build: the raw Geonames
//! files are fetched into the data directory and the cache blobs are
//! written next to them. Subsequent runs start in well under a second.

mod args;

use crate::args::{CliArgs, Commands};
use clap::Parser;
use geodex_core::{regenerate_cache, validate_cache, CityRecord, Config, GeocodeOptions, Geodex};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let mut config = Config::default();
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(dir) = &args.cache_dir {
        config = config.with_cache_dir(dir);
    }

    match args.command {
        Commands::Geocode { query, exact, fuzzy } => {
            let g = Geodex::with_config(config)?;
            let city = g.geocode_opts(
                &query,
                GeocodeOptions {
                    exact_city: exact,
                    fuzzy_distance: fuzzy,
                },
            );
            print_city(&query, &city);
        }

        Commands::Reverse { lat, lng } => {
            let g = Geodex::with_config(config)?;
            let city = g.reverse_geocode(lat, lng);
            print_city(&format!("{lat}, {lng}"), &city);
        }

        Commands::Stats => {
            let g = Geodex::with_config(config)?;
            println!("Database statistics:");
            println!("  Cities: {}", g.city_count());
            println!("  Countries: {}", g.countries().len());
            println!("  Country codes interned: {}", g.country_count());
            println!("  Region codes interned: {}", g.region_count());
        }

        Commands::UpdateCache => {
            println!("[1/2] Regenerating cache from raw data...");
            regenerate_cache(config.clone())?;
            println!("      Cache blobs written to {}", config.cache_dir().display());

            println!("[2/2] Validating generated cache...");
            validate_cache(config)?;
            println!("Cache regenerated and validated.");
            println!();
            println!("Next steps:");
            println!("  1. bzip2 -f <cache-dir>/*.dex");
            println!("  2. ship the blobs with your release");
        }
    }

    Ok(())
}

fn print_city(query: &str, city: &CityRecord) {
    if city.is_empty() {
        eprintln!("No match for: {query}");
        return;
    }
    println!("{}", city.city);
    println!("  Country: {}", city.country());
    let region = city.region();
    if !region.is_empty() {
        println!("  Region: {region}");
    }
    println!("  Coordinates: {}, {}", city.latitude, city.longitude);
    println!("  Population: {}", city.population);
    if !city.city_alt.is_empty() {
        println!("  Also known as: {}", city.city_alt);
    }
}
