use clap::{Parser, Subcommand};

/// CLI arguments for geodex
#[derive(Debug, Parser)]
#[command(
    name = "geodex",
    version,
    about = "Offline city-level geocoding from the command line"
)]
pub struct CliArgs {
    /// Directory holding the raw Geonames files
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Directory holding the serialized cache blobs
    #[arg(long = "cache-dir", global = true)]
    pub cache_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a free-form location string to a city
    Geocode {
        /// Location text, e.g. "Austin, TX" or "Paris, France"
        query: String,

        /// Require an exact (case-insensitive) city-name match
        #[arg(long)]
        exact: bool,

        /// Typo tolerance as a Levenshtein distance (0-3)
        #[arg(long, default_value_t = 0)]
        fuzzy: u32,
    },

    /// Resolve coordinates to the nearest city
    Reverse {
        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lng: f64,
    },

    /// Show arena and interner statistics
    Stats,

    /// Regenerate the cache blobs from raw data and validate the result
    UpdateCache,
}
