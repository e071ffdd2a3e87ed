//! Construction: cache load with cold-build fallback.
//!
//! The warm path deserializes the three cache blobs; any miss or decode
//! problem falls through to the cold path, which ingests the raw Geonames
//! files (downloading absent ones), assembles the instance and writes a
//! fresh cache. A cache-write failure only costs the next process its warm
//! start, so it downgrades to a warning.

pub(crate) mod download;
pub(crate) mod geonames;

use std::sync::Mutex;

use once_cell::sync::{Lazy, OnceCell};

use crate::cache;
use crate::config::Config;
use crate::error::{GeodexError, Result};
use crate::model::{CityRecord, CountryInfo, Geodex};

static DEFAULT_INSTANCE: OnceCell<std::result::Result<Geodex, GeodexError>> = OnceCell::new();

// Serializes downloads and cache regeneration across threads so
// constructors falling through to the cold path never observe each
// other's partial files.
static COLD_PATH_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

impl Geodex {
    /// Builds an instance with default directories.
    ///
    /// ```no_run
    /// use geodex_core::Geodex;
    ///
    /// let g = Geodex::new()?;
    /// let city = g.geocode("Austin, TX");
    /// println!("{}: {}, {}", city.city, city.latitude, city.longitude);
    /// # Ok::<(), geodex_core::GeodexError>(())
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Builds an instance with explicit directories.
    pub fn with_config(config: Config) -> Result<Self> {
        match Self::load_cached(&config) {
            Ok(geodex) => Ok(geodex),
            Err(err) => {
                tracing::debug!(%err, "cache unavailable, falling back to cold build");
                Self::cold_build(config, true)
            }
        }
    }

    /// The process-wide shared instance. The first caller pays for
    /// construction; everyone afterwards gets the same instance — or the
    /// same error, if construction failed.
    pub fn default_instance() -> std::result::Result<&'static Geodex, &'static GeodexError> {
        DEFAULT_INSTANCE.get_or_init(Geodex::new).as_ref()
    }

    /// Warm path: all three blobs must decode and the arena must be
    /// non-empty, otherwise the caller falls back to the cold path.
    fn load_cached(config: &Config) -> Result<Self> {
        let cities = cache::load_cities(config)?;
        if cities.is_empty() {
            return Err(GeodexError::Corrupt("cached arena is empty".into()));
        }
        let countries = cache::load_countries(config)?;
        let name_index = cache::load_name_index(config)?;
        Ok(Self::assemble(
            cities,
            countries,
            Some(name_index),
            config.clone(),
        ))
    }

    /// Cold path: ingest raw sources, assemble, optionally persist. Held
    /// under the cold-path lock end to end, cache write included.
    pub(crate) fn cold_build(config: Config, write_cache: bool) -> Result<Self> {
        let _guard = match COLD_PATH_LOCK.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        download::ensure_data_sets(&config)?;
        let (cities, countries) = load_data_sets(&config)?;
        let geodex = Self::assemble(cities, countries, None, config);

        if write_cache {
            if let Err(err) = geodex.store() {
                tracing::warn!(%err, "failed to store cache; continuing in-memory");
            }
        }
        Ok(geodex)
    }
}

/// Ingests the raw Geonames files from the data directory.
fn load_data_sets(config: &Config) -> Result<(Vec<CityRecord>, Vec<CountryInfo>)> {
    let cities = geonames::load_cities_archive(&config.data_file(download::CITIES_ARCHIVE))?;
    let countries = geonames::load_country_info(&config.data_file(download::COUNTRY_INFO))?;
    tracing::info!(
        cities = cities.len(),
        countries = countries.len(),
        "loaded raw data sets"
    );
    Ok((cities, countries))
}
