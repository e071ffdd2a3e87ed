//! Cache regeneration and validation.
//!
//! `regenerate_cache` is the build-time tool's entry point: ingest the raw
//! files (never the cache) and write fresh blobs. `validate_cache` then
//! proves the result: minimum counts plus a fixed set of forward and
//! reverse fixtures that have to keep resolving the same way release
//! after release.

use crate::config::Config;
use crate::error::{GeodexError, Result};
use crate::model::Geodex;

/// The bundled snapshot carries ~145K cities; anything below this means a
/// truncated or mis-parsed dump.
const MIN_CITY_COUNT: usize = 140_000;

/// Geonames lists ~250 countries.
const MIN_COUNTRY_COUNT: usize = 200;

struct ForwardFixture {
    query: &'static str,
    city: &'static str,
    country: &'static str,
}

struct ReverseFixture {
    lat: f64,
    lng: f64,
    city: &'static str,
    country: &'static str,
}

// Chosen to be unambiguous for this dataset; a scoring or parsing
// regression shows up here before it ships.
const FORWARD_FIXTURES: &[ForwardFixture] = &[
    ForwardFixture { query: "Austin", city: "Austin", country: "US" },
    ForwardFixture { query: "Paris", city: "Paris", country: "FR" },
    ForwardFixture { query: "Sydney", city: "Sydney", country: "AU" },
    ForwardFixture { query: "Berlin", city: "Berlin", country: "DE" },
    ForwardFixture { query: "New York, NY", city: "New York City", country: "US" },
    ForwardFixture { query: "Tokyo", city: "Tokyo", country: "JP" },
];

const REVERSE_FIXTURES: &[ReverseFixture] = &[
    ReverseFixture { lat: 30.26715, lng: -97.74306, city: "Austin", country: "US" },
    ReverseFixture { lat: 37.44651, lng: -122.15322, city: "Palo Alto", country: "US" },
    ReverseFixture { lat: 36.9741, lng: -122.0308, city: "Santa Cruz", country: "US" },
    ReverseFixture { lat: -33.8688, lng: 151.2093, city: "Sydney", country: "AU" },
];

/// Rebuilds the cache blobs from the raw data files in `config.data_dir`,
/// bypassing any existing cache.
pub fn regenerate_cache(config: Config) -> Result<()> {
    let geodex = Geodex::cold_build(config, false)?;
    geodex.store()
}

/// Loads an instance through the normal constructor and asserts the
/// minimum counts and the known fixtures.
pub fn validate_cache(config: Config) -> Result<()> {
    let geodex = Geodex::with_config(config)?;

    let cities = geodex.city_count();
    if cities < MIN_CITY_COUNT {
        return Err(GeodexError::Validation(format!(
            "city count too low: got {cities}, want >= {MIN_CITY_COUNT}"
        )));
    }

    let countries = geodex.countries().len();
    if countries < MIN_COUNTRY_COUNT {
        return Err(GeodexError::Validation(format!(
            "country count too low: got {countries}, want >= {MIN_COUNTRY_COUNT}"
        )));
    }

    for fx in FORWARD_FIXTURES {
        let got = geodex.geocode(fx.query);
        if got.city != fx.city || got.country() != fx.country {
            return Err(GeodexError::Validation(format!(
                "geocode({:?}) = ({:?}, {:?}), want ({:?}, {:?})",
                fx.query,
                got.city,
                got.country(),
                fx.city,
                fx.country
            )));
        }
    }

    for fx in REVERSE_FIXTURES {
        let got = geodex.reverse_geocode(fx.lat, fx.lng);
        if got.city != fx.city || got.country() != fx.country {
            return Err(GeodexError::Validation(format!(
                "reverse_geocode({}, {}) = ({:?}, {:?}), want ({:?}, {:?})",
                fx.lat,
                fx.lng,
                got.city,
                got.country(),
                fx.city,
                fx.country
            )));
        }
    }

    tracing::info!(cities, countries, "cache validation passed");
    Ok(())
}
