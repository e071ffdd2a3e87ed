//! Offline, in-process city-level geocoding.
//!
//! `geodex-core` resolves free-form location strings ("Austin, TX",
//! "Paris, France", "Bombay") and coordinate pairs to a single best city
//! out of a bundled Geonames snapshot: ~145K populated places plus
//! country metadata and first-level administrative divisions. Everything
//! runs in memory — no network, no external service, queries are pure
//! lookups.
//!
//! # Construction
//!
//! [`Geodex::with_config`] deserializes the blob cache when present
//! (sub-second) and otherwise falls back to a cold build from the raw
//! Geonames files, persisting a fresh cache for next time.
//! [`Geodex::default_instance`] shares one instance process-wide.
//!
//! # Queries
//!
//! ```no_run
//! use geodex_core::{Geodex, GeocodeOptions};
//!
//! let g = Geodex::new()?;
//!
//! let austin = g.geocode("Austin, TX");
//! assert_eq!(austin.region(), "TX");
//!
//! // typo tolerance, capped internally
//! let london = g.geocode_opts("Londn", GeocodeOptions { fuzzy_distance: 1, ..Default::default() });
//! assert_eq!(london.city, "London");
//!
//! let sydney = g.reverse_geocode(-33.8688, 151.2093);
//! assert_eq!(sydney.country(), "AU");
//! # Ok::<(), geodex_core::GeodexError>(())
//! ```
//!
//! Queries never fail: an unmatched input returns the empty record
//! ([`CityRecord::is_empty`]).

mod admin;
mod cache;
mod config;
mod error;
mod index;
mod interner;
mod loader;
mod model;
mod parse;
mod search;
mod text;
mod validate;

pub use crate::admin::AdminDivision;
pub use crate::config::{Config, DEFAULT_CACHE_DIR, DEFAULT_DATA_DIR};
pub use crate::error::{GeodexError, Result};
pub use crate::interner::{country_count, region_count};
pub use crate::model::{CityRecord, CountryInfo, Geodex};
pub use crate::search::GeocodeOptions;
pub use crate::validate::{regenerate_cache, validate_cache};
