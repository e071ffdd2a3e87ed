//! The in-memory data model: the city arena, country metadata and the
//! composed geocoder instance.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::index::cell::CellIndex;
use crate::index::name::NameIndex;
use crate::interner;
use crate::text;

/// A single populated place.
///
/// Memory-compact by design: country and region are `u16` interner handles
/// rather than inline strings, and coordinates are `f32` (city-center
/// accuracy does not need more). Do not widen these fields; the arena holds
/// ~145K records and the compaction is what keeps the resident footprint
/// acceptable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CityRecord {
    /// Primary name.
    pub city: String,
    /// Comma-separated alternate names, verbatim from the source.
    pub city_alt: String,
    country: interner::Handle,
    region: interner::Handle,
    /// Latitude in degrees.
    pub latitude: f32,
    /// Longitude in degrees.
    pub longitude: f32,
    /// Population count; 0 when unknown.
    pub population: i32,
}

impl CityRecord {
    pub(crate) fn new(
        city: String,
        city_alt: String,
        country_code: &str,
        region_code: &str,
        latitude: f32,
        longitude: f32,
        population: i32,
    ) -> Self {
        CityRecord {
            city,
            city_alt,
            country: interner::intern_country(country_code),
            region: interner::intern_region(region_code),
            latitude,
            longitude,
            population,
        }
    }

    /// ISO 3166-1 alpha-2 country code (e.g. "US", "FR").
    pub fn country(&self) -> String {
        interner::country_code(self.country)
    }

    /// First-level administrative division code (e.g. "TX", "08").
    pub fn region(&self) -> String {
        interner::region_code(self.region)
    }

    /// The zero-valued record signals "no match".
    pub fn is_empty(&self) -> bool {
        self.city.is_empty()
    }
}

/// Country metadata from `countryInfo.txt`. Immutable after load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    /// English name.
    pub country: String,
    pub capital: String,
    /// Surface area in km².
    pub area: i32,
    pub population: i32,
    pub geoname_id: i32,
    pub iso_numeric: i16,
    /// ISO 3166-1 alpha-2 code; the primary identifier.
    pub iso: String,
    pub iso3: String,
    pub fips: String,
    pub continent: String,
    pub tld: String,
    pub currency_code: String,
    pub currency_name: String,
    pub phone: String,
    pub postal_code_format: String,
    pub postal_code_regex: String,
    pub languages: String,
    pub neighbours: String,
    pub equivalent_fips_code: String,
}

/// The composed geocoder: city arena, country table and both indexes.
///
/// Constructed once (cache load or cold build) and immutable afterwards;
/// queries take `&self` and never lock.
pub struct Geodex {
    pub(crate) cities: Vec<CityRecord>,
    pub(crate) countries: Vec<CountryInfo>,
    pub(crate) name_index: NameIndex,
    pub(crate) cell_index: CellIndex,
    pub(crate) config: Config,
}

impl Geodex {
    /// All cities, sorted case-insensitively by primary name.
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    /// Country metadata in source order.
    pub fn countries(&self) -> &[CountryInfo] {
        &self.countries
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// Distinct country codes in the interner. Debug/telemetry.
    pub fn country_count(&self) -> usize {
        interner::country_count()
    }

    /// Distinct region codes in the interner. Debug/telemetry.
    pub fn region_count(&self) -> usize {
        interner::region_count()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn lookup_name(&self, key: &str) -> Option<&[u32]> {
        self.name_index.get(key).map(Vec::as_slice)
    }
}

/// Sorts the arena case-insensitively and (re)builds the inverted name
/// index over it. Shared by the cold build and the codec load path.
pub(crate) fn sort_and_index(cities: &mut [CityRecord]) -> NameIndex {
    cities.sort_by(|a, b| text::cmp_fold(&a.city, &b.city));
    crate::index::name::build(cities)
}

/// Wire form of a city: interner handles materialized back into code
/// strings so the cache survives interner-layout changes.
#[derive(Serialize, Deserialize)]
pub(crate) struct CityWire {
    pub city: String,
    pub city_alt: String,
    pub country: String,
    pub region: String,
    pub latitude: f32,
    pub longitude: f32,
    pub population: i32,
}

impl From<&CityRecord> for CityWire {
    fn from(c: &CityRecord) -> Self {
        CityWire {
            city: c.city.clone(),
            city_alt: c.city_alt.clone(),
            country: c.country(),
            region: c.region(),
            latitude: c.latitude,
            longitude: c.longitude,
            population: c.population,
        }
    }
}

impl From<CityWire> for CityRecord {
    fn from(w: CityWire) -> Self {
        CityRecord::new(
            w.city,
            w.city_alt,
            &w.country,
            &w.region,
            w.latitude,
            w.longitude,
            w.population,
        )
    }
}

impl Geodex {
    /// Assembles an instance from loaded parts: sorts the arena, builds the
    /// name index and always rebuilds the (never persisted) cell index.
    pub(crate) fn assemble(
        mut cities: Vec<CityRecord>,
        countries: Vec<CountryInfo>,
        name_index: Option<NameIndex>,
        config: Config,
    ) -> Self {
        let name_index = match name_index {
            Some(idx) => idx,
            None => sort_and_index(&mut cities),
        };
        let cell_index = crate::index::cell::build(&cities);
        Geodex {
            cities,
            countries,
            name_index,
            cell_index,
            config,
        }
    }
}
