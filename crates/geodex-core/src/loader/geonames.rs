//! Geonames source-file ingest.
//!
//! `cities1000.zip` wraps one tab-separated file of 19-field records;
//! `countryInfo.txt` is tab-separated with `#` comment lines. Per-record
//! problems (wrong field count, unparseable coordinates) skip the record
//! and never abort the ingest; a malformed line in a 145K-line dump is
//! routine, not fatal.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{GeodexError, Result};
use crate::model::{CityRecord, CountryInfo};

/// Field count of both the cities dump and `countryInfo.txt`.
const FIELD_COUNT: usize = 19;

fn tsv_reader<R: Read>(reader: R, comments: bool) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .comment(comments.then_some(b'#'))
        .from_reader(reader)
}

/// Streams every entry of the cities archive into city records.
pub(crate) fn load_cities_archive(path: &Path) -> Result<Vec<CityRecord>> {
    let file =
        File::open(path).map_err(|e| GeodexError::io_at("opening cities archive", path, e))?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut cities = Vec::with_capacity(160_000);
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        parse_cities_tsv(entry, &mut cities);
    }
    Ok(cities)
}

/// Parses one tab-separated cities stream, appending valid records.
///
/// A record survives when it has 19 fields, a non-empty trimmed name and
/// finite in-range coordinates. Unparseable coordinates are dropped rather
/// than defaulted — a (0,0) fallback would strand records on Null Island.
pub(crate) fn parse_cities_tsv<R: Read>(reader: R, out: &mut Vec<CityRecord>) {
    let mut skipped = 0usize;
    for record in tsv_reader(reader, false).records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        if record.len() < FIELD_COUNT {
            skipped += 1;
            continue;
        }

        let name = record.get(1).unwrap_or_default().trim_matches(' ');
        if name.is_empty() {
            skipped += 1;
            continue;
        }

        let lat = record.get(4).unwrap_or_default().parse::<f32>();
        let lng = record.get(5).unwrap_or_default().parse::<f32>();
        let (lat, lng) = match (lat, lng) {
            (Ok(lat), Ok(lng))
                if lat.is_finite()
                    && lng.is_finite()
                    && (-90.0..=90.0).contains(&lat)
                    && (-180.0..=180.0).contains(&lng) =>
            {
                (lat, lng)
            }
            _ => {
                skipped += 1;
                continue;
            }
        };

        let population = record
            .get(14)
            .unwrap_or_default()
            .parse::<i32>()
            .unwrap_or(0);

        out.push(CityRecord::new(
            name.to_string(),
            record.get(3).unwrap_or_default().to_string(),
            record.get(8).unwrap_or_default(),
            record.get(10).unwrap_or_default(),
            lat,
            lng,
            population,
        ));
    }
    if skipped > 0 {
        tracing::debug!(skipped, "dropped malformed city records");
    }
}

/// Parses `countryInfo.txt` into the country table.
pub(crate) fn load_country_info(path: &Path) -> Result<Vec<CountryInfo>> {
    let file =
        File::open(path).map_err(|e| GeodexError::io_at("opening country info", path, e))?;

    let mut countries = Vec::with_capacity(260);
    for record in tsv_reader(file, true).records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => continue,
        };
        if record.len() < FIELD_COUNT {
            continue;
        }
        let iso = record.get(0).unwrap_or_default();
        if iso.is_empty() || iso == "0" {
            continue;
        }

        let int = |i: usize| record.get(i).unwrap_or_default().parse::<i32>().unwrap_or(0);
        let field = |i: usize| record.get(i).unwrap_or_default().to_string();

        countries.push(CountryInfo {
            iso: iso.to_string(),
            iso3: field(1),
            iso_numeric: int(2) as i16,
            fips: field(3),
            country: field(4),
            capital: field(5),
            area: int(6),
            population: int(7),
            continent: field(8),
            tld: field(9),
            currency_code: field(10),
            currency_name: field(11),
            phone: field(12),
            postal_code_format: field(13),
            postal_code_regex: field(14),
            languages: field(15),
            geoname_id: int(16),
            neighbours: field(17),
            equivalent_fips_code: field(18),
        });
    }
    Ok(countries)
}
