//! Reverse matching: nearest city on the sphere, with a neighborhood
//! override so a query inside a small enclave resolves to the city around
//! it rather than the enclave itself.

use crate::index::cell;
use crate::model::{CityRecord, Geodex};

/// ~100 km in radians on the unit sphere. Queries whose closest city is
/// farther than this (open ocean, poles) resolve to the empty record.
const MAX_REVERSE_DISTANCE: f64 = 0.0157;

/// ~10 km in radians on the unit sphere; the neighborhood-override radius.
const NEARBY_THRESHOLD: f64 = 0.00157;

/// Population below which a best match is suspected of being a
/// neighborhood or enclave of a larger city.
const OVERRIDE_POPULATION_CEILING: i32 = 500_000;

/// How many times more populous a nearby city must be to take over.
const OVERRIDE_POPULATION_RATIO: i64 = 10;

/// Great-circle distance in radians on the unit sphere (haversine).
/// Euclidean lat/lng deltas overstate east-west distances away from the
/// equator and are not usable here.
fn great_circle_rad(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * a.sqrt().min(1.0).asin()
}

struct Candidate {
    index: u32,
    dist: f64,
}

impl Geodex {
    /// Maps a coordinate pair to the best-matching city.
    ///
    /// Returns the empty record for non-finite input, for coordinates with
    /// no city within ~100 km, and for an empty arena. Never errors.
    pub fn reverse_geocode(&self, lat: f64, lng: f64) -> CityRecord {
        if !lat.is_finite() || !lng.is_finite() {
            return CityRecord::default();
        }

        let query_cell = cell::cell_for(lat, lng);

        let mut candidates: Vec<Candidate> = Vec::new();
        for c in cell::cell_and_neighbors(query_cell) {
            let Some(indices) = self.cell_index.get(&c.0) else {
                continue;
            };
            for &index in indices {
                let city = &self.cities[index as usize];
                candidates.push(Candidate {
                    index,
                    dist: great_circle_rad(
                        lat,
                        lng,
                        f64::from(city.latitude),
                        f64::from(city.longitude),
                    ),
                });
            }
        }

        if candidates.is_empty() {
            return CityRecord::default();
        }

        // Stable sort on distance with population and name as secondary
        // keys; equal-distance outcomes must not depend on cell order.
        candidates.sort_by(|a, b| {
            let ca = &self.cities[a.index as usize];
            let cb = &self.cities[b.index as usize];
            a.dist
                .partial_cmp(&b.dist)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| cb.population.cmp(&ca.population))
                .then_with(|| ca.city.cmp(&cb.city))
        });

        let mut best = &candidates[0];
        if best.dist > MAX_REVERSE_DISTANCE {
            return CityRecord::default();
        }

        // Neighborhood override: a small closest match cedes to the first
        // markedly larger city within ~10 km, in sorted order.
        let best_pop = self.cities[best.index as usize].population;
        if best_pop < OVERRIDE_POPULATION_CEILING {
            let floor = i64::from(best_pop).saturating_mul(OVERRIDE_POPULATION_RATIO);
            for c in &candidates[1..] {
                if c.dist > NEARBY_THRESHOLD {
                    break;
                }
                let pop = i64::from(self.cities[c.index as usize].population);
                if pop > 0 && pop >= floor && pop > i64::from(best_pop) {
                    best = c;
                    break;
                }
            }
        }

        self.cities[best.index as usize].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distances() {
        // London → Paris is ~344 km; the unit-sphere angle is d/R
        let d = great_circle_rad(51.50853, -0.12574, 48.85341, 2.3488);
        let km = d * 6371.0;
        assert!((330.0..360.0).contains(&km), "got {km} km");

        // zero distance
        assert_eq!(great_circle_rad(10.0, 20.0, 10.0, 20.0), 0.0);

        // antipodal points are half a circle apart
        let anti = great_circle_rad(0.0, 0.0, 0.0, 180.0);
        assert!((anti - std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn longitude_shrinks_with_latitude() {
        // one degree of longitude is much shorter at 60°N than at the
        // equator; a Euclidean treatment would make these equal
        let at_equator = great_circle_rad(0.0, 0.0, 0.0, 1.0);
        let at_60 = great_circle_rad(60.0, 0.0, 60.0, 1.0);
        assert!(at_60 < at_equator * 0.6);
    }
}
