//! S2 cell index for reverse geocoding.
//!
//! Each city lands in exactly one cell: the level-10 ancestor of the leaf
//! cell containing its coordinates. Level 10 gives roughly 10 km × 10 km
//! cells at the equator, small enough that a query cell plus its eight
//! neighbors bounds the candidate scan, large enough to keep the index at
//! a few tens of thousands of entries.
//!
//! The index is cheap to rebuild (one pass over the arena) and is therefore
//! never persisted.

use s2::cellid::CellID;
use s2::latlng::LatLng;
use std::collections::HashMap;

use crate::model::CityRecord;

/// S2 cell level of the index. See the module docs for the trade-off.
pub(crate) const CELL_LEVEL: u64 = 10;

/// Raw cell id → posting list of arena indices.
pub(crate) type CellIndex = HashMap<u64, Vec<u32>>;

/// The index cell covering a coordinate pair.
pub(crate) fn cell_for(lat: f64, lng: f64) -> CellID {
    CellID::from(LatLng::from_degrees(lat, lng)).parent(CELL_LEVEL)
}

/// Builds the cell index over the (already sorted) arena.
pub(crate) fn build(cities: &[CityRecord]) -> CellIndex {
    let mut index = CellIndex::new();
    for (i, city) in cities.iter().enumerate() {
        let cell = cell_for(f64::from(city.latitude), f64::from(city.longitude));
        index.entry(cell.0).or_default().push(i as u32);
    }
    index
}

/// The query cell, its four edge neighbors, and their unique edge
/// neighbors: nine cells in the general case, fewer near cube-face
/// corners. Order is deterministic (center, edges, then corners).
pub(crate) fn cell_and_neighbors(cell: CellID) -> Vec<CellID> {
    let mut cells = Vec::with_capacity(9);
    cells.push(cell);

    let edges = cell.edge_neighbors();
    for n in edges.iter() {
        if !cells.contains(n) {
            cells.push(*n);
        }
    }
    for edge in edges.iter() {
        for corner in edge.edge_neighbors().iter() {
            if !cells.contains(corner) {
                cells.push(*corner);
            }
        }
    }
    cells
}
