//! Synthetic central-Medan street grid.
//!
//! Three north–south avenues crossed by three east–west streets, roughly
//! 1 km apart, covering the facilities in the demo catalog.

use fm_core::GeoPoint;
use fm_network::{RoadNetwork, RoadNetworkBuilder};

const AVENUES: [(&str, f64); 3] = [
    ("Jl. Gatot Subroto", 98.655),
    ("Jl. Imam Bonjol",   98.670),
    ("Jl. Sisingamangaraja", 98.690),
];

const STREETS: [(&str, f64); 3] = [
    ("Jl. Pelajar",        3.570),
    ("Jl. Teuku Cik Ditiro", 3.583),
    ("Jl. Sei Batang Hari",  3.600),
];

/// Urban speeds (km/h) for avenues and streets.
const AVENUE_KMH: f64 = 40.0;
const STREET_KMH: f64 = 30.0;

pub fn build_network() -> RoadNetwork {
    let mut b = RoadNetworkBuilder::new();

    // grid[street][avenue]
    let grid: Vec<Vec<_>> = STREETS
        .iter()
        .map(|&(_, lat)| AVENUES.iter().map(|&(_, lon)| b.add_node(GeoPoint::new(lat, lon))).collect())
        .collect();

    for (row, &(name, _)) in grid.iter().zip(STREETS.iter()) {
        for pair in row.windows(2) {
            b.add_road_at_speed(pair[0], pair[1], STREET_KMH, name);
        }
    }
    for (col, &(name, _)) in AVENUES.iter().enumerate() {
        for s in 1..grid.len() {
            b.add_road_at_speed(grid[s - 1][col], grid[s][col], AVENUE_KMH, name);
        }
    }

    b.build()
}
