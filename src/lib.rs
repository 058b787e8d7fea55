// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Routing and turn-by-turn directions over road networks.
//!
//! A road network is kept as an undirected, weighted [GeoGraph] of intersections
//! ([Vertices](Vertex)) and road segments ([Edges](Edge)). Arbitrary coordinates are
//! anchored to the network with a [NearestVertex] index, routes are found with
//! A*, and [route_directions] turns a route into human-readable instructions.
//! Road networks can be loaded from [OpenStreetMap](https://www.openstreetmap.org/)
//! XML files with the [osm] module.
//!
//! # Example
//!
//! ```no_run
//! let mut g = waymark::GeoGraph::new();
//! let options = waymark::osm::Options::default();
//! waymark::osm::load_from_file(&mut g, &options, "path/to/berkeley.osm")
//!     .expect("failed to load berkeley.osm");
//!
//! let route = waymark::shortest_path(&g, -122.2585, 37.8719, -122.2712, 37.8044)
//!     .expect("failed to find route");
//!
//! for direction in waymark::route_directions(&g, &route).unwrap() {
//!     println!("{}", direction);
//! }
//! ```

mod astar;
mod directions;
mod distance;
mod error;
mod graph;
mod kd;
mod nearest;
pub mod osm;

pub use astar::{
    find_route, find_route_dijkstra, route_distance, shortest_path, shortest_path_with,
    AStarError, SearchOptions, DEFAULT_STEP_LIMIT,
};
pub use directions::{
    route_directions, Direction, NavigationDirection, UnparsableInstruction, SHARP_TURN_DEGREES,
    SLIGHT_TURN_DEGREES, STRAIGHT_DEGREES, UNKNOWN_ROAD,
};
pub use distance::{earth_distance, initial_bearing, EARTH_RADIUS_MILES};
pub use error::GraphError;
pub use graph::{clean_name, GeoGraph};
pub use kd::KDTree;
pub use nearest::NearestVertex;

/// Represents an intersection of the road network, an element of the [GeoGraph].
///
/// The adjacency list holds indices of all incident [Edges](Edge),
/// as accepted by [GeoGraph::get_edge].
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
    pub(crate) edges: Vec<usize>,
}

impl Vertex {
    /// Indices of all [Edges](Edge) incident to this vertex.
    pub fn edges(&self) -> &[usize] {
        &self.edges
    }
}

/// Represents an undirected road segment between two [Vertices](Vertex).
///
/// `distance` is the great-circle distance (in miles) between the endpoints,
/// computed once when the edge is added to the [GeoGraph].
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: i64,
    pub name: String,
    pub max_speed: Option<String>,
    pub start: i64,
    pub end: i64,
    pub distance: f64,
}

impl Edge {
    /// Returns the endpoint on the other side of `v`,
    /// or `None` if `v` is not an endpoint of this edge.
    pub fn other(&self, v: i64) -> Option<i64> {
        if self.start == v {
            Some(self.end)
        } else if self.end == v {
            Some(self.start)
        } else {
            None
        }
    }
}
