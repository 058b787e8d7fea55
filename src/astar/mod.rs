// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{GeoGraph, GraphError, NearestVertex};

mod error;
mod flat;

pub use error::{AStarError, DEFAULT_STEP_LIMIT};
pub use flat::{find_route, find_route_dijkstra};

/// Additional controls for route searches.
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions<'a> {
    /// Maximum number of vertex expansions before the search is aborted with
    /// [AStarError::StepLimitExceeded]. Defaults to [DEFAULT_STEP_LIMIT].
    pub step_limit: usize,

    /// Flag checked before every vertex expansion; once set, the search is aborted with
    /// [AStarError::Cancelled]. Allows abandoning searches from other threads.
    pub cancel: Option<&'a AtomicBool>,
}

impl Default for SearchOptions<'_> {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
            cancel: None,
        }
    }
}

impl SearchOptions<'_> {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|c| c.load(Ordering::Relaxed))
    }
}

/// Finds the shortest route between the vertices closest to the start and destination
/// positions, using [GeoGraph::closest] and [find_route] with default [SearchOptions].
///
/// Returns an empty vector if there is no route between the two vertices,
/// and a single-element vector if both positions resolve to the same vertex.
pub fn shortest_path(
    g: &GeoGraph,
    start_lon: f64,
    start_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
) -> Result<Vec<i64>, AStarError> {
    shortest_path_with(
        g,
        g,
        start_lon,
        start_lat,
        dest_lon,
        dest_lat,
        &SearchOptions::default(),
    )
}

/// Like [shortest_path], but resolves positions with the provided [NearestVertex]
/// index (e.g. a [KDTree](crate::KDTree) built over `g`) and searches with
/// the provided [SearchOptions].
pub fn shortest_path_with<I: NearestVertex + ?Sized>(
    g: &GeoGraph,
    index: &I,
    start_lon: f64,
    start_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
    options: &SearchOptions<'_>,
) -> Result<Vec<i64>, AStarError> {
    let start = index.closest(start_lon, start_lat)?;
    let end = index.closest(dest_lon, dest_lat)?;
    find_route(g, start, end, options)
}

/// Computes the length of a route, in miles, as the sum of distances of the
/// [edges](GeoGraph::edge_between) between consecutive vertices. Consecutive vertices
/// without a direct edge contribute their great-circle distance.
pub fn route_distance(g: &GeoGraph, route: &[i64]) -> Result<f64, GraphError> {
    route.windows(2).try_fold(0.0, |total, pair| {
        let leg = match g.edge_between(pair[0], pair[1]) {
            Some(edge) => edge.distance,
            None => g.distance(pair[0], pair[1])?,
        };
        Ok(total + leg)
    })
}
