// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;

use crate::distance::{meridian_distance, parallel_distance};
use crate::{earth_distance, GeoGraph, GraphError};

/// Slack for the pruning bounds, to keep floating-point noise from
/// hiding an equally-distant vertex inserted earlier.
const PRUNE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pivot {
    id: i64,
    order: usize,
    lat: f64,
    lon: f64,
}

/// Candidate found during a lookup; compared by distance first, insertion order second.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist: f64,
    order: usize,
    id: i64,
}

impl Candidate {
    fn of(p: &Pivot, lat: f64, lon: f64) -> Self {
        Self {
            dist: earth_distance(lat, lon, p.lat, p.lon),
            order: p.order,
            id: p.id,
        }
    }

    fn is_better_than(&self, other: &Self) -> bool {
        match self.dist.partial_cmp(&other.dist) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.order < other.order,
            _ => false,
        }
    }
}

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// which can be used to speed up nearest-vertex lookups on large graphs. A [GeoGraph::closest]
/// lookup needs to compute the distance to every vertex, which quickly dominates the time of
/// [shortest_path](crate::shortest_path) queries. A k-d tree trades memory usage for CPU time.
///
/// Lookups return exactly the same vertex as [GeoGraph::closest], including the insertion-order
/// tie-breaking. Branches are only skipped if the great-circle distance to the splitting
/// parallel or meridian proves they can't contain a closer vertex.
///
/// The tree is a snapshot: it should be built after [GeoGraph::cleanup], and rebuilt
/// if the graph changes afterwards.
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: Pivot,
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Finds the id of the vertex closest to the given position.
    pub fn closest(&self, lon: f64, lat: f64) -> Result<i64, GraphError> {
        Ok(self.closest_impl(lat, lon, false).id)
    }

    fn closest_impl(&self, lat: f64, lon: f64, lon_divides: bool) -> Candidate {
        // Start by assuming that pivot is the closest
        let mut best = Candidate::of(&self.pivot, lat, lon);

        // Select which branch to recurse into first
        let first_left = if lon_divides {
            lon < self.pivot.lon
        } else {
            lat < self.pivot.lat
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        if let Some(ref branch) = first {
            let alt = branch.closest_impl(lat, lon, !lon_divides);
            if alt.is_better_than(&best) {
                best = alt;
            }
        }

        if let Some(ref branch) = second {
            // A closer (or equally close) vertex is possible in the second branch
            // only if the splitting axis is not farther than the current best candidate.
            // Across a meridian, the branch covers a lune bounded by the splitting
            // and the antimeridian.
            let dist_to_axis = if lon_divides {
                meridian_distance(lat, lon, self.pivot.lon).min(meridian_distance(lat, lon, 180.0))
            } else {
                parallel_distance(lat, self.pivot.lat)
            };

            if dist_to_axis - PRUNE_EPSILON <= best.dist || best.dist.is_nan() {
                let alt = branch.closest_impl(lat, lon, !lon_divides);
                if alt.is_better_than(&best) {
                    best = alt;
                }
            }
        }

        best
    }

    /// Builds a k-d tree over all vertices of a [GeoGraph].
    /// Returns `None` if the graph has no vertices.
    pub fn build(g: &GeoGraph) -> Option<Self> {
        let mut pivots = g
            .iter()
            .enumerate()
            .map(|(order, v)| Pivot {
                id: v.id,
                order,
                lat: v.lat,
                lon: v.lon,
            })
            .collect::<Vec<_>>();
        let tree = Self::build_impl(pivots.as_mut_slice(), false);
        log::debug!("built k-d tree over {} vertices", pivots.len());
        tree
    }

    fn build_impl(pivots: &mut [Pivot], lon_divides: bool) -> Option<Self> {
        match pivots.len() {
            0 => None,
            1 => Some(Self {
                pivot: pivots[0],
                left: None,
                right: None,
            }),
            _ => {
                if lon_divides {
                    pivots.sort_by(|a, b| a.lon.total_cmp(&b.lon));
                } else {
                    pivots.sort_by(|a, b| a.lat.total_cmp(&b.lat));
                }
                let median = pivots.len() / 2;
                let pivot = pivots[median];
                let (left, right_and_pivot) = pivots.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build_impl(left, !lon_divides).map(Box::new),
                    right: Self::build_impl(right, !lon_divides).map(Box::new),
                })
            }
        }
    }
}
