// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{GeoGraph, GraphError, KDTree};

/// Resolves arbitrary positions to the closest vertex of a road network.
///
/// Implementations must return the vertex minimizing [earth_distance](crate::earth_distance)
/// to the query position, resolving ties in favor of the vertex inserted first into the
/// [GeoGraph], and fail with [GraphError::EmptyGraph] if there are no vertices.
/// Lookups never modify the underlying data.
pub trait NearestVertex {
    fn closest(&self, lon: f64, lat: f64) -> Result<i64, GraphError>;
}

impl NearestVertex for GeoGraph {
    #[inline]
    fn closest(&self, lon: f64, lat: f64) -> Result<i64, GraphError> {
        GeoGraph::closest(self, lon, lat)
    }
}

impl NearestVertex for KDTree {
    #[inline]
    fn closest(&self, lon: f64, lat: f64) -> Result<i64, GraphError> {
        KDTree::closest(self, lon, lat)
    }
}

/// Lookups on an optional tree, as returned by [KDTree::build] for a possibly-empty graph.
impl NearestVertex for Option<KDTree> {
    fn closest(&self, lon: f64, lat: f64) -> Result<i64, GraphError> {
        match self {
            Some(tree) => tree.closest(lon, lat),
            None => Err(GraphError::EmptyGraph),
        }
    }
}

impl<T: NearestVertex + ?Sized> NearestVertex for &T {
    #[inline]
    fn closest(&self, lon: f64, lat: f64) -> Result<i64, GraphError> {
        (**self).closest(lon, lat)
    }
}
