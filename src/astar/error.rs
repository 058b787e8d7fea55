// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::GraphError;

/// Recommended number of allowed vertex expansions in [find_route](crate::find_route) and
/// [shortest_path](crate::shortest_path) before [AStarError::StepLimitExceeded] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Error conditions which may occur during [find_route](crate::find_route),
/// [find_route_dijkstra](crate::find_route_dijkstra) or [shortest_path](crate::shortest_path).
///
/// Note that the absence of a route is not an error; it is reported as an empty route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AStarError {
    /// The start or end vertices don't exist in a graph.
    InvalidReference(i64),

    /// Start or end positions can't be resolved, as the graph has no vertices.
    EmptyGraph,

    /// Route search has exceeded its limit of steps.
    /// Either the vertices are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires traversing the whole connected component,
    /// which can result in a denial-of-service. The step limit protects
    /// against resource exhaustion.
    StepLimitExceeded,

    /// Route search was aborted through [SearchOptions::cancel](crate::SearchOptions::cancel).
    Cancelled,
}

impl From<GraphError> for AStarError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::UnknownVertex(id) => Self::InvalidReference(id),
            GraphError::EmptyGraph => Self::EmptyGraph,
        }
    }
}

impl std::fmt::Display for AStarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReference(vertex_id) => write!(f, "invalid vertex: {}", vertex_id),
            Self::EmptyGraph => write!(f, "graph has no vertices"),
            Self::StepLimitExceeded => write!(f, "step limit exceeded"),
            Self::Cancelled => write!(f, "route search cancelled"),
        }
    }
}

impl std::error::Error for AStarError {}
