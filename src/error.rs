// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Error conditions of [GeoGraph](crate::GeoGraph) operations
/// and [nearest vertex](crate::NearestVertex) lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The referenced vertex doesn't exist in the graph.
    #[error("unknown vertex: {0}")]
    UnknownVertex(i64),

    /// A nearest vertex lookup was attempted on a graph without any vertices.
    #[error("graph has no vertices")]
    EmptyGraph,
}
