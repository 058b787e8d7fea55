// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::hash_map::{Entry, HashMap};
use std::collections::HashSet;

use crate::{earth_distance, initial_bearing, Edge, GraphError, Vertex};

/// Represents a road network as a set of [Vertices](Vertex)
/// and undirected [Edges](Edge) between them.
///
/// Vertices are kept in insertion order, which is the order of [GeoGraph::vertices]
/// and the tie-breaking order of [nearest vertex](crate::NearestVertex) lookups.
/// Edges are stored once and referenced from the adjacency lists of both endpoints.
///
/// A graph is meant to be built once (with [GeoGraph::add_vertex], [GeoGraph::add_edge]
/// and a final [GeoGraph::cleanup]) and then only queried, possibly from many threads.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeoGraph {
    vertices: Vec<Vertex>,
    index: HashMap<i64, usize>,
    edges: Vec<Edge>,
}

impl GeoGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of vertices in the graph.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over ids of all vertices in the graph, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = i64> + '_ {
        self.vertices.iter().map(|v| v.id)
    }

    /// Returns an iterator over all [Vertices](Vertex) in the graph, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Retrieves a [Vertex] with the provided id.
    pub fn get_vertex(&self, id: i64) -> Option<&Vertex> {
        self.index.get(&id).map(|&idx| &self.vertices[idx])
    }

    fn vertex(&self, id: i64) -> Result<&Vertex, GraphError> {
        self.get_vertex(id).ok_or(GraphError::UnknownVertex(id))
    }

    /// Retrieves an [Edge] by its index, as stored in [Vertex::edges].
    pub fn get_edge(&self, idx: usize) -> Option<&Edge> {
        self.edges.get(idx)
    }

    /// Creates or updates a [Vertex] with the provided id.
    ///
    /// Re-inserting an existing id is an upsert: the position and name are overwritten,
    /// while the insertion order and all incident edges are preserved. Distances of
    /// already-added edges are not recomputed, so vertices should only be moved before
    /// any edges are attached to them.
    pub fn add_vertex(&mut self, id: i64, lat: f64, lon: f64, name: Option<String>) {
        match self.index.entry(id) {
            Entry::Vacant(e) => {
                e.insert(self.vertices.len());
                self.vertices.push(Vertex {
                    id,
                    lat,
                    lon,
                    name,
                    edges: Vec::default(),
                });
            }
            Entry::Occupied(e) => {
                let v = &mut self.vertices[*e.get()];
                debug_assert_eq!(v.id, id);
                v.lat = lat;
                v.lon = lon;
                v.name = name;
            }
        }
    }

    /// Adds an undirected [Edge] between two existing vertices and returns its index.
    ///
    /// The distance of the edge is computed from the current positions of the endpoints.
    /// Fails with [GraphError::UnknownVertex] if any of the endpoints doesn't exist,
    /// in which case the graph is left untouched.
    pub fn add_edge(
        &mut self,
        id: i64,
        name: impl Into<String>,
        max_speed: Option<String>,
        start: i64,
        end: i64,
    ) -> Result<usize, GraphError> {
        let start_idx = *self
            .index
            .get(&start)
            .ok_or(GraphError::UnknownVertex(start))?;
        let end_idx = *self
            .index
            .get(&end)
            .ok_or(GraphError::UnknownVertex(end))?;

        let (a, b) = (&self.vertices[start_idx], &self.vertices[end_idx]);
        let edge_idx = self.edges.len();
        self.edges.push(Edge {
            id,
            name: name.into(),
            max_speed,
            start,
            end,
            distance: earth_distance(a.lat, a.lon, b.lat, b.lon),
        });

        self.vertices[start_idx].edges.push(edge_idx);
        if end_idx != start_idx {
            self.vertices[end_idx].edges.push(edge_idx);
        }

        Ok(edge_idx)
    }

    /// Removes every vertex without any incident edges, returning the number of removed vertices.
    ///
    /// Should be called exactly once, after all vertices and edges were added.
    /// This does not guarantee that the remaining graph is connected.
    pub fn cleanup(&mut self) -> usize {
        let before = self.vertices.len();
        self.vertices.retain(|v| !v.edges.is_empty());
        self.index = self
            .vertices
            .iter()
            .enumerate()
            .map(|(idx, v)| (v.id, idx))
            .collect();

        let removed = before - self.vertices.len();
        log::info!(
            "removed {} isolated vertices, {} vertices remain",
            removed,
            self.vertices.len()
        );
        removed
    }

    /// Returns an iterator over all [Edges](Edge) incident to the vertex with the provided id.
    pub fn incident_edges(&self, v: i64) -> Result<impl Iterator<Item = &Edge> + '_, GraphError> {
        Ok(self
            .vertex(v)?
            .edges
            .iter()
            .filter_map(|&idx| self.edges.get(idx)))
    }

    /// Returns ids of all vertices adjacent to `v`, one per incident edge.
    pub fn adjacent_vertices(&self, v: i64) -> Result<Vec<i64>, GraphError> {
        Ok(self
            .incident_edges(v)?
            .filter_map(|e| e.other(v))
            .collect())
    }

    /// Returns the shortest [Edge] directly connecting `v` and `w`, if there is one.
    pub fn edge_between(&self, v: i64, w: i64) -> Option<&Edge> {
        self.incident_edges(v)
            .ok()?
            .filter(|e| e.other(v) == Some(w))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    /// Returns the latitude of a vertex.
    pub fn lat(&self, v: i64) -> Result<f64, GraphError> {
        Ok(self.vertex(v)?.lat)
    }

    /// Returns the longitude of a vertex.
    pub fn lon(&self, v: i64) -> Result<f64, GraphError> {
        Ok(self.vertex(v)?.lon)
    }

    /// Returns the great-circle distance between two vertices, in miles.
    /// See [earth_distance].
    pub fn distance(&self, v: i64, w: i64) -> Result<f64, GraphError> {
        let (v, w) = (self.vertex(v)?, self.vertex(w)?);
        Ok(earth_distance(v.lat, v.lon, w.lat, w.lon))
    }

    /// Returns the initial bearing from one vertex towards another, in degrees.
    /// See [initial_bearing].
    pub fn bearing(&self, v: i64, w: i64) -> Result<f64, GraphError> {
        let (v, w) = (self.vertex(v)?, self.vertex(w)?);
        Ok(initial_bearing(v.lat, v.lon, w.lat, w.lon))
    }

    /// Finds the id of the vertex closest to the given position.
    /// Ties are resolved in favor of the vertex inserted first.
    ///
    /// This function requires computing the distance to every vertex in the graph.
    /// For repeated queries on large graphs, use a [KDTree](crate::KDTree).
    pub fn closest(&self, lon: f64, lat: f64) -> Result<i64, GraphError> {
        let mut candidates = self
            .vertices
            .iter()
            .map(|v| (earth_distance(lat, lon, v.lat, v.lon), v.id));

        let mut best = candidates.next().ok_or(GraphError::EmptyGraph)?;
        for candidate in candidates {
            if candidate.0 < best.0 {
                best = candidate;
            }
        }
        Ok(best.1)
    }

    /// Returns the distinct names of vertices whose [cleaned](clean_name) form
    /// starts with the cleaned `prefix`, in insertion order.
    pub fn location_names_by_prefix(&self, prefix: &str) -> Vec<String> {
        let prefix = clean_name(prefix);
        let mut seen = HashSet::new();
        self.vertices
            .iter()
            .filter_map(|v| v.name.as_deref())
            .filter(|name| clean_name(name).starts_with(&prefix))
            .filter(|&name| seen.insert(name))
            .map(str::to_string)
            .collect()
    }

    /// Returns all vertices whose [cleaned](clean_name) name equals the cleaned `name`.
    pub fn locations(&self, name: &str) -> Vec<&Vertex> {
        let name = clean_name(name);
        self.vertices
            .iter()
            .filter(|v| v.name.as_deref().map(clean_name).as_deref() == Some(name.as_str()))
            .collect()
    }
}

/// Normalizes a location name for searching, by lowercasing it and
/// dropping everything except for ASCII letters and spaces.
pub fn clean_name(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-9),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn simple_graph() -> GeoGraph {
        //  B──C
        //  │
        //  A     D
        let mut g = GeoGraph::new();
        g.add_vertex(1, 0.0, 0.0, Some("Alpha".to_string()));
        g.add_vertex(2, 0.0, 1.0, None);
        g.add_vertex(3, 1.0, 1.0, Some("Charlie's Place".to_string()));
        g.add_vertex(4, 0.0, 5.0, None);
        g.add_edge(10, "First", None, 1, 2).unwrap();
        g.add_edge(11, "Second", Some("25 mph".to_string()), 2, 3).unwrap();
        g
    }

    #[test]
    fn add_edge_with_unknown_endpoint() {
        let mut g = simple_graph();
        assert_eq!(
            g.add_edge(12, "Nowhere", None, 1, 99),
            Err(GraphError::UnknownVertex(99))
        );
        assert_eq!(
            g.add_edge(12, "Nowhere", None, 98, 1),
            Err(GraphError::UnknownVertex(98))
        );
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.adjacent_vertices(1).unwrap(), vec![2]);
    }

    #[test]
    fn edge_is_shared_by_both_endpoints() {
        let g = simple_graph();
        assert_eq!(g.adjacent_vertices(1).unwrap(), vec![2]);
        assert_eq!(g.adjacent_vertices(2).unwrap(), vec![1, 3]);
        assert_eq!(g.adjacent_vertices(3).unwrap(), vec![2]);
        assert_eq!(g.adjacent_vertices(4).unwrap(), Vec::<i64>::new());
        assert_eq!(g.get_vertex(2).unwrap().edges(), &[0, 1]);

        let e = g.edge_between(3, 2).unwrap();
        assert_eq!(e.id, 11);
        assert_eq!(e.max_speed.as_deref(), Some("25 mph"));
        assert_almost_eq!(e.distance, g.distance(2, 3).unwrap());
        assert!(g.edge_between(1, 3).is_none());
    }

    #[test]
    fn unknown_vertex_accessors() {
        let g = simple_graph();
        assert_eq!(g.lat(42), Err(GraphError::UnknownVertex(42)));
        assert_eq!(g.lon(42), Err(GraphError::UnknownVertex(42)));
        assert_eq!(g.distance(1, 42), Err(GraphError::UnknownVertex(42)));
        assert_eq!(g.bearing(42, 1), Err(GraphError::UnknownVertex(42)));
        assert_eq!(
            g.adjacent_vertices(42),
            Err(GraphError::UnknownVertex(42))
        );
    }

    #[test]
    fn cleanup_removes_isolated_vertices() {
        let mut g = simple_graph();
        assert_eq!(g.cleanup(), 1);
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(g.get_vertex(4).is_none());

        // Vertices are still reachable through the rebuilt index
        assert_eq!(g.lat(3), Ok(1.0));
        assert_eq!(g.adjacent_vertices(2).unwrap(), vec![1, 3]);
    }

    #[test]
    fn vertices_are_restartable() {
        let g = simple_graph();
        let first: Vec<i64> = g.vertices().collect();
        let second: Vec<i64> = g.vertices().collect();
        assert_eq!(first, vec![1, 2, 3, 4]);
        assert_eq!(first, second);
    }

    #[test]
    fn add_vertex_upserts() {
        let mut g = simple_graph();
        g.add_vertex(1, 0.5, 0.0, Some("Alpha Prime".to_string()));
        assert_eq!(g.len(), 4);
        assert_eq!(g.vertices().next(), Some(1));
        assert_eq!(g.lat(1), Ok(0.5));
        assert_eq!(g.adjacent_vertices(1).unwrap(), vec![2]);
    }

    #[test]
    fn distance_properties() {
        let g = simple_graph();
        for v in g.vertices() {
            assert_eq!(g.distance(v, v).unwrap(), 0.0);
            for w in g.vertices() {
                assert_almost_eq!(g.distance(v, w).unwrap(), g.distance(w, v).unwrap());
            }
        }
    }

    #[test]
    fn bearing_between_vertices() {
        let g = simple_graph();
        assert_almost_eq!(g.bearing(1, 2).unwrap(), 90.0);
        assert_almost_eq!(g.bearing(2, 3).unwrap(), 0.0);
        assert_almost_eq!(g.bearing(2, 1).unwrap(), -90.0);
    }

    #[test]
    fn closest_vertex() {
        let mut g = GeoGraph::new();
        g.add_vertex(1, 0.0, 0.0, None);
        g.add_vertex(2, 10.0, 10.0, None);
        assert_eq!(g.closest(0.001, 0.001), Ok(1));
        assert_eq!(g.closest(9.0, 9.5), Ok(2));
    }

    #[test]
    fn closest_breaks_ties_by_insertion_order() {
        let mut g = GeoGraph::new();
        g.add_vertex(7, 0.0, 1.0, None);
        g.add_vertex(3, 0.0, -1.0, None);
        assert_eq!(g.closest(0.0, 0.0), Ok(7));

        // Colocated vertices
        g.add_vertex(1, 5.0, 5.0, None);
        g.add_vertex(0, 5.0, 5.0, None);
        assert_eq!(g.closest(5.0, 5.0), Ok(1));
    }

    #[test]
    fn closest_with_antipodal_vertex() {
        let mut g = GeoGraph::new();
        g.add_vertex(1, 1.4098, 0.0, None);
        g.add_vertex(2, -1.4088, 180.0, None);
        assert!(g.distance(1, 2).unwrap().is_finite());
        assert_eq!(g.closest(180.0, -1.4098), Ok(2));
        assert_eq!(g.closest(0.0, 1.4098), Ok(1));
    }

    #[test]
    fn closest_on_empty_graph() {
        assert_eq!(GeoGraph::new().closest(0.0, 0.0), Err(GraphError::EmptyGraph));
    }

    #[test]
    fn closest_does_not_mutate() {
        let g = simple_graph();
        let before = g.clone();
        let _ = g.closest(0.3, 0.3).unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn location_search() {
        let mut g = simple_graph();
        g.add_vertex(5, 2.0, 2.0, Some("charlies place".to_string()));
        g.add_vertex(6, 2.0, 3.0, Some("Charlie's Place".to_string()));

        assert_eq!(clean_name("Charlie's Place #2"), "charlies place ");
        assert_eq!(
            g.location_names_by_prefix("CHAR"),
            vec!["Charlie's Place".to_string(), "charlies place".to_string()]
        );
        assert_eq!(g.location_names_by_prefix("al"), vec!["Alpha".to_string()]);
        assert!(g.location_names_by_prefix("zulu").is_empty());

        let ids: Vec<i64> = g.locations("charlies place").iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![3, 5, 6]);
    }
}
