// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::osm::{LoadStats, Options};
use crate::GeoGraph;

use super::model;

/// Helper object used for storing state related to converting [OSM features](model::Feature)
/// into a [GeoGraph].
pub(super) struct GraphBuilder<'a> {
    g: &'a mut GeoGraph,
    options: &'a Options<'a>,
    ignore_bbox: bool,
    stats: LoadStats,
}

impl<'a> GraphBuilder<'a> {
    /// Create a new graph builder, adding features to the provided graph.
    pub(super) fn new(g: &'a mut GeoGraph, options: &'a Options<'a>) -> Self {
        let ignore_bbox =
            options.bbox.iter().all(|&x| x == 0.0) || options.bbox.iter().any(|x| !x.is_finite());

        if ignore_bbox && options.bbox.iter().any(|x| !x.is_finite()) {
            log::warn!("ignoring invalid bounding box {:?}", options.bbox);
        }

        Self {
            g,
            options,
            ignore_bbox,
            stats: LoadStats::default(),
        }
    }

    /// Add all features from the provided iterator, then remove isolated vertices
    /// if [Options::prune_isolated] is set.
    pub(super) fn add_features<I, E>(mut self, features: I) -> Result<LoadStats, E>
    where
        I: Iterator<Item = Result<model::Feature, E>>,
    {
        for f in features {
            self.add_feature(f?);
        }

        if self.options.prune_isolated {
            self.stats.pruned_vertices = self.g.cleanup();
        }
        log::info!(
            "loaded {} vertices and {} edges ({} edges skipped, {} vertices pruned)",
            self.stats.vertices,
            self.stats.edges,
            self.stats.skipped_edges,
            self.stats.pruned_vertices,
        );
        Ok(self.stats)
    }

    fn add_feature(&mut self, f: model::Feature) {
        match f {
            model::Feature::Node(n) => self.add_node(n),
            model::Feature::Way(w) => self.add_way(w),
        }
    }

    fn add_node(&mut self, mut n: model::Node) {
        if self.is_in_bbox(n.lat, n.lon) {
            self.g.add_vertex(n.id, n.lat, n.lon, n.tags.remove("name"));
            self.stats.vertices += 1;
        }
    }

    fn is_in_bbox(&self, lat: f64, lon: f64) -> bool {
        if self.ignore_bbox {
            return true;
        }
        let [min_lon, min_lat, max_lon, max_lat] = self.options.bbox;
        lat >= min_lat && lat <= max_lat && lon >= min_lon && lon <= max_lon
    }

    fn is_routable(&self, w: &model::Way) -> bool {
        w.tags
            .get("highway")
            .is_some_and(|h| self.options.highways.contains(&h.as_str()))
    }

    fn add_way(&mut self, w: model::Way) {
        if !self.is_routable(&w) {
            return;
        }

        let name = w.tags.get("name").cloned().unwrap_or_default();
        let max_speed = w.tags.get("maxspeed").cloned();

        for pair in w.nodes.windows(2) {
            match self
                .g
                .add_edge(w.id, name.as_str(), max_speed.clone(), pair[0], pair[1])
            {
                Ok(_) => self.stats.edges += 1,
                Err(e) => {
                    log::warn!(
                        "way {}: skipping segment {} - {}: {}",
                        w.id,
                        pair[0],
                        pair[1],
                        e
                    );
                    self.stats.skipped_edges += 1;
                }
            }
        }
    }
}
