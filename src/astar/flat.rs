// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::{earth_distance, AStarError, GeoGraph, SearchOptions, Vertex};

#[derive(Debug, Clone, Copy)]
struct FlatQueueItem {
    at: i64,
    cost: f64,
    score: f64,
}

impl PartialEq for FlatQueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for FlatQueueItem {}

impl PartialOrd for FlatQueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FlatQueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.score.total_cmp(&self.score)
    }
}

fn reconstruct_flat_path(came_from: &HashMap<i64, Option<i64>>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&Some(vertex)) = came_from.get(&last) {
        path.push(vertex);
        last = vertex;
    }

    path.reverse();
    return path;
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find the shortest route between two vertices in the provided graph.
/// The heuristic is the great-circle distance to the end vertex, which never
/// overestimates the remaining cost, as edge costs are great-circle distances themselves.
///
/// Returns an ordered list of vertex ids, from `from_id` to `to_id` (inclusive).
/// If there is no route between the two vertices, an empty vector is returned.
/// If `from_id == to_id`, the route consists of that single vertex.
///
/// `options.step_limit` limits how many vertices may be expanded during the search
/// before returning [AStarError::StepLimitExceeded]. Concluding that no route exists requires
/// expanding all vertices accessible from the start, which can be time-consuming on large
/// datasets. Setting [SearchOptions::cancel] aborts the search with [AStarError::Cancelled].
pub fn find_route(
    g: &GeoGraph,
    from_id: i64,
    to_id: i64,
    options: &SearchOptions<'_>,
) -> Result<Vec<i64>, AStarError> {
    let to = g
        .get_vertex(to_id)
        .ok_or(AStarError::InvalidReference(to_id))?;
    let (to_lat, to_lon) = (to.lat, to.lon);

    search(g, from_id, to_id, options, |v: &Vertex| {
        earth_distance(v.lat, v.lon, to_lat, to_lon)
    })
}

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find the shortest route between two vertices in the provided graph.
///
/// Behaves exactly like [find_route], except that the search is not directed
/// towards the end vertex, and therefore usually expands more vertices.
pub fn find_route_dijkstra(
    g: &GeoGraph,
    from_id: i64,
    to_id: i64,
    options: &SearchOptions<'_>,
) -> Result<Vec<i64>, AStarError> {
    g.get_vertex(to_id)
        .ok_or(AStarError::InvalidReference(to_id))?;

    search(g, from_id, to_id, options, |_: &Vertex| 0.0)
}

fn search<H: Fn(&Vertex) -> f64>(
    g: &GeoGraph,
    from_id: i64,
    to_id: i64,
    options: &SearchOptions<'_>,
    heuristic: H,
) -> Result<Vec<i64>, AStarError> {
    let mut queue: BinaryHeap<FlatQueueItem> = BinaryHeap::default();
    let mut visited: HashSet<i64> = HashSet::default();
    let mut came_from: HashMap<i64, Option<i64>> = HashMap::default();
    let mut known_costs: HashMap<i64, f64> = HashMap::default();
    let mut steps: usize = 0;

    {
        let from = g
            .get_vertex(from_id)
            .ok_or(AStarError::InvalidReference(from_id))?;

        queue.push(FlatQueueItem {
            at: from_id,
            cost: 0.0,
            score: heuristic(from),
        });
        came_from.insert(from_id, None);
        known_costs.insert(from_id, 0.0);
    }

    while let Some(item) = queue.pop() {
        // The queue may contain stale items for already-expanded vertices
        if !visited.insert(item.at) {
            continue;
        }

        if item.at == to_id {
            log::debug!(
                "route {} -> {} found after {} steps, cost {:.3}",
                from_id,
                to_id,
                steps,
                item.cost
            );
            return Ok(reconstruct_flat_path(&came_from, to_id));
        }

        steps += 1;
        if steps > options.step_limit {
            return Err(AStarError::StepLimitExceeded);
        }
        if options.is_cancelled() {
            return Err(AStarError::Cancelled);
        }

        for edge in g.incident_edges(item.at)? {
            let neighbor_id = match edge.other(item.at) {
                Some(id) => id,
                None => continue,
            };
            if visited.contains(&neighbor_id) {
                continue;
            }

            if let Some(neighbor) = g.get_vertex(neighbor_id) {
                // Check if this is the cheapest way to the neighbor
                let neighbor_cost = item.cost + edge.distance;
                if known_costs
                    .get(&neighbor_id)
                    .is_some_and(|&known| neighbor_cost >= known)
                {
                    continue;
                }

                // Push the new item into the queue
                came_from.insert(neighbor_id, Some(item.at));
                known_costs.insert(neighbor_id, neighbor_cost);
                queue.push(FlatQueueItem {
                    at: neighbor_id,
                    cost: neighbor_cost,
                    score: neighbor_cost + heuristic(neighbor),
                });
            }
        }
    }

    log::debug!(
        "no route {} -> {} after {} steps",
        from_id,
        to_id,
        steps
    );
    return Ok(vec![]);
}
