// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use crate::{GeoGraph, GraphError};

/// Name used for ways without a name.
pub const UNKNOWN_ROAD: &str = "unknown road";

/// Maximum absolute bearing change (in degrees) still considered as going straight.
pub const STRAIGHT_DEGREES: f64 = 15.0;

/// Maximum absolute bearing change (in degrees) considered as a slight turn.
pub const SLIGHT_TURN_DEGREES: f64 = 30.0;

/// Maximum absolute bearing change (in degrees) considered as a regular turn.
/// Anything above is a sharp turn.
pub const SHARP_TURN_DEGREES: f64 = 100.0;

/// What to do at the beginning of a [NavigationDirection].
///
/// Turns are classified by the change of bearing between consecutive segments,
/// with positive changes turning right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// First instruction of every route.
    Start,

    /// Bearing change of at most [STRAIGHT_DEGREES] either way.
    Straight,

    /// Left by more than [STRAIGHT_DEGREES], up to [SLIGHT_TURN_DEGREES].
    SlightLeft,

    /// Right by more than [STRAIGHT_DEGREES], up to [SLIGHT_TURN_DEGREES].
    SlightRight,

    /// Left by more than [SLIGHT_TURN_DEGREES], up to [SHARP_TURN_DEGREES].
    Left,

    /// Right by more than [SLIGHT_TURN_DEGREES], up to [SHARP_TURN_DEGREES].
    Right,

    /// Left by more than [SHARP_TURN_DEGREES].
    SharpLeft,

    /// Right by more than [SHARP_TURN_DEGREES].
    SharpRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Self::Start,
        Self::Straight,
        Self::SlightLeft,
        Self::SlightRight,
        Self::Left,
        Self::Right,
        Self::SharpLeft,
        Self::SharpRight,
    ];

    /// Human-readable label, as used in the text form of [NavigationDirection].
    pub fn label(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Straight => "Go straight",
            Self::SlightLeft => "Slight left",
            Self::SlightRight => "Slight right",
            Self::Left => "Turn left",
            Self::Right => "Turn right",
            Self::SharpLeft => "Sharp left",
            Self::SharpRight => "Sharp right",
        }
    }

    /// Inverse of [Direction::label].
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }

    /// Classifies a change of bearing (in degrees, positive to the right).
    /// The change is first normalized into (-180°, 180°].
    ///
    /// Never returns [Direction::Start].
    pub fn from_bearing_change(delta: f64) -> Self {
        let delta = normalize_degrees(delta);
        let magnitude = delta.abs();

        let (left, right) = if magnitude <= STRAIGHT_DEGREES {
            return Self::Straight;
        } else if magnitude <= SLIGHT_TURN_DEGREES {
            (Self::SlightLeft, Self::SlightRight)
        } else if magnitude <= SHARP_TURN_DEGREES {
            (Self::Left, Self::Right)
        } else {
            (Self::SharpLeft, Self::SharpRight)
        };

        if delta > 0.0 {
            right
        } else {
            left
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn normalize_degrees(delta: f64) -> f64 {
    let d = delta.rem_euclid(360.0);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// A single turn-by-turn instruction: a [Direction] to take onto a way,
/// and the distance (in miles) to follow that way for.
///
/// The text form is `"<label> on <way> and continue for <distance> miles."`,
/// with the distance rounded to 3 decimal places. Two instructions are equal
/// if their directions, ways and distances (at that precision) are equal.
#[derive(Debug, Clone)]
pub struct NavigationDirection {
    pub direction: Direction,
    pub way: String,
    pub distance: f64,
}

impl NavigationDirection {
    pub fn new(direction: Direction, way: impl Into<String>, distance: f64) -> Self {
        Self {
            direction,
            way: way.into(),
            distance,
        }
    }

    /// Parses the text form of an instruction. Returns `None` if the text doesn't
    /// follow the expected format or uses an unknown direction label.
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl Default for NavigationDirection {
    fn default() -> Self {
        Self::new(Direction::Straight, UNKNOWN_ROAD, 0.0)
    }
}

impl fmt::Display for NavigationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} and continue for {:.3} miles.",
            self.direction, self.way, self.distance
        )
    }
}

impl PartialEq for NavigationDirection {
    fn eq(&self, other: &Self) -> bool {
        self.direction == other.direction
            && self.way == other.way
            && format!("{:.3}", self.distance) == format!("{:.3}", other.distance)
    }
}

/// Text that isn't a valid [NavigationDirection].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unparsable navigation direction: {0:?}")]
pub struct UnparsableInstruction(pub String);

impl FromStr for NavigationDirection {
    type Err = UnparsableInstruction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_instruction(s).ok_or_else(|| UnparsableInstruction(s.to_string()))
    }
}

const ON: &str = " on ";
const CONTINUE_FOR: &str = " and continue for ";
const MILES: &str = " miles.";

fn is_label_text(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace())
}

fn is_way_text(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c.is_ascii_whitespace())
}

fn parse_instruction(s: &str) -> Option<NavigationDirection> {
    let rest = s.strip_suffix(MILES)?;

    // The distance can't contain spaces, so it follows the last " and continue for "
    let (head, distance) = rest.rsplit_once(CONTINUE_FOR)?;
    if distance.is_empty() || !distance.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let distance: f64 = distance.parse().ok()?;

    // Split at the last " on " which leaves a valid label before it.
    // Occurrences may overlap ("Start on on Oxford Street").
    let (label, way) = head
        .char_indices()
        .filter(|&(idx, _)| head[idx..].starts_with(ON))
        .map(|(idx, _)| (&head[..idx], &head[idx + ON.len()..]))
        .filter(|(label, way)| is_label_text(label) && is_way_text(way))
        .last()?;

    let direction = Direction::from_label(label)?;
    Some(NavigationDirection::new(direction, way, distance))
}

/// A single edge of a route: initial bearing, way name and length.
struct Segment<'a> {
    bearing: f64,
    way: &'a str,
    distance: f64,
}

fn segment<'a>(g: &'a GeoGraph, from: i64, to: i64) -> Result<Segment<'a>, GraphError> {
    let bearing = g.bearing(from, to)?;
    match g.edge_between(from, to) {
        Some(edge) => Ok(Segment {
            bearing,
            way: if edge.name.is_empty() {
                UNKNOWN_ROAD
            } else {
                edge.name.as_str()
            },
            distance: edge.distance,
        }),
        None => Ok(Segment {
            bearing,
            way: UNKNOWN_ROAD,
            distance: g.distance(from, to)?,
        }),
    }
}

/// Converts a route (as returned by [shortest_path](crate::shortest_path)) into
/// turn-by-turn instructions.
///
/// The first instruction always uses [Direction::Start]. Every following segment is
/// classified with [Direction::from_bearing_change] against the previous segment;
/// segments going straight along the same way are merged into a single instruction,
/// while turns and changes of the way start a new one.
///
/// Routes with less than 2 vertices produce no instructions.
pub fn route_directions(
    g: &GeoGraph,
    route: &[i64],
) -> Result<Vec<NavigationDirection>, GraphError> {
    let mut directions = Vec::default();
    let mut segments = route.windows(2).map(|pair| segment(g, pair[0], pair[1]));

    let first = match segments.next() {
        Some(s) => s?,
        None => return Ok(directions),
    };
    let mut current = NavigationDirection::new(Direction::Start, first.way, first.distance);
    let mut previous_bearing = first.bearing;

    for s in segments {
        let s = s?;
        let direction = Direction::from_bearing_change(s.bearing - previous_bearing);
        previous_bearing = s.bearing;

        if direction == Direction::Straight && s.way == current.way {
            current.distance += s.distance;
        } else {
            directions.push(current);
            current = NavigationDirection::new(direction, s.way, s.distance);
        }
    }

    directions.push(current);
    Ok(directions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_bearing_changes() {
        assert_eq!(Direction::from_bearing_change(0.0), Direction::Straight);
        assert_eq!(Direction::from_bearing_change(-15.0), Direction::Straight);
        assert_eq!(Direction::from_bearing_change(20.0), Direction::SlightRight);
        assert_eq!(Direction::from_bearing_change(-30.0), Direction::SlightLeft);
        assert_eq!(Direction::from_bearing_change(90.0), Direction::Right);
        assert_eq!(Direction::from_bearing_change(-45.0), Direction::Left);
        assert_eq!(Direction::from_bearing_change(150.0), Direction::SharpRight);
        assert_eq!(Direction::from_bearing_change(-120.0), Direction::SharpLeft);

        // Wrapping around ±180°
        assert_eq!(Direction::from_bearing_change(350.0), Direction::Straight);
        assert_eq!(Direction::from_bearing_change(-270.0), Direction::Right);
        assert_eq!(Direction::from_bearing_change(170.0 - -170.0), Direction::SlightLeft);
    }

    #[test]
    fn labels_round_trip() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_label(d.label()), Some(d));
        }
        assert_eq!(Direction::from_label("Turn around"), None);
    }

    #[test]
    fn format_direction() {
        let d = NavigationDirection::new(Direction::SlightLeft, "Shattuck Avenue", 0.12345);
        assert_eq!(
            d.to_string(),
            "Slight left on Shattuck Avenue and continue for 0.123 miles."
        );
        assert_eq!(
            NavigationDirection::default().to_string(),
            "Go straight on unknown road and continue for 0.000 miles."
        );
    }

    #[test]
    fn parse_direction() {
        assert_eq!(
            NavigationDirection::parse("Turn right on Bancroft Way and continue for 1.5 miles."),
            Some(NavigationDirection::new(Direction::Right, "Bancroft Way", 1.5))
        );
        assert_eq!(
            NavigationDirection::parse("Start on  and continue for 0.000 miles."),
            Some(NavigationDirection::new(Direction::Start, "", 0.0))
        );
        assert_eq!(
            NavigationDirection::parse("Sharp left on I_80 on ramp and continue for 2 miles."),
            Some(NavigationDirection::new(Direction::SharpLeft, "I_80 on ramp", 2.0))
        );
    }

    #[test]
    fn parse_invalid_direction() {
        for s in [
            "",
            "Start on Telegraph Avenue",
            "Turn around on Telegraph Avenue and continue for 1.000 miles.",
            "Start on Telegraph Avenue and continue for 1.000 miles",
            "Start on Telegraph Avenue and continue for 1.0.0 miles.",
            "Start on Telegraph Avenue and continue for -1.000 miles.",
            "Start on Telegraph Avenue and continue for . miles.",
            "Start on Telegraph Ave. and continue for 1.000 miles.",
            "Start on on Telegraph Avenue and continue for 1.000 miles.",
            "Go straight on Telegraph Avenue and continue for 1.000 miles. ",
        ] {
            assert_eq!(NavigationDirection::parse(s), None, "{:?}", s);
        }

        let err = "Go nowhere".parse::<NavigationDirection>().unwrap_err();
        assert_eq!(err, UnparsableInstruction("Go nowhere".to_string()));
    }

    #[test]
    fn parse_format_round_trip() {
        for d in Direction::ALL {
            for (way, distance) in [
                ("unknown road", 0.0),
                ("College Avenue", 0.1234567),
                ("CA_13", 12.0005),
                ("Route 24", 1e-4),
            ] {
                let original = NavigationDirection::new(d, way, distance);
                let parsed = NavigationDirection::parse(&original.to_string());
                assert_eq!(parsed, Some(original));
            }
        }
    }

    #[test]
    fn equality_ignores_digits_past_precision() {
        let a = NavigationDirection::new(Direction::Left, "Hearst Avenue", 0.50001);
        let b = NavigationDirection::new(Direction::Left, "Hearst Avenue", 0.49999);
        let c = NavigationDirection::new(Direction::Right, "Hearst Avenue", 0.5);
        let d = NavigationDirection::new(Direction::Left, "Hearst Ave", 0.5);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    /// Positions are given as (lat, lon). Most segments are about 0.69 miles long.
    ///
    /// ```text
    ///          5
    ///          │ Euclid
    ///  1───2───3  Hearst
    ///          │ Euclid
    ///          4──6 Ridge
    ///              ╲___
    ///                  7 Ridge
    /// ```
    fn street_graph() -> GeoGraph {
        let mut g = GeoGraph::new();
        for (id, lat, lon) in [
            (1, 0.0, 0.00),
            (2, 0.0, 0.01),
            (3, 0.0, 0.02),
            (4, -0.01, 0.02),
            (5, 0.01, 0.02),
            (6, -0.01, 0.03),
            (7, -0.021, 0.06),
        ] {
            g.add_vertex(id, lat, lon, None);
        }
        g.add_edge(1, "Hearst", None, 1, 2).unwrap();
        g.add_edge(2, "Hearst", None, 2, 3).unwrap();
        g.add_edge(3, "Euclid", None, 3, 4).unwrap();
        g.add_edge(4, "Euclid", None, 3, 5).unwrap();
        g.add_edge(5, "Ridge", None, 4, 6).unwrap();
        g.add_edge(6, "Ridge", None, 6, 7).unwrap();
        g
    }

    #[test]
    fn directions_along_route() {
        let g = street_graph();
        let hearst = g.distance(1, 2).unwrap() + g.distance(2, 3).unwrap();
        let euclid = g.distance(3, 4).unwrap();
        let ridge = g.distance(4, 6).unwrap();
        let ridge_diagonal = g.distance(6, 7).unwrap();

        let directions = route_directions(&g, &[1, 2, 3, 4, 6, 7]).unwrap();
        assert_eq!(
            directions,
            vec![
                NavigationDirection::new(Direction::Start, "Hearst", hearst),
                NavigationDirection::new(Direction::Right, "Euclid", euclid),
                NavigationDirection::new(Direction::Left, "Ridge", ridge),
                NavigationDirection::new(Direction::SlightRight, "Ridge", ridge_diagonal),
            ]
        );
        assert_eq!(
            directions[1].to_string(),
            format!("Turn right on Euclid and continue for {:.3} miles.", euclid)
        );
    }

    #[test]
    fn straight_change_of_way() {
        let mut g = street_graph();
        g.add_vertex(8, -0.02, 0.02, None);
        g.add_edge(7, "", None, 4, 8).unwrap();

        let directions = route_directions(&g, &[5, 3, 4, 8]).unwrap();
        assert_eq!(
            directions,
            vec![
                NavigationDirection::new(
                    Direction::Start,
                    "Euclid",
                    g.distance(5, 3).unwrap() + g.distance(3, 4).unwrap()
                ),
                NavigationDirection::new(Direction::Straight, UNKNOWN_ROAD, g.distance(4, 8).unwrap()),
            ]
        );
    }

    #[test]
    fn sharp_turn_back() {
        let g = street_graph();
        let directions = route_directions(&g, &[2, 3, 5, 3]).unwrap();
        let directions: Vec<Direction> = directions.iter().map(|d| d.direction).collect();
        assert_eq!(
            directions,
            vec![Direction::Start, Direction::Left, Direction::SharpRight]
        );
    }

    #[test]
    fn trivial_routes() {
        let g = street_graph();
        assert_eq!(route_directions(&g, &[]), Ok(vec![]));
        assert_eq!(route_directions(&g, &[3]), Ok(vec![]));
        assert_eq!(
            route_directions(&g, &[1, 2]),
            Ok(vec![NavigationDirection::new(
                Direction::Start,
                "Hearst",
                g.distance(1, 2).unwrap()
            )])
        );
        assert_eq!(
            route_directions(&g, &[1, 42]),
            Err(GraphError::UnknownVertex(42))
        );
    }

    #[test]
    fn missing_edge_falls_back_to_straight_line() {
        let g = street_graph();
        let directions = route_directions(&g, &[1, 5]).unwrap();
        assert_eq!(
            directions,
            vec![NavigationDirection::new(
                Direction::Start,
                UNKNOWN_ROAD,
                g.distance(1, 5).unwrap()
            )]
        );
    }
}
