// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for layout extraction

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest supported number of decimal places for quantization.
pub const MAX_PRECISION: u32 = 6;

/// A quantized 2D point on a floor plane.
///
/// Coordinates are fixed-point ticks: `x = round(world_x * 10^precision)`.
/// Equality, ordering and hashing all work on the ticks, so two wall endpoints
/// that land on the same tick are the same graph node. Ordering is
/// lexicographic on `(x, y)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point2D {
    pub x: i64,
    pub y: i64,
}

impl Point2D {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Rounds world coordinates (half away from zero) onto the tick grid.
    ///
    /// Returns `None` when either coordinate is non-finite or its tick count
    /// does not fit in an `i64`.
    pub fn quantize(x: f64, y: f64, precision: u32) -> Option<Self> {
        let scale = tick_scale(precision);
        Some(Self {
            x: to_tick(x, scale)?,
            y: to_tick(y, scale)?,
        })
    }

    /// Converts ticks back into world units.
    pub fn to_world(&self, precision: u32) -> WorldPoint {
        let scale = tick_scale(precision);
        WorldPoint::new(self.x as f64 / scale, self.y as f64 / scale)
    }
}

impl fmt::Display for Point2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

fn tick_scale(precision: u32) -> f64 {
    10f64.powi(precision.min(MAX_PRECISION) as i32)
}

fn to_tick(value: f64, scale: f64) -> Option<i64> {
    let ticks = (value * scale).round();
    // 2^63 is exactly representable; anything strictly inside fits an i64.
    (ticks.is_finite() && ticks.abs() < i64::MAX as f64).then_some(ticks as i64)
}

/// A point in world units (dequantized, for reporting)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A projected wall: an unordered pair of distinct quantized endpoints.
///
/// Endpoints are stored in canonical order (`start < end`) so two walls
/// spanning the same pair of points compare equal up to `record_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Segment {
    start: Point2D,
    end: Point2D,
    /// Index of the wall record this segment was projected from
    pub record_index: usize,
}

impl Segment {
    /// Creates a segment, rejecting endpoints that coincide.
    pub fn new(a: Point2D, b: Point2D, record_index: usize) -> Result<Self> {
        if a == b {
            return Err(Error::DegenerateSegment {
                index: record_index,
                point: a,
            });
        }
        let (start, end) = if a < b { (a, b) } else { (b, a) };
        Ok(Self {
            start,
            end,
            record_index,
        })
    }

    pub fn start(&self) -> Point2D {
        self.start
    }

    pub fn end(&self) -> Point2D {
        self.end
    }
}

/// Why a record did not contribute to a floor graph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipKind {
    MalformedRecord,
    DegenerateSegment,
}

/// Diagnostic for a record that was skipped during loading or projection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub class_path: Option<String>,
    pub kind: SkipKind,
    pub message: String,
}

impl SkippedRecord {
    pub fn from_error(index: usize, class_path: Option<String>, error: &Error) -> Self {
        let kind = match error {
            Error::DegenerateSegment { .. } => SkipKind::DegenerateSegment,
            _ => SkipKind::MalformedRecord,
        };
        Self {
            index,
            class_path,
            kind,
            message: error.to_string(),
        }
    }
}

/// An enclosed region found on one floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Boundary walk in world units (closure implicit)
    pub vertices: Vec<WorldPoint>,
    /// Absolute polygon area in square world units
    pub area: f64,
    /// Vertex average, used as the label anchor
    pub centroid: WorldPoint,
    /// Indices of the wall records bounding this room
    pub wall_records: Vec<usize>,
}

impl Room {
    /// Calculate polygon area using shoelace formula
    pub fn calculate_area(points: &[WorldPoint]) -> f64 {
        let n = points.len();
        if n < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += points[i].x * points[j].y;
            area -= points[j].x * points[i].y;
        }

        (area / 2.0).abs()
    }

    pub fn calculate_centroid(points: &[WorldPoint]) -> WorldPoint {
        if points.is_empty() {
            return WorldPoint::new(0.0, 0.0);
        }
        let n = points.len() as f64;
        WorldPoint::new(
            points.iter().map(|p| p.x).sum::<f64>() / n,
            points.iter().map(|p| p.y).sum::<f64>() / n,
        )
    }
}

/// Rooms and diagnostics for a single floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorReport {
    pub floor: i32,
    /// Wall records whose elevation falls on this floor
    pub wall_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub component_count: usize,
    /// Wall ends not joined to any other wall
    pub dangling_count: usize,
    pub rooms: Vec<Room>,
    pub skipped: Vec<SkippedRecord>,
}

impl FloorReport {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// True when no wall on this floor made it into the graph.
    pub fn is_empty_floor(&self) -> bool {
        self.edge_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_merges_nearby_points() {
        let a = Point2D::quantize(100.0000001, -0.0000001, 0).unwrap();
        let b = Point2D::quantize(99.9999999, 0.0000002, 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, Point2D::new(100, 0));
    }

    #[test]
    fn quantize_with_decimals() {
        let p = Point2D::quantize(12.346, -7.891, 2).unwrap();
        assert_eq!(p, Point2D::new(1235, -789));
        let w = p.to_world(2);
        assert!((w.x - 12.35).abs() < 1e-9);
        assert!((w.y + 7.89).abs() < 1e-9);
    }

    #[test]
    fn quantize_rejects_out_of_range_ticks() {
        assert_eq!(Point2D::quantize(1e19, 0.0, 0), None);
        assert_eq!(Point2D::quantize(0.0, -1e13, 6), None);
        assert_eq!(Point2D::quantize(f64::INFINITY, 0.0, 0), None);
        assert_eq!(
            Point2D::quantize(1e12, -1e12, 6),
            Some(Point2D::new(1_000_000_000_000_000_000, -1_000_000_000_000_000_000))
        );
    }

    #[test]
    fn points_order_lexicographically() {
        let mut points = vec![
            Point2D::new(1, 0),
            Point2D::new(0, 5),
            Point2D::new(0, -1),
        ];
        points.sort();
        assert_eq!(
            points,
            vec![Point2D::new(0, -1), Point2D::new(0, 5), Point2D::new(1, 0)]
        );
    }

    #[test]
    fn segment_endpoints_are_canonical() {
        let a = Point2D::new(100, 0);
        let b = Point2D::new(0, 0);
        let s1 = Segment::new(a, b, 0).unwrap();
        let s2 = Segment::new(b, a, 1).unwrap();
        assert_eq!(s1.start(), b);
        assert_eq!(s1.end(), a);
        assert_eq!((s1.start(), s1.end()), (s2.start(), s2.end()));
        assert_ne!(s1, s2);
    }

    #[test]
    fn segment_rejects_coincident_endpoints() {
        let p = Point2D::new(3, 4);
        let err = Segment::new(p, p, 7).unwrap_err();
        assert!(matches!(err, Error::DegenerateSegment { index: 7, point } if point == p));
    }

    #[test]
    fn skipped_record_kind_follows_error() {
        let err = Error::DegenerateSegment {
            index: 2,
            point: Point2D::new(0, 0),
        };
        let skipped = SkippedRecord::from_error(2, Some("Wall".into()), &err);
        assert_eq!(skipped.kind, SkipKind::DegenerateSegment);

        let err = Error::MalformedRecord {
            index: 3,
            reason: "missing Rotation".into(),
        };
        let skipped = SkippedRecord::from_error(3, None, &err);
        assert_eq!(skipped.kind, SkipKind::MalformedRecord);
        assert!(skipped.message.contains("missing Rotation"));
    }

    #[test]
    fn room_area_and_centroid() {
        let square = vec![
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(10.0, 0.0),
            WorldPoint::new(10.0, 10.0),
            WorldPoint::new(0.0, 10.0),
        ];
        assert!((Room::calculate_area(&square) - 100.0).abs() < 0.001);
        let c = Room::calculate_centroid(&square);
        assert!((c.x - 5.0).abs() < 1e-12);
        assert!((c.y - 5.0).abs() < 1e-12);

        // Two-vertex loops (parallel walls) enclose nothing
        assert_eq!(Room::calculate_area(&square[..2]), 0.0);
    }
}
