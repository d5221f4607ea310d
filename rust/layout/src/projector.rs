// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall projection onto the floor plane.
//!
//! A wall record stores its center and the yaw of its face normal. The wall
//! itself runs perpendicular to that normal, so the extension direction is
//! the yaw rotated by +90°. The projected segment reaches `extend` world
//! units either side of the center along that direction.
//!
//! A double wall is twice as long as a wall. It reaches `2 * extend` and is
//! split at its center into two segments, so a wall meeting it midway still
//! shares a node with it.

use nalgebra::{Point2, Rotation2, Vector2};

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::record::{StructuralRecord, StructureCategory};
use crate::types::{Point2D, Segment};

/// Unit vector along which a wall with the given yaw extends.
pub fn extension_direction(yaw_degrees: f64) -> Vector2<f64> {
    Rotation2::new((yaw_degrees + 90.0).to_radians()) * Vector2::x()
}

/// Distance a record reaches either side of its center.
pub fn half_length(category: StructureCategory, config: &AnalysisConfig) -> f64 {
    match category {
        StructureCategory::DoubleWall => 2.0 * config.extend,
        _ => config.extend,
    }
}

/// Projects a wall record into quantized segments.
///
/// Callers filter by category and floor first; this only does the geometry.
/// A wall yields one segment and a double wall two, joined at its center.
/// Fails with `MalformedRecord` for non-finite input or endpoints outside the
/// tick range, and with `DegenerateSegment` when endpoints quantize to one
/// point.
pub fn project(
    record: &StructuralRecord,
    index: usize,
    config: &AnalysisConfig,
) -> Result<Vec<Segment>> {
    if !record.is_finite() {
        return Err(Error::MalformedRecord {
            index,
            reason: "translation or yaw is not finite".into(),
        });
    }

    let center = Point2::new(record.translation.x, record.translation.y);
    let offset = extension_direction(record.rotation.yaw) * half_length(record.category, config);
    let quantize = |p: Point2<f64>| {
        Point2D::quantize(p.x, p.y, config.precision).ok_or_else(|| Error::MalformedRecord {
            index,
            reason: format!("endpoint ({}, {}) is outside the coordinate range", p.x, p.y),
        })
    };

    let start = quantize(center - offset)?;
    let end = quantize(center + offset)?;

    if record.category == StructureCategory::DoubleWall {
        let middle = quantize(center)?;
        Ok(vec![
            Segment::new(start, middle, index)?,
            Segment::new(middle, end, index)?,
        ])
    } else {
        Ok(vec![Segment::new(start, end, index)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Rotation, Translation};
    use approx::assert_relative_eq;

    fn wall(x: f64, y: f64, yaw: f64) -> StructuralRecord {
        StructuralRecord::new("Wall", Translation::new(x, y, 160.0), Rotation::from_yaw(yaw))
    }

    #[test]
    fn direction_is_perpendicular_to_yaw() {
        let d = extension_direction(0.0);
        assert_relative_eq!(d.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(d.y, 1.0, epsilon = 1e-12);

        let d = extension_direction(-90.0);
        assert_relative_eq!(d.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.y, 0.0, epsilon = 1e-12);

        let d = extension_direction(45.0);
        assert_relative_eq!(d.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(d.x, -d.y, epsilon = 1e-12);
    }

    #[test]
    fn projects_symmetrically_about_center() {
        let config = AnalysisConfig::default();
        let segment = project(&wall(50.0, 0.0, -90.0), 3, &config).unwrap()[0];
        assert_eq!(segment.start(), Point2D::new(0, 0));
        assert_eq!(segment.end(), Point2D::new(100, 0));
        assert_eq!(segment.record_index, 3);

        let segment = project(&wall(100.0, 50.0, 0.0), 0, &config).unwrap()[0];
        assert_eq!(segment.start(), Point2D::new(100, 0));
        assert_eq!(segment.end(), Point2D::new(100, 100));
    }

    #[test]
    fn opposite_facing_collinear_walls_share_endpoint() {
        let config = AnalysisConfig::default();
        let a = project(&wall(50.0, 0.0, -90.0), 0, &config).unwrap()[0];
        let b = project(&wall(150.0, 0.0, 90.0), 1, &config).unwrap()[0];
        assert_eq!(a.end(), b.start());
        assert_eq!(b.end(), Point2D::new(200, 0));
    }

    #[test]
    fn decimal_precision_keeps_fractional_endpoints() {
        let config = AnalysisConfig {
            extend: 0.25,
            precision: 2,
            ..Default::default()
        };
        let segment = project(&wall(1.0, 1.0, -90.0), 0, &config).unwrap()[0];
        assert_eq!(segment.start(), Point2D::new(75, 100));
        assert_eq!(segment.end(), Point2D::new(125, 100));
    }

    #[test]
    fn double_wall_reaches_twice_as_far_and_splits_at_center() {
        let config = AnalysisConfig::default();
        let record = StructuralRecord::new(
            "DoubleWall",
            Translation::new(100.0, 0.0, 160.0),
            Rotation::from_yaw(-90.0),
        );
        let segments = project(&record, 2, &config).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start(), Point2D::new(0, 0));
        assert_eq!(segments[0].end(), Point2D::new(100, 0));
        assert_eq!(segments[1].start(), Point2D::new(100, 0));
        assert_eq!(segments[1].end(), Point2D::new(200, 0));
        assert!(segments.iter().all(|s| s.record_index == 2));
    }

    #[test]
    fn far_away_wall_is_malformed_not_clamped() {
        let config = AnalysisConfig {
            precision: 6,
            ..Default::default()
        };
        let err = project(&wall(5e13, 0.0, 0.0), 4, &config).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { index: 4, .. }));
    }

    #[test]
    fn tiny_extend_is_degenerate() {
        let config = AnalysisConfig {
            extend: 0.1,
            ..Default::default()
        };
        let err = project(&wall(10.0, 10.0, 0.0), 5, &config).unwrap_err();
        assert!(matches!(err, Error::DegenerateSegment { index: 5, .. }));
    }

    #[test]
    fn non_finite_record_is_malformed() {
        let config = AnalysisConfig::default();
        let err = project(&wall(f64::NAN, 0.0, 0.0), 1, &config).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { index: 1, .. }));
    }
}
