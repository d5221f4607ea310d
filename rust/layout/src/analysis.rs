// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-by-floor room extraction.
//!
//! Records are named in reports by [`StructuralRecord::report_index`]: their
//! position in the loaded document, or in the analyzer's input slice for
//! records built in code.

use std::collections::BTreeSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::cycles::{fundamental_cycles, Cycle};
use crate::error::{Error, Result};
use crate::graph::LayoutGraph;
use crate::projector::project;
use crate::record::StructuralRecord;
use crate::summary::StructureSummary;
use crate::types::{FloorReport, Room, Segment, SkippedRecord};

/// Everything extracted from one record set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutReport {
    pub config: AnalysisConfig,
    pub summary: StructureSummary,
    pub floors: Vec<FloorReport>,
    /// Walls whose elevation places them on no floor
    pub unplaced: Vec<SkippedRecord>,
}

impl LayoutReport {
    pub fn room_count(&self) -> usize {
        self.floors.iter().map(FloorReport::room_count).sum()
    }
}

/// Runs the projection → graph → cycle pipeline under one configuration.
#[derive(Debug, Clone, Default)]
pub struct LayoutAnalyzer {
    config: AnalysisConfig,
}

impl LayoutAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Sorted distinct floors holding at least one wall.
    pub fn occupied_floors(&self, records: &[StructuralRecord]) -> Vec<i32> {
        records
            .iter()
            .filter(|r| r.category.is_wall())
            .filter_map(|r| self.config.checked_floor_of(r.translation.z))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Walls that belong to no floor: non-finite elevation, or a floor index
    /// out of range. These never appear in a [`FloorReport`].
    pub fn unplaced_walls(&self, records: &[StructuralRecord]) -> Vec<SkippedRecord> {
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                r.category.is_wall() && self.config.checked_floor_of(r.translation.z).is_none()
            })
            .map(|(position, record)| {
                let index = record.report_index(position);
                let err = Error::MalformedRecord {
                    index,
                    reason: format!("elevation {} lies on no floor", record.translation.z),
                };
                tracing::warn!(index, error = %err, "Wall cannot be placed on a floor");
                SkippedRecord::from_error(index, Some(record.class_path.clone()), &err)
            })
            .collect()
    }

    /// Projects the walls of one floor.
    ///
    /// Returns the segments, the number of walls on the floor, and the walls
    /// that could not be projected. A double wall contributes two segments.
    pub fn project_floor(
        &self,
        records: &[StructuralRecord],
        floor: i32,
    ) -> (Vec<Segment>, usize, Vec<SkippedRecord>) {
        let mut segments = Vec::new();
        let mut skipped = Vec::new();
        let mut wall_count = 0;

        for (position, record) in records.iter().enumerate() {
            if !record.category.is_wall()
                || self.config.checked_floor_of(record.translation.z) != Some(floor)
            {
                continue;
            }
            wall_count += 1;

            let index = record.report_index(position);
            match project(record, index, &self.config) {
                Ok(projected) => segments.extend(projected),
                Err(err) => {
                    tracing::warn!(floor, index, error = %err, "Skipping wall");
                    skipped.push(SkippedRecord::from_error(
                        index,
                        Some(record.class_path.clone()),
                        &err,
                    ));
                }
            }
        }

        (segments, wall_count, skipped)
    }

    /// Extracts the rooms of one floor.
    ///
    /// A floor without walls is not an error; it yields an empty report.
    pub fn analyze_floor(&self, records: &[StructuralRecord], floor: i32) -> Result<FloorReport> {
        let (segments, wall_count, skipped) = self.project_floor(records, floor);
        let graph = LayoutGraph::build(&segments)?;
        let cycles = fundamental_cycles(&graph);

        let rooms: Vec<Room> = cycles
            .iter()
            .map(|cycle| self.room_from_cycle(&graph, cycle))
            .collect();

        let report = FloorReport {
            floor,
            wall_count,
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            component_count: graph.component_count(),
            dangling_count: graph.dangling_nodes().len(),
            rooms,
            skipped,
        };

        tracing::debug!(
            floor,
            walls = report.wall_count,
            nodes = report.node_count,
            edges = report.edge_count,
            rooms = report.room_count(),
            skipped = report.skipped.len(),
            "Analyzed floor"
        );
        Ok(report)
    }

    /// Analyzes several floors in parallel. Results follow `floors` order.
    pub fn analyze_floors(
        &self,
        records: &[StructuralRecord],
        floors: &[i32],
    ) -> Result<Vec<FloorReport>> {
        floors
            .par_iter()
            .map(|&floor| self.analyze_floor(records, floor))
            .collect()
    }

    /// Summary plus every occupied floor (floor 0 when no walls exist).
    pub fn analyze(&self, records: &[StructuralRecord]) -> Result<LayoutReport> {
        let mut floors = self.occupied_floors(records);
        if floors.is_empty() {
            floors.push(0);
        }

        let report = LayoutReport {
            config: self.config,
            summary: StructureSummary::from_records(records),
            floors: self.analyze_floors(records, &floors)?,
            unplaced: self.unplaced_walls(records),
        };

        tracing::info!(
            records = records.len(),
            floors = report.floors.len(),
            unplaced = report.unplaced.len(),
            rooms = report.room_count(),
            "Layout analysis complete"
        );
        Ok(report)
    }

    fn room_from_cycle(&self, graph: &LayoutGraph, cycle: &Cycle) -> Room {
        let vertices: Vec<_> = cycle
            .vertices
            .iter()
            .map(|p| p.to_world(self.config.precision))
            .collect();
        let mut wall_records: Vec<usize> = cycle
            .edges
            .iter()
            .map(|&e| graph.edges[e].record_index)
            .collect();
        wall_records.sort_unstable();
        wall_records.dedup();

        Room {
            area: Room::calculate_area(&vertices),
            centroid: Room::calculate_centroid(&vertices),
            vertices,
            wall_records,
        }
    }
}

/// Extracts the rooms of one floor with the given configuration.
pub fn detect_rooms(
    records: &[StructuralRecord],
    floor: i32,
    config: &AnalysisConfig,
) -> Result<FloorReport> {
    LayoutAnalyzer::new(*config)?.analyze_floor(records, floor)
}

/// Returns the raw fundamental cycles of one floor's wall graph.
pub fn detect_wall_cycles(
    records: &[StructuralRecord],
    floor: i32,
    config: &AnalysisConfig,
) -> Result<Vec<Cycle>> {
    let analyzer = LayoutAnalyzer::new(*config)?;
    let (segments, _, _) = analyzer.project_floor(records, floor);
    let graph = LayoutGraph::build(&segments)?;
    Ok(fundamental_cycles(&graph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Rotation, Translation};
    use crate::types::SkipKind;

    fn wall(x: f64, y: f64, z: f64, yaw: f64) -> StructuralRecord {
        StructuralRecord::new("Wall", Translation::new(x, y, z), Rotation::from_yaw(yaw))
    }

    fn square_walls(ox: f64, oy: f64, z: f64) -> Vec<StructuralRecord> {
        vec![
            wall(ox + 50.0, oy, z, -90.0),
            wall(ox + 100.0, oy + 50.0, z, 0.0),
            wall(ox + 50.0, oy + 100.0, z, 90.0),
            wall(ox, oy + 50.0, z, 180.0),
        ]
    }

    #[test]
    fn square_room_on_ground_floor() {
        let records = square_walls(0.0, 0.0, 160.0);
        let report = LayoutAnalyzer::default().analyze_floor(&records, 0).unwrap();

        assert_eq!(report.wall_count, 4);
        assert_eq!(report.room_count(), 1);
        let room = &report.rooms[0];
        assert_eq!(room.vertices.len(), 4);
        assert!((room.area - 10_000.0).abs() < 1e-9);
        assert!((room.centroid.x - 50.0).abs() < 1e-9);
        assert!((room.centroid.y - 50.0).abs() < 1e-9);
        assert_eq!(room.wall_records, vec![0, 1, 2, 3]);
    }

    #[test]
    fn walls_on_other_floors_are_ignored() {
        let mut records = square_walls(0.0, 0.0, 160.0);
        records.extend(square_walls(0.0, 0.0, 460.0));
        records.pop();

        let analyzer = LayoutAnalyzer::default();
        assert_eq!(analyzer.occupied_floors(&records), vec![0, 1]);

        let ground = analyzer.analyze_floor(&records, 0).unwrap();
        assert_eq!(ground.room_count(), 1);
        let first = analyzer.analyze_floor(&records, 1).unwrap();
        assert_eq!(first.wall_count, 3);
        assert_eq!(first.room_count(), 0);
    }

    #[test]
    fn empty_floor_is_not_an_error() {
        let records = square_walls(0.0, 0.0, 160.0);
        let report = LayoutAnalyzer::default().analyze_floor(&records, 4).unwrap();
        assert!(report.is_empty_floor());
        assert!(report.rooms.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn degenerate_walls_are_reported_not_graphed() {
        let config = AnalysisConfig {
            extend: 0.2,
            ..Default::default()
        };
        let records = vec![wall(10.0, 10.0, 160.0, 0.0)];
        let report = detect_rooms(&records, 0, &config).unwrap();
        assert_eq!(report.wall_count, 1);
        assert_eq!(report.edge_count, 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].kind, SkipKind::DegenerateSegment);
        assert_eq!(report.skipped[0].index, 0);
    }

    #[test]
    fn unplaceable_walls_are_reported_once() {
        let mut records = square_walls(0.0, 0.0, 160.0);
        records.extend(square_walls(0.0, 0.0, 460.0));
        records.push(wall(0.0, 0.0, f64::NAN, 0.0));
        records.push(wall(0.0, 0.0, 1e15, 0.0));
        let analyzer = LayoutAnalyzer::default();
        assert_eq!(analyzer.occupied_floors(&records), vec![0, 1]);

        let report = analyzer.analyze(&records).unwrap();
        assert!(report.floors.iter().all(|f| f.skipped.is_empty()));
        assert!(report.floors.iter().all(|f| f.wall_count == 4));
        assert_eq!(report.room_count(), 2);

        let indices: Vec<usize> = report.unplaced.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![8, 9]);
        assert!(report
            .unplaced
            .iter()
            .all(|s| s.kind == SkipKind::MalformedRecord));
    }

    #[test]
    fn double_walls_enclose_a_room() {
        let double = |x: f64, y: f64, yaw: f64| {
            StructuralRecord::new(
                "DoubleWall",
                Translation::new(x, y, 160.0),
                Rotation::from_yaw(yaw),
            )
        };
        let records = vec![
            double(100.0, 0.0, -90.0),
            double(200.0, 100.0, 0.0),
            double(100.0, 200.0, 90.0),
            double(0.0, 100.0, 180.0),
        ];
        let report = LayoutAnalyzer::default().analyze_floor(&records, 0).unwrap();

        assert_eq!(report.wall_count, 4);
        assert_eq!(report.node_count, 8);
        assert_eq!(report.edge_count, 8);
        assert_eq!(report.dangling_count, 0);
        assert_eq!(report.room_count(), 1);
        assert!((report.rooms[0].area - 40_000.0).abs() < 1e-9);
        assert_eq!(report.rooms[0].wall_records, vec![0, 1, 2, 3]);
    }

    #[test]
    fn wall_meets_double_wall_at_its_middle() {
        let records = vec![
            StructuralRecord::new(
                "DoubleWall",
                Translation::new(100.0, 0.0, 160.0),
                Rotation::from_yaw(-90.0),
            ),
            wall(100.0, 50.0, 160.0, 0.0),
        ];
        let report = LayoutAnalyzer::default().analyze_floor(&records, 0).unwrap();
        assert_eq!(report.node_count, 4);
        assert_eq!(report.component_count, 1);
        assert_eq!(report.dangling_count, 3);
    }

    #[test]
    fn parallel_floors_keep_requested_order() {
        let mut records = square_walls(0.0, 0.0, 160.0);
        records.extend(square_walls(0.0, 0.0, 760.0));
        let reports = LayoutAnalyzer::default()
            .analyze_floors(&records, &[2, 0, 1])
            .unwrap();
        let floors: Vec<i32> = reports.iter().map(|r| r.floor).collect();
        assert_eq!(floors, vec![2, 0, 1]);
        assert_eq!(reports[0].room_count(), 1);
        assert_eq!(reports[1].room_count(), 1);
        assert_eq!(reports[2].room_count(), 0);
    }

    #[test]
    fn analyze_without_walls_reports_ground_floor() {
        let records = vec![StructuralRecord::new(
            "Foundation",
            Translation::new(0.0, 0.0, 10.0),
            Rotation::from_yaw(0.0),
        )];
        let report = LayoutAnalyzer::default().analyze(&records).unwrap();
        assert_eq!(report.floors.len(), 1);
        assert_eq!(report.floors[0].floor, 0);
        assert_eq!(report.summary.foundation_count, 1);
        assert_eq!(report.room_count(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = AnalysisConfig {
            floor_height: -3.0,
            ..Default::default()
        };
        assert!(matches!(LayoutAnalyzer::new(config), Err(Error::InvalidConfig(_))));
        assert!(detect_wall_cycles(&[], 0, &config).is_err());
    }
}
