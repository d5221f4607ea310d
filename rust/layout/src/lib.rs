// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room detection from placed building structures
//!
//! This crate provides a pipeline for:
//! 1. Loading placed structure records (walls, foundations) from JSON
//! 2. Partitioning walls into floors by elevation
//! 3. Projecting each wall onto its floor plane as a quantized segment
//! 4. Building an undirected multigraph keyed by segment endpoints
//! 5. Reporting the graph's fundamental cycles as rooms
//!
//! Each floor is analyzed on its own; floors never connect to each other.
//!
//! # Usage
//!
//! ```rust,ignore
//! use building_layout::{load_records, AnalysisConfig, LayoutAnalyzer};
//!
//! let set = load_records(&json)?;
//! let analyzer = LayoutAnalyzer::new(AnalysisConfig::default())?;
//! let ground = analyzer.analyze_floor(&set.records, 0)?;
//! println!("{} rooms", ground.room_count());
//! ```

pub mod analysis;
pub mod config;
pub mod cycles;
pub mod error;
pub mod floor;
pub mod graph;
pub mod projector;
pub mod record;
pub mod summary;
pub mod types;

// Re-export commonly used types and functions
pub use analysis::{detect_rooms, detect_wall_cycles, LayoutAnalyzer, LayoutReport};
pub use config::AnalysisConfig;
pub use cycles::{fundamental_cycles, Cycle};
pub use error::{Error, Result};
pub use floor::{checked_floor_of, floor_of};
pub use graph::{GraphEdge, LayoutGraph};
pub use projector::{extension_direction, half_length, project};
pub use record::{
    load_records, load_records_from_path, RecordSet, Rotation, StructuralRecord,
    StructureCategory, Translation,
};
pub use summary::{BlueprintCount, StructureSummary};
pub use types::{
    FloorReport, Point2D, Room, Segment, SkipKind, SkippedRecord, WorldPoint, MAX_PRECISION,
};
