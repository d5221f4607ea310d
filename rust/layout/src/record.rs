// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural element records and their JSON loader.
//!
//! Records arrive as the JSON array written by the game's structure exporter:
//!
//! ```json
//! [
//!   {
//!     "ClassPath": "/Game/Blueprints/BP_OrionStructureWall.BP_OrionStructureWall_C",
//!     "Translation": { "X": 50.0, "Y": 0.0, "Z": 160.0 },
//!     "Rotation": { "Pitch": 0.0, "Yaw": -90.0, "Roll": 0.0 },
//!     "Scale": { "X": 1.0, "Y": 1.0, "Z": 1.0 }
//!   }
//! ]
//! ```
//!
//! Each array element is decoded on its own, so a malformed element is
//! reported as a [`SkippedRecord`] without aborting the rest of the load.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::SkippedRecord;

/// Structure kinds placed by the building system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StructureCategory {
    Wall,
    DoubleWall,
    SquareFoundation,
    TriangleFoundation,
    Other,
}

impl StructureCategory {
    /// Classifies a class path by exact match on its normalized class name.
    ///
    /// `/Game/BP/BP_OrionStructureWall.BP_OrionStructureWall_C` normalizes to
    /// `Wall`: last path segment, text after the last `.`, trailing `_C`
    /// removed, then optional `BP_` and `OrionStructure` prefixes removed.
    /// Names that merely contain a marker (`WallLamp`) are `Other`.
    pub fn from_class_path(class_path: &str) -> Self {
        match normalized_class_name(class_path) {
            "Wall" => Self::Wall,
            "DoubleWall" => Self::DoubleWall,
            "Foundation" | "SquareFoundation" | "BasicSquareFoundation" => Self::SquareFoundation,
            "TriangleFoundation" | "BasicTriangleFoundation" => Self::TriangleFoundation,
            _ => Self::Other,
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Self::Wall | Self::DoubleWall)
    }

    pub fn is_foundation(&self) -> bool {
        matches!(self, Self::SquareFoundation | Self::TriangleFoundation)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wall => "Wall",
            Self::DoubleWall => "DoubleWall",
            Self::SquareFoundation => "SquareFoundation",
            Self::TriangleFoundation => "TriangleFoundation",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for StructureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalized_class_name(class_path: &str) -> &str {
    let segment = class_path.rsplit('/').next().unwrap_or(class_path);
    let name = segment.rsplit('.').next().unwrap_or(segment);
    let name = name.strip_suffix("_C").unwrap_or(name);
    let name = name.strip_prefix("BP_").unwrap_or(name);
    name.strip_prefix("OrionStructure").unwrap_or(name)
}

/// World-space location of a record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Translation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Translation {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Rotation in degrees. Only yaw takes part in projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rotation {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Rotation {
    pub fn from_yaw(yaw: f64) -> Self {
        Self {
            yaw,
            ..Default::default()
        }
    }
}

/// A placed structural element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StructuralRecord {
    pub class_path: String,
    pub category: StructureCategory,
    pub translation: Translation,
    pub rotation: Rotation,
    /// Position of the element in the document it was loaded from.
    /// `None` for records built in code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_index: Option<usize>,
}

impl StructuralRecord {
    pub fn new(class_path: impl Into<String>, translation: Translation, rotation: Rotation) -> Self {
        let class_path = class_path.into();
        let category = StructureCategory::from_class_path(&class_path);
        Self {
            class_path,
            category,
            translation,
            rotation,
            source_index: None,
        }
    }

    /// Index used to name this record in diagnostics and room reports: its
    /// document position when loaded, otherwise `position` in the caller's
    /// slice.
    pub fn report_index(&self, position: usize) -> usize {
        self.source_index.unwrap_or(position)
    }

    /// Decodes one element of the exporter's JSON array.
    ///
    /// `index` is the element's position in the document and is only used
    /// for diagnostics.
    pub fn from_value(index: usize, value: serde_json::Value) -> Result<Self> {
        let malformed = |reason: String| Error::MalformedRecord { index, reason };

        let raw: RawRecord = serde_json::from_value(value).map_err(|e| malformed(e.to_string()))?;

        let class_path = raw
            .class_path
            .ok_or_else(|| malformed("missing ClassPath".into()))?;
        let translation = raw
            .translation
            .ok_or_else(|| malformed("missing Translation".into()))?;
        let rotation = raw
            .rotation
            .ok_or_else(|| malformed("missing Rotation".into()))?;

        let translation = Translation::new(
            require(translation.x, "Translation.X").map_err(malformed)?,
            require(translation.y, "Translation.Y").map_err(malformed)?,
            require(translation.z, "Translation.Z").map_err(malformed)?,
        );
        let rotation = Rotation {
            pitch: rotation.pitch.unwrap_or(0.0),
            yaw: require(rotation.yaw, "Rotation.Yaw").map_err(malformed)?,
            roll: rotation.roll.unwrap_or(0.0),
        };

        Ok(Self {
            source_index: Some(index),
            ..Self::new(class_path, translation, rotation)
        })
    }

    /// True when every coordinate that takes part in projection is finite.
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.yaw.is_finite()
    }
}

fn require(value: Option<f64>, field: &str) -> std::result::Result<f64, String> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(format!("{field} is not finite ({v})")),
        None => Err(format!("missing {field}")),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRecord {
    class_path: Option<String>,
    translation: Option<RawVector>,
    rotation: Option<RawRotation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawVector {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRotation {
    pitch: Option<f64>,
    yaw: Option<f64>,
    roll: Option<f64>,
}

/// Records decoded from one document, plus the elements that were rejected.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub records: Vec<StructuralRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// Parses the exporter's JSON array.
///
/// Fails only when the document itself is not a JSON array; malformed
/// elements land in [`RecordSet::skipped`].
pub fn load_records(json: &str) -> Result<RecordSet> {
    let elements: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut set = RecordSet {
        records: Vec::with_capacity(elements.len()),
        skipped: Vec::new(),
    };

    for (index, value) in elements.into_iter().enumerate() {
        let class_path = value
            .get("ClassPath")
            .and_then(|v| v.as_str())
            .map(str::to_owned);

        match StructuralRecord::from_value(index, value) {
            Ok(record) => set.records.push(record),
            Err(err) => {
                tracing::warn!(index, error = %err, "Skipping malformed record");
                set.skipped.push(SkippedRecord::from_error(index, class_path, &err));
            }
        }
    }

    tracing::debug!(
        loaded = set.records.len(),
        skipped = set.skipped.len(),
        "Loaded structure records"
    );
    Ok(set)
}

/// Reads and parses a record document from disk.
pub fn load_records_from_path(path: impl AsRef<Path>) -> Result<RecordSet> {
    let content = std::fs::read_to_string(path.as_ref())?;
    load_records(&content)
}
