// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-blueprint structure counts.

use std::io::Write;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::StructuralRecord;

/// Number of placed structures sharing one class path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintCount {
    #[serde(rename = "Blueprint")]
    pub blueprint: String,
    #[serde(rename = "Count")]
    pub count: usize,
}

/// Category totals for a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSummary {
    /// Counts ordered by count descending, then class path ascending.
    pub blueprints: Vec<BlueprintCount>,
    pub total: usize,
    pub wall_count: usize,
    /// Every foundation can carry one roof, so this is also the number of
    /// possible roof slots.
    pub foundation_count: usize,
}

impl StructureSummary {
    pub fn from_records(records: &[StructuralRecord]) -> Self {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        let mut wall_count = 0;
        let mut foundation_count = 0;

        for record in records {
            *counts.entry(record.class_path.as_str()).or_default() += 1;
            if record.category.is_wall() {
                wall_count += 1;
            } else if record.category.is_foundation() {
                foundation_count += 1;
            }
        }

        let mut blueprints: Vec<BlueprintCount> = counts
            .into_iter()
            .map(|(blueprint, count)| BlueprintCount {
                blueprint: blueprint.to_string(),
                count,
            })
            .collect();
        blueprints.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.blueprint.cmp(&b.blueprint)));

        Self {
            blueprints,
            total: records.len(),
            wall_count,
            foundation_count,
        }
    }

    /// Possible roof slots (one per foundation).
    pub fn roof_slots(&self) -> usize {
        self.foundation_count
    }

    /// Writes the `Blueprint,Count` table.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        if self.blueprints.is_empty() {
            csv.write_record(["Blueprint", "Count"])?;
        }
        for row in &self.blueprints {
            csv.serialize(row)?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn write_csv_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write_csv(std::io::BufWriter::new(file))
    }
}
