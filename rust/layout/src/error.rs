// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for layout extraction.

use crate::types::Point2D;

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading records or extracting rooms.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A record is missing (or carries unusable) class path, translation or
    /// rotation fields.
    #[error("record {index} is malformed: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// A wall whose two endpoints quantize to the same point.
    #[error("record {index} produces a zero-length wall at {point}")]
    DegenerateSegment { index: usize, point: Point2D },

    /// Analysis configuration rejected by validation.
    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),

    /// The record document is not a JSON array.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Summary table export failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
