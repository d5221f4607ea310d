// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor partitioning by elevation.

/// Returns the floor index for a world Z coordinate.
///
/// `floor((z - base_z) / floor_height)` with floored division, so elevations
/// below `base_z` land on negative floors instead of rounding toward zero.
///
/// Total over all inputs: NaN maps to 0 and bands beyond the `i32` range
/// clamp to its ends. Use [`checked_floor_of`] where those cases must be
/// told apart.
pub fn floor_of(z: f64, base_z: f64, floor_height: f64) -> i32 {
    ((z - base_z) / floor_height).floor() as i32
}

/// Like [`floor_of`], but `None` for a non-finite elevation or a floor index
/// outside the `i32` range.
pub fn checked_floor_of(z: f64, base_z: f64, floor_height: f64) -> Option<i32> {
    let band = ((z - base_z) / floor_height).floor();
    (band.is_finite() && band >= i32::MIN as f64 && band <= i32::MAX as f64)
        .then_some(band as i32)
}
