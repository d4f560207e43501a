// SPDX-License-Identifier: AGPL-3.0-only

//! Generation ranges for trial parameters.
//!
//! All ranges are inclusive on both ends. The circle centre never drops below
//! the plate (`YCMIN = 0`). The beam line may pass through an in-range centre,
//! but the radius is at least `RMIN > 0`, so a contact point never coincides
//! with the centre and the surface normal always has non-zero length.

/// Minimum circle centre x.
pub const XCMIN: f32 = -1.0;
/// Maximum circle centre x.
pub const XCMAX: f32 = 1.0;

/// Minimum circle centre y.
pub const YCMIN: f32 = 0.0;
/// Maximum circle centre y.
pub const YCMAX: f32 = 2.0;

/// Minimum circle radius.
pub const RMIN: f32 = 0.5;
/// Maximum circle radius.
pub const RMAX: f32 = 2.0;

/// Inclusive `(min, max)` range for a field.
pub type Range = (f32, f32);

/// Centre-x range.
pub const CENTER_X: Range = (XCMIN, XCMAX);
/// Centre-y range.
pub const CENTER_Y: Range = (YCMIN, YCMAX);
/// Radius range.
pub const RADIUS: Range = (RMIN, RMAX);

/// Check whether `value` lies within the inclusive `range`.
///
/// NaN is never in range.
#[must_use]
pub fn contains(range: Range, value: f32) -> bool {
    value >= range.0 && value <= range.1
}
