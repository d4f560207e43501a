// SPDX-License-Identifier: AGPL-3.0-only

//! Per-trial circle configuration.

use crate::ranges::{self, Range};
use std::fmt;

/// One randomized circle placement.
///
/// Generated once per batch and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialParameters {
    /// Circle centre x coordinate
    pub circle_center_x: f32,
    /// Circle centre y coordinate
    pub circle_center_y: f32,
    /// Circle radius
    pub circle_radius: f32,
}

/// Field of [`TrialParameters`], used to name a range violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrialField {
    /// `circle_center_x`
    CenterX,
    /// `circle_center_y`
    CenterY,
    /// `circle_radius`
    Radius,
}

impl TrialField {
    /// Generation range for this field.
    #[must_use]
    pub const fn range(self) -> Range {
        match self {
            Self::CenterX => ranges::CENTER_X,
            Self::CenterY => ranges::CENTER_Y,
            Self::Radius => ranges::RADIUS,
        }
    }
}

impl fmt::Display for TrialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CenterX => "circle_center_x",
            Self::CenterY => "circle_center_y",
            Self::Radius => "circle_radius",
        })
    }
}

/// A field value outside its generation range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeViolation {
    /// Offending field
    pub field: TrialField,
    /// Value that was produced
    pub value: f32,
}

impl TrialParameters {
    /// Create a trial from centre and radius.
    #[must_use]
    pub const fn new(circle_center_x: f32, circle_center_y: f32, circle_radius: f32) -> Self {
        Self {
            circle_center_x,
            circle_center_y,
            circle_radius,
        }
    }

    /// Check every field against its generation range.
    ///
    /// Synthetic trials built for tests may legitimately sit outside the
    /// ranges; only generated batches are required to pass.
    ///
    /// # Errors
    ///
    /// Returns the first field found out of range.
    pub fn validate(&self) -> Result<(), RangeViolation> {
        let fields = [
            (TrialField::CenterX, self.circle_center_x),
            (TrialField::CenterY, self.circle_center_y),
            (TrialField::Radius, self.circle_radius),
        ];
        for (field, value) in fields {
            if !ranges::contains(field.range(), value) {
                return Err(RangeViolation { field, value });
            }
        }
        Ok(())
    }
}
