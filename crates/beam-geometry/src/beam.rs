// SPDX-License-Identifier: AGPL-3.0-only

//! Laser launch direction.

/// Default launch angle above the plate, in degrees.
pub const DEFAULT_ANGLE_DEG: f32 = 30.0;

/// A beam fired from the origin at a fixed angle above the plate.
///
/// Only the slope `tan θ` enters the evaluator, so it is computed once here
/// and shared by every trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    angle_deg: f32,
    slope: f32,
}

impl Beam {
    /// Beam launched at `angle_deg` degrees above the plate.
    #[must_use]
    pub fn from_degrees(angle_deg: f32) -> Self {
        Self {
            angle_deg,
            slope: angle_deg.to_radians().tan(),
        }
    }

    /// Launch angle in degrees.
    #[must_use]
    pub const fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    /// `tan θ`: rise per unit of travel along x.
    #[must_use]
    pub const fn slope(&self) -> f32 {
        self.slope
    }
}

impl Default for Beam {
    fn default() -> Self {
        Self::from_degrees(DEFAULT_ANGLE_DEG)
    }
}
