// SPDX-License-Identifier: AGPL-3.0-only

//! Per-trial beam / circle / plate test.
//!
//! The beam is parameterised by its x coordinate `t`: the point at parameter
//! `t` is `(t, t·tan θ)`. Substituting into the circle equation
//! `(x - xc)² + (y - yc)² = r²` gives
//!
//! ```text
//! a·t² + b·t + c = 0
//! a = 1 + tan²θ
//! b = -2·(xc + yc·tan θ)
//! c = xc² + yc² - r²
//! ```
//!
//! The nearer root is the first contact. The beam is reflected about the unit
//! surface normal there (`out = in - 2·(in·n)·n`) and the reflected ray is
//! followed down to `y = 0`.
//!
//! All arithmetic is `f32`.

use crate::beam::Beam;
use crate::trial::TrialParameters;

/// Result of evaluating one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrialOutcome {
    /// The beam never touches the circle (negative discriminant), or the
    /// contact geometry is degenerate.
    Miss,
    /// The first contact lies behind the origin.
    Backward,
    /// The reflected beam travels upward and never reaches the plate.
    UpwardEscape,
    /// The reflected beam reaches the plate.
    Hit,
}

impl TrialOutcome {
    /// Whether this outcome counts towards the hit total.
    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// Intermediate geometry of a trial whose first contact is in front of the
/// origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Beam parameter (x coordinate) of the first contact
    pub tmin: f32,
    /// Contact point
    pub point: (f32, f32),
    /// Unit surface normal at the contact point, pointing outward
    pub normal: (f32, f32),
    /// Unit incoming beam direction
    pub incoming: (f32, f32),
    /// Unit reflected beam direction
    pub outgoing: (f32, f32),
    /// Parameter along the reflected ray at which it reaches `y = 0`
    pub t_plate: f32,
}

/// Evaluate one trial.
#[inline]
#[must_use]
pub fn evaluate(trial: &TrialParameters, beam: &Beam) -> TrialOutcome {
    evaluate_detailed(trial, beam).0
}

/// Evaluate one trial, also returning the contact geometry when the beam
/// reaches the circle in front of the origin.
#[inline]
#[must_use]
pub fn evaluate_detailed(
    trial: &TrialParameters,
    beam: &Beam,
) -> (TrialOutcome, Option<Intersection>) {
    let xc = trial.circle_center_x;
    let yc = trial.circle_center_y;
    let r = trial.circle_radius;
    let tn = beam.slope();

    let a = 1.0 + tn * tn;
    let b = -2.0 * (xc + yc * tn);
    let c = xc * xc + yc * yc - r * r;
    let d = b * b - 4.0 * a * c;

    if d < 0.0 {
        return (TrialOutcome::Miss, None);
    }

    let d = d.sqrt();
    let t1 = (-b + d) / (2.0 * a);
    let t2 = (-b - d) / (2.0 * a);
    let tmin = t1.min(t2);

    if tmin < 0.0 {
        return (TrialOutcome::Backward, None);
    }

    let xcir = tmin;
    let ycir = tmin * tn;

    let Some(normal) = unit(xcir - xc, ycir - yc) else {
        return (TrialOutcome::Miss, None);
    };
    let Some(incoming) = unit(xcir, ycir) else {
        return (TrialOutcome::Miss, None);
    };

    let dot = incoming.0 * normal.0 + incoming.1 * normal.1;
    let outgoing = (
        incoming.0 - 2.0 * normal.0 * dot,
        incoming.1 - 2.0 * normal.1 * dot,
    );

    let t_plate = (0.0 - ycir) / outgoing.1;

    let outcome = if t_plate < 0.0 {
        TrialOutcome::UpwardEscape
    } else {
        TrialOutcome::Hit
    };

    let intersection = Intersection {
        tmin,
        point: (xcir, ycir),
        normal,
        incoming,
        outgoing,
        t_plate,
    };
    (outcome, Some(intersection))
}

/// Normalise `(x, y)`; `None` for a zero-length vector.
#[inline]
fn unit(x: f32, y: f32) -> Option<(f32, f32)> {
    let len = (x * x + y * y).sqrt();
    if len > 0.0 {
        Some((x / len, y / len))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(xc: f32, yc: f32, r: f32) -> TrialOutcome {
        evaluate(&TrialParameters::new(xc, yc, r), &Beam::default())
    }

    #[test]
    fn test_negative_discriminant_is_miss() {
        // Circle well above the beam line.
        assert_eq!(eval(0.0, 2.0, 0.5), TrialOutcome::Miss);
    }

    #[test]
    fn test_circle_behind_origin_is_backward() {
        assert_eq!(eval(-2.0, -1.0, 0.5), TrialOutcome::Backward);
    }

    #[test]
    fn test_origin_inside_circle_is_backward() {
        // c < 0 puts one root on each side of the origin.
        assert_eq!(eval(0.0, 0.5, 1.5), TrialOutcome::Backward);
    }

    #[test]
    fn test_lower_contact_reflects_onto_plate() {
        assert_eq!(eval(1.5, 1.5, 0.8), TrialOutcome::Hit);
        assert_eq!(eval(1.0, 2.0, 1.5), TrialOutcome::Hit);
    }

    #[test]
    fn test_upper_contact_escapes() {
        assert_eq!(eval(1.0, 0.0, 0.5), TrialOutcome::UpwardEscape);
        assert_eq!(eval(1.0, 1.5, 0.8), TrialOutcome::UpwardEscape);
    }

    #[test]
    fn test_contact_at_origin_is_degenerate_miss() {
        // Circle passes through the origin: tmin = 0, incoming vector has
        // zero length.
        assert_eq!(eval(1.0, 0.0, 1.0), TrialOutcome::Miss);
    }

    #[test]
    fn test_reflection_law() {
        let trial = TrialParameters::new(1.5, 1.5, 0.8);
        let (outcome, geo) = evaluate_detailed(&trial, &Beam::default());
        let geo = geo.expect("contact in front of origin");
        assert_eq!(outcome, TrialOutcome::Hit);

        let len = |v: (f32, f32)| (v.0 * v.0 + v.1 * v.1).sqrt();
        assert!((len(geo.normal) - 1.0).abs() < 1e-5);
        assert!((len(geo.incoming) - 1.0).abs() < 1e-5);
        assert!((len(geo.outgoing) - 1.0).abs() < 1e-5);

        // Angle of incidence equals angle of reflection.
        let dot = |u: (f32, f32), v: (f32, f32)| u.0 * v.0 + u.1 * v.1;
        assert!((dot(geo.incoming, geo.normal) + dot(geo.outgoing, geo.normal)).abs() < 1e-5);

        // Contact point lies on the circle.
        let dx = geo.point.0 - 1.5;
        let dy = geo.point.1 - 1.5;
        assert!(((dx * dx + dy * dy).sqrt() - 0.8).abs() < 1e-3);
        assert!(geo.t_plate >= 0.0);
    }

    #[test]
    fn test_centre_on_beam_line_reflects_straight_back() {
        let beam = Beam::default();
        let trial = TrialParameters::new(1.0, beam.slope(), crate::ranges::RMIN);
        assert!(trial.validate().is_ok());

        let (outcome, geo) = evaluate_detailed(&trial, &beam);
        let geo = geo.expect("head-on contact");
        assert_eq!(outcome, TrialOutcome::Hit);

        let len = (geo.normal.0 * geo.normal.0 + geo.normal.1 * geo.normal.1).sqrt();
        assert!((len - 1.0).abs() < 1e-5);
        assert!((geo.normal.0 + geo.incoming.0).abs() < 1e-3);
        assert!((geo.normal.1 + geo.incoming.1).abs() < 1e-3);
        assert!((geo.outgoing.0 + geo.incoming.0).abs() < 1e-3);
        assert!((geo.outgoing.1 + geo.incoming.1).abs() < 1e-3);
        assert!(geo.t_plate > 0.0);
    }

    #[test]
    fn test_miss_has_no_geometry() {
        let (_, geo) = evaluate_detailed(&TrialParameters::new(0.0, 2.0, 0.5), &Beam::default());
        assert!(geo.is_none());
    }
}
