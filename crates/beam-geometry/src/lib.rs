// SPDX-License-Identifier: AGPL-3.0-only

//! Geometry model for the laser-bounce experiment.
//!
//! A laser fires from the origin at a fixed upward angle. A circle of random
//! centre and radius sits somewhere in front of it. The beam strikes the
//! circle, reflects, and is scored on whether the reflected ray reaches an
//! infinite plate lying along `y = 0`.
//!
//! This crate has **no dependencies** and **no shared state** — every
//! function here is pure, so the same trial always produces the same outcome
//! regardless of which thread evaluates it.
//!
//! ```text
//!          y
//!          │        ╭───╮
//!          │   ╱ ──▶│ ● │   circle (xc, yc, r)
//!          │ ╱  30° ╰───╯
//!   ───────●──────────────▶ x   plate (y = 0)
//!        origin
//! ```
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ranges`] | Generation ranges for centre and radius |
//! | [`trial`] | [`TrialParameters`] and range validation |
//! | [`beam`] | [`Beam`] — launch angle and its precomputed slope |
//! | [`evaluate`] | The per-trial intersection / reflection test |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)]

pub mod beam;
pub mod evaluate;
pub mod ranges;
pub mod trial;

pub use beam::Beam;
pub use evaluate::{evaluate, evaluate_detailed, Intersection, TrialOutcome};
pub use trial::{RangeViolation, TrialField, TrialParameters};
