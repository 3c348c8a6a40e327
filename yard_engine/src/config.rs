// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for a yard: default entity sizes, lift kinematics, and limits.

use crate::error::YardError;

/// Dimensions and metadata given to bundles created at a point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BundleDefaults {
    /// Extent along the bundle's local x axis.
    pub width: f64,
    /// Extent along the bundle's local y axis.
    pub length: f64,
    /// Vertical extent.
    pub height: f64,
    /// Initial orientation in degrees.
    pub angle: f64,
    /// Initial material.
    pub essence: String,
    /// Initial plank cross-section.
    pub plank_size: String,
}

impl Default for BundleDefaults {
    fn default() -> Self {
        Self {
            width: 10.0,
            length: 10.0,
            height: 5.0,
            angle: 0.0,
            essence: String::new(),
            plank_size: "2x4".into(),
        }
    }
}

/// Geometry of the lift when a yard is created.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LiftDefaults {
    /// Initial center x.
    pub x: f64,
    /// Initial center y.
    pub y: f64,
    /// Body extent across the direction of travel.
    pub width: f64,
    /// Body extent along the direction of travel.
    pub length: f64,
    /// Operating height tested against bundle height intervals.
    pub height: f64,
    /// Uniform size multiplier applied to body and arms.
    pub scale: f64,
    /// Reach of the arm platform in front of the body.
    pub arms_length: f64,
    /// Span of the arm platform.
    pub arms_width: f64,
    /// Elevation of the arm platform.
    pub arms_height: f64,
}

impl Default for LiftDefaults {
    fn default() -> Self {
        // Parked south of the origin, facing +y.
        Self {
            x: 0.0,
            y: -50.0,
            width: 8.0,
            length: 12.0,
            height: 3.0,
            scale: 1.0,
            arms_length: 6.0,
            arms_width: 6.0,
            arms_height: 0.0,
        }
    }
}

/// Configuration of a [`Yard`](crate::Yard).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct YardConfig {
    /// Defaults for [`Yard::create_bundle`](crate::Yard::create_bundle).
    pub bundle: BundleDefaults,
    /// Initial lift geometry.
    pub lift: LiftDefaults,
    /// Distance covered by one forward or backward step.
    pub move_step: f64,
    /// Degrees turned by one left or right step.
    pub turn_step: f64,
    /// Vertical slack when deciding whether a bundle rests on the arms.
    pub carry_tolerance: f64,
    /// Length of the probes cast by the auto-approach.
    pub approach_probe_length: f64,
    /// Maximum number of steps the auto-approach may take.
    pub approach_max_steps: usize,
    /// Maximum number of undo entries kept.
    pub history_limit: usize,
    /// Cell size of the broad-phase grid.
    pub index_cell_size: f64,
}

impl Default for YardConfig {
    fn default() -> Self {
        Self {
            bundle: BundleDefaults::default(),
            lift: LiftDefaults::default(),
            move_step: 1.0,
            turn_step: 5.0,
            carry_tolerance: 0.2,
            approach_probe_length: 1000.0,
            approach_max_steps: 10_000,
            history_limit: 100,
            index_cell_size: 32.0,
        }
    }
}

impl YardConfig {
    /// Check that every size and step is usable.
    ///
    /// # Errors
    ///
    /// Returns [`YardError::InvalidGeometry`] naming the first offending value.
    pub fn validate(&self) -> Result<(), YardError> {
        let positive = [
            (self.bundle.width, "bundle width must be positive"),
            (self.bundle.length, "bundle length must be positive"),
            (self.bundle.height, "bundle height must be positive"),
            (self.lift.width, "lift width must be positive"),
            (self.lift.length, "lift length must be positive"),
            (self.lift.scale, "lift scale must be positive"),
            (self.lift.arms_length, "arms length must be positive"),
            (self.lift.arms_width, "arms width must be positive"),
            (self.move_step, "move step must be positive"),
            (self.turn_step, "turn step must be positive"),
            (self.approach_probe_length, "probe length must be positive"),
            (self.index_cell_size, "index cell size must be positive"),
        ];
        for (value, message) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(YardError::InvalidGeometry(message));
            }
        }
        if !(self.lift.x.is_finite() && self.lift.y.is_finite()) {
            return Err(YardError::InvalidGeometry("lift position must be finite"));
        }
        if self.lift.arms_length >= self.lift.length {
            return Err(YardError::InvalidGeometry(
                "arms length must be shorter than the lift",
            ));
        }
        if !(self.carry_tolerance >= 0.0 && self.lift.height >= 0.0 && self.lift.arms_height >= 0.0)
        {
            return Err(YardError::InvalidGeometry("heights must not be negative"));
        }
        if self.history_limit == 0 {
            return Err(YardError::InvalidGeometry("history limit must be positive"));
        }
        Ok(())
    }
}
