// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lift: a body with an arm platform in front of it.

use kurbo::{Point, Vec2};
use yard_geometry::{Footprint, RigidMotion};

use crate::config::LiftDefaults;
use crate::error::YardError;
use crate::types::Bundle;

/// The single vehicle of a yard.
///
/// `footprint` holds the unscaled body; collision tests use
/// [`body`](Self::body), which applies [`scale`](Self::scale). The local +y
/// axis of the footprint is the direction of travel.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lift {
    /// Unscaled body placement and size.
    pub footprint: Footprint,
    /// Operating height tested against bundle height intervals.
    pub height: f64,
    /// Uniform size multiplier.
    pub scale: f64,
    /// Unscaled reach of the arm platform.
    pub arms_length: f64,
    /// Unscaled span of the arm platform.
    pub arms_width: f64,
    /// Elevation of the arm platform.
    pub arms_height: f64,
}

impl Lift {
    /// A lift at its configured parking spot, facing +y.
    pub fn from_defaults(defaults: &LiftDefaults) -> Self {
        Self {
            footprint: Footprint::axis_aligned(
                Point::new(defaults.x, defaults.y),
                defaults.width,
                defaults.length,
            ),
            height: defaults.height,
            scale: defaults.scale,
            arms_length: defaults.arms_length,
            arms_width: defaults.arms_width,
            arms_height: defaults.arms_height,
        }
    }

    /// Center of the body.
    pub fn center(&self) -> Point {
        self.footprint.center
    }

    /// Orientation in degrees.
    pub fn angle(&self) -> f64 {
        self.footprint.angle
    }

    /// Unit vector in the direction of travel.
    pub fn forward(&self) -> Vec2 {
        self.footprint.forward()
    }

    /// Scaled body footprint.
    pub fn body(&self) -> Footprint {
        self.footprint.scaled(self.scale)
    }

    /// Center of the arm platform.
    pub fn arms_position(&self) -> Point {
        let reach = (self.footprint.length + self.arms_length) * self.scale * 0.5;
        self.center() + self.forward() * reach
    }

    /// Scaled arm platform footprint, directly ahead of the body.
    pub fn arms(&self) -> Footprint {
        Footprint::new(
            self.arms_position(),
            self.arms_width * self.scale,
            self.arms_length * self.scale,
            self.angle(),
        )
    }

    /// Whether `bundle` stands in the way of the body at the operating height.
    pub fn blocked_by(&self, bundle: &Bundle) -> bool {
        bundle.spans_height(self.height) && bundle.footprint.overlaps(&self.body())
    }

    /// The lift after `motion`. Arm settings are unchanged.
    pub fn moved(&self, motion: &RigidMotion) -> Self {
        Self {
            footprint: motion.apply(&self.footprint),
            ..*self
        }
    }

    /// Check that the lift describes a physical vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`YardError::InvalidGeometry`] when a dimension or the scale is
    /// not positive, a height is negative, or the arms reach as far as the body.
    pub fn validate(&self) -> Result<(), YardError> {
        if !self.footprint.is_valid() {
            return Err(YardError::InvalidGeometry("lift dimensions must be positive"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(YardError::InvalidGeometry("lift scale must be positive"));
        }
        if !(self.arms_length.is_finite()
            && self.arms_width.is_finite()
            && self.arms_length > 0.0
            && self.arms_width > 0.0)
        {
            return Err(YardError::InvalidGeometry("arms dimensions must be positive"));
        }
        if self.arms_length >= self.footprint.length {
            return Err(YardError::InvalidGeometry(
                "arms length must be shorter than the lift",
            ));
        }
        if !(self.height.is_finite()
            && self.arms_height.is_finite()
            && self.height >= 0.0
            && self.arms_height >= 0.0)
        {
            return Err(YardError::InvalidGeometry("heights must not be negative"));
        }
        Ok(())
    }
}

/// A partial update of the lift. `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LiftEdit {
    /// New body center.
    pub center: Option<Point>,
    /// New orientation in degrees.
    pub angle: Option<f64>,
    /// New unscaled body width.
    pub width: Option<f64>,
    /// New unscaled body length.
    pub length: Option<f64>,
    /// New operating height.
    pub height: Option<f64>,
    /// New scale.
    pub scale: Option<f64>,
    /// New unscaled arm reach.
    pub arms_length: Option<f64>,
    /// New unscaled arm span.
    pub arms_width: Option<f64>,
    /// New arm elevation.
    pub arms_height: Option<f64>,
}

impl LiftEdit {
    /// The lift with every set field replaced.
    pub fn apply_to(&self, lift: &Lift) -> Lift {
        let f = &lift.footprint;
        Lift {
            footprint: Footprint::new(
                self.center.unwrap_or(f.center),
                self.width.unwrap_or(f.width),
                self.length.unwrap_or(f.length),
                self.angle.unwrap_or(f.angle),
            ),
            height: self.height.unwrap_or(lift.height),
            scale: self.scale.unwrap_or(lift.scale),
            arms_length: self.arms_length.unwrap_or(lift.arms_length),
            arms_width: self.arms_width.unwrap_or(lift.arms_width),
            arms_height: self.arms_height.unwrap_or(lift.arms_height),
        }
    }
}

/// One discrete instruction for the lift.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiftCommand {
    /// One step along the direction of travel.
    MoveForward,
    /// One step against the direction of travel.
    MoveBackward,
    /// One counter-clockwise turn step about the body center.
    TurnLeft,
    /// One clockwise turn step about the body center.
    TurnRight,
    /// Raise the arms by this amount.
    RaiseArms(f64),
    /// Lower the arms by this amount, stopping at the ground.
    LowerArms(f64),
    /// Replace the scale.
    SetScale(f64),
    /// Replace any subset of the lift attributes.
    SetPose(LiftEdit),
}

impl LiftCommand {
    /// The rigid motion of a step command, given the step sizes.
    ///
    /// Arm and pose commands have no motion.
    pub fn motion(&self, lift: &Lift, move_step: f64, turn_step: f64) -> Option<RigidMotion> {
        match self {
            Self::MoveForward => Some(RigidMotion::translate(lift.forward() * move_step)),
            Self::MoveBackward => Some(RigidMotion::translate(lift.forward() * -move_step)),
            Self::TurnLeft => Some(RigidMotion::rotate_about(turn_step, lift.center())),
            Self::TurnRight => Some(RigidMotion::rotate_about(-turn_step, lift.center())),
            Self::RaiseArms(_) | Self::LowerArms(_) | Self::SetScale(_) | Self::SetPose(_) => None,
        }
    }
}
