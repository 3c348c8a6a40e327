// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rigid planar motions applied to footprints.

use kurbo::{Affine, Point, Vec2};

use crate::footprint::Footprint;

/// A rotation about `pivot` followed by a translation.
///
/// Applying the same motion to the lift and to the bundles it carries keeps
/// their relative placement intact.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigidMotion {
    /// Translation applied after the rotation.
    pub translation: Vec2,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f64,
    /// Center of rotation.
    pub pivot: Point,
}

impl RigidMotion {
    /// The motion that changes nothing.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        pivot: Point::ORIGIN,
    };

    /// A pure translation.
    pub const fn translate(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// A pure rotation of `degrees` about `pivot`.
    pub const fn rotate_about(degrees: f64, pivot: Point) -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation: degrees,
            pivot,
        }
    }

    /// The equivalent affine transform.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translation)
            * Affine::rotate_about(self.rotation.to_radians(), self.pivot)
    }

    /// Move a point.
    pub fn apply_point(&self, p: Point) -> Point {
        self.to_affine() * p
    }

    /// Move a footprint: its center follows the transform and its angle
    /// turns by [`rotation`](Self::rotation).
    pub fn apply(&self, f: &Footprint) -> Footprint {
        Footprint {
            center: self.apply_point(f.center),
            angle: f.angle + self.rotation,
            ..*f
        }
    }
}

impl Default for RigidMotion {
    fn default() -> Self {
        Self::IDENTITY
    }
}
