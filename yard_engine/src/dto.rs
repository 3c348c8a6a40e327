// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain value objects exchanged with the host.

use kurbo::Point;
use yard_geometry::Footprint;

use crate::lift::Lift;
use crate::types::{Bundle, BundleId, BundleMetadata};

/// Flat copy of a bundle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BundleDto {
    /// Identifier.
    pub id: BundleId,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Orientation in degrees.
    pub angle: f64,
    /// Extent along the local x axis.
    pub width: f64,
    /// Extent along the local y axis.
    pub length: f64,
    /// Vertical extent.
    pub height: f64,
    /// Base elevation.
    pub z: f64,
    /// Top elevation.
    pub top_z: f64,
    /// Descriptive data.
    pub metadata: BundleMetadata,
}

impl From<&Bundle> for BundleDto {
    fn from(b: &Bundle) -> Self {
        let f = &b.footprint;
        Self {
            id: b.id,
            x: f.center.x,
            y: f.center.y,
            angle: f.angle,
            width: f.width,
            length: f.length,
            height: b.height,
            z: b.z,
            top_z: b.top_z(),
            metadata: b.metadata.clone(),
        }
    }
}

/// Flat copy of the lift, including derived arm placement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiftDto {
    /// Body center x.
    pub x: f64,
    /// Body center y.
    pub y: f64,
    /// Orientation in degrees.
    pub angle: f64,
    /// Unscaled body width.
    pub width: f64,
    /// Unscaled body length.
    pub length: f64,
    /// Operating height.
    pub height: f64,
    /// Scale.
    pub scale: f64,
    /// Unscaled arm reach.
    pub arms_length: f64,
    /// Unscaled arm span.
    pub arms_width: f64,
    /// Arm elevation.
    pub arms_height: f64,
    /// Arm platform center x.
    pub arms_x: f64,
    /// Arm platform center y.
    pub arms_y: f64,
}

impl From<&Lift> for LiftDto {
    fn from(l: &Lift) -> Self {
        let arms = l.arms_position();
        Self {
            x: l.footprint.center.x,
            y: l.footprint.center.y,
            angle: l.footprint.angle,
            width: l.footprint.width,
            length: l.footprint.length,
            height: l.height,
            scale: l.scale,
            arms_length: l.arms_length,
            arms_width: l.arms_width,
            arms_height: l.arms_height,
            arms_x: arms.x,
            arms_y: arms.y,
        }
    }
}

/// A partial update of one bundle. `None` keeps the current value.
///
/// The elevation is not editable; stacking assigns it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BundleEdit {
    /// Bundle to edit.
    pub id: BundleId,
    /// New center.
    pub center: Option<Point>,
    /// New orientation in degrees.
    pub angle: Option<f64>,
    /// New width.
    pub width: Option<f64>,
    /// New length.
    pub length: Option<f64>,
    /// New height.
    pub height: Option<f64>,
    /// New descriptive data.
    pub metadata: Option<BundleMetadata>,
}

impl BundleEdit {
    /// An edit of `id` that changes nothing yet.
    pub fn new(id: BundleId) -> Self {
        Self {
            id,
            center: None,
            angle: None,
            width: None,
            length: None,
            height: None,
            metadata: None,
        }
    }

    /// The bundle with every set field replaced.
    pub fn apply_to(&self, bundle: &Bundle) -> Bundle {
        let f = &bundle.footprint;
        Bundle {
            id: bundle.id,
            footprint: Footprint::new(
                self.center.unwrap_or(f.center),
                self.width.unwrap_or(f.width),
                self.length.unwrap_or(f.length),
                self.angle.unwrap_or(f.angle),
            ),
            height: self.height.unwrap_or(bundle.height),
            z: bundle.z,
            metadata: self
                .metadata
                .clone()
                .unwrap_or_else(|| bundle.metadata.clone()),
        }
    }

    /// Whether the edit can move the bundle or change its size.
    pub fn is_geometric(&self) -> bool {
        self.center.is_some()
            || self.angle.is_some()
            || self.width.is_some()
            || self.length.is_some()
            || self.height.is_some()
    }
}

/// What to test for collisions against the stored bundles.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionQuery {
    /// An existing bundle, excluded from its own result.
    Bundle(BundleId),
    /// An arbitrary footprint.
    Footprint(Footprint),
}
