// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public entity types: bundle identifiers, bundles, and their metadata.

use core::fmt;
use core::str::FromStr;

use yard_geometry::Footprint;

/// Stable identifier of a bundle.
///
/// Identifiers come from a per-yard counter and are never reused, not even
/// when an undo removes the bundle that first received one. They render and
/// parse as plain decimal strings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct BundleId(u64);

impl BundleId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The identifier issued after this one, if the counter has room.
    pub(crate) const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl fmt::Display for BundleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a bundle identifier.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid bundle id {0:?}")]
pub struct ParseBundleIdError(String);

impl FromStr for BundleId {
    type Err = ParseBundleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|_| ParseBundleIdError(s.into()))
    }
}

impl From<BundleId> for String {
    fn from(id: BundleId) -> Self {
        format!("{id}")
    }
}

impl TryFrom<String> for BundleId {
    type Error = ParseBundleIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Descriptive data carried by a bundle. None of it affects geometry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BundleMetadata {
    /// Printed barcode.
    pub barcode: String,
    /// Wood species or material.
    pub essence: String,
    /// Plank cross-section, for example `"2x4"`.
    pub plank_size: String,
    /// Reception date as formatted by the host.
    pub date: String,
    /// Reception time as formatted by the host.
    pub time: String,
}

/// A rigid rectangular prism stacked in the yard.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bundle {
    /// Stable identifier.
    pub id: BundleId,
    /// Horizontal placement and size.
    pub footprint: Footprint,
    /// Vertical extent.
    pub height: f64,
    /// Base elevation, assigned by stacking.
    pub z: f64,
    /// Descriptive data.
    pub metadata: BundleMetadata,
}

impl Bundle {
    /// Elevation of the top face.
    pub fn top_z(&self) -> f64 {
        self.z + self.height
    }

    /// Whether `h` falls in `[z, top_z)`.
    pub fn spans_height(&self, h: f64) -> bool {
        self.z <= h && h < self.top_z()
    }

    /// Whether the height intervals of the two bundles share more than a face.
    pub fn shares_height_with(&self, other: &Self) -> bool {
        self.z < other.top_z() && other.z < self.top_z()
    }

    /// Whether the footprints strictly overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.footprint.overlaps(&other.footprint)
    }

    /// Whether the two bundles occupy a common volume.
    pub fn collides_with(&self, other: &Self) -> bool {
        self.shares_height_with(other) && self.overlaps(other)
    }
}

/// Everything needed to create a bundle except its identifier and elevation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BundleDraft {
    /// Horizontal placement and size.
    pub footprint: Footprint,
    /// Vertical extent.
    pub height: f64,
    /// Descriptive data.
    pub metadata: BundleMetadata,
}
