// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured failures reported by yard operations.

use crate::types::BundleId;

/// Why a yard operation was rejected.
///
/// A rejected operation leaves the yard and its history exactly as they were.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum YardError {
    /// No bundle has this identifier.
    #[error("bundle {0} not found")]
    NotFound(BundleId),
    /// The result would place the bundle inside the lift.
    #[error("bundle {0} would collide with the lift")]
    CollidesWithLift(BundleId),
    /// The lift, or the cargo it carries, would collide with this bundle.
    #[error("lift would collide with bundle {0}")]
    CollidesWithBundle(BundleId),
    /// Dimensions or poses that cannot describe a physical object.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),
    /// A loaded state has two bundles occupying the same volume.
    #[error("bundles {lower} and {upper} occupy the same volume")]
    InvalidState {
        /// The bundle with the lower base.
        lower: BundleId,
        /// The bundle with the higher base.
        upper: BundleId,
    },
    /// The identifier counter has no identifier left to issue.
    #[error("bundle identifiers exhausted")]
    IdsExhausted,
    /// Nothing to undo or redo.
    #[error("history is empty")]
    HistoryEmpty,
    /// No bundle lies ahead of the lift at its operating height.
    #[error("no bundle ahead of the lift")]
    NoApproachTarget,
    /// The lift did not reach the target within the step bound.
    #[error("bundle {target} not reached after {steps} steps")]
    ApproachUnreachable {
        /// The bundle the lift was heading for.
        target: BundleId,
        /// Steps taken before giving up.
        steps: usize,
    },
}
