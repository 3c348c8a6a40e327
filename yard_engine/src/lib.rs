// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Yard Engine: the state of a storage yard of stacked bundles and one lift.
//!
//! A [`Yard`] owns every [`Bundle`] and the [`Lift`]. Callers change it only
//! through its operations and receive copies ([`BundleDto`], [`LiftDto`],
//! [`YardState`]) back.
//!
//! - Stacking: a new or edited bundle rests on the highest bundle its
//!   footprint overlaps. Editing a bundle places it again by that rule and
//!   restacks the bundles resting on it, so two bundles that overlap in plan
//!   never share height.
//! - Collision groups: [`Yard::transitive_colliders`] walks the overlap
//!   relation breadth-first.
//! - Lift: steps and turns are checked against every bundle spanning the
//!   lift's operating height. In transport mode, the bundles resting on the
//!   arms travel with it.
//! - History: each successful mutation records one snapshot; [`Yard::undo`]
//!   and [`Yard::redo`] swap whole states. Failed operations change nothing,
//!   history included.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use yard_engine::{Yard, YardError};
//!
//! let mut yard = Yard::new();
//! let a = yard.create_bundle(Point::new(0.0, 0.0))?;
//! let b = yard.create_bundle(Point::new(5.0, 5.0))?;
//! assert_eq!(yard.bundle(a).map(|b| b.z), Some(0.0));
//! assert_eq!(yard.bundle(b).map(|b| b.z), Some(5.0));
//!
//! // Sliding the base away drops the bundle that rested on it.
//! yard.modify_bundle_position(a, Point::new(40.0, 0.0))?;
//! assert_eq!(yard.bundle(b).map(|b| b.z), Some(0.0));
//!
//! yard.undo()?;
//! assert_eq!(yard.bundle(b).map(|b| b.z), Some(5.0));
//! # Ok::<(), YardError>(())
//! ```
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for entities, snapshots,
//!   value objects, and configuration.

pub mod config;
pub mod dto;
pub mod error;
pub mod graph;
pub mod history;
pub mod lift;
pub mod stacking;
pub mod store;
pub mod types;
pub mod yard;

pub use config::{BundleDefaults, LiftDefaults, YardConfig};
pub use dto::{BundleDto, BundleEdit, CollisionQuery, LiftDto};
pub use error::YardError;
pub use history::History;
pub use lift::{Lift, LiftCommand, LiftEdit};
pub use types::{Bundle, BundleDraft, BundleId, BundleMetadata, ParseBundleIdError};
pub use yard::{Yard, YardState};
