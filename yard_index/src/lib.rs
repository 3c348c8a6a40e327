// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Yard Index: a broad-phase 2D AABB index.
//!
//! - Insert, update, and remove axis-aligned bounding boxes with small `Copy` payloads.
//! - Query by point or intersecting rectangle.
//! - Generational [`Key`]s stay valid until their entry is removed and never alias a later entry.
//!
//! The index does not depend on any geometry crate. Higher layers compute
//! conservative AABBs (for example the bounds of a rotated rectangle) and run their
//! exact tests on the candidates returned here.
//!
//! Backends are pluggable via the [`Backend`] trait:
//!
//! - [`FlatVec`] (default): linear scans. Smallest and fastest for a few dozen entries.
//! - [`UniformGrid`]: fixed-size cells with an origin offset. Good when entries are of
//!   similar size and spread over a large area.
//!
//! # Example
//!
//! ```rust
//! use yard_index::{Aabb, Index};
//!
//! let mut idx: Index<u32> = Index::new();
//! let k1 = idx.insert(Aabb::new(0.0, 0.0, 10.0, 10.0), 1);
//! let _k2 = idx.insert(Aabb::new(5.0, 5.0, 15.0, 15.0), 2);
//!
//! // Move the first box away.
//! idx.update(k1, Aabb::new(20.0, 0.0, 30.0, 10.0));
//!
//! let hits: Vec<_> = idx.query_point(6.0, 6.0).collect();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].1, 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::grid::UniformGrid;
pub use index::{Index, Key};
pub use types::Aabb;
