// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple).
//! - `grid`: uniform grid with an origin offset; great locality for evenly sized boxes.

pub mod flatvec;
pub mod grid;
