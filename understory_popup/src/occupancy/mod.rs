// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Occupancy`](crate::Occupancy) implementations.
//!
//! - `flat`: a vector of claimed rectangles, scanned linearly. Placement is
//!   quadratic in the number of accepted popups, which is fine for the few
//!   dozen a map usually shows.
//! - `grid` (feature `occupancy_grid`): uniform grid keyed by cell. A popup
//!   only gets compared with popups sharing a cell, which keeps large caps
//!   (hundreds of popups over dense data) cheap.

pub(crate) mod flat;
#[cfg(feature = "occupancy_grid")]
pub(crate) mod grid;

pub use flat::FlatOccupancy;
#[cfg(feature = "occupancy_grid")]
pub use grid::GridOccupancy;
