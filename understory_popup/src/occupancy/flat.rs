// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector occupancy with linear scans.

use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::Rect;

use crate::collision::{Occupancy, rects_overlap};

/// Flat vector occupancy with linear scans.
#[derive(Clone, Default)]
pub struct FlatOccupancy {
    rects: Vec<Rect>,
}

impl FlatOccupancy {
    /// Create an empty occupancy.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Debug for FlatOccupancy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatOccupancy")
            .field("claimed", &self.rects.len())
            .finish_non_exhaustive()
    }
}

impl Occupancy for FlatOccupancy {
    fn clear(&mut self) {
        self.rects.clear();
    }

    fn insert(&mut self, rect: Rect) {
        self.rects.push(rect);
    }

    fn collides(&self, rect: &Rect) -> bool {
        self.rects.iter().any(|r| rects_overlap(r, rect))
    }

    fn len(&self) -> usize {
        self.rects.len()
    }
}
