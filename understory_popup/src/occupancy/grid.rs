// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid occupancy.
//!
//! Claimed rectangles are bucketed into fixed-size cells and a collision query
//! only looks at the cells its rectangle covers. With a cell size close to the
//! popup size every popup covers at most four cells, so each query is bounded
//! by the local density of popups rather than their total count.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use smallvec::SmallVec;

use crate::collision::{Occupancy, rects_overlap};

/// Uniform grid occupancy with a fixed cell size.
#[derive(Clone)]
pub struct GridOccupancy {
    cell_size: f64,
    cells: HashMap<(i32, i32), SmallVec<[usize; 8]>>,
    rects: Vec<Rect>,
}

impl Debug for GridOccupancy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridOccupancy")
            .field("cell_size", &self.cell_size)
            .field("claimed", &self.rects.len())
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl GridOccupancy {
    /// Create a grid with square cells of `cell_size` pixels.
    ///
    /// Pick a cell size close to the popup size: every insert and query walks
    /// all cells its rectangle covers, so cells much smaller than a popup make
    /// both slow. A manager built over this grid raises the cell size to the
    /// popup's larger dimension. Non-finite or non-positive sizes fall back to
    /// one pixel.
    pub fn new(cell_size: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };
        Self {
            cell_size,
            cells: HashMap::new(),
            rects: Vec::new(),
        }
    }

    /// The cell edge length in pixels.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn cell_range(&self, min: f64, max: f64) -> (i32, i32) {
        let c0 = cell_coord(min, self.cell_size);
        let c1 = cell_coord(max, self.cell_size);
        if c0 <= c1 { (c0, c1) } else { (c1, c0) }
    }

    fn covered_cells(&self, rect: &Rect) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (ix0, ix1) = self.cell_range(rect.x0, rect.x1);
        let (iy0, iy1) = self.cell_range(rect.y0, rect.y1);
        (ix0..=ix1).flat_map(move |ix| (iy0..=iy1).map(move |iy| (ix, iy)))
    }
}

/// Map a coordinate to its cell index, rounding toward -∞ and saturating to `i32`.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
fn cell_coord(value: f64, cell_size: f64) -> i32 {
    let t = value / cell_size;
    let coord = t as i32;

    // The cast truncates toward zero; step down once for negative fractions.
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}

impl Occupancy for GridOccupancy {
    fn clear(&mut self) {
        self.cells.clear();
        self.rects.clear();
    }

    fn insert(&mut self, rect: Rect) {
        let slot = self.rects.len();
        self.rects.push(rect);
        for cell in self.covered_cells(&rect) {
            self.cells.entry(cell).or_default().push(slot);
        }
    }

    fn collides(&self, rect: &Rect) -> bool {
        self.covered_cells(rect).any(|cell| {
            self.cells.get(&cell).is_some_and(|slots| {
                slots
                    .iter()
                    .any(|&slot| rects_overlap(&self.rects[slot], rect))
            })
        })
    }

    fn len(&self) -> usize {
        self.rects.len()
    }

    fn fit_popup_size(&mut self, size: Size) {
        let wanted = size.width.max(size.height);
        if !(wanted.is_finite() && wanted > self.cell_size) {
            return;
        }
        self.cell_size = wanted;
        self.cells.clear();
        let rects = core::mem::take(&mut self.rects);
        for rect in rects {
            self.insert(rect);
        }
    }
}
