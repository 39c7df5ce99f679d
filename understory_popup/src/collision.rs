// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap test and the broad-phase trait used while placing popups.

use kurbo::{Rect, Size};

/// Whether two rectangles overlap.
///
/// Rectangles are treated as closed: two popups that share an edge or a
/// corner overlap. They are disjoint only when one lies entirely to the left,
/// right, above, or below the other.
///
/// # Examples
///
/// ```
/// use kurbo::Rect;
/// use understory_popup::rects_overlap;
///
/// let a = Rect::new(0.0, 0.0, 10.0, 10.0);
/// assert!(rects_overlap(&a, &Rect::new(5.0, 5.0, 15.0, 15.0)));
/// assert!(rects_overlap(&a, &Rect::new(10.0, 0.0, 20.0, 10.0)));
/// assert!(!rects_overlap(&a, &Rect::new(11.0, 0.0, 20.0, 10.0)));
/// ```
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(b.x0 > a.x1 || b.x1 < a.x0 || b.y0 > a.y1 || b.y1 < a.y0)
}

/// Screen regions already claimed by popups during one placement pass.
///
/// The manager clears its occupancy at the start of every update, then asks
/// [`collides`][Occupancy::collides] for each candidate in rank order and
/// [`insert`][Occupancy::insert]s the ones it accepts. Implementations only
/// change how fast the answer is found; the answer itself must always equal
/// [`rects_overlap`] against every inserted rectangle.
pub trait Occupancy {
    /// Forget every inserted rectangle.
    fn clear(&mut self);

    /// Claim a rectangle.
    fn insert(&mut self, rect: Rect);

    /// Whether `rect` overlaps any claimed rectangle.
    fn collides(&self, rect: &Rect) -> bool;

    /// Number of claimed rectangles.
    fn len(&self) -> usize;

    /// Whether nothing is claimed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adjust internal structure to popups of `size`.
    ///
    /// Called once when a manager takes ownership of the occupancy. The
    /// default does nothing.
    fn fit_popup_size(&mut self, size: Size) {
        let _ = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric_and_closed() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let cases = [
            (Rect::new(2.0, 2.0, 4.0, 4.0), true),
            (Rect::new(-5.0, -5.0, 0.0, 0.0), true),
            (Rect::new(0.0, 10.0, 10.0, 20.0), true),
            (Rect::new(0.0, 10.001, 10.0, 20.0), false),
            (Rect::new(-10.0, 0.0, -0.001, 10.0), false),
            (Rect::new(0.0, -20.0, 10.0, -10.5), false),
        ];
        for (b, expected) in cases {
            assert_eq!(rects_overlap(&a, &b), expected, "{a:?} vs {b:?}");
            assert_eq!(rects_overlap(&b, &a), expected, "{b:?} vs {a:?}");
        }
    }
}
