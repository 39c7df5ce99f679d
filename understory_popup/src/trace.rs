// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explainability hooks for placement.
//!
//! An update answers "which popups are shown", not "why is this one missing".
//! When a host needs the latter (a debug overlay, a test asserting that a
//! feature lost to a collision rather than to the cap), it can pass a
//! [`PlacementTrace`] to
//! [`PopupManager::update_with_trace`](crate::PopupManager::update_with_trace)
//! and receive one callback per feature.

use core::fmt;

use kurbo::Rect;

use crate::status::PopupChange;
use crate::types::PopupId;

/// Why a feature did not get a popup in one update.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The feature has no id.
    MissingId,
    /// The feature has no coordinate, or a non-finite one.
    MissingCoordinate,
    /// The feature's rank is absent, zero, or NaN.
    Unranked,
    /// The feature's class is not in the allow-list.
    ClassFiltered,
    /// Another feature with the same id ranked at least as high.
    DuplicateId,
    /// The feature fell beyond the configured maximum.
    OverCap,
    /// The projection returned a non-finite position.
    NonFiniteProjection,
    /// The popup would overlap a higher-priority popup.
    Collision,
}

const REJECTION_COUNT: usize = 8;

impl Rejection {
    /// Every rejection reason, in pipeline order.
    pub const ALL: [Self; REJECTION_COUNT] = [
        Self::MissingId,
        Self::MissingCoordinate,
        Self::Unranked,
        Self::ClassFiltered,
        Self::DuplicateId,
        Self::OverCap,
        Self::NonFiniteProjection,
        Self::Collision,
    ];

    /// A short lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingId => "missing id",
            Self::MissingCoordinate => "missing coordinate",
            Self::Unranked => "unranked",
            Self::ClassFiltered => "class filtered",
            Self::DuplicateId => "duplicate id",
            Self::OverCap => "over cap",
            Self::NonFiniteProjection => "non-finite projection",
            Self::Collision => "collision",
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A callback sink for placement decisions.
///
/// All methods default to doing nothing, so implementors only override what
/// they care about. `()` is the no-op sink used by
/// [`PopupManager::update`](crate::PopupManager::update).
pub trait PlacementTrace {
    /// A popup was placed at `rect`. `change` is [`PopupChange::New`] or [`PopupChange::Updated`].
    fn accepted(&mut self, id: PopupId, rect: Rect, change: PopupChange) {
        let _ = (id, rect, change);
    }

    /// A feature was dropped. `id` is `None` when the feature had none.
    fn rejected(&mut self, id: Option<PopupId>, reason: Rejection) {
        let _ = (id, reason);
    }

    /// A popup shown by the previous update is no longer shown.
    fn removed(&mut self, id: PopupId) {
        let _ = id;
    }
}

impl PlacementTrace for () {}

impl<T: PlacementTrace + ?Sized> PlacementTrace for &mut T {
    fn accepted(&mut self, id: PopupId, rect: Rect, change: PopupChange) {
        (**self).accepted(id, rect, change);
    }

    fn rejected(&mut self, id: Option<PopupId>, reason: Rejection) {
        (**self).rejected(id, reason);
    }

    fn removed(&mut self, id: PopupId) {
        (**self).removed(id);
    }
}

/// Counts placement outcomes.
///
/// Counts accumulate across updates until [`reset`][Self::reset].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlacementTally {
    /// Popups placed as new.
    pub new: usize,
    /// Popups placed as updated.
    pub updated: usize,
    /// Popups removed.
    pub removed: usize,
    rejected: [usize; REJECTION_COUNT],
}

impl PlacementTally {
    /// Create a zeroed tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many features were dropped for `reason`.
    pub fn rejected_for(&self, reason: Rejection) -> usize {
        self.rejected[reason.slot()]
    }

    /// How many features were dropped for any reason.
    pub fn rejected_total(&self) -> usize {
        self.rejected.iter().sum()
    }

    /// Zero all counts.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl PlacementTrace for PlacementTally {
    fn accepted(&mut self, _id: PopupId, _rect: Rect, change: PopupChange) {
        match change {
            PopupChange::New => self.new += 1,
            PopupChange::Updated => self.updated += 1,
            PopupChange::Removed => self.removed += 1,
        }
    }

    fn rejected(&mut self, _id: Option<PopupId>, reason: Rejection) {
        self.rejected[reason.slot()] += 1;
    }

    fn removed(&mut self, _id: PopupId) {
        self.removed += 1;
    }
}
