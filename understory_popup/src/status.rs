// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement results: ordered popup lists and the per-update diff.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::types::{Popup, PopupId};

/// Ordered collection of popups with unique ids.
///
/// Iteration follows insertion order, which for lists produced by the
/// manager is rank order (highest priority first). Lookups by id are
/// constant time.
#[derive(Clone, Debug)]
pub struct PopupList<P> {
    popups: Vec<Popup<P>>,
    index: HashMap<PopupId, usize>,
}

impl<P> Default for PopupList<P> {
    fn default() -> Self {
        Self {
            popups: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<P> PopupList<P> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of popups.
    pub fn len(&self) -> usize {
        self.popups.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }

    /// Whether a popup with `id` is in the list.
    pub fn contains(&self, id: PopupId) -> bool {
        self.index.contains_key(&id)
    }

    /// The popup with `id`, if any.
    pub fn get(&self, id: PopupId) -> Option<&Popup<P>> {
        self.index.get(&id).map(|&i| &self.popups[i])
    }

    /// Iterate popups in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Popup<P>> {
        self.popups.iter()
    }

    /// Iterate ids in order.
    pub fn ids(&self) -> impl Iterator<Item = PopupId> + '_ {
        self.popups.iter().map(|p| p.id)
    }

    /// The popups as a slice, in order.
    pub fn as_slice(&self) -> &[Popup<P>] {
        &self.popups
    }

    /// Append a popup. Returns `false` (and drops `popup`) if its id is already present.
    pub fn push(&mut self, popup: Popup<P>) -> bool {
        if self.index.contains_key(&popup.id) {
            return false;
        }
        self.index.insert(popup.id, self.popups.len());
        self.popups.push(popup);
        true
    }
}

impl<P: PartialEq> PartialEq for PopupList<P> {
    fn eq(&self, other: &Self) -> bool {
        self.popups == other.popups
    }
}

impl<P> FromIterator<Popup<P>> for PopupList<P> {
    fn from_iter<I: IntoIterator<Item = Popup<P>>>(iter: I) -> Self {
        let mut list = Self::new();
        for popup in iter {
            list.push(popup);
        }
        list
    }
}

impl<P> IntoIterator for PopupList<P> {
    type Item = Popup<P>;
    type IntoIter = alloc::vec::IntoIter<Popup<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.popups.into_iter()
    }
}

impl<'a, P> IntoIterator for &'a PopupList<P> {
    type Item = &'a Popup<P>;
    type IntoIter = core::slice::Iter<'a, Popup<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.popups.iter()
    }
}

/// How a popup changed relative to the previous update.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PopupChange {
    /// Shown now, not shown before.
    New,
    /// Shown now and before; its position may have moved.
    Updated,
    /// Shown before, not shown now.
    Removed,
}

/// Result of one [`PopupManager::update`](crate::PopupManager::update).
///
/// Every id displayed after the update is in exactly one of [`new`][Self::new]
/// and [`updated`][Self::updated]. [`removed`][Self::removed] holds popups as
/// they were last displayed, so their old geometry is still at hand.
#[derive(Clone, Debug)]
pub struct PopupStatus<P> {
    /// Popups that just appeared.
    pub new: PopupList<P>,
    /// Popups that stay visible, with their current geometry.
    pub updated: PopupList<P>,
    /// Popups that disappeared.
    pub removed: PopupList<P>,
}

impl<P> Default for PopupStatus<P> {
    fn default() -> Self {
        Self {
            new: PopupList::new(),
            updated: PopupList::new(),
            removed: PopupList::new(),
        }
    }
}

impl<P> PopupStatus<P> {
    /// Whether nothing is displayed and nothing was removed.
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Number of popups displayed after the update.
    pub fn present_len(&self) -> usize {
        self.new.len() + self.updated.len()
    }

    /// Popups displayed after the update: new ones first, then updated ones.
    pub fn present(&self) -> impl Iterator<Item = &Popup<P>> + '_ {
        self.new.iter().chain(self.updated.iter())
    }

    /// Which list `id` is in, if any.
    pub fn change_of(&self, id: PopupId) -> Option<PopupChange> {
        if self.new.contains(id) {
            Some(PopupChange::New)
        } else if self.updated.contains(id) {
            Some(PopupChange::Updated)
        } else if self.removed.contains(id) {
            Some(PopupChange::Removed)
        } else {
            None
        }
    }
}
