// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Applying a [`PopupStatus`] to caller-owned visuals.
//!
//! The manager deals only in ids and geometry. Hosts keep one visual handle
//! per displayed popup (a DOM node, a scene node, a widget id) and patch it in
//! place while its id stays in [`PopupStatus::updated`], which keeps fade-in
//! animations and other per-element state alive across viewport changes.
//! [`PopupLayer`] is that bookkeeping, for hosts that do not want to write it.

use core::fmt::Debug;

use hashbrown::HashMap;

use crate::status::PopupStatus;
use crate::types::{Popup, PopupId};

/// Creates, patches and destroys the visuals for popups.
pub trait PopupView<P> {
    /// The caller's handle to one popup's visual.
    type Handle;

    /// Build the visual for a popup that just appeared.
    fn create(&mut self, popup: &Popup<P>) -> Self::Handle;

    /// Move or restyle an existing visual.
    fn update(&mut self, popup: &Popup<P>, handle: &mut Self::Handle);

    /// Tear down the visual of a popup that disappeared.
    fn remove(&mut self, popup: &Popup<P>, handle: Self::Handle);
}

/// Id → handle map kept in sync with successive [`PopupStatus`] values.
pub struct PopupLayer<H> {
    handles: HashMap<PopupId, H>,
}

impl<H> Default for PopupLayer<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H> Debug for PopupLayer<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PopupLayer")
            .field("handles", &self.handles.len())
            .finish_non_exhaustive()
    }
}

impl<H> PopupLayer<H> {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one update: remove, then patch, then create.
    ///
    /// Removing first frees visuals before new ones are built. An updated
    /// popup without a handle (for example after [`clear`][Self::clear]) gets
    /// one created; a removed popup without a handle is ignored.
    pub fn apply<P, V>(&mut self, status: &PopupStatus<P>, view: &mut V)
    where
        V: PopupView<P, Handle = H>,
    {
        for popup in &status.removed {
            if let Some(handle) = self.handles.remove(&popup.id) {
                view.remove(popup, handle);
            }
        }
        for popup in &status.updated {
            match self.handles.get_mut(&popup.id) {
                Some(handle) => view.update(popup, handle),
                None => {
                    let handle = view.create(popup);
                    self.handles.insert(popup.id, handle);
                }
            }
        }
        for popup in &status.new {
            let handle = view.create(popup);
            self.handles.insert(popup.id, handle);
        }
    }

    /// The handle for `id`, if it is displayed.
    pub fn get(&self, id: PopupId) -> Option<&H> {
        self.handles.get(&id)
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no handle is live.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Take every handle out of the layer, for bulk teardown.
    pub fn clear(&mut self) -> impl Iterator<Item = (PopupId, H)> + '_ {
        self.handles.drain()
    }
}
