// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory feature source.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::collision::rects_overlap;
use crate::error::SourceUnavailable;
use crate::mercator::MercatorView;
use crate::source::{FeatureSource, Projection};
use crate::types::{Feature, LngLat, PopupId};

/// A [`FeatureSource`] over features held in memory, grouped by layer.
///
/// This plays the part of a map engine's rendered-feature query for hosts
/// that already hold their points (a GeoJSON file, a database result) and for
/// tests. With a cull rectangle set, only features projecting inside it are
/// reported, mirroring a query over the visible viewport.
#[derive(Clone, Debug)]
pub struct FeatureSnapshot<P, V = MercatorView> {
    projection: V,
    layers: Vec<(String, Vec<Feature<P>>)>,
    cull_rect: Option<Rect>,
    ready: bool,
}

impl<P, V: Projection> FeatureSnapshot<P, V> {
    /// Create an empty, ready snapshot without culling.
    pub fn new(projection: V) -> Self {
        Self {
            projection,
            layers: Vec::new(),
            cull_rect: None,
            ready: true,
        }
    }

    /// Append a feature to `layer`, creating the layer on first use.
    pub fn push(&mut self, layer: &str, feature: Feature<P>) {
        match self.layers.iter_mut().find(|(name, _)| name == layer) {
            Some((_, features)) => features.push(feature),
            None => self.layers.push((layer.into(), alloc::vec![feature])),
        }
    }

    /// Remove every feature whose id is `id`, in every layer. Returns how many were removed.
    pub fn remove(&mut self, id: PopupId) -> usize {
        let mut removed = 0;
        for (_, features) in &mut self.layers {
            let before = features.len();
            features.retain(|f| f.id != Some(id));
            removed += before - features.len();
        }
        removed
    }

    /// Drop all features, keeping projection and settings.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Names of the layers in insertion order.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of features across all layers.
    pub fn len(&self) -> usize {
        self.layers.iter().map(|(_, f)| f.len()).sum()
    }

    /// Whether no layer holds any feature.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Only report features projecting inside `rect` (edges included).
    pub fn set_cull_rect(&mut self, rect: Option<Rect>) {
        self.cull_rect = rect;
    }

    /// Toggle readiness. An unready snapshot answers [`SourceUnavailable`].
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// The projection.
    pub fn projection(&self) -> &V {
        &self.projection
    }

    /// Mutable access to the projection, for moving the viewport.
    pub fn projection_mut(&mut self) -> &mut V {
        &mut self.projection
    }

    fn is_visible(&self, coordinate: Option<LngLat>) -> bool {
        let Some(cull) = self.cull_rect else {
            return true;
        };
        // Keep features without a usable coordinate so the manager can account for them.
        let Some(at) = coordinate else {
            return true;
        };
        let p = self.projection.project(at);
        rects_overlap(&cull, &Rect::from_points(p, p))
    }
}

impl<P> FeatureSnapshot<P, MercatorView> {
    /// Create a snapshot over a Mercator view that culls to the view rectangle.
    ///
    /// The cull rectangle follows the view size at construction time; call
    /// [`set_cull_rect`][Self::set_cull_rect] after resizing the view.
    pub fn with_view(view: MercatorView) -> Self {
        let cull = view.view_rect();
        let mut snapshot = Self::new(view);
        snapshot.set_cull_rect(Some(cull));
        snapshot
    }
}

impl<P, V: Projection> Projection for FeatureSnapshot<P, V> {
    fn project(&self, at: LngLat) -> Point {
        self.projection.project(at)
    }
}

impl<P: Clone, V: Projection> FeatureSource for FeatureSnapshot<P, V> {
    type Payload = P;

    fn visit_features<F>(
        &self,
        layers: Option<&[String]>,
        mut f: F,
    ) -> Result<(), SourceUnavailable>
    where
        F: FnMut(Feature<P>),
    {
        if !self.ready {
            return Err(SourceUnavailable);
        }
        let wanted = |name: &String| layers.is_none_or(|l| l.contains(name));
        for (_, features) in self.layers.iter().filter(|(name, _)| wanted(name)) {
            for feature in features {
                if self.is_visible(feature.coordinate) {
                    f(feature.clone());
                }
            }
        }
        Ok(())
    }
}
