use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, Viewport};
use crate::error::ChartResult;
use crate::render::primitives::{CirclePrimitive, Primitive, RectPrimitive};

/// Identifier of one drawing surface inside a [`Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(u64);

impl SurfaceId {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Handle to one drawing group: the surface it lives on plus its key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRef {
    pub surface: SurfaceId,
    pub key: String,
}

/// Stable identity of a data-bound mark across renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkKey {
    pub series: usize,
    pub point: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MarkShape {
    Circle(CirclePrimitive),
    Rect(RectPrimitive),
}

impl MarkShape {
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        match self {
            Self::Circle(circle) => circle.contains(x, y),
            Self::Rect(rect) => rect.contains(x, y),
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        match self {
            Self::Circle(circle) => circle.validate(),
            Self::Rect(rect) => rect.validate(),
        }
    }
}

/// A drawn shape bound to the data point it represents.
///
/// Mark geometry is in group-local pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub key: MarkKey,
    pub shape: MarkShape,
    pub point: DataPoint,
    pub series_name: Option<String>,
}

/// Counts produced when a layer's marks are reconciled with a new set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// Per-feature drawing layer inside a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    primitives: Vec<Primitive>,
    marks: Vec<Mark>,
}

impl Layer {
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn clear_primitives(&mut self) {
        self.primitives.clear();
    }

    #[must_use]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Reconciles marks by key: new keys enter, shared keys update in place,
    /// keys missing from `next` exit. The result keeps `next`'s order.
    pub fn join_marks(&mut self, next: Vec<Mark>) -> JoinStats {
        let previous: IndexSet<MarkKey> = self.marks.iter().map(|mark| mark.key).collect();
        let updated = next
            .iter()
            .filter(|mark| previous.contains(&mark.key))
            .count();
        let stats = JoinStats {
            entered: next.len() - updated,
            updated,
            exited: previous.len() - updated,
        };
        self.marks = next;
        stats
    }

    /// Drops every previous mark and installs `next`.
    pub fn replace_marks(&mut self, next: Vec<Mark>) -> JoinStats {
        let stats = JoinStats {
            entered: next.len(),
            updated: 0,
            exited: self.marks.len(),
        };
        self.marks = next;
        stats
    }

    /// Topmost mark under the group-local point, if any.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&Mark> {
        self.marks.iter().rev().find(|mark| mark.shape.contains(x, y))
    }

    pub fn validate(&self) -> ChartResult<()> {
        for primitive in &self.primitives {
            primitive.validate()?;
        }
        for mark in &self.marks {
            mark.shape.validate()?;
        }
        Ok(())
    }
}

/// Translated region of a surface holding one panel's layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingGroup {
    key: String,
    offset: (f64, f64),
    inner: Viewport,
    layers: IndexMap<String, Layer>,
}

impl DrawingGroup {
    #[must_use]
    pub fn new(key: impl Into<String>, offset: (f64, f64), inner: Viewport) -> Self {
        Self {
            key: key.into(),
            offset,
            inner,
            layers: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Translation of the group's origin inside its surface.
    #[must_use]
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    /// Plot area once margins are removed.
    #[must_use]
    pub fn inner(&self) -> Viewport {
        self.inner
    }

    pub(crate) fn reposition(&mut self, offset: (f64, f64), inner: Viewport) {
        self.offset = offset;
        self.inner = inner;
    }

    /// Returns the layer named `key`, creating it on first use.
    pub fn layer_mut(&mut self, key: &str) -> &mut Layer {
        self.layers.entry(key.to_owned()).or_default()
    }

    #[must_use]
    pub fn layer(&self, key: &str) -> Option<&Layer> {
        self.layers.get(key)
    }

    /// Drops every layer whose key `keep` rejects.
    pub(crate) fn retain_layers(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.layers.retain(|key, _| keep(key));
    }

    pub fn layers(&self) -> impl Iterator<Item = (&str, &Layer)> {
        self.layers.iter().map(|(key, layer)| (key.as_str(), layer))
    }

    /// Converts a surface-space point into this group's local space.
    #[must_use]
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.offset.0, y - self.offset.1)
    }
}

/// One drawable canvas; non-merged charts get one per panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSurface {
    id: SurfaceId,
    viewport: Viewport,
    groups: IndexMap<String, DrawingGroup>,
}

impl DrawingSurface {
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub(crate) fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn group(&self, key: &str) -> Option<&DrawingGroup> {
        self.groups.get(key)
    }

    pub fn group_mut(&mut self, key: &str) -> Option<&mut DrawingGroup> {
        self.groups.get_mut(key)
    }

    pub(crate) fn retain_groups(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.groups.retain(|key, _| keep(key));
    }

    pub(crate) fn insert_group(&mut self, group: DrawingGroup) {
        self.groups.insert(group.key.clone(), group);
    }

    pub fn groups(&self) -> impl Iterator<Item = &DrawingGroup> {
        self.groups.values()
    }
}

/// Owner of every drawing surface a chart renders into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    surfaces: Vec<DrawingSurface>,
    next_id: u64,
}

impl Host {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every surface. Identifiers are never reused.
    pub fn clear(&mut self) {
        self.surfaces.clear();
    }

    pub(crate) fn retain_surfaces(&mut self, mut keep: impl FnMut(&DrawingSurface) -> bool) {
        self.surfaces.retain(|surface| keep(surface));
    }

    pub fn add_surface(&mut self, viewport: Viewport) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        self.surfaces.push(DrawingSurface {
            id,
            viewport,
            groups: IndexMap::new(),
        });
        id
    }

    #[must_use]
    pub fn surfaces(&self) -> &[DrawingSurface] {
        &self.surfaces
    }

    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&DrawingSurface> {
        self.surfaces.iter().find(|surface| surface.id == id)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut DrawingSurface> {
        self.surfaces.iter_mut().find(|surface| surface.id == id)
    }

    #[must_use]
    pub fn group(&self, group: &GroupRef) -> Option<&DrawingGroup> {
        self.surface(group.surface)?.group(&group.key)
    }

    pub fn group_mut(&mut self, group: &GroupRef) -> Option<&mut DrawingGroup> {
        self.surface_mut(group.surface)?.group_mut(&group.key)
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.layers().map(|layer| layer.primitives().len()).sum()
    }

    #[must_use]
    pub fn mark_count(&self) -> usize {
        self.layers().map(|layer| layer.marks().len()).sum()
    }

    fn layers(&self) -> impl Iterator<Item = &Layer> {
        self.surfaces
            .iter()
            .flat_map(DrawingSurface::groups)
            .flat_map(|group| group.layers.values())
    }

    pub fn validate(&self) -> ChartResult<()> {
        for surface in &self.surfaces {
            surface.viewport.validate()?;
        }
        self.layers().try_for_each(Layer::validate)
    }
}
