use indexmap::IndexMap;

use crate::error::{ChartError, ChartResult};
use crate::extensions::{FeatureKind, FeatureRenderer, builtin_renderer};

use super::Chart;

/// Renderers by feature kind.
pub struct FeatureRegistry {
    renderers: IndexMap<FeatureKind, Box<dyn FeatureRenderer>>,
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureRegistry")
            .field("kinds", &self.renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl FeatureRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            renderers: IndexMap::new(),
        }
    }

    /// Registry holding the built-in renderer of every known kind.
    #[must_use]
    pub fn with_defaults() -> Self {
        let renderers = FeatureKind::KNOWN
            .into_iter()
            .filter_map(|kind| builtin_renderer(&kind).map(|renderer| (kind, renderer)))
            .collect();
        Self { renderers }
    }

    /// Installs `renderer` for `kind`, returning the one it replaced.
    ///
    /// Unknown kinds stay unknown: they cannot be given a renderer.
    pub fn register(
        &mut self,
        kind: FeatureKind,
        renderer: Box<dyn FeatureRenderer>,
    ) -> ChartResult<Option<Box<dyn FeatureRenderer>>> {
        if let FeatureKind::Unknown(name) = &kind {
            return Err(ChartError::InvalidConfig(format!(
                "cannot register renderer for unknown feature `{name}`"
            )));
        }
        Ok(self.renderers.insert(kind, renderer))
    }

    pub fn unregister(&mut self, kind: &FeatureKind) -> bool {
        self.renderers.shift_remove(kind).is_some()
    }

    #[must_use]
    pub fn get(&self, kind: &FeatureKind) -> Option<&dyn FeatureRenderer> {
        self.renderers.get(kind).map(|renderer| &**renderer)
    }

    #[must_use]
    pub fn contains(&self, kind: &FeatureKind) -> bool {
        self.renderers.contains_key(kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl Chart {
    /// Replaces the renderer of a known feature kind.
    pub fn register_feature(
        &mut self,
        kind: FeatureKind,
        renderer: Box<dyn FeatureRenderer>,
    ) -> ChartResult<()> {
        self.registry.register(kind, renderer).map(|_| ())
    }

    /// Removes a feature renderer. Returns `true` when removed.
    pub fn unregister_feature(&mut self, kind: &FeatureKind) -> bool {
        self.registry.unregister(kind)
    }

    #[must_use]
    pub fn has_feature(&self, kind: &FeatureKind) -> bool {
        self.registry.contains(kind)
    }
}
