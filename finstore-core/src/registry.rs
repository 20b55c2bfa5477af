//! Startup-populated mapping from exporter type to factory.

use std::collections::HashMap;
use std::sync::Arc;

use crate::FinStoreError;
use crate::exporter::ExporterFactory;
use finstore_types::ExporterType;

/// Explicit registry of exporter factories.
///
/// Factories are registered once at startup. Registration order defines
/// stable 1-based registry ids for the lifetime of the registry.
#[derive(Default, Clone)]
pub struct ExporterRegistry {
    factories: Vec<Arc<dyn ExporterFactory>>,
    by_type: HashMap<ExporterType, usize>,
}

impl ExporterRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its own exporter type.
    ///
    /// # Errors
    /// Returns `InvalidArg` if another factory already claimed the same type.
    pub fn register(&mut self, factory: Arc<dyn ExporterFactory>) -> Result<(), FinStoreError> {
        let exporter_type = factory.exporter_type();
        if self.by_type.contains_key(&exporter_type) {
            return Err(FinStoreError::InvalidArg(format!(
                "exporter type {exporter_type} registered twice"
            )));
        }
        self.by_type.insert(exporter_type, self.factories.len());
        self.factories.push(factory);
        Ok(())
    }

    /// Resolve a factory by its stored type string.
    #[must_use]
    pub fn get(&self, exporter_type: &ExporterType) -> Option<&Arc<dyn ExporterFactory>> {
        self.by_type
            .get(exporter_type)
            .and_then(|&i| self.factories.get(i))
    }

    /// True if the type is registered.
    #[must_use]
    pub fn contains(&self, exporter_type: &ExporterType) -> bool {
        self.by_type.contains_key(exporter_type)
    }

    /// `(registry id, factory)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Arc<dyn ExporterFactory>)> {
        self.factories.iter().enumerate().map(|(i, f)| (i + 1, f))
    }

    /// Number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
