//! The set of models a session may switch between.

use std::collections::BTreeMap;

use crate::types::Model;

/// Model selected when none is requested.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Published prices in USD per million tokens: (name, input, output).
const BUILTIN_PRICING: &[(&str, f64, f64)] = &[
    ("gpt-4o-mini", 0.15, 0.60),
    ("gpt-4o", 2.50, 10.00),
    ("gpt-4.1", 2.00, 8.00),
    ("gpt-4.1-mini", 0.40, 1.60),
    ("gpt-4.1-nano", 0.10, 0.40),
    ("o3-mini", 1.10, 4.40),
    ("o4-mini", 1.10, 4.40),
];

/// An immutable name-to-model mapping.
///
/// The catalog never changes after construction.  Which model is in use is
/// tracked by the session, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCatalog {
    models: BTreeMap<String, Model>,
}

impl ModelCatalog {
    /// Build a catalog from the given models.  Later duplicates win.
    pub fn new(models: impl IntoIterator<Item = Model>) -> Self {
        let models = models
            .into_iter()
            .map(|model| (model.name().to_string(), model))
            .collect();
        Self { models }
    }

    /// The catalog of models with known pricing.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_PRICING
                .iter()
                .map(|(name, input, output)| Model::from_per_million(*name, *input, *output)),
        )
    }

    /// Look a model up by exact (case-sensitive) name.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Returns true if `name` is in the catalog.
    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Model names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if the catalog has no models.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
