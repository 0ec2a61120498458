//! Ordered name → model registry.
//!
//! Iteration order is insertion order. It drives the fitting loop, the order of
//! model records in the report, and tie-breaking in best-model selection.

use crate::domain::ModelSpec;
use crate::models::{ExponentialModel, GrowthModel, LinearModel, LogisticModel};

pub struct ModelRegistry {
    entries: Vec<(String, Box<dyn GrowthModel>)>,
}

impl ModelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// The built-in models in default order: linear, logistic, exponential.
    pub fn with_defaults() -> Self {
        Self::from_specs(&ModelSpec::ALL)
    }

    /// Built-in models selected on the command line, in the given order.
    pub fn from_specs(specs: &[ModelSpec]) -> Self {
        let mut registry = Self::new();
        for &spec in specs {
            match spec {
                ModelSpec::Linear => registry.register(spec.name(), LinearModel),
                ModelSpec::Logistic => registry.register(spec.name(), LogisticModel::default()),
                ModelSpec::Exponential => registry.register(spec.name(), ExponentialModel::default()),
            };
        }
        registry
    }

    /// Add `model` under `name`. Re-registering a name replaces the model in place.
    pub fn register(&mut self, name: impl Into<String>, model: impl GrowthModel + 'static) -> &mut Self {
        let name = name.into();
        let model: Box<dyn GrowthModel> = Box::new(model);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = model,
            None => self.entries.push((name, model)),
        }
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, model: impl GrowthModel + 'static) -> Self {
        self.register(name, model);
        self
    }

    pub fn entries(&self) -> &[(String, Box<dyn GrowthModel>)] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
