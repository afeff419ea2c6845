//! Named views over a computed result.
//!
//! A scoring run produces one large JSON document per city. Clients rarely
//! need all of it, so each dimension registers a list of scopes: a name and
//! a pure selector extracting the relevant part. All scopes of a dimension
//! are derived and cached together after each computation.
//!
//! # Example
//!
//! ```ignore
//! use geostudio::scope::{Dimension, ScopeDefinition, ScopeRegistry};
//!
//! let registry = ScopeRegistry::new()
//!     .with_scope(Dimension::Cycling, ScopeDefinition::pointer("cycling-score", "/score"))
//!     .with_scope(Dimension::Cycling, ScopeDefinition::identity("complete"));
//! ```

mod dimension;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

pub use dimension::Dimension;

/// Pure function extracting a scope from a full result.
pub type Selector = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Errors raised while registering or resolving scopes.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScopeError {
    /// The dimension name is not known.
    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    /// A scope with this name is already registered for the dimension.
    #[error("Scope {name} is already registered for {dimension}")]
    DuplicateScope { dimension: Dimension, name: String },
}

/// A named selector.
#[derive(Clone)]
pub struct ScopeDefinition {
    name: String,
    selector: Selector,
}

impl ScopeDefinition {
    /// Creates a scope from a selector function.
    pub fn new<F>(name: impl Into<String>, selector: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            selector: Arc::new(selector),
        }
    }

    /// Scope returning the full result unchanged.
    pub fn identity(name: impl Into<String>) -> Self {
        Self::new(name, Value::clone)
    }

    /// Scope returning the value at a JSON pointer, or `null` if absent.
    pub fn pointer(name: impl Into<String>, pointer: impl Into<String>) -> Self {
        let pointer = pointer.into();
        Self::new(name, move |full: &Value| {
            full.pointer(&pointer).cloned().unwrap_or(Value::Null)
        })
    }

    /// Scope returning an object restricted to the given top-level fields.
    pub fn fields(name: impl Into<String>, fields: &[&str]) -> Self {
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        Self::new(name, move |full: &Value| {
            let selected = fields
                .iter()
                .filter_map(|f| full.get(f).map(|v| (f.clone(), v.clone())))
                .collect();
            Value::Object(selected)
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the selector.
    pub fn select(&self, full: &Value) -> Value {
        (self.selector)(full)
    }
}

impl fmt::Debug for ScopeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Per-dimension scope definitions, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    scopes: HashMap<Dimension, Vec<ScopeDefinition>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scope under `dimension`.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::DuplicateScope` if the name is already taken for
    /// this dimension.
    pub fn register(
        &mut self,
        dimension: Dimension,
        definition: ScopeDefinition,
    ) -> Result<(), ScopeError> {
        let entries = self.scopes.entry(dimension).or_default();
        if entries.iter().any(|d| d.name == definition.name) {
            return Err(ScopeError::DuplicateScope {
                dimension,
                name: definition.name,
            });
        }
        entries.push(definition);
        Ok(())
    }

    /// Builder-style registration; a duplicate replaces the earlier scope.
    pub fn with_scope(mut self, dimension: Dimension, definition: ScopeDefinition) -> Self {
        let entries = self.scopes.entry(dimension).or_default();
        entries.retain(|d| d.name != definition.name);
        entries.push(definition);
        self
    }

    /// All scopes of a dimension.
    pub fn scopes(&self, dimension: Dimension) -> &[ScopeDefinition] {
        self.scopes.get(&dimension).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Looks up a scope by name.
    pub fn find(&self, dimension: Dimension, name: &str) -> Option<&ScopeDefinition> {
        self.scopes(dimension).iter().find(|d| d.name == name)
    }

    pub fn names(&self, dimension: Dimension) -> Vec<&str> {
        self.scopes(dimension).iter().map(|d| d.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn full_result() -> Value {
        json!({
            "score": 0.42,
            "segments": [{"safe": true}, {"safe": false}],
            "center": {"lat": 47.2, "lon": -1.55}
        })
    }

    #[test]
    fn test_identity_scope() {
        let scope = ScopeDefinition::identity("complete");
        assert_eq!(scope.select(&full_result()), full_result());
    }

    #[test]
    fn test_pointer_scope() {
        let scope = ScopeDefinition::pointer("lat", "/center/lat");
        assert_eq!(scope.select(&full_result()), json!(47.2));
    }

    #[test]
    fn test_pointer_scope_missing_is_null() {
        let scope = ScopeDefinition::pointer("missing", "/nope");
        assert_eq!(scope.select(&full_result()), Value::Null);
    }

    #[test]
    fn test_fields_scope() {
        let scope = ScopeDefinition::fields("meta", &["score", "center", "absent"]);
        assert_eq!(
            scope.select(&full_result()),
            json!({"score": 0.42, "center": {"lat": 47.2, "lon": -1.55}})
        );
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = ScopeRegistry::new();
        registry
            .register(Dimension::Cycling, ScopeDefinition::pointer("cycling-score", "/score"))
            .unwrap();
        registry
            .register(Dimension::Walking, ScopeDefinition::identity("complete"))
            .unwrap();

        assert!(registry.find(Dimension::Cycling, "cycling-score").is_some());
        assert!(registry.find(Dimension::Walking, "cycling-score").is_none());
        assert_eq!(registry.names(Dimension::Walking), vec!["complete"]);
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = ScopeRegistry::new();
        registry
            .register(Dimension::Cycling, ScopeDefinition::identity("complete"))
            .unwrap();
        let err = registry
            .register(Dimension::Cycling, ScopeDefinition::identity("complete"))
            .unwrap_err();
        assert!(matches!(err, ScopeError::DuplicateScope { .. }));
    }

    #[test]
    fn test_with_scope_replaces_and_keeps_order() {
        let registry = ScopeRegistry::new()
            .with_scope(Dimension::Cycling, ScopeDefinition::identity("a"))
            .with_scope(Dimension::Cycling, ScopeDefinition::identity("b"))
            .with_scope(Dimension::Cycling, ScopeDefinition::pointer("a", "/score"));

        assert_eq!(registry.names(Dimension::Cycling), vec!["b", "a"]);
        assert_eq!(
            registry
                .find(Dimension::Cycling, "a")
                .unwrap()
                .select(&full_result()),
            json!(0.42)
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = ScopeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.scopes(Dimension::Walking).is_empty());
    }
}
