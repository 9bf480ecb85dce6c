//! Compiled schemas, addressable by name and by target type.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::CompileError;
use crate::model::{NamespaceResolver, Schema};

/// The output of a compilation run.
///
/// Schemas are kept in registration order, which for a compiled registry is
/// dependency order: every nested schema precedes the schemas that use it.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<Arc<Schema>>,
    by_name: FxHashMap<String, usize>,
    by_target: FxHashMap<Arc<str>, usize>,
    namespaces: NamespaceResolver,
}

impl SchemaRegistry {
    /// Creates an empty registry using the given prefix table.
    pub fn new(namespaces: NamespaceResolver) -> Self {
        Self {
            namespaces,
            ..Self::default()
        }
    }

    /// Adds a schema.
    ///
    /// Names and target types must both be unique. On error the registry is
    /// unchanged.
    pub fn register(&mut self, schema: Arc<Schema>) -> Result<(), CompileError> {
        if self.by_name.contains_key(&schema.name) {
            return Err(CompileError::DuplicateSchema {
                name: schema.name.clone(),
            });
        }
        if let Some(&existing) = self.by_target.get(&schema.target_type) {
            return Err(CompileError::DuplicateTargetType {
                target: schema.target_type.to_string(),
                existing: self.schemas[existing].name.clone(),
                name: schema.name.clone(),
            });
        }
        let index = self.schemas.len();
        self.by_name.insert(schema.name.clone(), index);
        self.by_target.insert(schema.target_type.clone(), index);
        self.schemas.push(schema);
        Ok(())
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<Schema>> {
        self.by_name.get(name).map(|&i| &self.schemas[i])
    }

    pub fn by_target_type(&self, iri: &str) -> Option<&Arc<Schema>> {
        self.by_target.get(iri).map(|&i| &self.schemas[i])
    }

    /// Iterates schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// The prefix table the schemas were qualified with.
    pub fn namespaces(&self) -> &NamespaceResolver {
        &self.namespaces
    }
}

impl PartialEq for SchemaRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.schemas == other.schemas && self.namespaces == other.namespaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Term;

    fn schema(name: &str, target: &str) -> Arc<Schema> {
        Arc::new(Schema {
            name: name.to_string(),
            target_type: Arc::from(target),
            qualified_target: None,
            shape: Term::iri(format!("http://example.org/{}Shape", name)),
            properties: vec![],
        })
    }

    #[test]
    fn test_lookup() {
        let mut reg = SchemaRegistry::default();
        reg.register(schema("A", "http://example.org/A")).unwrap();
        reg.register(schema("B", "http://example.org/B")).unwrap();

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.by_name("B").unwrap().target_type.as_ref(), "http://example.org/B");
        assert_eq!(reg.by_target_type("http://example.org/A").unwrap().name, "A");
        assert!(reg.by_name("C").is_none());
        let names: Vec<_> = reg.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut reg = SchemaRegistry::default();
        reg.register(schema("A", "http://example.org/A")).unwrap();

        let err = reg.register(schema("A", "http://example.org/Other")).unwrap_err();
        assert_eq!(err, CompileError::DuplicateSchema { name: "A".to_string() });

        let err = reg.register(schema("B", "http://example.org/A")).unwrap_err();
        assert!(matches!(
            err,
            CompileError::DuplicateTargetType { ref existing, .. } if existing == "A"
        ));
        assert_eq!(reg.len(), 1);
        assert!(reg.by_name("B").is_none());
    }
}
