//! Schema descriptors: the compiled, immutable form of a shape.
//!
//! A [`Schema`] is plain data. Code emitters read it through
//! [`Schema::parameters`]; the binder reads it directly.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::model::{QName, Term};

/// What a property's values are: literals of a datatype, or nested entities.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// Datatype IRI, decoded through the datatype registry.
    Datatype(Arc<str>),
    /// Values are entities governed by another schema.
    Nested(Arc<Schema>),
}

/// One compiled property shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    /// Predicate IRI used to select values from the instance graph.
    pub path: Arc<str>,
    pub kind: ValueKind,
    /// Upper bound on value count; `None` means unbounded.
    pub max_count: Option<u32>,
    /// Unrecognized (predicate, object) pairs, in graph order.
    pub constraints: Vec<(Term, Term)>,
    pub qualified_path: Option<QName>,
    pub qualified_datatype: Option<QName>,
}

impl Property {
    pub fn datatype(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::Datatype(iri) => Some(iri),
            ValueKind::Nested(_) => None,
        }
    }

    pub fn nested(&self) -> Option<&Arc<Schema>> {
        match &self.kind {
            ValueKind::Nested(schema) => Some(schema),
            ValueKind::Datatype(_) => None,
        }
    }

    /// True when `sh:maxCount` is exactly 1.
    pub fn is_single_valued(&self) -> bool {
        self.max_count == Some(1)
    }

    /// Checks a value count against `max_count`.
    pub fn allows(&self, count: usize) -> bool {
        self.max_count.is_none_or(|max| count <= max as usize)
    }

    /// Qualified datatype, or the nested schema's name.
    pub fn kind_label(&self) -> String {
        match (&self.kind, &self.qualified_datatype) {
            (ValueKind::Nested(schema), _) => schema.name.clone(),
            (ValueKind::Datatype(_), Some(q)) => q.to_string(),
            (ValueKind::Datatype(iri), None) => iri.to_string(),
        }
    }

    /// Qualified path, falling back to the full IRI.
    pub fn path_label(&self) -> String {
        match &self.qualified_path {
            Some(q) => q.to_string(),
            None => self.path.to_string(),
        }
    }
}

/// Per-property summary consumed by code emitters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyParameter {
    pub name: String,
    pub kind: String,
    pub path: String,
    pub max_count: Option<u32>,
}

/// A compiled shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub name: String,
    /// `sh:targetClass` IRI; the root entity's `rdf:type`.
    pub target_type: Arc<str>,
    pub qualified_target: Option<QName>,
    /// The shape subject this schema was compiled from.
    pub shape: Term,
    /// Properties in declaration order; names are unique.
    pub properties: Vec<Property>,
}

impl Schema {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    /// Schemas referenced by nested properties.
    pub fn dependencies(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.properties.iter().filter_map(Property::nested)
    }

    /// Qualified target type, falling back to the full IRI.
    pub fn target_label(&self) -> String {
        match &self.qualified_target {
            Some(q) => q.to_string(),
            None => self.target_type.to_string(),
        }
    }

    pub fn parameters(&self) -> Vec<PropertyParameter> {
        self.properties
            .iter()
            .map(|p| PropertyParameter {
                name: p.name.clone(),
                kind: p.kind_label(),
                path: p.path_label(),
                max_count: p.max_count,
            })
            .collect()
    }

    /// Content hash of the descriptor, including nested schemas.
    ///
    /// ```text
    /// fingerprint = SHA-256(name || target || shape || properties...)[0:16]
    /// ```
    pub fn fingerprint(&self) -> [u8; 16] {
        let mut hasher = Sha256::new();
        put(&mut hasher, self.name.as_bytes());
        put(&mut hasher, self.target_type.as_bytes());
        put(&mut hasher, self.target_label().as_bytes());
        put(&mut hasher, self.shape.to_string().as_bytes());
        for p in &self.properties {
            put(&mut hasher, p.name.as_bytes());
            put(&mut hasher, p.path.as_bytes());
            put(&mut hasher, p.path_label().as_bytes());
            match &p.kind {
                ValueKind::Datatype(iri) => {
                    hasher.update([0u8]);
                    put(&mut hasher, iri.as_bytes());
                }
                ValueKind::Nested(schema) => {
                    hasher.update([1u8]);
                    hasher.update(schema.fingerprint());
                }
            }
            match p.max_count {
                Some(max) => {
                    hasher.update([1u8]);
                    hasher.update(max.to_le_bytes());
                }
                None => hasher.update([0u8]),
            }
            for (predicate, object) in &p.constraints {
                put(&mut hasher, predicate.to_string().as_bytes());
                put(&mut hasher, object.to_string().as_bytes());
            }
        }
        let hash = hasher.finalize();

        let mut id = [0u8; 16];
        id.copy_from_slice(&hash[..16]);
        id
    }
}

/// Length-prefixed write so adjacent fields cannot alias.
fn put(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
