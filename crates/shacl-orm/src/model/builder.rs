//! Builder API for ergonomic graph construction.
//!
//! Shapes graphs and instance graphs are normally parsed from Turtle by the
//! caller. These builders cover tests and programmatic setups.
//!
//! Names may be absolute IRIs, `prefix:local` names, or `_:label` blank
//! nodes. Prefixed names are expanded against the builder's prefixes and the
//! rdf/rdfs/sh/xsd defaults when the graph is built; names whose prefix is
//! unknown are used verbatim as IRIs.
//!
//! # Example
//!
//! ```rust
//! use shacl_orm::model::builder::{InstanceBuilder, ShapesBuilder};
//!
//! let shapes = ShapesBuilder::new()
//!     .prefix("ex", "http://example.org/")
//!     .prefix("dc", "http://purl.org/dc/elements/1.1/")
//!     .node_shape("ex:ResourceShape", |s| s
//!         .name("Resource")
//!         .target_class("ex:Resource")
//!         .property(|p| p.name("title").path("dc:title").datatype("xsd:string").max_count(1))
//!     )
//!     .build();
//!
//! let data = InstanceBuilder::new()
//!     .prefix("ex", "http://example.org/")
//!     .prefix("dc", "http://purl.org/dc/elements/1.1/")
//!     .entity("ex:r1", "ex:Resource", |e| e.literal("dc:title", "Sample"))
//!     .build();
//!
//! assert_eq!(shapes.len(), 8);
//! assert_eq!(data.len(), 2);
//! ```

use std::collections::BTreeMap;

use crate::graph::MemoryGraph;
use crate::model::Term;
use crate::vocab::{terms, DEFAULT_PREFIXES};

/// An object position awaiting name expansion.
#[derive(Debug, Clone)]
enum Object {
    /// IRI, `prefix:local` or `_:label`.
    Name(String),
    /// Literal with a possibly prefixed datatype.
    Typed { lexical: String, datatype: String },
    Term(Term),
}

/// Resolves a builder name to a term.
fn expand(prefixes: &BTreeMap<String, String>, name: &str) -> Term {
    if let Some(label) = name.strip_prefix("_:") {
        return Term::blank(label);
    }
    if let Some((prefix, local)) = name.split_once(':') {
        if !local.starts_with("//") {
            let base = prefixes.get(prefix).map(String::as_str).or_else(|| {
                DEFAULT_PREFIXES
                    .iter()
                    .find(|(p, _)| *p == prefix)
                    .map(|(_, base)| *base)
            });
            if let Some(base) = base {
                return Term::iri(format!("{}{}", base, local));
            }
        }
    }
    Term::iri(name)
}

fn resolve(prefixes: &BTreeMap<String, String>, object: Object) -> Term {
    match object {
        Object::Name(name) => expand(prefixes, &name),
        Object::Typed { lexical, datatype } => match expand(prefixes, &datatype) {
            Term::Iri(iri) => Term::typed(lexical, iri),
            _ => Term::typed(lexical, datatype),
        },
        Object::Term(term) => term,
    }
}

// =========================================================================
// Shapes
// =========================================================================

/// Builder for a shapes graph.
#[derive(Debug, Clone, Default)]
pub struct ShapesBuilder {
    graph: MemoryGraph,
}

impl ShapesBuilder {
    /// Creates an empty ShapesBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a prefix, replacing any earlier binding. The prefix is also
    /// carried on the built graph.
    pub fn prefix(mut self, prefix: impl Into<String>, base: impl Into<String>) -> Self {
        self.graph.add_prefix(prefix, base);
        self
    }

    /// Adds a shape typed `sh:Shape`.
    pub fn shape<F>(self, subject: &str, f: F) -> Self
    where
        F: FnOnce(ShapeBuilder) -> ShapeBuilder,
    {
        self.add_shape(subject, terms::SH_SHAPE.clone(), f)
    }

    /// Adds a shape typed `sh:NodeShape`.
    pub fn node_shape<F>(self, subject: &str, f: F) -> Self
    where
        F: FnOnce(ShapeBuilder) -> ShapeBuilder,
    {
        self.add_shape(subject, terms::SH_NODE_SHAPE.clone(), f)
    }

    fn add_shape<F>(mut self, subject: &str, shape_type: Term, f: F) -> Self
    where
        F: FnOnce(ShapeBuilder) -> ShapeBuilder,
    {
        let shape = f(ShapeBuilder::default());
        let subject = expand(&self.graph.prefixes, subject);
        self.graph
            .add(subject.clone(), terms::RDF_TYPE.clone(), shape_type);

        for (predicate, object) in shape.pairs {
            let predicate = expand(&self.graph.prefixes, &predicate);
            let object = resolve(&self.graph.prefixes, object);
            self.graph.add(subject.clone(), predicate, object);
        }
        for property in shape.properties {
            let node = Term::fresh_blank();
            self.graph
                .add(subject.clone(), terms::SH_PROPERTY.clone(), node.clone());
            for (predicate, object) in property.pairs {
                let predicate = expand(&self.graph.prefixes, &predicate);
                let object = resolve(&self.graph.prefixes, object);
                self.graph.add(node.clone(), predicate, object);
            }
        }
        self
    }

    /// Returns the number of triples added so far.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn build(self) -> MemoryGraph {
        self.graph
    }
}

/// Builder for one shape's own triples and its property shapes.
#[derive(Debug, Clone, Default)]
pub struct ShapeBuilder {
    pairs: Vec<(String, Object)>,
    properties: Vec<PropertyBuilder>,
}

impl ShapeBuilder {
    /// Sets `sh:name`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.pairs
            .push(("sh:name".to_string(), Object::Term(Term::string(name.into()))));
        self
    }

    /// Sets `sh:targetClass`.
    pub fn target_class(mut self, class: impl Into<String>) -> Self {
        self.pairs
            .push(("sh:targetClass".to_string(), Object::Name(class.into())));
        self
    }

    /// Adds an anonymous property shape.
    pub fn property<F>(mut self, f: F) -> Self
    where
        F: FnOnce(PropertyBuilder) -> PropertyBuilder,
    {
        self.properties.push(f(PropertyBuilder::default()));
        self
    }

    /// Adds a raw (predicate, object) pair on the shape.
    pub fn triple(mut self, predicate: impl Into<String>, object: Term) -> Self {
        self.pairs.push((predicate.into(), Object::Term(object)));
        self
    }
}

/// Builder for a property shape.
#[derive(Debug, Clone, Default)]
pub struct PropertyBuilder {
    pairs: Vec<(String, Object)>,
}

impl PropertyBuilder {
    /// Sets `sh:name`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.pairs
            .push(("sh:name".to_string(), Object::Term(Term::string(name.into()))));
        self
    }

    /// Sets `sh:path`.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.pairs.push(("sh:path".to_string(), Object::Name(path.into())));
        self
    }

    /// Sets `sh:datatype`.
    pub fn datatype(mut self, datatype: impl Into<String>) -> Self {
        self.pairs
            .push(("sh:datatype".to_string(), Object::Name(datatype.into())));
        self
    }

    /// Sets `sh:node`.
    pub fn node(mut self, shape: impl Into<String>) -> Self {
        self.pairs.push(("sh:node".to_string(), Object::Name(shape.into())));
        self
    }

    /// Sets `sh:maxCount` as an `xsd:integer` literal.
    pub fn max_count(mut self, max: u32) -> Self {
        self.pairs.push((
            "sh:maxCount".to_string(),
            Object::Typed {
                lexical: max.to_string(),
                datatype: "xsd:integer".to_string(),
            },
        ));
        self
    }

    /// Adds any other (predicate, object) pair.
    pub fn constraint(mut self, predicate: impl Into<String>, object: Term) -> Self {
        self.pairs.push((predicate.into(), Object::Term(object)));
        self
    }
}

// =========================================================================
// Instances
// =========================================================================

/// Builder for an instance graph.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    graph: MemoryGraph,
}

impl InstanceBuilder {
    /// Creates an empty InstanceBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a prefix, replacing any earlier binding.
    pub fn prefix(mut self, prefix: impl Into<String>, base: impl Into<String>) -> Self {
        self.graph.add_prefix(prefix, base);
        self
    }

    /// Adds a typed entity: `subject rdf:type type_name` plus the builder's values.
    pub fn entity<F>(mut self, subject: &str, type_name: &str, f: F) -> Self
    where
        F: FnOnce(EntityBuilder) -> EntityBuilder,
    {
        let s = expand(&self.graph.prefixes, subject);
        let t = expand(&self.graph.prefixes, type_name);
        self.graph.add(s, terms::RDF_TYPE.clone(), t);
        self.node(subject, f)
    }

    /// Adds values to a subject without asserting a type.
    pub fn node<F>(mut self, subject: &str, f: F) -> Self
    where
        F: FnOnce(EntityBuilder) -> EntityBuilder,
    {
        let builder = f(EntityBuilder::default());
        let subject = expand(&self.graph.prefixes, subject);
        for (predicate, object) in builder.values {
            let predicate = expand(&self.graph.prefixes, &predicate);
            let object = resolve(&self.graph.prefixes, object);
            self.graph.add(subject.clone(), predicate, object);
        }
        self
    }

    /// Adds a raw triple.
    pub fn triple(mut self, subject: Term, predicate: Term, object: Term) -> Self {
        self.graph.add(subject, predicate, object);
        self
    }

    pub fn build(self) -> MemoryGraph {
        self.graph
    }
}

/// Builder for one subject's values.
#[derive(Debug, Clone, Default)]
pub struct EntityBuilder {
    values: Vec<(String, Object)>,
}

impl EntityBuilder {
    /// Adds an `xsd:string` literal.
    pub fn literal(mut self, predicate: impl Into<String>, lexical: impl Into<String>) -> Self {
        self.values
            .push((predicate.into(), Object::Term(Term::string(lexical.into()))));
        self
    }

    /// Adds a literal with an explicit (possibly prefixed) datatype.
    pub fn typed(
        mut self,
        predicate: impl Into<String>,
        lexical: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Self {
        self.values.push((
            predicate.into(),
            Object::Typed {
                lexical: lexical.into(),
                datatype: datatype.into(),
            },
        ));
        self
    }

    /// Adds a link to another node by name.
    pub fn link(mut self, predicate: impl Into<String>, object: impl Into<String>) -> Self {
        self.values.push((predicate.into(), Object::Name(object.into())));
        self
    }

    /// Adds an arbitrary object term.
    pub fn value(mut self, predicate: impl Into<String>, object: Term) -> Self {
        self.values.push((predicate.into(), Object::Term(object)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TripleStore;
    use crate::vocab::{sh, xsd};

    #[test]
    fn test_expand_names() {
        let mut prefixes = BTreeMap::new();
        prefixes.insert("ex".to_string(), "http://example.org/".to_string());
        assert_eq!(expand(&prefixes, "ex:a"), Term::iri("http://example.org/a"));
        assert_eq!(expand(&prefixes, "xsd:int"), Term::iri(xsd::INT));
        assert_eq!(expand(&prefixes, "_:n1"), Term::blank("n1"));
        assert_eq!(
            expand(&prefixes, "http://other.org/x"),
            Term::iri("http://other.org/x")
        );
        assert_eq!(expand(&prefixes, "urn:isbn:1"), Term::iri("urn:isbn:1"));
    }

    #[test]
    fn test_shapes_builder() {
        let g = ShapesBuilder::new()
            .prefix("ex", "http://example.org/")
            .node_shape("ex:PersonShape", |s| {
                s.name("Person")
                    .target_class("ex:Person")
                    .property(|p| p.name("age").path("ex:age").datatype("xsd:integer").max_count(1))
                    .property(|p| p.name("friend").path("ex:friend").node("ex:PersonShape"))
            })
            .build();

        let shape = Term::iri("http://example.org/PersonShape");
        assert_eq!(
            g.value(&shape, &terms::RDF_TYPE),
            Some(Term::iri(sh::NODE_SHAPE))
        );
        let props = g.objects(&shape, &terms::SH_PROPERTY);
        assert_eq!(props.len(), 2);
        assert!(props.iter().all(|p| matches!(p, Term::Blank(_))));
        assert_ne!(props[0], props[1]);
        assert_eq!(
            g.value(&props[0], &terms::SH_MAX_COUNT),
            Some(Term::typed("1", xsd::INTEGER))
        );
        assert_eq!(g.prefixes.get("ex").map(String::as_str), Some("http://example.org/"));
    }

    #[test]
    fn test_instance_builder() {
        let g = InstanceBuilder::new()
            .prefix("ex", "http://example.org/")
            .entity("ex:alice", "ex:Person", |e| {
                e.literal("ex:name", "Alice")
                    .typed("ex:age", "42", "xsd:integer")
                    .link("ex:friend", "_:bob")
            })
            .node("_:bob", |e| e.literal("ex:name", "Bob"))
            .build();

        let alice = Term::iri("http://example.org/alice");
        assert_eq!(g.len(), 5);
        assert_eq!(
            g.value(&alice, &Term::iri("http://example.org/age")),
            Some(Term::typed("42", xsd::INTEGER))
        );
        assert_eq!(
            g.value(&alice, &Term::iri("http://example.org/friend")),
            Some(Term::blank("bob"))
        );
    }
}
