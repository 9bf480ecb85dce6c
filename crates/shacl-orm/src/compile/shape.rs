//! Reads shape declarations out of a shapes graph.
//!
//! Declarations are the raw, unresolved form: nested references are still
//! shape subjects, and datatypes are still optional.

use std::sync::Arc;

use crate::error::CompileError;
use crate::graph::TripleStore;
use crate::model::Term;
use crate::vocab::{sh, terms};

/// How a property's values are typed, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum KindDecl {
    Datatype(Arc<str>),
    /// `sh:node` reference to another shape subject.
    Node(Term),
    /// Neither `sh:datatype` nor `sh:node` given.
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PropertyDecl {
    pub name: String,
    pub path: Arc<str>,
    pub kind: KindDecl,
    pub max_count: Option<u32>,
    pub constraints: Vec<(Term, Term)>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShapeDecl {
    pub subject: Term,
    pub name: String,
    pub target: Arc<str>,
    pub properties: Vec<PropertyDecl>,
}

impl ShapeDecl {
    /// Shape subjects this shape references through `sh:node`.
    pub fn references(&self) -> impl Iterator<Item = (&PropertyDecl, &Term)> {
        self.properties.iter().filter_map(|p| match &p.kind {
            KindDecl::Node(target) => Some((p, target)),
            _ => None,
        })
    }
}

/// Finds shape subjects: `sh:Shape` first, then `sh:NodeShape`, each in graph
/// order, without repeats.
pub(crate) fn discover<G: TripleStore + ?Sized>(graph: &G) -> Vec<Term> {
    let mut shapes = graph.subjects(&terms::RDF_TYPE, &terms::SH_SHAPE);
    for subject in graph.subjects(&terms::RDF_TYPE, &terms::SH_NODE_SHAPE) {
        if !shapes.contains(&subject) {
            shapes.push(subject);
        }
    }
    shapes
}

/// Text after the last `#` or `/` of an IRI.
fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

fn literal_text(term: &Term) -> Option<&str> {
    term.as_literal().map(|lit| lit.lexical.as_ref())
}

pub(crate) fn read_shape<G: TripleStore + ?Sized>(
    graph: &G,
    subject: &Term,
) -> Result<ShapeDecl, CompileError> {
    let named = graph
        .objects(subject, &terms::SH_NAME)
        .iter()
        .find_map(|t| literal_text(t).map(str::to_string));
    let name = match (named, subject) {
        (Some(name), _) => name,
        (None, Term::Iri(iri)) if !local_name(iri).is_empty() => local_name(iri).to_string(),
        _ => {
            return Err(CompileError::MissingRequiredField {
                subject: subject.to_string(),
                field: "sh:name",
            });
        }
    };

    let target = graph
        .objects(subject, &terms::SH_TARGET_CLASS)
        .into_iter()
        .find_map(|t| match t {
            Term::Iri(iri) => Some(iri),
            _ => None,
        })
        .ok_or_else(|| CompileError::MissingRequiredField {
            subject: subject.to_string(),
            field: "sh:targetClass",
        })?;

    let mut properties: Vec<PropertyDecl> = Vec::new();
    for node in graph.objects(subject, &terms::SH_PROPERTY) {
        let property = read_property(graph, &name, &node)?;
        if properties.iter().any(|p| p.name == property.name) {
            return Err(CompileError::DuplicateProperty {
                shape: name,
                property: property.name,
            });
        }
        properties.push(property);
    }

    Ok(ShapeDecl {
        subject: subject.clone(),
        name,
        target,
        properties,
    })
}

fn read_property<G: TripleStore + ?Sized>(
    graph: &G,
    shape: &str,
    node: &Term,
) -> Result<PropertyDecl, CompileError> {
    let mut name = None;
    let mut path = None;
    let mut datatypes = Vec::new();
    let mut nodes = Vec::new();
    let mut max_counts = Vec::new();
    let mut constraints = Vec::new();

    for (predicate, object) in graph.predicate_objects(node) {
        match predicate.as_iri() {
            Some(sh::NAME) => {
                if name.is_none() {
                    name = literal_text(&object).map(str::to_string);
                }
            }
            Some(sh::PATH) => {
                path.get_or_insert(object);
            }
            Some(sh::DATATYPE) => datatypes.push(object),
            Some(sh::NODE) => nodes.push(object),
            Some(sh::MAX_COUNT) => max_counts.push(object),
            _ => constraints.push((predicate, object)),
        }
    }

    let name = name.ok_or_else(|| CompileError::MissingRequiredField {
        subject: node.to_string(),
        field: "sh:name",
    })?;
    let path = match path {
        Some(Term::Iri(iri)) => iri,
        Some(other) => {
            return Err(CompileError::UnsupportedPath {
                shape: shape.to_string(),
                property: name,
                path: other.to_string(),
            });
        }
        None => {
            return Err(CompileError::MissingRequiredField {
                subject: node.to_string(),
                field: "sh:path",
            });
        }
    };

    if datatypes.len() + nodes.len() > 1 {
        return Err(CompileError::ConflictingConstraint {
            shape: shape.to_string(),
            property: name,
        });
    }
    let kind = match (datatypes.pop(), nodes.pop()) {
        (Some(Term::Iri(iri)), _) => KindDecl::Datatype(iri),
        (Some(other), _) => {
            return Err(CompileError::UnsupportedDatatype {
                shape: shape.to_string(),
                property: name,
                datatype: other.to_string(),
            });
        }
        (None, Some(target)) => KindDecl::Node(target),
        (None, None) => KindDecl::Default,
    };

    let max_count = match max_counts.as_slice() {
        [] => None,
        [term] => Some(parse_max_count(term).ok_or_else(|| CompileError::InvalidMaxCount {
            shape: shape.to_string(),
            property: name.clone(),
            value: term.to_string(),
        })?),
        [_, second, ..] => {
            return Err(CompileError::InvalidMaxCount {
                shape: shape.to_string(),
                property: name,
                value: second.to_string(),
            });
        }
    };

    Ok(PropertyDecl {
        name,
        path,
        kind,
        max_count,
        constraints,
    })
}

/// A non-negative integer literal.
fn parse_max_count(term: &Term) -> Option<u32> {
    let lexical = literal_text(term)?;
    let digits = lexical.strip_prefix('+').unwrap_or(lexical);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::ShapesBuilder;
    use crate::vocab::xsd;

    fn ex(local: &str) -> Term {
        Term::iri(format!("http://example.org/{}", local))
    }

    fn shapes() -> ShapesBuilder {
        ShapesBuilder::new().prefix("ex", "http://example.org/")
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("http://example.org/ns#Person"), "Person");
        assert_eq!(local_name("http://example.org/PersonShape"), "PersonShape");
        assert_eq!(local_name("http://example.org/"), "");
        assert_eq!(local_name("urn:x"), "urn:x");
    }

    #[test]
    fn test_discover_order() {
        let g = shapes()
            .node_shape("ex:B", |s| s.target_class("ex:TB"))
            .shape("ex:A", |s| s.target_class("ex:TA"))
            .build();
        assert_eq!(discover(&g), vec![ex("A"), ex("B")]);
    }

    #[test]
    fn test_discover_dual_typed_once() {
        let g = shapes()
            .shape("ex:A", |s| s.target_class("ex:TA"))
            .node_shape("ex:A", |s| s)
            .build();
        assert_eq!(discover(&g), vec![ex("A")]);
    }

    #[test]
    fn test_read_shape() {
        let g = shapes()
            .node_shape("ex:PersonShape", |s| {
                s.target_class("ex:Person")
                    .property(|p| {
                        p.name("age")
                            .path("ex:age")
                            .datatype("xsd:int")
                            .max_count(1)
                            .constraint("sh:minCount", Term::typed("0", xsd::INTEGER))
                    })
                    .property(|p| p.name("nick").path("ex:nick"))
            })
            .build();
        let decl = read_shape(&g, &ex("PersonShape")).unwrap();
        assert_eq!(decl.name, "PersonShape");
        assert_eq!(decl.target.as_ref(), "http://example.org/Person");
        assert_eq!(decl.properties.len(), 2);

        let age = &decl.properties[0];
        assert_eq!(age.kind, KindDecl::Datatype(Arc::from(xsd::INT)));
        assert_eq!(age.max_count, Some(1));
        assert_eq!(age.constraints.len(), 1);
        assert_eq!(decl.properties[1].kind, KindDecl::Default);
        assert_eq!(decl.properties[1].max_count, None);
    }

    #[test]
    fn test_missing_fields() {
        let g = shapes().node_shape("ex:S", |s| s.name("S")).build();
        assert!(matches!(
            read_shape(&g, &ex("S")),
            Err(CompileError::MissingRequiredField { field: "sh:targetClass", .. })
        ));

        let g = shapes()
            .node_shape("ex:S", |s| s.target_class("ex:T").property(|p| p.path("ex:p")))
            .build();
        assert!(matches!(
            read_shape(&g, &ex("S")),
            Err(CompileError::MissingRequiredField { field: "sh:name", .. })
        ));

        let g = shapes()
            .node_shape("ex:S", |s| s.target_class("ex:T").property(|p| p.name("p")))
            .build();
        assert!(matches!(
            read_shape(&g, &ex("S")),
            Err(CompileError::MissingRequiredField { field: "sh:path", .. })
        ));

        let g = shapes().node_shape("_:anon", |s| s.target_class("ex:T")).build();
        assert!(matches!(
            read_shape(&g, &Term::blank("anon")),
            Err(CompileError::MissingRequiredField { field: "sh:name", .. })
        ));
    }

    #[test]
    fn test_invalid_max_count() {
        for value in [Term::typed("-1", xsd::INTEGER), Term::string("one"), ex("x")] {
            let g = shapes()
                .node_shape("ex:S", |s| {
                    s.target_class("ex:T")
                        .property(|p| p.name("p").path("ex:p").constraint("sh:maxCount", value))
                })
                .build();
            assert!(matches!(
                read_shape(&g, &ex("S")),
                Err(CompileError::InvalidMaxCount { .. })
            ));
        }
    }

    #[test]
    fn test_unsupported_path() {
        let g = shapes()
            .node_shape("ex:S", |s| {
                s.target_class("ex:T")
                    .property(|p| p.name("p").path("_:seq"))
            })
            .build();
        assert!(matches!(
            read_shape(&g, &ex("S")),
            Err(CompileError::UnsupportedPath { .. })
        ));
    }

    #[test]
    fn test_duplicate_property() {
        let g = shapes()
            .node_shape("ex:S", |s| {
                s.target_class("ex:T")
                    .property(|p| p.name("p").path("ex:p"))
                    .property(|p| p.name("p").path("ex:q"))
            })
            .build();
        assert_eq!(
            read_shape(&g, &ex("S")),
            Err(CompileError::DuplicateProperty {
                shape: "S".to_string(),
                property: "p".to_string(),
            })
        );
    }
}
