//! Shape compiler: shapes graph → [`SchemaRegistry`].
//!
//! Compilation runs in three passes:
//! 1. discover shape subjects and read their declarations
//! 2. order the declarations so `sh:node` targets precede their users
//! 3. build and register schemas in that order
//!
//! The first violation aborts the run and nothing is returned, so a failed
//! compilation never leaves a partial registry behind.

mod order;
mod shape;

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::convert::DatatypeRegistry;
use crate::error::CompileError;
use crate::graph::TripleStore;
use crate::model::{NamespaceResolver, Property, Schema, Term, ValueKind};
use crate::registry::SchemaRegistry;
use crate::vocab::xsd;

use shape::{KindDecl, PropertyDecl, ShapeDecl};

/// Options for shape compilation.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Datatype for properties that declare neither `sh:datatype` nor `sh:node`.
    pub default_datatype: String,
    /// Reject datatypes the datatype registry cannot convert.
    pub require_known_datatypes: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            default_datatype: xsd::STRING.to_string(),
            require_known_datatypes: false,
        }
    }
}

/// Compiles shapes graphs with a fixed set of options.
#[derive(Debug, Clone)]
pub struct ShapeCompiler<'a> {
    options: CompileOptions,
    datatypes: &'a DatatypeRegistry,
}

impl ShapeCompiler<'static> {
    /// Creates a compiler that checks datatypes against the built-in registry.
    pub fn new(options: CompileOptions) -> Self {
        Self::with_datatypes(options, DatatypeRegistry::builtin())
    }
}

impl Default for ShapeCompiler<'static> {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

impl<'a> ShapeCompiler<'a> {
    pub fn with_datatypes(options: CompileOptions, datatypes: &'a DatatypeRegistry) -> Self {
        Self { options, datatypes }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles every shape in `graph`.
    pub fn compile<G: TripleStore + ?Sized>(
        &self,
        graph: &G,
        namespaces: &NamespaceResolver,
    ) -> Result<SchemaRegistry, CompileError> {
        let subjects = shape::discover(graph);
        tracing::debug!(shapes = subjects.len(), "compile: discovered shapes");

        let decls = subjects
            .iter()
            .map(|subject| shape::read_shape(graph, subject))
            .collect::<Result<Vec<_>, _>>()?;

        let order = order::dependency_order(&decls)?;
        tracing::debug!(
            order = ?order.iter().map(|&i| decls[i].name.as_str()).collect::<Vec<_>>(),
            "compile: dependency order"
        );

        let by_subject: FxHashMap<&Term, &str> = decls
            .iter()
            .map(|d| (&d.subject, d.name.as_str()))
            .collect();

        let mut registry = SchemaRegistry::new(namespaces.clone());
        for &i in &order {
            let schema = self.build_schema(&decls[i], &by_subject, &registry)?;
            tracing::debug!(
                schema = %schema.name,
                target = %schema.target_type,
                properties = schema.properties.len(),
                "compile: registered schema"
            );
            registry.register(Arc::new(schema))?;
        }
        Ok(registry)
    }

    fn build_schema(
        &self,
        decl: &ShapeDecl,
        by_subject: &FxHashMap<&Term, &str>,
        registry: &SchemaRegistry,
    ) -> Result<Schema, CompileError> {
        let properties = decl
            .properties
            .iter()
            .map(|p| self.build_property(decl, p, by_subject, registry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Schema {
            name: decl.name.clone(),
            target_type: decl.target.clone(),
            qualified_target: registry.namespaces().resolve(&decl.target),
            shape: decl.subject.clone(),
            properties,
        })
    }

    fn build_property(
        &self,
        decl: &ShapeDecl,
        property: &PropertyDecl,
        by_subject: &FxHashMap<&Term, &str>,
        registry: &SchemaRegistry,
    ) -> Result<Property, CompileError> {
        let unknown_nested = |reference: &Term| CompileError::UnknownNestedSchema {
            shape: decl.name.clone(),
            property: property.name.clone(),
            reference: reference.to_string(),
        };

        let kind = match &property.kind {
            KindDecl::Datatype(iri) => ValueKind::Datatype(iri.clone()),
            KindDecl::Default => {
                ValueKind::Datatype(Arc::from(self.options.default_datatype.as_str()))
            }
            KindDecl::Node(reference) => {
                let schema = by_subject
                    .get(reference)
                    .and_then(|name| registry.by_name(name))
                    .ok_or_else(|| unknown_nested(reference))?;
                ValueKind::Nested(schema.clone())
            }
        };

        if let ValueKind::Datatype(iri) = &kind {
            if self.options.require_known_datatypes && !self.datatypes.contains(iri) {
                return Err(CompileError::UnsupportedDatatype {
                    shape: decl.name.clone(),
                    property: property.name.clone(),
                    datatype: iri.to_string(),
                });
            }
        }

        let namespaces = registry.namespaces();
        let qualified_datatype = match &kind {
            ValueKind::Datatype(iri) => namespaces.resolve(iri),
            ValueKind::Nested(_) => None,
        };
        tracing::trace!(
            shape = %decl.name,
            property = %property.name,
            path = %property.path,
            max_count = ?property.max_count,
            "compile: property"
        );

        Ok(Property {
            name: property.name.clone(),
            path: property.path.clone(),
            kind,
            max_count: property.max_count,
            constraints: property.constraints.clone(),
            qualified_path: namespaces.resolve(&property.path),
            qualified_datatype,
        })
    }
}

/// Compiles a shapes graph with default options.
pub fn compile<G: TripleStore + ?Sized>(
    graph: &G,
    namespaces: &NamespaceResolver,
) -> Result<SchemaRegistry, CompileError> {
    ShapeCompiler::default().compile(graph, namespaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;
    use crate::model::builder::ShapesBuilder;

    fn namespaces() -> NamespaceResolver {
        let mut ns = NamespaceResolver::with_defaults();
        ns.insert("ex", "http://example.org/").unwrap();
        ns.insert("hsterms", "http://hydroshare.org/terms/").unwrap();
        ns.insert("dc", "http://purl.org/dc/elements/1.1/").unwrap();
        ns
    }

    fn shapes() -> ShapesBuilder {
        ShapesBuilder::new()
            .prefix("ex", "http://example.org/")
            .prefix("hsterms", "http://hydroshare.org/terms/")
            .prefix("dc", "http://purl.org/dc/elements/1.1/")
    }

    fn resource_shapes() -> MemoryGraph {
        shapes()
            .node_shape("ex:ResourceShape", |s| {
                s.name("Resource")
                    .target_class("hsterms:resource")
                    .property(|p| {
                        p.name("title")
                            .path("dc:title")
                            .datatype("xsd:string")
                            .max_count(1)
                    })
                    .property(|p| p.name("creator").path("dc:creator").node("ex:CreatorShape"))
            })
            .node_shape("ex:CreatorShape", |s| {
                s.name("Creator")
                    .target_class("hsterms:Creator")
                    .property(|p| p.name("name").path("hsterms:name"))
            })
            .build()
    }

    #[test]
    fn test_compile_resource() {
        let reg = compile(&resource_shapes(), &namespaces()).unwrap();
        let names: Vec<_> = reg.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Creator", "Resource"]);

        let resource = reg.by_target_type("http://hydroshare.org/terms/resource").unwrap();
        assert_eq!(resource.name, "Resource");
        assert_eq!(resource.target_label(), "hsterms:resource");

        let title = resource.property("title").unwrap();
        assert_eq!(title.path.as_ref(), "http://purl.org/dc/elements/1.1/title");
        assert_eq!(title.datatype(), Some(xsd::STRING));
        assert_eq!(title.max_count, Some(1));

        let creator = resource.property("creator").unwrap();
        assert_eq!(creator.nested().unwrap().name, "Creator");
        assert!(Arc::ptr_eq(creator.nested().unwrap(), reg.by_name("Creator").unwrap()));

        let name = reg.by_name("Creator").unwrap().property("name").unwrap();
        assert_eq!(name.datatype(), Some(xsd::STRING));
        assert_eq!(name.max_count, None);
    }

    #[test]
    fn test_parameters() {
        let reg = compile(&resource_shapes(), &namespaces()).unwrap();
        let params = reg.by_name("Resource").unwrap().parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "title");
        assert_eq!(params[0].kind, "xsd:string");
        assert_eq!(params[0].path, "dc:title");
        assert_eq!(params[0].max_count, Some(1));
        assert_eq!(params[1].kind, "Creator");
        assert_eq!(params[1].path, "dc:creator");
    }

    #[test]
    fn test_compile_is_idempotent() {
        let graph = resource_shapes();
        let a = compile(&graph, &namespaces()).unwrap();
        let b = compile(&graph, &namespaces()).unwrap();
        assert_eq!(a, b);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.fingerprint(), y.fingerprint());
        }
    }

    #[test]
    fn test_conflicting_constraint_any_order() {
        let datatype_first = shapes()
            .node_shape("ex:S", |s| {
                s.target_class("ex:T")
                    .property(|p| p.name("p").path("ex:p").datatype("xsd:string").node("ex:S"))
            })
            .build();
        let node_first = shapes()
            .node_shape("ex:S", |s| {
                s.target_class("ex:T")
                    .property(|p| p.name("p").path("ex:p").node("ex:S").datatype("xsd:string"))
            })
            .build();
        for graph in [datatype_first, node_first] {
            assert_eq!(
                compile(&graph, &namespaces()).unwrap_err(),
                CompileError::ConflictingConstraint {
                    shape: "S".to_string(),
                    property: "p".to_string(),
                }
            );
        }
    }

    #[test]
    fn test_unknown_nested_any_order() {
        let with_sibling = |sibling_first: bool| {
            let sibling = |b: ShapesBuilder| b.node_shape("ex:Other", |s| s.target_class("ex:O"));
            let user = |b: ShapesBuilder| {
                b.node_shape("ex:User", |s| {
                    s.target_class("ex:U")
                        .property(|p| p.name("ref").path("ex:ref").node("ex:Missing"))
                })
            };
            if sibling_first {
                user(sibling(shapes())).build()
            } else {
                sibling(user(shapes())).build()
            }
        };
        for graph in [with_sibling(true), with_sibling(false)] {
            assert!(matches!(
                compile(&graph, &namespaces()),
                Err(CompileError::UnknownNestedSchema { ref shape, .. }) if shape == "User"
            ));
        }
    }

    #[test]
    fn test_nested_declared_after_user() {
        // Discovery order puts the user first; dependency order fixes it.
        let graph = shapes()
            .node_shape("ex:A", |s| {
                s.target_class("ex:TA")
                    .property(|p| p.name("b").path("ex:b").node("ex:B"))
            })
            .node_shape("ex:B", |s| s.target_class("ex:TB"))
            .build();
        let reg = compile(&graph, &namespaces()).unwrap();
        let names: Vec<_> = reg.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn test_shape_referencing_node_shape() {
        // sh:Shape subjects are discovered before every sh:NodeShape.
        let graph = shapes()
            .node_shape("ex:B", |s| s.name("B").target_class("ex:TB"))
            .shape("ex:A", |s| {
                s.name("A")
                    .target_class("ex:TA")
                    .property(|p| p.name("b").path("ex:b").node("ex:B"))
            })
            .build();
        let reg = compile(&graph, &namespaces()).unwrap();
        let names: Vec<_> = reg.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        let a = reg.by_name("A").unwrap();
        let deps: Vec<_> = a.dependencies().map(|d| d.name.as_str()).collect();
        assert_eq!(deps, ["B"]);
        assert!(Arc::ptr_eq(a.dependencies().next().unwrap(), reg.by_name("B").unwrap()));
    }

    #[test]
    fn test_cycle_rejected() {
        let graph = shapes()
            .node_shape("ex:A", |s| {
                s.target_class("ex:TA")
                    .property(|p| p.name("b").path("ex:b").node("ex:B"))
            })
            .node_shape("ex:B", |s| {
                s.target_class("ex:TB")
                    .property(|p| p.name("a").path("ex:a").node("ex:A"))
            })
            .build();
        assert_eq!(
            compile(&graph, &namespaces()).unwrap_err(),
            CompileError::CyclicDependency {
                shapes: vec!["A".to_string(), "B".to_string()],
            }
        );
    }

    #[test]
    fn test_duplicates_rejected() {
        let same_name = shapes()
            .node_shape("ex:S1", |s| s.name("S").target_class("ex:T1"))
            .node_shape("ex:S2", |s| s.name("S").target_class("ex:T2"))
            .build();
        assert_eq!(
            compile(&same_name, &namespaces()).unwrap_err(),
            CompileError::DuplicateSchema { name: "S".to_string() }
        );

        let same_target = shapes()
            .node_shape("ex:S1", |s| s.target_class("ex:T"))
            .node_shape("ex:S2", |s| s.target_class("ex:T"))
            .build();
        assert!(matches!(
            compile(&same_target, &namespaces()),
            Err(CompileError::DuplicateTargetType { .. })
        ));
    }

    #[test]
    fn test_options() {
        let graph = shapes()
            .node_shape("ex:S", |s| {
                s.target_class("ex:T")
                    .property(|p| p.name("plain").path("ex:plain"))
                    .property(|p| p.name("custom").path("ex:custom").datatype("ex:Custom"))
            })
            .build();

        let lenient = ShapeCompiler::new(CompileOptions {
            default_datatype: xsd::TOKEN.to_string(),
            require_known_datatypes: false,
        });
        let reg = lenient.compile(&graph, &namespaces()).unwrap();
        let schema = reg.by_name("S").unwrap();
        assert_eq!(schema.property("plain").unwrap().datatype(), Some(xsd::TOKEN));
        assert_eq!(
            schema.property("custom").unwrap().datatype(),
            Some("http://example.org/Custom")
        );

        let strict = ShapeCompiler::new(CompileOptions {
            require_known_datatypes: true,
            ..CompileOptions::default()
        });
        assert!(matches!(
            strict.compile(&graph, &namespaces()),
            Err(CompileError::UnsupportedDatatype { ref property, .. }) if property == "custom"
        ));
    }

    #[test]
    fn test_unqualified_path() {
        let graph = shapes()
            .node_shape("ex:S", |s| {
                s.target_class("ex:T")
                    .property(|p| p.name("p").path("http://elsewhere.net/p"))
            })
            .build();
        let reg = compile(&graph, &namespaces()).unwrap();
        let p = reg.by_name("S").unwrap().property("p").unwrap();
        assert_eq!(p.qualified_path, None);
        assert_eq!(p.path_label(), "http://elsewhere.net/p");
    }

    #[test]
    fn test_empty_graph() {
        let reg = compile(&MemoryGraph::new(), &namespaces()).unwrap();
        assert!(reg.is_empty());
    }
}
