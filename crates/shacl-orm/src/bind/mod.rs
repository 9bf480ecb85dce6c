//! Runtime binder: schema + instance graph → [`Entity`].
//!
//! Binding selects the root subject by `rdf:type`, reads every property
//! through its path, converts literals with the datatype registry, binds
//! nested nodes recursively, and enforces `sh:maxCount`.

mod entity;

pub use entity::{Entity, FieldValue};

use std::sync::Arc;

use crate::convert::DatatypeRegistry;
use crate::error::BindError;
use crate::graph::TripleStore;
use crate::model::{Schema, Term, ValueKind};
use crate::registry::SchemaRegistry;
use crate::vocab::terms;

/// Options for binding.
#[derive(Debug, Clone, Default)]
pub struct BindOptions {
    /// Reject literals whose own datatype differs from the declared one.
    /// When false, the lexical form is decoded with the declared datatype.
    pub check_literal_datatype: bool,
}

/// Binds instance graphs against compiled schemas.
#[derive(Debug, Clone)]
pub struct Binder<'a> {
    registry: &'a SchemaRegistry,
    datatypes: &'a DatatypeRegistry,
    options: BindOptions,
}

impl<'a> Binder<'a> {
    pub fn new(registry: &'a SchemaRegistry, datatypes: &'a DatatypeRegistry) -> Self {
        Self {
            registry,
            datatypes,
            options: BindOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BindOptions) -> Self {
        self.options = options;
        self
    }

    /// Binds the single subject typed with the schema's target type.
    pub fn bind<G: TripleStore + ?Sized>(
        &self,
        schema: &Arc<Schema>,
        graph: &G,
    ) -> Result<Entity, BindError> {
        let mut roots = self.roots(schema, graph);
        let root = match roots.len() {
            0 => {
                return Err(BindError::NoMatchingEntity {
                    schema: schema.name.clone(),
                    target: schema.target_type.to_string(),
                });
            }
            1 => roots.remove(0),
            count => {
                return Err(BindError::AmbiguousRootEntity {
                    schema: schema.name.clone(),
                    target: schema.target_type.to_string(),
                    count,
                });
            }
        };
        tracing::debug!(schema = %schema.name, root = %root, "bind: selected root");
        self.bind_subject(schema, graph, &root)
    }

    /// Looks up the schema for `type_iri` in the registry and binds it.
    pub fn bind_type<G: TripleStore + ?Sized>(
        &self,
        type_iri: &str,
        graph: &G,
    ) -> Result<Entity, BindError> {
        let schema = self
            .registry
            .by_target_type(type_iri)
            .ok_or_else(|| BindError::UnknownTargetType {
                target: type_iri.to_string(),
            })?;
        self.bind(schema, graph)
    }

    /// Binds every subject of the target type, in sorted subject order.
    pub fn bind_all<G: TripleStore + ?Sized>(
        &self,
        schema: &Arc<Schema>,
        graph: &G,
    ) -> Result<Vec<Entity>, BindError> {
        let mut roots = self.roots(schema, graph);
        roots.sort();
        tracing::debug!(schema = %schema.name, count = roots.len(), "bind: binding all roots");
        roots
            .iter()
            .map(|root| self.bind_subject(schema, graph, root))
            .collect()
    }

    /// Binds an explicit subject, with no `rdf:type` requirement.
    pub fn bind_subject<G: TripleStore + ?Sized>(
        &self,
        schema: &Arc<Schema>,
        graph: &G,
        subject: &Term,
    ) -> Result<Entity, BindError> {
        let mut entity = self.new_entity(schema, subject.clone());
        for (index, property) in schema.properties.iter().enumerate() {
            let objects = graph.objects(subject, &Term::Iri(property.path.clone()));
            tracing::trace!(
                schema = %schema.name,
                property = %property.name,
                count = objects.len(),
                "bind: property values"
            );
            for object in &objects {
                let value = match &property.kind {
                    ValueKind::Datatype(datatype) => {
                        let Term::Literal(literal) = object else {
                            return Err(BindError::ExpectedLiteral {
                                property: property.name.clone(),
                                found: object.to_string(),
                            });
                        };
                        if self.options.check_literal_datatype
                            && literal.datatype.as_ref() != datatype.as_ref()
                        {
                            return Err(BindError::LiteralDatatypeMismatch {
                                property: property.name.clone(),
                                declared: datatype.to_string(),
                                found: literal.datatype.to_string(),
                            });
                        }
                        let value = self
                            .datatypes
                            .decode(datatype, &literal.lexical)
                            .map_err(|source| BindError::Convert {
                                property: property.name.clone(),
                                source,
                            })?;
                        FieldValue::Literal(value)
                    }
                    ValueKind::Nested(nested) => {
                        if object.is_literal() {
                            return Err(BindError::ExpectedNode {
                                property: property.name.clone(),
                                found: object.to_string(),
                            });
                        }
                        FieldValue::Entity(Box::new(self.bind_subject(nested, graph, object)?))
                    }
                };
                entity.push(index, value);
            }
            entity::check_count(schema, property, objects.len())?;
        }
        Ok(entity)
    }

    /// An empty entity for `schema`, for building data to write back.
    pub fn new_entity(&self, schema: &Arc<Schema>, subject: Term) -> Entity {
        Entity::new(schema.clone(), subject, self.datatypes)
    }

    fn roots<G: TripleStore + ?Sized>(&self, schema: &Schema, graph: &G) -> Vec<Term> {
        graph.subjects(&terms::RDF_TYPE, &Term::Iri(schema.target_type.clone()))
    }
}
