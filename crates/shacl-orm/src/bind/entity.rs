//! Bound entities and their accessors.

use std::sync::Arc;

use crate::convert::DatatypeRegistry;
use crate::error::BindError;
use crate::model::{Property, Schema, Term, Triple, TypedValue, ValueKind, ValueType};
use crate::vocab::terms;

/// One value of an entity property.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Literal(TypedValue),
    Entity(Box<Entity>),
}

impl FieldValue {
    pub fn as_literal(&self) -> Option<&TypedValue> {
        match self {
            FieldValue::Literal(v) => Some(v),
            FieldValue::Entity(_) => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            FieldValue::Entity(e) => Some(e),
            FieldValue::Literal(_) => None,
        }
    }
}

impl From<TypedValue> for FieldValue {
    fn from(v: TypedValue) -> Self {
        FieldValue::Literal(v)
    }
}

impl From<Entity> for FieldValue {
    fn from(e: Entity) -> Self {
        FieldValue::Entity(Box::new(e))
    }
}

/// A subject of the instance graph, read through a schema.
///
/// The entity owns one value list per schema property. Writes go through
/// [`Entity::set`], which enforces the property's kind and `sh:maxCount`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    schema: Arc<Schema>,
    subject: Term,
    values: Vec<Vec<FieldValue>>,
    /// Value type per property; `None` for nested properties and for
    /// datatypes without a converter.
    value_types: Vec<Option<ValueType>>,
}

impl Entity {
    /// Creates an entity with every property empty.
    pub fn new(schema: Arc<Schema>, subject: Term, datatypes: &DatatypeRegistry) -> Self {
        let value_types = schema
            .properties
            .iter()
            .map(|p| p.datatype().and_then(|dt| datatypes.value_type(dt)))
            .collect();
        let values = vec![Vec::new(); schema.properties.len()];
        Self {
            schema,
            subject,
            values,
            value_types,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn subject(&self) -> &Term {
        &self.subject
    }

    fn index(&self, name: &str) -> Result<usize, BindError> {
        self.schema
            .property_index(name)
            .ok_or_else(|| BindError::UnknownProperty {
                schema: self.schema.name.clone(),
                property: name.to_string(),
            })
    }

    /// All values of a property, in graph order.
    pub fn get(&self, name: &str) -> Result<&[FieldValue], BindError> {
        let i = self.index(name)?;
        Ok(&self.values[i])
    }

    /// The sole value of a property with `sh:maxCount 1`.
    pub fn single(&self, name: &str) -> Result<Option<&FieldValue>, BindError> {
        let i = self.index(name)?;
        if !self.schema.properties[i].is_single_valued() {
            return Err(BindError::NotSingleValued {
                property: name.to_string(),
            });
        }
        Ok(self.values[i].first())
    }

    /// Replaces a property's values.
    ///
    /// Every value must match the property's kind and the count must respect
    /// `sh:maxCount`. On error the entity is unchanged.
    pub fn set(&mut self, name: &str, values: Vec<FieldValue>) -> Result<(), BindError> {
        let i = self.index(name)?;
        let property = &self.schema.properties[i];
        for value in &values {
            check_kind(property, self.value_types[i], value)?;
        }
        check_count(&self.schema, property, values.len())?;
        self.values[i] = values;
        Ok(())
    }

    /// Removes all values of a property.
    pub fn clear(&mut self, name: &str) -> Result<(), BindError> {
        let i = self.index(name)?;
        self.values[i].clear();
        Ok(())
    }

    fn single_literal(&self, name: &str) -> Option<&TypedValue> {
        self.single(name).ok().flatten().and_then(FieldValue::as_literal)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.single_literal(name).and_then(TypedValue::as_str)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.single_literal(name).and_then(TypedValue::as_integer)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.single_literal(name).and_then(TypedValue::as_bool)
    }

    /// The sole nested entity of a single-valued property.
    pub fn nested(&self, name: &str) -> Option<&Entity> {
        self.single(name).ok().flatten().and_then(FieldValue::as_entity)
    }

    /// Writes the entity back as triples, nested entities included.
    ///
    /// Each entity contributes an `rdf:type` triple for its schema's target
    /// type. Literals are encoded with the declared datatype.
    pub fn to_triples(&self, datatypes: &DatatypeRegistry) -> Result<Vec<Triple>, BindError> {
        let mut out = Vec::new();
        self.write_triples(datatypes, &mut out)?;
        Ok(out)
    }

    fn write_triples(
        &self,
        datatypes: &DatatypeRegistry,
        out: &mut Vec<Triple>,
    ) -> Result<(), BindError> {
        out.push(Triple::new(
            self.subject.clone(),
            terms::RDF_TYPE.clone(),
            Term::Iri(self.schema.target_type.clone()),
        ));
        for (property, values) in self.schema.properties.iter().zip(&self.values) {
            let path = Term::Iri(property.path.clone());
            for value in values {
                match (value, &property.kind) {
                    (FieldValue::Literal(v), ValueKind::Datatype(datatype)) => {
                        let lexical = datatypes.encode(datatype, v).map_err(|source| {
                            BindError::Convert {
                                property: property.name.clone(),
                                source,
                            }
                        })?;
                        out.push(Triple::new(
                            self.subject.clone(),
                            path.clone(),
                            Term::typed(lexical, datatype),
                        ));
                    }
                    (FieldValue::Entity(e), ValueKind::Nested(_)) => {
                        out.push(Triple::new(
                            self.subject.clone(),
                            path.clone(),
                            e.subject.clone(),
                        ));
                        e.write_triples(datatypes, out)?;
                    }
                    _ => return Err(kind_mismatch(property)),
                }
            }
        }
        Ok(())
    }

    /// Appends a decoded value during binding; counts are checked afterwards.
    pub(crate) fn push(&mut self, index: usize, value: FieldValue) {
        self.values[index].push(value);
    }
}

fn kind_mismatch(property: &Property) -> BindError {
    let expected = match &property.kind {
        ValueKind::Datatype(iri) => format!("literal values of <{}>", iri),
        ValueKind::Nested(schema) => format!("{} entities", schema.name),
    };
    BindError::KindMismatch {
        property: property.name.clone(),
        expected,
    }
}

fn check_kind(
    property: &Property,
    value_type: Option<ValueType>,
    value: &FieldValue,
) -> Result<(), BindError> {
    match (&property.kind, value) {
        (ValueKind::Datatype(datatype), FieldValue::Literal(v)) => match value_type {
            Some(expected) if expected == v.value_type() => Ok(()),
            Some(_) => Err(kind_mismatch(property)),
            None => Err(BindError::Convert {
                property: property.name.clone(),
                source: crate::error::ConvertError::UnsupportedDatatype {
                    datatype: datatype.to_string(),
                },
            }),
        },
        (ValueKind::Nested(schema), FieldValue::Entity(e)) if e.schema.name == schema.name => {
            Ok(())
        }
        _ => Err(kind_mismatch(property)),
    }
}

pub(crate) fn check_count(
    schema: &Schema,
    property: &Property,
    count: usize,
) -> Result<(), BindError> {
    match property.max_count {
        Some(max) if !property.allows(count) => Err(BindError::CardinalityViolation {
            schema: schema.name.clone(),
            property: property.name.clone(),
            max,
            found: count,
        }),
        _ => Ok(()),
    }
}
