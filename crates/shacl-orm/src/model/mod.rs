//! Data model types.
//!
//! This module contains the core types shared by the compiler and binder:
//! - Terms and triples
//! - Namespaces and qualified names
//! - Schema descriptors
//! - Typed values
//! - Builders (ergonomic graph construction)

pub mod builder;
pub mod namespace;
pub mod schema;
pub mod term;
pub mod value;

pub use builder::{EntityBuilder, InstanceBuilder, PropertyBuilder, ShapeBuilder, ShapesBuilder};
pub use namespace::{Namespace, NamespaceResolver, QName};
pub use schema::{Property, PropertyParameter, Schema, ValueKind};
pub use term::{Literal, Term, Triple};
pub use value::{Decimal, TypedValue, ValueType};
