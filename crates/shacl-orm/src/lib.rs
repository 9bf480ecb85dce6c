//! shacl-orm: SHACL shapes compiled into schema descriptors, and typed
//! entities bound from RDF instance graphs.
//!
//! # Overview
//!
//! The crate is a two-stage pipeline:
//! - **Compile**: a shapes graph becomes a [`SchemaRegistry`] of immutable
//!   [`Schema`] descriptors, in dependency order
//! - **Bind**: a [`Binder`] reads an instance graph through a schema and
//!   produces an [`Entity`] with validated accessors
//!
//! Graph storage stays behind [`TripleStore`]; [`MemoryGraph`] is the bundled
//! implementation.
//!
//! # Quick Start
//!
//! ```rust
//! use shacl_orm::model::builder::{InstanceBuilder, ShapesBuilder};
//! use shacl_orm::{compile, Binder, DatatypeRegistry};
//!
//! let shapes = ShapesBuilder::new()
//!     .prefix("hsterms", "http://hydroshare.org/terms/")
//!     .prefix("dc", "http://purl.org/dc/elements/1.1/")
//!     .node_shape("hsterms:ResourceShape", |s| s
//!         .name("Resource")
//!         .target_class("hsterms:resource")
//!         .property(|p| p.name("title").path("dc:title").datatype("xsd:string").max_count(1))
//!     )
//!     .build();
//!
//! let registry = compile(&shapes, &shapes.namespaces().unwrap()).unwrap();
//! let params = registry.by_name("Resource").unwrap().parameters();
//! assert_eq!(params[0].path, "dc:title");
//!
//! let data = InstanceBuilder::new()
//!     .prefix("hsterms", "http://hydroshare.org/terms/")
//!     .prefix("dc", "http://purl.org/dc/elements/1.1/")
//!     .entity("hsterms:r1", "hsterms:resource", |e| e.literal("dc:title", "Sample"))
//!     .build();
//!
//! let binder = Binder::new(&registry, DatatypeRegistry::builtin());
//! let resource = binder.bind_type("http://hydroshare.org/terms/resource", &data).unwrap();
//! assert_eq!(resource.text("title"), Some("Sample"));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Terms, namespaces, schema descriptors, typed values, builders
//! - [`graph`]: Triple store trait and in-memory store
//! - [`compile`]: Shape compiler
//! - [`registry`]: Compiled schema lookup
//! - [`convert`]: Datatype conversion registry
//! - [`bind`]: Runtime binder and entities
//! - [`vocab`]: Well-known IRIs
//! - [`error`]: Error types

pub mod bind;
pub mod compile;
pub mod convert;
pub mod error;
pub mod graph;
pub mod model;
pub mod registry;
pub mod util;
pub mod vocab;

// Re-export commonly used types at crate root
pub use bind::{BindOptions, Binder, Entity, FieldValue};
pub use compile::{compile, CompileOptions, ShapeCompiler};
pub use convert::{Converter, DatatypeRegistry};
pub use error::{BindError, CompileError, ConvertError, ErrorCode};
pub use graph::{MemoryGraph, TripleStore};
pub use model::{
    Decimal, Literal, Namespace, NamespaceResolver, Property, PropertyParameter, QName, Schema,
    Term, Triple, TypedValue, ValueKind, ValueType,
};
pub use registry::SchemaRegistry;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
