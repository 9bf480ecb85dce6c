//! Error types for shape compilation, datatype conversion, and binding.

use thiserror::Error;

use crate::model::ValueType;

/// Stable error codes shared by every error enum in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// S001: A required shape field is absent
    MissingRequiredField,
    /// S002: A property declares both sh:datatype and sh:node
    ConflictingConstraint,
    /// S003: sh:node references a shape that is not compiled
    UnknownNestedSchema,
    /// S004: Duplicate schema name, target type, property name or prefix
    Duplicate,
    /// S005: The sh:node dependency graph has a cycle
    CyclicDependency,
    /// S006: A recognized constraint has an unusable value
    InvalidConstraint,
    /// S007: No converter registered for a datatype
    UnsupportedDatatype,
    /// S008: Lexical form or typed value rejected by a converter
    InvalidValue,
    /// S009: Root entity selection failed
    RootSelection,
    /// S010: Value count exceeds sh:maxCount
    CardinalityViolation,
    /// S011: Value shape or accessor misuse
    EntityAccess,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "S001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingRequiredField => "S001",
            ErrorCode::ConflictingConstraint => "S002",
            ErrorCode::UnknownNestedSchema => "S003",
            ErrorCode::Duplicate => "S004",
            ErrorCode::CyclicDependency => "S005",
            ErrorCode::InvalidConstraint => "S006",
            ErrorCode::UnsupportedDatatype => "S007",
            ErrorCode::InvalidValue => "S008",
            ErrorCode::RootSelection => "S009",
            ErrorCode::CardinalityViolation => "S010",
            ErrorCode::EntityAccess => "S011",
        }
    }
}

/// Error while compiling a shapes graph into schemas.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    // === S001 ===
    #[error("[S001] {subject} is missing required field {field}")]
    MissingRequiredField { subject: String, field: &'static str },

    // === S002 ===
    #[error("[S002] property {property:?} of shape {shape} declares both sh:datatype and sh:node")]
    ConflictingConstraint { shape: String, property: String },

    // === S003 ===
    #[error("[S003] property {property:?} of shape {shape} references unknown schema {reference}")]
    UnknownNestedSchema {
        shape: String,
        property: String,
        reference: String,
    },

    // === S004 ===
    #[error("[S004] schema {name:?} is defined more than once")]
    DuplicateSchema { name: String },

    #[error("[S004] schemas {existing:?} and {name:?} both target {target}")]
    DuplicateTargetType {
        target: String,
        existing: String,
        name: String,
    },

    #[error("[S004] shape {shape} declares property {property:?} more than once")]
    DuplicateProperty { shape: String, property: String },

    #[error("[S004] prefix {prefix:?} is bound to {existing}, cannot rebind to {base}")]
    DuplicatePrefix {
        prefix: String,
        existing: String,
        base: String,
    },

    // === S005 ===
    #[error("[S005] cyclic sh:node dependency between shapes: {}", .shapes.join(", "))]
    CyclicDependency { shapes: Vec<String> },

    // === S006 ===
    #[error("[S006] property {property:?} of shape {shape} has invalid sh:maxCount {value}")]
    InvalidMaxCount {
        shape: String,
        property: String,
        value: String,
    },

    #[error("[S006] property {property:?} of shape {shape} has unsupported sh:path {path}")]
    UnsupportedPath {
        shape: String,
        property: String,
        path: String,
    },

    // === S007 ===
    #[error("[S007] property {property:?} of shape {shape} uses unsupported datatype <{datatype}>")]
    UnsupportedDatatype {
        shape: String,
        property: String,
        datatype: String,
    },
}

impl CompileError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CompileError::MissingRequiredField { .. } => ErrorCode::MissingRequiredField,
            CompileError::ConflictingConstraint { .. } => ErrorCode::ConflictingConstraint,
            CompileError::UnknownNestedSchema { .. } => ErrorCode::UnknownNestedSchema,
            CompileError::DuplicateSchema { .. }
            | CompileError::DuplicateTargetType { .. }
            | CompileError::DuplicateProperty { .. }
            | CompileError::DuplicatePrefix { .. } => ErrorCode::Duplicate,
            CompileError::CyclicDependency { .. } => ErrorCode::CyclicDependency,
            CompileError::InvalidMaxCount { .. } | CompileError::UnsupportedPath { .. } => {
                ErrorCode::InvalidConstraint
            }
            CompileError::UnsupportedDatatype { .. } => ErrorCode::UnsupportedDatatype,
        }
    }
}

/// Error from the datatype conversion registry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("[S007] no converter registered for datatype <{datatype}>")]
    UnsupportedDatatype { datatype: String },

    #[error("[S008] invalid lexical form {lexical:?} for <{datatype}>: {reason}")]
    InvalidLiteral {
        datatype: String,
        lexical: String,
        reason: String,
    },

    #[error("[S008] <{datatype}> expects a {expected:?} value, got {found:?}")]
    ValueTypeMismatch {
        datatype: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("[S008] value cannot be encoded as <{datatype}>: {reason}")]
    InvalidValue { datatype: String, reason: String },
}

impl ConvertError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConvertError::UnsupportedDatatype { .. } => ErrorCode::UnsupportedDatatype,
            _ => ErrorCode::InvalidValue,
        }
    }
}

/// Error while binding an instance graph to a schema, or while reading and
/// writing a bound entity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    // === S009 ===
    #[error("[S009] no schema targets type {target}")]
    UnknownTargetType { target: String },

    #[error("[S009] no subject of type {target} found for schema {schema:?}")]
    NoMatchingEntity { schema: String, target: String },

    #[error("[S009] {count} subjects of type {target} found for schema {schema:?}, expected one")]
    AmbiguousRootEntity {
        schema: String,
        target: String,
        count: usize,
    },

    // === S010 ===
    #[error("[S010] property {property:?} of {schema:?} allows at most {max} value(s), found {found}")]
    CardinalityViolation {
        schema: String,
        property: String,
        max: u32,
        found: usize,
    },

    // === S007 / S008 ===
    #[error("property {property:?}: {source}")]
    Convert {
        property: String,
        #[source]
        source: ConvertError,
    },

    // === S011 ===
    #[error("[S011] property {property:?} expects literal values, found {found}")]
    ExpectedLiteral { property: String, found: String },

    #[error("[S011] property {property:?} expects nested nodes, found {found}")]
    ExpectedNode { property: String, found: String },

    #[error("[S011] property {property:?} declares <{declared}> but literal is typed <{found}>")]
    LiteralDatatypeMismatch {
        property: String,
        declared: String,
        found: String,
    },

    #[error("[S011] schema {schema:?} has no property {property:?}")]
    UnknownProperty { schema: String, property: String },

    #[error("[S011] property {property:?} is not single-valued (sh:maxCount is not 1)")]
    NotSingleValued { property: String },

    #[error("[S011] property {property:?} expects {expected}")]
    KindMismatch { property: String, expected: String },
}

impl BindError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BindError::UnknownTargetType { .. }
            | BindError::NoMatchingEntity { .. }
            | BindError::AmbiguousRootEntity { .. } => ErrorCode::RootSelection,
            BindError::CardinalityViolation { .. } => ErrorCode::CardinalityViolation,
            BindError::Convert { source, .. } => source.code(),
            _ => ErrorCode::EntityAccess,
        }
    }
}
