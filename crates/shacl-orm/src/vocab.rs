//! Well-known RDF, SHACL and XSD identifiers.

/// RDF vocabulary.
pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// RDFS vocabulary.
pub mod rdfs {
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
}

/// SHACL vocabulary (the subset the compiler reads).
pub mod sh {
    pub const NS: &str = "http://www.w3.org/ns/shacl#";
    pub const SHAPE: &str = "http://www.w3.org/ns/shacl#Shape";
    pub const NODE_SHAPE: &str = "http://www.w3.org/ns/shacl#NodeShape";
    pub const TARGET_CLASS: &str = "http://www.w3.org/ns/shacl#targetClass";
    pub const PROPERTY: &str = "http://www.w3.org/ns/shacl#property";
    pub const NAME: &str = "http://www.w3.org/ns/shacl#name";
    pub const PATH: &str = "http://www.w3.org/ns/shacl#path";
    pub const DATATYPE: &str = "http://www.w3.org/ns/shacl#datatype";
    pub const NODE: &str = "http://www.w3.org/ns/shacl#node";
    pub const MAX_COUNT: &str = "http://www.w3.org/ns/shacl#maxCount";
}

/// XML Schema datatypes.
pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const NORMALIZED_STRING: &str = "http://www.w3.org/2001/XMLSchema#normalizedString";
    pub const TOKEN: &str = "http://www.w3.org/2001/XMLSchema#token";
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    pub const POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const TIME: &str = "http://www.w3.org/2001/XMLSchema#time";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// Prefix table preloaded by [`crate::NamespaceResolver::with_defaults`].
pub const DEFAULT_PREFIXES: [(&str, &str); 4] = [
    ("rdf", rdf::NS),
    ("rdfs", rdfs::NS),
    ("sh", sh::NS),
    ("xsd", xsd::NS),
];

/// Predicate terms used when querying graphs, built once.
pub mod terms {
    use lazy_static::lazy_static;

    use crate::model::Term;

    lazy_static! {
        pub static ref RDF_TYPE: Term = Term::iri(super::rdf::TYPE);
        pub static ref SH_SHAPE: Term = Term::iri(super::sh::SHAPE);
        pub static ref SH_NODE_SHAPE: Term = Term::iri(super::sh::NODE_SHAPE);
        pub static ref SH_TARGET_CLASS: Term = Term::iri(super::sh::TARGET_CLASS);
        pub static ref SH_PROPERTY: Term = Term::iri(super::sh::PROPERTY);
        pub static ref SH_NAME: Term = Term::iri(super::sh::NAME);
        pub static ref SH_MAX_COUNT: Term = Term::iri(super::sh::MAX_COUNT);
    }
}
