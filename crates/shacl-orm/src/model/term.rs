//! RDF terms and triples.
//!
//! A term is an IRI, a blank node, or a literal. IRIs are always stored in
//! expanded form; prefixed names only exist at the edges (builders and
//! [`crate::NamespaceResolver`]).

use std::fmt;
use std::sync::Arc;

use crate::vocab::{rdf, xsd};

/// A literal: lexical form, datatype IRI, optional language tag.
///
/// The datatype is always explicit. Plain literals are `xsd:string` and
/// language-tagged literals are `rdf:langString`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: Arc<str>,
    pub datatype: Arc<str>,
    pub language: Option<Arc<str>>,
}

/// An RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// Expanded IRI.
    Iri(Arc<str>),
    /// Blank node label, without the `_:` prefix.
    Blank(Arc<str>),
    Literal(Literal),
}

impl Term {
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri(Arc::from(iri.as_ref()))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::Blank(Arc::from(label.as_ref()))
    }

    /// Creates a blank node with a fresh random label.
    pub fn fresh_blank() -> Self {
        Term::blank(format!("b{}", uuid::Uuid::new_v4().simple()))
    }

    /// Creates an `xsd:string` literal.
    pub fn string(lexical: impl AsRef<str>) -> Self {
        Term::typed(lexical, xsd::STRING)
    }

    /// Creates a literal with an explicit datatype IRI.
    pub fn typed(lexical: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Term::Literal(Literal {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Arc::from(datatype.as_ref()),
            language: None,
        })
    }

    /// Creates a language-tagged `rdf:langString` literal.
    pub fn lang_string(lexical: impl AsRef<str>, language: impl AsRef<str>) -> Self {
        Term::Literal(Literal {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Arc::from(rdf::LANG_STRING),
            language: Some(Arc::from(language.as_ref())),
        })
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns true for IRIs and blank nodes, i.e. terms that can be subjects.
    pub fn is_node(&self) -> bool {
        !matches!(self, Term::Literal(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }
}

impl fmt::Display for Term {
    /// Writes the term in N-Triples syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(label) => write!(f, "_:{}", label),
            Term::Literal(lit) => {
                f.write_str("\"")?;
                for c in lit.lexical.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        _ => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")?;
                match &lit.language {
                    Some(lang) => write!(f, "@{}", lang),
                    None if &*lit.datatype == xsd::STRING => Ok(()),
                    None => write!(f, "^^<{}>", lit.datatype),
                }
            }
        }
    }
}

/// A (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_ntriples() {
        assert_eq!(Term::iri("http://ex.org/a").to_string(), "<http://ex.org/a>");
        assert_eq!(Term::blank("b0").to_string(), "_:b0");
        assert_eq!(Term::string("say \"hi\"").to_string(), "\"say \\\"hi\\\"\"");
        assert_eq!(Term::lang_string("chat", "fr").to_string(), "\"chat\"@fr");
        assert_eq!(
            Term::typed("42", xsd::INTEGER).to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_fresh_blanks_differ() {
        let a = Term::fresh_blank();
        let b = Term::fresh_blank();
        assert_ne!(a, b);
        assert!(a.is_node());
        assert!(!a.is_literal());
    }
}
