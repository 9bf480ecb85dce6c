//! Prefix table and IRI qualification.
//!
//! A [`NamespaceResolver`] maps absolute IRIs to `prefix:local` names. When
//! several registered bases are prefixes of the same IRI, the longest base
//! wins; equal-length bases are the same string, and ties between prefixes
//! bound to one base go to the lexicographically smallest prefix.

use std::fmt;

use crate::error::CompileError;
use crate::vocab::DEFAULT_PREFIXES;

/// A registered (prefix, base IRI) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub prefix: String,
    pub base: String,
}

/// A qualified name: prefix plus local part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub prefix: String,
    pub local: String,
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local)
    }
}

/// Prefix table with deterministic longest-match resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceResolver {
    /// Sorted by base length (longest first), then prefix.
    namespaces: Vec<Namespace>,
}

impl NamespaceResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver preloaded with the rdf, rdfs, sh and xsd prefixes.
    pub fn with_defaults() -> Self {
        let mut resolver = Self::new();
        for (prefix, base) in DEFAULT_PREFIXES {
            resolver.namespaces.push(Namespace {
                prefix: prefix.to_string(),
                base: base.to_string(),
            });
        }
        resolver.sort();
        resolver
    }

    /// Builds a resolver from (prefix, base) pairs.
    pub fn from_pairs<I, P, B>(pairs: I) -> Result<Self, CompileError>
    where
        I: IntoIterator<Item = (P, B)>,
        P: Into<String>,
        B: Into<String>,
    {
        let mut resolver = Self::new();
        for (prefix, base) in pairs {
            resolver.insert(prefix, base)?;
        }
        Ok(resolver)
    }

    /// Registers a prefix.
    ///
    /// Re-registering an identical pair is a no-op. Binding an existing prefix
    /// to a different base fails with [`CompileError::DuplicatePrefix`].
    pub fn insert(
        &mut self,
        prefix: impl Into<String>,
        base: impl Into<String>,
    ) -> Result<(), CompileError> {
        let prefix = prefix.into();
        let base = base.into();
        if let Some(existing) = self.namespaces.iter().find(|ns| ns.prefix == prefix) {
            if existing.base == base {
                return Ok(());
            }
            return Err(CompileError::DuplicatePrefix {
                prefix,
                existing: existing.base.clone(),
                base,
            });
        }
        self.namespaces.push(Namespace { prefix, base });
        self.sort();
        Ok(())
    }

    fn sort(&mut self) {
        self.namespaces.sort_by(|a, b| {
            b.base
                .len()
                .cmp(&a.base.len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });
    }

    /// Splits an IRI into a qualified name using the longest matching base.
    ///
    /// `None` means the IRI is unqualified; it is not an error.
    pub fn resolve(&self, iri: &str) -> Option<QName> {
        self.namespaces.iter().find_map(|ns| {
            iri.strip_prefix(ns.base.as_str()).map(|local| QName {
                prefix: ns.prefix.clone(),
                local: local.to_string(),
            })
        })
    }

    /// Expands a `prefix:local` name to an absolute IRI.
    pub fn expand(&self, curie: &str) -> Option<String> {
        let (prefix, local) = curie.split_once(':')?;
        self.base(prefix).map(|base| format!("{}{}", base, local))
    }

    /// Returns the base IRI bound to a prefix.
    pub fn base(&self, prefix: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|ns| ns.prefix == prefix)
            .map(|ns| ns.base.as_str())
    }

    /// Iterates registered namespaces, longest base first.
    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
