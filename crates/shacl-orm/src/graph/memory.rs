//! In-memory triple store with per-position indexes.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::error::CompileError;
use crate::graph::TripleStore;
use crate::model::{NamespaceResolver, Term, Triple};

/// An indexed set of triples.
///
/// Insertion order is preserved and is the order `find` reports matches in.
/// Duplicate triples are ignored (set semantics).
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    triples: Vec<Triple>,
    by_subject: FxHashMap<Term, Vec<usize>>,
    by_predicate: FxHashMap<Term, Vec<usize>>,
    by_object: FxHashMap<Term, Vec<usize>>,
    /// Prefix mappings carried alongside the triples, as a parsed document would.
    pub prefixes: BTreeMap<String, String>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prefix(&mut self, prefix: impl Into<String>, base: impl Into<String>) {
        self.prefixes.insert(prefix.into(), base.into());
    }

    /// Builds a resolver from the carried prefixes.
    pub fn namespaces(&self) -> Result<NamespaceResolver, CompileError> {
        NamespaceResolver::from_pairs(
            self.prefixes
                .iter()
                .map(|(p, b)| (p.clone(), b.clone())),
        )
    }

    /// Adds a triple. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if let Some(indices) = self.by_subject.get(&triple.subject) {
            if indices.iter().any(|&i| self.triples[i] == triple) {
                return false;
            }
        }
        let index = self.triples.len();
        self.by_subject.entry(triple.subject.clone()).or_default().push(index);
        self.by_predicate.entry(triple.predicate.clone()).or_default().push(index);
        self.by_object.entry(triple.object.clone()).or_default().push(index);
        self.triples.push(triple);
        true
    }

    pub fn add(&mut self, subject: Term, predicate: Term, object: Term) -> bool {
        self.insert(Triple::new(subject, predicate, object))
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }
}

impl TripleStore for MemoryGraph {
    fn find(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Vec<Triple> {
        fn lookup<'g>(
            index: &'g FxHashMap<Term, Vec<usize>>,
            key: Option<&Term>,
        ) -> Option<&'g [usize]> {
            key.map(|k| index.get(k).map_or(&[][..], Vec::as_slice))
        }

        // Scan the narrowest bound index; fall back to a full scan.
        let candidates = [
            lookup(&self.by_subject, subject),
            lookup(&self.by_predicate, predicate),
            lookup(&self.by_object, object),
        ]
        .into_iter()
        .flatten()
        .min_by_key(|c| c.len());

        let matches = |t: &Triple| {
            subject.is_none_or(|s| &t.subject == s)
                && predicate.is_none_or(|p| &t.predicate == p)
                && object.is_none_or(|o| &t.object == o)
        };

        match candidates {
            Some(indices) => indices
                .iter()
                .map(|&i| &self.triples[i])
                .filter(|&t| matches(t))
                .cloned()
                .collect(),
            None => self.triples.iter().filter(|&t| matches(t)).cloned().collect(),
        }
    }
}

impl FromIterator<Triple> for MemoryGraph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut graph = MemoryGraph::new();
        graph.extend(iter);
        graph
    }
}

impl Extend<Triple> for MemoryGraph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}
