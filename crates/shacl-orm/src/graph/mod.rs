//! Triple store interface.
//!
//! The compiler and binder only need pattern lookups, so graph storage stays
//! behind [`TripleStore`]. [`MemoryGraph`] is a small indexed implementation
//! for tests, builders, and callers without a store of their own.

pub mod memory;

pub use memory::MemoryGraph;

use crate::model::{Term, Triple};

/// Pattern-based access to a set of triples.
///
/// `None` in any position is a wildcard. Results come back in the store's
/// natural order, which callers must not assume is sorted.
pub trait TripleStore {
    fn find(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
    ) -> Vec<Triple>;

    /// All objects of `(subject, predicate, ?)`.
    fn objects(&self, subject: &Term, predicate: &Term) -> Vec<Term> {
        self.find(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|t| t.object)
            .collect()
    }

    /// Distinct subjects of `(?, predicate, object)`, in first-seen order.
    fn subjects(&self, predicate: &Term, object: &Term) -> Vec<Term> {
        let mut out: Vec<Term> = Vec::new();
        for t in self.find(None, Some(predicate), Some(object)) {
            if !out.contains(&t.subject) {
                out.push(t.subject);
            }
        }
        out
    }

    /// First object of `(subject, predicate, ?)`, if any.
    fn value(&self, subject: &Term, predicate: &Term) -> Option<Term> {
        self.find(Some(subject), Some(predicate), None)
            .into_iter()
            .next()
            .map(|t| t.object)
    }

    /// All `(predicate, object)` pairs of a subject.
    fn predicate_objects(&self, subject: &Term) -> Vec<(Term, Term)> {
        self.find(Some(subject), None, None)
            .into_iter()
            .map(|t| (t.predicate, t.object))
            .collect()
    }
}
