//! Dependency ordering over `sh:node` references.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::error::CompileError;
use crate::model::Term;

use super::shape::ShapeDecl;

/// Returns declaration indices such that every shape comes after the shapes
/// it references. Among shapes that are ready at the same time, the lower
/// discovery index goes first.
pub(crate) fn dependency_order(decls: &[ShapeDecl]) -> Result<Vec<usize>, CompileError> {
    let index: FxHashMap<&Term, usize> = decls
        .iter()
        .enumerate()
        .map(|(i, d)| (&d.subject, i))
        .collect();

    // deps[i]: shapes that must be built before i.
    let mut deps: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); decls.len()];
    for (i, decl) in decls.iter().enumerate() {
        for (property, reference) in decl.references() {
            let Some(&j) = index.get(reference) else {
                return Err(CompileError::UnknownNestedSchema {
                    shape: decl.name.clone(),
                    property: property.name.clone(),
                    reference: reference.to_string(),
                });
            };
            deps[i].insert(j);
        }
    }

    let mut order = Vec::with_capacity(decls.len());
    let mut done = vec![false; decls.len()];
    while order.len() < decls.len() {
        let next = (0..decls.len()).find(|&i| !done[i] && deps[i].iter().all(|&j| done[j]));
        match next {
            Some(i) => {
                done[i] = true;
                order.push(i);
            }
            None => {
                return Err(CompileError::CyclicDependency {
                    shapes: find_cycle(&deps, &done)
                        .into_iter()
                        .map(|i| decls[i].name.clone())
                        .collect(),
                });
            }
        }
    }
    Ok(order)
}

/// Walks unfinished dependencies from the first unfinished shape until a
/// shape repeats; the repeated stretch is a cycle.
fn find_cycle(deps: &[BTreeSet<usize>], done: &[bool]) -> Vec<usize> {
    let Some(start) = done.iter().position(|d| !d) else {
        return Vec::new();
    };
    let mut path = vec![start];
    let mut current = start;
    loop {
        // Every unfinished shape has at least one unfinished dependency.
        let Some(&next) = deps[current].iter().find(|&&j| !done[j]) else {
            return path;
        };
        if let Some(pos) = path.iter().position(|&p| p == next) {
            return path.split_off(pos);
        }
        path.push(next);
        current = next;
    }
}
