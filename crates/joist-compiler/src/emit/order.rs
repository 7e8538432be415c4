//! Emission order of interfaces within one artifact.

use std::collections::HashMap;

use joist_core::{Declaration, TypeKind};

/// Sort interfaces so each comes after the local interfaces it extends.
///
/// Kahn's algorithm over the heritage graph restricted to `interfaces`;
/// ties keep declaration order. Members of a heritage cycle keep their
/// relative order and go last.
pub fn sort_by_heritage<'a>(interfaces: &[&'a Declaration]) -> Vec<&'a Declaration> {
    let index: HashMap<&str, usize> = interfaces
        .iter()
        .enumerate()
        .map(|(i, decl)| (decl.name.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; interfaces.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); interfaces.len()];

    for (i, decl) in interfaces.iter().enumerate() {
        for heritage in decl.heritage() {
            let TypeKind::TypeReference { name } = &heritage.kind else {
                continue;
            };
            if let Some(&base) = index.get(name.as_str())
                && base != i
            {
                in_degree[i] += 1;
                dependents[base].push(i);
            }
        }
    }

    let mut result = Vec::with_capacity(interfaces.len());
    let mut emitted = vec![false; interfaces.len()];
    // Smallest declaration index first.
    let mut ready: Vec<usize> = (0..interfaces.len())
        .filter(|&i| in_degree[i] == 0)
        .rev()
        .collect();

    while let Some(i) = ready.pop() {
        result.push(interfaces[i]);
        emitted[i] = true;
        for &dependent in &dependents[i] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push(dependent);
                ready.sort_unstable_by(|a, b| b.cmp(a));
            }
        }
    }

    result.extend(
        interfaces
            .iter()
            .enumerate()
            .filter(|(i, _)| !emitted[*i])
            .map(|(_, decl)| *decl),
    );
    result
}
