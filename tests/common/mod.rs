// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use depsolve::{PackageId, PackageRecord, Registry, ResolvedPlan};
use std::collections::{HashMap, HashSet, VecDeque};

pub fn ids(names: &[&str]) -> Vec<PackageId> {
    names.iter().map(|n| PackageId::from(*n)).collect()
}

pub fn id_set(names: &[&str]) -> HashSet<PackageId> {
    ids(names).into_iter().collect()
}

/// Build a registry from `(name, dependencies)` pairs
pub fn registry_from(packages: &[(&str, &[&str])]) -> Registry {
    let mut builder = Registry::builder();
    for (name, deps) in packages {
        builder.insert(*name, PackageRecord::new().with_dependencies(deps.iter().copied()));
    }
    builder.build()
}

/// The sample data set the resolver was first sketched against.
///
/// `b` depends on `d` and `d` depends back on `b`, so anything that reaches
/// `b` is a cycle.
pub fn reference_registry() -> Registry {
    Registry::builder()
        .package("a", PackageRecord::new().with_dependencies(["b"]))
        .package("b", PackageRecord::new().with_dependencies(["c", "d"]))
        .package("c", PackageRecord::new().with_dependencies(["d"]))
        .package("d", PackageRecord::new().with_dependencies(["e", "b"]))
        .package("e", PackageRecord::new())
        .package("f", PackageRecord::new().with_conflicts(["b"]))
        .package("g", PackageRecord::new().with_provides(["c"]))
        .build()
}

/// The sample data set with the `d -> b` edge removed
pub fn acyclic_reference_registry() -> Registry {
    Registry::builder()
        .package("a", PackageRecord::new().with_dependencies(["b"]))
        .package("b", PackageRecord::new().with_dependencies(["c", "d"]))
        .package("c", PackageRecord::new().with_dependencies(["d"]))
        .package("d", PackageRecord::new().with_dependencies(["e"]))
        .package("e", PackageRecord::new())
        .package("f", PackageRecord::new().with_conflicts(["b"]))
        .package("g", PackageRecord::new().with_provides(["c"]))
        .build()
}

/// Build a registry of `size` packages `p0..pN` from `(from, to)` index
/// pairs; pairs naming an index past `size` are dropped, everything else
/// (self-loops and back edges included) becomes a dependency in list order
pub fn registry_from_edges(size: usize, edges: &[(usize, usize)]) -> Registry {
    let mut builder = Registry::builder();
    for i in 0..size {
        let deps: Vec<String> = edges
            .iter()
            .filter(|(from, to)| *from == i && *to < size)
            .map(|(_, to)| format!("p{to}"))
            .collect();
        builder.insert(format!("p{i}"), PackageRecord::new().with_dependencies(deps));
    }
    builder.build()
}

/// Keep only forward edges (`from < to`), which can never close a cycle
pub fn forward_edges(edges: &[(usize, usize)]) -> Vec<(usize, usize)> {
    edges.iter().copied().filter(|(from, to)| from < to).collect()
}

/// Package ids `p{i}` for the given indices, folded into `0..size`
pub fn pick(size: usize, indices: &[usize]) -> Vec<PackageId> {
    indices.iter().map(|i| PackageId::new(format!("p{}", i % size))).collect()
}

/// Whether the registry's dependency graph holds any cycle
/// (Kahn's algorithm, independent of the resolver)
pub fn has_cycle(registry: &Registry) -> bool {
    let mut in_degree: HashMap<&PackageId, usize> =
        registry.package_ids().map(|id| (id, 0)).collect();
    for id in registry.package_ids() {
        for dep in &registry.get(id.as_str()).unwrap().dependencies {
            *in_degree.get_mut(dep).unwrap() += 1;
        }
    }

    let mut ready: Vec<&PackageId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut removed = 0;
    while let Some(id) = ready.pop() {
        removed += 1;
        for dep in &registry.get(id.as_str()).unwrap().dependencies {
            let degree = in_degree.get_mut(dep).unwrap();
            *degree -= 1;
            if *degree == 0 {
                ready.push(dep);
            }
        }
    }
    removed < registry.len()
}

/// Every package reachable from `requested` without passing through an
/// installed package (breadth-first, independent of the resolver)
pub fn reachable(
    registry: &Registry,
    requested: &[PackageId],
    installed: &HashSet<PackageId>,
) -> HashSet<PackageId> {
    let mut seen = HashSet::new();
    let mut queue: VecDeque<PackageId> = requested
        .iter()
        .filter(|p| !installed.contains(*p))
        .cloned()
        .collect();

    while let Some(pkg) = queue.pop_front() {
        if !seen.insert(pkg.clone()) {
            continue;
        }
        for dep in &registry.get(pkg.as_str()).unwrap().dependencies {
            if !installed.contains(dep) && !seen.contains(dep) {
                queue.push_back(dep.clone());
            }
        }
    }
    seen
}

/// Assert every package in `plan` follows all of its direct dependencies
pub fn assert_topological(plan: &ResolvedPlan, registry: &Registry, installed: &HashSet<PackageId>) {
    for (pos, pkg) in plan.iter().enumerate() {
        for dep in &registry.get(pkg.as_str()).unwrap().dependencies {
            if installed.contains(dep) {
                continue;
            }
            let dep_pos = plan
                .position(dep.as_str())
                .unwrap_or_else(|| panic!("{dep} (needed by {pkg}) missing from plan"));
            assert!(dep_pos < pos, "{dep} must be installed before {pkg}");
        }
    }
}
