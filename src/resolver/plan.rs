// src/resolver/plan.rs

//! Resolution plan data structures
//!
//! Contains the result types for dependency resolution.

use crate::registry::{OptionalDependency, PackageId, Registry};
use serde::Serialize;
use std::collections::HashSet;

/// An optional dependency a planned package would benefit from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionalSuggestion {
    pub wanted_by: PackageId,
    pub dependency: OptionalDependency,
}

/// Packages to install, dependencies first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedPlan {
    install_order: Vec<PackageId>,
    #[serde(skip)]
    placed: HashSet<PackageId>,
}

impl ResolvedPlan {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append a package; already-placed packages are ignored
    pub(crate) fn push(&mut self, pkg: PackageId) {
        if self.placed.insert(pkg.clone()) {
            self.install_order.push(pkg);
        }
    }

    pub fn contains(&self, pkg: &str) -> bool {
        self.placed.contains(pkg)
    }

    /// Index of `pkg` in the install order
    pub fn position(&self, pkg: &str) -> Option<usize> {
        self.install_order.iter().position(|p| p.as_str() == pkg)
    }

    pub fn install_order(&self) -> &[PackageId] {
        &self.install_order
    }

    pub fn len(&self) -> usize {
        self.install_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.install_order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PackageId> {
        self.install_order.iter()
    }

    pub fn into_vec(self) -> Vec<PackageId> {
        self.install_order
    }

    /// Optional dependencies of planned packages that are neither planned
    /// nor installed, in install order
    ///
    /// These are only reported; they never enter the closure.
    pub fn optional_suggestions(
        &self,
        registry: &Registry,
        installed: &HashSet<PackageId>,
    ) -> Vec<OptionalSuggestion> {
        let mut suggestions = Vec::new();
        for pkg in &self.install_order {
            let Some(record) = registry.get(pkg.as_str()) else {
                continue;
            };
            for opt in &record.optional {
                if self.contains(opt.package.as_str()) || installed.contains(&opt.package) {
                    continue;
                }
                suggestions.push(OptionalSuggestion {
                    wanted_by: pkg.clone(),
                    dependency: opt.clone(),
                });
            }
        }
        suggestions
    }
}

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Everything requested is already installed
    NothingToDo,
    /// Packages to install, in order
    Plan(ResolvedPlan),
}

impl Resolution {
    pub(crate) fn from_plan(plan: ResolvedPlan) -> Self {
        if plan.is_empty() {
            Resolution::NothingToDo
        } else {
            Resolution::Plan(plan)
        }
    }

    pub fn is_nothing_to_do(&self) -> bool {
        matches!(self, Resolution::NothingToDo)
    }

    pub fn plan(&self) -> Option<&ResolvedPlan> {
        match self {
            Resolution::Plan(plan) => Some(plan),
            Resolution::NothingToDo => None,
        }
    }

    /// Install order; empty when there is nothing to do
    pub fn install_order(&self) -> &[PackageId] {
        match self {
            Resolution::Plan(plan) => plan.install_order(),
            Resolution::NothingToDo => &[],
        }
    }

    pub fn into_install_order(self) -> Vec<PackageId> {
        match self {
            Resolution::Plan(plan) => plan.into_vec(),
            Resolution::NothingToDo => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PackageRecord;

    #[test]
    fn test_push_ignores_duplicates() {
        let mut plan = ResolvedPlan::new();
        plan.push("e".into());
        plan.push("d".into());
        plan.push("e".into());

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.position("d"), Some(1));
        assert!(plan.contains("e"));
        assert!(!plan.contains("a"));
    }

    #[test]
    fn test_empty_plan_is_nothing_to_do() {
        let resolution = Resolution::from_plan(ResolvedPlan::new());
        assert!(resolution.is_nothing_to_do());
        assert!(resolution.plan().is_none());
        assert!(resolution.install_order().is_empty());
    }

    #[test]
    fn test_optional_suggestions_skip_planned_and_installed() {
        let registry = Registry::builder()
            .package(
                "git",
                PackageRecord::new().with_optional([
                    OptionalDependency::parse("perl: for git-svn"),
                    OptionalDependency::parse("python"),
                    OptionalDependency::parse("tk: for gitk"),
                ]),
            )
            .package("perl", PackageRecord::new())
            .package("python", PackageRecord::new())
            .build();

        let mut plan = ResolvedPlan::new();
        plan.push("perl".into());
        plan.push("git".into());
        let installed: HashSet<PackageId> = [PackageId::from("python")].into_iter().collect();

        let suggestions = plan.optional_suggestions(&registry, &installed);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].wanted_by, PackageId::from("git"));
        assert_eq!(suggestions[0].dependency.to_string(), "tk: for gitk");
        assert!(!plan.contains("tk"));
    }

    #[test]
    fn test_plan_serializes_install_order() {
        let mut plan = ResolvedPlan::new();
        plan.push("libc".into());
        plan.push("app".into());

        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(json, r#"{"install_order":["libc","app"]}"#);
    }
}
