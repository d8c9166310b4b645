//! Static validation of the wiring graph.
//!
//! Walks every concrete registration and its declared dependencies without
//! constructing anything, so a host can refuse to start on a broken
//! configuration instead of failing on the first resolution.

use std::collections::HashSet;

use crate::collection::CollectionResolver;
use crate::error::RegistryError;
use crate::injection::{Cardinality, Dependency};
use crate::key::ComponentKey;
use crate::registry::{ComponentRegistry, Map};

/// Result of [`ApplicationContext::validate`](crate::ApplicationContext::validate).
///
/// Errors use the same variants resolution would fail with:
/// `MissingDependencyBinding`, `AmbiguousComponent` (single dependency on a
/// base with several implementations) and `CyclicDependency`.
///
/// # Examples
///
/// ```
/// use component_registry::{ApplicationContext, ComponentDefinition, Dependency, RegistryError};
///
/// struct Editor;
///
/// let ctx = ApplicationContext::new();
/// ctx.register(ComponentDefinition::<Editor>::new().constructor([Dependency::single("Buffer")], |_| Ok(Editor))).unwrap();
///
/// let report = ctx.validate();
/// assert!(!report.is_valid());
/// assert!(matches!(report.errors()[0], RegistryError::MissingDependencyBinding { .. }));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<RegistryError>,
}

impl ValidationReport {
    /// Returns true if validation passed without errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[RegistryError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<RegistryError> {
        self.errors
    }

    /// Formats errors for display, one per line.
    pub fn format_issues(&self) -> String {
        let mut output = String::new();
        if !self.errors.is_empty() {
            output.push_str("Validation Errors:\n");
            for error in &self.errors {
                output.push_str(&format!("  - {}\n", error));
            }
        }
        output
    }

    fn push(&mut self, error: RegistryError) {
        if !self.errors.contains(&error) {
            self.errors.push(error);
        }
    }
}

/// Validates every concrete registration of `registry`.
pub(crate) fn validate(registry: &ComponentRegistry) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut edges: Map<ComponentKey, Vec<ComponentKey>> = Map::default();
    let mut order = Vec::new();

    for descriptor in registry.descriptors().filter(|d| d.is_concrete) {
        let plan = match registry.plan(&descriptor.key) {
            Ok(plan) => plan,
            Err(error) => {
                report.push(error);
                continue;
            }
        };

        let points = std::iter::once(&plan.constructor)
            .chain(plan.levels.iter().flat_map(|(_, points)| points.iter()));
        let mut targets = Vec::new();
        for point in points {
            for dependency in &point.dependencies {
                match dependency_targets(registry, &point.owner, dependency) {
                    Ok(keys) => targets.extend(keys),
                    Err(error) => report.push(error),
                }
            }
        }

        order.push(descriptor.key.clone());
        edges.insert(descriptor.key.clone(), targets);
    }

    for cycle in detect_cycles(&order, &edges) {
        report.push(RegistryError::CyclicDependency(cycle));
    }

    if !report.is_valid() {
        tracing::debug!(errors = report.errors.len(), "validation found wiring errors");
    }
    report
}

/// Concrete keys a dependency resolves to, or the error resolution would raise.
fn dependency_targets(
    registry: &ComponentRegistry,
    owner: &ComponentKey,
    dependency: &Dependency,
) -> Result<Vec<ComponentKey>, RegistryError> {
    let missing = || RegistryError::MissingDependencyBinding {
        owner: owner.clone(),
        dependency: dependency.key.clone(),
    };
    let descriptor = registry.lookup(&dependency.key).map_err(|_| missing())?;

    match dependency.cardinality {
        Cardinality::Collection => Ok(CollectionResolver::members(descriptor)),
        Cardinality::Single if descriptor.is_concrete => Ok(vec![descriptor.key.clone()]),
        Cardinality::Single => match descriptor.derived_keys.as_slice() {
            [] => Err(RegistryError::UnknownComponent(descriptor.key.clone())),
            [only] => Ok(vec![only.clone()]),
            candidates => Err(RegistryError::AmbiguousComponent {
                key: descriptor.key.clone(),
                candidates: candidates.to_vec(),
            }),
        },
    }
}

/// Detects cycles using DFS; each path ends with the key it started from.
fn detect_cycles(order: &[ComponentKey], edges: &Map<ComponentKey, Vec<ComponentKey>>) -> Vec<Vec<ComponentKey>> {
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut cycles = Vec::new();

    for key in order {
        if !visited.contains(key) {
            dfs_cycles(key, edges, &mut visited, &mut path, &mut cycles);
        }
    }
    cycles
}

fn dfs_cycles(
    current: &ComponentKey,
    edges: &Map<ComponentKey, Vec<ComponentKey>>,
    visited: &mut HashSet<ComponentKey>,
    path: &mut Vec<ComponentKey>,
    cycles: &mut Vec<Vec<ComponentKey>>,
) {
    if let Some(start) = path.iter().position(|key| key == current) {
        let mut cycle = path[start..].to_vec();
        cycle.push(current.clone());
        cycles.push(cycle);
        return;
    }
    if visited.contains(current) {
        return;
    }

    visited.insert(current.clone());
    path.push(current.clone());
    if let Some(targets) = edges.get(current) {
        for target in targets {
            dfs_cycles(target, edges, visited, path, cycles);
        }
    }
    path.pop();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<ComponentKey> {
        names.iter().map(|name| ComponentKey::new(name)).collect()
    }

    #[test]
    fn finds_two_node_cycle() {
        let order = keys(&["A", "B", "C"]);
        let mut edges = Map::default();
        edges.insert(ComponentKey::new("A"), keys(&["B"]));
        edges.insert(ComponentKey::new("B"), keys(&["A"]));
        edges.insert(ComponentKey::new("C"), keys(&["A"]));

        let cycles = detect_cycles(&order, &edges);
        assert_eq!(cycles, vec![keys(&["A", "B", "A"])]);
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let order = keys(&["Top", "Left", "Right", "Bottom"]);
        let mut edges = Map::default();
        edges.insert(ComponentKey::new("Top"), keys(&["Left", "Right"]));
        edges.insert(ComponentKey::new("Left"), keys(&["Bottom"]));
        edges.insert(ComponentKey::new("Right"), keys(&["Bottom"]));
        edges.insert(ComponentKey::new("Bottom"), Vec::new());

        assert!(detect_cycles(&order, &edges).is_empty());
    }

    #[test]
    fn report_deduplicates() {
        let mut report = ValidationReport::default();
        let error = RegistryError::UnknownComponent(ComponentKey::new("X"));
        report.push(error.clone());
        report.push(error);
        assert_eq!(report.errors().len(), 1);
        assert!(report.format_issues().contains("Unknown component: x"));
    }
}
