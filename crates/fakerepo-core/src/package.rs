//! Generated package records and the ordered set returned by generation.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};

use crate::build_time::BuildTime;
use crate::error::InvariantError;

/// One workspace package in the fake repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Dependency level, 0 = leaf library.
    pub level: usize,
    /// Unique package name.
    pub name: String,
    /// Names of packages on lower levels, in candidate order.
    pub dependencies: Vec<String>,
    /// Configured build duration, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_time: Option<BuildTime>,
    /// Sampled build duration in milliseconds.
    #[serde(default)]
    pub build_millis: u64,
}

impl Package {
    /// A package with no dependencies and no sampled build time yet.
    #[must_use]
    pub const fn new(level: usize, name: String, build_time: Option<BuildTime>) -> Self {
        Self {
            level,
            name,
            dependencies: Vec::new(),
            build_time,
            build_millis: 0,
        }
    }
}

/// Ordered output of one generation run.
///
/// Order is generation order: highest level first, then by index within the
/// level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageSet {
    packages: Vec<Package>,
}

impl PackageSet {
    #[must_use]
    pub const fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Package> {
        self.packages.iter()
    }

    #[must_use]
    pub const fn as_slice(&self) -> &[Package] {
        self.packages.as_slice()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Package> {
        self.packages
    }

    /// Look up a package by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Number of levels spanned by the set.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.packages.iter().map(|p| p.level + 1).max().unwrap_or(0)
    }

    /// Package count per level, indexed by level.
    #[must_use]
    pub fn level_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.level_count()];
        for p in &self.packages {
            sizes[p.level] += 1;
        }
        sizes
    }

    /// Total number of dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.packages.iter().map(|p| p.dependencies.len()).sum()
    }

    /// Dependency graph with edges `dependency -> dependent`.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::UnknownDependency`] when a dependency name
    /// is not in the set.
    pub fn dependency_graph(&self) -> Result<DiGraph<String, ()>, InvariantError> {
        let mut graph = DiGraph::with_capacity(self.packages.len(), self.edge_count());
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(self.packages.len());
        for p in &self.packages {
            index.insert(p.name.as_str(), graph.add_node(p.name.clone()));
        }
        for p in &self.packages {
            let dependent = index[p.name.as_str()];
            for dep in &p.dependencies {
                let Some(&dependency) = index.get(dep.as_str()) else {
                    return Err(InvariantError::UnknownDependency {
                        package: p.name.clone(),
                        dependency: dep.clone(),
                    });
                };
                graph.add_edge(dependency, dependent, ());
            }
        }
        Ok(graph)
    }

    /// True when the dependency graph has no cycles.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::UnknownDependency`] for dangling names.
    pub fn is_acyclic(&self) -> Result<bool, InvariantError> {
        Ok(toposort(&self.dependency_graph()?, None).is_ok())
    }

    /// Group packages into build waves.
    ///
    /// Wave 0 holds packages without dependencies; every later package lands
    /// one wave after its deepest dependency. Names within a wave keep set
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::UnknownDependency`] for dangling names and
    /// [`InvariantError::DependencyCycle`] when no build order exists.
    pub fn build_waves(&self) -> Result<Vec<Vec<String>>, InvariantError> {
        let graph = self.dependency_graph()?;
        let order = toposort(&graph, None).map_err(|cycle| InvariantError::DependencyCycle {
            package: graph[cycle.node_id()].clone(),
        })?;

        let mut depth: HashMap<NodeIndex, usize> = HashMap::with_capacity(order.len());
        for node in order {
            let d = graph
                .neighbors_directed(node, Direction::Incoming)
                .filter_map(|dep| depth.get(&dep))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(node, d);
        }

        let wave_count = depth.values().map(|d| d + 1).max().unwrap_or(0);
        let mut waves: Vec<Vec<String>> = vec![Vec::new(); wave_count];
        for node in graph.node_indices() {
            if let Some(&d) = depth.get(&node) {
                waves[d].push(graph[node].clone());
            }
        }
        Ok(waves)
    }
}

impl<'a> IntoIterator for &'a PackageSet {
    type Item = &'a Package;
    type IntoIter = std::slice::Iter<'a, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}

impl IntoIterator for PackageSet {
    type Item = Package;
    type IntoIter = std::vec::IntoIter<Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_deps(level: usize, name: &str, deps: &[&str]) -> Package {
        let mut p = Package::new(level, name.to_string(), None);
        p.dependencies = deps.iter().map(ToString::to_string).collect();
        p
    }

    fn sample_set() -> PackageSet {
        PackageSet::new(vec![
            with_deps(2, "app-01", &["helper-lib-2_01", "lib-1_02"]),
            with_deps(1, "helper-lib-2_01", &["lib-1_01"]),
            with_deps(0, "lib-1_01", &[]),
            with_deps(0, "lib-1_02", &[]),
        ])
    }

    #[test]
    fn level_sizes_indexed_by_level() {
        let set = sample_set();
        assert_eq!(set.level_count(), 3);
        assert_eq!(set.level_sizes(), vec![2, 1, 1]);
        assert_eq!(set.edge_count(), 3);
    }

    #[test]
    fn waves_follow_dependency_depth() {
        let waves = sample_set().build_waves().expect("known names");
        assert_eq!(
            waves,
            vec![
                vec!["lib-1_01".to_string(), "lib-1_02".to_string()],
                vec!["helper-lib-2_01".to_string()],
                vec!["app-01".to_string()],
            ]
        );
    }

    #[test]
    fn shallow_app_lands_in_early_wave() {
        let set = PackageSet::new(vec![
            with_deps(2, "app-01", &["lib-1_01"]),
            with_deps(1, "helper-lib-2_01", &["lib-1_01"]),
            with_deps(0, "lib-1_01", &[]),
        ]);
        let waves = set.build_waves().expect("known names");
        assert_eq!(waves.len(), 2);
        assert_eq!(waves[1], vec!["app-01".to_string(), "helper-lib-2_01".to_string()]);
    }

    #[test]
    fn generated_shape_is_acyclic() {
        assert_eq!(sample_set().is_acyclic(), Ok(true));
    }

    #[test]
    fn cycle_is_detected() {
        let set = PackageSet::new(vec![
            with_deps(1, "a", &["b"]),
            with_deps(0, "b", &["a"]),
        ]);
        assert_eq!(set.is_acyclic(), Ok(false));
        assert!(matches!(
            set.build_waves(),
            Err(InvariantError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn dangling_dependency_is_reported() {
        let set = PackageSet::new(vec![with_deps(1, "app-01", &["lib-1_09"])]);
        assert_eq!(
            set.build_waves(),
            Err(InvariantError::UnknownDependency {
                package: "app-01".into(),
                dependency: "lib-1_09".into(),
            })
        );
    }

    #[test]
    fn lookup_by_name() {
        let set = sample_set();
        assert_eq!(set.get("helper-lib-2_01").map(|p| p.level), Some(1));
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn serializes_as_plain_array() {
        let json = serde_json::to_value(sample_set()).expect("serialize");
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "app-01");
        assert!(json[0].get("build_time").is_none());
    }
}
