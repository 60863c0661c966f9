// intake-core/src/domain/graph/dag.rs

use crate::domain::error::DomainError;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

pub struct GraphSolver;

impl GraphSolver {
    /// Calculates the dependency layers of a set of tables (Topological Sort with Layers).
    /// `edges` are `(dependent, dependency)` pairs, e.g. `(orders, customers)`.
    /// Layer N depends only on layers 0..N-1. Tables inside a layer are sorted by name.
    pub fn plan_layers(
        nodes: &BTreeSet<String>,
        edges: &[(String, String)],
    ) -> Result<Vec<Vec<String>>, DomainError> {
        let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
        let mut adj_list: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        // 1. Initialization: Prepare all known nodes
        for node in nodes {
            in_degree.insert(node.as_str(), 0);
            adj_list.insert(node.as_str(), Vec::new());
        }

        // 2. Graph Construction (Dependency Inversion)
        let mut seen_edges = BTreeSet::new();
        for (dependent, dependency) in edges {
            if !nodes.contains(dependent) || !nodes.contains(dependency) {
                continue;
            }
            // Two FK columns pointing at the same parent are a single dependency
            if !seen_edges.insert((dependent.as_str(), dependency.as_str())) {
                continue;
            }
            adj_list
                .entry(dependency.as_str())
                .or_default()
                .push(dependent.as_str());
            *in_degree.entry(dependent.as_str()).or_insert(0) += 1;
        }

        // 3. Kahn's Algorithm (Layered)
        let mut layers: Vec<Vec<String>> = Vec::new();
        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut total_resolved = 0;

        while !queue.is_empty() {
            let layer_size = queue.len();
            let mut current_layer = Vec::with_capacity(layer_size);

            for _ in 0..layer_size {
                if let Some(current) = queue.pop_front() {
                    current_layer.push(current.to_string());
                    total_resolved += 1;

                    if let Some(neighbors) = adj_list.get(current) {
                        for neighbor in neighbors {
                            if let Some(degree) = in_degree.get_mut(neighbor) {
                                *degree -= 1;
                                if *degree == 0 {
                                    queue.push_back(*neighbor);
                                }
                            }
                        }
                    }
                }
            }
            current_layer.sort();
            layers.push(current_layer);
        }

        // 4. Cycle Detection
        if total_resolved != nodes.len() {
            let stuck: Vec<&str> = in_degree
                .iter()
                .filter(|(_, degree)| **degree > 0)
                .map(|(name, _)| *name)
                .collect();
            return Err(DomainError::CircularDependency(format!(
                "Resolved {}/{} tables. Unresolved: {}",
                total_resolved,
                nodes.len(),
                stuck.join(", ")
            )));
        }

        Ok(layers)
    }

    /// Layer index of every table, derived from [`GraphSolver::plan_layers`].
    pub fn depth_index(layers: &[Vec<String>]) -> BTreeMap<String, usize> {
        layers
            .iter()
            .enumerate()
            .flat_map(|(depth, layer)| layer.iter().map(move |t| (t.clone(), depth)))
            .collect()
    }
}
