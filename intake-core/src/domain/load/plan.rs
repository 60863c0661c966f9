// intake-core/src/domain/load/plan.rs

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::error::DomainError;
use crate::domain::graph::RelationshipGraph;

/// Curated table order for the incremental load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadPlan {
    order: Vec<String>,
}

impl LoadPlan {
    pub fn olist_order() -> Vec<String> {
        [
            "sellers",
            "customers",
            "product_category_name_translation",
            "orders",
            "products",
            "order_payments",
            "order_reviews",
            "order_items",
            "geolocation",
        ]
        .map(String::from)
        .to_vec()
    }

    /// Checks the order against the graph: whenever both ends of an edge are
    /// planned, the parent must come first. Repeated names keep their first
    /// position.
    pub fn new(order: Vec<String>, graph: &RelationshipGraph) -> Result<Self, DomainError> {
        let mut deduped: Vec<String> = Vec::with_capacity(order.len());
        for table in order {
            if !deduped.contains(&table) {
                deduped.push(table);
            }
        }

        let position: HashMap<&str, usize> = deduped
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        for edge in graph.edges() {
            let child = position.get(edge.child.as_str());
            let parent = position.get(edge.parent.as_str());
            if let (Some(child), Some(parent)) = (child, parent) {
                if parent > child {
                    return Err(DomainError::LoadOrderViolation {
                        child: edge.child.clone(),
                        parent: edge.parent.clone(),
                    });
                }
            }
        }

        Ok(Self { order: deduped })
    }

    /// Parents-first order straight from the graph layers, for projects that
    /// do not curate one. `extra` tables outside the graph go last.
    pub fn derived(graph: &RelationshipGraph, extra: &[String]) -> Result<Self, DomainError> {
        let mut order: Vec<String> = graph.layers()?.into_iter().flatten().collect();
        order.extend(extra.iter().cloned());
        Self::new(order, graph)
    }

    pub fn tables(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, table: &str) -> bool {
        self.order.iter().any(|t| t == table)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
