// intake-core/src/domain/graph/relationship.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::dag::GraphSolver;
use crate::domain::error::DomainError;

/// `child.column -> parent.parent_column`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub child: String,
    pub column: String,
    pub parent: String,
    pub parent_column: String,
}

impl ForeignKey {
    pub fn new(child: &str, column: &str, parent: &str, parent_column: &str) -> Self {
        Self {
            child: child.to_string(),
            column: column.to_string(),
            parent: parent.to_string(),
            parent_column: parent_column.to_string(),
        }
    }
}

impl std::fmt::Display for ForeignKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.child, self.column, self.parent, self.parent_column
        )
    }
}

/// The statically declared FK dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipGraph {
    edges: Vec<ForeignKey>,
}

impl Default for RelationshipGraph {
    fn default() -> Self {
        Self::olist()
    }
}

impl RelationshipGraph {
    pub fn new(edges: Vec<ForeignKey>) -> Self {
        Self { edges }
    }

    /// The Brazilian e-commerce (Olist) warehouse.
    pub fn olist() -> Self {
        Self::new(vec![
            ForeignKey::new("orders", "customer_id", "customers", "customer_id"),
            ForeignKey::new("order_payments", "order_id", "orders", "order_id"),
            ForeignKey::new(
                "products",
                "product_category_name",
                "product_category_name_translation",
                "product_category_name",
            ),
            ForeignKey::new("order_items", "order_id", "orders", "order_id"),
            ForeignKey::new("order_items", "seller_id", "sellers", "seller_id"),
            ForeignKey::new("order_items", "product_id", "products", "product_id"),
            ForeignKey::new("order_reviews", "order_id", "orders", "order_id"),
        ])
    }

    pub fn edges(&self) -> &[ForeignKey] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every table mentioned by an edge.
    pub fn tables(&self) -> BTreeSet<String> {
        self.edges
            .iter()
            .flat_map(|e| [e.child.clone(), e.parent.clone()])
            .collect()
    }

    /// Parents-first layering of the tables referenced by the graph.
    pub fn layers(&self) -> Result<Vec<Vec<String>>, DomainError> {
        let deps: Vec<(String, String)> = self
            .edges
            .iter()
            .map(|e| (e.child.clone(), e.parent.clone()))
            .collect();
        GraphSolver::plan_layers(&self.tables(), &deps)
    }

    /// Edges in execution order: sorted by the child's layer, stable in
    /// declaration order. When an edge runs, every edge whose child is its
    /// parent has already run.
    pub fn validation_order(&self) -> Result<Vec<ForeignKey>, DomainError> {
        for edge in &self.edges {
            if edge.child.is_empty()
                || edge.column.is_empty()
                || edge.parent.is_empty()
                || edge.parent_column.is_empty()
            {
                return Err(DomainError::InvalidRelationship(format!(
                    "incomplete edge '{}'",
                    edge
                )));
            }
        }

        let depth = GraphSolver::depth_index(&self.layers()?);
        let mut ordered = self.edges.clone();
        ordered.sort_by_key(|e| depth.get(&e.child).copied().unwrap_or(0));
        Ok(ordered)
    }
}
