// intake-core/src/domain/validation/foreign_key.rs

use std::collections::HashSet;
use tracing::{info, instrument, warn};

use super::issue::{ErrorKind, ValidationError, aggregate};
use crate::domain::dataset::Dataset;
use crate::domain::error::DomainError;
use crate::domain::graph::{ForeignKey, RelationshipGraph};

pub struct ForeignKeyValidator;

impl ForeignKeyValidator {
    /// Cascades FK checks over the graph, parents first.
    ///
    /// `dataset` is the single "current state": each edge takes the child out,
    /// filters it against the parent as it stands *now* (possibly already
    /// cleaned by an earlier edge) and puts the cleaned child back. The
    /// unvalidated input is never consulted again once a table is touched.
    #[instrument(skip_all, fields(edges = graph.edges().len()))]
    pub fn validate(
        dataset: Dataset,
        graph: &RelationshipGraph,
    ) -> Result<(Dataset, Vec<ValidationError>), DomainError> {
        let order = graph.validation_order()?;

        let mut state = dataset;
        let mut errors = Vec::new();
        for edge in &order {
            let (next, edge_errors) = Self::apply_edge(state, edge);
            state = next;
            errors.extend(edge_errors);
        }

        Ok((state, errors))
    }

    /// A child row survives when its FK is null or its key text appears among
    /// the parent's key texts. A parent missing from the state is an empty
    /// parent: every non-null reference dangles.
    pub fn apply_edge(mut state: Dataset, edge: &ForeignKey) -> (Dataset, Vec<ValidationError>) {
        let parent_keys: HashSet<String> = match state.get(&edge.parent) {
            Some(parent) => parent
                .column_values(&edge.parent_column)
                .into_iter()
                .filter_map(|v| v.key_text())
                .collect(),
            None => {
                warn!(edge = %edge, "Parent table not extracted, treating it as empty");
                HashSet::new()
            }
        };

        let Some(child) = state.remove(&edge.child) else {
            warn!(edge = %edge, "Child table not extracted, skipping relationship");
            return (state, Vec::new());
        };

        let fk_index = child.column_index(&edge.column);
        let (kept, removed) = child.partition(|row| {
            match fk_index.and_then(|i| row.get(i).key_text()) {
                None => true,
                Some(key) => parent_keys.contains(&key),
            }
        });

        let errors = if removed.is_empty() {
            Vec::new()
        } else {
            info!(
                edge = %edge,
                removed = removed.len(),
                "🔗 Removing rows with dangling foreign keys"
            );
            aggregate(
                &edge.child,
                ErrorKind::InvalidFk,
                removed.iter().map(|row| {
                    let value = fk_index.map(|i| row.get(i).to_string()).unwrap_or_default();
                    format!(
                        "{}={} not found in {}.{}",
                        edge.column, value, edge.parent, edge.parent_column
                    )
                }),
            )
        };

        state.insert(kept);
        (state, errors)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::dataset::{Table, Value};
    use crate::domain::schema::PrimaryKeyMap;
    use crate::domain::validation::PrimaryKeyValidator;
    use anyhow::Result;

    fn table(name: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Result<Table> {
        Ok(Table::with_rows(
            name,
            columns.iter().map(|c| c.to_string()).collect(),
            rows,
        )?)
    }

    fn ids(prefix: &str, range: std::ops::Range<usize>) -> Vec<Vec<Value>> {
        range.map(|i| vec![Value::from(format!("{prefix}{i}"))]).collect()
    }

    /// Asserts that every non-null FK left in the child exists in the parent.
    fn assert_referentially_sound(dataset: &Dataset, graph: &RelationshipGraph) {
        for edge in graph.edges() {
            let (Some(child), Some(parent)) = (dataset.get(&edge.child), dataset.get(&edge.parent))
            else {
                continue;
            };
            let keys: HashSet<String> = parent
                .column_values(&edge.parent_column)
                .into_iter()
                .filter_map(|v| v.key_text())
                .collect();
            for value in child.column_values(&edge.column) {
                if let Some(k) = value.key_text() {
                    assert!(keys.contains(&k), "{} dangles on {}", k, edge);
                }
            }
        }
    }

    #[test]
    fn test_payments_referencing_survivors_are_all_valid() -> Result<()> {
        // 100 orders, 5 with a null id -> 95 survive PK validation
        let orders_rows = (0..100)
            .map(|i| {
                let id = if i < 5 { Value::Null } else { Value::from(format!("o{i}")) };
                vec![id, Value::from("c1")]
            })
            .collect();
        let orders = table("orders", &["order_id", "customer_id"], orders_rows)?;
        let customers = table("customers", &["customer_id"], vec![vec!["c1".into()]])?;
        let payments = table("order_payments", &["order_id"], ids("o", 10..100))?;

        let dataset: Dataset = [orders, customers, payments].into_iter().collect();
        let pks: PrimaryKeyMap = [("orders", vec!["order_id"])].into_iter().collect();
        let (dataset, pk_errors) = PrimaryKeyValidator::validate(dataset, &pks);
        assert_eq!(pk_errors[0].affected_count, 5);

        let (clean, fk_errors) = ForeignKeyValidator::validate(dataset, &RelationshipGraph::olist())?;

        assert_eq!(clean.get("orders").unwrap().len(), 95);
        assert_eq!(clean.get("order_payments").unwrap().len(), 90);
        assert!(fk_errors.is_empty());
        Ok(())
    }

    #[test]
    fn test_cascade_uses_cleaned_parent() -> Result<()> {
        // o2 points at an unknown customer: it is dropped from orders, so the
        // item referencing o2 must be dropped as well.
        let customers = table("customers", &["customer_id"], vec![vec!["c1".into()]])?;
        let orders = table(
            "orders",
            &["order_id", "customer_id"],
            vec![vec!["o1".into(), "c1".into()], vec!["o2".into(), "c404".into()]],
        )?;
        let items = table(
            "order_items",
            &["order_id", "seller_id", "product_id"],
            vec![
                vec!["o1".into(), Value::Null, Value::Null],
                vec!["o2".into(), Value::Null, Value::Null],
            ],
        )?;
        let graph = RelationshipGraph::olist();
        let dataset: Dataset = [customers, orders, items].into_iter().collect();

        let (clean, errors) = ForeignKeyValidator::validate(dataset, &graph)?;

        assert_eq!(clean.get("orders").unwrap().len(), 1);
        let items = clean.get("order_items").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items.rows()[0].get(0), &Value::from("o1"));

        let details: Vec<&str> = errors.iter().map(|e| e.detail.as_str()).collect();
        assert!(details.contains(&"customer_id=c404 not found in customers.customer_id"));
        assert!(details.contains(&"order_id=o2 not found in orders.order_id"));
        assert_referentially_sound(&clean, &graph);
        Ok(())
    }

    #[test]
    fn test_null_fk_is_valid() -> Result<()> {
        let translation = table(
            "product_category_name_translation",
            &["product_category_name"],
            vec![vec!["beleza_saude".into()]],
        )?;
        let products = table(
            "products",
            &["product_id", "product_category_name"],
            vec![
                vec!["p1".into(), "beleza_saude".into()],
                vec!["p2".into(), Value::Null],
                vec!["p3".into(), "pcs".into()],
            ],
        )?;
        let dataset: Dataset = [translation, products].into_iter().collect();

        let (clean, errors) = ForeignKeyValidator::validate(dataset, &RelationshipGraph::olist())?;

        assert_eq!(clean.get("products").unwrap().len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].detail,
            "product_category_name=pcs not found in product_category_name_translation.product_category_name"
        );
        Ok(())
    }

    #[test]
    fn test_errors_aggregate_per_distinct_value() -> Result<()> {
        let orders = table("orders", &["order_id"], ids("o", 0..2))?;
        let reviews = table(
            "order_reviews",
            &["order_id"],
            vec![
                vec!["o1".into()],
                vec!["ghost".into()],
                vec!["ghost".into()],
                vec!["other".into()],
            ],
        )?;
        let edge = ForeignKey::new("order_reviews", "order_id", "orders", "order_id");
        let state: Dataset = [orders, reviews].into_iter().collect();

        let (state, errors) = ForeignKeyValidator::apply_edge(state, &edge);

        assert_eq!(state.get("order_reviews").unwrap().len(), 1);
        let summary: Vec<(&str, usize)> = errors
            .iter()
            .map(|e| (e.detail.as_str(), e.affected_count))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("order_id=ghost not found in orders.order_id", 2),
                ("order_id=other not found in orders.order_id", 1),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_empty_parent_invalidates_every_non_null_fk() -> Result<()> {
        let orders = table("orders", &["order_id"], Vec::new())?;
        let payments = table(
            "order_payments",
            &["order_id"],
            vec![vec!["o1".into()], vec![Value::Null], vec!["o2".into()]],
        )?;
        let edge = ForeignKey::new("order_payments", "order_id", "orders", "order_id");
        let state: Dataset = [orders, payments].into_iter().collect();

        let (state, errors) = ForeignKeyValidator::apply_edge(state, &edge);

        assert_eq!(state.get("order_payments").unwrap().len(), 1);
        assert_eq!(super::super::issue::affected_rows(&errors), 2);
        Ok(())
    }

    #[test]
    fn test_missing_child_is_skipped() -> Result<()> {
        let orders = table("orders", &["order_id"], ids("o", 0..3))?;
        let edge = ForeignKey::new("order_payments", "order_id", "orders", "order_id");
        let state: Dataset = [orders].into_iter().collect();

        let (state, errors) = ForeignKeyValidator::apply_edge(state, &edge);

        assert!(!state.contains("order_payments"));
        assert_eq!(state.get("orders").unwrap().len(), 3);
        assert!(errors.is_empty());
        Ok(())
    }

    #[test]
    fn test_numeric_keys_match_across_int_and_float() -> Result<()> {
        let parent = table("zips", &["zip"], vec![vec![Value::Int(1037)]])?;
        let child = table("customers", &["zip"], vec![vec![Value::Float(1037.0)]])?;
        let edge = ForeignKey::new("customers", "zip", "zips", "zip");
        let state: Dataset = [parent, child].into_iter().collect();

        let (state, errors) = ForeignKeyValidator::apply_edge(state, &edge);

        assert_eq!(state.get("customers").unwrap().len(), 1);
        assert!(errors.is_empty());
        Ok(())
    }
}
