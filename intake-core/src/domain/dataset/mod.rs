// intake-core/src/domain/dataset/mod.rs

pub mod table;
pub mod value;

pub use table::{Record, Table};
pub use value::Value;

use std::collections::BTreeMap;

/// Table name -> table. Ordered by name so every stage iterates
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    tables: BTreeMap<String, Table>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under the table's own name, returning the replaced table.
    pub fn insert(&mut self, table: Table) -> Option<Table> {
        self.tables.insert(table.name().to_string(), table)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.tables.values().map(Table::len).sum()
    }

    /// Row count per table, detached from the rows themselves.
    pub fn row_counts(&self) -> BTreeMap<String, u64> {
        self.tables
            .iter()
            .map(|(name, table)| (name.clone(), table.len() as u64))
            .collect()
    }
}

impl FromIterator<Table> for Dataset {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for table in iter {
            dataset.insert(table);
        }
        dataset
    }
}

impl IntoIterator for Dataset {
    type Item = Table;
    type IntoIter = std::collections::btree_map::IntoValues<String, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_values()
    }
}
