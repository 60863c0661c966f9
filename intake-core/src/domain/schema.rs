// intake-core/src/domain/schema.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Table -> primary-key columns in ordinal position order.
/// Frozen once discovered: nothing mutates it during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyMap {
    keys: BTreeMap<String, Vec<String>>,
}

impl PrimaryKeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `column` to the key of `table` (callers feed ordinal order).
    pub fn push(&mut self, table: impl Into<String>, column: impl Into<String>) {
        self.keys
            .entry(table.into())
            .or_default()
            .push(column.into());
    }

    /// `None` means the table declares no primary key.
    pub fn get(&self, table: &str) -> Option<&[String]> {
        self.keys
            .get(table)
            .or_else(|| {
                self.keys
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(table))
                    .map(|(_, cols)| cols)
            })
            .map(Vec::as_slice)
            .filter(|cols| !cols.is_empty())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<T, C> FromIterator<(T, Vec<C>)> for PrimaryKeyMap
where
    T: Into<String>,
    C: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (T, Vec<C>)>>(iter: I) -> Self {
        let mut map = PrimaryKeyMap::new();
        for (table, columns) in iter {
            let table = table.into();
            for column in columns {
                map.push(table.clone(), column);
            }
        }
        map
    }
}
