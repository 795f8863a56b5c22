//! Row/table key-value binding
//!
//! `TableStore` models a legacy row API: every table has a fixed number of
//! key columns, inserts fail on existing rows, replaces fail on missing rows
//! and partial keys select rows by key prefix. `TableBinding` adapts it to
//! [`KeyValueStore`] by splitting composite keys: the object type names the
//! table and the attributes are the key columns.

use crate::core::key_codec::{build_key, split_key};
use crate::core::traits::KeyValueStore;
use crate::types::StoreError;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct Table {
    key_columns: usize,
    rows: BTreeMap<Vec<String>, Vec<u8>>,
}

impl Table {
    fn check_key(&self, name: &str, key: &[String]) -> Result<(), StoreError> {
        if key.len() != self.key_columns {
            return Err(StoreError::KeySchema {
                table: name.to_string(),
                expected: self.key_columns,
                actual: key.len(),
            });
        }
        Ok(())
    }
}

/// A set of named tables with strict key schemas
#[derive(Debug, Clone, Default)]
pub struct TableStore {
    tables: BTreeMap<String, Table>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Create a table with `key_columns` key columns
    ///
    /// # Errors
    ///
    /// Returns a Backend error if the table already exists.
    pub fn create_table(&mut self, name: &str, key_columns: usize) -> Result<(), StoreError> {
        if self.has_table(name) {
            return Err(StoreError::Backend {
                message: format!("table {} already exists", name),
            });
        }
        self.tables.insert(
            name.to_string(),
            Table {
                key_columns,
                rows: BTreeMap::new(),
            },
        );
        debug!(table = name, key_columns, "Created table");
        Ok(())
    }

    fn table(&self, name: &str) -> Result<&Table, StoreError> {
        self.tables.get(name).ok_or_else(|| StoreError::Backend {
            message: format!("table {} does not exist", name),
        })
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table, StoreError> {
        self.tables.get_mut(name).ok_or_else(|| StoreError::Backend {
            message: format!("table {} does not exist", name),
        })
    }

    /// Insert a new row
    ///
    /// # Errors
    ///
    /// Returns RowExists if a row with the same key is present.
    pub fn insert_row(&mut self, name: &str, key: Vec<String>, value: Vec<u8>) -> Result<(), StoreError> {
        let table = self.table_mut(name)?;
        table.check_key(name, &key)?;
        if table.rows.contains_key(&key) {
            return Err(StoreError::RowExists {
                table: name.to_string(),
            });
        }
        table.rows.insert(key, value);
        Ok(())
    }

    /// Replace an existing row
    ///
    /// # Errors
    ///
    /// Returns RowMissing if no row has the given key.
    pub fn replace_row(&mut self, name: &str, key: Vec<String>, value: Vec<u8>) -> Result<(), StoreError> {
        let table = self.table_mut(name)?;
        table.check_key(name, &key)?;
        match table.rows.get_mut(&key) {
            Some(row) => {
                *row = value;
                Ok(())
            }
            None => Err(StoreError::RowMissing {
                table: name.to_string(),
            }),
        }
    }

    pub fn get_row(&self, name: &str, key: &[String]) -> Result<Option<Vec<u8>>, StoreError> {
        let table = self.table(name)?;
        table.check_key(name, key)?;
        Ok(table.rows.get(key).cloned())
    }

    /// Rows whose leading key columns equal `partial`, in key order
    pub fn get_rows(&self, name: &str, partial: &[String]) -> Result<Vec<(Vec<String>, Vec<u8>)>, StoreError> {
        let table = self.table(name)?;
        if partial.len() > table.key_columns {
            return Err(StoreError::KeySchema {
                table: name.to_string(),
                expected: table.key_columns,
                actual: partial.len(),
            });
        }
        Ok(table
            .rows
            .iter()
            .filter(|(key, _)| key.starts_with(partial))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    /// All rows of all tables
    fn all_rows(&self) -> impl Iterator<Item = (&str, &Vec<String>, &Vec<u8>)> {
        self.tables
            .iter()
            .flat_map(|(name, table)| table.rows.iter().map(move |(k, v)| (name.as_str(), k, v)))
    }
}

/// [`KeyValueStore`] over a [`TableStore`]
///
/// Tables are created on first write with the arity of the written key; a
/// later key of a different arity is rejected by the table's schema.
#[derive(Debug, Clone, Default)]
pub struct TableBinding {
    tables: TableStore,
}

impl TableBinding {
    pub fn new(tables: TableStore) -> Self {
        TableBinding { tables }
    }

    pub fn tables(&self) -> &TableStore {
        &self.tables
    }
}

fn split(key: &str) -> Result<(String, Vec<String>), StoreError> {
    let (object_type, attrs) = split_key(key).map_err(|e| StoreError::Backend {
        message: e.to_string(),
    })?;
    Ok((object_type.as_str().to_string(), attrs))
}

fn join(table: &str, key: &[String]) -> Result<String, StoreError> {
    let object_type = crate::types::ObjectType::from_tag(table).ok_or_else(|| StoreError::Backend {
        message: format!("table {} has no object type", table),
    })?;
    build_key(object_type, key).map_err(|e| StoreError::Backend {
        message: e.to_string(),
    })
}

impl KeyValueStore for TableBinding {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let (table, attrs) = split(key)?;
        if !self.tables.has_table(&table) {
            return Ok(None);
        }
        self.tables.get_row(&table, &attrs)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let (table, attrs) = split(key)?;
        if !self.tables.has_table(&table) {
            self.tables.create_table(&table, attrs.len())?;
        }
        if self.tables.get_row(&table, &attrs)?.is_some() {
            self.tables.replace_row(&table, attrs, value)
        } else {
            self.tables.insert_row(&table, attrs, value)
        }
    }

    fn range_scan(&mut self, low: &str, high: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        if low >= high {
            return Ok(Vec::new());
        }

        let in_range = |key: &str| low <= key && key < high;
        let mut entries = Vec::new();

        // Prefix ranges map onto a partial-key row query.
        let prefix = high.strip_suffix(char::MAX).filter(|p| *p == low);
        match prefix.map(split) {
            Some(Ok((table, partial))) => {
                if self.tables.has_table(&table) {
                    for (row_key, value) in self.tables.get_rows(&table, &partial)? {
                        let key = join(&table, &row_key)?;
                        if in_range(&key) {
                            entries.push((key, value));
                        }
                    }
                }
            }
            _ => {
                for (table, row_key, value) in self.tables.all_rows() {
                    let key = join(table, row_key)?;
                    if in_range(&key) {
                        entries.push((key, value.clone()));
                    }
                }
            }
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }
}
