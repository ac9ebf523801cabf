// ABOUTME: Per-session dataset registry backed by a concurrent map
// ABOUTME: Replaces a process-wide "current dataset" slot with caller-keyed tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use dashmap::DashMap;

use super::table::DatasetTable;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

/// Uploaded tables keyed by session id
///
/// An upload replaces the session's previous table. Sessions never see each
/// other's data.
#[derive(Debug, Default)]
pub struct DatasetStore {
    tables: DashMap<String, Arc<DatasetTable>>,
}

impl DatasetStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `table` for `session`, returning its column names
    pub fn insert(&self, session: &str, table: DatasetTable) -> Vec<String> {
        let columns = table.columns().to_vec();
        AppLogger::log_dataset_event(
            session,
            "upload",
            &format!("{} columns, {} rows", columns.len(), table.row_count()),
        );
        self.tables.insert(session.to_owned(), Arc::new(table));
        columns
    }

    /// Table for `session`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the session has not uploaded a dataset.
    pub fn get(&self, session: &str) -> AppResult<Arc<DatasetTable>> {
        self.tables
            .get(session)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AppError::not_found(format!("Dataset for session '{session}'")))
    }

    /// Values of `column` in the session's table
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if there is no dataset or no such column.
    pub fn column_values(&self, session: &str, column: &str) -> AppResult<Vec<String>> {
        let values = self.get(session)?.column_values(column)?;
        AppLogger::log_dataset_event(
            session,
            "read_column",
            &format!("{column}: {} rows", values.len()),
        );
        Ok(values)
    }

    /// Number of sessions holding a table
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no session holds a table
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn table(csv: &str) -> DatasetTable {
        DatasetTable::from_csv_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = DatasetStore::new();
        store.insert("alice", table("q\nfrom alice\n"));
        store.insert("bob", table("q\nfrom bob\n"));

        assert_eq!(store.column_values("alice", "q").unwrap(), ["from alice"]);
        assert_eq!(store.column_values("bob", "q").unwrap(), ["from bob"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_upload_replaces_previous_table() {
        let store = DatasetStore::new();
        store.insert("s", table("old\n1\n"));
        let columns = store.insert("s", table("new\n2\n"));

        assert_eq!(columns, ["new"]);
        assert_eq!(
            store.column_values("s", "old").unwrap_err().code,
            ErrorCode::ResourceNotFound
        );
    }

    #[test]
    fn test_missing_session_is_not_found() {
        let store = DatasetStore::new();
        assert_eq!(store.get("nobody").unwrap_err().code, ErrorCode::ResourceNotFound);
    }
}
