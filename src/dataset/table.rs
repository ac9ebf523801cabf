// ABOUTME: In-memory tabular dataset parsed from an uploaded CSV or XLSX file
// ABOUTME: Exposes column names and per-column string values with blanks normalized to ""
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::Cursor;

use calamine::{Reader, Xlsx};

use crate::errors::{AppError, AppResult};

/// Upload formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Excel workbook; the first worksheet is read
    Xlsx,
}

impl DatasetFormat {
    /// Pick the format from an uploaded file name (case-insensitive extension)
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for any other extension.
    pub fn from_file_name(file_name: &str) -> AppResult<Self> {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".csv") {
            Ok(Self::Csv)
        } else if lower.ends_with(".xlsx") {
            Ok(Self::Xlsx)
        } else {
            Err(AppError::invalid_input(format!(
                "Unsupported file type '{file_name}'; upload a .csv or .xlsx file"
            )))
        }
    }
}

/// A table of named columns, every cell held as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl DatasetTable {
    /// Parse uploaded bytes in the given format
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the bytes cannot be parsed or have no header row.
    pub fn parse(format: DatasetFormat, bytes: &[u8]) -> AppResult<Self> {
        match format {
            DatasetFormat::Csv => Self::from_csv_bytes(bytes),
            DatasetFormat::Xlsx => Self::from_xlsx_bytes(bytes),
        }
    }

    /// Parse CSV bytes with a header row
    ///
    /// Short rows are padded with `""`; cells beyond the header are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the data is not valid CSV or has no header row.
    pub fn from_csv_bytes(bytes: &[u8]) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        let rows = reader
            .records()
            .map(|record| Ok(record?.iter().map(str::to_owned).collect()))
            .collect::<AppResult<Vec<Vec<String>>>>()?;

        Self::from_parts(columns, rows, "CSV file")
    }

    /// Parse the first worksheet of an XLSX workbook, its first row as header
    ///
    /// Empty cells become `""`; numbers render without a trailing `.0`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the workbook cannot be read, has no
    /// worksheet, or the sheet has no header row.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> AppResult<Self> {
        let mut workbook = Xlsx::new(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::invalid_input("XLSX workbook has no worksheets"))??;

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(ToString::to_string).collect::<Vec<_>>());
        let columns = rows
            .next()
            .map(|header| header.iter().map(|name| name.trim().to_owned()).collect())
            .unwrap_or_default();

        Self::from_parts(columns, rows, "XLSX worksheet")
    }

    fn from_parts(
        columns: Vec<String>,
        rows: impl IntoIterator<Item = Vec<String>>,
        source: &str,
    ) -> AppResult<Self> {
        if columns.is_empty() || columns.iter().all(String::is_empty) {
            return Err(AppError::invalid_input(format!("{source} has no header row")));
        }

        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Column names in file order
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Every value of one column, top to bottom
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the column does not exist.
    pub fn column_values(&self, column: &str) -> AppResult<Vec<String>> {
        let index = self
            .columns
            .iter()
            .position(|name| name == column)
            .ok_or_else(|| AppError::not_found(format!("Column '{column}'")))?;

        Ok(self.rows.iter().map(|row| row[index].clone()).collect())
    }
}
