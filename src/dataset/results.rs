// ABOUTME: Append-only {prompt, response} CSV results files confined to a root directory
// ABOUTME: Serializes appends, and supports clearing and reading files back for download
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};

/// A results file resolved inside the store root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsFile {
    /// Path relative to the root, as shown to callers
    pub relative: PathBuf,
    /// Path on disk
    pub absolute: PathBuf,
}

impl ResultsFile {
    /// Caller-facing name
    #[must_use]
    pub fn display_name(&self) -> String {
        self.relative.display().to_string()
    }

    /// Final path component, used as the download file name
    #[must_use]
    pub fn file_name(&self) -> String {
        self.relative.file_name().map_or_else(
            || defaults::RESULTS_FILE.to_owned(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// Outcome of clearing a results file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The file existed and was deleted
    Removed,
    /// There was nothing to delete
    Absent,
}

/// Results CSV files under one root directory
#[derive(Debug)]
pub struct ResultsStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl ResultsStore {
    /// Create a store rooted at `root`; the directory is created on first write
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Resolve a caller-supplied path inside the root
    ///
    /// `None` or an empty path selects the default results file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for absolute paths, `..` components, or control
    /// characters.
    pub fn resolve(&self, requested: Option<&str>) -> AppResult<ResultsFile> {
        let requested = requested.map(str::trim).unwrap_or_default();
        if requested.chars().any(char::is_control) {
            return Err(AppError::invalid_input(format!(
                "Results path must not contain control characters: {requested:?}"
            )));
        }

        let mut relative = PathBuf::new();
        for component in Path::new(requested).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(AppError::invalid_input(format!(
                        "Results path must not contain '..': {requested}"
                    )));
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(AppError::invalid_input(format!(
                        "Results path must be relative: {requested}"
                    )));
                }
            }
        }

        if relative.as_os_str().is_empty() {
            relative.push(defaults::RESULTS_FILE);
        }

        Ok(ResultsFile {
            absolute: self.root.join(&relative),
            relative,
        })
    }

    /// Append one `{prompt, response}` row, writing the header for a new file
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unsafe path and `StorageError` if the
    /// file cannot be written.
    #[instrument(skip(self, prompt, response))]
    pub async fn append(
        &self,
        requested: Option<&str>,
        prompt: &str,
        response: &str,
    ) -> AppResult<ResultsFile> {
        let file = self.resolve(requested)?;
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = file.absolute.parent() {
            fs::create_dir_all(parent).await?;
        }
        let is_new = !fs::try_exists(&file.absolute).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        if is_new {
            writer.write_record(["prompt", "response"])?;
        }
        writer.write_record([prompt, response])?;
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::internal(format!("Failed to flush CSV row: {e}")))?;

        let mut handle = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file.absolute)
            .await?;
        handle.write_all(&bytes).await?;
        handle.flush().await?;

        debug!(path = %file.absolute.display(), new_file = is_new, "Appended result row");
        Ok(file)
    }

    /// Delete a results file if it exists
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unsafe path and `StorageError` if the
    /// file exists but cannot be removed.
    pub async fn clear(&self, requested: Option<&str>) -> AppResult<(ResultsFile, ClearOutcome)> {
        let file = self.resolve(requested)?;
        let _guard = self.write_lock.lock().await;

        match fs::remove_file(&file.absolute).await {
            Ok(()) => Ok((file, ClearOutcome::Removed)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok((file, ClearOutcome::Absent)),
            Err(e) => Err(e.into()),
        }
    }

    /// Read a results file for download
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the file does not exist.
    pub async fn read(&self, requested: Option<&str>) -> AppResult<(ResultsFile, Vec<u8>)> {
        let file = self.resolve(requested)?;

        match fs::read(&file.absolute).await {
            Ok(bytes) => Ok((file, bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::not_found(
                format!("Results file '{}'", file.display_name()),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
