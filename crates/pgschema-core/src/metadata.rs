//! Dump metadata record.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// File name of the metadata record in the output directory.
pub const METADATA_FILE: &str = "metadata.json";

/// Description of one dump run, written next to the split output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpMetadata {
    /// Server version from `SELECT version()`.
    pub server_version: String,
    /// Host the dump was taken from.
    pub host: String,
    /// Database name.
    pub database: String,
    /// Version string from `pg_dump --version`.
    pub pg_dump_version: String,
    /// Problems that did not stop the run.
    pub warnings: Vec<String>,
    /// When the dump was taken.
    pub generated_at: DateTime<Utc>,
}

impl DumpMetadata {
    /// Write the record as pretty-printed JSON, returning the file path.
    pub fn write(&self, directory: &Path) -> Result<PathBuf, Error> {
        let path = directory.join(METADATA_FILE);
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        fs::write(&path, json).map_err(|source| Error::io(&path, source))?;
        Ok(path)
    }
}
