//! Append-only JSON record stores
//!
//! Game-data files hold one top-level object with a category array
//! (`{"buffs": [...]}`, `{"entries": [...]}`). Appends read the whole file,
//! extend the category and rewrite it with 3-space indentation. Keys other
//! than the category are kept untouched.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::degrade::{Degradation, DegradationReason};
use crate::error::{Error, Result};

const INDENT: &[u8] = b"   ";

/// Outcome of an append.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendReport {
    /// Records added by this call.
    pub appended: usize,
    /// Records in the category afterwards.
    pub total: usize,
    /// Set when the existing file was unreadable and started over.
    pub recovered: Option<Degradation>,
}

/// One category of one JSON store file.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    category: String,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>, category: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            category: category.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Read the store document.
    ///
    /// A missing or empty file is an empty category. A file that does not
    /// parse as a JSON object, or whose category is not an array, is
    /// replaced by an empty document and reported as a degradation.
    ///
    /// # Errors
    /// Only I/O failures other than "not found" are errors.
    pub fn read(&self) -> Result<(Map<String, Value>, Option<Degradation>)> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(Error::file_io(&self.path, e)),
        };
        if content.trim().is_empty() {
            return Ok((self.empty_document(), None));
        }

        let problem = match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(mut document)) => {
                match document.get(&self.category).map(Value::is_array) {
                    None => {
                        document.insert(self.category.clone(), Value::Array(Vec::new()));
                        return Ok((document, None));
                    }
                    Some(true) => return Ok((document, None)),
                    Some(false) => format!("'{}' is not an array", self.category),
                }
            }
            Ok(_) => "top level is not an object".to_string(),
            Err(e) => e.to_string(),
        };

        let degradation = Degradation::new(
            self.category.clone(),
            DegradationReason::CorruptStore {
                path: self.path.clone(),
                detail: problem,
            },
        );
        degradation.log();
        Ok((self.empty_document(), Some(degradation)))
    }

    /// The category's records. Unreadable stores read as empty.
    ///
    /// # Errors
    /// Returns an error on I/O failure.
    pub fn records(&self) -> Result<Vec<Value>> {
        let (mut document, _) = self.read()?;
        match document.remove(&self.category) {
            Some(Value::Array(records)) => Ok(records),
            _ => Ok(Vec::new()),
        }
    }

    /// Append `records` to the category and rewrite the file.
    ///
    /// No deduplication: appending the same records twice stores them twice.
    ///
    /// # Errors
    /// Returns an error if a record cannot be serialized or the file cannot
    /// be written.
    pub fn append<T: Serialize>(&self, records: &[T]) -> Result<AppendReport> {
        let (mut document, recovered) = self.read()?;
        let new_records = records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let category = document
            .entry(self.category.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        let total = match category {
            Value::Array(existing) => {
                existing.extend(new_records);
                existing.len()
            }
            other => {
                *other = Value::Array(new_records);
                records.len()
            }
        };

        self.write(&document)?;
        tracing::info!(
            "Appended {} {} to {} ({} total)",
            records.len(),
            self.category,
            self.path.display(),
            total
        );
        Ok(AppendReport {
            appended: records.len(),
            total,
            recovered,
        })
    }

    fn write(&self, document: &Map<String, Value>) -> Result<()> {
        let mut output = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut output, PrettyFormatter::with_indent(INDENT));
        document.serialize(&mut serializer)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::file_io(parent, e))?;
        }
        fs::write(&self.path, output).map_err(|e| Error::file_io(&self.path, e))
    }

    fn empty_document(&self) -> Map<String, Value> {
        let mut document = Map::new();
        document.insert(self.category.clone(), Value::Array(Vec::new()));
        document
    }
}

/// Append `records` to `category` in the store at `store_path`.
///
/// # Errors
/// See [`JsonStore::append`].
pub fn append_records<T: Serialize>(
    records: &[T],
    store_path: &Path,
    category: &str,
) -> Result<AppendReport> {
    JsonStore::new(store_path, category).append(records)
}
