//! Sources of raw definition documents.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::isa::error::DefError;

/// Top-level key every definition document must carry.
pub const DATA_KEY: &str = "data";
/// Extension appended to logical document names on disk.
pub const DOCUMENT_EXTENSION: &str = "json";

/// A parsed document reduced to its non-empty `data` container.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    name: String,
    data: Map<String, Value>,
}

impl RawDocument {
    /// Parses `text` and checks for the `data` container.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, DefError> {
        let name = name.into();
        let value: Value = serde_json::from_str(text)
            .map_err(|err| DefError::load(&name, format!("invalid JSON: {err}")))?;
        Self::from_value(name, value)
    }

    pub fn from_value(name: impl Into<String>, value: Value) -> Result<Self, DefError> {
        let name = name.into();
        let Value::Object(mut root) = value else {
            return Err(DefError::load(name, "document root is not an object"));
        };
        match root.remove(DATA_KEY) {
            Some(Value::Object(data)) if !data.is_empty() => Ok(Self { name, data }),
            _ => Err(DefError::load(name, "missing data section")),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns the object stored under `data.<key>`.
    pub fn section(&self, key: &str) -> Result<&Map<String, Value>, DefError> {
        self.optional_section(key)?
            .ok_or_else(|| DefError::load(&self.name, format!("missing '{key}' section")))
    }

    /// Returns the object stored under `data.<key>` if the key is present.
    pub fn optional_section(&self, key: &str) -> Result<Option<&Map<String, Value>>, DefError> {
        match self.data.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map)),
            Some(_) => Err(DefError::load(
                &self.name,
                format!("'{key}' section is not an object"),
            )),
        }
    }

    /// Returns the value stored under `data.<key>`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Supplies named raw documents to the compiler.
pub trait DocumentStore {
    fn load(&self, name: &str) -> Result<RawDocument, DefError>;
}

/// Reads `<root>/<name>.json` documents from a definitions directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Opens a definitions root, which must be an existing, readable directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, DefError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(DefError::path(root, "no such directory"));
        }
        if !root.is_dir() {
            return Err(DefError::path(root, "not a directory"));
        }
        fs::read_dir(root).map_err(|err| DefError::path(root, format!("unreadable: {err}")))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{DOCUMENT_EXTENSION}"))
    }
}

impl DocumentStore for DirectoryStore {
    fn load(&self, name: &str) -> Result<RawDocument, DefError> {
        let path = self.document_path(name);
        let shown = path.display().to_string();
        if !path.is_file() {
            return Err(DefError::load(shown, "no such file"));
        }
        let text = fs::read_to_string(&path)
            .map_err(|err| DefError::load(&shown, format!("unreadable: {err}")))?;
        debug!(document = %shown, bytes = text.len(), "read definition document");
        RawDocument::parse(shown, &text)
    }
}

/// In-memory documents keyed by logical name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.documents.insert(name.into(), text.into());
        self
    }

    pub fn insert_value(&mut self, name: impl Into<String>, value: &Value) -> &mut Self {
        self.insert(name, value.to_string())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.documents.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, name: &str) -> Result<RawDocument, DefError> {
        let text = self
            .documents
            .get(name)
            .ok_or_else(|| DefError::load(name, "no such document"))?;
        RawDocument::parse(name, text)
    }
}
