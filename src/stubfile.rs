//! Stub definitions preloaded from a YAML file.
//!
//! ```yaml
//! files:
//!   - path: /report.xml
//!     file: http://fileserver/report.xml
//!     code: 200
//! contents:
//!   - path: /users
//!     type: json
//!     content: [{"name": "ada"}]
//!   - path: /login
//!     method: POST
//!     body: "<login><user>ada</user></login>"
//!     bodyType: xml
//!     content: ok
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StubStore;
use crate::stubs::{ConfigureError, ContentStub, ContentStubSpec, FileStub, FileStubSpec};

/// Errors that can occur when loading a stub file.
#[derive(Debug, Error)]
pub enum StubFileError {
    /// I/O error while reading the stub file.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// An entry is not a valid stub definition.
    #[error("{section} entry {index}: {source}")]
    Configure {
        section: &'static str,
        index: usize,
        #[source]
        source: ConfigureError,
    },
}

/// File and content stubs to register at startup.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct StubFile {
    /// File-backed stubs, same fields as `POST /configure`.
    #[serde(default)]
    pub files: Vec<FileStubSpec>,
    /// Content stubs, same fields as `POST /configure_content`.
    #[serde(default)]
    pub contents: Vec<ContentStubSpec>,
}

impl StubFile {
    /// Load stub definitions from a YAML file.
    ///
    /// # Parameters
    ///
    /// - `path` - Path to the YAML stub file
    ///
    /// # Returns
    ///
    /// Returns `Ok(StubFile)` on success, or `StubFileError` if the file cannot be read or parsed.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, StubFileError> {
        let txt = fs::read_to_string(path)?;
        Self::from_yaml(&txt)
    }

    /// Parse stub definitions from YAML text.
    pub fn from_yaml(txt: &str) -> Result<Self, StubFileError> {
        // An empty document has no stubs.
        if txt.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(txt)?)
    }

    /// Validate every entry and register them in order.
    ///
    /// Nothing is registered unless all entries are valid.
    ///
    /// # Parameters
    ///
    /// - `store` - Registry receiving the stubs
    ///
    /// # Returns
    ///
    /// Returns the number of registered stubs.
    ///
    /// # Errors
    ///
    /// Returns `StubFileError::Configure` for the first invalid entry.
    pub fn register(self, store: &StubStore) -> Result<usize, StubFileError> {
        let files = self
            .files
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                FileStub::try_from(spec)
                    .map_err(|source| StubFileError::Configure { section: "files", index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let contents = self
            .contents
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                ContentStub::try_from(spec)
                    .map_err(|source| StubFileError::Configure { section: "contents", index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = files.len() + contents.len();
        files.into_iter().for_each(|stub| store.add_file_stub(stub));
        contents.into_iter().for_each(|stub| store.add_content_stub(stub));
        Ok(count)
    }
}
