use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = AuditError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed XML in {origin}")]
    Xml {
        origin: String,
        #[source]
        source: quick_xml::Error,
    },

    /// Well-formed tokens that do not make a single-rooted document.
    #[error("malformed XML in {origin}: {message}")]
    XmlStructure { origin: String, message: String },

    #[error("<{element}> has fewer than {hops} ancestors")]
    MissingAncestor { element: String, hops: usize },

    #[error("<{element}> has no `{attribute}` attribute")]
    MissingAttribute { element: String, attribute: String },

    #[error("invalid pattern for annotation format `{name}`")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("annotation format `{name}` captures {found} fields, expected {expected}")]
    FieldCount {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("unknown annotation format `{0}`")]
    UnknownFormat(String),
}

impl AuditError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AuditError::Io {
            path: path.into(),
            source,
        }
    }
}
