//! Error type for configuration file operations.

use std::io;
use std::path::PathBuf;

use jsonconf_codec::CodecError;
use thiserror::Error;

/// Error type for configuration file operations.
///
/// Every variant except [`ConfigError::Unbound`] comes from a collaborator
/// (file system or codec) and carries the path being worked on.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file does not exist.  Only raised by an explicit read: `load`
    /// treats a missing file as "create or return nothing" instead.
    #[error("config file not found at {path}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file system I/O error occurred (existence check, read or write).
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file content is not valid JSON under the active dialect.
    #[error("malformed config at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// The file is valid JSON but its shape does not fit the config type.
    #[error("config at {path} does not match the expected shape: {source}")]
    SchemaMismatch {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// The payload could not be serialized.
    #[error("failed to serialize config for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Save was called on an instance with no bound path/options and none
    /// were given explicitly.
    #[error("config has no bound path and options; load, create or bind it before saving")]
    Unbound,
}

impl ConfigError {
    /// Classifies a decode failure for `path`.
    pub(crate) fn from_decode(path: PathBuf, source: CodecError) -> Self {
        match source {
            CodecError::Schema(_) => ConfigError::SchemaMismatch { path, source },
            CodecError::Encode(_) => ConfigError::Encode { path, source },
            CodecError::Syntax(_) | CodecError::Utf8(_) => ConfigError::Malformed { path, source },
        }
    }

    /// Classifies a read failure for `path`, singling out "not found".
    pub(crate) fn from_read(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound { path, source }
        } else {
            ConfigError::Io { path, source }
        }
    }

    /// `true` for [`ConfigError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }

    /// `true` when the caller broke a precondition rather than a collaborator
    /// failing.
    pub fn is_misuse(&self) -> bool {
        matches!(self, ConfigError::Unbound)
    }
}
