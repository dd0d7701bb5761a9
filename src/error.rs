//! Error types for autoinstall-lint
//!
//! Two layers: [`ValidatorError`] aborts the whole run, [`ProfileError`] is
//! collected per host profile and never aborts anything.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error for a validation run
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Hosts directory not found: {}", .0.display())]
    HostsDirNotFound(PathBuf),

    #[error("Cannot read hosts directory {}: {source}", .path.display())]
    HostsDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No host directories found under: {}", .0.display())]
    NoProfiles(PathBuf),

    #[error("Failed to load schema {}: {source}", .path.display())]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON schema: {0}")]
    SchemaJson(#[from] serde_json::Error),

    #[error("Schema does not compile: {0}")]
    SchemaCompile(String),
}

impl ValidatorError {
    /// Create an unreadable hosts directory error
    pub fn hosts_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::HostsDirUnreadable {
            path: path.into(),
            source,
        }
    }
}

/// A problem found in one host profile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("{file} missing")]
    MissingFile { file: String },

    #[error("{file} is empty")]
    EmptyFile { file: String },

    #[error("{file} unreadable ({message})")]
    Unreadable { file: String, message: String },

    #[error("{file}: invalid YAML ({message})")]
    YamlParse { file: String, message: String },

    #[error("{file}: missing {field}")]
    MissingField { file: String, field: String },

    #[error("meta-data: instance-id '{instance_id}' should start with local-hostname '{hostname}'")]
    InstanceIdPrefix {
        instance_id: String,
        hostname: String,
    },

    #[error("meta-data: instance-id '{instance_id}' already used by host '{other}'")]
    DuplicateInstanceId { instance_id: String, other: String },

    #[error("user-data: first line should be #cloud-config")]
    MissingMarker,

    #[error("{location}: expected a YAML mapping")]
    NotAMapping { location: String },

    #[error("user-data: missing top-level 'autoinstall' key")]
    MissingAutoinstall,

    #[error("user-data.autoinstall: missing 'identity'{}", suggestion_hint(.suggestion))]
    MissingIdentity { suggestion: Option<String> },

    #[error("user-data.autoinstall: {path}: {message}")]
    SchemaViolation { path: String, message: String },
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(key) => format!(" (did you mean '{}'?)", key),
        None => String::new(),
    }
}

impl ProfileError {
    /// Create a missing-file error
    pub fn missing_file(file: impl Into<String>) -> Self {
        Self::MissingFile { file: file.into() }
    }

    /// Create a YAML parse error
    pub fn yaml(file: impl Into<String>, message: impl ToString) -> Self {
        Self::YamlParse {
            file: file.into(),
            message: message.to_string(),
        }
    }

    /// Create a missing required field error
    pub fn missing_field(file: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            file: file.into(),
            field: field.into(),
        }
    }

    /// Create a schema violation at a document path
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaViolation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable name of this error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFile { .. } => "missing-file",
            Self::EmptyFile { .. } => "empty-file",
            Self::Unreadable { .. } => "unreadable-file",
            Self::YamlParse { .. } => "yaml-parse-error",
            Self::MissingField { .. } => "missing-required-field",
            Self::InstanceIdPrefix { .. } => "instance-id-prefix",
            Self::DuplicateInstanceId { .. } => "duplicate-instance-id",
            Self::MissingMarker => "missing-marker-line",
            Self::NotAMapping { .. } => "not-a-mapping",
            Self::MissingAutoinstall => "missing-autoinstall-key",
            Self::MissingIdentity { .. } => "missing-identity",
            Self::SchemaViolation { .. } => "schema-violation",
        }
    }
}
