//! Validator configuration
//!
//! Resolved settings for one validation run. The CLI fills these in from
//! flags and environment variables; library users build them directly.

use std::path::{Path, PathBuf};

/// Conventional hosts folder inside a seed bundle
pub const DEFAULT_HOSTS_DIR: &str = "cloud-init/v1/hosts";

/// Where the autoinstall schema comes from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SchemaSource {
    /// The schema compiled into this binary
    #[default]
    Vendored,
    /// A schema file on disk
    File(PathBuf),
}

/// Settings for a validation run
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Directory whose immediate subdirectories are host profiles
    pub hosts_dir: PathBuf,
    /// Schema for the `autoinstall` mapping
    pub schema: SchemaSource,
    /// Stop after the first failing profile
    pub fail_fast: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorConfig {
    /// Create with the conventional hosts directory and vendored schema
    pub fn new() -> Self {
        Self {
            hosts_dir: PathBuf::from(DEFAULT_HOSTS_DIR),
            schema: SchemaSource::Vendored,
            fail_fast: false,
        }
    }

    /// Use a custom hosts directory
    pub fn with_hosts_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.hosts_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Load the schema from a file instead of the vendored copy
    pub fn with_schema_file(mut self, path: impl AsRef<Path>) -> Self {
        self.schema = SchemaSource::File(path.as_ref().to_path_buf());
        self
    }

    /// Stop at the first failing profile
    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }
}
