//! autoinstall-lint library
//!
//! Static validation of Ubuntu autoinstall NoCloud seed bundles. A bundle is
//! a hosts directory with one subdirectory per machine, each holding a
//! `meta-data` and a `user-data` file.
//!
//! # Checks
//!
//! - `meta-data` carries non-empty `instance-id` and `local-hostname`
//! - `user-data` starts with `#cloud-config` and parses as YAML
//! - `user-data` has a top-level `autoinstall` mapping
//! - `autoinstall` conforms to the vendored Subiquity JSON Schema
//!
//! Every problem in every profile is reported in one run.

pub mod config;
pub mod profile;
pub mod report;
pub mod schema;
pub mod validator;

mod error;

pub use config::{SchemaSource, ValidatorConfig};
pub use error::{ProfileError, ValidatorError};
pub use profile::{HostProfile, discover_profiles};
pub use report::{BundleReport, EXIT_FATAL, EXIT_INVALID, EXIT_OK, ProfileReport};
pub use schema::AutoinstallSchema;
pub use validator::Validator;

/// Validate a bundle with the given settings
pub fn validate_bundle(config: ValidatorConfig) -> Result<BundleReport, ValidatorError> {
    Validator::new(config)?.run()
}
