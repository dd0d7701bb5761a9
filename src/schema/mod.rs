//! Autoinstall JSON Schema
//!
//! The `autoinstall` mapping is checked against Subiquity's Draft 7 schema.
//! A copy is compiled into the binary; a file on disk can replace it.
//! Only document-local `$ref`s are resolved.

use crate::{ProfileError, ValidatorError, config::SchemaSource};
use jsonschema::{Draft, JSONSchema, error::ValidationErrorKind};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Vendored autoinstall schema
pub const VENDORED_SCHEMA: &str = include_str!("autoinstall-schema.json");

/// Path label for violations at the top of the `autoinstall` mapping
pub const ROOT_PATH: &str = "(root)";

/// Compiled autoinstall schema
pub struct AutoinstallSchema {
    compiled: JSONSchema,
}

impl AutoinstallSchema {
    /// Load from a configured source
    pub fn load(source: &SchemaSource) -> Result<Self, ValidatorError> {
        match source {
            SchemaSource::Vendored => Self::vendored(),
            SchemaSource::File(path) => Self::from_file(path),
        }
    }

    /// Compile the vendored schema
    pub fn vendored() -> Result<Self, ValidatorError> {
        debug!("Using vendored autoinstall schema");
        let schema: Value = serde_json::from_str(VENDORED_SCHEMA)?;
        Self::from_value(&schema)
    }

    /// Read and compile a schema file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ValidatorError> {
        let path = path.as_ref();
        debug!("Loading autoinstall schema from {}", path.display());

        let text = fs::read_to_string(path).map_err(|source| ValidatorError::SchemaRead {
            path: path.to_path_buf(),
            source,
        })?;
        let schema: Value = serde_json::from_str(&text)?;
        Self::from_value(&schema)
    }

    /// Compile a schema document as Draft 7
    pub fn from_value(schema: &Value) -> Result<Self, ValidatorError> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|e| ValidatorError::SchemaCompile(e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Collect every violation in an `autoinstall` document, sorted by path
    ///
    /// Unexpected keys are reported one per key, each with the key in its
    /// path, instead of a single error on the parent object.
    pub fn validate(&self, instance: &Value) -> Vec<ProfileError> {
        let mut errors = Vec::new();

        if let Err(violations) = self.compiled.validate(instance) {
            for violation in violations {
                let parent = violation.instance_path.to_string();
                match &violation.kind {
                    ValidationErrorKind::AdditionalProperties { unexpected } => {
                        for key in unexpected {
                            errors.push(ProfileError::schema(
                                format!("{}/{}", parent, escape_pointer(key)),
                                format!("additional property '{}' is not allowed", key),
                            ));
                        }
                    }
                    ValidationErrorKind::Type { .. } => {
                        let mut message = violation.to_string();
                        if let Some(hint) = yaml11_boolean_hint(&violation.instance, &message) {
                            message.push_str(hint);
                        }
                        errors.push(ProfileError::schema(display_path(parent), message));
                    }
                    _ => errors.push(ProfileError::schema(
                        display_path(parent),
                        violation.to_string(),
                    )),
                }
            }
        }

        errors.sort_by(|a, b| violation_path(a).cmp(violation_path(b)));
        errors
    }
}

fn display_path(pointer: String) -> String {
    if pointer.is_empty() {
        ROOT_PATH.to_string()
    } else {
        pointer
    }
}

/// YAML 1.1 loaders read `yes`/`no`/`on`/`off` as booleans; this parser
/// reads YAML 1.2, where they are strings.
fn yaml11_boolean_hint(instance: &Value, message: &str) -> Option<&'static str> {
    let word = instance.as_str()?.to_ascii_lowercase();
    let is_bool_word = matches!(word.as_str(), "y" | "yes" | "n" | "no" | "on" | "off");
    if is_bool_word && message.contains("boolean") {
        Some(" (YAML 1.1 boolean word; use true or false)")
    } else {
        None
    }
}

/// RFC 6901 escaping for one reference token
fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn violation_path(error: &ProfileError) -> &str {
    match error {
        ProfileError::SchemaViolation { path, .. } => path,
        _ => "",
    }
}
