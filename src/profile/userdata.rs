//! user-data checks
//!
//! An autoinstall `user-data` file is a cloud-config document with the
//! installer configuration nested under a top-level `autoinstall` key:
//!
//! ```yaml
//! #cloud-config
//! autoinstall:
//!   version: 1
//!   identity: { ... }
//! ```

use super::{USER_DATA, read_seed_file};
use crate::{ProfileError, schema::AutoinstallSchema};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::trace;

/// Required first line of every `user-data` file
pub const CLOUD_CONFIG_MARKER: &str = "#cloud-config";

/// Minimum similarity for a "did you mean" suggestion
const SUGGESTION_CUTOFF: f64 = 0.8;

/// Check a `user-data` file on disk
pub fn check_userdata(path: impl AsRef<Path>, schema: &AutoinstallSchema) -> Vec<ProfileError> {
    match read_seed_file(path.as_ref(), USER_DATA) {
        Ok(content) => check_userdata_str(&content, schema),
        Err(e) => vec![e],
    }
}

/// Check `user-data` content
///
/// A bad marker line is reported but parsing continues, so YAML and schema
/// problems in the same file still surface.
pub fn check_userdata_str(content: &str, schema: &AutoinstallSchema) -> Vec<ProfileError> {
    let mut errors = Vec::new();

    if !has_marker(content) {
        errors.push(ProfileError::MissingMarker);
    }

    let mut doc: Value = match serde_yaml::from_str(content) {
        Ok(v) => v,
        Err(e) => {
            errors.push(ProfileError::yaml(USER_DATA, e));
            return errors;
        }
    };

    // `<<: *anchor` keys are expanded by the installer's loader
    if let Err(e) = doc.apply_merge() {
        errors.push(ProfileError::yaml(USER_DATA, e));
        return errors;
    }

    let top = match doc {
        Value::Mapping(m) => m,
        Value::Null => Mapping::new(),
        _ => {
            errors.push(ProfileError::NotAMapping {
                location: USER_DATA.to_string(),
            });
            return errors;
        }
    };

    let autoinstall = match top.get("autoinstall") {
        None | Some(Value::Null) => {
            errors.push(ProfileError::MissingAutoinstall);
            return errors;
        }
        Some(Value::Mapping(m)) => m,
        Some(_) => {
            errors.push(ProfileError::NotAMapping {
                location: "user-data.autoinstall".to_string(),
            });
            return errors;
        }
    };

    if let Some(err) = check_identity(autoinstall) {
        errors.push(err);
    }

    match serde_json::to_value(autoinstall) {
        Ok(json) => errors.extend(schema.validate(&json)),
        Err(e) => errors.push(ProfileError::yaml(
            USER_DATA,
            format!("autoinstall is not representable as JSON: {}", e),
        )),
    }

    errors
}

/// True when the first line is exactly the cloud-config marker
fn has_marker(content: &str) -> bool {
    let first = content.lines().next().unwrap_or_default();
    trace!("user-data first line: {:?}", first);
    first.trim_end() == CLOUD_CONFIG_MARKER
}

/// Subiquity needs either `identity` or a `user-data` section to create users
fn check_identity(autoinstall: &Mapping) -> Option<ProfileError> {
    if autoinstall.contains_key("identity") || autoinstall.contains_key("user-data") {
        return None;
    }

    let suggestion = autoinstall
        .keys()
        .filter_map(Value::as_str)
        .map(|k| (k, strsim::normalized_levenshtein("identity", k)))
        .filter(|(_, score)| *score >= SUGGESTION_CUTOFF)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(k, _)| k.to_string());

    Some(ProfileError::MissingIdentity { suggestion })
}
