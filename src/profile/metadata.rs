//! meta-data checks
//!
//! NoCloud `meta-data` is a small YAML mapping. The installer needs at least
//! `instance-id` and `local-hostname`.

use super::{META_DATA, read_seed_file};
use crate::ProfileError;
use serde_yaml::Value;
use std::path::Path;

/// Identity fields read from `meta-data`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaData {
    pub instance_id: Option<String>,
    pub local_hostname: Option<String>,
}

/// Check a `meta-data` file on disk
pub fn check_metadata(path: impl AsRef<Path>) -> (MetaData, Vec<ProfileError>) {
    match read_seed_file(path.as_ref(), META_DATA) {
        Ok(content) => check_metadata_str(&content),
        Err(e) => (MetaData::default(), vec![e]),
    }
}

/// Check `meta-data` content
pub fn check_metadata_str(content: &str) -> (MetaData, Vec<ProfileError>) {
    let parsed: Value = match serde_yaml::from_str(content) {
        Ok(v) => v,
        Err(e) => return (MetaData::default(), vec![ProfileError::yaml(META_DATA, e)]),
    };

    if !parsed.is_mapping() {
        return (
            MetaData::default(),
            vec![ProfileError::NotAMapping {
                location: META_DATA.to_string(),
            }],
        );
    }

    let metadata = MetaData {
        instance_id: scalar_field(&parsed, "instance-id"),
        local_hostname: scalar_field(&parsed, "local-hostname"),
    };

    let mut errors = Vec::new();
    if metadata.instance_id.is_none() {
        errors.push(ProfileError::missing_field(META_DATA, "instance-id"));
    }
    if metadata.local_hostname.is_none() {
        errors.push(ProfileError::missing_field(META_DATA, "local-hostname"));
    }

    if let (Some(id), Some(hostname)) = (&metadata.instance_id, &metadata.local_hostname) {
        if !id.starts_with(hostname.as_str()) {
            errors.push(ProfileError::InstanceIdPrefix {
                instance_id: id.clone(),
                hostname: hostname.clone(),
            });
        }
    }

    (metadata, errors)
}

/// Non-empty scalar value of a top-level key, rendered as a string
///
/// Numbers and booleans are compared by their canonical rendering, so `1.50`
/// is checked as `1.5`. Digit runs with a leading zero (`0001`) are strings
/// under YAML 1.2 and keep their text. Quote ids whose exact spelling matters.
fn scalar_field(doc: &Value, key: &str) -> Option<String> {
    let value = match doc.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    if value.is_empty() { None } else { Some(value) }
}
