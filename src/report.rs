//! Validation reports
//!
//! Results are produced per run and printed; nothing is persisted.

use crate::ProfileError;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt::Write;
use std::path::PathBuf;

/// Exit status when every profile passed
pub const EXIT_OK: i32 = 0;

/// Exit status when at least one profile failed
pub const EXIT_INVALID: i32 = 1;

/// Exit status for run-level failures
pub const EXIT_FATAL: i32 = 2;

/// Result for one host profile
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProfileReport {
    pub name: String,
    pub valid: bool,
    pub errors: Vec<ProfileError>,
}

impl ProfileReport {
    pub fn new(name: impl Into<String>, errors: Vec<ProfileError>) -> Self {
        Self {
            name: name.into(),
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Result for a whole hosts directory
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BundleReport {
    pub hosts_dir: PathBuf,
    pub profiles: Vec<ProfileReport>,
    /// Set when the run stopped early on the first failure
    pub stopped_early: bool,
}

impl BundleReport {
    pub fn new(hosts_dir: impl Into<PathBuf>) -> Self {
        Self {
            hosts_dir: hosts_dir.into(),
            profiles: Vec::new(),
            stopped_early: false,
        }
    }

    pub fn push(&mut self, profile: ProfileReport) {
        self.profiles.push(profile);
    }

    /// True when every checked profile is valid
    pub fn is_valid(&self) -> bool {
        self.profiles.iter().all(ProfileReport::is_valid)
    }

    pub fn failed(&self) -> usize {
        self.profiles.iter().filter(|p| !p.is_valid()).count()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_valid() { EXIT_OK } else { EXIT_INVALID }
    }

    /// Human-readable report, one block per profile plus a summary line
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for profile in &self.profiles {
            if profile.is_valid() {
                let _ = writeln!(out, "[OK]   {}", profile.name);
            } else {
                let _ = writeln!(out, "[FAIL] {}", profile.name);
                for error in &profile.errors {
                    let _ = writeln!(out, "  - {}", error);
                }
            }
        }

        let _ = write!(
            out,
            "{} profile(s) checked, {} failed",
            self.profiles.len(),
            self.failed()
        );
        if self.stopped_early {
            out.push_str(" (stopped at first failure)");
        }
        out.push('\n');
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for ProfileError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let path = match self {
            ProfileError::SchemaViolation { path, .. } => Some(path.as_str()),
            _ => None,
        };

        let mut state = serializer.serialize_struct("ProfileError", 3)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        if let Some(path) = path {
            state.serialize_field("path", path)?;
        } else {
            state.skip_field("path")?;
        }
        state.end()
    }
}
