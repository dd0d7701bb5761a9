//! Host profiles
//!
//! A host profile is one directory under the hosts folder holding a NoCloud
//! seed pair:
//! - `<hosts-dir>/<name>/meta-data`
//! - `<hosts-dir>/<name>/user-data`

pub mod metadata;
pub mod userdata;

pub use metadata::{MetaData, check_metadata, check_metadata_str};
pub use userdata::{CLOUD_CONFIG_MARKER, check_userdata, check_userdata_str};

use crate::{ProfileError, ValidatorError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Seed file with instance identity
pub const META_DATA: &str = "meta-data";

/// Seed file with the cloud-config document
pub const USER_DATA: &str = "user-data";

/// One host directory in the bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostProfile {
    /// Directory name, used as the autoinstall hostname/path segment
    pub name: String,
    /// Full path to the directory
    pub dir: PathBuf,
}

impl HostProfile {
    /// Build a profile from its directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        Self { name, dir }
    }

    pub fn meta_data_path(&self) -> PathBuf {
        self.dir.join(META_DATA)
    }

    pub fn user_data_path(&self) -> PathBuf {
        self.dir.join(USER_DATA)
    }
}

/// Enumerate host profiles under a hosts directory, sorted by name
///
/// Hidden entries and `*.tmp` entries are skipped, as are plain files.
pub fn discover_profiles(hosts_dir: impl AsRef<Path>) -> Result<Vec<HostProfile>, ValidatorError> {
    let hosts_dir = hosts_dir.as_ref();

    let read_dir = match fs::read_dir(hosts_dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ValidatorError::HostsDirNotFound(hosts_dir.to_path_buf()));
        }
        Err(e) => return Err(ValidatorError::hosts_dir(hosts_dir, e)),
    };

    let mut profiles = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| ValidatorError::hosts_dir(hosts_dir, e))?;
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        if name.starts_with('.') || name.ends_with(".tmp") {
            debug!("Skipping {}", name);
            continue;
        }

        let path = entry.path();
        if !path.is_dir() {
            warn!("Ignoring non-directory entry {}", path.display());
            continue;
        }

        profiles.push(HostProfile::from_dir(path));
    }

    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(
        "Discovered {} host profiles in {}",
        profiles.len(),
        hosts_dir.display()
    );
    Ok(profiles)
}

/// Read a seed file, mapping absence and emptiness to profile errors
pub(crate) fn read_seed_file(path: &Path, file: &str) -> Result<String, ProfileError> {
    debug!("Reading {}", path.display());

    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ProfileError::missing_file(file));
        }
        Err(e) => {
            return Err(ProfileError::Unreadable {
                file: file.to_string(),
                message: e.to_string(),
            });
        }
    };

    let content = String::from_utf8_lossy(&bytes).into_owned();
    if content.trim().is_empty() {
        return Err(ProfileError::EmptyFile {
            file: file.to_string(),
        });
    }
    Ok(content)
}
