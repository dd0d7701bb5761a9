//! Bundle validator
//!
//! Runs the meta-data and user-data checks for every host profile in turn.
//! Problems inside a profile are collected into its report; only a missing
//! hosts directory or a broken schema ends the run.

use crate::{
    ProfileError, ValidatorError,
    config::ValidatorConfig,
    profile::{self, HostProfile},
    report::{BundleReport, ProfileReport},
    schema::AutoinstallSchema,
};
use std::collections::HashMap;
use tracing::debug;

/// Validator for one hosts directory
pub struct Validator {
    config: ValidatorConfig,
    schema: AutoinstallSchema,
}

impl Validator {
    /// Create a validator, loading the configured schema
    pub fn new(config: ValidatorConfig) -> Result<Self, ValidatorError> {
        let schema = AutoinstallSchema::load(&config.schema)?;
        Ok(Self { config, schema })
    }

    /// Create a validator with an already compiled schema
    pub fn with_schema(config: ValidatorConfig, schema: AutoinstallSchema) -> Self {
        Self { config, schema }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate every host profile under the configured hosts directory
    pub fn run(&self) -> Result<BundleReport, ValidatorError> {
        let hosts_dir = &self.config.hosts_dir;
        let profiles = profile::discover_profiles(hosts_dir)?;
        if profiles.is_empty() {
            return Err(ValidatorError::NoProfiles(hosts_dir.clone()));
        }

        let mut report = BundleReport::new(hosts_dir);
        // instance-id -> first profile using it
        let mut seen_ids: HashMap<String, String> = HashMap::new();

        for host in &profiles {
            let (instance_id, mut errors) = self.check_profile(host);

            if let Some(id) = instance_id {
                match seen_ids.get(&id) {
                    Some(other) => errors.push(ProfileError::DuplicateInstanceId {
                        instance_id: id,
                        other: other.clone(),
                    }),
                    None => {
                        seen_ids.insert(id, host.name.clone());
                    }
                }
            }

            let result = ProfileReport::new(&host.name, errors);
            if result.is_valid() {
                debug!("{}: ok", host.name);
            } else {
                debug!("{}: {} error(s)", host.name, result.errors.len());
            }

            let failed = !result.is_valid();
            report.push(result);
            if failed && self.config.fail_fast {
                report.stopped_early = true;
                break;
            }
        }

        Ok(report)
    }

    /// Validate a single host profile in isolation
    pub fn validate_profile(&self, host: &HostProfile) -> ProfileReport {
        let (_, errors) = self.check_profile(host);
        ProfileReport::new(&host.name, errors)
    }

    fn check_profile(&self, host: &HostProfile) -> (Option<String>, Vec<ProfileError>) {
        let (metadata, mut errors) = profile::check_metadata(host.meta_data_path());
        errors.extend(profile::check_userdata(host.user_data_path(), &self.schema));
        (metadata.instance_id, errors)
    }
}
