//! Integration tests for whole-bundle validation using tempfile

use autoinstall_lint::{
    EXIT_INVALID, EXIT_OK, ProfileError, ValidatorConfig, ValidatorError, validate_bundle,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const META_DATA: &str = "instance-id: {name}-0001\nlocal-hostname: {name}\n";

const USER_DATA: &str = r#"#cloud-config
autoinstall:
  version: 1
  identity:
    hostname: {name}
    username: ubuntu
    password: "$6$salt$hash"
  ssh:
    install-server: true
"#;

fn write_host(hosts: &Path, name: &str, meta_data: Option<&str>, user_data: Option<&str>) {
    let dir = hosts.join(name);
    fs::create_dir_all(&dir).unwrap();
    if let Some(meta) = meta_data {
        fs::write(dir.join("meta-data"), meta.replace("{name}", name)).unwrap();
    }
    if let Some(user) = user_data {
        fs::write(dir.join("user-data"), user.replace("{name}", name)).unwrap();
    }
}

fn bundled_hosts_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("cloud-init/v1/hosts")
}

/// Test that the bundled sample profiles pass
#[test]
fn test_bundled_profiles_are_valid() {
    let report = validate_bundle(ValidatorConfig::new().with_hosts_dir(bundled_hosts_dir())).unwrap();

    let names: Vec<_> = report.profiles.iter().map(|p| p.name.as_str()).collect();
    assert!(names.contains(&"minimal"));
    for profile in &report.profiles {
        assert!(profile.is_valid(), "{}: {:?}", profile.name, profile.errors);
    }
    assert_eq!(report.exit_code(), EXIT_OK);
}

/// Test missing meta-data gives exactly one error and other hosts still run
#[test]
fn test_missing_metadata_reported_once() {
    let temp = TempDir::new().unwrap();
    write_host(temp.path(), "alpha", None, Some(USER_DATA));
    write_host(temp.path(), "beta", Some(META_DATA), Some(USER_DATA));

    let report = validate_bundle(ValidatorConfig::new().with_hosts_dir(temp.path())).unwrap();

    assert_eq!(report.profiles.len(), 2);
    assert_eq!(
        report.profiles[0].errors,
        vec![ProfileError::missing_file("meta-data")]
    );
    assert!(report.profiles[1].is_valid());
    assert_eq!(report.exit_code(), EXIT_INVALID);
}

/// Test a wrong first line is flagged even when the YAML is fine
#[test]
fn test_missing_marker_line() {
    let temp = TempDir::new().unwrap();
    let user_data = USER_DATA.replace("#cloud-config", "#cloud-config-archive");
    write_host(temp.path(), "gamma", Some(META_DATA), Some(&user_data));

    let report = validate_bundle(ValidatorConfig::new().with_hosts_dir(temp.path())).unwrap();

    assert_eq!(report.profiles[0].errors, vec![ProfileError::MissingMarker]);
}

/// Test an unknown autoinstall key is named in the violation path
#[test]
fn test_unknown_autoinstall_key() {
    let temp = TempDir::new().unwrap();
    let user_data = format!("{}  frobnicate: true\n", USER_DATA);
    write_host(temp.path(), "delta", Some(META_DATA), Some(&user_data));

    let report = validate_bundle(ValidatorConfig::new().with_hosts_dir(temp.path())).unwrap();

    let errors = &report.profiles[0].errors;
    assert!(
        errors.iter().any(|e| matches!(
            e,
            ProfileError::SchemaViolation { path, .. } if path.contains("frobnicate")
        )),
        "{:?}",
        errors
    );
}

/// Test one valid and two broken profiles are all reported
#[test]
fn test_aggregate_reporting() {
    let temp = TempDir::new().unwrap();
    write_host(temp.path(), "good", Some(META_DATA), Some(USER_DATA));
    write_host(
        temp.path(),
        "no-autoinstall",
        Some(META_DATA),
        Some("#cloud-config\nhostname: foo\n"),
    );
    write_host(
        temp.path(),
        "bad-yaml",
        Some(META_DATA),
        Some("#cloud-config\nautoinstall: {version: 1\n"),
    );

    let report = validate_bundle(ValidatorConfig::new().with_hosts_dir(temp.path())).unwrap();
    let by_name = |name: &str| {
        report
            .profiles
            .iter()
            .find(|p| p.name == name)
            .unwrap()
            .clone()
    };

    assert!(by_name("good").is_valid());
    assert_eq!(
        by_name("no-autoinstall").errors,
        vec![ProfileError::MissingAutoinstall]
    );
    let bad_yaml = by_name("bad-yaml");
    assert_eq!(bad_yaml.errors.len(), 1);
    assert_eq!(bad_yaml.errors[0].kind(), "yaml-parse-error");

    assert_eq!(report.failed(), 2);
    assert_eq!(report.exit_code(), EXIT_INVALID);

    let text = report.render_text();
    assert!(text.contains("[OK]   good"));
    assert!(text.contains("[FAIL] bad-yaml"));
    assert!(text.contains("[FAIL] no-autoinstall"));
}

/// Test repeated runs give identical reports
#[test]
fn test_idempotent() {
    let temp = TempDir::new().unwrap();
    write_host(temp.path(), "one", Some(META_DATA), Some(USER_DATA));
    write_host(temp.path(), "two", Some("local-hostname: two\n"), Some("nope"));

    let config = ValidatorConfig::new().with_hosts_dir(temp.path());
    let first = validate_bundle(config.clone()).unwrap();
    let second = validate_bundle(config).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.render_text(), second.render_text());
}

/// Test a nonexistent hosts directory is fatal
#[test]
fn test_missing_hosts_dir_is_fatal() {
    let temp = TempDir::new().unwrap();
    let result = validate_bundle(ValidatorConfig::new().with_hosts_dir(temp.path().join("absent")));
    assert!(matches!(result, Err(ValidatorError::HostsDirNotFound(_))));
}

/// Test a schema override from disk is honoured
#[test]
fn test_custom_schema_file() {
    let temp = TempDir::new().unwrap();
    let hosts = temp.path().join("hosts");
    write_host(&hosts, "eps", Some(META_DATA), Some(USER_DATA));

    let schema = temp.path().join("schema.json");
    fs::write(
        &schema,
        r#"{"type": "object", "required": ["storage"]}"#,
    )
    .unwrap();

    let config = ValidatorConfig::new()
        .with_hosts_dir(&hosts)
        .with_schema_file(&schema);
    let report = validate_bundle(config).unwrap();

    let errors = &report.profiles[0].errors;
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ProfileError::SchemaViolation { path, message } if path == "(root)" && message.contains("storage")
    ));
}

/// Test the binary exit codes
#[test]
fn test_cli_exit_codes() {
    let bin = env!("CARGO_BIN_EXE_autoinstall-lint");

    let ok = std::process::Command::new(bin)
        .arg(bundled_hosts_dir())
        .output()
        .unwrap();
    assert_eq!(ok.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&ok.stdout).contains("[OK]   minimal"));

    let temp = TempDir::new().unwrap();
    write_host(temp.path(), "broken", None, None);
    let failed = std::process::Command::new(bin)
        .arg(temp.path())
        .output()
        .unwrap();
    assert_eq!(failed.status.code(), Some(1));

    let json = std::process::Command::new(bin)
        .arg(temp.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(json.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&json.stdout).unwrap();
    let profile = &report["profiles"][0];
    assert_eq!(profile["name"], "broken");
    assert_eq!(profile["valid"], false);
    let kinds: Vec<_> = profile["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["missing-file", "missing-file"]);

    let fatal = std::process::Command::new(bin)
        .arg(temp.path().join("absent"))
        .output()
        .unwrap();
    assert_eq!(fatal.status.code(), Some(2));
}
