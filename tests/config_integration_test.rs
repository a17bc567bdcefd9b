//! Integration tests for configuration loading and pipeline construction
//!
//! Tests that modify environment variables hold ENV_MUTEX.

use legalscan::anonymization::Pipeline;
use legalscan::config::{load_config, LegalScanConfig};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::{tempdir, NamedTempFile};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("LEGALSCAN_APPLICATION_LOG_LEVEL");
    std::env::remove_var("LEGALSCAN_ANONYMIZATION_DEFAULT_DOC_TYPE");
    std::env::remove_var("LEGALSCAN_ANONYMIZATION_MAX_INPUT_CHARS");
    std::env::remove_var("LEGALSCAN_RULES_DIRECTORY");
    std::env::remove_var("LEGALSCAN_RULES_BUILTIN");
    std::env::remove_var("LEGALSCAN_TAGGER_ENABLED");
    std::env::remove_var("LEGALSCAN_TAGGER_GAZETTEER");
    std::env::remove_var("LEGALSCAN_AUDIT_ENABLED");
    std::env::remove_var("LEGALSCAN_AUDIT_LOG_PATH");
    std::env::remove_var("TEST_LEGALSCAN_RULES_DIR");
}

fn sample_gazetteer() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("rules")
        .join("gazetteer.toml")
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit").join("runs.log");
    let toml_content = format!(
        r#"
[application]
log_level = "debug"

[anonymization]
default_doc_type = "contract"
max_input_chars = 50000

[anonymization.rules]
directory = "{rules}"
builtin = true

[anonymization.tagger]
enabled = true
gazetteer = "{gazetteer}"

[anonymization.audit]
enabled = true
log_path = "{audit}"
json_format = true

[logging]
local_enabled = false
local_path = "/tmp/legalscan"
local_rotation = "hourly"
"#,
        rules = dir.path().display(),
        gazetteer = sample_gazetteer().display(),
        audit = audit_path.display(),
    );
    let temp_file = write_config(&toml_content);

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.anonymization.default_doc_type, "contract");
    assert_eq!(config.anonymization.max_input_chars, Some(50000));
    assert_eq!(config.anonymization.rules.directory.as_deref(), Some(dir.path()));
    assert!(config.anonymization.tagger.enabled);
    assert!(config.anonymization.audit.enabled);
    assert_eq!(config.logging.local_rotation, "hourly");

    let pipeline = Pipeline::from_config(&config.anonymization).unwrap();
    assert!(pipeline.has_tagger());

    let result = pipeline
        .run("Офис компании Газпром находится в Казань", "contract")
        .unwrap();
    assert_eq!(
        result.redacted_text,
        "Офис компании [[ORGANIZATION]] находится в [[ADDRESS]]"
    );

    let audit = std::fs::read_to_string(&audit_path).unwrap();
    assert_eq!(audit.lines().count(), 1);
    assert!(!audit.contains("Газпром"));
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let dir = tempdir().unwrap();
    std::env::set_var("TEST_LEGALSCAN_RULES_DIR", dir.path());
    let temp_file = write_config(
        r#"
[anonymization.rules]
directory = "${TEST_LEGALSCAN_RULES_DIR}"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    cleanup_env_vars();

    assert_eq!(config.anonymization.rules.directory.as_deref(), Some(dir.path()));
}

#[test]
fn test_missing_env_var_is_an_error() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[anonymization.rules]
directory = "${TEST_LEGALSCAN_RULES_DIR}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_LEGALSCAN_RULES_DIR"));
}

#[test]
fn test_env_overrides_take_precedence() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("LEGALSCAN_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("LEGALSCAN_ANONYMIZATION_DEFAULT_DOC_TYPE", "general");
    std::env::set_var("LEGALSCAN_RULES_BUILTIN", "false");
    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[anonymization]
default_doc_type = "contract"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    cleanup_env_vars();

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.anonymization.default_doc_type, "general");
    assert!(!config.anonymization.rules.builtin);
}

#[test]
fn test_invalid_env_override_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("LEGALSCAN_ANONYMIZATION_MAX_INPUT_CHARS", "lots");
    let temp_file = write_config("");
    let result = load_config(temp_file.path());
    cleanup_env_vars();

    assert!(result.is_err());
}

#[test]
fn test_validation_errors() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"chatty\"\n",
        "[anonymization]\nmax_input_chars = 0\n",
        "[anonymization.tagger]\nenabled = true\n",
        "[anonymization.rules]\ndirectory = \"/definitely/not/here\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ];
    for case in cases {
        let temp_file = write_config(case);
        assert!(load_config(temp_file.path()).is_err(), "accepted: {case}");
    }
}

#[test]
fn test_defaults_without_any_sections() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("");
    let config = load_config(temp_file.path()).unwrap();
    let defaults = LegalScanConfig::default();

    assert_eq!(config.application.log_level, defaults.application.log_level);
    assert_eq!(
        config.anonymization.max_input_chars,
        defaults.anonymization.max_input_chars
    );
    assert!(Pipeline::from_config(&config.anonymization).is_ok());
}
