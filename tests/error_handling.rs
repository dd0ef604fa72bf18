// tests/error_handling.rs

use std::io::Write;
use tempfile::NamedTempFile;
use devwatch::config::{load_and_validate, parse_config};
use devwatch::errors::DevwatchError;

#[test]
fn test_malformed_toml_returns_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[package\nname = \"app\"").unwrap();

    let result = load_and_validate(file.path());

    match result {
        Err(DevwatchError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_wrong_field_type_returns_toml_error() {
    let result = parse_config("[package]\nname = \"app\"\ndependencies = \"not-a-list\"\n");
    assert!(matches!(result, Err(DevwatchError::TomlError(_))));
}

#[test]
fn test_empty_package_name_returns_config_error() {
    let result = parse_config("[package]\nname = \"\"\n");

    match result {
        Err(DevwatchError::ConfigError(msg)) => {
            assert!(msg.contains("[package].name"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_empty_dependency_entry_returns_config_error() {
    let result = parse_config("[assets]\ndependencies = [\"react\", \" \"]\n");

    match result {
        Err(DevwatchError::ConfigError(msg)) => {
            assert!(msg.contains("[assets].dependencies"));
        }
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn test_absolute_omit_tests_entry_returns_config_error() {
    let result = parse_config("[package]\nname = \"app\"\nomit_tests = [\"/abs/x_test.go\"]\n");
    assert!(matches!(result, Err(DevwatchError::ConfigError(_))));
}

#[test]
fn test_pack_extra_outside_root_returns_config_error() {
    for extra in ["../secrets", "/etc/passwd", ""] {
        let result = parse_config(&format!("[distribution]\npack_extras = [\"{extra}\"]\n"));
        assert!(
            matches!(result, Err(DevwatchError::ConfigError(ref msg)) if msg.contains("pack_extras")),
            "{extra:?} was accepted"
        );
    }
}

#[test]
fn test_missing_file_returns_io_error() {
    let result = load_and_validate("/definitely/not/here/project.toml");
    assert!(matches!(result, Err(DevwatchError::IoError(_))));
}

#[test]
fn test_dependency_install_error_names_the_dependency() {
    let err = DevwatchError::DependencyInstall {
        ecosystem: "npm",
        dependency: "react".to_string(),
        reason: "exit status 1".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("npm"));
    assert!(msg.contains("'react'"));
    assert!(msg.contains("exit status 1"));
}
