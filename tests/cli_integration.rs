//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use tempfile::NamedTempFile;

use session_bridge::cli::{parse_args_from, Args};
use session_bridge::config::Config;

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("session-bridge")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert!(result.host.is_none());
    assert!(result.port.is_none());
    assert!(result.config.is_none());
    assert!(result.session_name.is_none());
    assert!(result.max_lifetime_secs.is_none());
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-H",
        "0.0.0.0",
        "-p",
        "9090",
        "-n",
        "APPSID",
        "-l",
        "debug",
        "--max-lifetime",
        "600",
        "--gc-interval",
        "10",
    ]))
    .unwrap();

    assert_eq!(result.host.unwrap().to_string(), "0.0.0.0");
    assert_eq!(result.port, Some(9090));
    assert_eq!(result.session_name, Some("APPSID".to_string()));
    assert_eq!(result.log_level, Some("debug".to_string()));
    assert_eq!(result.max_lifetime_secs, Some(600));
    assert_eq!(result.gc_interval_secs, Some(10));
}

#[test]
fn test_cli_config_file() {
    let result = parse_args_from(args(&["-c", "/etc/session-bridge.json"])).unwrap();

    assert!(result.config.is_some());
    assert_eq!(
        result.config.unwrap().to_str().unwrap(),
        "/etc/session-bridge.json"
    );
}

#[test]
fn test_cli_invalid_port() {
    let result = parse_args_from(args(&["-p", "not-a-number"]));
    assert!(result.is_err());
}

#[test]
fn test_cli_invalid_host() {
    let result = parse_args_from(args(&["-H", "not-an-ip"]));
    assert!(result.is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let json = r#"{
        "server": {
            "host": "192.168.1.100",
            "port": 9000
        },
        "session": {
            "name": "APPSID",
            "max_lifetime_secs": 600,
            "gc_interval_secs": 30,
            "cookie": {
                "lifetime_secs": 3600,
                "secure": true
            }
        },
        "logging": {
            "level": "debug"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.server.host, "192.168.1.100");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.session.name, "APPSID");
    assert_eq!(config.session.max_lifetime_secs, 600);
    assert_eq!(config.session.gc_interval_secs, 30);
    assert_eq!(config.session.cookie.lifetime_secs, 3600);
    assert!(config.session.cookie.secure);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_config_priority_cli_over_file() {
    let json = r#"{
        "server": {
            "host": "10.0.0.1",
            "port": 5000
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        host: Some("192.168.1.1".parse().unwrap()),
        port: Some(9090),
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    // CLI values win
    assert_eq!(config.server.host, "192.168.1.1");
    assert_eq!(config.server.port, 9090);
}

#[test]
fn test_config_file_survives_unset_cli() {
    let json = r#"{
        "server": {
            "host": "10.0.0.1",
            "port": 5000
        },
        "session": {
            "name": "FILESID"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        config: Some(file.path().to_path_buf()),
        port: Some(9090),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    // Only the passed flag overrides; the rest stays from the file.
    assert_eq!(config.server.host, "10.0.0.1");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.session.name, "FILESID");
}

#[test]
fn test_config_to_server_config() {
    let args = Args {
        host: Some("0.0.0.0".parse().unwrap()),
        port: Some(9090),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    let server_config = config.to_server_config().unwrap();

    assert_eq!(server_config.host, "0.0.0.0");
    assert_eq!(server_config.port, 9090);
}

#[test]
fn test_config_to_session_options() {
    let args = Args {
        session_name: Some("APPSID".to_string()),
        max_lifetime_secs: Some(120),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    let options = config.to_session_options().unwrap();

    assert_eq!(options.name, "APPSID");
    assert_eq!(options.max_lifetime_secs, 120);
    assert!(options.enabled);
}

#[test]
fn test_config_rejects_invalid_session_name() {
    let json = r#"{
        "session": {
            "name": "has spaces"
        }
    }"#;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();
    assert!(config.to_session_options().is_err());
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let json = serde_json::to_string(&original).unwrap();
    let loaded: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(original.server.host, loaded.server.host);
    assert_eq!(original.server.port, loaded.server.port);
    assert_eq!(original.session.name, loaded.session.name);
}

#[test]
fn test_config_partial_deserialization() {
    // Only specify some fields, others should use defaults
    let json = r#"{"server": {"port": 9999}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.server.port, 9999);
    assert_eq!(config.server.host, "127.0.0.1"); // Default
    assert_eq!(config.session.name, "SBSESSID"); // Default
}
