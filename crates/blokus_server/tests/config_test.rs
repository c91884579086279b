//! Configuration loading tests.

use blokus_server::ServerConfig;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Temp file");
    file.write_all(contents.as_bytes()).expect("Write config");
    file
}

#[test]
fn test_load_full_file() {
    let file = write_config(
        r#"
host = "0.0.0.0"
port = 8080
event_buffer = 32

[rules]
pieces_per_player = 5
required_players = 2
finish_control_threshold = 4
"#,
    );

    let config = ServerConfig::from_file(file.path()).expect("Valid config");
    assert_eq!(config.bind_address(), "0.0.0.0:8080");
    assert_eq!(*config.event_buffer(), 32);
    assert_eq!(config.rules().pieces_per_player, 5);
    assert_eq!(config.rules().required_players, 2);
    assert_eq!(config.rules().finish_control_threshold, 4);
}

#[test]
fn test_missing_keys_take_defaults() {
    let file = write_config("port = 9000\n\n[rules]\nrequired_players = 3\n");
    let config = ServerConfig::from_file(file.path()).expect("Valid config");
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(*config.port(), 9000);
    assert_eq!(config.rules().pieces_per_player, 3);
    assert_eq!(config.rules().required_players, 3);
    assert_eq!(config.rules().finish_control_threshold, 8);
}

#[test]
fn test_rejects_bad_seat_count() {
    let file = write_config("[rules]\nrequired_players = 5\n");
    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("required_players"));
}

#[test]
fn test_rejects_malformed_toml() {
    let file = write_config("port = \"not a number\"\n");
    let err = ServerConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.starts_with("Failed to parse config"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().expect("Temp dir");
    let err = ServerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.starts_with("Failed to read config file"));
}

#[test]
fn test_round_trips_through_toml() {
    let config = ServerConfig::default();
    let text = toml::to_string(&config).expect("Serialize");
    let file = write_config(&text);
    assert_eq!(ServerConfig::from_file(file.path()).expect("Reload"), config);
}
