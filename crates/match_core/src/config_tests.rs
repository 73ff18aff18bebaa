use super::*;
use std::io::Write;

#[test]
fn test_empty_config_uses_defaults() {
    let config = MatchConfig::from_toml_str("").unwrap();
    assert_eq!(config, MatchConfig::default());
    assert_eq!(config.initial_seconds, 600);
    assert_eq!(config.movetime(), Duration::from_millis(1000));
    assert_eq!(config.error_flash(), Duration::from_millis(500));
    assert_eq!(config.seating().color_of(crate::Side::Human), Color::White);
    assert_eq!(config.engine.path, PathBuf::from("stockfish"));
}

#[test]
fn test_partial_config_overrides() {
    let config = MatchConfig::from_toml_str(
        r#"
        initial_seconds = 180
        human_color = "black"

        [engine]
        path = "/usr/local/bin/stockfish"
        args = ["--threads", "2"]
        "#,
    )
    .unwrap();
    assert_eq!(config.initial_seconds, 180);
    assert_eq!(config.search_movetime_ms, 1000);
    assert_eq!(config.seating().color_of(crate::Side::Human), Color::Black);
    assert_eq!(config.engine.args, vec!["--threads", "2"]);
}

#[test]
fn test_invalid_config_rejected() {
    let err = MatchConfig::from_toml_str("human_color = \"purple\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "search_movetime_ms = 250").unwrap();
    let config = MatchConfig::load(file.path()).unwrap();
    assert_eq!(config.movetime(), Duration::from_millis(250));
}

#[test]
fn test_missing_file_reports_path() {
    let err = MatchConfig::load(Path::new("/nonexistent/match.toml")).unwrap_err();
    match err {
        ConfigError::Read { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent/match.toml")),
        other => panic!("unexpected error: {other}"),
    }
}
