use std::io::Write;
use timetable::config::AppConfig;

#[test]
fn defaults() {
    let config = AppConfig::default();

    assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
    assert_eq!(config.translation.model, "gpt-4");
    assert_eq!(config.translation.api_key_env, "OPENAI_API_KEY");
    assert_eq!(config.export.sheet_name, "Timetable");
    assert_eq!(config.export.file_name, "timetable.xlsx");
    assert!(!config.ui.prefers_dark);
}

#[test]
fn partial_file_keeps_other_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[ui]\nprefers_dark = true\n\n[generator]\nmax_attempts_per_subject = 10").unwrap();

    let config = AppConfig::load_from_file(file.path().to_str().unwrap()).unwrap();

    assert!(config.ui.prefers_dark);
    assert_eq!(config.generator.max_attempts_per_subject, 10);
    assert_eq!(config.export.sheet_name, "Timetable");
}

#[test]
fn missing_file_falls_back() {
    let config = AppConfig::load_or_default(Some("/nonexistent/timetable.toml"));

    assert_eq!(config.server.bind_addr, "127.0.0.1:3000");
    assert!(AppConfig::load_from_file("/nonexistent/timetable.toml").is_err());
}
