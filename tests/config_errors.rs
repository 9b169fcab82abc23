// tests/config_errors.rs

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tempfile::NamedTempFile;

use livetex::cli::CliArgs;
use livetex::config::{load_and_validate, load_from_path, load_or_default, ConfigFile};
use livetex::errors::LivetexError;
use livetex::load_config;
use livetex::types::RenderOption;
use livetex_test_utils::builders::ConfigFileBuilder;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn config_error(result: livetex::errors::Result<ConfigFile>) -> String {
    match result {
        Err(LivetexError::ConfigError(msg)) => msg,
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn full_config_is_loaded() {
    let file = write_config(
        r#"
[compile]
endpoint = "https://tex.example.com/compile"
output_name = "resume"
debounce_ms = 250

[editor]
source = "cv.tex"
default_render_option = "Liberation Serif"
state_file = "state.json"

[preview]
output_dir = "out"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.compile.endpoint, "https://tex.example.com/compile");
    assert_eq!(cfg.compile.output_name, "resume");
    assert_eq!(cfg.compile.debounce_ms, 250);
    assert_eq!(cfg.editor.source, Some(PathBuf::from("cv.tex")));
    assert_eq!(cfg.editor.default_render_option, RenderOption::LiberationSerif);
    assert_eq!(cfg.editor.state_file, PathBuf::from("state.json"));
    assert_eq!(cfg.preview.output_dir, PathBuf::from("out"));
}

#[test]
fn empty_file_uses_defaults() {
    let file = write_config("");
    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.compile.endpoint, "http://localhost:8000/compile");
    assert_eq!(cfg.compile.output_name, "my_cv");
    assert_eq!(cfg.compile.debounce_ms, 1000);
    assert_eq!(cfg.editor.default_render_option, RenderOption::LiberationSans);
}

#[test]
fn missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let raw = load_or_default(dir.path().join("Livetex.toml")).unwrap();
    assert_eq!(raw.compile.debounce_ms, 1000);
    assert!(raw.editor.source.is_none());
}

#[test]
fn invalid_endpoint_is_rejected() {
    let raw = ConfigFileBuilder::new().endpoint("not a url").raw();
    let msg = config_error(ConfigFile::try_from(raw));
    assert!(msg.contains("[compile].endpoint"), "{msg}");

    let raw = ConfigFileBuilder::new().endpoint("ftp://example.com/compile").raw();
    let msg = config_error(ConfigFile::try_from(raw));
    assert!(msg.contains("http or https"), "{msg}");
}

#[test]
fn zero_debounce_is_rejected() {
    let raw = ConfigFileBuilder::new().debounce_ms(0).raw();
    let msg = config_error(ConfigFile::try_from(raw));
    assert_eq!(msg, "[compile].debounce_ms must be >= 1 (got 0)");
}

#[test]
fn output_name_must_be_a_bare_name() {
    for bad in ["", "  ", "a/b", "a\\b", ".", ".."] {
        let raw = ConfigFileBuilder::new().output_name(bad).raw();
        let msg = config_error(ConfigFile::try_from(raw));
        assert!(msg.contains("[compile].output_name"), "{bad:?}: {msg}");
    }

    let cfg = ConfigFileBuilder::new().output_name("cv-2024").build();
    assert_eq!(cfg.compile.output_name, "cv-2024");
}

#[test]
fn unknown_render_option_is_a_parse_error() {
    let file = write_config(
        r#"
[editor]
default_render_option = "Comic Sans"
"#,
    );

    match load_and_validate(file.path()) {
        Err(LivetexError::TomlError(_)) => {}
        other => panic!("expected TomlError, got {other:?}"),
    }
}

#[test]
fn cli_overrides_apply_before_validation() {
    let file = write_config(
        r#"
[compile]
endpoint = "http://a.example/compile"
debounce_ms = 500
"#,
    );
    let config = file.path().to_str().unwrap();

    let args = CliArgs::parse_from([
        "livetex",
        "cv.tex",
        "--config",
        config,
        "--endpoint",
        "http://b.example/compile",
        "--debounce-ms",
        "50",
        "--output-dir",
        "previews",
        "--font",
        "fontin",
    ]);
    assert_eq!(args.font, Some(RenderOption::Fontin));

    let cfg = load_config(&args).unwrap();
    assert_eq!(cfg.compile.endpoint, "http://b.example/compile");
    assert_eq!(cfg.compile.debounce_ms, 50);
    assert_eq!(cfg.editor.source, Some(PathBuf::from("cv.tex")));
    assert_eq!(cfg.preview.output_dir, PathBuf::from("previews"));

    let args = CliArgs::parse_from(["livetex", "--config", config, "--debounce-ms", "0"]);
    let msg = config_error(load_config(&args));
    assert!(msg.contains("debounce_ms"));
}

#[test]
fn unknown_font_flag_is_rejected_by_the_parser() {
    let result = CliArgs::try_parse_from(["livetex", "--font", "Comic Sans"]);
    assert!(result.is_err());
}

#[test]
fn unreadable_or_malformed_file_maps_to_io_and_toml_errors() {
    let dir = tempfile::tempdir().unwrap();
    match load_from_path(dir.path().join("missing.toml")) {
        Err(LivetexError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected IoError, got {other:?}"),
    }

    // A directory exists, so the default fallback does not apply.
    match load_or_default(dir.path()) {
        Err(LivetexError::IoError(_)) => {}
        other => panic!("expected IoError, got {other:?}"),
    }

    let file = write_config("[compile\nendpoint = ");
    match load_or_default(file.path()) {
        Err(LivetexError::TomlError(e)) => assert!(!e.to_string().is_empty()),
        other => panic!("expected TomlError, got {other:?}"),
    }
}
