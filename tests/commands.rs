// tests/commands.rs

use livetex::engine::EditorInput;
use livetex::input::{parse_command, Command};
use livetex::types::RenderOption;

#[test]
fn font_command_accepts_any_case_and_spacing() {
    assert_eq!(
        parse_command("font Liberation Serif"),
        Ok(Some(Command::Input(EditorInput::SetRenderOption(
            RenderOption::LiberationSerif
        ))))
    );
    assert_eq!(
        parse_command("  FONT   liberation mono  "),
        Ok(Some(Command::Input(EditorInput::SetRenderOption(
            RenderOption::LiberationMono
        ))))
    );
}

#[test]
fn font_command_errors() {
    assert_eq!(parse_command("font"), Err("usage: font <name>".to_string()));

    let err = parse_command("font Papyrus").unwrap_err();
    assert!(err.contains("unknown render option"), "{err}");
}

#[test]
fn simple_commands() {
    assert_eq!(parse_command("fonts"), Ok(Some(Command::ListRenderOptions)));
    assert_eq!(
        parse_command("console"),
        Ok(Some(Command::Input(EditorInput::ToggleConsole)))
    );
    assert_eq!(parse_command("quit"), Ok(Some(Command::Quit)));
    assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    assert_eq!(parse_command("   "), Ok(None));
}

#[test]
fn unknown_command_is_reported() {
    let err = parse_command("compile now").unwrap_err();
    assert!(err.starts_with("unknown command 'compile'"), "{err}");
}
