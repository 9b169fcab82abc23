// src/input/commands.rs

//! Line-oriented editor commands read from stdin.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{EditorInput, RuntimeEvent};
use crate::types::RenderOption;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(EditorInput),
    ListRenderOptions,
    Quit,
}

/// Parse one line. `Ok(None)` for blank lines.
///
/// ```text
/// font Liberation Serif
/// fonts
/// console
/// quit
/// ```
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "font" => {
            if rest.is_empty() {
                return Err("usage: font <name>".to_string());
            }
            let option: RenderOption = rest.parse()?;
            Ok(Some(Command::Input(EditorInput::SetRenderOption(option))))
        }
        "fonts" => Ok(Some(Command::ListRenderOptions)),
        "console" => Ok(Some(Command::Input(EditorInput::ToggleConsole))),
        "quit" | "exit" => Ok(Some(Command::Quit)),
        other => Err(format!(
            "unknown command '{other}' (expected font, fonts, console or quit)"
        )),
    }
}

/// Spawn a task reading commands from stdin and forwarding them to the
/// runtime. EOF on stdin just stops the reader.
pub fn spawn_stdin_commands(runtime_tx: mpsc::Sender<RuntimeEvent>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let event = match parse_command(&line) {
                Ok(Some(Command::Input(input))) => RuntimeEvent::Input(input),
                Ok(Some(Command::ListRenderOptions)) => {
                    let names: Vec<_> = RenderOption::ALL.iter().map(|o| o.as_str()).collect();
                    info!(?names, "available render options");
                    continue;
                }
                Ok(Some(Command::Quit)) => RuntimeEvent::ShutdownRequested,
                Ok(None) => continue,
                Err(msg) => {
                    warn!("{msg}");
                    continue;
                }
            };

            if runtime_tx.send(event).await.is_err() {
                break;
            }
        }

        debug!("stdin command reader finished");
    });
}
