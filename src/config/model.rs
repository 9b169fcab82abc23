// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::RenderOption;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [compile]
/// endpoint = "http://localhost:8000/compile"
/// output_name = "my_cv"
/// debounce_ms = 1000
///
/// [editor]
/// source = "cv.tex"
/// default_render_option = "Liberation Serif"
/// state_file = ".livetex/state.json"
///
/// [preview]
/// output_dir = ".livetex/preview"
/// ```
///
/// All sections are optional and have reasonable defaults. This is the
/// unvalidated form; convert it with `ConfigFile::try_from`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub compile: CompileSection,

    #[serde(default)]
    pub editor: EditorSection,

    #[serde(default)]
    pub preview: PreviewSection,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub compile: CompileSection,
    pub editor: EditorSection,
    pub preview: PreviewSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        compile: CompileSection,
        editor: EditorSection,
        preview: PreviewSection,
    ) -> Self {
        Self {
            compile,
            editor,
            preview,
        }
    }
}

/// `[compile]` section: where and how often to compile.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileSection {
    /// URL of the compile endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Base name the compiler uses for its job files (`file_name` on the
    /// wire). Also used to name preview files.
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// Quiet period after the last edit before a compile is considered.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_endpoint() -> String {
    "http://localhost:8000/compile".to_string()
}

fn default_output_name() -> String {
    "my_cv".to_string()
}

fn default_debounce_ms() -> u64 {
    1000
}

impl Default for CompileSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            output_name: default_output_name(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[editor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EditorSection {
    /// Source file to watch. `None` means "edit only through stdin
    /// commands and the saved document".
    #[serde(default)]
    pub source: Option<PathBuf>,

    /// Render option used when nothing valid was saved.
    #[serde(default)]
    pub default_render_option: RenderOption,

    /// Key-value file persisting the document between sessions.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".livetex/state.json")
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            source: None,
            default_render_option: RenderOption::default(),
            state_file: default_state_file(),
        }
    }
}

/// `[preview]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewSection {
    /// Directory receiving one PDF per live artifact handle.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".livetex/preview")
}

impl Default for PreviewSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}
