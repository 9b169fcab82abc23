#![allow(dead_code)]

use livetex::compile::CompileResponse;
use livetex::config::{ConfigFile, RawConfigFile};
use livetex::store::Document;
use livetex::types::RenderOption;

/// Smallest byte string that passes for a PDF in tests.
pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n%fake\n%%EOF\n";

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn endpoint(mut self, url: &str) -> Self {
        self.config.compile.endpoint = url.to_string();
        self
    }

    pub fn output_name(mut self, name: &str) -> Self {
        self.config.compile.output_name = name.to_string();
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.compile.debounce_ms = ms;
        self
    }

    pub fn default_render_option(mut self, option: RenderOption) -> Self {
        self.config.editor.default_render_option = option;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn document(text: &str, option: RenderOption) -> Document {
    Document {
        text: text.to_string(),
        render_option: option,
    }
}

/// 200 response carrying a PDF.
pub fn pdf_response(bytes: &[u8]) -> CompileResponse {
    CompileResponse::new(200, Some("application/pdf"), bytes)
}

/// Error response with a JSON `detail` field.
pub fn detail_response(status: u16, detail: &str) -> CompileResponse {
    let body = serde_json::json!({ "detail": detail }).to_string();
    CompileResponse::new(status, Some("application/json"), body)
}
