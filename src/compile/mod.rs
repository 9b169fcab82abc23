// src/compile/mod.rs

//! Compile boundary.
//!
//! - [`backend`] provides the `CompilerBackend` trait and the production
//!   `HttpCompiler` talking to the remote compile service.
//! - [`classify`] turns whatever came back (artifact, structured or raw
//!   diagnostic, binary garbage, transport failure) into one
//!   [`CompileOutcome`].
//! - [`error`] holds the failure taxonomy shown in the diagnostic console.

pub mod backend;
pub mod classify;
pub mod error;

use std::fmt;

use crate::store::Document;
use crate::types::RenderOption;

pub use backend::{CompileFuture, CompilerBackend, HttpCompiler};
pub use classify::{classify, ARTIFACT_CONTENT_TYPE};
pub use error::CompileError;

/// Snapshot of the document taken when a compile is triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub text: String,
    pub render_option: RenderOption,
}

impl CompileRequest {
    pub fn snapshot(document: &Document) -> Self {
        Self {
            text: document.text.clone(),
            render_option: document.render_option,
        }
    }
}

/// A response the transport did obtain, whatever its status.
#[derive(Clone, PartialEq, Eq)]
pub struct CompileResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CompileResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Debug for CompileResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// The transport could not produce a response.
///
/// `payload` carries whatever partial error body the transport managed to
/// obtain, so its message can still be recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
    pub payload: Option<Vec<u8>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}

/// What a compile backend resolves to.
pub type CompileResult = std::result::Result<CompileResponse, TransportError>;

/// Compiled binary output.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The single authoritative result of a compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Success(Artifact),
    Failure(CompileError),
}

impl CompileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompileOutcome::Success(_))
    }
}
