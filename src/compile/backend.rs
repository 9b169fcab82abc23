// src/compile/backend.rs

//! Pluggable compile backend abstraction.
//!
//! The runtime talks to a `CompilerBackend` instead of an HTTP client
//! directly. This makes it easy to swap in a scripted compiler in tests.
//!
//! - `HttpCompiler` is the production implementation. It posts the request
//!   as JSON to the compile endpoint and hands back whatever response came
//!   back, leaving classification to [`super::classify`].
//! - The returned future is `'static` because the runtime spawns it and
//!   keeps processing edits while the request is outstanding.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::debug;

use crate::errors::{LivetexError, Result};

use super::{CompileRequest, CompileResponse, CompileResult, TransportError};

/// Future resolving to the raw result of one compile call.
pub type CompileFuture = Pin<Box<dyn Future<Output = CompileResult> + Send + 'static>>;

/// Trait abstracting how a compile request reaches the compiler.
///
/// Implementations must resolve every call exactly once: either with the
/// response they obtained (any status) or with a `TransportError`.
pub trait CompilerBackend: Send {
    fn compile(&self, request: CompileRequest) -> CompileFuture;
}

/// JSON body understood by the compile service.
#[derive(Debug, Serialize)]
struct CompilePayload<'a> {
    tex_content: &'a str,
    file_name: &'a str,
    font: &'a str,
}

/// Compile backend posting to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpCompiler {
    client: Client,
    endpoint: Url,
    output_name: String,
}

impl HttpCompiler {
    /// No request timeout is configured: a request that never resolves is
    /// superseded by the next one anyway.
    pub fn new(endpoint: &str, output_name: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            LivetexError::ConfigError(format!("invalid compile endpoint {endpoint:?}: {e}"))
        })?;
        let client = Client::builder()
            .build()
            .map_err(|e| LivetexError::Other(e.into()))?;

        Ok(Self {
            client,
            endpoint,
            output_name: output_name.into(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl CompilerBackend for HttpCompiler {
    fn compile(&self, request: CompileRequest) -> CompileFuture {
        // Clone what the request needs so the future doesn't borrow `self`.
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let output_name = self.output_name.clone();

        Box::pin(async move {
            let payload = CompilePayload {
                tex_content: &request.text,
                file_name: &output_name,
                font: request.render_option.as_str(),
            };

            debug!(
                %endpoint,
                bytes = request.text.len(),
                font = payload.font,
                "posting compile request"
            );

            let response = client
                .post(endpoint)
                .json(&payload)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let body = response.bytes().await.map_err(transport_error)?;

            Ok(CompileResponse {
                status,
                content_type,
                body: body.to_vec(),
            })
        })
    }
}

fn transport_error(err: reqwest::Error) -> TransportError {
    let message = if err.is_connect() {
        format!("Connection to compiler failed: {err}")
    } else if err.is_timeout() {
        format!("Compile request timed out: {err}")
    } else {
        err.to_string()
    };
    TransportError::new(message)
}
