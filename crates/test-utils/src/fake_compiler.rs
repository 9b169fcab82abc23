use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};

use livetex::compile::{
    CompileFuture, CompileRequest, CompileResult, CompilerBackend, TransportError,
};

/// A compile call the test has not answered yet.
pub struct PendingCall {
    pub request: CompileRequest,
    reply: oneshot::Sender<CompileResult>,
}

impl PendingCall {
    /// Resolve the call. Ignored if the runtime already went away.
    pub fn respond(self, result: CompileResult) {
        let _ = self.reply.send(result);
    }
}

/// A fake compiler whose calls are answered by the test, in any order.
///
/// Each `compile` call is handed to the paired [`CompilerController`]; the
/// call resolves when the test responds. Dropping a `PendingCall` without
/// responding resolves it as a transport error.
pub struct ControllableCompiler {
    calls_tx: mpsc::UnboundedSender<PendingCall>,
}

/// Test side of [`ControllableCompiler`].
pub struct CompilerController {
    calls_rx: mpsc::UnboundedReceiver<PendingCall>,
}

impl ControllableCompiler {
    pub fn new() -> (Self, CompilerController) {
        let (calls_tx, calls_rx) = mpsc::unbounded_channel();
        (Self { calls_tx }, CompilerController { calls_rx })
    }
}

impl CompilerBackend for ControllableCompiler {
    fn compile(&self, request: CompileRequest) -> CompileFuture {
        let (reply, reply_rx) = oneshot::channel();
        let _ = self.calls_tx.send(PendingCall { request, reply });

        Box::pin(async move {
            reply_rx
                .await
                .unwrap_or_else(|_| Err(TransportError::new("fake compiler call dropped")))
        })
    }
}

impl CompilerController {
    /// Wait for the next compile call.
    pub async fn next_call(&mut self) -> PendingCall {
        self.calls_rx
            .recv()
            .await
            .expect("compiler dropped while waiting for a call")
    }

    /// A call that was already made, if any.
    pub fn try_next_call(&mut self) -> Option<PendingCall> {
        self.calls_rx.try_recv().ok()
    }
}

type Responder = dyn Fn(&CompileRequest) -> CompileResult + Send + Sync;

/// A fake compiler that answers immediately and records every request.
#[derive(Clone)]
pub struct ImmediateCompiler {
    responder: Arc<Responder>,
    requests: Arc<Mutex<Vec<CompileRequest>>>,
}

impl ImmediateCompiler {
    pub fn new(responder: impl Fn(&CompileRequest) -> CompileResult + Send + Sync + 'static) -> Self {
        Self {
            responder: Arc::new(responder),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<CompileRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompilerBackend for ImmediateCompiler {
    fn compile(&self, request: CompileRequest) -> CompileFuture {
        let result = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        Box::pin(async move { result })
    }
}
