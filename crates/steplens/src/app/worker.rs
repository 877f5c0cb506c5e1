//! Background thread running the decompiler

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use steplens_core::{BackendError, Decompiler, RequestId, StepSet};

pub(crate) enum WorkerRequest {
    InitialCode,
    Decompile { id: RequestId, source: String },
}

pub(crate) enum WorkerResponse {
    InitialCode(Result<String, BackendError>),
    Steps {
        id: RequestId,
        result: Result<StepSet, BackendError>,
    },
}

/// One thread, one request at a time; responses are matched to requests by id
pub(crate) struct DecompileWorker {
    tx: mpsc::Sender<WorkerRequest>,
    rx: mpsc::Receiver<WorkerResponse>,
    handle: Option<JoinHandle<()>>,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run one backend call; a panicking backend becomes an error response
fn guarded<T>(call: impl FnOnce() -> Result<T, BackendError>) -> Result<T, BackendError> {
    panic::catch_unwind(AssertUnwindSafe(call)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(%message, "decompiler panicked");
        Err(BackendError::Panicked(message))
    })
}

impl DecompileWorker {
    pub(crate) fn spawn(decompiler: Box<dyn Decompiler>) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<WorkerRequest>();
        let (resp_tx, resp_rx) = mpsc::channel::<WorkerResponse>();
        let handle = thread::spawn(move || {
            while let Ok(req) = req_rx.recv() {
                let resp = match req {
                    WorkerRequest::InitialCode => {
                        WorkerResponse::InitialCode(guarded(|| decompiler.initial_code()))
                    }
                    WorkerRequest::Decompile { id, source } => WorkerResponse::Steps {
                        id,
                        result: guarded(|| decompiler.decompile_steps(&source)),
                    },
                };
                if resp_tx.send(resp).is_err() {
                    break;
                }
            }
        });
        Self {
            tx: req_tx,
            rx: resp_rx,
            handle: Some(handle),
        }
    }

    /// A worker whose thread is already gone
    #[cfg(test)]
    pub(crate) fn stopped() -> Self {
        let (tx, _) = mpsc::channel();
        let (_, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            handle: None,
        }
    }

    pub(crate) fn send(&self, req: WorkerRequest) -> bool {
        self.tx.send(req).is_ok()
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Drain every response that has arrived so far
    pub(crate) fn try_recv_all(&self) -> Vec<WorkerResponse> {
        self.rx.try_iter().collect()
    }
}
