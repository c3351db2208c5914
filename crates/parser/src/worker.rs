// Pipeline worker process: spawn + JSON-RPC 2.0 over stdio.
//
// Framing is newline-delimited JSON, one request per line on the worker's
// stdin and one response per line on its stdout. Responses carry the
// request id and may complete out of order; a pending-request map routes
// each response to its waiter.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;
use slash_common::protocol::jsonrpc::{Request, Response};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, warn};

/// Transport-level failure talking to the worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to spawn worker process: {0}")]
    Spawn(std::io::Error),
    #[error("worker stdio was not piped")]
    MissingStdio,
    #[error("failed to encode request: {0}")]
    Encode(serde_json::Error),
    #[error("worker i/o failed: {0}")]
    Io(std::io::Error),
    #[error("worker exited before responding")]
    Disconnected,
    #[error("worker error {code}: {message}")]
    Rpc { code: i32, message: String },
    #[error("worker response missing `result` field")]
    MissingResult,
}

/// Routing table from request id to the waiter for its response. The
/// `closed` flag flips once the worker's stdout ends; both are only
/// touched under the same lock so late registrations cannot race the
/// final drain.
#[derive(Default)]
struct PendingState {
    waiters: HashMap<u64, oneshot::Sender<Response>>,
    closed: bool,
}

/// Handle to a running worker process. Dropping the handle kills the
/// worker.
pub struct WorkerHandle {
    _child: Child,
    stdin: Mutex<ChildStdin>,
    pending: Arc<Mutex<PendingState>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerHandle").finish_non_exhaustive()
    }
}

impl WorkerHandle {
    /// Spawn `command` as the worker and start the response router and
    /// stderr drain. Must be called from within a tokio runtime.
    pub fn spawn(mut command: Command) -> Result<Self, WorkerError> {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(WorkerError::Spawn)?;

        let stdin = child.stdin.take().ok_or(WorkerError::MissingStdio)?;
        let stdout = child.stdout.take().ok_or(WorkerError::MissingStdio)?;
        let stderr = child.stderr.take().ok_or(WorkerError::MissingStdio)?;

        let pending = Arc::new(Mutex::new(PendingState::default()));
        tokio::spawn(route_responses(stdout, Arc::clone(&pending)));
        tokio::spawn(drain_stderr(stderr));

        Ok(Self {
            _child: child,
            stdin: Mutex::new(stdin),
            pending,
            next_id: AtomicU64::new(1),
        })
    }

    /// Send one request and await its correlated response. Concurrent
    /// callers are fine; completion order follows the worker, not the
    /// submission order.
    pub async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, WorkerError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = Request::new(method, params, id);
        let mut payload = serde_json::to_vec(&request).map_err(WorkerError::Encode)?;
        payload.push(b'\n');

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            if pending.closed {
                return Err(WorkerError::Disconnected);
            }
            pending.waiters.insert(id, tx);
        }

        let write_result = {
            let mut stdin = self.stdin.lock().await;
            match stdin.write_all(&payload).await {
                Ok(()) => stdin.flush().await,
                Err(error) => Err(error),
            }
        };
        if let Err(error) = write_result {
            self.pending.lock().await.waiters.remove(&id);
            return Err(WorkerError::Io(error));
        }

        let response = rx.await.map_err(|_| WorkerError::Disconnected)?;
        if let Some(error) = response.error {
            return Err(WorkerError::Rpc { code: error.code, message: error.message });
        }
        response.result.ok_or(WorkerError::MissingResult)
    }
}

/// Read response lines from the worker's stdout and wake the matching
/// waiter. When stdout ends the worker is gone: mark the table closed and
/// drop every outstanding waiter so their requests fail.
async fn route_responses(stdout: ChildStdout, pending: Arc<Mutex<PendingState>>) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match serde_json::from_str::<Response>(trimmed) {
                    Ok(response) => {
                        let waiter = pending.lock().await.waiters.remove(&response.id);
                        match waiter {
                            Some(waiter) => {
                                let _ = waiter.send(response);
                            }
                            None => warn!(id = response.id, "worker response for unknown request id"),
                        }
                    }
                    Err(error) => warn!(%error, "discarding undecodable worker line"),
                }
            }
            Ok(None) => break,
            Err(error) => {
                warn!(%error, "worker stdout read failed");
                break;
            }
        }
    }

    let mut pending = pending.lock().await;
    pending.closed = true;
    pending.waiters.clear();
    debug!("worker response router stopped");
}

/// Relay worker stderr lines to the diagnostic stream.
async fn drain_stderr(stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if !line.trim().is_empty() {
            debug!(target: "slash_parser::worker_stderr", "{line}");
        }
    }
}
