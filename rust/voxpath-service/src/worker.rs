//! A dispatcher running on its own OS thread behind an ordered channel.
//!
//! Requests go in over an unbounded mpsc queue and are handled strictly one at a time. A pump task
//! on the Tokio runtime routes responses back: path results by request id, control responses in
//! the order their requests were queued.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};
use voxpath_core::{Dispatcher, DispatcherConfig, DispatcherStats, GridData, PathRequest, Request, RequestId, Response};

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("pathfinding worker is not running")]
    Disconnected,
    #[error("request id {0} is already in flight")]
    DuplicateId(RequestId),
    #[error("unexpected response from worker: {0}")]
    UnexpectedResponse(String),
    #[error("failed to start worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Default)]
struct Pending {
    paths: Mutex<HashMap<RequestId, oneshot::Sender<Response>>>,
    control: Mutex<VecDeque<oneshot::Sender<Response>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // Waiter maps stay consistent even if a holder panicked.
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct PathWorker {
    name: String,
    requests: mpsc::UnboundedSender<Request>,
    pending: Arc<Pending>,
    ready: Arc<AtomicBool>,
}

impl PathWorker {
    /// Starts the dispatcher thread and its response pump. Must be called inside a Tokio runtime.
    pub fn spawn(name: impl Into<String>, config: DispatcherConfig) -> Result<Self, WorkerError> {
        let name = name.into();
        let (req_tx, mut req_rx) = mpsc::unbounded_channel::<Request>();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel::<Response>();

        let thread_name = name.clone();
        thread::Builder::new().name(name.clone()).spawn(move || {
            let mut dispatcher = Dispatcher::new(config);
            if resp_tx.send(dispatcher.ready()).is_err() {
                return;
            }
            while let Some(req) = req_rx.blocking_recv() {
                if resp_tx.send(dispatcher.handle(req)).is_err() {
                    break;
                }
            }
            info!(worker = %thread_name, "dispatcher thread stopped");
        })?;

        let pending = Arc::new(Pending::default());
        let ready = Arc::new(AtomicBool::new(false));
        tokio::spawn(pump(name.clone(), resp_rx, Arc::clone(&pending), Arc::clone(&ready)));

        Ok(Self { name, requests: req_tx, pending, ready })
    }

    pub fn name(&self) -> &str { &self.name }

    /// True once the dispatcher announced itself.
    pub fn is_ready(&self) -> bool { self.ready.load(Ordering::Acquire) }

    /// Returns the `pathResult` or `error` response for this request.
    pub async fn find_path(&self, req: PathRequest) -> Result<Response, WorkerError> {
        let id = req.id;
        let (tx, rx) = oneshot::channel();
        {
            let mut paths = lock(&self.pending.paths);
            if paths.contains_key(&id) {
                return Err(WorkerError::DuplicateId(id));
            }
            paths.insert(id, tx);
        }
        if self.requests.send(Request::FindPath(req)).is_err() {
            lock(&self.pending.paths).remove(&id);
            return Err(WorkerError::Disconnected);
        }
        rx.await.map_err(|_| WorkerError::Disconnected)
    }

    pub async fn clear_cache(&self) -> Result<Response, WorkerError> { self.control(Request::ClearCache).await }

    pub async fn update_grid(&self, grid_data: GridData) -> Result<Response, WorkerError> {
        self.control(Request::UpdateGrid { grid_data }).await
    }

    pub async fn stats(&self) -> Result<DispatcherStats, WorkerError> {
        match self.control(Request::GetStats).await? {
            Response::Stats(s) => Ok(s),
            other => Err(WorkerError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    async fn control(&self, req: Request) -> Result<Response, WorkerError> {
        let (tx, rx) = oneshot::channel();
        {
            // Queue the waiter and the request under one lock so waiter order matches send order.
            let mut control = lock(&self.pending.control);
            self.requests.send(req).map_err(|_| WorkerError::Disconnected)?;
            control.push_back(tx);
        }
        rx.await.map_err(|_| WorkerError::Disconnected)
    }
}

async fn pump(
    name: String,
    mut responses: mpsc::UnboundedReceiver<Response>,
    pending: Arc<Pending>,
    ready: Arc<AtomicBool>,
) {
    while let Some(resp) = responses.recv().await {
        match resp {
            Response::Ready { ref message } => {
                info!(worker = %name, %message, "worker ready");
                ready.store(true, Ordering::Release);
            }
            Response::PathResult(_) | Response::Error { id: Some(_), .. } => {
                let Some(id) = resp.request_id() else { continue };
                let waiter = lock(&pending.paths).remove(&id);
                match waiter {
                    Some(waiter) => {
                        if waiter.send(resp).is_err() {
                            debug!(worker = %name, id, "caller dropped before response");
                        }
                    }
                    None => warn!(worker = %name, id, "response for unknown request id"),
                }
            }
            Response::CacheCleared { .. }
            | Response::Stats(_)
            | Response::GridUpdated
            | Response::Error { id: None, .. } => {
                let waiter = lock(&pending.control).pop_front();
                match waiter {
                    Some(waiter) => {
                        let _ = waiter.send(resp);
                    }
                    None => warn!(worker = %name, "control response with no waiter"),
                }
            }
        }
    }
    error!(worker = %name, "response channel closed");
    ready.store(false, Ordering::Release);
    // Dropping the waiters wakes every caller with Disconnected.
    lock(&pending.paths).clear();
    lock(&pending.control).clear();
}
