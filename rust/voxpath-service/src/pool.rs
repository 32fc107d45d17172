//! N independent workers, each with its own cache and grid snapshot.
//!
//! Path requests are routed round-robin. Grid and cache control messages are broadcast so every
//! worker sees the same occupancy; stats are summed across workers.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tracing::info;
use voxpath_core::{DispatcherConfig, DispatcherStats, GridData, PathRequest, RequestId, Response};

use crate::worker::{PathWorker, WorkerError};

pub struct WorkerPool {
    workers: Vec<PathWorker>,
    next_worker: AtomicUsize,
    next_id: AtomicU64,
}

impl WorkerPool {
    /// Spawns `size` workers (at least one). Must be called inside a Tokio runtime.
    pub fn new(size: usize, config: DispatcherConfig) -> Result<Self, WorkerError> {
        let size = size.max(1);
        let workers = (0..size)
            .map(|i| PathWorker::spawn(format!("voxpath-worker-{i}"), config.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        info!(workers = size, cache_capacity = config.cache_capacity, "worker pool started");
        Ok(Self { workers, next_worker: AtomicUsize::new(0), next_id: AtomicU64::new(1) })
    }

    pub fn len(&self) -> usize { self.workers.len() }

    pub fn is_empty(&self) -> bool { self.workers.is_empty() }

    pub fn is_ready(&self) -> bool { self.workers.iter().all(PathWorker::is_ready) }

    /// Fresh id, unique within this pool.
    pub fn next_request_id(&self) -> RequestId { self.next_id.fetch_add(1, Ordering::Relaxed) }

    pub async fn find_path(&self, req: PathRequest) -> Result<Response, WorkerError> {
        let idx = self.next_worker.fetch_add(1, Ordering::Relaxed) % self.workers.len();
        self.workers[idx].find_path(req).await
    }

    pub async fn clear_cache(&self) -> Result<Response, WorkerError> {
        let mut last = None;
        for w in &self.workers {
            last = Some(w.clear_cache().await?);
        }
        last.ok_or(WorkerError::Disconnected)
    }

    /// Applies the grid on every worker. The first rejection is returned; since every worker
    /// decodes the same data, they either all accept or all reject.
    pub async fn update_grid(&self, grid_data: GridData) -> Result<Response, WorkerError> {
        let mut last = None;
        for w in &self.workers {
            let resp = w.update_grid(grid_data.clone()).await?;
            if matches!(resp, Response::Error { .. }) {
                return Ok(resp);
            }
            last = Some(resp);
        }
        last.ok_or(WorkerError::Disconnected)
    }

    pub async fn stats(&self) -> Result<DispatcherStats, WorkerError> {
        let mut total = DispatcherStats::default();
        for w in &self.workers {
            let s = w.stats().await?;
            total.paths_calculated += s.paths_calculated;
            total.cache_hits += s.cache_hits;
            total.cache_misses += s.cache_misses;
            total.total_time += s.total_time;
            total.cache_size += s.cache_size;
            total.max_cache_size += s.max_cache_size;
        }
        if total.paths_calculated > 0 {
            total.average_time = total.total_time / total.paths_calculated as f64;
        }
        Ok(total)
    }
}
