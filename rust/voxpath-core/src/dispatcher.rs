//! Single-threaded request dispatcher.
//!
//! Owns the occupancy grid, the path cache and the counters. Every [`Request`] handed to
//! [`Dispatcher::handle`] yields exactly one [`Response`]; faults become `Response::Error`
//! tagged with the request id and never poison later requests.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::cache::{PathCache, DEFAULT_CACHE_CAPACITY};
use crate::engine::AStar;
use crate::occupancy::{GridBounds, GridData, GridError, OccupancyGrid};
use crate::protocol::{DispatcherStats, PathRequest, PathResult, Request, Response, SolveStats};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("invalid grid data: {0}")]
    Grid(#[from] GridError),
    #[error("solver fault: {0}")]
    SolverFault(String),
    #[error("malformed message: {0}")]
    Protocol(#[from] serde_json::Error),
}

const KNOWN_TYPES: [&str; 4] = ["findPath", "clearCache", "getStats", "updateGrid"];

#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    pub cache_capacity: usize,
    /// Drop cached paths whenever a new grid is applied.
    pub clear_cache_on_grid_update: bool,
    /// Bounds in effect until the first grid push. Zero bounds make every cell unwalkable.
    pub initial_bounds: GridBounds,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            clear_cache_on_grid_update: false,
            initial_bounds: GridBounds::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Counters {
    paths_calculated: u64,
    cache_hits: u64,
    cache_misses: u64,
    total_time_ms: f64,
}

pub struct Dispatcher {
    config: DispatcherConfig,
    grid: OccupancyGrid,
    cache: PathCache,
    counters: Counters,
}

impl Default for Dispatcher {
    fn default() -> Self { Self::new(DispatcherConfig::default()) }
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            grid: OccupancyGrid::new(config.initial_bounds),
            cache: PathCache::with_capacity(config.cache_capacity),
            counters: Counters::default(),
            config,
        }
    }

    /// Startup announcement, sent once before any request is served.
    pub fn ready(&self) -> Response {
        Response::Ready { message: "pathfinding dispatcher ready".to_string() }
    }

    pub fn grid(&self) -> &OccupancyGrid { &self.grid }

    pub fn cache(&self) -> &PathCache { &self.cache }

    pub fn stats(&self) -> DispatcherStats {
        let c = self.counters;
        DispatcherStats {
            paths_calculated: c.paths_calculated,
            cache_hits: c.cache_hits,
            cache_misses: c.cache_misses,
            average_time: if c.paths_calculated > 0 {
                c.total_time_ms / c.paths_calculated as f64
            } else {
                0.0
            },
            total_time: c.total_time_ms,
            cache_size: self.cache.len(),
            max_cache_size: self.cache.capacity(),
        }
    }

    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::FindPath(req) => {
                let id = req.id;
                match self.find_path(req) {
                    Ok(result) => Response::PathResult(result),
                    Err(e) => {
                        warn!(id, error = %e, "findPath failed");
                        Response::Error { id: Some(id), error: e.to_string(), trace: None }
                    }
                }
            }
            Request::ClearCache => {
                let dropped = self.cache.len();
                self.cache.clear();
                info!(dropped, "path cache cleared");
                Response::CacheCleared { message: "path cache cleared".to_string() }
            }
            Request::GetStats => Response::Stats(self.stats()),
            Request::UpdateGrid { grid_data } => match self.apply_grid(&grid_data) {
                Ok(()) => Response::GridUpdated,
                Err(e) => {
                    warn!(error = %e, "updateGrid rejected");
                    Response::Error { id: None, error: e.to_string(), trace: None }
                }
            },
        }
    }

    /// Decodes and handles one raw JSON message.
    ///
    /// Input that is not JSON, or whose `type` is unknown, is logged and dropped without a
    /// response. A known message type with a bad body is answered with an `error`, carrying the
    /// `id` when the message has a numeric one.
    pub fn handle_json(&mut self, raw: &str) -> Option<Response> {
        let err = match serde_json::from_str::<Request>(raw) {
            Ok(req) => return Some(self.handle(req)),
            Err(e) => DispatchError::from(e),
        };
        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(_) => {
                warn!(error = %err, "ignoring message");
                return None;
            }
        };
        let kind = value.get("type").and_then(serde_json::Value::as_str);
        if !kind.is_some_and(|k| KNOWN_TYPES.contains(&k)) {
            warn!(error = %err, kind, "ignoring message");
            return None;
        }
        let id = value.get("id").and_then(serde_json::Value::as_u64);
        warn!(id, kind, error = %err, "rejecting malformed request");
        Some(Response::Error { id, error: err.to_string(), trace: None })
    }

    fn apply_grid(&mut self, data: &GridData) -> Result<(), DispatchError> {
        let grid = OccupancyGrid::from_grid_data(data)?;
        info!(bounds = ?grid.bounds(), blocked = grid.blocked_count(), "grid updated");
        self.grid = grid;
        if self.config.clear_cache_on_grid_update {
            self.cache.clear();
        }
        Ok(())
    }

    fn find_path(&mut self, req: PathRequest) -> Result<PathResult, DispatchError> {
        if let Some(data) = &req.grid_data {
            self.apply_grid(data)?;
        }
        let started = Instant::now();

        if req.options.use_cache {
            if let Some(path) = self.cache.get(req.start, req.goal) {
                self.counters.cache_hits += 1;
                debug!(id = req.id, len = path.len(), "cache hit");
                return Ok(PathResult {
                    id: req.id,
                    path: Some(path.to_vec()),
                    cached: true,
                    complete: true,
                    partial: false,
                    stats: SolveStats { iterations: 0, time_ms: elapsed_ms(started), cached: true },
                });
            }
            self.counters.cache_misses += 1;
        }

        let (start, goal) = (req.start.floor(), req.goal.floor());
        let grid = &self.grid;
        let solve = || AStar::new(grid).find_path(start, goal, &req.options);
        let outcome = panic::catch_unwind(AssertUnwindSafe(solve))
            .map_err(|payload| DispatchError::SolverFault(panic_message(payload.as_ref())))?;

        let time_ms = elapsed_ms(started);
        self.counters.paths_calculated += 1;
        self.counters.total_time_ms += time_ms;

        let (path, complete, partial) = match outcome.solution {
            Some(sol) => {
                if sol.complete && req.options.use_cache {
                    self.cache.put(req.start, req.goal, sol.path.clone());
                }
                (Some(sol.path), sol.complete, sol.partial)
            }
            None => (None, false, false),
        };
        debug!(
            id = req.id,
            iterations = outcome.iterations,
            time_ms,
            path_len = path.as_ref().map(Vec::len).unwrap_or(0),
            complete,
            partial,
            "path solved"
        );
        Ok(PathResult {
            id: req.id,
            path,
            cached: false,
            complete,
            partial,
            stats: SolveStats { iterations: outcome.iterations, time_ms, cached: false },
        })
    }
}

fn elapsed_ms(since: Instant) -> f64 { since.elapsed().as_secs_f64() * 1_000.0 }

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
