//! Wire messages exchanged with the dispatcher, tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::models::{Coord, Position, RequestId};
use crate::occupancy::GridData;
use crate::options::SearchOptions;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRequest {
    pub id: RequestId,
    pub start: Position,
    pub goal: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_data: Option<GridData>,
    #[serde(default)]
    pub options: SearchOptions,
}

impl PathRequest {
    pub fn new(id: RequestId, start: impl Into<Position>, goal: impl Into<Position>) -> Self {
        Self { id, start: start.into(), goal: goal.into(), grid_data: None, options: SearchOptions::default() }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_grid(mut self, grid: GridData) -> Self {
        self.grid_data = Some(grid);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
    FindPath(PathRequest),
    ClearCache,
    GetStats,
    #[serde(rename_all = "camelCase")]
    UpdateGrid { grid_data: GridData },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveStats {
    pub iterations: u32,
    pub time_ms: f64,
    pub cached: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathResult {
    pub id: RequestId,
    pub path: Option<Vec<Coord>>,
    pub cached: bool,
    pub complete: bool,
    pub partial: bool,
    pub stats: SolveStats,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherStats {
    pub paths_calculated: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub average_time: f64,
    pub total_time: f64,
    pub cache_size: usize,
    pub max_cache_size: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    PathResult(PathResult),
    CacheCleared {
        message: String,
    },
    Stats(DispatcherStats),
    GridUpdated,
    Error {
        /// Absent only for failed control messages, which carry no id.
        id: Option<RequestId>,
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace: Option<String>,
    },
    Ready {
        message: String,
    },
}

impl Response {
    /// Id of the path request this answers, if any.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Response::PathResult(r) => Some(r.id),
            Response::Error { id, .. } => *id,
            _ => None,
        }
    }

    pub fn set_request_id(&mut self, new_id: RequestId) {
        match self {
            Response::PathResult(r) => r.id = new_id,
            Response::Error { id, .. } => *id = Some(new_id),
            _ => {}
        }
    }
}
