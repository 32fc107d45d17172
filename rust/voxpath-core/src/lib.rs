//! Voxel-grid pathfinding core.
//!
//! Leaves first: [`occupancy`] answers walkability, [`engine`] holds the search primitives and the
//! A* solver, [`cache`] memoizes complete paths, and [`dispatcher`] ties them together behind the
//! message types in [`protocol`].

pub mod cache;
pub mod dispatcher;
pub mod engine;
pub mod models;
pub mod occupancy;
pub mod options;
pub mod protocol;

pub use cache::{PathCache, PathKey, DEFAULT_CACHE_CAPACITY};
pub use dispatcher::{DispatchError, Dispatcher, DispatcherConfig};
pub use engine::{AStar, SearchOutcome, Solution};
pub use models::{Coord, Position, RequestId};
pub use occupancy::{CellKey, GridBounds, GridData, GridError, OccupancyGrid};
pub use options::{SearchOptions, DEFAULT_MAX_ITERATIONS};
pub use protocol::{DispatcherStats, PathRequest, PathResult, Request, Response, SolveStats};

pub fn version() -> &'static str { env!("CARGO_PKG_VERSION") }
