pub mod heuristics;
pub mod neighbors;
pub mod search;

pub use heuristics::{manhattan, step_cost};
pub use neighbors::{is_neighbor_step, walkable_neighbors, NEIGHBOR_OFFSETS};
pub use search::{AStar, SearchOutcome, Solution, GOAL_SEARCH_RADIUS};
