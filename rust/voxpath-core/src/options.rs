use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ITERATIONS: u32 = 1_000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Hard cap on open-set pops; the only bound on solve time.
    pub max_iterations: u32,
    /// Return the path to the closest explored node when the goal cannot be reached.
    pub allow_partial_path: bool,
    pub use_cache: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            allow_partial_path: false,
            use_cache: true,
        }
    }
}
