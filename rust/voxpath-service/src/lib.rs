pub mod config;
pub mod errors;
pub mod pool;
pub mod routes;
pub mod worker;

pub use config::Config;
pub use pool::WorkerPool;
pub use routes::{build_router, AppState};
pub use worker::{PathWorker, WorkerError};
