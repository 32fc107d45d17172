use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use voxpath_core::{DispatcherConfig, DEFAULT_CACHE_CAPACITY};

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub cache_size: usize,
    pub clear_cache_on_grid_update: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            workers: 1,
            cache_size: DEFAULT_CACHE_CAPACITY,
            clear_cache_on_grid_update: false,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let host = env::var("VOXPATH_HOST").unwrap_or(defaults.host);
        let port = parse_var("VOXPATH_PORT")?.unwrap_or(defaults.port);
        let workers = parse_var("VOXPATH_WORKERS")?.unwrap_or(defaults.workers);
        let cache_size = parse_var("VOXPATH_CACHE_SIZE")?.unwrap_or(defaults.cache_size);
        let clear_cache_on_grid_update =
            parse_var("VOXPATH_CLEAR_CACHE_ON_GRID")?.unwrap_or(defaults.clear_cache_on_grid_update);

        Ok(Self { host, port, workers, cache_size, clear_cache_on_grid_update })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }

    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            cache_capacity: self.cache_size,
            clear_cache_on_grid_update: self.clear_cache_on_grid_update,
            ..DispatcherConfig::default()
        }
    }
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).with_context(|| format!("invalid {name}={raw:?}")),
        Err(_) => Ok(None),
    }
}
