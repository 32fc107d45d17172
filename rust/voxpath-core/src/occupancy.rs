//! Occupancy model: grid bounds plus the set of blocked cells.
//!
//! The grid is replaced wholesale on every update; there is no incremental diff.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::models::Coord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("invalid cell key {0:?}, expected \"x,y,z\"")]
    InvalidCellKey(String),
    #[error("grid dimensions must be non-negative (size {size}, height {height})")]
    NegativeBounds { size: i32, height: i32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl GridBounds {
    pub const fn new(width: i32, height: i32, depth: i32) -> Self { Self { width, height, depth } }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.x < self.width && c.y >= 0 && c.y < self.height && c.z >= 0 && c.z < self.depth
    }
}

/// A blocked cell on the wire: either the string key `"x,y,z"` or an `[x, y, z]` triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellKey {
    Key(String),
    Triple([i32; 3]),
}

impl CellKey {
    pub fn to_coord(&self) -> Result<Coord, GridError> {
        match self {
            CellKey::Triple(t) => Ok(Coord::from(*t)),
            CellKey::Key(s) => {
                let mut parts = s.split(',').map(|p| p.trim().parse::<i32>());
                match (parts.next(), parts.next(), parts.next(), parts.next()) {
                    (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) => Ok(Coord::new(x, y, z)),
                    _ => Err(GridError::InvalidCellKey(s.clone())),
                }
            }
        }
    }
}

impl From<Coord> for CellKey {
    fn from(c: Coord) -> Self { CellKey::Key(format!("{},{},{}", c.x, c.y, c.z)) }
}

/// Occupancy snapshot pushed by the caller. `grid_size` bounds both x and z.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    #[serde(default)]
    pub occupied_cells: Vec<CellKey>,
    pub grid_size: i32,
    pub grid_height: i32,
}

impl GridData {
    pub fn bounds(&self) -> GridBounds { GridBounds::new(self.grid_size, self.grid_height, self.grid_size) }
}

#[derive(Clone, Debug, Default)]
pub struct OccupancyGrid {
    bounds: GridBounds,
    blocked: FxHashSet<Coord>,
}

impl OccupancyGrid {
    /// Empty grid: every in-bounds cell is walkable.
    pub fn new(bounds: GridBounds) -> Self { Self { bounds, blocked: FxHashSet::default() } }

    pub fn with_blocked<I: IntoIterator<Item = Coord>>(bounds: GridBounds, blocked: I) -> Self {
        Self { bounds, blocked: blocked.into_iter().collect() }
    }

    /// Decodes a wire snapshot. Fails on the first malformed key.
    pub fn from_grid_data(data: &GridData) -> Result<Self, GridError> {
        if data.grid_size < 0 || data.grid_height < 0 {
            return Err(GridError::NegativeBounds { size: data.grid_size, height: data.grid_height });
        }
        let blocked = data
            .occupied_cells
            .iter()
            .map(CellKey::to_coord)
            .collect::<Result<FxHashSet<_>, _>>()?;
        Ok(Self { bounds: data.bounds(), blocked })
    }

    pub fn bounds(&self) -> GridBounds { self.bounds }

    pub fn blocked_count(&self) -> usize { self.blocked.len() }

    #[inline]
    pub fn is_blocked(&self, c: Coord) -> bool { self.blocked.contains(&c) }

    #[inline]
    pub fn is_walkable(&self, c: Coord) -> bool { self.bounds.contains(c) && !self.blocked.contains(&c) }

    /// Replaces bounds and blocked set in one step.
    pub fn update(&mut self, blocked: FxHashSet<Coord>, bounds: GridBounds) {
        *self = Self { bounds, blocked };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walkable_respects_bounds_and_blocked() {
        let grid = OccupancyGrid::with_blocked(GridBounds::new(4, 2, 4), [Coord::new(1, 0, 1)]);
        assert!(grid.is_walkable(Coord::new(0, 0, 0)));
        assert!(grid.is_walkable(Coord::new(3, 1, 3)));
        assert!(!grid.is_walkable(Coord::new(1, 0, 1)));
        assert!(!grid.is_walkable(Coord::new(4, 0, 0)));
        assert!(!grid.is_walkable(Coord::new(0, 2, 0)));
        assert!(!grid.is_walkable(Coord::new(0, 0, -1)));
    }

    #[test]
    fn update_replaces_wholesale() {
        let mut grid = OccupancyGrid::with_blocked(GridBounds::new(4, 1, 4), [Coord::new(1, 0, 1)]);
        let mut next = FxHashSet::default();
        next.insert(Coord::new(2, 0, 2));
        grid.update(next, GridBounds::new(8, 1, 8));
        assert!(grid.is_walkable(Coord::new(1, 0, 1)));
        assert!(!grid.is_walkable(Coord::new(2, 0, 2)));
        assert!(grid.is_walkable(Coord::new(7, 0, 7)));
        assert_eq!(grid.blocked_count(), 1);
    }

    #[test]
    fn grid_data_accepts_string_keys_and_triples() {
        let data: GridData = serde_json::from_value(json!({
            "occupiedCells": ["1,0,2", " 3 , 0 , 4 ", [5, 0, 6]],
            "gridSize": 10,
            "gridHeight": 3
        }))
        .unwrap();
        let grid = OccupancyGrid::from_grid_data(&data).unwrap();
        assert_eq!(grid.bounds(), GridBounds::new(10, 3, 10));
        assert!(grid.is_blocked(Coord::new(1, 0, 2)));
        assert!(grid.is_blocked(Coord::new(3, 0, 4)));
        assert!(grid.is_blocked(Coord::new(5, 0, 6)));
    }

    #[test]
    fn malformed_key_is_rejected() {
        for bad in ["1,2", "1,2,3,4", "a,b,c", ""] {
            let data = GridData { occupied_cells: vec![CellKey::Key(bad.into())], grid_size: 4, grid_height: 1 };
            assert_eq!(OccupancyGrid::from_grid_data(&data).unwrap_err(), GridError::InvalidCellKey(bad.into()));
        }
    }

    #[test]
    fn negative_bounds_are_rejected() {
        let data = GridData { occupied_cells: vec![], grid_size: -1, grid_height: 1 };
        assert!(matches!(OccupancyGrid::from_grid_data(&data), Err(GridError::NegativeBounds { .. })));
    }
}
