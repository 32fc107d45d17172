use crate::models::Coord;
use crate::occupancy::OccupancyGrid;

/// Expansion order is part of the solver's tie-breaking, so it must not change.
pub const NEIGHBOR_OFFSETS: [(i32, i32, i32); 18] = [
    // horizontal axes
    (1, 0, 0),
    (-1, 0, 0),
    (0, 0, 1),
    (0, 0, -1),
    // horizontal diagonals
    (1, 0, 1),
    (1, 0, -1),
    (-1, 0, 1),
    (-1, 0, -1),
    // vertical
    (0, 1, 0),
    (0, -1, 0),
    // up + one horizontal axis
    (1, 1, 0),
    (-1, 1, 0),
    (0, 1, 1),
    (0, 1, -1),
    // down + one horizontal axis
    (1, -1, 0),
    (-1, -1, 0),
    (0, -1, 1),
    (0, -1, -1),
];

/// Walkable cells one step away from `c`, in [`NEIGHBOR_OFFSETS`] order.
pub fn walkable_neighbors(grid: &OccupancyGrid, c: Coord) -> impl Iterator<Item = Coord> + '_ {
    NEIGHBOR_OFFSETS
        .iter()
        .filter_map(move |&(dx, dy, dz)| c.checked_offset(dx, dy, dz))
        .filter(move |n| grid.is_walkable(*n))
}

/// True when `b` is exactly one neighbor offset away from `a`.
pub fn is_neighbor_step(a: Coord, b: Coord) -> bool {
    let step = (b.x as i64 - a.x as i64, b.y as i64 - a.y as i64, b.z as i64 - a.z as i64);
    NEIGHBOR_OFFSETS.iter().any(|&(dx, dy, dz)| (dx as i64, dy as i64, dz as i64) == step)
}
