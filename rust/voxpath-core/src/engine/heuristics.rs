use crate::models::Coord;

/// Manhattan distance. Overestimates diagonal moves under the Euclidean step cost, so A* may
/// settle on a slightly longer route.
#[inline]
pub fn manhattan(a: Coord, b: Coord) -> f64 {
    let (dx, dy, dz) = delta(a, b);
    (dx.abs() + dy.abs() + dz.abs()) as f64
}

/// Euclidean distance between two cells, used as the cost of one step.
#[inline]
pub fn step_cost(a: Coord, b: Coord) -> f64 {
    let (dx, dy, dz) = delta(a, b);
    let (dx, dy, dz) = (dx as f64, dy as f64, dz as f64);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

// Widened so that cells at opposite ends of the i32 range cannot overflow.
#[inline]
fn delta(a: Coord, b: Coord) -> (i64, i64, i64) {
    (a.x as i64 - b.x as i64, a.y as i64 - b.y as i64, a.z as i64 - b.z as i64)
}
