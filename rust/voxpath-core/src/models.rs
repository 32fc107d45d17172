use serde::{Deserialize, Serialize};

/// Integer grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self { Self { x, y, z } }

    /// `None` when any axis would leave the `i32` range.
    pub fn checked_offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self { x: self.x.checked_add(dx)?, y: self.y.checked_add(dy)?, z: self.z.checked_add(dz)? })
    }
}

impl From<[i32; 3]> for Coord {
    fn from(v: [i32; 3]) -> Self { Coord::new(v[0], v[1], v[2]) }
}

/// World-space position as sent by callers. Quantized to a [`Coord`] by flooring each axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self { Self { x, y, z } }

    /// Floors each axis, clamping values beyond the `i32` range to its nearest end.
    pub fn floor(self) -> Coord {
        Coord::new(floor_axis(self.x), floor_axis(self.y), floor_axis(self.z))
    }
}

fn floor_axis(v: f64) -> i32 {
    if v.is_nan() {
        return 0;
    }
    v.floor().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

impl From<Coord> for Position {
    fn from(c: Coord) -> Self { Position::new(c.x as f64, c.y as f64, c.z as f64) }
}

pub type RequestId = u64;
