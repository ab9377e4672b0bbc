//! Integer lattice coordinates and adjacency offsets.
//!
//! The network is a cubic lattice of side length `size`; a node's identity
//! within the lattice is its integer [`GridPos`]. World-space placement
//! (centered on the origin, scaled by `spacing`) is derived here so the
//! presentation layer never has to duplicate the math.

use serde::{Deserialize, Serialize};

/// A position in the cubic lattice. Coordinates lie in `0..size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// The six axis-aligned neighbor offsets (von Neumann neighborhood in 3D).
pub const NEIGHBOR_OFFSETS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

impl GridPos {
    /// Create a new grid position.
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Whether this position lies inside a cube of the given side length.
    pub fn in_bounds(&self, size: u32) -> bool {
        let size = size as i32;
        (0..size).contains(&self.x) && (0..size).contains(&self.y) && (0..size).contains(&self.z)
    }

    /// The position shifted by an axis-aligned offset. May be out of bounds.
    pub fn offset(&self, (dx, dy, dz): (i32, i32, i32)) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Linear index in x-major construction order.
    ///
    /// Matches the order nodes are created in, so a position can be resolved
    /// to its arena key through the network's construction index.
    pub fn linear_index(&self, size: u32) -> usize {
        let size = size as usize;
        (self.x as usize) * size * size + (self.y as usize) * size + self.z as usize
    }

    /// World-space position: centered on the origin, scaled by `spacing`.
    pub fn world(&self, size: u32, spacing: f32) -> [f32; 3] {
        let center = (size as f32 - 1.0) / 2.0;
        [
            (self.x as f32 - center) * spacing,
            (self.y as f32 - center) * spacing,
            (self.z as f32 - center) * spacing,
        ]
    }
}
