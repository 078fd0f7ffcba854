/// Spatial partition of the infinite world into square chunks.
///
/// Chunks serve two jobs: they key procedural generation (each chunk is
/// populated exactly once) and they bound per-frame work (only objects in
/// the 3×3 block around the player are simulated or drawn).

use std::collections::HashSet;

use glam::DVec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::Orientation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i64,
    pub y: i64,
}

impl ChunkCoord {
    pub fn new(x: i64, y: i64) -> Self {
        ChunkCoord { x, y }
    }

    /// World position of the chunk's top-left corner.
    pub fn origin(&self, chunk_size: f64) -> DVec2 {
        DVec2::new(self.x as f64 * chunk_size, self.y as f64 * chunk_size)
    }

    /// This chunk and its eight neighbours, row by row.
    pub fn neighborhood(&self) -> [ChunkCoord; 9] {
        let mut out = [*self; 9];
        let mut i = 0;
        for dx in -1..=1 {
            for dy in -1..=1 {
                out[i] = ChunkCoord::new(self.x + dx, self.y + dy);
                i += 1;
            }
        }
        out
    }

    /// True when `other` lies in this chunk's 3×3 neighbourhood.
    pub fn is_adjacent(&self, other: ChunkCoord) -> bool {
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}

/// Floor division of a world position by the chunk size.  Negative
/// coordinates round toward negative infinity, so `-0.5` is in chunk `-1`.
pub fn chunk_coords(position: DVec2, chunk_size: f64) -> ChunkCoord {
    ChunkCoord::new(
        (position.x / chunk_size).floor() as i64,
        (position.y / chunk_size).floor() as i64,
    )
}

/// Membership test behind every "objects near" query.
pub fn in_neighborhood(center: DVec2, position: DVec2, chunk_size: f64) -> bool {
    chunk_coords(center, chunk_size).is_adjacent(chunk_coords(position, chunk_size))
}

/// Set of chunks that have already been populated.
#[derive(Clone, Debug, Default)]
pub struct GeneratedChunks {
    visited: HashSet<ChunkCoord>,
}

impl GeneratedChunks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `coord` as generated.  Returns `false` if it already was.
    pub fn mark(&mut self, coord: ChunkCoord) -> bool {
        self.visited.insert(coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.visited.contains(&coord)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    pub fn clear(&mut self) {
        self.visited.clear();
    }
}

/// Placement of one wall, before it is given an identity.
///
/// `anchor` is the middle of the wall's short side at its start: the
/// top-centre of a vertical wall, the left-middle of a horizontal one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSpec {
    pub anchor: DVec2,
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
}

/// Roll the wall layout for one chunk.
///
/// Anchors stay at least `chunk_margin` from the chunk's top/left edges,
/// `chunk_margin` from the far edge across the wall and `2 * chunk_margin`
/// from the far edge along it.
pub fn roll_chunk_walls(coord: ChunkCoord, config: &GameConfig, rng: &mut impl Rng) -> Vec<WallSpec> {
    let origin = coord.origin(config.chunk_size);
    let near = config.chunk_margin;
    let across = config.chunk_size - config.chunk_margin;
    let along = config.chunk_size - 2.0 * config.chunk_margin;

    let count = rng.gen_range(config.walls_per_chunk_min..=config.walls_per_chunk_max);
    (0..count)
        .map(|_| {
            let orientation = if rng.gen_bool(0.5) {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            match orientation {
                Orientation::Vertical => {
                    let x = roll_int(rng, origin.x + near, origin.x + across);
                    let y = roll_int(rng, origin.y + near, origin.y + along);
                    let length = roll_int(rng, config.wall_length_min, config.wall_length_max);
                    WallSpec {
                        anchor: DVec2::new(x, y),
                        width: config.wall_thickness,
                        height: length,
                        orientation,
                    }
                }
                Orientation::Horizontal => {
                    let x = roll_int(rng, origin.x + near, origin.x + along);
                    let y = roll_int(rng, origin.y + near, origin.y + across);
                    let length = roll_int(rng, config.wall_length_min, config.wall_length_max);
                    WallSpec {
                        anchor: DVec2::new(x, y),
                        width: length,
                        height: config.wall_thickness,
                        orientation,
                    }
                }
            }
        })
        .collect()
}

/// Uniform integer in `[floor(lo), floor(hi)]`, returned as a float.
pub(crate) fn roll_int(rng: &mut impl Rng, lo: f64, hi: f64) -> f64 {
    let lo = lo.floor() as i64;
    let hi = (hi.floor() as i64).max(lo);
    rng.gen_range(lo..=hi) as f64
}
