use std::collections::HashSet;

use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use torch_dungeon::chunk::*;
use torch_dungeon::entities::Orientation;
use torch_dungeon::GameConfig;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── coordinates ───────────────────────────────────────────────────────────────

#[test]
fn chunk_coords_floor_toward_negative_infinity() {
    assert_eq!(chunk_coords(DVec2::new(0.0, 0.0), 800.0), ChunkCoord::new(0, 0));
    assert_eq!(chunk_coords(DVec2::new(799.9, 799.9), 800.0), ChunkCoord::new(0, 0));
    assert_eq!(chunk_coords(DVec2::new(800.0, 0.0), 800.0), ChunkCoord::new(1, 0));
    assert_eq!(chunk_coords(DVec2::new(-0.5, -800.0), 800.0), ChunkCoord::new(-1, -1));
    assert_eq!(chunk_coords(DVec2::new(-800.5, 0.0), 800.0), ChunkCoord::new(-2, 0));
}

#[test]
fn chunk_origin_is_top_left() {
    assert_eq!(ChunkCoord::new(-1, 2).origin(800.0), DVec2::new(-800.0, 1600.0));
}

#[test]
fn neighborhood_is_nine_distinct_adjacent_chunks() {
    let c = ChunkCoord::new(3, -4);
    let n = c.neighborhood();
    let unique: HashSet<_> = n.iter().copied().collect();
    assert_eq!(unique.len(), 9);
    assert!(unique.contains(&c));
    assert!(n.iter().all(|other| c.is_adjacent(*other)));
    assert!(!c.is_adjacent(ChunkCoord::new(5, -4)));
}

#[test]
fn in_neighborhood_uses_chunks_not_distance() {
    // About 800 units apart but two chunks away.
    assert!(!in_neighborhood(DVec2::new(799.9, 0.0), DVec2::new(1600.1, 0.0), 800.0));
    // Over 2000 units apart but in adjacent chunks.
    assert!(in_neighborhood(DVec2::new(0.0, 0.0), DVec2::new(1599.0, 1599.0), 800.0));
}

// ── GeneratedChunks ───────────────────────────────────────────────────────────

#[test]
fn mark_is_idempotent() {
    let mut chunks = GeneratedChunks::new();
    assert!(chunks.is_empty());
    assert!(chunks.mark(ChunkCoord::new(0, 0)));
    assert!(!chunks.mark(ChunkCoord::new(0, 0)));
    assert!(chunks.contains(ChunkCoord::new(0, 0)));
    assert_eq!(chunks.len(), 1);
    chunks.clear();
    assert!(chunks.is_empty());
}

// ── roll_chunk_walls ──────────────────────────────────────────────────────────

#[test]
fn rolled_walls_respect_counts_and_margins() {
    let config = GameConfig::default();
    let mut rng = seeded_rng();
    for x in -3..3 {
        for y in -3..3 {
            let coord = ChunkCoord::new(x, y);
            let origin = coord.origin(config.chunk_size);
            let walls = roll_chunk_walls(coord, &config, &mut rng);
            assert!((2..=3).contains(&walls.len()));
            for w in walls {
                let rel = w.anchor - origin;
                assert!(rel.x >= 100.0 && rel.y >= 100.0, "anchor {rel:?} inside top/left margin");
                match w.orientation {
                    Orientation::Vertical => {
                        assert_eq!(w.width, config.wall_thickness);
                        assert!((200.0..=300.0).contains(&w.height));
                        assert!(rel.x <= 700.0 && rel.y <= 600.0);
                    }
                    Orientation::Horizontal => {
                        assert_eq!(w.height, config.wall_thickness);
                        assert!((200.0..=300.0).contains(&w.width));
                        assert!(rel.x <= 600.0 && rel.y <= 700.0);
                    }
                }
                assert_eq!(w.anchor.x.fract(), 0.0);
                assert_eq!(w.anchor.y.fract(), 0.0);
            }
        }
    }
}

#[test]
fn rolled_walls_are_deterministic_for_a_seed() {
    let config = GameConfig::default();
    let a = roll_chunk_walls(ChunkCoord::new(2, -1), &config, &mut seeded_rng());
    let b = roll_chunk_walls(ChunkCoord::new(2, -1), &config, &mut seeded_rng());
    assert_eq!(a, b);
}

#[test]
fn fixed_wall_count_is_honoured() {
    let config = GameConfig {
        walls_per_chunk_min: 4,
        walls_per_chunk_max: 4,
        ..GameConfig::default()
    };
    let walls = roll_chunk_walls(ChunkCoord::new(0, 0), &config, &mut seeded_rng());
    assert_eq!(walls.len(), 4);
}
