/// Simulation core of a top-down, torch-lit dungeon shooter.
///
/// The library is free of terminal, clock and file I/O (apart from loading
/// a config file).  A front-end feeds input through `World::move_player`,
/// `World::rotate_player` and `World::player_shoot`, calls `World::update`
/// once per frame with the elapsed seconds and an RNG, and draws whatever
/// `World::draw_candidates` returns.

pub mod chunk;
pub mod config;
pub mod enemy;
pub mod entities;
pub mod geometry;
pub mod player;
pub mod world;

pub use config::{ConfigError, GameConfig};
pub use world::World;
