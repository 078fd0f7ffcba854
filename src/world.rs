/// The single mutable root of a play session.
///
/// `World` owns every entity collection, streams chunks in around the
/// player and advances one frame per `update` call in a fixed order:
/// player (and its bullets' kills), chunk streaming, nearby enemies, nearby
/// bonuses.  All randomness is injected so a seeded RNG reproduces a
/// session exactly.

use glam::DVec2;
use rand::Rng;
use tracing::{debug, info};

use crate::chunk::{chunk_coords, in_neighborhood, roll_chunk_walls, ChunkCoord, GeneratedChunks, WallSpec};
use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::entities::{Bonus, BonusKind, Bullet, EntityId, Positioned, Wall};
use crate::player::{Obstacle, Player};

/// Hands out entity ids.  Never reused within a `World`, even across
/// restarts.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn alloc(&mut self) -> EntityId {
        self.last += 1;
        EntityId(self.last)
    }
}

/// Read-only view of everything a renderer should consider this frame.
#[derive(Debug, Default)]
pub struct DrawList<'a> {
    pub walls: Vec<&'a Wall>,
    pub enemies: Vec<&'a Enemy>,
    pub bonuses: Vec<&'a Bonus>,
    pub player: Option<&'a Player>,
}

impl<'a> DrawList<'a> {
    /// Bullets from the player and from every listed enemy.
    pub fn bullets(&self) -> impl Iterator<Item = &'a Bullet> + '_ {
        self.player
            .into_iter()
            .flat_map(|p| p.bullets.iter())
            .chain(self.enemies.iter().copied().flat_map(|e| e.bullets.iter()))
    }
}

#[derive(Clone, Debug)]
pub struct World {
    pub config: GameConfig,
    pub walls: Vec<Wall>,
    pub enemies: Vec<Enemy>,
    pub bonuses: Vec<Bonus>,
    pub player: Option<Player>,
    pub chunks: GeneratedChunks,
    offset: DVec2,
    dt: f64,
    game_over: bool,
    ids: IdAllocator,
}

impl World {
    /// An empty world with no player.  Call `start_game` to begin a session.
    pub fn new(config: GameConfig) -> Self {
        World {
            config,
            walls: Vec::new(),
            enemies: Vec::new(),
            bonuses: Vec::new(),
            player: None,
            chunks: GeneratedChunks::new(),
            offset: DVec2::ZERO,
            dt: 0.0,
            game_over: false,
            ids: IdAllocator::default(),
        }
    }

    pub fn alloc_id(&mut self) -> EntityId {
        self.ids.alloc()
    }

    /// Seconds covered by the frame currently being simulated.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    // ── Session lifecycle ─────────────────────────────────────────────────────

    /// Wipe the session and start over with a fresh player at the origin
    /// and the 3×3 block of chunks around it already generated.
    pub fn start_game(&mut self, rng: &mut impl Rng) {
        self.walls.clear();
        self.enemies.clear();
        self.bonuses.clear();
        self.chunks.clear();

        let id = self.ids.alloc();
        self.player = Some(Player::new(id, DVec2::ZERO, &self.config));
        self.ensure_chunks_around(DVec2::ZERO, rng);

        self.offset = DVec2::ZERO;
        self.game_over = false;
        info!(walls = self.walls.len(), enemies = self.enemies.len(), "game started");
    }

    /// Terminal until the next `start_game`.
    pub fn end_game(&mut self) {
        if !self.game_over {
            let kills = self.player.as_ref().map_or(0, |p| p.kills);
            info!(kills, "game over");
        }
        self.game_over = true;
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    // ── Chunk streaming ───────────────────────────────────────────────────────

    pub fn chunk_of(&self, position: DVec2) -> ChunkCoord {
        chunk_coords(position, self.config.chunk_size)
    }

    /// Populate `coord` with walls, one enemy per wall.  A chunk is only
    /// ever generated once; returns `false` if it already was.
    pub fn generate_chunk(&mut self, coord: ChunkCoord, rng: &mut impl Rng) -> bool {
        if !self.chunks.mark(coord) {
            return false;
        }
        let specs = roll_chunk_walls(coord, &self.config, rng);
        for spec in &specs {
            self.spawn_wall(*spec);
            let Some(wall) = self.walls.last() else {
                continue;
            };
            let enemy = Enemy::spawn(self.ids.alloc(), wall, &self.config, rng);
            self.enemies.push(enemy);
        }
        debug!(x = coord.x, y = coord.y, walls = specs.len(), "generated chunk");
        true
    }

    pub fn ensure_chunks_around(&mut self, position: DVec2, rng: &mut impl Rng) {
        for coord in self.chunk_of(position).neighborhood() {
            self.generate_chunk(coord, rng);
        }
    }

    /// Give `spec` an id and add it to the world.  Chunk generation builds
    /// every wall through here.
    pub fn spawn_wall(&mut self, spec: WallSpec) -> EntityId {
        let id = self.ids.alloc();
        self.walls
            .push(Wall::new(id, spec.anchor, spec.width, spec.height, spec.orientation));
        id
    }

    /// Every item whose position lies in the 3×3 chunk block around
    /// `position`.  Chunk membership, not distance.
    pub fn objects_near<'a, T: Positioned>(
        &self,
        position: DVec2,
        items: &'a [T],
    ) -> impl Iterator<Item = &'a T> + 'a {
        let chunk_size = self.config.chunk_size;
        items
            .iter()
            .filter(move |item| in_neighborhood(position, item.position(), chunk_size))
    }

    fn indices_near<T: Positioned>(&self, position: DVec2, items: &[T]) -> Vec<usize> {
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| in_neighborhood(position, item.position(), self.config.chunk_size))
            .map(|(i, _)| i)
            .collect()
    }

    // ── Per-frame update ──────────────────────────────────────────────────────

    /// Advance the simulation by one frame of `dt` seconds.  Does nothing
    /// until a player exists.  Entities outside the player's chunk block
    /// are frozen.
    pub fn update(&mut self, dt: f64, rng: &mut impl Rng) {
        let Some(center) = self.player.as_ref().map(|p| p.body.position) else {
            return;
        };
        self.dt = dt;

        self.update_player(rng);
        self.ensure_chunks_around(center, rng);

        for i in self.indices_near(center, &self.enemies) {
            self.update_enemy(i);
        }
        self.enemies.retain(|enemy| !enemy.is_decayed());

        for i in self.indices_near(center, &self.bonuses) {
            self.update_bonus(i);
        }
        self.bonuses.retain(Bonus::is_active);
    }

    fn update_player(&mut self, rng: &mut impl Rng) {
        let Some(player) = self.player.as_mut() else {
            return;
        };

        for bullet in player.bullets.iter_mut() {
            bullet.advance(self.dt, &self.walls);
            let hits = bullet.hit_enemies(&self.enemies);
            if hits.is_empty() {
                continue;
            }
            bullet.deactivate();
            for i in hits {
                let enemy = &mut self.enemies[i];
                if !enemy.take_damage(&self.config) {
                    continue;
                }
                player.kills += 1;
                debug!(enemy = enemy.id.0, kills = player.kills, "enemy killed");
                if rng.gen_bool(self.config.bonus_spawn_chance) {
                    let kind = BonusKind::roll(&self.config, rng);
                    let bonus = Bonus::new(self.ids.alloc(), enemy.body.position, kind, &self.config);
                    debug!(bonus = bonus.id.0, ?kind, "bonus dropped");
                    self.bonuses.push(bonus);
                }
            }
        }
        player.bullets.retain(Bullet::is_active);

        if self.game_over {
            return;
        }
        if player.tick_timers(&self.config) {
            debug!(bullets_left = player.bullets_left, "ammo recharged");
        }
    }

    fn update_enemy(&mut self, i: usize) {
        if !self.enemies[i].is_alive() {
            self.enemies[i].tick_decay();
            return;
        }

        if !self.can_see_player(&self.enemies[i]) {
            let (before, rest) = self.enemies.split_at_mut(i);
            if let Some((enemy, after)) = rest.split_first_mut() {
                enemy.patrol(&self.walls, before.iter().chain(after.iter()), &self.config);
            }
        }

        let hurt = self.enemies[i].advance_bullets(self.dt, &self.walls, self.player.as_mut(), &self.config);
        if hurt {
            let (lives, dead) = self
                .player
                .as_ref()
                .map_or((0, false), |p| (p.lives, p.is_dead()));
            debug!(enemy = self.enemies[i].id.0, lives, "player hit");
            if dead {
                self.end_game();
            }
        }

        let target = if self.can_see_player(&self.enemies[i]) {
            self.player.as_ref().map(|p| p.body.position)
        } else {
            None
        };
        let ids = &mut self.ids;
        self.enemies[i].try_fire(target, || ids.alloc(), &self.config);
    }

    fn update_bonus(&mut self, i: usize) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let bonus = &mut self.bonuses[i];
        if bonus.check_player_pickup(player, &self.config) {
            debug!(bonus = bonus.id.0, kind = ?bonus.kind, "bonus picked up");
        }
    }

    // ── Player input ──────────────────────────────────────────────────────────

    /// Walk forward (`> 0`) or back (`< 0`) along the player's facing,
    /// sliding along walls and living enemies.  The camera follows.
    pub fn move_player(&mut self, forward: f64) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let obstacles = self
            .walls
            .iter()
            .map(Obstacle::Wall)
            .chain(self.enemies.iter().filter(|e| e.is_alive()).map(Obstacle::Enemy));
        let delta = player.step(forward, obstacles, &self.config);
        if delta != DVec2::ZERO {
            self.offset(delta);
        }
    }

    pub fn rotate_player(&mut self, delta: f64) {
        if let Some(player) = self.player.as_mut() {
            player.rotate(delta, &self.config);
        }
    }

    /// Returns whether a bullet was fired.
    pub fn player_shoot(&mut self) -> bool {
        let Some(player) = self.player.as_mut() else {
            return false;
        };
        if !player.can_shoot() {
            return false;
        }
        let id = self.ids.alloc();
        player.shoot(id, &self.config)
    }

    // ── Camera ────────────────────────────────────────────────────────────────

    /// Shift the camera opposite to a player displacement.
    pub fn offset(&mut self, delta: DVec2) {
        self.offset -= delta;
    }

    pub fn camera_offset(&self) -> DVec2 {
        self.offset
    }

    pub fn world_to_screen(&self, position: DVec2) -> DVec2 {
        let half = DVec2::new(
            (self.config.screen_width / 2.0).floor(),
            (self.config.screen_height / 2.0).floor(),
        );
        position + self.offset + half
    }

    // ── Queries for the presentation layer ────────────────────────────────────

    pub fn can_see_player(&self, enemy: &Enemy) -> bool {
        enemy.can_see_player(self.player.as_ref(), &self.walls, self.game_over, &self.config)
    }

    pub fn enemy_facing(&self, enemy: &Enemy) -> f64 {
        let target = if self.can_see_player(enemy) {
            self.player.as_ref().map(|p| p.body.position)
        } else {
            None
        };
        enemy.facing_angle(target, &self.config)
    }

    /// Whether something at `position` is visible to the player: inside
    /// the torch, or anywhere while night vision lasts.
    pub fn is_lit(&self, position: DVec2) -> bool {
        let Some(player) = &self.player else {
            return false;
        };
        !self.game_over
            && (player.has_night_vision()
                || player.body.position.distance(position) <= self.config.torch_radius)
    }

    pub fn draw_candidates(&self) -> DrawList<'_> {
        let Some(player) = &self.player else {
            return DrawList::default();
        };
        let center = player.body.position;
        DrawList {
            walls: self.objects_near(center, &self.walls).collect(),
            enemies: self.objects_near(center, &self.enemies).collect(),
            bonuses: self.objects_near(center, &self.bonuses).collect(),
            player: Some(player),
        }
    }
}
