/// The user-controlled entity: rotation plus forward/back movement with
/// sliding collision, a recharging ammo pool, lives with an invulnerability
/// window and the night-vision timer.
///
/// Everything here only touches the player's own state; the pieces that
/// reach into the rest of the world (camera, enemy kills, bonus drops) are
/// driven from `World`.

use glam::DVec2;

use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::entities::{Body, Bullet, BulletOwner, EntityId, Positioned, Wall};
use crate::geometry::{facing, rotate_point, Rect};

/// Something the player can bump into.
#[derive(Clone, Copy, Debug)]
pub enum Obstacle<'a> {
    Wall(&'a Wall),
    Enemy(&'a Enemy),
}

impl Obstacle<'_> {
    pub fn id(&self) -> EntityId {
        match self {
            Obstacle::Wall(wall) => wall.id,
            Obstacle::Enemy(enemy) => enemy.id,
        }
    }

    pub fn check_collision(&self, rect: &Rect) -> bool {
        match self {
            Obstacle::Wall(wall) => wall.check_collision(rect),
            Obstacle::Enemy(enemy) => enemy.body.check_collision(rect),
        }
    }
}

/// Which probes an obstacle blocked on the last move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionHit {
    pub id: EntityId,
    pub total: bool,
    pub x: bool,
    pub y: bool,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: EntityId,
    pub body: Body,
    /// Degrees in `[0, 360)`.  Zero faces down the screen.
    pub rotation: f64,
    pub lives: u32,
    pub invulnerable_timer: u32,
    pub bullets_left: u32,
    pub shoot_delay: u32,
    pub recharge_timer: u32,
    pub night_vision_timer: u32,
    pub bullets: Vec<Bullet>,
    pub kills: u32,
    /// Obstacles hit by the combined probe on the most recent move.
    pub last_hits: Vec<CollisionHit>,
}

impl Player {
    pub fn new(id: EntityId, position: DVec2, config: &GameConfig) -> Self {
        Player {
            id,
            body: Body::square(position, config.player_size),
            rotation: 0.0,
            lives: config.player_lives,
            invulnerable_timer: 0,
            bullets_left: config.player_max_bullets,
            shoot_delay: 0,
            recharge_timer: 0,
            night_vision_timer: 0,
            bullets: Vec::new(),
            kills: 0,
            last_hits: Vec::new(),
        }
    }

    pub fn facing(&self) -> DVec2 {
        facing(self.rotation)
    }

    /// Move along the facing direction, sliding along whatever blocks the
    /// way.  Returns the displacement actually applied.
    ///
    /// Three probes are taken: the full move, x only and y only.  When the
    /// full move collides, every axis that collides on its own is dropped.
    pub fn step<'a>(
        &mut self,
        forward: f64,
        obstacles: impl IntoIterator<Item = Obstacle<'a>>,
        config: &GameConfig,
    ) -> DVec2 {
        let mut delta = self.facing() * forward * config.player_speed;

        let combined = self.body.probe(delta);
        let x_only = self.body.probe(DVec2::new(delta.x, 0.0));
        let y_only = self.body.probe(DVec2::new(0.0, delta.y));

        let mut collision = false;
        let mut collision_x = false;
        let mut collision_y = false;
        self.last_hits.clear();

        for obstacle in obstacles {
            let hit = CollisionHit {
                id: obstacle.id(),
                total: obstacle.check_collision(&combined),
                x: obstacle.check_collision(&x_only),
                y: obstacle.check_collision(&y_only),
            };
            collision |= hit.total;
            collision_x |= hit.x;
            collision_y |= hit.y;
            if hit.total {
                self.last_hits.push(hit);
            }
        }

        if collision {
            if collision_x {
                delta.x = 0.0;
            }
            if collision_y {
                delta.y = 0.0;
            }
        }

        self.body.position += delta;
        delta
    }

    pub fn rotate(&mut self, delta: f64, config: &GameConfig) {
        self.rotation = (self.rotation - delta * config.player_rotation_speed).rem_euclid(360.0);
    }

    /// World position of the gun barrel for the current rotation.
    pub fn muzzle(&self, config: &GameConfig) -> DVec2 {
        let half = config.player_texture_size / 2.0;
        let (gx, gy) = config.player_gun_end;
        self.body.position + rotate_point(DVec2::new(gx - half, gy - half), self.rotation)
    }

    pub fn can_shoot(&self) -> bool {
        self.shoot_delay == 0 && self.bullets_left > 0
    }

    /// Fire one round if the gun is ready.  Returns whether a bullet left.
    pub fn shoot(&mut self, id: EntityId, config: &GameConfig) -> bool {
        if !self.can_shoot() {
            return false;
        }
        let origin = self.muzzle(config);
        let target = origin + self.facing() * config.player_aim_distance;
        self.bullets
            .push(Bullet::aimed(id, origin, target, BulletOwner::Player, config));
        self.shoot_delay = config.frames(config.player_shoot_delay);
        self.bullets_left -= 1;
        true
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0
    }

    /// Lose a life unless still invulnerable from the previous hit.
    /// Returns whether a life was lost.
    pub fn take_damage(&mut self, config: &GameConfig) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.invulnerable_timer = config.frames(config.player_invulnerability_time);
        true
    }

    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }

    pub fn heal(&mut self, amount: u32, config: &GameConfig) {
        self.lives = self.lives.saturating_add(amount).min(config.player_lives);
    }

    /// Stacks: every pickup adds the full duration.
    pub fn start_night_vision(&mut self, config: &GameConfig) {
        self.night_vision_timer += config.frames(config.night_vision_time);
    }

    pub fn has_night_vision(&self) -> bool {
        self.night_vision_timer > 0
    }

    /// Per-frame countdowns and ammo recharge.  Returns `true` on the frame
    /// a round is restored.
    pub fn tick_timers(&mut self, config: &GameConfig) -> bool {
        self.invulnerable_timer = self.invulnerable_timer.saturating_sub(1);
        self.shoot_delay = self.shoot_delay.saturating_sub(1);
        self.night_vision_timer = self.night_vision_timer.saturating_sub(1);

        if self.bullets_left >= config.player_max_bullets {
            return false;
        }
        self.recharge_timer += 1;
        if self.recharge_timer >= config.frames(config.player_bullet_recharge_time) {
            self.bullets_left += 1;
            self.recharge_timer = 0;
            return true;
        }
        false
    }
}

impl Positioned for Player {
    fn position(&self) -> DVec2 {
        self.body.position
    }
}
