/// Wall-bound sentries.
///
/// An enemy patrols the long axis of the wall it spawned on, freezes and
/// opens fire while it can see the player, dies from a single hit and
/// lingers as a corpse for `enemy_decay_time` before being dropped.

use glam::DVec2;
use rand::Rng;

use crate::chunk::roll_int;
use crate::config::GameConfig;
use crate::entities::{Body, Bullet, BulletOwner, EntityId, Orientation, Positioned, Wall};
use crate::geometry::{line_intersects_rect, rotate_point};
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStatus {
    Alive,
    /// Frames left before removal.
    Dead { decay: u32 },
}

/// Patrol line copied from the spawning wall.  Walls never change, so the
/// copy cannot go stale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Patrol {
    pub wall_id: EntityId,
    pub orientation: Orientation,
    /// The wall's anchor, where the patrol range starts.
    pub start: DVec2,
    pub length: f64,
}

impl Patrol {
    pub fn from_wall(wall: &Wall) -> Self {
        Patrol {
            wall_id: wall.id,
            orientation: wall.orientation,
            start: wall.position,
            length: wall.length(),
        }
    }

    /// Whether `position` has left the stretch of the wall.
    pub fn overshoots(&self, position: DVec2) -> bool {
        let offset = match self.orientation {
            Orientation::Vertical => position.y - self.start.y,
            Orientation::Horizontal => position.x - self.start.x,
        };
        offset < 0.0 || offset > self.length
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub body: Body,
    pub patrol: Patrol,
    /// `1.0` or `-1.0` along the patrol axis.
    pub direction: f64,
    status: EnemyStatus,
    pub bullets: Vec<Bullet>,
    pub shoot_delay: u32,
}

impl Enemy {
    pub fn new(id: EntityId, wall: &Wall, position: DVec2, config: &GameConfig) -> Self {
        Enemy {
            id,
            body: Body::square(position, config.enemy_size),
            patrol: Patrol::from_wall(wall),
            direction: 1.0,
            status: EnemyStatus::Alive,
            bullets: Vec::new(),
            shoot_delay: 0,
        }
    }

    /// Place a new enemy flush against `wall` at a random point along it.
    /// Which side of the wall it stands on is decided by
    /// `enemy_far_side_chance`.
    pub fn spawn(id: EntityId, wall: &Wall, config: &GameConfig, rng: &mut impl Rng) -> Self {
        let clearance = wall.thickness() / 2.0 + config.enemy_size / 2.0;
        let side = if rng.gen_bool(config.enemy_far_side_chance) { 1.0 } else { -1.0 };
        let position = match wall.orientation {
            Orientation::Vertical => DVec2::new(
                wall.position.x + side * clearance,
                roll_int(rng, wall.position.y, wall.position.y + wall.height),
            ),
            Orientation::Horizontal => DVec2::new(
                roll_int(rng, wall.position.x, wall.position.x + wall.width),
                wall.position.y + side * clearance,
            ),
        };
        Enemy::new(id, wall, position, config)
    }

    pub fn status(&self) -> EnemyStatus {
        self.status
    }

    pub fn is_alive(&self) -> bool {
        self.status == EnemyStatus::Alive
    }

    /// Kill the enemy.  Returns `true` only on the Alive → Dead transition,
    /// so repeat hits never grant a second kill.
    pub fn take_damage(&mut self, config: &GameConfig) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.status = EnemyStatus::Dead {
            decay: config.frames(config.enemy_decay_time),
        };
        self.bullets.clear();
        true
    }

    /// Count down the corpse.  Returns `true` once it should be removed.
    pub fn tick_decay(&mut self) -> bool {
        match &mut self.status {
            EnemyStatus::Alive => false,
            EnemyStatus::Dead { decay } => {
                *decay = decay.saturating_sub(1);
                *decay == 0
            }
        }
    }

    pub fn is_decayed(&self) -> bool {
        self.status == EnemyStatus::Dead { decay: 0 }
    }

    /// Within torch range and no wall's box crosses the sight line.
    pub fn can_see_player(&self, player: Option<&Player>, walls: &[Wall], game_over: bool, config: &GameConfig) -> bool {
        let Some(player) = player else {
            return false;
        };
        if game_over {
            return false;
        }
        let from = self.body.position;
        let to = player.body.position;
        if from.distance(to) > config.torch_radius {
            return false;
        }
        !walls
            .iter()
            .any(|wall| line_intersects_rect(from, to, &wall.collision_rect()))
    }

    /// Sprite/gun angle in degrees.  Aims straight at the player while
    /// alerted, otherwise one of four fixed facings along the patrol.
    pub fn facing_angle(&self, target: Option<DVec2>, config: &GameConfig) -> f64 {
        if let Some(target) = target {
            let rel = self.body.position - target;
            return config.enemy_facing_offset - rel.y.atan2(rel.x).to_degrees();
        }
        match self.patrol.orientation {
            Orientation::Vertical => 90.0 - 90.0 * self.direction,
            Orientation::Horizontal => 90.0 * self.direction,
        }
    }

    /// One patrol step.  A blocked probe reverses without moving; leaving
    /// the wall's stretch reverses as well, checked independently after.
    pub fn patrol<'a>(
        &mut self,
        walls: &[Wall],
        others: impl IntoIterator<Item = &'a Enemy>,
        config: &GameConfig,
    ) {
        let step = config.enemy_speed * self.direction;
        let delta = match self.patrol.orientation {
            Orientation::Vertical => DVec2::new(0.0, step),
            Orientation::Horizontal => DVec2::new(step, 0.0),
        };
        let probe = self.body.probe(delta);

        let blocked = walls.iter().any(|wall| wall.check_collision(&probe))
            || others
                .into_iter()
                .any(|other| other.id != self.id && other.is_alive() && other.body.check_collision(&probe));

        if blocked {
            self.direction = -self.direction;
        } else {
            self.body.position += delta;
        }

        if self.patrol.overshoots(self.body.position) {
            self.direction = -self.direction;
        }
    }

    /// Move in-flight bullets and resolve hits on the player.  Returns
    /// `true` if the player lost a life.
    pub fn advance_bullets(
        &mut self,
        dt: f64,
        walls: &[Wall],
        mut player: Option<&mut Player>,
        config: &GameConfig,
    ) -> bool {
        let mut hurt = false;
        for bullet in &mut self.bullets {
            bullet.advance(dt, walls);
            let Some(player) = player.as_deref_mut() else {
                continue;
            };
            if bullet.hits_player(player) && !player.is_invulnerable() {
                player.take_damage(config);
                bullet.deactivate();
                hurt = true;
            }
        }
        self.bullets.retain(Bullet::is_active);
        hurt
    }

    /// Count down the gun; once ready, fire at `target` if it is in sight.
    /// Returns whether a bullet was fired.
    pub fn try_fire(
        &mut self,
        target: Option<DVec2>,
        next_id: impl FnOnce() -> EntityId,
        config: &GameConfig,
    ) -> bool {
        if self.shoot_delay > 0 {
            self.shoot_delay -= 1;
            return false;
        }
        let Some(target) = target else {
            return false;
        };
        let angle = self.facing_angle(Some(target), config);
        let half = config.enemy_texture_size / 2.0;
        let (gx, gy) = config.enemy_gun_end;
        let origin = self.body.position + rotate_point(DVec2::new(gx - half, gy - half), angle);
        self.bullets
            .push(Bullet::aimed(next_id(), origin, target, BulletOwner::Enemy, config));
        self.shoot_delay = config.frames(config.enemy_shoot_delay);
        true
    }
}

impl Positioned for Enemy {
    fn position(&self) -> DVec2 {
        self.body.position
    }
}
