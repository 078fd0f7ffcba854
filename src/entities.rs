/// Shared entity data: identity, the collision body every simulated object
/// is built on, and the three small entity kinds (walls, bullets, bonuses).
/// Enemies and the player carry more behaviour and live in their own
/// modules.

use glam::DVec2;
use rand::Rng;

use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::geometry::Rect;
use crate::player::Player;

// ── Identity ──────────────────────────────────────────────────────────────────

/// Monotonically increasing id handed out by `World::alloc_id`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Anything with a world position, so the chunk-neighbourhood queries can
/// work over every collection.
pub trait Positioned {
    fn position(&self) -> DVec2;
}

// ── Collision body ────────────────────────────────────────────────────────────

/// Centre position plus a fixed box size.  The AABB is always derived,
/// never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub position: DVec2,
    pub size: DVec2,
}

impl Body {
    pub fn new(position: DVec2, size: DVec2) -> Self {
        Body { position, size }
    }

    pub fn square(position: DVec2, side: f64) -> Self {
        Body::new(position, DVec2::splat(side))
    }

    pub fn collision_rect(&self) -> Rect {
        self.probe(DVec2::ZERO)
    }

    /// The box this body would occupy after moving by `delta`.
    pub fn probe(&self, delta: DVec2) -> Rect {
        Rect::centered(self.position + delta, self.size)
    }

    pub fn check_collision(&self, rect: &Rect) -> bool {
        self.collision_rect().overlaps(rect)
    }
}

// ── Walls ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Static obstacle.  `position` is the wall's anchor: for a vertical wall
/// the centre of its top edge, for a horizontal wall the middle of its left
/// edge.  The footprint therefore extends from the anchor along the long
/// axis and straddles it across the short axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub id: EntityId,
    pub position: DVec2,
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
}

impl Wall {
    pub fn new(id: EntityId, position: DVec2, width: f64, height: f64, orientation: Orientation) -> Self {
        Wall {
            id,
            position,
            width,
            height,
            orientation,
        }
    }

    pub fn left_top(&self) -> DVec2 {
        match self.orientation {
            Orientation::Vertical => DVec2::new(self.position.x - self.width / 2.0, self.position.y),
            Orientation::Horizontal => DVec2::new(self.position.x, self.position.y - self.height / 2.0),
        }
    }

    /// Unlike every other entity a wall's box is not centred on its position.
    pub fn collision_rect(&self) -> Rect {
        let lt = self.left_top();
        Rect::new(lt.x, lt.y, self.width, self.height)
    }

    pub fn check_collision(&self, rect: &Rect) -> bool {
        self.collision_rect().overlaps(rect)
    }

    /// Extent along the long axis, which is also the patrol range of any
    /// enemy spawned on this wall.
    pub fn length(&self) -> f64 {
        match self.orientation {
            Orientation::Vertical => self.height,
            Orientation::Horizontal => self.width,
        }
    }

    pub fn thickness(&self) -> f64 {
        match self.orientation {
            Orientation::Vertical => self.width,
            Orientation::Horizontal => self.height,
        }
    }
}

impl Positioned for Wall {
    fn position(&self) -> DVec2 {
        self.position
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// Straight-line projectile.  Once `active` is cleared it never comes back;
/// the owner drops it from its list.
#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub id: EntityId,
    pub body: Body,
    /// Unit vector, or zero when fired at its own origin.
    pub direction: DVec2,
    /// Units per second.
    pub speed: f64,
    pub owner: BulletOwner,
    active: bool,
}

impl Bullet {
    /// A bullet leaving `origin` toward `target`.
    pub fn aimed(id: EntityId, origin: DVec2, target: DVec2, owner: BulletOwner, config: &GameConfig) -> Self {
        let speed = match owner {
            BulletOwner::Player => config.player_bullet_speed,
            BulletOwner::Enemy => config.enemy_bullet_speed,
        };
        Bullet {
            id,
            body: Body::square(origin, config.bullet_size),
            direction: (target - origin).normalize_or_zero(),
            speed,
            owner,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Advance by `dt` seconds.  If the destination box overlaps any wall
    /// the bullet dies where it stands.
    pub fn advance(&mut self, dt: f64, walls: &[Wall]) {
        if !self.active {
            return;
        }
        let delta = self.direction * self.speed * dt;
        let probe = self.body.probe(delta);
        if walls.iter().any(|wall| wall.check_collision(&probe)) {
            self.active = false;
        } else {
            self.body.position += delta;
        }
    }

    pub fn hits_player(&self, player: &Player) -> bool {
        self.active
            && self.owner == BulletOwner::Enemy
            && player.body.check_collision(&self.body.collision_rect())
    }

    /// Indices of every live enemy this bullet overlaps.  A single bullet
    /// can report several enemies in one frame.
    pub fn hit_enemies(&self, enemies: &[Enemy]) -> Vec<usize> {
        if !self.active || self.owner != BulletOwner::Player {
            return Vec::new();
        }
        let rect = self.body.collision_rect();
        enemies
            .iter()
            .enumerate()
            .filter(|(_, enemy)| enemy.is_alive() && enemy.body.check_collision(&rect))
            .map(|(i, _)| i)
            .collect()
    }
}

impl Positioned for Bullet {
    fn position(&self) -> DVec2 {
        self.body.position
    }
}

// ── Bonus items ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BonusKind {
    /// Restores `aid_kit_heal_amount` lives.
    AidKit,
    /// Adds `night_vision_time` seconds of night vision.
    Goggles,
}

impl BonusKind {
    /// Weighted pick between the two kinds.
    pub fn roll(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let total = config.bonus_heal_weight.saturating_add(config.bonus_buff_weight);
        if total == 0 || rng.gen_ratio(config.bonus_heal_weight.min(total), total) {
            BonusKind::AidKit
        } else {
            BonusKind::Goggles
        }
    }
}

/// Stationary pickup dropped by a dying enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct Bonus {
    pub id: EntityId,
    pub body: Body,
    pub kind: BonusKind,
    active: bool,
}

impl Bonus {
    pub fn new(id: EntityId, position: DVec2, kind: BonusKind, config: &GameConfig) -> Self {
        Bonus {
            id,
            body: Body::square(position, config.bonus_size),
            kind,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Apply the bonus if the player overlaps it.  Returns `true` on the
    /// frame it is consumed; afterwards it is inert.
    pub fn check_player_pickup(&mut self, player: &mut Player, config: &GameConfig) -> bool {
        if !self.active || !self.body.check_collision(&player.body.collision_rect()) {
            return false;
        }
        match self.kind {
            BonusKind::AidKit => player.heal(config.aid_kit_heal_amount, config),
            BonusKind::Goggles => player.start_night_vision(config),
        }
        self.active = false;
        true
    }
}

impl Positioned for Bonus {
    fn position(&self) -> DVec2 {
        self.body.position
    }
}
