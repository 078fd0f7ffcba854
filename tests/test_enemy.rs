use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use torch_dungeon::enemy::*;
use torch_dungeon::entities::*;
use torch_dungeon::player::Player;
use torch_dungeon::GameConfig;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Vertical wall anchored at the origin, 200 long; its box spans x -15..15.
fn home_wall() -> Wall {
    Wall::new(EntityId(1), DVec2::ZERO, 30.0, 200.0, Orientation::Vertical)
}

fn sentry(position: DVec2, config: &GameConfig) -> Enemy {
    Enemy::new(EntityId(2), &home_wall(), position, config)
}

fn no_others() -> Vec<&'static Enemy> {
    Vec::new()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── spawn ─────────────────────────────────────────────────────────────────────

#[test]
fn spawn_sits_flush_against_the_wall() {
    let config = GameConfig::default();
    let mut rng = seeded_rng();
    let wall = home_wall();
    for i in 0..50 {
        let e = Enemy::spawn(EntityId(i), &wall, &config, &mut rng);
        assert!(e.body.position.x == 25.0 || e.body.position.x == -25.0);
        assert!((0.0..=200.0).contains(&e.body.position.y));
        assert!(e.is_alive());
        assert_eq!(e.patrol.wall_id, wall.id);
        assert!(!wall.check_collision(&e.body.collision_rect()));
    }
}

#[test]
fn spawn_side_follows_far_side_chance() {
    let mut rng = seeded_rng();
    let wall = Wall::new(EntityId(1), DVec2::new(0.0, 0.0), 250.0, 30.0, Orientation::Horizontal);
    let far = GameConfig {
        enemy_far_side_chance: 1.0,
        ..GameConfig::default()
    };
    let near = GameConfig {
        enemy_far_side_chance: 0.0,
        ..GameConfig::default()
    };
    for i in 0..20 {
        let e = Enemy::spawn(EntityId(i), &wall, &far, &mut rng);
        assert_eq!(e.body.position.y, 25.0);
        assert!((0.0..=250.0).contains(&e.body.position.x));
        let e = Enemy::spawn(EntityId(i), &wall, &near, &mut rng);
        assert_eq!(e.body.position.y, -25.0);
    }
}

// ── sight ─────────────────────────────────────────────────────────────────────

#[test]
fn sees_player_inside_torch_radius() {
    let config = GameConfig::default();
    let e = sentry(DVec2::new(25.0, 100.0), &config);
    let p = Player::new(EntityId(3), DVec2::new(25.0, 250.0), &config);
    assert!(e.can_see_player(Some(&p), &[home_wall()], false, &config));
}

#[test]
fn never_sees_beyond_torch_radius() {
    let config = GameConfig::default();
    let e = sentry(DVec2::new(25.0, 100.0), &config);
    let p = Player::new(EntityId(3), DVec2::new(25.0, 300.5), &config);
    assert!(!e.can_see_player(Some(&p), &[], false, &config));
}

#[test]
fn never_sees_without_player_or_after_game_over() {
    let config = GameConfig::default();
    let e = sentry(DVec2::new(25.0, 100.0), &config);
    let p = Player::new(EntityId(3), DVec2::new(25.0, 150.0), &config);
    assert!(!e.can_see_player(None, &[], false, &config));
    assert!(!e.can_see_player(Some(&p), &[], true, &config));
}

#[test]
fn wall_between_blocks_sight() {
    let config = GameConfig::default();
    let e = sentry(DVec2::new(-100.0, 100.0), &config);
    let p = Player::new(EntityId(3), DVec2::new(50.0, 100.0), &config);
    assert!(!e.can_see_player(Some(&p), &[home_wall()], false, &config));
}

#[test]
fn wall_near_the_sight_line_blocks_too() {
    let config = GameConfig::default();
    let e = sentry(DVec2::ZERO, &config);
    let p = Player::new(EntityId(3), DVec2::new(100.0, 100.0), &config);
    // Box spans (80,0)..(90,10); the diagonal passes well below it.
    let wall = Wall::new(EntityId(4), DVec2::new(80.0, 5.0), 10.0, 10.0, Orientation::Horizontal);
    assert!(!e.can_see_player(Some(&p), &[wall], false, &config));
}

// ── damage / decay ────────────────────────────────────────────────────────────

#[test]
fn only_first_hit_kills() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::new(25.0, 100.0), &config);
    e.bullets.push(Bullet::aimed(EntityId(5), DVec2::ZERO, DVec2::X, BulletOwner::Enemy, &config));
    assert!(e.take_damage(&config));
    assert_eq!(e.status(), EnemyStatus::Dead { decay: 180 });
    assert!(e.bullets.is_empty());
    assert!(!e.take_damage(&config));
    assert_eq!(e.status(), EnemyStatus::Dead { decay: 180 });
}

#[test]
fn corpse_decays_after_its_timer() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::new(25.0, 100.0), &config);
    assert!(!e.tick_decay());
    e.take_damage(&config);
    for _ in 0..179 {
        assert!(!e.tick_decay());
        assert!(!e.is_decayed());
    }
    assert!(e.tick_decay());
    assert!(e.is_decayed());
}

// ── facing ────────────────────────────────────────────────────────────────────

#[test]
fn patrol_facing_uses_fixed_angles() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::new(25.0, 100.0), &config);
    assert_eq!(e.facing_angle(None, &config), 0.0);
    e.direction = -1.0;
    assert_eq!(e.facing_angle(None, &config), 180.0);

    let wall = Wall::new(EntityId(1), DVec2::ZERO, 250.0, 30.0, Orientation::Horizontal);
    let mut h = Enemy::new(EntityId(2), &wall, DVec2::new(100.0, 25.0), &config);
    assert_eq!(h.facing_angle(None, &config), 90.0);
    h.direction = -1.0;
    assert_eq!(h.facing_angle(None, &config), -90.0);
}

#[test]
fn alert_facing_points_at_target() {
    let config = GameConfig::default();
    let e = sentry(DVec2::ZERO, &config);
    assert!(approx(e.facing_angle(Some(DVec2::new(100.0, 0.0)), &config), 90.0));
    assert!(approx(e.facing_angle(Some(DVec2::new(0.0, 100.0)), &config), 360.0));
    assert!(approx(e.facing_angle(Some(DVec2::new(-100.0, 0.0)), &config), 270.0));
}

// ── patrol ────────────────────────────────────────────────────────────────────

#[test]
fn patrol_moves_along_the_wall() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::new(25.0, 100.0), &config);
    e.patrol(&[home_wall()], no_others(), &config);
    assert_eq!(e.body.position, DVec2::new(25.0, 102.0));
    assert_eq!(e.direction, 1.0);
}

#[test]
fn patrol_reverses_when_blocked_by_another_enemy() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::new(25.0, 100.0), &config);
    let other = Enemy::new(EntityId(3), &home_wall(), DVec2::new(25.0, 115.0), &config);
    e.patrol(&[home_wall()], [&other], &config);
    assert_eq!(e.body.position, DVec2::new(25.0, 100.0));
    assert_eq!(e.direction, -1.0);
}

#[test]
fn dead_enemies_do_not_block_patrol() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::new(25.0, 100.0), &config);
    let mut other = Enemy::new(EntityId(3), &home_wall(), DVec2::new(25.0, 115.0), &config);
    other.take_damage(&config);
    e.patrol(&[home_wall()], [&other], &config);
    assert_eq!(e.body.position, DVec2::new(25.0, 102.0));
}

#[test]
fn patrol_turns_back_past_the_wall_end() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::new(25.0, 199.0), &config);
    e.patrol(&[home_wall()], no_others(), &config);
    assert_eq!(e.body.position.y, 201.0);
    assert_eq!(e.direction, -1.0);
    e.patrol(&[home_wall()], no_others(), &config);
    assert_eq!(e.body.position.y, 199.0);
    assert_eq!(e.direction, -1.0);
}

// ── firing ────────────────────────────────────────────────────────────────────

#[test]
fn fires_at_visible_target_then_cools_down() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::ZERO, &config);
    let mut next = 10;
    let mut alloc = || {
        next += 1;
        EntityId(next)
    };
    assert!(e.try_fire(Some(DVec2::new(200.0, 0.0)), &mut alloc, &config));
    assert_eq!(e.bullets.len(), 1);
    assert_eq!(e.shoot_delay, 60);
    assert_eq!(e.bullets[0].owner, BulletOwner::Enemy);
    assert!(e.bullets[0].direction.x > 0.9);

    assert!(!e.try_fire(Some(DVec2::new(200.0, 0.0)), &mut alloc, &config));
    assert_eq!(e.shoot_delay, 59);
    assert_eq!(e.bullets.len(), 1);
}

#[test]
fn holds_fire_without_a_target() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::ZERO, &config);
    assert!(!e.try_fire(None, || EntityId(1), &config));
    assert!(e.bullets.is_empty());
    assert_eq!(e.shoot_delay, 0);
}

#[test]
fn enemy_bullet_hurts_player_once_per_invulnerability() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::new(-100.0, 0.0), &config);
    let mut player = Player::new(EntityId(3), DVec2::new(50.0, 0.0), &config);
    let aim = DVec2::new(50.0, 0.0);
    e.bullets.push(Bullet::aimed(EntityId(4), DVec2::new(40.0, 0.0), aim, BulletOwner::Enemy, &config));
    e.bullets.push(Bullet::aimed(EntityId(5), DVec2::new(40.0, 0.0), aim, BulletOwner::Enemy, &config));

    assert!(e.advance_bullets(0.01, &[], Some(&mut player), &config));
    assert_eq!(player.lives, 4);
    // The second bullet found the player already invulnerable.
    assert_eq!(e.bullets.len(), 1);
    assert_eq!(e.bullets[0].id, EntityId(5));
}

#[test]
fn enemy_bullets_die_on_walls() {
    let config = GameConfig::default();
    let mut e = sentry(DVec2::new(-100.0, 100.0), &config);
    e.bullets.push(Bullet::aimed(
        EntityId(4),
        DVec2::new(-20.0, 100.0),
        DVec2::new(50.0, 100.0),
        BulletOwner::Enemy,
        &config,
    ));
    assert!(!e.advance_bullets(0.01, &[home_wall()], None, &config));
    assert!(e.bullets.is_empty());
}
