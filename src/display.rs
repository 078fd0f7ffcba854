/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// world.  No game logic is performed; this module only translates state
/// into terminal commands.  Only what the torch (or night vision) lights is
/// drawn, so the dungeon stays dark outside the player's circle.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::DVec2;
use torch_dungeon::enemy::Enemy;
use torch_dungeon::entities::{Bonus, BonusKind, Bullet, BulletOwner};
use torch_dungeon::world::DrawList;
use torch_dungeon::World;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_FLOOR: Color = Color::DarkYellow;
const C_FLOOR_NIGHT: Color = Color::DarkGreen;
const C_WALL: Color = Color::Grey;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_REWARDS: Color = Color::Yellow;
const C_HUD_AMMO: Color = Color::Cyan;
const C_HUD_NIGHT: Color = Color::Green;
const C_PLAYER: Color = Color::White;
const C_ENEMY_PATROL: Color = Color::DarkRed;
const C_ENEMY_ALERT: Color = Color::Red;
const C_ENEMY_DEAD: Color = Color::DarkGrey;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_AID_KIT: Color = Color::Red;
const C_GOGGLES: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;
const C_DEBUG: Color = Color::White;

/// World units covered by one terminal cell.  Cells are roughly twice as
/// tall as they are wide.
const CELL_W: f64 = 10.0;
const CELL_H: f64 = 20.0;

/// Terminal-space projection centred on the camera.
struct Viewport {
    width: u16,
    height: u16,
    half_screen: DVec2,
}

impl Viewport {
    fn new(world: &World, width: u16, height: u16) -> Self {
        Viewport {
            width,
            height,
            half_screen: DVec2::new(
                (world.config.screen_width / 2.0).floor(),
                (world.config.screen_height / 2.0).floor(),
            ),
        }
    }

    /// Terminal cell for a world position, or `None` if off screen or on
    /// the HUD/hint rows.
    fn cell(&self, world: &World, position: DVec2) -> Option<(u16, u16)> {
        let camera = world.world_to_screen(position) - self.half_screen;
        let col = (camera.x / CELL_W + self.width as f64 / 2.0).floor();
        let row = (camera.y / CELL_H + self.height as f64 / 2.0).floor();
        let in_view = col >= 0.0
            && col < self.width as f64
            && row >= 1.0
            && row < self.height.saturating_sub(1) as f64;
        in_view.then_some((col as u16, row as u16))
    }

    /// World position at the centre of a terminal cell.
    fn world_at(&self, world: &World, col: u16, row: u16) -> DVec2 {
        let camera = DVec2::new(
            (col as f64 + 0.5 - self.width as f64 / 2.0) * CELL_W,
            (row as f64 + 0.5 - self.height as f64 / 2.0) * CELL_H,
        );
        camera - world.camera_offset()
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, world: &World, debug: bool) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let view = Viewport::new(world, width, height);
    let scene = world.draw_candidates();

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_floor_and_walls(out, world, &view, &scene)?;
    for bonus in &scene.bonuses {
        draw_bonus(out, world, &view, bonus)?;
    }
    for enemy in &scene.enemies {
        draw_enemy(out, world, &view, enemy)?;
    }
    for bullet in scene.bullets() {
        draw_bullet(out, world, &view, bullet)?;
    }

    draw_player(out, world, &view)?;
    draw_hud(out, world, width)?;
    draw_controls_hint(out, height)?;

    if debug {
        draw_debug(out, world, height)?;
    }
    if world.is_game_over() {
        draw_game_over(out, world, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Torch-lit floor ───────────────────────────────────────────────────────────

fn draw_floor_and_walls<W: Write>(
    out: &mut W,
    world: &World,
    view: &Viewport,
    scene: &DrawList<'_>,
) -> std::io::Result<()> {
    let night = scene.player.is_some_and(|p| p.has_night_vision());
    let floor = if night { C_FLOOR_NIGHT } else { C_FLOOR };
    let wall_rects: Vec<_> = scene.walls.iter().map(|w| w.collision_rect()).collect();

    for row in 1..view.height.saturating_sub(1) {
        for col in 0..view.width {
            let at = view.world_at(world, col, row);
            if !world.is_lit(at) {
                continue;
            }
            let is_wall = wall_rects.iter().any(|r| {
                at.x >= r.left() && at.x < r.right() && at.y >= r.top() && at.y < r.bottom()
            });
            out.queue(cursor::MoveTo(col, row))?;
            if is_wall {
                out.queue(style::SetForegroundColor(C_WALL))?;
                out.queue(Print("█"))?;
            } else {
                out.queue(style::SetForegroundColor(floor))?;
                out.queue(Print("·"))?;
            }
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, world: &World, view: &Viewport) -> std::io::Result<()> {
    let Some(player) = &world.player else {
        return Ok(());
    };
    if world.is_game_over() {
        return Ok(());
    }

    // Blink five times a second while invulnerable
    let blink = player.invulnerable_timer as f64 * 5.0 / world.config.framerate;
    if player.is_invulnerable() && blink.fract() >= 0.5 {
        return Ok(());
    }

    out.queue(style::SetForegroundColor(C_PLAYER))?;
    if let Some((col, row)) = view.cell(world, player.body.position) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("@"))?;
    }

    // Facing marker one body length ahead
    let ahead = player.body.position + player.facing() * world.config.player_size;
    if let Some((col, row)) = view.cell(world, ahead) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(facing_glyph(player.facing())))?;
    }
    Ok(())
}

fn facing_glyph(dir: DVec2) -> &'static str {
    if dir.x.abs() > dir.y.abs() * 2.0 {
        if dir.x > 0.0 { "→" } else { "←" }
    } else if dir.y.abs() > dir.x.abs() * 2.0 {
        if dir.y > 0.0 { "↓" } else { "↑" }
    } else {
        match (dir.x > 0.0, dir.y > 0.0) {
            (true, true) => "↘",
            (true, false) => "↗",
            (false, true) => "↙",
            (false, false) => "↖",
        }
    }
}

fn draw_enemy<W: Write>(out: &mut W, world: &World, view: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    if !world.is_lit(enemy.body.position) {
        return Ok(());
    }
    let Some((col, row)) = view.cell(world, enemy.body.position) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    if !enemy.is_alive() {
        out.queue(style::SetForegroundColor(C_ENEMY_DEAD))?;
        out.queue(Print("x"))?;
    } else if world.can_see_player(enemy) {
        out.queue(style::SetForegroundColor(C_ENEMY_ALERT))?;
        out.queue(Print("E"))?;
    } else {
        out.queue(style::SetForegroundColor(C_ENEMY_PATROL))?;
        out.queue(Print("e"))?;
    }
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, world: &World, view: &Viewport, bullet: &Bullet) -> std::io::Result<()> {
    if !world.is_lit(bullet.body.position) {
        return Ok(());
    }
    let Some((col, row)) = view.cell(world, bullet.body.position) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    match bullet.owner {
        BulletOwner::Player => out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?,
        BulletOwner::Enemy => out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?,
    };
    out.queue(Print("•"))?;
    Ok(())
}

/// Symbols:
///   +  (red)     AidKit: restores lives
///   ∞  (green)   Goggles: night vision
fn draw_bonus<W: Write>(out: &mut W, world: &World, view: &Viewport, bonus: &Bonus) -> std::io::Result<()> {
    if !bonus.is_active() || !world.is_lit(bonus.body.position) {
        return Ok(());
    }
    let Some((col, row)) = view.cell(world, bonus.body.position) else {
        return Ok(());
    };
    out.queue(cursor::MoveTo(col, row))?;
    match bonus.kind {
        BonusKind::AidKit => {
            out.queue(style::SetForegroundColor(C_AID_KIT))?;
            out.queue(Print("+"))?;
        }
        BonusKind::Goggles => {
            out.queue(style::SetForegroundColor(C_GOGGLES))?;
            out.queue(Print("∞"))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, world: &World, width: u16) -> std::io::Result<()> {
    let Some(player) = &world.player else {
        return Ok(());
    };

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!("Lives:{:<6}", "♥".repeat(player.lives as usize))))?;

    out.queue(style::SetForegroundColor(C_HUD_REWARDS))?;
    out.queue(Print(format!("  Rewards:{:>5}$", player.kills * 10)))?;

    out.queue(style::SetForegroundColor(C_HUD_AMMO))?;
    out.queue(Print(format!("  Bullets:{}", "I".repeat(player.bullets_left as usize))))?;

    if player.has_night_vision() {
        let secs = (player.night_vision_timer as f64 / world.config.framerate).ceil();
        let tag = format!("Night Vision: {secs:>2}s");
        let x = width.saturating_sub(tag.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(x, 0))?;
        out.queue(style::SetForegroundColor(C_HUD_NIGHT))?;
        out.queue(Print(tag))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("W S / ↑ ↓ : Walk   A D / ← → : Turn   SPACE : Shoot   F3 : Debug   Q : Quit"))?;
    Ok(())
}

// ── Debug overlay ─────────────────────────────────────────────────────────────

fn draw_debug<W: Write>(out: &mut W, world: &World, height: u16) -> std::io::Result<()> {
    let Some(player) = &world.player else {
        return Ok(());
    };
    let chunk = world.chunk_of(player.body.position);
    let lines = [
        format!(
            "Player position: ({:.2}, {:.2})  chunk ({}, {})  rotation {:.1}°",
            player.body.position.x, player.body.position.y, chunk.x, chunk.y, player.rotation
        ),
        format!(
            "Walls {}  Enemies {}  Bonuses {}  Chunks {}",
            world.walls.len(),
            world.enemies.len(),
            world.bonuses.len(),
            world.chunks.len()
        ),
        format!("Collision debug: {:?}", player.last_hits),
    ];
    for (i, line) in lines.iter().enumerate() {
        let row = height.saturating_sub(2 + (lines.len() - 1 - i) as u16);
        out.queue(cursor::MoveTo(1, row))?;
        out.queue(style::SetForegroundColor(C_DEBUG))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, world: &World, width: u16, height: u16) -> std::io::Result<()> {
    let rewards = world.player.as_ref().map_or(0, |p| p.kills * 10);
    let rewards_line = format!("Rewards: {rewards:>5}$");

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (rewards_line.as_str(), Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
