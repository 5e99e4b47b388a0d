//! Scene tessellation
//!
//! Every shape becomes a list of colored triangles in playfield pixels
//! (origin top-left, y down). Nothing here touches simulation state.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::{Vertex, colors};
use crate::sim::{GameState, Obstacle, PowerUp, PowerUpKind, ThemeBlend};

const CORNER_SEGMENTS: u32 = 6;
const ICON_SEGMENTS: u32 = 24;
const SHIELD_SEGMENTS: u32 = 48;

const CORNER_RADIUS: f32 = 8.0;
const SHADOW_OFFSET_Y: f32 = 4.0;
/// Rough stand-in for a blurred shadow edge
const SHADOW_SPREAD: f32 = 3.0;
const SHIELD_GAP: f32 = 8.0;
const SHIELD_LINE_WIDTH: f32 = 3.0;

fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

fn push_triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Axis-aligned rectangle with a top-to-bottom gradient
pub fn gradient_rect(min: Vec2, max: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
    ]
}

pub fn rect(min: Vec2, max: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(min, max, color, color)
}

/// Perimeter of a rounded rectangle, clockwise from the top-left corner
fn rounded_rect_outline(pos: Vec2, size: Vec2, radius: f32) -> Vec<Vec2> {
    let r = radius.min(size.x * 0.5).min(size.y * 0.5).max(0.0);
    let corners = [
        (Vec2::new(pos.x + r, pos.y + r), PI),
        (Vec2::new(pos.x + size.x - r, pos.y + r), PI + FRAC_PI_2),
        (Vec2::new(pos.x + size.x - r, pos.y + size.y - r), 0.0),
        (Vec2::new(pos.x + r, pos.y + size.y - r), FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(corners.len() * (CORNER_SEGMENTS as usize + 1));
    for (center, start) in corners {
        for i in 0..=CORNER_SEGMENTS {
            let theta = start + (i as f32 / CORNER_SEGMENTS as f32) * FRAC_PI_2;
            points.push(center + r * Vec2::new(theta.cos(), theta.sin()));
        }
    }
    points
}

/// Rounded rectangle with a top-to-bottom gradient, fanned from its center
pub fn rounded_rect_gradient(
    pos: Vec2,
    size: Vec2,
    radius: f32,
    top: [f32; 4],
    bottom: [f32; 4],
) -> Vec<Vertex> {
    let outline = rounded_rect_outline(pos, size, radius);
    let center = pos + size * 0.5;
    let color_at = |p: Vec2| {
        let t = if size.y > 0.0 {
            ((p.y - pos.y) / size.y).clamp(0.0, 1.0)
        } else {
            0.0
        };
        lerp_color(top, bottom, t)
    };

    let mut vertices = Vec::with_capacity(outline.len() * 3);
    for i in 0..outline.len() {
        let a = outline[i];
        let b = outline[(i + 1) % outline.len()];
        vertices.push(Vertex::new(center.x, center.y, color_at(center)));
        vertices.push(Vertex::new(a.x, a.y, color_at(a)));
        vertices.push(Vertex::new(b.x, b.y, color_at(b)));
    }
    vertices
}

pub fn rounded_rect(pos: Vec2, size: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    rounded_rect_gradient(pos, size, radius, color, color)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        let inner1 = center + dir1 * inner_radius;
        let outer1 = center + dir1 * outer_radius;
        let inner2 = center + dir2 * inner_radius;
        let outer2 = center + dir2 * outer_radius;

        push_triangle(&mut vertices, inner1, outer1, outer2, color);
        push_triangle(&mut vertices, inner1, outer2, inner2, color);
    }

    vertices
}

/// Rounded block with a drop shadow
pub fn obstacle(obstacle: &Obstacle) -> Vec<Vertex> {
    let shadow_pos = obstacle.pos + Vec2::new(-SHADOW_SPREAD, SHADOW_OFFSET_Y - SHADOW_SPREAD);
    let shadow_size = obstacle.size + Vec2::splat(SHADOW_SPREAD * 2.0);

    let mut vertices = rounded_rect(
        shadow_pos,
        shadow_size,
        CORNER_RADIUS + SHADOW_SPREAD,
        colors::SHADOW,
    );
    vertices.extend(rounded_rect(
        obstacle.pos,
        obstacle.size,
        CORNER_RADIUS,
        obstacle.color.to_rgba(1.0),
    ));
    vertices
}

/// Round badge with a glyph for the power-up's kind
pub fn power_up_icon(power_up: &PowerUp) -> Vec<Vertex> {
    let center = power_up.pos + power_up.size * 0.5;
    let radius = power_up.size.x.min(power_up.size.y) * 0.5;
    let s = radius * 0.6;
    let glyph = colors::ICON_GLYPH;

    let badge = match power_up.kind {
        PowerUpKind::SpeedBoost => colors::SPEED_BOOST,
        PowerUpKind::Shield => colors::SHIELD,
        PowerUpKind::SlowMotion => colors::SLOW_MOTION,
    };
    let mut vertices = circle(center, radius, badge.to_rgba(1.0), ICON_SEGMENTS);

    let at = |x: f32, y: f32| center + Vec2::new(x, y) * s;
    match power_up.kind {
        PowerUpKind::SpeedBoost => {
            // Lightning bolt
            push_triangle(&mut vertices, at(0.2, -1.0), at(-0.5, 0.15), at(0.1, 0.15), glyph);
            push_triangle(&mut vertices, at(-0.1, -0.15), at(0.5, -0.15), at(-0.2, 1.0), glyph);
        }
        PowerUpKind::Shield => {
            // Crest
            vertices.extend(rect(at(-0.55, -0.7), at(0.55, 0.1), glyph));
            push_triangle(&mut vertices, at(-0.55, 0.1), at(0.55, 0.1), at(0.0, 0.85), glyph);
        }
        PowerUpKind::SlowMotion => {
            // Clock face with hands at twelve and three
            vertices.extend(ring(center, s * 0.75, s * 0.95, glyph, ICON_SEGMENTS));
            let hand = s * 0.08;
            vertices.extend(rect(
                center + Vec2::new(-hand, -s * 0.6),
                center + Vec2::new(hand, hand),
                glyph,
            ));
            vertices.extend(rect(
                center + Vec2::new(-hand, -hand),
                center + Vec2::new(s * 0.45, hand),
                glyph,
            ));
        }
    }

    vertices
}

/// Player body, highlight strip and, when shielded, the shield ring
pub fn player(state: &GameState) -> Vec<Vertex> {
    let player = &state.player;
    let mut vertices = Vec::new();

    if state.has_shield() {
        let radius = player.size.x * 0.5 + SHIELD_GAP;
        vertices.extend(ring(
            player.center(),
            radius - SHIELD_LINE_WIDTH * 0.5,
            radius + SHIELD_LINE_WIDTH * 0.5,
            colors::SHIELD_RING.to_rgba(colors::SHIELD_RING_ALPHA),
            SHIELD_SEGMENTS,
        ));
    }

    vertices.extend(rounded_rect_gradient(
        player.pos,
        player.size,
        CORNER_RADIUS,
        colors::PLAYER_TOP.to_rgba(1.0),
        colors::PLAYER_BOTTOM.to_rgba(1.0),
    ));
    vertices.extend(rounded_rect(
        player.pos + Vec2::splat(4.0),
        Vec2::new(player.size.x - 8.0, 8.0),
        4.0,
        colors::PLAYER_HIGHLIGHT.to_rgba(colors::PLAYER_HIGHLIGHT_ALPHA),
    ));

    vertices
}

/// Tessellate one frame: background, obstacles, power-ups, player
pub fn build_scene(state: &GameState, blend: ThemeBlend) -> Vec<Vertex> {
    let [top, bottom] = state.background(blend);
    let mut vertices = gradient_rect(
        Vec2::ZERO,
        Vec2::new(state.width, state.height),
        top.to_rgba(1.0),
        bottom.to_rgba(1.0),
    );

    for o in &state.obstacles {
        vertices.extend(obstacle(o));
    }

    for p in state.power_ups.iter().filter(|p| !p.collected) {
        vertices.extend(power_up_icon(p));
    }

    vertices.extend(player(state));
    vertices
}
