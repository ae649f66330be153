//! Scene building: game state to a triangle list in screen coordinates

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::platform::TouchLayout;
use crate::sim::GameState;

const TERRAIN_WIDTH: f32 = 2.0;
const PAD_THICKNESS: f32 = 5.0;
const PARTICLE_RADIUS: f32 = 2.0;
const PARTICLE_SEGMENTS: u32 = 6;
const BUTTON_OUTLINE: f32 = 2.0;
const BUTTON_ALPHA: f32 = 0.5;

fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha]
}

/// Build all vertices for one frame.
///
/// Touch buttons are drawn only when `layout` is given; the restart button
/// appears once the flight is over.
pub fn build_scene(state: &GameState, layout: Option<&TouchLayout>) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    // Terrain
    vertices.extend(shapes::polyline(
        &state.terrain.points,
        TERRAIN_WIDTH,
        colors::TERRAIN,
    ));

    if let Some(pad) = &state.terrain.landing_pad {
        vertices.extend(shapes::rect(
            pad.x_start,
            pad.y,
            pad.width(),
            PAD_THICKNESS,
            colors::PAD,
        ));
    }

    // Exhaust behind the hull
    let fade = state.tuning.particle_fade();
    for particle in &state.rocket.particles {
        let [r, g, b] = colors::PARTICLE;
        vertices.extend(shapes::circle(
            particle.pos,
            PARTICLE_RADIUS,
            [r, g, b, particle.alpha(fade)],
            PARTICLE_SEGMENTS,
        ));
    }

    let hull_color = if state.rocket.crashed() {
        colors::ROCKET_CRASHED
    } else {
        colors::ROCKET
    };
    vertices.extend(shapes::triangle(state.rocket.hull(), hull_color));

    if let Some(layout) = layout {
        for button in layout.flight_buttons() {
            vertices.extend(shapes::rect_outline(
                button.x,
                button.y,
                button.width,
                button.height,
                BUTTON_OUTLINE,
                with_alpha(colors::BUTTON, BUTTON_ALPHA),
            ));
        }
        if !state.rocket.is_flying() {
            let r = layout.restart;
            vertices.extend(shapes::rect(
                r.x,
                r.y,
                r.width,
                r.height,
                with_alpha(colors::RESTART, BUTTON_ALPHA),
            ));
        }
    }

    vertices
}

/// Screen point to normalized device coordinates for a playfield of `size`
pub fn screen_to_ndc(p: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(p.x / size.x * 2.0 - 1.0, 1.0 - p.y / size.y * 2.0)
}
