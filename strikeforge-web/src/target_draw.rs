use macroquad::prelude::*;
use std::f32::consts::{FRAC_PI_2, TAU};
use strikeforge_core::{Hand, PoseOverlay, PoseSample, RenderState};

use crate::viewport::FieldViewport;

#[derive(Debug, Clone)]
pub struct TargetDrawConfig {
    pub pie_segments: usize,        // triangles used for a full health pie
    pub marker_size: f32,           // wrist marker edge, field pixels
    pub label_offset: f32,          // wrist label height above the wrist, field pixels
    pub label_font_size: f32,
    pub skeleton_thickness: f32,
    pub backdrop_color: Color,
    pub health_color: Color,
    pub left_color: Color,
    pub right_color: Color,
    pub label_color: Color,
    pub skeleton_color: Color,
}

impl Default for TargetDrawConfig {
    fn default() -> Self {
        Self {
            pie_segments: 48,
            marker_size: 20.0,
            label_offset: 30.0,
            label_font_size: 24.0,
            skeleton_thickness: 3.0,
            backdrop_color: Color::new(100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0, 0.3),
            health_color: Color::new(1.0, 0.0, 0.0, 0.7),
            left_color: BLUE,
            right_color: GREEN,
            label_color: YELLOW,
            skeleton_color: Color::from_rgba(0, 255, 0, 255),
        }
    }
}

impl TargetDrawConfig {
    pub fn hand_color(&self, hand: Hand) -> Color {
        match hand {
            Hand::Left => self.left_color,
            Hand::Right => self.right_color,
        }
    }
}

/// Outline of the remaining-health wedge, starting at 12 o'clock and sweeping
/// clockwise on screen. Empty when no health is left.
pub fn health_pie_points(center: Vec2, radius: f32, fraction: f32, max_segments: usize) -> Vec<Vec2> {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction <= 0.0 || max_segments == 0 {
        return Vec::new();
    }

    let segments = ((max_segments as f32 * fraction).ceil() as usize).max(1);
    let sweep = TAU * fraction;
    (0..=segments)
        .map(|i| {
            let angle = -FRAC_PI_2 + sweep * i as f32 / segments as f32;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

pub fn draw_target(
    render: &RenderState,
    unit: f64,
    viewport: &FieldViewport,
    config: &TargetDrawConfig,
) {
    let center = viewport.to_screen(render.position);
    let radius = viewport.length_to_screen(unit / 2.0);

    draw_circle(center.x, center.y, radius, config.backdrop_color);

    let rim = health_pie_points(
        center,
        radius,
        render.health_fraction as f32,
        config.pie_segments,
    );
    for edge in rim.windows(2) {
        draw_triangle(center, edge[0], edge[1], config.health_color);
    }

    // Tells the player which fist the target wants.
    let label = render.required_hand.label();
    let font_size = radius.max(8.0);
    let dims = measure_text(label, None, font_size as u16, 1.0);
    draw_text(
        label,
        center.x - dims.width * 0.5,
        center.y + dims.offset_y * 0.5,
        font_size,
        config.hand_color(render.required_hand),
    );
}

pub fn draw_wrist_markers(sample: &PoseSample, viewport: &FieldViewport, config: &TargetDrawConfig) {
    let size = config.marker_size * viewport.scale;
    for hand in Hand::BOTH {
        let Some(position) = sample.wrist(hand).position() else {
            continue;
        };
        let center = viewport.to_screen(position);
        draw_rectangle(
            center.x - size * 0.5,
            center.y - size * 0.5,
            size,
            size,
            config.hand_color(hand),
        );
    }
}

pub fn draw_overlay(overlay: &PoseOverlay, viewport: &FieldViewport, config: &TargetDrawConfig) {
    for (start, end) in &overlay.segments {
        let a = viewport.to_screen(*start);
        let b = viewport.to_screen(*end);
        draw_line(a.x, a.y, b.x, b.y, config.skeleton_thickness, config.skeleton_color);
    }

    for (hand, position) in &overlay.wrists {
        let anchor = viewport.to_screen(*position) - vec2(0.0, config.label_offset * viewport.scale);
        let label = hand.label();
        let dims = measure_text(label, None, config.label_font_size as u16, 1.0);
        draw_text(
            label,
            anchor.x - dims.width * 0.5,
            anchor.y + dims.offset_y * 0.5,
            config.label_font_size,
            config.label_color,
        );
    }
}
