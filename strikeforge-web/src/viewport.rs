use macroquad::prelude::{Vec2, vec2};
use strikeforge_core::{PlayField, Position};

/// Fits the play field into the window without distorting it, centring the
/// leftover space on the short axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldViewport {
    pub origin: Vec2,
    pub scale: f32,
    pub field_size: Vec2,
}

impl FieldViewport {
    pub fn fit(field: &PlayField, screen_width: f32, screen_height: f32) -> Self {
        let field_size = vec2(field.width as f32, field.height as f32);
        let scale = (screen_width / field_size.x)
            .min(screen_height / field_size.y)
            .max(f32::EPSILON);
        let content = field_size * scale;
        let origin = vec2(
            (screen_width - content.x) * 0.5,
            (screen_height - content.y) * 0.5,
        );
        Self {
            origin,
            scale,
            field_size,
        }
    }

    pub fn size_on_screen(&self) -> Vec2 {
        self.field_size * self.scale
    }

    pub fn to_screen(&self, position: Position) -> Vec2 {
        self.origin + vec2(position.x as f32, position.y as f32) * self.scale
    }

    pub fn length_to_screen(&self, length: f64) -> f32 {
        length as f32 * self.scale
    }

    pub fn to_field(&self, screen: Vec2) -> Position {
        let local = (screen - self.origin) / self.scale;
        Position::new(local.x as f64, local.y as f64)
    }

    pub fn contains_screen(&self, screen: Vec2) -> bool {
        let local = screen - self.origin;
        let size = self.size_on_screen();
        local.x >= 0.0 && local.y >= 0.0 && local.x <= size.x && local.y <= size.y
    }
}
