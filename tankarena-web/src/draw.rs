use macroquad::prelude::*;
use tankarena_core::{AssetHandle, RigidBody, SceneAssets};

const SHELL_MIN_RADIUS_PX: f32 = 2.0;
const SHELL_HEIGHT_SCALE: f32 = 0.4;

/// Looks straight down the y axis. World x goes right, world z goes down the
/// screen, so a tank at yaw 0 points up.
#[derive(Debug, Clone, Copy)]
pub struct TopDownView {
    pub screen_center: Vec2,
    pub focus: Vec2,
    pub pixels_per_unit: f32,
}

impl TopDownView {
    pub fn to_screen(&self, x: f32, z: f32) -> Vec2 {
        self.screen_center + (vec2(x, z) - self.focus) * self.pixels_per_unit
    }
}

/// Footprint of a box on the ground plane, as four (x, z) corners in winding
/// order.
pub fn footprint(body: &RigidBody) -> [Vec2; 4] {
    let position = body.position();
    let [right, _, back] = body.scaled_axes();
    let center = vec2(position.x, position.z);
    let right = vec2(right.x, right.z);
    let back = vec2(back.x, back.z);
    [
        center + right + back,
        center + right - back,
        center - right - back,
        center - right + back,
    ]
}

#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<(AssetHandle, Color)>,
    fallback: Color,
}

impl Palette {
    pub fn for_scene(assets: &SceneAssets) -> Self {
        Self {
            entries: vec![
                (assets.player.hull, Color::from_rgba(58, 110, 64, 255)),
                (assets.player.turret, Color::from_rgba(84, 150, 92, 255)),
                (assets.player.cannon, Color::from_rgba(30, 40, 30, 255)),
                (assets.enemy.hull, Color::from_rgba(140, 52, 44, 255)),
                (assets.enemy.turret, Color::from_rgba(184, 82, 66, 255)),
                (assets.enemy.cannon, Color::from_rgba(50, 30, 28, 255)),
                (assets.obstacle, Color::from_rgba(150, 116, 70, 255)),
                (assets.projectile, Color::from_rgba(250, 230, 140, 255)),
            ],
            fallback: MAGENTA,
        }
    }

    pub fn color(&self, asset: AssetHandle) -> Color {
        self.entries
            .iter()
            .find(|(handle, _)| *handle == asset)
            .map(|(_, color)| *color)
            .unwrap_or(self.fallback)
    }
}

pub fn draw_box(body: &RigidBody, view: &TopDownView, color: Color) {
    let [a, b, c, d] = footprint(body).map(|corner| view.to_screen(corner.x, corner.y));
    draw_triangle(a, b, c, color);
    draw_triangle(a, c, d, color);
    draw_line(a.x, a.y, b.x, b.y, 1.0, BLACK);
    draw_line(b.x, b.y, c.x, c.y, 1.0, BLACK);
    draw_line(c.x, c.y, d.x, d.y, 1.0, BLACK);
    draw_line(d.x, d.y, a.x, a.y, 1.0, BLACK);
}

/// Shells grow with altitude so arcs read from above.
pub fn draw_shell(body: &RigidBody, view: &TopDownView, color: Color) {
    let position = body.position();
    let center = view.to_screen(position.x, position.z);
    let radius = (body.half_extents().x * view.pixels_per_unit * 2.0).max(SHELL_MIN_RADIUS_PX)
        + position.y.max(0.0) * SHELL_HEIGHT_SCALE;
    draw_circle(center.x, center.y, radius, color);
}
