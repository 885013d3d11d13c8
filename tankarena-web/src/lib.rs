#[cfg(target_arch = "wasm32")]
use macroquad::miniquad;
use macroquad::prelude::*;
use tankarena_core::{
    ConfigError, MatchConfig, Outcome, PlayerInput, RenderKey, SceneAssets, TankId, TankTuning,
    TickClock, World,
};

use crate::draw::{Palette, TopDownView, draw_box, draw_shell};

mod draw;
mod registry;

pub use registry::Registry;

const FIXED_STEP_SECONDS: f32 = 1.0 / 60.0;
const PIXELS_PER_UNIT: f32 = 5.0;
const GROUND_COLOR: Color = Color::from_rgba(92, 104, 78, 255);
const HUD_FONT_SIZE: f32 = 24.0;
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_PATH: &str = "tankarena.json";

pub struct GameState {
    world: World<Registry>,
    palette: Palette,
    now_ms: f64,
}

impl GameState {
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        let assets = SceneAssets::default();
        let world = World::new(config, assets, Registry::new(), 0.0)?;
        Ok(Self {
            world,
            palette: Palette::for_scene(&assets),
            now_ms: 0.0,
        })
    }

    pub fn world(&self) -> &World<Registry> {
        &self.world
    }

    pub fn fixed_update(&mut self, input: &PlayerInput) {
        self.now_ms += f64::from(FIXED_STEP_SECONDS) * 1000.0;
        let clock = TickClock::new(self.now_ms, FIXED_STEP_SECONDS);
        let report = self.world.step(clock, input);
        for hit in &report.hits {
            log::debug!("tick {}: {:?} struck {:?}", self.world.tick(), hit.owner, hit.target);
        }
    }

    pub fn render(&self) {
        clear_background(GROUND_COLOR);

        let player = self.world.player().hull().position();
        let view = TopDownView {
            screen_center: vec2(screen_width() * 0.5, screen_height() * 0.5),
            focus: vec2(player.x, player.z),
            pixels_per_unit: PIXELS_PER_UNIT,
        };

        for (key, asset) in self.world.sink().instances() {
            let Some(body) = self.world.body(key) else {
                continue;
            };
            let color = self.palette.color(asset);
            match key {
                RenderKey::Projectile(_) => draw_shell(body, &view, color),
                RenderKey::Obstacle(_) | RenderKey::Tank(..) => draw_box(body, &view, color),
            }
        }

        self.draw_hud();
    }

    fn draw_hud(&self) {
        let state = self.world.match_state();
        let lines = [
            format!("health: {:.0}", self.world.player().health()),
            format!("score: {:.0}", state.score()),
            format!("respawns left: {}", state.respawn_budget()),
            format!(
                "pitch {:.1}  azimuth {:.1}",
                self.world.player().turret_pitch(),
                self.world.player().turret_yaw()
            ),
        ];
        for (row, line) in lines.iter().enumerate() {
            draw_text(line, 20.0, 32.0 + row as f32 * HUD_FONT_SIZE, HUD_FONT_SIZE, WHITE);
        }

        for id in self.world.tank_ids() {
            let TankId::Enemy(_) = id else {
                continue;
            };
            let Some(enemy) = self.world.tank(id) else {
                continue;
            };
            let position = enemy.hull().position();
            let player = self.world.player().hull().position();
            let anchor = vec2(screen_width() * 0.5, screen_height() * 0.5)
                + vec2(position.x - player.x, position.z - player.z) * PIXELS_PER_UNIT;
            draw_text(
                &format!("{:.0}", enemy.health()),
                anchor.x - 12.0,
                anchor.y - 18.0,
                18.0,
                WHITE,
            );
        }

        if let Some(outcome) = state.outcome() {
            let banner = match outcome {
                Outcome::Victory => "VICTORY - press Enter to play again",
                Outcome::Defeat => "DEFEAT - press Enter to play again",
            };
            let size = measure_text(banner, None, 40, 1.0);
            draw_text(
                banner,
                (screen_width() - size.width) * 0.5,
                screen_height() * 0.5,
                40.0,
                YELLOW,
            );
        }
    }
}

/// Maps held keys to one tick of player input. Turret keys move the aim by
/// the configured per-tick turret rates.
pub fn input_from_keys(held: impl Fn(KeyCode) -> bool, tuning: &TankTuning) -> PlayerInput {
    let any = |keys: &[KeyCode]| keys.iter().any(|key| held(*key));

    let mut turret_yaw_delta = 0.0;
    if any(&[KeyCode::E]) {
        turret_yaw_delta += tuning.turret_yaw_rate;
    }
    if any(&[KeyCode::Q]) {
        turret_yaw_delta -= tuning.turret_yaw_rate;
    }
    let mut turret_pitch_delta = 0.0;
    if any(&[KeyCode::R]) {
        turret_pitch_delta -= tuning.turret_pitch_rate;
    }
    if any(&[KeyCode::F]) {
        turret_pitch_delta += tuning.turret_pitch_rate;
    }

    PlayerInput {
        forward: any(&[KeyCode::W, KeyCode::Up]),
        backward: any(&[KeyCode::S, KeyCode::Down]),
        turn_left: any(&[KeyCode::A, KeyCode::Left]),
        turn_right: any(&[KeyCode::D, KeyCode::Right]),
        fire: any(&[KeyCode::Space]),
        turret_yaw_delta,
        turret_pitch_delta,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> MatchConfig {
    let Ok(text) = std::fs::read_to_string(CONFIG_PATH) else {
        return MatchConfig::default();
    };
    match MatchConfig::from_json_str(&text) {
        Ok(config) => {
            log::info!("loaded match config from {}", CONFIG_PATH);
            config
        }
        Err(err) => {
            log::warn!("ignoring {}: {}", CONFIG_PATH, err);
            MatchConfig::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> MatchConfig {
    MatchConfig::default()
}

pub async fn run() {
    install_panic_hook();
    init_logging();

    let config = load_config();
    let mut game = match GameState::new(config.clone()) {
        Ok(game) => game,
        Err(err) => {
            log::error!("cannot start match: {}", err);
            return;
        }
    };
    let mut accumulator = 0.0_f32;

    loop {
        let input = input_from_keys(is_key_down, &config.tank);
        accumulator += get_frame_time();
        while accumulator >= FIXED_STEP_SECONDS {
            game.fixed_update(&input);
            accumulator -= FIXED_STEP_SECONDS;
        }

        if game.world().match_state().is_terminated() && is_key_pressed(KeyCode::Enter) {
            if let Ok(fresh) = GameState::new(config.clone()) {
                game = fresh;
                accumulator = 0.0;
            }
        }

        game.render();

        next_frame().await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already installed");
    }
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {}

#[cfg(target_arch = "wasm32")]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if let Some(location) = info.location() {
            miniquad::error!("panic at {}:{}: {}", location.file(), location.line(), msg);
        } else {
            miniquad::error!("panic: {}", msg);
        }
    }));
}

#[cfg(not(target_arch = "wasm32"))]
fn install_panic_hook() {}
