use macroquad::file::load_string;
use macroquad::miniquad;
use macroquad::prelude::*;
use strikeforge_core::{ConfigError, FrameOutcome, GameConfig, PoseAdapter, PoseSample, TargetEngine};

use crate::mouse_pose::MousePose;
use crate::target_draw::{TargetDrawConfig, draw_overlay, draw_target, draw_wrist_markers};
use crate::viewport::FieldViewport;

pub mod mouse_pose;
pub mod target_draw;
pub mod viewport;

const FIELD_WIDTH: f64 = 640.0;
const FIELD_HEIGHT: f64 = 480.0;
const CONFIG_PATH: &str = "assets/game.json";
const FIXED_STEP_SECONDS: f32 = 1.0 / 60.0;
// Caps catch-up work after a stall (tab switch, window drag).
const MAX_STEPS_PER_FRAME: u32 = 8;
const HUD_FONT_SIZE: f32 = 24.0;

fn log_ui_action(label: &str) {
    #[cfg(target_arch = "wasm32")]
    miniquad::info!("{}", label);
    #[cfg(not(target_arch = "wasm32"))]
    tracing::info!("{}", label);
}

fn log_ui_warning(message: &str) {
    #[cfg(target_arch = "wasm32")]
    miniquad::warn!("{}", message);
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("{}", message);
}

pub struct GameState {
    engine: TargetEngine,
    adapter: PoseAdapter,
    mouse_pose: MousePose,
    samples: Vec<PoseSample>,
    target_draw: TargetDrawConfig,
    viewport: FieldViewport,
    last_outcome: FrameOutcome,
    fps: f32,
    fps_frame_count: u32,
    fps_last_update_time: f64,
}

impl GameState {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        let engine = TargetEngine::with_seed(FIELD_WIDTH, FIELD_HEIGHT, config, seed)?;
        let adapter = PoseAdapter::from_config(engine.field(), engine.config());
        let viewport = FieldViewport::fit(engine.field(), screen_width(), screen_height());

        Ok(Self {
            engine,
            adapter,
            mouse_pose: MousePose::new(),
            samples: vec![PoseSample::default()],
            target_draw: TargetDrawConfig::default(),
            viewport,
            last_outcome: FrameOutcome::default(),
            fps: 0.0,
            fps_frame_count: 0,
            fps_last_update_time: get_time(),
        })
    }

    fn update_viewport(&mut self) {
        self.viewport = FieldViewport::fit(self.engine.field(), screen_width(), screen_height());
    }

    fn handle_input(&mut self) {
        if self.mouse_pose.poll(&self.viewport) {
            let raw = self.mouse_pose.raw_pose(self.engine.field());
            self.samples = vec![self.adapter.adapt(&raw)];
        }
    }

    fn fixed_update(&mut self) {
        match self.engine.advance(FIXED_STEP_SECONDS as f64, &self.samples) {
            Ok(outcome) => {
                if let Some(target) = outcome.spawned {
                    log_ui_action(&format!(
                        "target at {:.0}, {:.0} wants the {:?} hand",
                        target.position.x, target.position.y, target.required_hand
                    ));
                }
                if outcome.destroyed {
                    log_ui_action(&format!(
                        "target destroyed ({} total)",
                        self.engine.destroyed_count()
                    ));
                }
                self.last_outcome = outcome;
            }
            Err(err) => log_ui_warning(&format!("skipped simulation step: {}", err)),
        }
    }

    fn update_fps_if_due(&mut self) {
        let now = get_time();
        self.fps_frame_count += 1;
        let elapsed = now - self.fps_last_update_time;
        if elapsed >= 1.0 {
            self.fps = self.fps_frame_count as f32 / elapsed as f32;
            self.fps_frame_count = 0;
            self.fps_last_update_time = now;
        }
    }

    fn render(&self) {
        clear_background(BLACK);

        let size = self.viewport.size_on_screen();
        draw_rectangle_lines(
            self.viewport.origin.x,
            self.viewport.origin.y,
            size.x,
            size.y,
            1.0,
            WHITE,
        );

        if let Some(render) = self.engine.render_state() {
            draw_target(
                &render,
                self.engine.field().unit(),
                &self.viewport,
                &self.target_draw,
            );
        }

        let raw = self.mouse_pose.raw_pose(self.engine.field());
        draw_overlay(&self.adapter.overlay(&raw), &self.viewport, &self.target_draw);
        for sample in &self.samples {
            draw_wrist_markers(sample, &self.viewport, &self.target_draw);
        }

        draw_text(
            &format!("destroyed: {}", self.engine.destroyed_count()),
            20.0,
            40.0,
            HUD_FONT_SIZE,
            WHITE,
        );
        let contact = if self.last_outcome.hit { "hit" } else { "--" };
        draw_text(&format!("contact: {}", contact), 20.0, 64.0, HUD_FONT_SIZE, WHITE);
        draw_text(&format!("fps: {:.1}", self.fps), 20.0, 88.0, HUD_FONT_SIZE, WHITE);
        draw_text(
            "LMB: left wrist  RMB: right wrist  C: clear",
            20.0,
            screen_height() - 20.0,
            HUD_FONT_SIZE,
            GRAY,
        );
    }
}

/// Parses the loaded config asset, describing why it cannot be used otherwise.
fn config_from_asset<E: std::fmt::Display>(loaded: Result<String, E>) -> Result<GameConfig, String> {
    let json = loaded.map_err(|err| format!("cannot read {}: {}", CONFIG_PATH, err))?;
    GameConfig::from_json_str(&json).map_err(|err| format!("cannot use {}: {}", CONFIG_PATH, err))
}

async fn load_config() -> GameConfig {
    config_from_asset(load_string(CONFIG_PATH).await).unwrap_or_else(|reason| {
        log_ui_warning(&format!("{}; using default game config", reason));
        GameConfig::default()
    })
}

fn spawn_seed() -> u64 {
    (miniquad::date::now() * 1000.0) as u64
}

pub async fn run() {
    install_panic_hook();
    install_logging();

    let config = load_config().await;
    let mut game = match GameState::new(config, spawn_seed()) {
        Ok(game) => game,
        Err(err) => {
            log_ui_action(&format!("cannot start game: {}", err));
            return;
        }
    };
    let mut accumulator = 0.0_f32;

    loop {
        game.update_viewport();
        game.handle_input();

        // Consume real elapsed time in fixed-size simulation steps.
        accumulator += get_frame_time();
        let mut steps = 0;
        while accumulator >= FIXED_STEP_SECONDS && steps < MAX_STEPS_PER_FRAME {
            game.fixed_update();
            accumulator -= FIXED_STEP_SECONDS;
            steps += 1;
        }
        if accumulator >= FIXED_STEP_SECONDS {
            accumulator = 0.0;
        }

        game.update_fps_if_due();
        game.render();

        next_frame().await;
    }
}

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

#[cfg(target_arch = "wasm32")]
fn install_logging() {}

#[cfg(not(target_arch = "wasm32"))]
fn install_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
