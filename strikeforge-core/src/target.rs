use crate::config::{ConfigError, GameConfig};
use crate::geometry::{Hand, PlayField, Position, Side, SquareRegion};
use crate::pose::PoseSample;
use crate::spawn::SpawnRandom;
use fastrand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Position,
    pub required_hand: Hand,
    health: f64,
}

impl Target {
    pub fn health(&self) -> f64 {
        self.health
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetState {
    NoTarget,
    Active(Target),
}

/// Snapshot handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub position: Position,
    pub required_hand: Hand,
    /// Remaining health in `[0, 1]`.
    pub health_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOutcome {
    pub spawned: Option<Target>,
    pub hit: bool,
    pub destroyed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AdvanceError {
    #[error("frame delta must not be negative (got {0})")]
    NegativeDelta(f64),
    #[error("frame delta must be finite (got {0})")]
    NonFiniteDelta(f64),
}

/// Owns the single active target and steps it once per frame.
pub struct TargetEngine<R: SpawnRandom = Rng> {
    field: PlayField,
    config: GameConfig,
    rng: R,
    state: TargetState,
    destroyed_count: u64,
}

impl TargetEngine<Rng> {
    pub fn with_seed(
        width: f64,
        height: f64,
        config: GameConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(width, height, config, Rng::with_seed(seed))
    }
}

impl<R: SpawnRandom> TargetEngine<R> {
    pub fn new(width: f64, height: f64, config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "play field must have a positive size (got {width}x{height})"
            )));
        }

        Ok(Self {
            field: config.play_field(width, height),
            config,
            rng,
            state: TargetState::NoTarget,
            destroyed_count: 0,
        })
    }

    pub fn field(&self) -> &PlayField {
        &self.field
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> TargetState {
        self.state
    }

    pub fn target(&self) -> Option<&Target> {
        match &self.state {
            TargetState::Active(target) => Some(target),
            TargetState::NoTarget => None,
        }
    }

    pub fn destroyed_count(&self) -> u64 {
        self.destroyed_count
    }

    /// Drops the current target; the next frame spawns a fresh one.
    pub fn reset(&mut self) {
        self.state = TargetState::NoTarget;
    }

    pub fn advance(
        &mut self,
        delta_seconds: f64,
        samples: &[PoseSample],
    ) -> Result<FrameOutcome, AdvanceError> {
        check_delta(delta_seconds).inspect_err(|err| warn!(%err, "rejected frame"))?;

        let mut outcome = FrameOutcome::default();
        let current = self.state;
        let mut target = match current {
            TargetState::Active(target) => target,
            TargetState::NoTarget => {
                let target = self.spawn_target();
                outcome.spawned = Some(target);
                target
            }
        };

        outcome.hit = self.is_struck(&target, samples);

        if outcome.hit {
            target.health -= delta_seconds;
            outcome.destroyed = target.health <= 0.0;
        } else {
            target.health =
                (target.health + delta_seconds * self.config.regen_rate).min(self.config.max_health);
        }

        self.state = if outcome.destroyed {
            self.destroyed_count += 1;
            info!(
                x = target.position.x,
                y = target.position.y,
                destroyed = self.destroyed_count,
                "target destroyed"
            );
            TargetState::NoTarget
        } else {
            TargetState::Active(target)
        };

        Ok(outcome)
    }

    pub fn render_state(&self) -> Option<RenderState> {
        self.target().map(|target| RenderState {
            position: target.position,
            required_hand: target.required_hand,
            health_fraction: (target.health / self.config.max_health).clamp(0.0, 1.0),
        })
    }

    /// Square of side `unit` centred on the target.
    pub fn hit_region(&self, target: &Target) -> SquareRegion {
        SquareRegion::new(target.position, self.field.unit())
    }

    pub fn is_touching(&self, point: Position) -> bool {
        self.target()
            .is_some_and(|target| self.hit_region(target).contains(point))
    }

    fn is_struck(&self, target: &Target, samples: &[PoseSample]) -> bool {
        let region = self.hit_region(target);
        samples
            .iter()
            .filter_map(|sample| sample.wrist(target.required_hand).position())
            .any(|point| region.contains(point))
    }

    fn spawn_target(&mut self) -> Target {
        let side = self.rng.pick_side();
        let rows = &self.config.rows;
        let row = rows[self.rng.pick_row(rows.len()) % rows.len()];

        let target = Target {
            position: Position::new(
                self.field
                    .column_x(side, self.config.horizontal_offset_units),
                self.field.row_y(row),
            ),
            required_hand: side.striking_hand(),
            health: self.config.max_health,
        };

        debug!(
            ?side,
            row,
            x = target.position.x,
            y = target.position.y,
            hand = ?target.required_hand,
            "spawned target"
        );
        target
    }
}

fn check_delta(delta_seconds: f64) -> Result<(), AdvanceError> {
    if !delta_seconds.is_finite() {
        return Err(AdvanceError::NonFiniteDelta(delta_seconds));
    }
    if delta_seconds < 0.0 {
        return Err(AdvanceError::NegativeDelta(delta_seconds));
    }
    Ok(())
}
