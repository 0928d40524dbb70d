pub mod config;
pub mod geometry;
pub mod pose;
pub mod spawn;
pub mod target;

pub use config::{ConfigError, GameConfig};
pub use geometry::{Hand, PlayField, Position, Side, SquareRegion};
pub use pose::{
    Keypoint, KeypointIndex, PoseAdapter, PoseOverlay, PoseSample, RawPose, WristSample, mirror_x,
};
pub use spawn::SpawnRandom;
pub use target::{AdvanceError, FrameOutcome, RenderState, Target, TargetEngine, TargetState};
