//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-indexed physics only, no wall-clock time
//! - Seeded RNG only
//! - No rendering, audio, or I/O in the update path
//!
//! [`env::FlappyEnv`] owns one episode for a single externally-driven actor;
//! [`batch::BatchEvaluator`] runs a population of controller-driven actors
//! against one shared pipe timeline. Both are built from the same leaf
//! modules and produce identical physics.

pub mod batch;
pub mod collision;
pub mod env;
pub mod geom;
pub mod mask;
pub mod physics;
pub mod pipes;
pub mod state;

pub use batch::{BatchEvaluator, CancelToken, Controller, ControlView, GenerationOutcome};
pub use collision::{CrashKind, check_crash, pixel_collision};
pub use env::{EnvError, FlappyEnv};
pub use geom::Rect;
pub use mask::{Mask, SpriteSet};
pub use pipes::{random_pipe, starting_pipes};
pub use state::{Action, GameEvent, Observation, PipePair, Player};
