//! flappy-sim - a deterministic flappy-bird environment
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, pipes, collision, episode
//!   state machine, batch generation loop)
//! - `config`: Named tuning parameters with the classic defaults
//!
//! The crate is headless by design. Rendering, audio, and persistence are
//! external collaborators: a renderer reads the environment state after each
//! tick, an audio sink reacts to [`sim::GameEvent`]s, and trainers own their
//! models. Any caller that can map an [`sim::Observation`] to an
//! [`sim::Action`] can drive [`sim::FlappyEnv`]; any caller that can decide
//! per individual can drive [`sim::BatchEvaluator`].

pub mod config;
pub mod sim;

pub use config::Config;
pub use sim::{
    Action, BatchEvaluator, CancelToken, ControlView, Controller, CrashKind, EnvError, FlappyEnv,
    GameEvent, GenerationOutcome, Mask, Observation, PipePair, Player, Rect, SpriteSet,
};

/// Default tuning constants, matching the classic 288x512 game.
pub mod consts {
    /// Visible world width in pixels
    pub const SCREEN_WIDTH: f32 = 288.0;
    /// Visible world height in pixels
    pub const SCREEN_HEIGHT: f32 = 512.0;
    /// Fraction of the screen height above the ground strip
    pub const GROUND_FRAC: f32 = 0.79;

    /// Vertical opening between the upper and lower pipe
    pub const PIPE_GAP: f32 = 100.0;
    /// Pipe sprite dimensions
    pub const PIPE_WIDTH: u32 = 52;
    pub const PIPE_HEIGHT: u32 = 320;
    /// Leftward pipe scroll per tick
    pub const PIPE_VEL_X: f32 = -4.0;
    /// New pipes spawn this far past the right edge
    pub const PIPE_SPAWN_MARGIN: f32 = 10.0;
    /// A fresh pair is queued once the leading pipe's x falls below this
    pub const PIPE_SPAWN_X: f32 = 5.0;
    /// The two reset-time pairs sit this far past the right edge
    pub const PIPE_INITIAL_OFFSET: f32 = 200.0;
    /// Gap placement band: the gap's top edge is uniform in
    /// `[base_y * LOW_FRAC, base_y * LOW_FRAC + base_y * SPAN_FRAC - gap)`
    pub const GAP_BAND_LOW_FRAC: f32 = 0.2;
    pub const GAP_BAND_SPAN_FRAC: f32 = 0.6;

    /// Player sprite dimensions
    pub const PLAYER_WIDTH: u32 = 34;
    pub const PLAYER_HEIGHT: u32 = 24;
    /// Player x as a fraction of the screen width (fixed for a playthrough)
    pub const PLAYER_X_FRAC: f32 = 0.2;
    /// Downward acceleration per tick
    pub const PLAYER_ACC_Y: f32 = 1.0;
    /// Terminal fall speed
    pub const PLAYER_MAX_VEL_Y: f32 = 10.0;
    /// Nominal ascent cap. The classic game never enforces it; the flap
    /// impulse of -9 is what actually bounds ascent speed.
    pub const PLAYER_MIN_VEL_Y: f32 = -8.0;
    /// Velocity assumed on a flap, and at episode start
    pub const PLAYER_FLAP_ACC: f32 = -9.0;

    /// Horizontal window width for the midpoint-crossing score check
    pub const SCORE_WINDOW: f32 = 4.0;

    /// Per-tick survival reward
    pub const REWARD_TICK: f32 = 0.1;
    /// Reward on passing a pipe pair
    pub const REWARD_PIPE: f32 = 1.0;
    /// Reward on crashing
    pub const REWARD_CRASH: f32 = -1.0;

    /// Batch mode: per-tick survival fitness
    pub const FITNESS_TICK: f32 = 0.1;
    /// Batch mode: fitness bonus for every live individual on a shared score
    pub const FITNESS_PIPE: f32 = 5.0;
    /// Batch mode: fitness deducted from an individual when it crashes
    pub const FITNESS_CRASH: f32 = 1.0;

    /// Wing animation frame sequence (up, mid, down, mid)
    pub const FRAME_CYCLE: [usize; 4] = [0, 1, 2, 1];
    /// Ticks between wing animation frame advances
    pub const FRAME_CYCLE_PERIOD: u64 = 5;
    /// Wing animation loop counter modulus
    pub const FRAME_LOOP_MOD: u64 = 30;
}
