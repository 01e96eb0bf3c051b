//! Simulation tuning parameters
//!
//! Every numeric constant the physics and scoring depend on lives here as a
//! named, overridable field. `Config::default()` reproduces the classic
//! 288x512 game exactly; trainers that want an easier or harder world build
//! a modified copy. Tick rate is deliberately absent: physics is
//! tick-indexed, pacing belongs to the caller.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Full parameter set for one environment or one batch evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Visible world width in pixels
    pub screen_width: f32,
    /// Visible world height in pixels
    pub screen_height: f32,
    /// Fraction of the screen height above the ground strip
    pub ground_frac: f32,

    /// Vertical opening between the upper and lower pipe of a pair
    pub pipe_gap: f32,
    /// Pipe sprite width
    pub pipe_width: u32,
    /// Pipe sprite height
    pub pipe_height: u32,
    /// Leftward pipe scroll per tick (negative)
    pub pipe_vel_x: f32,
    /// New pipes spawn this far past the right edge
    pub pipe_spawn_margin: f32,
    /// A fresh pair is queued once the leading pipe's x falls below this,
    /// whatever the scroll speed per tick
    pub pipe_spawn_x: f32,
    /// The two reset-time pairs sit this far past the right edge; the
    /// second trails the first by half a screen width
    pub pipe_initial_offset: f32,
    /// Low edge of the gap placement band, as a fraction of `base_y`
    pub gap_band_low_frac: f32,
    /// Extent of the gap placement band, as a fraction of `base_y`
    pub gap_band_span_frac: f32,

    /// Player sprite width
    pub player_width: u32,
    /// Player sprite height
    pub player_height: u32,
    /// Player x as a fraction of the screen width
    pub player_x_frac: f32,
    /// Downward acceleration per tick
    pub player_acc_y: f32,
    /// Terminal fall speed
    pub player_max_vel_y: f32,
    /// Nominal ascent cap (unenforced in the classic tuning; the flap
    /// impulse is what actually bounds ascent)
    pub player_min_vel_y: f32,
    /// Velocity assumed on a flap, and at episode start
    pub player_flap_acc: f32,

    /// Horizontal window width for the midpoint-crossing score check
    pub score_window: f32,

    /// Per-tick survival reward
    pub reward_tick: f32,
    /// Reward on passing a pipe pair
    pub reward_pipe: f32,
    /// Reward on crashing
    pub reward_crash: f32,

    /// Batch mode: per-tick survival fitness
    pub fitness_tick: f32,
    /// Batch mode: fitness bonus for every live individual on a shared score
    pub fitness_pipe: f32,
    /// Batch mode: fitness deducted from an individual when it crashes
    pub fitness_crash: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_frac: GROUND_FRAC,

            pipe_gap: PIPE_GAP,
            pipe_width: PIPE_WIDTH,
            pipe_height: PIPE_HEIGHT,
            pipe_vel_x: PIPE_VEL_X,
            pipe_spawn_margin: PIPE_SPAWN_MARGIN,
            pipe_spawn_x: PIPE_SPAWN_X,
            pipe_initial_offset: PIPE_INITIAL_OFFSET,
            gap_band_low_frac: GAP_BAND_LOW_FRAC,
            gap_band_span_frac: GAP_BAND_SPAN_FRAC,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_x_frac: PLAYER_X_FRAC,
            player_acc_y: PLAYER_ACC_Y,
            player_max_vel_y: PLAYER_MAX_VEL_Y,
            player_min_vel_y: PLAYER_MIN_VEL_Y,
            player_flap_acc: PLAYER_FLAP_ACC,

            score_window: SCORE_WINDOW,

            reward_tick: REWARD_TICK,
            reward_pipe: REWARD_PIPE,
            reward_crash: REWARD_CRASH,

            fitness_tick: FITNESS_TICK,
            fitness_pipe: FITNESS_PIPE,
            fitness_crash: FITNESS_CRASH,
        }
    }
}

impl Config {
    /// World y of the ground surface
    #[inline]
    pub fn base_y(&self) -> f32 {
        self.screen_height * self.ground_frac
    }

    /// Fixed player x for a playthrough
    #[inline]
    pub fn player_start_x(&self) -> f32 {
        (self.screen_width * self.player_x_frac) as i32 as f32
    }

    /// Player y at episode start (vertically centered)
    #[inline]
    pub fn player_start_y(&self) -> f32 {
        ((self.screen_height - self.player_height as f32) / 2.0) as i32 as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.player_start_x(), 57.0);
        assert_eq!(cfg.player_start_y(), 244.0);
        assert!((cfg.base_y() - 404.48).abs() < 0.01);
    }
}
