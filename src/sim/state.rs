//! Core simulation entities and the external state contract
//!
//! Everything a controller or a presentation layer reads lives here:
//! [`Player`], [`PipePair`], the fixed-shape [`Observation`], the
//! [`Action`] alphabet, and the per-tick [`GameEvent`]s an audio sink
//! reacts to.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::geom::Rect;
use crate::config::Config;

/// One discrete input per tick. Anything that is not a flap is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    Flap,
}

impl Action {
    /// Map a raw action value onto the alphabet. `1` flaps; every other
    /// value, including out-of-range ones, is treated as [`Action::Idle`].
    /// This is the documented convention for callers feeding untyped
    /// action streams (e.g. a Q-table indexed by integer).
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Action::Flap,
            _ => Action::Idle,
        }
    }
}

/// Per-tick events for presentation sinks. The simulation never acts on
/// these; they mirror the classic game's sound triggers (`Die` fires on
/// pipe crashes only, the ground hit plays just `Hit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Flap,
    Score,
    Hit,
    Die,
}

/// The controlled actor. x is fixed for a playthrough; the world scrolls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner in world coordinates
    pub pos: Vec2,
    /// Vertical velocity in pixels per tick
    pub vel_y: f32,
    /// Set on the tick a flap lands; suppresses gravity for that tick
    pub flapped: bool,
    pub width: u32,
    pub height: u32,
}

impl Player {
    /// A player at the episode start position and velocity.
    pub fn spawn(cfg: &Config) -> Self {
        Self {
            pos: Vec2::new(cfg.player_start_x(), cfg.player_start_y()),
            vel_y: cfg.player_flap_acc,
            flapped: false,
            width: cfg.player_width,
            height: cfg.player_height,
        }
    }

    /// Bounding box in world coordinates
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            width: self.width,
            height: self.height,
        }
    }

    /// Horizontal midpoint, used by the score check
    #[inline]
    pub fn mid_x(&self) -> f32 {
        self.pos.x + self.width as f32 / 2.0
    }
}

/// One upper+lower pipe pair sharing an x and a fixed vertical gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipePair {
    pub upper: Rect,
    pub lower: Rect,
}

impl PipePair {
    /// Shared x of both pipes
    #[inline]
    pub fn x(&self) -> f32 {
        self.upper.pos.x
    }

    /// Horizontal midpoint, used by the score check
    #[inline]
    pub fn mid_x(&self) -> f32 {
        self.upper.mid_x()
    }

    /// Scroll both pipes left by the per-tick pipe velocity.
    pub fn advance(&mut self, dx: f32) {
        self.upper.pos.x += dx;
        self.lower.pos.x += dx;
    }

    /// True once the pair has scrolled fully past the left world edge.
    #[inline]
    pub fn off_screen(&self) -> bool {
        self.x() < -(self.upper.width as f32)
    }

    /// True once the player's x is past this pair's trailing edge, meaning
    /// the pair is behind the player for observation purposes. Landing
    /// exactly on the edge still counts as upcoming.
    #[inline]
    pub fn behind(&self, player_x: f32) -> bool {
        player_x > self.x() + self.upper.width as f32
    }
}

/// Fixed-shape state record returned by `reset`/`step`. Field names are
/// part of the external contract; trained models discretize these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub player_y: f32,
    pub player_vel: f32,
    /// Horizontal distance from the player to the nearest upcoming pair
    pub next_pipe_dist_to_player: f32,
    /// y of the upper pipe's rect (its top edge, above the screen)
    pub next_pipe_top_y: f32,
    /// y of the lower pipe's rect (the gap's bottom edge)
    pub next_pipe_bottom_y: f32,
}

/// Index of the nearest upcoming pipe pair: the second pair once the
/// player has fully passed the first, else the first.
pub(crate) fn upcoming_pipe_index(pipes: &VecDeque<PipePair>, player_x: f32) -> usize {
    if pipes.len() > 1 && pipes[0].behind(player_x) {
        1
    } else {
        0
    }
}

/// Build the observation for a player against the shared pipe sequence.
pub(crate) fn observe(
    player: &Player,
    pipes: &VecDeque<PipePair>,
    idx: usize,
) -> Observation {
    let pair = &pipes[idx];
    Observation {
        player_y: player.pos.y,
        player_vel: player.vel_y,
        next_pipe_dist_to_player: pair.lower.pos.x - player.pos.x,
        next_pipe_top_y: pair.upper.pos.y,
        next_pipe_bottom_y: pair.lower.pos.y,
    }
}
