//! Single-agent episode state machine
//!
//! [`FlappyEnv`] owns the authoritative world state for one episode and
//! exposes the gym-style `reset`/`step` contract. It is a pure value
//! machine: no I/O, no clock, no rendering. Presentation layers read the
//! accessors after each tick; trainers consume the returned observation,
//! reward, and done flag.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::collections::VecDeque;
use thiserror::Error;

use crate::config::Config;
use crate::consts::{FRAME_CYCLE, FRAME_CYCLE_PERIOD, FRAME_LOOP_MOD};

use super::collision::{CrashKind, check_crash};
use super::mask::SpriteSet;
use super::pipes::{random_pipe, starting_pipes};
use super::physics;
use super::state::{Action, GameEvent, Observation, PipePair, Player, observe, upcoming_pipe_index};

/// Contract violations an environment caller can commit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// `step` was called after termination without an intervening `reset`.
    /// Continuing would integrate physics from a crashed state, so this
    /// fails loudly instead of producing meaningless ticks.
    #[error("step called on a terminated episode; call reset first")]
    EpisodeOver,
}

/// The single-agent environment.
///
/// Episode lifecycle: `new` seeds the RNG and runs the first `reset`;
/// `step` advances one tick until it reports `done`; the caller decides
/// when to `reset` again. Two environments built with the same seed and
/// config, fed the same actions, produce identical trajectories.
#[derive(Debug, Clone)]
pub struct FlappyEnv {
    cfg: Config,
    sprites: SpriteSet,
    rng: Pcg32,
    player: Player,
    pipes: VecDeque<PipePair>,
    score: u32,
    ticks: u64,
    loop_iter: u64,
    frame_pos: usize,
    terminated: bool,
    events: Vec<GameEvent>,
}

impl FlappyEnv {
    /// Build an environment with the classic sprite silhouettes.
    pub fn new(cfg: Config, seed: u64) -> Self {
        let sprites = SpriteSet::classic(
            cfg.player_width,
            cfg.player_height,
            cfg.pipe_width,
            cfg.pipe_height,
        );
        Self::with_sprites(cfg, sprites, seed)
    }

    /// Build an environment with caller-supplied silhouettes.
    ///
    /// # Panics
    ///
    /// Panics when a mask is smaller than the sprite box the configuration
    /// pairs it with.
    pub fn with_sprites(cfg: Config, sprites: SpriteSet, seed: u64) -> Self {
        assert!(
            sprites.covers(&cfg),
            "sprite masks smaller than the configured sprite dimensions"
        );
        let mut env = Self {
            rng: Pcg32::seed_from_u64(seed),
            player: Player::spawn(&cfg),
            pipes: VecDeque::new(),
            score: 0,
            ticks: 0,
            loop_iter: 0,
            frame_pos: 0,
            terminated: false,
            events: Vec::new(),
            cfg,
            sprites,
        };
        env.reset();
        env
    }

    /// Start a new episode, keeping the RNG stream. Returns the initial
    /// observation.
    pub fn reset(&mut self) -> Observation {
        self.player = Player::spawn(&self.cfg);
        self.pipes = starting_pipes(&self.cfg, &mut self.rng);
        self.score = 0;
        self.ticks = 0;
        self.loop_iter = 0;
        self.frame_pos = 0;
        self.terminated = false;
        self.events.clear();
        log::info!("episode reset, pipes at x={} and x={}", self.pipes[0].x(), self.pipes[1].x());
        self.observation()
    }

    /// Advance one tick.
    ///
    /// Order within the tick: flap input, score check, gravity and
    /// position, pipe scroll, spawn, retire, crash check. The score check
    /// runs against pre-integration positions; the crash check runs last.
    /// Returns the new observation, this tick's reward, and whether the
    /// episode just terminated. The environment never resets itself.
    pub fn step(&mut self, action: Action) -> Result<(Observation, f32, bool), EnvError> {
        if self.terminated {
            return Err(EnvError::EpisodeOver);
        }

        self.events.clear();
        self.ticks += 1;
        self.advance_animation();
        let mut reward = self.cfg.reward_tick;

        if action == Action::Flap && physics::apply_flap(&mut self.player, &self.cfg) {
            self.events.push(GameEvent::Flap);
        }

        // Score: the player's midpoint crosses a pipe midpoint inside a
        // narrow window, once per pair
        let player_mid = self.player.mid_x();
        for pair in &self.pipes {
            let pipe_mid = pair.mid_x();
            if pipe_mid <= player_mid && player_mid < pipe_mid + self.cfg.score_window {
                self.score += 1;
                reward = self.cfg.reward_pipe;
                self.events.push(GameEvent::Score);
                log::debug!("score {} at tick {}", self.score, self.ticks);
            }
        }

        physics::integrate(&mut self.player, &self.cfg);

        for pair in &mut self.pipes {
            pair.advance(self.cfg.pipe_vel_x);
        }

        // Spawn once the leading pair has crossed the spawn line, retire
        // it once fully off screen. The depth cap keeps the crossing from
        // firing more than once per pair; spawn-before-retire keeps at
        // least two pairs queued at any scroll speed.
        let spawn = self
            .pipes
            .front()
            .is_some_and(|front| front.x() < self.cfg.pipe_spawn_x)
            && self.pipes.len() < 3;
        if spawn {
            let pair = random_pipe(&self.cfg, &mut self.rng);
            self.pipes.push_back(pair);
        }
        if self.pipes.front().is_some_and(PipePair::off_screen) {
            self.pipes.pop_front();
        }

        if let Some(kind) = check_crash(&self.player, &self.pipes, &self.sprites, &self.cfg) {
            self.terminated = true;
            reward = self.cfg.reward_crash;
            self.events.push(GameEvent::Hit);
            if kind == CrashKind::Pipe {
                self.events.push(GameEvent::Die);
            }
            log::debug!("crash ({kind:?}) at tick {}, score {}", self.ticks, self.score);
        }

        Ok((self.observation(), reward, self.terminated))
    }

    /// Step from a raw action value; anything but `1` is a no-op.
    pub fn step_raw(&mut self, raw: u8) -> Result<(Observation, f32, bool), EnvError> {
        self.step(Action::from_raw(raw))
    }

    /// The current observation, always describing the nearest upcoming
    /// pipe pair (the second pair once the first is fully behind the
    /// player).
    pub fn observation(&self) -> Observation {
        let idx = upcoming_pipe_index(&self.pipes, self.player.pos.x);
        observe(&self.player, &self.pipes, idx)
    }

    fn advance_animation(&mut self) {
        self.loop_iter = (self.loop_iter + 1) % FRAME_LOOP_MOD;
        if self.loop_iter % FRAME_CYCLE_PERIOD == 0 {
            self.frame_pos = (self.frame_pos + 1) % FRAME_CYCLE.len();
        }
    }

    /// Wing animation frame for the rendering sink (0 = up, 1 = mid,
    /// 2 = down), cycling with the tick counter
    pub fn sprite_frame(&self) -> usize {
        FRAME_CYCLE[self.frame_pos]
    }

    /// Events raised by the most recent tick, for audio sinks
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The obstacle sequence in increasing x order, for rendering
    pub fn pipes(&self) -> &VecDeque<PipePair> {
        &self.pipes
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }
}
