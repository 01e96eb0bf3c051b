//! Population evaluation against a shared pipe timeline
//!
//! One generation at a time: N controller-driven individuals fly through
//! the same pipes, crashed individuals drop out of the live set, survivors
//! keep going until none remain or the caller cancels. Physics and
//! collision are the same leaf functions the single-agent environment
//! uses, so a genome evaluated here behaves identically when replayed
//! through [`super::env::FlappyEnv`].
//!
//! The per-tick ordering differs from the environment on purpose: each
//! individual integrates before its controller decides, then crashes are
//! resolved, then the shared score. That is the classic trainer's loop and
//! trained populations depend on it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Config;

use super::collision::check_crash;
use super::mask::SpriteSet;
use super::pipes::{random_pipe, starting_pipes};
use super::physics;
use super::state::{Action, PipePair, Player, upcoming_pipe_index};

/// Cooperative cancellation flag, checked once per tick. Cloning shares
/// the flag, so a UI thread can hold one handle while the evaluation loop
/// polls the other.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the evaluation loop stop at the next tick boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Read-only view a controller decides from. Controllers never mutate the
/// world; the loop applies their decisions.
#[derive(Debug)]
pub struct ControlView<'a> {
    pub player: &'a Player,
    /// Shared obstacle sequence in increasing x order
    pub pipes: &'a VecDeque<PipePair>,
    /// Index of the nearest upcoming pair within `pipes`
    pub next_pipe: usize,
    pub tick: u64,
}

/// Per-individual decision source. Implemented by neural networks, Q-table
/// lookups, scripted policies, or plain closures.
pub trait Controller {
    fn decide(&mut self, view: ControlView<'_>) -> Action;
}

impl<F> Controller for F
where
    F: FnMut(ControlView<'_>) -> Action,
{
    fn decide(&mut self, view: ControlView<'_>) -> Action {
        self(view)
    }
}

/// One actor within a generation, with its fitness accumulator.
#[derive(Debug, Clone)]
struct Individual {
    player: Player,
    fitness: f32,
    alive: bool,
    eliminated_at: Option<u64>,
}

/// Result of one generation. Fitness values and elimination ticks are
/// complete even when the run was cancelled mid-generation, so trainers
/// can persist partial progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// 1-based index of the generation that just ran
    pub generation: u32,
    /// Shared score: pipe pairs passed by the population as a whole
    pub score: u32,
    /// Ticks the generation lasted
    pub ticks: u64,
    /// True when the loop stopped on the cancellation token rather than on
    /// the last elimination
    pub cancelled: bool,
    /// Final fitness per individual, in controller order
    pub fitness: Vec<f32>,
    /// Tick each individual crashed on, `None` for survivors
    pub eliminated_at: Vec<Option<u64>>,
}

/// Generation runner. Owns the shared pipe timeline RNG and the generation
/// counter; controllers and their trained state stay with the caller.
#[derive(Debug)]
pub struct BatchEvaluator {
    cfg: Config,
    sprites: SpriteSet,
    rng: Pcg32,
    generation: u32,
}

impl BatchEvaluator {
    /// Build an evaluator with the classic sprite silhouettes. The seed
    /// fixes the pipe timeline across all generations this evaluator runs.
    pub fn new(cfg: Config, seed: u64) -> Self {
        let sprites = SpriteSet::classic(
            cfg.player_width,
            cfg.player_height,
            cfg.pipe_width,
            cfg.pipe_height,
        );
        Self::with_sprites(cfg, sprites, seed)
    }

    /// Build an evaluator with caller-supplied silhouettes.
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
        Self {
            rng: Pcg32::seed_from_u64(seed),
            generation: 0,
            cfg,
            sprites,
        }
    }

    /// Generations completed or started so far
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Run one generation until every individual has crashed or the token
    /// is cancelled. Controllers are polled once per live individual per
    /// tick; their internal state (networks, tables) survives the call.
    pub fn run_generation(
        &mut self,
        controllers: &mut [Box<dyn Controller>],
        cancel: &CancelToken,
    ) -> GenerationOutcome {
        self.generation += 1;
        let cfg = &self.cfg;

        let mut individuals: Vec<Individual> = controllers
            .iter()
            .map(|_| Individual {
                player: Player::spawn(cfg),
                fitness: 0.0,
                alive: true,
                eliminated_at: None,
            })
            .collect();
        let mut pipes = starting_pipes(cfg, &mut self.rng);
        let mut score = 0u32;
        let mut ticks = 0u64;
        let mut cancelled = false;

        while individuals.iter().any(|ind| ind.alive) {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            ticks += 1;

            // All individuals share one x, so the upcoming-pipe index is
            // population-wide
            let pipe_ind = upcoming_pipe_index(&pipes, cfg.player_start_x());

            for (ind, controller) in individuals.iter_mut().zip(controllers.iter_mut()) {
                if !ind.alive {
                    continue;
                }
                ind.fitness += cfg.fitness_tick;
                physics::integrate(&mut ind.player, cfg);
                let action = controller.decide(ControlView {
                    player: &ind.player,
                    pipes: &pipes,
                    next_pipe: pipe_ind,
                    tick: ticks,
                });
                if action == Action::Flap {
                    physics::apply_flap(&mut ind.player, cfg);
                }
            }

            for ind in individuals.iter_mut() {
                if ind.alive && check_crash(&ind.player, &pipes, &self.sprites, cfg).is_some() {
                    ind.fitness -= cfg.fitness_crash;
                    ind.alive = false;
                    ind.eliminated_at = Some(ticks);
                    log::debug!("individual eliminated at tick {ticks}");
                }
            }

            // Shared score, judged from any surviving reference individual
            // (all share the same x); every live individual gets the bonus
            if individuals.iter().any(|ind| ind.alive) {
                let player_mid = cfg.player_start_x() + cfg.player_width as f32 / 2.0;
                for pair in &pipes {
                    let pipe_mid = pair.mid_x();
                    if pipe_mid <= player_mid && player_mid < pipe_mid + cfg.score_window {
                        score += 1;
                        for ind in individuals.iter_mut().filter(|ind| ind.alive) {
                            ind.fitness += cfg.fitness_pipe;
                        }
                        break;
                    }
                }
            } else {
                break;
            }

            for pair in pipes.iter_mut() {
                pair.advance(cfg.pipe_vel_x);
            }
            // Same spawn rule as the environment: the crossing fires once
            // per pair (depth cap) and precedes the retire, so the timeline
            // never thins below two pairs at any scroll speed
            let spawn = pipes
                .front()
                .is_some_and(|front| front.x() < cfg.pipe_spawn_x)
                && pipes.len() < 3;
            if spawn {
                let pair = random_pipe(cfg, &mut self.rng);
                pipes.push_back(pair);
            }
            if pipes.front().is_some_and(PipePair::off_screen) {
                pipes.pop_front();
            }
        }

        let alive = individuals.iter().filter(|ind| ind.alive).count();
        log::info!(
            "generation {} finished: score {score}, {ticks} ticks, {alive} alive, cancelled={cancelled}",
            self.generation
        );

        GenerationOutcome {
            generation: self.generation,
            score,
            ticks,
            cancelled,
            fitness: individuals.iter().map(|ind| ind.fitness).collect(),
            eliminated_at: individuals.iter().map(|ind| ind.eliminated_at).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never_flap() -> Box<dyn Controller> {
        Box::new(|_: ControlView<'_>| Action::Idle)
    }

    #[test]
    fn empty_population_is_a_noop_generation() {
        let mut eval = BatchEvaluator::new(Config::default(), 1);
        let outcome = eval.run_generation(&mut [], &CancelToken::new());
        assert_eq!(outcome.ticks, 0);
        assert_eq!(outcome.score, 0);
        assert!(outcome.fitness.is_empty());
        assert_eq!(outcome.generation, 1);
    }

    #[test]
    fn generation_counter_advances_per_run() {
        let mut eval = BatchEvaluator::new(Config::default(), 1);
        assert_eq!(eval.generation(), 0);
        eval.run_generation(&mut [never_flap()], &CancelToken::new());
        eval.run_generation(&mut [never_flap()], &CancelToken::new());
        assert_eq!(eval.generation(), 2);
    }

    #[test]
    fn pre_cancelled_token_returns_immediately_with_state_intact() {
        let mut eval = BatchEvaluator::new(Config::default(), 1);
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = eval.run_generation(&mut [never_flap(), never_flap()], &cancel);
        assert!(outcome.cancelled);
        assert_eq!(outcome.ticks, 0);
        assert_eq!(outcome.fitness, vec![0.0, 0.0]);
        assert_eq!(outcome.eliminated_at, vec![None, None]);
    }

    #[test]
    #[should_panic(expected = "sprite masks smaller")]
    fn undersized_masks_are_rejected_at_construction() {
        use super::super::mask::Mask;
        let sprites = SpriteSet::from_masks(Mask::filled(8, 8), Mask::filled(8, 8));
        BatchEvaluator::with_sprites(Config::default(), sprites, 1);
    }

    #[test]
    fn lone_faller_is_eliminated_on_the_ground() {
        let mut eval = BatchEvaluator::new(Config::default(), 1);
        let outcome = eval.run_generation(&mut [never_flap()], &CancelToken::new());
        assert!(!outcome.cancelled);
        // Free fall from the start position reaches the ground clamp on
        // tick 31 under classic tuning
        assert_eq!(outcome.eliminated_at, vec![Some(31)]);
        assert_eq!(outcome.ticks, 31);
        assert_eq!(outcome.score, 0);
        let expected = 31.0 * 0.1 - 1.0;
        assert!((outcome.fitness[0] - expected).abs() < 1e-4);
    }
}
