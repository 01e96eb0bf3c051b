//! Randomized pipe-pair generation
//!
//! The gap's vertical placement is the only randomness in the whole
//! simulation, drawn from the environment's seeded RNG. The gap size is
//! constant within a run; only its center moves.

use rand::Rng;
use rand_pcg::Pcg32;
use std::collections::VecDeque;

use crate::config::Config;

use super::geom::Rect;
use super::state::PipePair;

/// Generate one pair just past the right world edge, with the gap's top
/// edge uniform inside the configured band. The band keeps the gap away
/// from the top of the screen and the ground: with classic tuning the top
/// edge lands in `[80, 222)`.
pub fn random_pipe(cfg: &Config, rng: &mut Pcg32) -> PipePair {
    let base_y = cfg.base_y();
    let low = (base_y * cfg.gap_band_low_frac) as i32;
    let span = ((base_y * cfg.gap_band_span_frac - cfg.pipe_gap) as i32).max(1);
    let gap_y = (rng.random_range(0..span) + low) as f32;

    let x = cfg.screen_width + cfg.pipe_spawn_margin;
    PipePair {
        upper: Rect::new(x, gap_y - cfg.pipe_height as f32, cfg.pipe_width, cfg.pipe_height),
        lower: Rect::new(x, gap_y + cfg.pipe_gap, cfg.pipe_width, cfg.pipe_height),
    }
}

/// The two pairs every episode starts with, pre-positioned ahead of the
/// player at fixed spacing: the first a constant offset past the right
/// edge, the second half a screen width behind it.
pub fn starting_pipes(cfg: &Config, rng: &mut Pcg32) -> VecDeque<PipePair> {
    let mut first = random_pipe(cfg, rng);
    let mut second = random_pipe(cfg, rng);

    let x0 = cfg.screen_width + cfg.pipe_initial_offset;
    let dx0 = x0 - first.x();
    first.advance(dx0);
    let x1 = x0 + cfg.screen_width / 2.0;
    let dx1 = x1 - second.x();
    second.advance(dx1);

    let mut pipes = VecDeque::with_capacity(4);
    pipes.push_back(first);
    pipes.push_back(second);
    pipes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn gap_stays_inside_the_band() {
        let cfg = Config::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let base_y = cfg.base_y();
        let low = (base_y * cfg.gap_band_low_frac) as i32 as f32;
        let high = low + (base_y * cfg.gap_band_span_frac - cfg.pipe_gap) as i32 as f32;
        for _ in 0..500 {
            let pair = random_pipe(&cfg, &mut rng);
            let gap_top = pair.upper.pos.y + cfg.pipe_height as f32;
            assert!(gap_top >= low && gap_top < high, "gap_top {gap_top} outside band");
            // Constant gap size between the pipes
            assert_eq!(pair.lower.pos.y - gap_top, cfg.pipe_gap);
            // Both pipes share an x just past the right edge
            assert_eq!(pair.upper.pos.x, cfg.screen_width + cfg.pipe_spawn_margin);
            assert_eq!(pair.lower.pos.x, pair.upper.pos.x);
        }
    }

    #[test]
    fn starting_pairs_fixed_spacing() {
        let cfg = Config::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let pipes = starting_pipes(&cfg, &mut rng);
        assert_eq!(pipes.len(), 2);
        assert_eq!(pipes[0].x(), 488.0);
        assert_eq!(pipes[1].x(), 632.0);
        // Strictly increasing x order
        assert!(pipes[0].x() < pipes[1].x());
    }

    #[test]
    fn generator_is_seed_deterministic() {
        let cfg = Config::default();
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(random_pipe(&cfg, &mut a), random_pipe(&cfg, &mut b));
        }
    }
}
