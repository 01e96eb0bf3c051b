//! Pixel-exact collision detection
//!
//! The tricky part of the simulation: collision must match the visual
//! silhouettes, not the bounding boxes, or the bird dies on thin air next
//! to a pipe rim. The check clips the two boxes on the pixel grid first
//! (the overwhelmingly common miss is rejected there without touching any
//! mask) and only then scans the overlap for a pixel both masks mark
//! opaque.

use std::collections::VecDeque;

use crate::config::Config;

use super::geom::Rect;
use super::mask::{Mask, SpriteSet};
use super::state::{PipePair, Player};

/// What the player hit. The distinction only matters to presentation (the
/// classic game plays an extra cue on pipe deaths) but is free to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashKind {
    Ground,
    Pipe,
}

/// Silhouette overlap test restricted to the bounding-box intersection.
///
/// Symmetric in its arguments and total: disjoint boxes return false
/// immediately, everything else scans an overlap bounded by sprite size.
/// Each mask must be at least as large as its rect claims; the fast-reject
/// path never reads either mask.
pub fn pixel_collision(rect_a: &Rect, mask_a: &Mask, rect_b: &Rect, mask_b: &Mask) -> bool {
    let Some(clip) = rect_a.clip(rect_b) else {
        return false;
    };

    // Overlap origin in each sprite's local coordinates
    let ax = clip.x - rect_a.left();
    let ay = clip.y - rect_a.top();
    let bx = clip.x - rect_b.left();
    let by = clip.y - rect_b.top();

    for x in 0..clip.width {
        for y in 0..clip.height {
            if mask_a.get((ax + x) as u32, (ay + y) as u32)
                && mask_b.get((bx + x) as u32, (by + y) as u32)
            {
                return true;
            }
        }
    }
    false
}

/// Fatal-contact check for one actor against the ground and every pipe.
///
/// The ground test runs first and short-circuits the pipe scan: once
/// `y + height` reaches one pixel above the base line the episode is over
/// regardless of pipe positions. Pipe contact is silhouette-exact, upper
/// then lower per pair.
pub fn check_crash(
    player: &Player,
    pipes: &VecDeque<PipePair>,
    sprites: &SpriteSet,
    cfg: &Config,
) -> Option<CrashKind> {
    if player.pos.y + player.height as f32 >= cfg.base_y() - 1.0 {
        return Some(CrashKind::Ground);
    }

    let player_rect = player.rect();
    for pair in pipes {
        if pixel_collision(&player_rect, &sprites.player, &pair.upper, &sprites.pipe_upper)
            || pixel_collision(&player_rect, &sprites.player, &pair.lower, &sprites.pipe_lower)
        {
            return Some(CrashKind::Pipe);
        }
    }
    None
}
