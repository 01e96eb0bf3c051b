//! Silhouette masks for pixel-exact collision
//!
//! A [`Mask`] is a per-pixel opacity grid in a sprite's local coordinates.
//! Collision is tested silhouette-against-silhouette rather than box-against-
//! box, so a near miss past the bird's rounded beak really is a miss.
//!
//! Asset decoding is out of scope for this crate, so [`SpriteSet::classic`]
//! ships procedural stand-ins shaped like the classic sprites: an inscribed
//! ellipse for the bird and a rimmed shaft for the pipe. Callers with real
//! sprite data build masks from their alpha channels via [`Mask::from_fn`]
//! and supply their own [`SpriteSet`].

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// A boolean opacity grid, indexed by local (x, y) with (0, 0) top-left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Build from a closure over local coordinates.
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Fully opaque mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Opaque ellipse inscribed in the sprite box
    pub fn ellipse(width: u32, height: u32) -> Self {
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        Self::from_fn(width, height, |x, y| {
            let dx = (x as f32 + 0.5 - rx) / rx;
            let dy = (y as f32 + 0.5 - ry) / ry;
            dx * dx + dy * dy <= 1.0
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity at a local coordinate. Panics out of bounds; collision only
    /// ever indexes inside the clipped overlap region.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        debug_assert!(x < self.width && y < self.height);
        self.bits[(y * self.width + x) as usize]
    }

    /// Vertically mirrored copy (the upper pipe is the flipped lower pipe).
    pub fn flipped_vertical(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.get(x, self.height - 1 - y)
        })
    }
}

/// Rim height of the procedural pipe silhouette, in pixels
const PIPE_RIM_HEIGHT: u32 = 26;
/// Shaft inset from each side below the rim, in pixels
const PIPE_SHAFT_INSET: u32 = 2;

/// Silhouette mask for a lower pipe: full-width rim on top, slightly
/// narrower shaft below.
fn lower_pipe_mask(width: u32, height: u32) -> Mask {
    Mask::from_fn(width, height, |x, y| {
        if y < PIPE_RIM_HEIGHT.min(height) {
            true
        } else {
            x >= PIPE_SHAFT_INSET && x < width - PIPE_SHAFT_INSET
        }
    })
}

/// The three silhouettes the collision path needs. The upper pipe mask is
/// always the vertical mirror of the lower one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSet {
    pub player: Mask,
    pub pipe_upper: Mask,
    pub pipe_lower: Mask,
}

impl SpriteSet {
    /// Procedural stand-ins for the classic sprites, sized from `player_*`
    /// and `pipe_*` dimensions.
    pub fn classic(
        player_width: u32,
        player_height: u32,
        pipe_width: u32,
        pipe_height: u32,
    ) -> Self {
        let pipe_lower = lower_pipe_mask(pipe_width, pipe_height);
        let pipe_upper = pipe_lower.flipped_vertical();
        Self {
            player: Mask::ellipse(player_width, player_height),
            pipe_upper,
            pipe_lower,
        }
    }

    /// Build from caller-supplied player and lower-pipe silhouettes.
    pub fn from_masks(player: Mask, pipe_lower: Mask) -> Self {
        let pipe_upper = pipe_lower.flipped_vertical();
        Self {
            player,
            pipe_upper,
            pipe_lower,
        }
    }

    /// True when every mask is at least as large as the sprite box the
    /// configuration will pair it with. Smaller masks would index out of
    /// bounds during collision, so constructors assert this up front.
    pub fn covers(&self, cfg: &Config) -> bool {
        self.player.width >= cfg.player_width
            && self.player.height >= cfg.player_height
            && self.pipe_upper.width >= cfg.pipe_width
            && self.pipe_upper.height >= cfg.pipe_height
            && self.pipe_lower.width >= cfg.pipe_width
            && self.pipe_lower.height >= cfg.pipe_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipse_opaque_center_transparent_corners() {
        let m = Mask::ellipse(34, 24);
        assert!(m.get(17, 12));
        assert!(!m.get(0, 0));
        assert!(!m.get(33, 23));
        // Right edge keeps a few opaque pixels near the vertical center
        assert!(m.get(33, 11) || m.get(33, 12));
    }

    #[test]
    fn flip_mirrors_rows() {
        let m = Mask::from_fn(2, 3, |_, y| y == 0);
        let f = m.flipped_vertical();
        assert!(!f.get(0, 0));
        assert!(f.get(0, 2));
        assert_eq!(f.flipped_vertical(), m);
    }

    #[test]
    fn covers_compares_against_configured_sprite_boxes() {
        let cfg = Config::default();
        let classic = SpriteSet::classic(34, 24, 52, 320);
        assert!(classic.covers(&cfg));
        // Oversized masks are fine, undersized ones are not
        let big = SpriteSet::from_masks(Mask::filled(64, 64), Mask::filled(64, 400));
        assert!(big.covers(&cfg));
        let small = SpriteSet::from_masks(Mask::filled(34, 24), Mask::filled(52, 319));
        assert!(!small.covers(&cfg));
    }

    #[test]
    fn pipe_silhouette_rim_and_shaft() {
        let lower = lower_pipe_mask(52, 320);
        // Rim is full width
        assert!(lower.get(0, 0));
        assert!(lower.get(51, 25));
        // Shaft is inset
        assert!(!lower.get(0, 26));
        assert!(!lower.get(51, 300));
        assert!(lower.get(2, 300));
        // Upper pipe: rim at the bottom
        let upper = lower.flipped_vertical();
        assert!(upper.get(0, 319));
        assert!(!upper.get(0, 0));
    }
}
