//! Per-entity vertical physics
//!
//! Split into two halves because the episode loop interleaves the score
//! check between input and integration: [`apply_flap`] handles the impulse,
//! [`integrate`] handles gravity and the ground-clamped position update.
//! Both the single-agent environment and the batch loop call these, so the
//! two modes cannot drift apart.

use crate::config::Config;

use super::state::Player;

/// Apply a flap impulse. Ignored while the player is above the safety
/// ceiling (`y <= -2 * height`), which stops runaway upward travel once the
/// sprite is fully off the top of the screen. Returns whether the flap
/// landed, so callers can emit the wing event.
pub fn apply_flap(player: &mut Player, cfg: &Config) -> bool {
    if player.pos.y > -2.0 * player.height as f32 {
        player.vel_y = cfg.player_flap_acc;
        player.flapped = true;
        true
    } else {
        false
    }
}

/// One tick of gravity and position update.
///
/// Gravity accrues only below terminal fall speed and never on the tick a
/// flap landed. The position step is clamped so the sprite cannot pass
/// through the ground in a single tick:
/// `y += min(vel, base_y - y - height)`. That clamp is what makes the
/// ground-collision threshold reachable but never crossable, and it must
/// stay exactly as written.
pub fn integrate(player: &mut Player, cfg: &Config) {
    if player.vel_y < cfg.player_max_vel_y && !player.flapped {
        player.vel_y += cfg.player_acc_y;
    }
    if player.flapped {
        player.flapped = false;
    }
    let to_ground = cfg.base_y() - player.pos.y - player.height as f32;
    player.pos.y += player.vel_y.min(to_ground);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_fall_trajectory_matches_classic() {
        let cfg = Config::default();
        let mut p = Player::spawn(&cfg);
        // Spawn velocity is -9; gravity ramps it toward +10
        let expect = [
            (-8.0, 236.0),
            (-7.0, 229.0),
            (-6.0, 223.0),
            (-5.0, 218.0),
            (-4.0, 214.0),
            (-3.0, 211.0),
            (-2.0, 209.0),
            (-1.0, 208.0),
            (0.0, 208.0),
            (1.0, 209.0),
        ];
        for (vel, y) in expect {
            integrate(&mut p, &cfg);
            assert_eq!(p.vel_y, vel);
            assert_eq!(p.pos.y, y);
        }
    }

    #[test]
    fn velocity_caps_at_terminal_fall_speed() {
        let cfg = Config::default();
        let mut p = Player::spawn(&cfg);
        for _ in 0..40 {
            integrate(&mut p, &cfg);
        }
        assert_eq!(p.vel_y, cfg.player_max_vel_y);
    }

    #[test]
    fn flap_sets_impulse_and_suppresses_gravity_once() {
        let cfg = Config::default();
        let mut p = Player::spawn(&cfg);
        p.vel_y = 5.0;
        assert!(apply_flap(&mut p, &cfg));
        assert_eq!(p.vel_y, -9.0);
        integrate(&mut p, &cfg);
        // No gravity on the flap tick
        assert_eq!(p.vel_y, -9.0);
        assert!(!p.flapped);
        integrate(&mut p, &cfg);
        assert_eq!(p.vel_y, -8.0);
    }

    #[test]
    fn flap_ignored_above_safety_ceiling() {
        let cfg = Config::default();
        let mut p = Player::spawn(&cfg);
        p.pos.y = -2.0 * p.height as f32;
        p.vel_y = -3.0;
        assert!(!apply_flap(&mut p, &cfg));
        assert_eq!(p.vel_y, -3.0);
        assert!(!p.flapped);
    }

    #[test]
    fn ground_clamp_stops_descent_at_base() {
        let cfg = Config::default();
        let mut p = Player::spawn(&cfg);
        p.pos.y = cfg.base_y() - p.height as f32 - 3.0;
        p.vel_y = 10.0;
        integrate(&mut p, &cfg);
        // One tick later the sprite rests exactly on the ground line
        assert!((p.pos.y + p.height as f32 - cfg.base_y()).abs() < 1e-3);
        // And never sinks below it
        integrate(&mut p, &cfg);
        assert!(p.pos.y + p.height as f32 <= cfg.base_y() + 1e-3);
    }
}
