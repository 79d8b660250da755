//! Line cast-out.
//!
//! The line pays out a fixed length per tick from the caster towards a
//! caster-local lateral axis. The axis is re-rotated by the caster's
//! orientation every tick, so a boat that turns mid-cast swings the hook
//! with it.

use bevy::prelude::*;

use super::config::CastConfig;

/// Snaps a length this close to the maximum onto it, so 20 × 0.1 lands on 2.0.
const LENGTH_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone)]
pub struct CastLine {
    config: CastConfig,
    hook_position: Vec3,
    line_length: f32,
    is_line_deployed: bool,
}

impl CastLine {
    pub fn new(config: CastConfig) -> Self {
        Self {
            config,
            hook_position: Vec3::ZERO,
            line_length: 0.0,
            is_line_deployed: false,
        }
    }

    /// Start paying out line from `origin`. No-op while a line is already out.
    pub fn begin_cast(&mut self, origin: Vec3) {
        if self.is_line_deployed {
            return;
        }
        self.is_line_deployed = true;
        self.line_length = 0.0;
        self.hook_position = origin;
    }

    /// Pay out one tick of line and re-aim the hook. Returns `true` once the
    /// line is at full length, including on the call that gets it there.
    ///
    /// Without a deployed line nothing changes and the current completion
    /// flag is returned.
    pub fn advance(&mut self, caster_position: Vec3, caster_orientation: Quat) -> bool {
        if !self.is_line_deployed || self.is_complete() {
            return self.is_complete();
        }

        let max = self.config.max_line_length;
        let mut length = self.line_length + self.config.cast_speed;
        if length >= max - LENGTH_EPSILON {
            length = max;
        }
        self.line_length = length;

        let lateral = caster_orientation * self.config.lateral_axis();
        self.hook_position = caster_position + lateral * self.line_length;
        self.hook_position.y = self.config.hook_depth;

        self.is_complete()
    }

    /// Pull the line out of the water. Safe to call at any time.
    pub fn reel_in(&mut self) {
        self.is_line_deployed = false;
        self.line_length = 0.0;
    }

    pub fn hook_position(&self) -> Vec3 {
        self.hook_position
    }

    pub fn line_length(&self) -> f32 {
        self.line_length
    }

    pub fn max_line_length(&self) -> f32 {
        self.config.max_line_length
    }

    pub fn is_deployed(&self) -> bool {
        self.is_line_deployed
    }

    pub fn is_complete(&self) -> bool {
        self.line_length >= self.config.max_line_length
    }

    /// Rod tip → hook segment for drawing, or `None` with no line out.
    pub fn line_points(&self, caster_position: Vec3, caster_orientation: Quat) -> Option<[Vec3; 2]> {
        if !self.is_line_deployed {
            return None;
        }
        let rod_tip = caster_position + caster_orientation * self.config.rod_tip_offset();
        Some([rod_tip, self.hook_position])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn line() -> CastLine {
        CastLine::new(CastConfig::default())
    }

    #[test]
    fn test_advance_without_line_is_a_no_op() {
        let mut cast = line();
        assert!(!cast.advance(Vec3::new(3.0, 0.0, 1.0), Quat::IDENTITY));
        assert_eq!(cast.line_length(), 0.0);
        assert_eq!(cast.hook_position(), Vec3::ZERO);
        assert!(!cast.is_deployed());
    }

    #[test]
    fn test_full_cast_completes_on_tick_twenty() {
        let mut cast = line();
        cast.begin_cast(Vec3::ZERO);
        for tick in 1..=20 {
            let done = cast.advance(Vec3::ZERO, Quat::IDENTITY);
            assert_eq!(done, tick == 20, "tick {} reported complete={}", tick, done);
        }
        assert_eq!(cast.line_length(), 2.0);
    }

    #[test]
    fn test_length_never_exceeds_max() {
        let mut cast = line();
        cast.begin_cast(Vec3::ZERO);
        for _ in 0..500 {
            cast.advance(Vec3::ZERO, Quat::IDENTITY);
            assert!(cast.line_length() <= cast.max_line_length());
        }
        assert!(cast.is_deployed(), "only reel_in clears the deployed flag");
    }

    #[test]
    fn test_hook_follows_lateral_axis_and_depth() {
        let mut cast = line();
        let origin = Vec3::new(5.0, 0.2, -3.0);
        cast.begin_cast(origin);
        for _ in 0..20 {
            cast.advance(origin, Quat::IDENTITY);
        }
        let hook = cast.hook_position();
        assert!((hook.x - 3.0).abs() < 1e-4, "port side is -X, got {:?}", hook);
        assert!((hook.z + 3.0).abs() < 1e-4);
        assert_eq!(hook.y, CastConfig::default().hook_depth);
    }

    #[test]
    fn test_turning_caster_reaims_hook_mid_cast() {
        let mut cast = line();
        cast.begin_cast(Vec3::ZERO);
        for _ in 0..10 {
            cast.advance(Vec3::ZERO, Quat::IDENTITY);
        }
        // Quarter turn to port: local -X now points along +Z.
        cast.advance(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));
        let hook = cast.hook_position();
        assert!(hook.x.abs() < 1e-4, "hook swung with the boat: {:?}", hook);
        assert!((hook.z - 1.1).abs() < 1e-4, "hook swung with the boat: {:?}", hook);
    }

    #[test]
    fn test_begin_cast_while_deployed_keeps_length() {
        let mut cast = line();
        cast.begin_cast(Vec3::ZERO);
        cast.advance(Vec3::ZERO, Quat::IDENTITY);
        cast.begin_cast(Vec3::new(9.0, 0.0, 9.0));
        assert!((cast.line_length() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_reel_in_is_idempotent() {
        let mut cast = line();
        cast.begin_cast(Vec3::ZERO);
        cast.advance(Vec3::ZERO, Quat::IDENTITY);

        cast.reel_in();
        let once = (cast.is_deployed(), cast.line_length(), cast.hook_position());
        cast.reel_in();
        let twice = (cast.is_deployed(), cast.line_length(), cast.hook_position());

        assert_eq!(once, twice);
        assert!(!cast.is_deployed());
        assert_eq!(cast.line_length(), 0.0);
    }

    #[test]
    fn test_line_points_only_while_deployed() {
        let mut cast = line();
        assert!(cast.line_points(Vec3::ZERO, Quat::IDENTITY).is_none());
        cast.begin_cast(Vec3::ZERO);
        let [tip, hook] = cast
            .line_points(Vec3::ZERO, Quat::IDENTITY)
            .expect("line is out");
        assert_eq!(tip, CastConfig::default().rod_tip_offset());
        assert_eq!(hook, Vec3::ZERO);
    }
}
