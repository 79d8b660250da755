//! Fishing tuning.
//!
//! Every constant the cast, bite, and rhythm logic reads lives in one
//! `FishingConfig` that travels into the engine at construction. Defaults
//! reproduce the boat game's feel; a RON or JSON file may override any
//! subset of fields (missing fields keep their defaults).
//!
//! ```ron
//! (
//!     tick_rate_hz: 60.0,
//!     bite_policy: Reroll,
//!     reaction_window_secs: None, // fall back to each fish's escape timeout
//!     rhythm: (tap_bonus: 25.0),
//! )
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::Difficulty;

// ─── Policies ────────────────────────────────────────────────────────────────

/// What happens when the bite timer runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BitePolicy {
    /// A fish always bites when the wait elapses.
    #[default]
    Always,
    /// The rolled fish bites with its own `bite_chance`; otherwise a shorter
    /// wait from `reroll_wait_range` is rolled and the check repeats.
    Reroll,
}

/// Which edge of the fish action reels the line back in while casting or waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CancelEdge {
    /// Press toggles: press to cast, press again to reel in.
    #[default]
    Press,
    /// Hold to keep the line out; letting go reels in.
    Release,
}

// ─── Cast ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    /// Metres of line at full cast.
    pub max_line_length: f32,
    /// Metres added per tick while casting. Fixed per tick, not per second.
    pub cast_speed: f32,
    /// Caster-local direction the hook travels (port side by default).
    pub lateral_axis: [f32; 3],
    /// Caster-local rod tip; the drawn line runs from here to the hook.
    pub rod_tip_offset: [f32; 3],
    /// Hook height relative to the water surface.
    pub hook_depth: f32,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            max_line_length: 2.0,
            cast_speed: 0.1,
            lateral_axis: [-1.0, 0.0, 0.0],
            rod_tip_offset: [-0.3, 0.6, 0.0],
            hook_depth: -0.001,
        }
    }
}

impl CastConfig {
    pub fn lateral_axis(&self) -> Vec3 {
        Vec3::from_array(self.lateral_axis)
    }

    pub fn rod_tip_offset(&self) -> Vec3 {
        Vec3::from_array(self.rod_tip_offset)
    }
}

// ─── Rhythm challenge ────────────────────────────────────────────────────────

/// Smallest timeline advance one note (its gap plus its length) may make.
pub const MIN_NOTE_STEP_SECS: f32 = 0.01;
pub const MAX_LOOKAHEAD_SECS: f32 = 60.0;
pub const MAX_INITIAL_NOTES: usize = 64;

/// Scoring and note-stream tuning for the rhythm challenge.
///
/// Rates are per second and are scaled by the fixed tick length, so the
/// challenge plays the same at any tick rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmConfig {
    pub start_progress: f32,
    /// Lower clamp bound; reaching it fails the challenge.
    pub progress_floor: f32,
    pub progress_ceiling: f32,
    pub easy_target: f32,
    pub medium_target: f32,
    pub hard_target: f32,
    /// Flat progress for striking a tap note inside its window.
    pub tap_bonus: f32,
    /// Gain per second while holding inside a hold note.
    pub hold_rate: f32,
    /// Loss per second while holding outside every hold note.
    pub wrong_hold_penalty: f32,
    /// Loss per second while not holding.
    pub idle_decay: f32,
    pub initial_notes: usize,
    /// Start time of the very first note.
    pub first_note_offset: f32,
    pub lookahead_secs: f32,
    pub eviction_secs: f32,
    pub gap_range: (f32, f32),
    pub hold_probability: f64,
    pub hold_duration_range: (f32, f32),
    /// Hit tolerance of a tap note.
    pub tap_window: f32,
    /// Force a hold note straight after every tap note.
    pub no_consecutive_taps: bool,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            start_progress: 25.0,
            progress_floor: 0.0,
            progress_ceiling: 100.0,
            easy_target: 70.0,
            medium_target: 80.0,
            hard_target: 90.0,
            tap_bonus: 20.0,
            hold_rate: 15.0,
            wrong_hold_penalty: 20.0,
            idle_decay: 5.0,
            initial_notes: 5,
            first_note_offset: 1.0,
            lookahead_secs: 5.0,
            eviction_secs: 5.0,
            gap_range: (0.1, 0.5),
            hold_probability: 0.7,
            hold_duration_range: (0.3, 0.8),
            tap_window: 0.1,
            no_consecutive_taps: true,
        }
    }
}

impl RhythmConfig {
    pub fn target_for(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Easy => self.easy_target,
            Difficulty::Medium => self.medium_target,
            Difficulty::Hard => self.hard_target,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.progress_ceiling <= self.progress_floor {
            return Err(format!(
                "rhythm.progress_ceiling ({}) must be above progress_floor ({})",
                self.progress_ceiling, self.progress_floor
            ));
        }
        if self.start_progress <= self.progress_floor || self.start_progress > self.progress_ceiling {
            return Err(format!(
                "rhythm.start_progress ({}) must lie in ({}, {}]",
                self.start_progress, self.progress_floor, self.progress_ceiling
            ));
        }
        for (name, target) in [
            ("easy_target", self.easy_target),
            ("medium_target", self.medium_target),
            ("hard_target", self.hard_target),
        ] {
            if target <= self.progress_floor || target > self.progress_ceiling {
                return Err(format!(
                    "rhythm.{} ({}) must lie in ({}, {}]",
                    name, target, self.progress_floor, self.progress_ceiling
                ));
            }
        }
        for (name, rate) in [
            ("tap_bonus", self.tap_bonus),
            ("hold_rate", self.hold_rate),
            ("wrong_hold_penalty", self.wrong_hold_penalty),
            ("idle_decay", self.idle_decay),
            ("first_note_offset", self.first_note_offset),
            ("lookahead_secs", self.lookahead_secs),
            ("eviction_secs", self.eviction_secs),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(format!("rhythm.{} must be a non-negative number, got {}", name, rate));
            }
        }
        let lowest_target = self.easy_target.min(self.medium_target).min(self.hard_target);
        if self.start_progress >= lowest_target {
            return Err(format!(
                "rhythm.start_progress ({}) must be below every target (lowest is {})",
                self.start_progress, lowest_target
            ));
        }
        check_range("rhythm.gap_range", self.gap_range, 0.0)?;
        check_range("rhythm.hold_duration_range", self.hold_duration_range, f32::EPSILON)?;
        if self.tap_window <= 0.0 {
            return Err(format!("rhythm.tap_window must be positive, got {}", self.tap_window));
        }
        // Each generated note must push the stream forward by a real amount,
        // or filling the lookahead never terminates.
        let min_step = self.gap_range.0 + self.tap_window.min(self.hold_duration_range.0);
        if min_step < MIN_NOTE_STEP_SECS {
            return Err(format!(
                "rhythm: shortest note plus shortest gap is {}s, must be at least {}s",
                min_step, MIN_NOTE_STEP_SECS
            ));
        }
        if self.lookahead_secs > MAX_LOOKAHEAD_SECS {
            return Err(format!(
                "rhythm.lookahead_secs ({}) must not exceed {}",
                self.lookahead_secs, MAX_LOOKAHEAD_SECS
            ));
        }
        if self.initial_notes > MAX_INITIAL_NOTES {
            return Err(format!(
                "rhythm.initial_notes ({}) must not exceed {}",
                self.initial_notes, MAX_INITIAL_NOTES
            ));
        }
        if !(0.0..=1.0).contains(&self.hold_probability) {
            return Err(format!(
                "rhythm.hold_probability must be within [0, 1], got {}",
                self.hold_probability
            ));
        }
        Ok(())
    }
}

// ─── Top-level config ────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishingConfig {
    /// Fixed simulation ticks per second.
    pub tick_rate_hz: f32,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub cast: CastConfig,
    /// Seconds before the first bite check after the cast lands.
    pub wait_range: (f32, f32),
    /// Seconds between bite checks after a miss under `BitePolicy::Reroll`.
    pub reroll_wait_range: (f32, f32),
    pub bite_policy: BitePolicy,
    pub cancel_edge: CancelEdge,
    /// Seconds to strike after a bite; `None` uses the fish's escape timeout.
    pub reaction_window_secs: Option<f32>,
    /// Pause between "fish got away" and the line coming back in.
    pub escape_reel_delay_secs: f32,
    /// How long a catch result stays on the snapshot.
    pub result_display_secs: f32,
    pub rhythm: RhythmConfig,
}

impl Default for FishingConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            seed: None,
            cast: CastConfig::default(),
            wait_range: (2.0, 7.0),
            reroll_wait_range: (1.0, 4.0),
            bite_policy: BitePolicy::default(),
            cancel_edge: CancelEdge::default(),
            reaction_window_secs: Some(1.0),
            escape_reel_delay_secs: 1.5,
            result_display_secs: 3.0,
            rhythm: RhythmConfig::default(),
        }
    }
}

impl FishingConfig {
    /// Length of one fixed tick in seconds.
    pub fn tick_secs(&self) -> f32 {
        1.0 / self.tick_rate_hz
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return Err(format!("tick_rate_hz must be positive, got {}", self.tick_rate_hz));
        }
        if self.cast.max_line_length <= 0.0 {
            return Err(format!(
                "cast.max_line_length must be positive, got {}",
                self.cast.max_line_length
            ));
        }
        if self.cast.cast_speed <= 0.0 {
            return Err(format!("cast.cast_speed must be positive, got {}", self.cast.cast_speed));
        }
        if self.cast.lateral_axis().length_squared() == 0.0 {
            return Err("cast.lateral_axis must not be the zero vector".to_string());
        }
        check_range("wait_range", self.wait_range, 0.0)?;
        check_range("reroll_wait_range", self.reroll_wait_range, 0.0)?;
        if let Some(window) = self.reaction_window_secs {
            if window <= 0.0 {
                return Err(format!("reaction_window_secs must be positive, got {}", window));
            }
        }
        if self.escape_reel_delay_secs < 0.0 || self.result_display_secs < 0.0 {
            return Err("escape_reel_delay_secs and result_display_secs must not be negative".to_string());
        }
        self.rhythm.validate()
    }

    pub fn from_ron_str(text: &str) -> Result<Self, String> {
        let config: Self =
            ron::from_str(text).map_err(|e| format!("Invalid fishing config (RON): {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| format!("Invalid fishing config (JSON): {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.ron` or `.json` tuning file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::from_ron_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(format!(
                "Unsupported config format {:?} for {}",
                other,
                path.display()
            )),
        }
    }
}

fn check_range(name: &str, (lo, hi): (f32, f32), min: f32) -> Result<(), String> {
    if !lo.is_finite() || !hi.is_finite() || lo < min || hi < lo {
        return Err(format!(
            "{} must satisfy {} <= lo <= hi, got ({}, {})",
            name, min, lo, hi
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(FishingConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_targets_follow_difficulty() {
        let rhythm = RhythmConfig::default();
        assert_eq!(rhythm.target_for(Difficulty::Easy), 70.0);
        assert_eq!(rhythm.target_for(Difficulty::Medium), 80.0);
        assert_eq!(rhythm.target_for(Difficulty::Hard), 90.0);
    }

    #[test]
    fn test_ron_partial_override_keeps_defaults() {
        let config = FishingConfig::from_ron_str(
            "(tick_rate_hz: 30.0, bite_policy: Reroll, reaction_window_secs: None, rhythm: (tap_bonus: 25.0))",
        )
        .expect("valid RON");

        assert_eq!(config.tick_rate_hz, 30.0);
        assert_eq!(config.bite_policy, BitePolicy::Reroll);
        assert_eq!(config.reaction_window_secs, None);
        assert_eq!(config.rhythm.tap_bonus, 25.0);
        assert_eq!(config.rhythm.hold_rate, 15.0, "untouched fields keep defaults");
        assert_eq!(config.cast, CastConfig::default());
    }

    #[test]
    fn test_json_config_parses() {
        let config = FishingConfig::from_json_str(
            r#"{ "cancel_edge": "Release", "wait_range": [3.0, 3.0], "seed": 7 }"#,
        )
        .expect("valid JSON");

        assert_eq!(config.cancel_edge, CancelEdge::Release);
        assert_eq!(config.wait_range, (3.0, 3.0));
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_inverted_wait_range_rejected() {
        let err = FishingConfig::from_ron_str("(wait_range: (7.0, 2.0))").unwrap_err();
        assert!(err.contains("wait_range"), "unexpected error: {}", err);
    }

    #[test]
    fn test_start_progress_at_floor_rejected() {
        let mut config = FishingConfig::default();
        config.rhythm.start_progress = config.rhythm.progress_floor;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_progress_at_target_rejected() {
        let mut config = FishingConfig::default();
        config.rhythm.start_progress = config.rhythm.easy_target;
        let err = config.validate().unwrap_err();
        assert!(err.contains("below every target"), "{}", err);

        // The lowest target counts, even if it is not the easy one.
        let mut config = FishingConfig::default();
        config.rhythm.hard_target = 50.0;
        config.rhythm.start_progress = 60.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_notes_that_never_advance_rejected() {
        let mut config = FishingConfig::default();
        config.rhythm.gap_range = (0.0, 0.0);
        config.rhythm.hold_probability = 0.0;
        config.rhythm.no_consecutive_taps = false;
        config.rhythm.tap_window = 1e-30;
        let err = config.validate().unwrap_err();
        assert!(err.contains("shortest note plus shortest gap"), "{}", err);

        // Tiny hold notes stall the stream just as well as tiny taps.
        let mut config = FishingConfig::default();
        config.rhythm.gap_range = (0.0, 0.5);
        config.rhythm.hold_duration_range = (1e-6, 0.8);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_lookahead_rejected() {
        let mut config = FishingConfig::default();
        config.rhythm.lookahead_secs = 1e30;
        let err = config.validate().unwrap_err();
        assert!(err.contains("lookahead_secs"), "{}", err);
    }

    #[test]
    fn test_huge_initial_batch_rejected() {
        let mut config = FishingConfig::default();
        config.rhythm.initial_notes = usize::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.contains("initial_notes"), "{}", err);
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut config = FishingConfig::default();
        config.tick_rate_hz = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_garbage_reports_format() {
        let err = FishingConfig::from_ron_str("not a config").unwrap_err();
        assert!(err.starts_with("Invalid fishing config (RON)"), "{}", err);
    }

    #[test]
    fn test_shipped_tuning_file_matches_defaults() {
        let config = FishingConfig::load(Path::new("assets/config/fishing.ron"))
            .expect("shipped tuning file parses");
        assert_eq!(config, FishingConfig::default());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = FishingConfig::load(Path::new("Cargo.toml")).unwrap_err();
        assert!(err.contains("Unsupported config format"), "{}", err);
    }
}
