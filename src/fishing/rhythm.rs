//! Rhythm challenge: the skill check between a bite and a catch.
//!
//!  ──────────┬──────────────────────────────────────────────
//!   hit line │ [====hold====]  [tap]  [=====hold=====]   →
//!  ──────────┴──────────────────────────────────────────────
//!  [██████░░░░░░░░░░|░░░░]  ← progress, `|` marks the target
//!
//! A rolling stream of notes scrolls past. Holding the action inside a hold
//! note fills progress; holding outside one drains it fast; letting go
//! drains it slowly. Striking inside a tap note's short window grants a
//! flat bonus. Reach the target to land the fish, drop to the floor and it
//! gets away.

use rand::Rng;

use crate::shared::Difficulty;
use super::config::RhythmConfig;

// ─── Notes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Hold,
    Tap,
}

/// One note on the challenge timeline (seconds since the challenge began).
#[derive(Debug, Clone, PartialEq)]
pub struct RhythmNote {
    pub start_time: f64,
    pub duration: f64,
    pub kind: NoteKind,
    /// Set once, when a tap lands inside the window.
    pub hit: bool,
}

impl RhythmNote {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether `time` falls inside `[start, start + duration]`.
    pub fn is_active_at(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeResult {
    Success,
    Failure,
}

/// Read-only view for the rhythm track UI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RhythmSnapshot {
    pub notes: Vec<RhythmNote>,
    pub current_time: f64,
    pub progress: f32,
    pub target_progress: f32,
    pub is_holding: bool,
}

// ─── Challenge ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RhythmChallenge {
    config: RhythmConfig,
    /// Fixed tick length; per-second rates are scaled by this.
    tick_secs: f32,
    active: bool,
    origin: f64,
    current_time: f64,
    progress: f32,
    target_progress: f32,
    notes: Vec<RhythmNote>,
    is_holding: bool,
    last_start: f64,
    last_end: f64,
    last_kind: Option<NoteKind>,
}

impl RhythmChallenge {
    pub fn new(config: RhythmConfig, tick_secs: f32) -> Self {
        Self {
            progress: config.start_progress,
            target_progress: config.easy_target,
            config,
            tick_secs,
            active: false,
            origin: 0.0,
            current_time: 0.0,
            notes: Vec::new(),
            is_holding: false,
            last_start: f64::NEG_INFINITY,
            last_end: 0.0,
            last_kind: None,
        }
    }

    /// Begin a fresh challenge with its clock origin at `now`.
    pub fn start(&mut self, difficulty: Difficulty, now: f64, rng: &mut impl Rng) {
        self.active = true;
        self.origin = now;
        self.current_time = 0.0;
        self.progress = self.config.start_progress;
        self.target_progress = self.config.target_for(difficulty);
        self.notes.clear();
        self.is_holding = false;
        self.last_start = f64::NEG_INFINITY;
        self.last_end = 0.0;
        self.last_kind = None;

        for _ in 0..self.config.initial_notes {
            self.generate_note(rng);
        }
    }

    /// Advance one tick. Returns the result on the tick the challenge
    /// resolves and `None` otherwise, including every tick after.
    pub fn update(&mut self, now: f64, holding: bool, rng: &mut impl Rng) -> Option<ChallengeResult> {
        if !self.active {
            return None;
        }

        let time = now - self.origin;
        self.current_time = time;
        self.is_holding = holding;

        self.extend_horizon(time, rng);
        self.evict_old_notes(time);
        self.integrate_progress(time);

        if self.progress >= self.target_progress {
            self.active = false;
            return Some(ChallengeResult::Success);
        }
        if self.progress <= self.config.progress_floor {
            self.active = false;
            return Some(ChallengeResult::Failure);
        }
        None
    }

    /// Press edge of the watched action. Marks the first open tap note under
    /// `now` as hit and grants the tap bonus. Returns whether a tap landed.
    pub fn press(&mut self, now: f64) -> bool {
        if !self.active {
            return false;
        }
        let time = now - self.origin;
        let Some(note) = self
            .notes
            .iter_mut()
            .find(|note| note.kind == NoteKind::Tap && !note.hit && note.is_active_at(time))
        else {
            return false;
        };
        note.hit = true;
        let bonus = self.config.tap_bonus;
        self.add_progress(bonus);
        true
    }

    /// Abandon the challenge without a result.
    pub fn cancel(&mut self) {
        self.active = false;
        self.notes.clear();
        self.is_holding = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target_progress(&self) -> f32 {
        self.target_progress
    }

    pub fn notes(&self) -> &[RhythmNote] {
        &self.notes
    }

    pub fn snapshot(&self) -> RhythmSnapshot {
        RhythmSnapshot {
            notes: self.notes.clone(),
            current_time: self.current_time,
            progress: self.progress,
            target_progress: self.target_progress,
            is_holding: self.is_holding,
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────────

    fn extend_horizon(&mut self, time: f64, rng: &mut impl Rng) {
        let lookahead = self.config.lookahead_secs as f64;
        while self.last_start - time < lookahead {
            self.generate_note(rng);
        }
    }

    fn evict_old_notes(&mut self, time: f64) {
        let cutoff = time - self.config.eviction_secs as f64;
        self.notes.retain(|note| note.end_time() > cutoff);
    }

    fn generate_note(&mut self, rng: &mut impl Rng) {
        let cfg = &self.config;
        let start_time = match self.last_kind {
            Some(_) => {
                let (lo, hi) = cfg.gap_range;
                self.last_end + rng.gen_range(lo..=hi) as f64
            }
            None => cfg.first_note_offset as f64,
        };

        let after_tap = cfg.no_consecutive_taps && self.last_kind == Some(NoteKind::Tap);
        let kind = if after_tap || rng.gen_bool(cfg.hold_probability) {
            NoteKind::Hold
        } else {
            NoteKind::Tap
        };
        let duration = match kind {
            NoteKind::Hold => {
                let (lo, hi) = cfg.hold_duration_range;
                rng.gen_range(lo..=hi) as f64
            }
            NoteKind::Tap => cfg.tap_window as f64,
        };

        let note = RhythmNote {
            start_time,
            duration,
            kind,
            hit: false,
        };
        self.last_start = note.start_time;
        self.last_end = note.end_time();
        self.last_kind = Some(kind);
        self.notes.push(note);
    }

    fn integrate_progress(&mut self, time: f64) {
        let cfg = &self.config;
        let rate = if self.is_holding {
            let in_hold_note = self
                .notes
                .iter()
                .any(|note| note.kind == NoteKind::Hold && !note.hit && note.is_active_at(time));
            if in_hold_note {
                cfg.hold_rate
            } else {
                -cfg.wrong_hold_penalty
            }
        } else {
            -cfg.idle_decay
        };
        self.add_progress(rate * self.tick_secs);
    }

    fn add_progress(&mut self, delta: f32) {
        self.progress =
            (self.progress + delta).clamp(self.config.progress_floor, self.config.progress_ceiling);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TICK: f64 = 1.0 / 60.0;

    fn started(config: RhythmConfig, seed: u64) -> (RhythmChallenge, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut challenge = RhythmChallenge::new(config, TICK as f32);
        challenge.start(Difficulty::Easy, 0.0, &mut rng);
        (challenge, rng)
    }

    /// Hold exactly when the next tick lands inside a hold note.
    fn wants_hold(challenge: &RhythmChallenge, next_time: f64) -> bool {
        const MARGIN: f64 = 1e-6;
        challenge.notes().iter().any(|note| {
            note.kind == NoteKind::Hold
                && next_time >= note.start_time + MARGIN
                && next_time <= note.end_time() - MARGIN
        })
    }

    #[test]
    fn test_start_sets_progress_target_and_initial_notes() {
        let (challenge, _) = started(RhythmConfig::default(), 1);
        assert!(challenge.is_active());
        assert_eq!(challenge.progress(), 25.0);
        assert_eq!(challenge.target_progress(), 70.0);
        assert_eq!(challenge.notes().len(), 5);
        assert_eq!(challenge.notes()[0].start_time, 1.0);
    }

    #[test]
    fn test_notes_sorted_with_gaps_and_no_double_taps() {
        let (mut challenge, mut rng) = started(RhythmConfig::default(), 3);
        for tick in 1..=600 {
            if challenge.update(tick as f64 * TICK, false, &mut rng).is_some() {
                break;
            }
            for pair in challenge.notes().windows(2) {
                let gap = pair[1].start_time - pair[0].end_time();
                assert!(gap >= 0.1 - 1e-6 && gap <= 0.5 + 1e-6, "gap {}", gap);
                assert!(
                    !(pair[0].kind == NoteKind::Tap && pair[1].kind == NoteKind::Tap),
                    "two taps back to back"
                );
            }
        }
    }

    #[test]
    fn test_horizon_kept_full_and_old_notes_evicted() {
        let (mut challenge, mut rng) = started(RhythmConfig::default(), 8);
        // Hold inside every hold window so the challenge survives 4 seconds.
        let mut holding = false;
        for tick in 1..=240 {
            let now = tick as f64 * TICK;
            if challenge.update(now, holding, &mut rng).is_some() {
                break;
            }
            let last = challenge.notes().last().expect("stream never empties");
            assert!(last.start_time - now >= 5.0, "lookahead breached at {}", now);
            assert!(challenge
                .notes()
                .iter()
                .all(|note| note.end_time() > now - 5.0));
            holding = wants_hold(&challenge, now + TICK);
        }
    }

    #[test]
    fn test_idle_challenge_decays_to_failure_once() {
        let (mut challenge, mut rng) = started(RhythmConfig::default(), 4);
        let mut results = Vec::new();
        let mut previous = challenge.progress();
        for tick in 1..=600 {
            if let Some(result) = challenge.update(tick as f64 * TICK, false, &mut rng) {
                results.push(result);
            }
            assert!(challenge.progress() <= previous, "idle progress never rises");
            previous = challenge.progress();
        }
        assert_eq!(results, vec![ChallengeResult::Failure]);
        assert!(!challenge.is_active());
        assert_eq!(challenge.progress(), 0.0);
    }

    #[test]
    fn test_holding_every_hold_window_wins_once() {
        let config = RhythmConfig {
            start_progress: 40.0,
            ..RhythmConfig::default()
        };
        let (mut challenge, mut rng) = started(config, 21);
        let mut results = Vec::new();
        let mut holding = false;
        for tick in 1..=3600 {
            if let Some(result) = challenge.update(tick as f64 * TICK, holding, &mut rng) {
                results.push(result);
            }
            if !challenge.is_active() {
                continue;
            }
            assert!(challenge.progress() > 0.0);
            holding = wants_hold(&challenge, (tick + 1) as f64 * TICK);
        }
        assert_eq!(results, vec![ChallengeResult::Success]);
        assert!(challenge.progress() >= 70.0);
    }

    #[test]
    fn test_holding_outside_notes_drains_faster_than_idle() {
        let (mut held, mut rng_a) = started(RhythmConfig::default(), 6);
        let (mut idle, mut rng_b) = started(RhythmConfig::default(), 6);
        // First note starts at 1.0s; stay well before it.
        for tick in 1..=30 {
            held.update(tick as f64 * TICK, true, &mut rng_a);
            idle.update(tick as f64 * TICK, false, &mut rng_b);
        }
        assert!((held.progress() - (25.0 - 20.0 * 0.5)).abs() < 1e-3);
        assert!((idle.progress() - (25.0 - 5.0 * 0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_tap_inside_window_grants_bonus_once() {
        let config = RhythmConfig {
            hold_probability: 0.0,
            no_consecutive_taps: false,
            ..RhythmConfig::default()
        };
        let (mut challenge, _) = started(config, 2);
        let first = challenge.notes()[0].clone();
        assert_eq!(first.kind, NoteKind::Tap);

        let inside = first.start_time + first.duration / 2.0;
        let before = challenge.progress();
        assert!(challenge.press(inside));
        assert!((challenge.progress() - (before + 20.0)).abs() < 1e-4);
        assert!(challenge.notes()[0].hit);

        assert!(!challenge.press(inside), "a hit tap note cannot score twice");
        assert!(!challenge.press(first.start_time - 0.05), "early press misses");
    }

    #[test]
    fn test_progress_stays_clamped_for_any_input() {
        let config = RhythmConfig {
            progress_floor: -30.0,
            tap_bonus: 30.0,
            ..RhythmConfig::default()
        };
        let mut input_rng = StdRng::seed_from_u64(99);
        let (mut challenge, mut rng) = started(config.clone(), 12);
        let mut now = 0.0;
        for _ in 0..5000 {
            now += TICK;
            if input_rng.gen_bool(0.1) {
                challenge.press(now);
            }
            let holding = input_rng.gen_bool(0.5);
            if challenge.update(now, holding, &mut rng).is_some() {
                challenge.start(Difficulty::Hard, now, &mut rng);
            }
            assert!(challenge.progress() >= config.progress_floor);
            assert!(challenge.progress() <= config.progress_ceiling);
        }
    }

    #[test]
    fn test_cancel_stops_updates() {
        let (mut challenge, mut rng) = started(RhythmConfig::default(), 5);
        challenge.cancel();
        assert!(!challenge.is_active());
        assert_eq!(challenge.update(10.0, false, &mut rng), None);
        assert!(!challenge.press(1.0));
        assert!(challenge.notes().is_empty());
    }
}
