//! The fishing state machine.
//!
//! ```text
//!  Idle ──press──▶ Casting ──line out──▶ Waiting ──bite check──▶ Bite
//!   ▲                 │                    │                    │   │
//!   │◀──cancel edge───┘◀───cancel edge─────┘          press ────┘   └── window expires
//!   │                                                   │                  │
//!   │◀────────────── resolved ─────────────────── Minigame              Reeling
//!   │◀──────────────────────────── scheduled reel-in ─────────────────────┘
//! ```
//!
//! The engine owns its config, RNG and logical clock. Callers hand it the
//! caster pose once per fixed tick and read back a `FishingSnapshot`; input
//! edges may arrive at any time and are applied at the start of the next tick.

use std::collections::VecDeque;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shared::*;
use super::cast::CastLine;
use super::clock::{DeferredQueue, SimClock};
use super::config::{BitePolicy, CancelEdge, FishingConfig};
use super::fish_select::{select_fish, Fish};
use super::rhythm::{RhythmChallenge, RhythmSnapshot};

pub const STATUS_CASTING: &str = "Casting line...";
pub const STATUS_WAITING: &str = "Waiting for a bite...";
pub const STATUS_BITE: &str = "Fish on the line! Strike now!";
pub const STATUS_HOOKED: &str = "Hooked! Hold through the long notes, tap the short ones.";
pub const STATUS_TOO_SLOW: &str = "Too slow! The fish got away...";

// ─── Outbox / snapshot ───────────────────────────────────────────────────────

/// Something observers should hear about, drained once per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum FishingEvent {
    Status(String),
    StatusCleared,
    Outcome(CatchOutcome),
    /// The displayed result timed out.
    ResultCleared,
}

/// Read-only view of the engine after a tick.
#[derive(Resource, Debug, Clone, PartialEq, Default)]
pub struct FishingSnapshot {
    pub state: FishingState,
    pub hook_position: Vec3,
    pub is_line_deployed: bool,
    /// Rod tip → hook, while a line is out.
    pub line: Option<[Vec3; 2]>,
    /// Only while the rhythm challenge runs.
    pub challenge: Option<RhythmSnapshot>,
    pub current_fish: Option<Fish>,
    pub last_result: Option<CatchOutcome>,
    pub status: Option<String>,
    pub tick: u64,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

#[derive(Resource)]
pub struct FishingEngine {
    pub(super) config: FishingConfig,
    pub(super) rng: StdRng,
    pub(super) clock: SimClock,
    pub(super) deferred: DeferredQueue,
    pub(super) state: FishingState,
    pub(super) cast: CastLine,
    pub(super) challenge: RhythmChallenge,
    pub(super) current_fish: Option<Fish>,
    /// Tick of the next bite check.
    pub(super) wait_deadline: Option<u64>,
    /// Tick the reaction window closes.
    pub(super) bite_deadline: Option<u64>,
    pub(super) pending_edges: VecDeque<FishActionEvent>,
    pub(super) held: bool,
    pub(super) pose: CasterPose,
    pub(super) status: Option<String>,
    pub(super) last_result: Option<CatchOutcome>,
    /// Bumped per result so a stale clear never wipes a newer one.
    pub(super) result_generation: u64,
    pub(super) events: Vec<FishingEvent>,
}

impl FishingEngine {
    /// Seeds from `config.seed`, or from OS entropy when unset.
    pub fn new(config: FishingConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_seed(config: FishingConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: FishingConfig, rng: StdRng) -> Self {
        Self {
            clock: SimClock::new(config.tick_rate_hz),
            cast: CastLine::new(config.cast.clone()),
            challenge: RhythmChallenge::new(config.rhythm.clone(), config.tick_secs()),
            config,
            rng,
            deferred: DeferredQueue::default(),
            state: FishingState::Idle,
            current_fish: None,
            wait_deadline: None,
            bite_deadline: None,
            pending_edges: VecDeque::new(),
            held: false,
            pose: CasterPose::default(),
            status: None,
            last_result: None,
            result_generation: 0,
            events: Vec::new(),
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────────

    /// Buffer a press edge of the fish action.
    pub fn press(&mut self) {
        self.pending_edges.push_back(FishActionEvent::Pressed);
    }

    /// Buffer a release edge of the fish action.
    pub fn release(&mut self) {
        self.pending_edges.push_back(FishActionEvent::Released);
    }

    // ─── Tick ────────────────────────────────────────────────────────────────

    /// Run one fixed step. Without a caster pose nothing advances, buffered
    /// edges included.
    pub fn tick(&mut self, pose: Option<CasterPose>) -> FishingSnapshot {
        let Some(pose) = pose else {
            debug!("[Fishing] No caster this tick; skipping");
            return self.snapshot();
        };
        self.pose = pose;
        let now = self.clock.advance();

        while let Some(edge) = self.pending_edges.pop_front() {
            self.apply_edge(edge);
        }
        self.fire_deferred(now);
        self.update_state(now);

        self.snapshot()
    }

    fn apply_edge(&mut self, edge: FishActionEvent) {
        match edge {
            FishActionEvent::Pressed => {
                self.held = true;
                self.on_press();
            }
            FishActionEvent::Released => {
                self.held = false;
                self.on_release();
            }
        }
    }

    fn on_press(&mut self) {
        match self.state {
            FishingState::Idle => {
                self.cast.begin_cast(self.pose.position);
                self.transition(FishingState::Casting);
                self.set_status(STATUS_CASTING);
            }
            FishingState::Casting | FishingState::Waiting => {
                if self.config.cancel_edge == CancelEdge::Press {
                    self.reel_in();
                }
            }
            FishingState::Bite => self.strike(),
            FishingState::Minigame => {
                let now = self.clock.seconds();
                if self.challenge.press(now) {
                    debug!("[Fishing] Tap note hit at {:.3}s", now);
                }
            }
            FishingState::Reeling => {}
        }
    }

    fn on_release(&mut self) {
        if matches!(self.state, FishingState::Casting | FishingState::Waiting)
            && self.config.cancel_edge == CancelEdge::Release
        {
            self.reel_in();
        }
    }

    fn update_state(&mut self, now: u64) {
        match self.state {
            FishingState::Idle | FishingState::Reeling => {}
            FishingState::Casting => self.update_casting(),
            FishingState::Waiting => self.update_waiting(now),
            FishingState::Bite => {
                if self.bite_deadline.is_some_and(|deadline| now >= deadline) {
                    self.escape();
                }
            }
            FishingState::Minigame => {
                let now_secs = self.clock.seconds();
                if let Some(result) = self.challenge.update(now_secs, self.held, &mut self.rng) {
                    self.resolve_challenge(result);
                }
            }
        }
    }

    fn update_casting(&mut self) {
        if !self.cast.is_deployed() {
            self.cast.begin_cast(self.pose.position);
        }
        let complete = self.cast.advance(self.pose.position, self.pose.orientation);
        if complete {
            let (lo, hi) = self.config.wait_range;
            let wait = self.rng.gen_range(lo..=hi);
            self.wait_deadline = Some(self.clock.deadline_after(wait));
            self.transition(FishingState::Waiting);
            self.set_status(STATUS_WAITING);
            debug!("[Fishing] Bite check in {:.2}s", wait);
        }
    }

    fn update_waiting(&mut self, now: u64) {
        if !self.wait_deadline.is_some_and(|deadline| now >= deadline) {
            return;
        }
        let fish = select_fish(&mut self.rng);
        let bites = match self.config.bite_policy {
            BitePolicy::Always => true,
            BitePolicy::Reroll => self.rng.gen_bool(fish.bite_chance.clamp(0.0, 1.0) as f64),
        };

        if bites {
            let window = self
                .config
                .reaction_window_secs
                .unwrap_or(fish.escape_timeout_secs);
            info!(
                "[Fishing] {} fish {} bit; {:.2}s to strike",
                fish.archetype.label(),
                fish.id,
                window
            );
            self.wait_deadline = None;
            self.bite_deadline = Some(self.clock.deadline_after(window));
            self.current_fish = Some(fish);
            self.transition(FishingState::Bite);
            self.set_status(STATUS_BITE);
        } else {
            let (lo, hi) = self.config.reroll_wait_range;
            let wait = self.rng.gen_range(lo..=hi);
            self.wait_deadline = Some(self.clock.deadline_after(wait));
            debug!(
                "[Fishing] {} fish nibbled and left; next check in {:.2}s",
                fish.archetype.label(),
                wait
            );
        }
    }

    fn strike(&mut self) {
        let Some(difficulty) = self.current_fish.as_ref().map(|f| f.archetype.difficulty()) else {
            return;
        };
        self.bite_deadline = None;
        let now = self.clock.seconds();
        self.challenge.start(difficulty, now, &mut self.rng);
        self.transition(FishingState::Minigame);
        self.set_status(STATUS_HOOKED);
    }

    pub(super) fn transition(&mut self, to: FishingState) {
        if self.state != to {
            info!("[Fishing] {:?} -> {:?} (tick {})", self.state, to, self.clock.tick());
            self.state = to;
        }
    }

    pub(super) fn set_status(&mut self, message: &str) {
        self.status = Some(message.to_string());
        self.events.push(FishingEvent::Status(message.to_string()));
    }

    pub(super) fn clear_status(&mut self) {
        if self.status.take().is_some() {
            self.events.push(FishingEvent::StatusCleared);
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> FishingSnapshot {
        FishingSnapshot {
            state: self.state,
            hook_position: self.cast.hook_position(),
            is_line_deployed: self.cast.is_deployed(),
            line: self
                .cast
                .line_points(self.pose.position, self.pose.orientation),
            challenge: (self.state == FishingState::Minigame).then(|| self.challenge.snapshot()),
            current_fish: self.current_fish.clone(),
            last_result: self.last_result,
            status: self.status.clone(),
            tick: self.clock.tick(),
        }
    }

    /// Take everything observers have not seen yet.
    pub fn drain_events(&mut self) -> Vec<FishingEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> FishingState {
        self.state
    }

    pub fn current_fish(&self) -> Option<&Fish> {
        self.current_fish.as_ref()
    }

    pub fn last_result(&self) -> Option<CatchOutcome> {
        self.last_result
    }

    /// Whether the fish action is down, as far as the delivered edges say.
    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn tick_count(&self) -> u64 {
        self.clock.tick()
    }

    pub fn config(&self) -> &FishingConfig {
        &self.config
    }
}
