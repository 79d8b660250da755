//! Endings of a fishing attempt: challenge results, escapes, reel-in, and
//! the scheduled continuations that finish them.

use bevy::prelude::*;

use crate::shared::*;
use super::clock::DeferredAction;
use super::engine::{FishingEngine, FishingEvent, STATUS_TOO_SLOW};
use super::rhythm::ChallengeResult;

impl FishingEngine {
    /// Pull the line in and return to idle from any state. Drops the fish,
    /// the challenge, every running timer and a pending scheduled reel-in.
    /// Calling it again changes nothing and emits nothing.
    pub fn reel_in(&mut self) {
        if self.state != FishingState::Idle || self.cast.is_deployed() {
            info!("[Fishing] Reeling in from {:?}", self.state);
        }
        self.cast.reel_in();
        self.challenge.cancel();
        self.current_fish = None;
        self.wait_deadline = None;
        self.bite_deadline = None;
        self.deferred
            .cancel(|action| matches!(action, DeferredAction::ReelIn));
        self.transition(FishingState::Idle);
        self.clear_status();
    }

    /// Reel in and forget any edges not yet applied.
    pub fn reset(&mut self) {
        self.pending_edges.clear();
        self.reel_in();
    }

    /// The reaction window closed without a strike.
    pub(super) fn escape(&mut self) {
        self.bite_deadline = None;
        let Some(archetype) = self.current_fish.as_ref().map(|f| f.archetype) else {
            self.reel_in();
            return;
        };
        info!("[Fishing] {} fish escaped before the strike", archetype.label());
        self.set_status(STATUS_TOO_SLOW);
        self.record_outcome(CatchOutcome::Escaped(archetype));
        self.transition(FishingState::Reeling);

        let fire_at = self.clock.deadline_after(self.config.escape_reel_delay_secs);
        self.deferred.schedule(fire_at, DeferredAction::ReelIn);
    }

    pub(super) fn resolve_challenge(&mut self, result: ChallengeResult) {
        let archetype = self.current_fish.as_ref().map(|f| f.archetype);
        self.reel_in();
        let Some(archetype) = archetype else {
            warn!("[Fishing] Challenge resolved with no fish on the line");
            return;
        };

        let outcome = match result {
            ChallengeResult::Success => CatchOutcome::Caught(archetype),
            ChallengeResult::Failure => CatchOutcome::ChallengeFailed(archetype),
        };
        info!("[Fishing] Challenge {:?}: {:?}", result, outcome);
        self.set_status(&outcome.message());
        self.record_outcome(outcome);
    }

    fn record_outcome(&mut self, outcome: CatchOutcome) {
        self.result_generation += 1;
        self.last_result = Some(outcome);
        self.events.push(FishingEvent::Outcome(outcome));

        let fire_at = self.clock.deadline_after(self.config.result_display_secs);
        self.deferred.schedule(
            fire_at,
            DeferredAction::ClearResult {
                generation: self.result_generation,
            },
        );
    }

    pub(super) fn fire_deferred(&mut self, now: u64) {
        while let Some(action) = self.deferred.pop_due(now) {
            match action {
                DeferredAction::ReelIn => {
                    if self.state == FishingState::Reeling {
                        self.reel_in();
                    }
                }
                DeferredAction::ClearResult { generation } => {
                    if generation != self.result_generation {
                        continue;
                    }
                    if let Some(outcome) = self.last_result.take() {
                        // Only hide the status line if it still shows this result.
                        if self.status.as_deref() == Some(outcome.message().as_str()) {
                            self.clear_status();
                        }
                        self.events.push(FishingEvent::ResultCleared);
                    }
                }
            }
        }
    }
}
