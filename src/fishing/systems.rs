//! ECS glue between Bevy and the `FishingEngine` resource. All three run
//! chained in `FixedUpdate`, one engine tick per fixed step.

use bevy::prelude::*;

use crate::shared::*;
use super::engine::{FishingEngine, FishingEvent, FishingSnapshot};

/// Hand every fish-action edge since the last fixed step to the engine.
pub fn buffer_fish_actions(
    mut actions: EventReader<FishActionEvent>,
    mut engine: ResMut<FishingEngine>,
) {
    for action in actions.read() {
        match action {
            FishActionEvent::Pressed => engine.press(),
            FishActionEvent::Released => engine.release(),
        }
    }
}

pub fn tick_fishing_engine(
    mut engine: ResMut<FishingEngine>,
    mut snapshot: ResMut<FishingSnapshot>,
    casters: Query<&Transform, With<Caster>>,
) {
    let pose = casters.get_single().ok().map(CasterPose::from_transform);
    *snapshot = engine.tick(pose);
}

/// Forward the engine outbox as Bevy events.
pub fn publish_fishing_events(
    mut engine: ResMut<FishingEngine>,
    mut status_events: EventWriter<FishingStatusEvent>,
    mut outcome_events: EventWriter<FishingOutcomeEvent>,
    mut cleared_events: EventWriter<FishingResultClearedEvent>,
) {
    for event in engine.drain_events() {
        match event {
            FishingEvent::Status(message) => {
                status_events.send(FishingStatusEvent {
                    message: Some(message),
                });
            }
            FishingEvent::StatusCleared => {
                status_events.send(FishingStatusEvent { message: None });
            }
            FishingEvent::Outcome(outcome) => {
                outcome_events.send(FishingOutcomeEvent { outcome });
            }
            FishingEvent::ResultCleared => {
                cleared_events.send(FishingResultClearedEvent);
            }
        }
    }
}
