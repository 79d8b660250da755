use bevy::prelude::*;

use crate::shared::*;

// ─── Sub-modules ────────────────────────────────────────────────────────────
mod cast;
mod clock;
mod config;
mod engine;
mod fish_select;
mod render;
mod resolve;
mod rhythm;
mod systems;

pub use cast::*;
pub use clock::*;
pub use config::*;
pub use engine::*;
pub use fish_select::*;
pub use render::*;
pub use rhythm::*;
pub use systems::*;

// ─── Plugin ─────────────────────────────────────────────────────────────────

/// Runs the fishing engine on the fixed timestep.
///
/// Insert a `FishingConfig` before adding the plugin to override the
/// defaults; the fixed timestep is taken from its tick rate.
pub struct FishingPlugin;

impl Plugin for FishingPlugin {
    fn build(&self, app: &mut App) {
        let config = match app.world().get_resource::<FishingConfig>() {
            Some(config) => match config.validate() {
                Ok(()) => config.clone(),
                Err(e) => {
                    warn!("[Config] Rejected fishing config, using defaults: {}", e);
                    FishingConfig::default()
                }
            },
            None => FishingConfig::default(),
        };
        info!(
            "[Fishing] Engine at {} Hz, bite policy {:?}, cancel on {:?}",
            config.tick_rate_hz, config.bite_policy, config.cancel_edge
        );

        app.insert_resource(Time::<Fixed>::from_hz(config.tick_rate_hz as f64))
            .insert_resource(FishingEngine::new(config.clone()))
            .insert_resource(config)
            .init_resource::<FishingSnapshot>()
            // Events
            .add_event::<FishActionEvent>()
            .add_event::<FishingStatusEvent>()
            .add_event::<FishingOutcomeEvent>()
            .add_event::<FishingResultClearedEvent>()
            .add_systems(
                FixedUpdate,
                (
                    systems::buffer_fish_actions,
                    systems::tick_fishing_engine,
                    systems::publish_fishing_events,
                )
                    .chain(),
            );
    }
}
