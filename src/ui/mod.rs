mod status;
mod toast;

use bevy::prelude::*;
use crate::shared::*;

pub use status::StatusLine;
pub use toast::{ToastContainer, ToastItem};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ToastEvent>()
            .add_event::<FishingStatusEvent>()
            .add_event::<FishingOutcomeEvent>()
            .add_event::<FishingResultClearedEvent>();

        // ─── STATUS LINE ───
        app.add_systems(Startup, status::spawn_status_line);
        app.add_systems(Update, status::update_status_line);

        // ─── TOASTS ───
        app.add_systems(Startup, toast::spawn_toast_container);
        app.add_systems(
            Update,
            (
                toast::wire_outcome_toasts,
                toast::handle_toast_events,
                toast::expire_outcome_toasts,
                toast::update_toasts,
            )
                .chain(),
        );
    }
}
