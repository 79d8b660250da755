//! Single status line along the bottom of the screen.

use bevy::prelude::*;
use crate::shared::*;

#[derive(Component)]
pub struct StatusLine;

pub fn spawn_status_line(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(12.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
            PickingBehavior::IGNORE,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.95, 0.9)),
                Visibility::Hidden,
                StatusLine,
            ));
        });
}

/// Latest status event wins; `None` hides the line.
pub fn update_status_line(
    mut events: EventReader<FishingStatusEvent>,
    mut lines: Query<(&mut Text, &mut Visibility), With<StatusLine>>,
) {
    let Some(latest) = events.read().last() else {
        return;
    };
    let Ok((mut text, mut visibility)) = lines.get_single_mut() else {
        return;
    };
    match &latest.message {
        Some(message) => {
            text.0 = message.clone();
            *visibility = Visibility::Visible;
        }
        None => {
            text.0.clear();
            *visibility = Visibility::Hidden;
        }
    }
}
