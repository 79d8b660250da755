use bevy::prelude::*;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyBindings>()
            .init_resource::<PlayerInput>()
            .add_event::<FishActionEvent>()
            .add_systems(PreUpdate, (read_movement_input, emit_fish_action_edges));
    }
}

/// Steering and throttle from WASD or the arrow keys.
fn read_movement_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<PlayerInput>,
) {
    let mut axis = Vec2::ZERO;
    if keys.pressed(bindings.throttle_forward) || keys.pressed(KeyCode::ArrowUp) {
        axis.y += 1.0;
    }
    if keys.pressed(bindings.throttle_reverse) || keys.pressed(KeyCode::ArrowDown) {
        axis.y -= 1.0;
    }
    if keys.pressed(bindings.steer_left) || keys.pressed(KeyCode::ArrowLeft) {
        axis.x -= 1.0;
    }
    if keys.pressed(bindings.steer_right) || keys.pressed(KeyCode::ArrowRight) {
        axis.x += 1.0;
    }
    input.move_axis = if axis != Vec2::ZERO {
        axis.normalize()
    } else {
        Vec2::ZERO
    };
}

/// Turns the fish keys into press/release edges. Either binding counts;
/// holding both and letting go of one is still a hold.
fn emit_fish_action_edges(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut was_down: Local<bool>,
    mut actions: EventWriter<FishActionEvent>,
) {
    let down = keys.any_pressed([bindings.fish, bindings.fish_alt]);
    if down == *was_down {
        return;
    }
    *was_down = down;
    actions.send(if down {
        FishActionEvent::Pressed
    } else {
        FishActionEvent::Released
    });
}
