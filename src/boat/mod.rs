//! The demo boat: the caster the line is thrown from.
//!
//! The simulated hull is a bare `Transform` in world space (Y-up, forward
//! is -Z). A separate sprite mirrors it onto the top-down screen plane, so
//! the fishing engine never sees rendering coordinates.

use bevy::prelude::*;

use crate::fishing::FishingSnapshot;
use crate::shared::*;

/// Metres per second at full throttle.
const BOAT_SPEED: f32 = 1.5;
/// Radians per second at full rudder.
const BOAT_TURN_RATE: f32 = 1.2;
const BOAT_SIZE: Vec2 = Vec2::new(28.0, 64.0);
const Z_BOAT: f32 = 10.0;

const COLOR_HULL: Color = Color::srgb(0.55, 0.35, 0.2);

#[derive(Component, Debug, Default)]
pub struct Boat;

/// Screen-space stand-in for the boat.
#[derive(Component, Debug, Default)]
pub struct BoatSprite;

pub struct BoatPlugin;

impl Plugin for BoatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .add_systems(Startup, spawn_boat)
            .add_systems(
                Update,
                (steer_boat, sync_boat_sprite, follow_boat_with_camera).chain(),
            );
    }
}

fn spawn_boat(mut commands: Commands) {
    commands.spawn((Transform::default(), Boat, Caster));
    commands.spawn((
        Sprite {
            color: COLOR_HULL,
            custom_size: Some(BOAT_SIZE),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, Z_BOAT),
        BoatSprite,
    ));
    info!("[Boat] Spawned at the origin, heading north");
}

/// Throttle moves along the hull's forward axis; steering yaws about +Y.
/// The helm is locked while a fish is being fought.
fn steer_boat(
    time: Res<Time>,
    input: Res<PlayerInput>,
    snapshot: Option<Res<FishingSnapshot>>,
    mut boats: Query<&mut Transform, With<Boat>>,
) {
    if snapshot.is_some_and(|s| s.state == FishingState::Minigame) {
        return;
    }
    let Ok(mut transform) = boats.get_single_mut() else {
        return;
    };
    let dt = time.delta_secs();

    transform.rotate_y(-input.move_axis.x * BOAT_TURN_RATE * dt);
    let forward = transform.rotation * Vec3::NEG_Z;
    transform.translation += forward * input.move_axis.y * BOAT_SPEED * dt;
}

fn sync_boat_sprite(
    boats: Query<&Transform, (With<Boat>, Without<BoatSprite>)>,
    mut sprites: Query<&mut Transform, (With<BoatSprite>, Without<Boat>)>,
) {
    let (Ok(boat), Ok(mut sprite)) = (boats.get_single(), sprites.get_single_mut()) else {
        return;
    };
    sprite.translation = world_to_screen(boat.translation, Z_BOAT);
    sprite.rotation = heading_to_screen(boat.rotation);
}

fn follow_boat_with_camera(
    sprites: Query<&Transform, (With<BoatSprite>, Without<Camera2d>)>,
    mut cameras: Query<&mut Transform, (With<Camera2d>, Without<BoatSprite>)>,
) {
    let (Ok(sprite), Ok(mut camera)) = (sprites.get_single(), cameras.get_single_mut()) else {
        return;
    };
    camera.translation.x = sprite.translation.x;
    camera.translation.y = sprite.translation.y;
}
