//! Bobber, line, and rhythm track rendering. Reads `FishingSnapshot` only.

use bevy::prelude::*;

use crate::shared::*;
use super::{FishingConfig, FishingSnapshot, NoteKind, RhythmSnapshot};

// ─── Colors ───────────────────────────────────────────────────────────────────

const COLOR_BOBBER: Color = Color::srgb(0.95, 0.25, 0.2);
const COLOR_BOBBER_BITE: Color = Color::srgb(1.0, 0.85, 0.2);
const COLOR_LINE: Color = Color::srgba(0.92, 0.92, 0.88, 0.9);
const COLOR_TRACK_BG: Color = Color::srgba(0.05, 0.08, 0.12, 0.85);
const COLOR_HIT_ZONE: Color = Color::srgba(1.0, 1.0, 1.0, 0.35);
const COLOR_HIT_ZONE_HELD: Color = Color::srgba(0.3, 1.0, 0.5, 0.8);
const COLOR_HOLD_NOTE: Color = Color::srgb(0.2, 0.55, 0.95);
const COLOR_TAP_NOTE: Color = Color::srgb(0.98, 0.8, 0.2);
const COLOR_TAP_HIT: Color = Color::srgb(0.3, 0.9, 0.4);
const COLOR_PROGRESS_BG: Color = Color::srgb(0.25, 0.25, 0.25);
const COLOR_PROGRESS_FILL: Color = Color::srgb(0.1, 0.7, 0.95);
const COLOR_PROGRESS_NEAR: Color = Color::srgb(0.95, 0.85, 0.1);
const COLOR_TARGET: Color = Color::srgb(1.0, 1.0, 1.0);

// ─── Layout ───────────────────────────────────────────────────────────────────

const Z_LINE: f32 = 20.0;
const Z_BOBBER: f32 = 21.0;
const BOBBER_SIZE: f32 = 8.0;
const LINE_WIDTH: f32 = 1.5;

const TRACK_WIDTH: f32 = 600.0;
const TRACK_HEIGHT: f32 = 40.0;
const NOTE_HEIGHT: f32 = 24.0;
/// Scroll speed of the note stream.
const TRACK_PX_PER_SEC: f32 = 100.0;
/// Distance from the track's left edge to the hit line.
const HIT_ZONE_X: f32 = 100.0;
const PROGRESS_HEIGHT: f32 = 12.0;

// ─── Components ───────────────────────────────────────────────────────────────

#[derive(Component)]
pub struct Bobber;

#[derive(Component)]
pub struct FishingLine;

#[derive(Component)]
pub struct RhythmTrackRoot;

#[derive(Component)]
pub struct RhythmTrack;

#[derive(Component)]
pub struct RhythmHitZone;

#[derive(Component)]
pub struct RhythmNoteMarker;

#[derive(Component)]
pub struct ProgressFill;

#[derive(Component)]
pub struct ProgressTargetMarker;

// ─── Plugin ─────────────────────────────────────────────────────────────────

pub struct FishingRenderPlugin;

impl Plugin for FishingRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_line_sprites, spawn_rhythm_track))
            .add_systems(Update, (sync_line_sprites, animate_bobber, sync_rhythm_track));
    }
}

// ─── Line & bobber ────────────────────────────────────────────────────────────

fn spawn_line_sprites(mut commands: Commands) {
    commands.spawn((
        Sprite {
            color: COLOR_LINE,
            custom_size: Some(Vec2::new(1.0, LINE_WIDTH)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, Z_LINE),
        Visibility::Hidden,
        FishingLine,
    ));
    commands.spawn((
        Sprite {
            color: COLOR_BOBBER,
            custom_size: Some(Vec2::splat(BOBBER_SIZE)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, Z_BOBBER),
        Visibility::Hidden,
        Bobber,
    ));
}

fn sync_line_sprites(
    snapshot: Res<FishingSnapshot>,
    mut bobbers: Query<(&mut Transform, &mut Visibility, &mut Sprite), (With<Bobber>, Without<FishingLine>)>,
    mut lines: Query<(&mut Transform, &mut Visibility, &mut Sprite), (With<FishingLine>, Without<Bobber>)>,
) {
    if let Ok((mut transform, mut visibility, mut sprite)) = bobbers.get_single_mut() {
        if snapshot.is_line_deployed {
            *visibility = Visibility::Visible;
            transform.translation = world_to_screen(snapshot.hook_position, Z_BOBBER);
            sprite.color = if snapshot.state == FishingState::Bite {
                COLOR_BOBBER_BITE
            } else {
                COLOR_BOBBER
            };
        } else {
            *visibility = Visibility::Hidden;
        }
    }

    if let Ok((mut transform, mut visibility, mut sprite)) = lines.get_single_mut() {
        match snapshot.line {
            Some([tip, hook]) => {
                let from = world_to_screen(tip, Z_LINE).truncate();
                let to = world_to_screen(hook, Z_LINE).truncate();
                let span = to - from;
                *visibility = Visibility::Visible;
                transform.translation = ((from + to) / 2.0).extend(Z_LINE);
                transform.rotation = Quat::from_rotation_z(span.y.atan2(span.x));
                sprite.custom_size = Some(Vec2::new(span.length().max(1.0), LINE_WIDTH));
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

/// Bobbing while the hook waits; a hard twitch once something bites.
fn animate_bobber(
    time: Res<Time>,
    snapshot: Res<FishingSnapshot>,
    mut bobbers: Query<&mut Transform, With<Bobber>>,
) {
    let Ok(mut transform) = bobbers.get_single_mut() else {
        return;
    };
    let t = time.elapsed_secs();
    let (amplitude, speed) = match snapshot.state {
        FishingState::Waiting => (0.08, 3.0),
        FishingState::Bite => (0.3, 18.0),
        FishingState::Minigame => (0.15, 9.0),
        _ => (0.0, 0.0),
    };
    transform.scale = Vec3::splat(1.0 + amplitude * (t * speed).sin());
}

// ─── Rhythm track ─────────────────────────────────────────────────────────────

fn spawn_rhythm_track(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(48.0),
                left: Val::Px((SCREEN_WIDTH - TRACK_WIDTH) / 2.0),
                width: Val::Px(TRACK_WIDTH),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
            Visibility::Hidden,
            RhythmTrackRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Node {
                    width: Val::Px(TRACK_WIDTH),
                    height: Val::Px(TRACK_HEIGHT),
                    overflow: Overflow::clip(),
                    ..default()
                },
                BackgroundColor(COLOR_TRACK_BG),
                RhythmTrack,
            ))
            .with_children(|track| {
                track.spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(HIT_ZONE_X - 2.0),
                        width: Val::Px(4.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(COLOR_HIT_ZONE),
                    ZIndex(1),
                    RhythmHitZone,
                ));
            });

            root.spawn((
                Node {
                    width: Val::Px(TRACK_WIDTH),
                    height: Val::Px(PROGRESS_HEIGHT),
                    ..default()
                },
                BackgroundColor(COLOR_PROGRESS_BG),
            ))
            .with_children(|bar| {
                bar.spawn((
                    Node {
                        width: Val::Percent(0.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(COLOR_PROGRESS_FILL),
                    ProgressFill,
                ));
                bar.spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Percent(70.0),
                        width: Val::Px(2.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(COLOR_TARGET),
                    ProgressTargetMarker,
                ));
            });
        });
}

fn note_screen_span(start_time: f64, duration: f64, current_time: f64) -> (f32, f32) {
    let left = HIT_ZONE_X + ((start_time - current_time) as f32) * TRACK_PX_PER_SEC;
    let width = (duration as f32) * TRACK_PX_PER_SEC;
    (left, width)
}

#[allow(clippy::too_many_arguments)]
fn sync_rhythm_track(
    mut commands: Commands,
    snapshot: Res<FishingSnapshot>,
    config: Res<FishingConfig>,
    mut roots: Query<&mut Visibility, With<RhythmTrackRoot>>,
    tracks: Query<Entity, With<RhythmTrack>>,
    markers: Query<Entity, With<RhythmNoteMarker>>,
    mut hit_zones: Query<&mut BackgroundColor, (With<RhythmHitZone>, Without<ProgressFill>)>,
    mut fills: Query<(&mut Node, &mut BackgroundColor), (With<ProgressFill>, Without<ProgressTargetMarker>)>,
    mut targets: Query<&mut Node, (With<ProgressTargetMarker>, Without<ProgressFill>)>,
) {
    let Ok(mut visibility) = roots.get_single_mut() else {
        return;
    };

    for marker in markers.iter() {
        commands.entity(marker).despawn_recursive();
    }

    let Some(challenge) = snapshot.challenge.as_ref() else {
        *visibility = Visibility::Hidden;
        return;
    };
    *visibility = Visibility::Visible;

    if let Ok(track) = tracks.get_single() {
        spawn_note_markers(&mut commands, track, challenge);
    }

    if let Ok(mut hit_zone) = hit_zones.get_single_mut() {
        hit_zone.0 = if challenge.is_holding {
            COLOR_HIT_ZONE_HELD
        } else {
            COLOR_HIT_ZONE
        };
    }

    let span = config.rhythm.progress_ceiling - config.rhythm.progress_floor;
    let percent = |value: f32| ((value - config.rhythm.progress_floor) / span * 100.0).clamp(0.0, 100.0);

    if let Ok((mut node, mut color)) = fills.get_single_mut() {
        node.width = Val::Percent(percent(challenge.progress));
        color.0 = if challenge.progress >= challenge.target_progress * 0.9 {
            COLOR_PROGRESS_NEAR
        } else {
            COLOR_PROGRESS_FILL
        };
    }
    if let Ok(mut node) = targets.get_single_mut() {
        node.left = Val::Percent(percent(challenge.target_progress));
    }
}

fn spawn_note_markers(commands: &mut Commands, track: Entity, challenge: &RhythmSnapshot) {
    commands.entity(track).with_children(|track| {
        for note in &challenge.notes {
            let (left, width) = note_screen_span(note.start_time, note.duration, challenge.current_time);
            if left + width < 0.0 || left > TRACK_WIDTH {
                continue;
            }
            let color = match (note.kind, note.hit) {
                (NoteKind::Hold, _) => COLOR_HOLD_NOTE,
                (NoteKind::Tap, false) => COLOR_TAP_NOTE,
                (NoteKind::Tap, true) => COLOR_TAP_HIT,
            };
            track.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(left),
                    top: Val::Px((TRACK_HEIGHT - NOTE_HEIGHT) / 2.0),
                    width: Val::Px(width.max(4.0)),
                    height: Val::Px(NOTE_HEIGHT),
                    ..default()
                },
                BackgroundColor(color),
                RhythmNoteMarker,
            ));
        }
    });
}
