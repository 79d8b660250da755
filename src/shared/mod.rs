//! Shared components, resources, events, and value types for Driftline.
//!
//! This is the type contract. The boat, input, fishing, and UI plugins all
//! import from here; none of them reaches into another plugin's internals.

use bevy::prelude::*;

// ═══════════════════════════════════════════════════════════════════════
// SCREEN / WORLD SCALE
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

/// Screen pixels per world metre in the top-down view.
pub const PIXELS_PER_METRE: f32 = 96.0;

/// Projects a simulation point (Y-up, water surface at y = 0) onto the
/// top-down screen plane. `layer` becomes the sprite z for draw ordering.
pub fn world_to_screen(point: Vec3, layer: f32) -> Vec3 {
    Vec3::new(point.x * PIXELS_PER_METRE, -point.z * PIXELS_PER_METRE, layer)
}

/// Heading of a simulation orientation as a screen-plane rotation.
pub fn heading_to_screen(orientation: Quat) -> Quat {
    let (yaw, _, _) = orientation.to_euler(EulerRot::YXZ);
    Quat::from_rotation_z(yaw)
}

// ═══════════════════════════════════════════════════════════════════════
// CASTER — the vehicle the line is cast from
// ═══════════════════════════════════════════════════════════════════════

/// Marks the single entity whose `Transform` is the caster pose.
#[derive(Component, Debug, Default)]
pub struct Caster;

/// Caster position and orientation for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CasterPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl CasterPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn from_transform(transform: &Transform) -> Self {
        Self::new(transform.translation, transform.rotation)
    }
}

impl Default for CasterPose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT
// ═══════════════════════════════════════════════════════════════════════

/// Keyboard layout for the boat and the fishing action.
#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub fish: KeyCode,
    pub fish_alt: KeyCode,
    pub throttle_forward: KeyCode,
    pub throttle_reverse: KeyCode,
    pub steer_left: KeyCode,
    pub steer_right: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            fish: KeyCode::KeyF,
            fish_alt: KeyCode::Space,
            throttle_forward: KeyCode::KeyW,
            throttle_reverse: KeyCode::KeyS,
            steer_left: KeyCode::KeyA,
            steer_right: KeyCode::KeyD,
        }
    }
}

/// Per-frame movement intent. Fishing input travels as `FishActionEvent`s
/// instead, so edges are never lost between fixed ticks.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    /// x: steer (-1 left, +1 right), y: throttle (-1 reverse, +1 forward).
    pub move_axis: Vec2,
}

/// Edge of the single "fish" action.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishActionEvent {
    Pressed,
    Released,
}

// ═══════════════════════════════════════════════════════════════════════
// FISHING VALUE TYPES
// ═══════════════════════════════════════════════════════════════════════

/// Phase of the fishing sequence. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FishingState {
    #[default]
    Idle,
    /// Line paying out from the rod.
    Casting,
    /// Hook in the water, bite timer running.
    Waiting,
    /// Fish on the line; the player must strike before the reaction window closes.
    Bite,
    /// Rhythm challenge running.
    Minigame,
    /// Fish got away; line comes back in once the escape delay elapses.
    Reeling,
}

/// Fish rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FishArchetype {
    Common,
    Rare,
    Legendary,
}

impl FishArchetype {
    pub fn difficulty(self) -> Difficulty {
        match self {
            FishArchetype::Common => Difficulty::Easy,
            FishArchetype::Rare => Difficulty::Medium,
            FishArchetype::Legendary => Difficulty::Hard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FishArchetype::Common => "common",
            FishArchetype::Rare => "rare",
            FishArchetype::Legendary => "legendary",
        }
    }
}

/// Rhythm challenge difficulty; selects the target progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// How a hooked fish left the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchOutcome {
    /// Rhythm challenge reached its target.
    Caught(FishArchetype),
    /// Rhythm challenge progress hit the floor.
    ChallengeFailed(FishArchetype),
    /// Nobody struck during the bite window.
    Escaped(FishArchetype),
}

impl CatchOutcome {
    pub fn archetype(self) -> FishArchetype {
        match self {
            CatchOutcome::Caught(a) | CatchOutcome::ChallengeFailed(a) | CatchOutcome::Escaped(a) => a,
        }
    }

    pub fn is_catch(self) -> bool {
        matches!(self, CatchOutcome::Caught(_))
    }

    pub fn message(self) -> String {
        match self {
            CatchOutcome::Caught(a) => format!("Caught a {} fish!", a.label()),
            CatchOutcome::ChallengeFailed(a) => format!("The {} fish escaped...", a.label()),
            CatchOutcome::Escaped(a) => format!("The {} fish got away before you struck.", a.label()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — fishing → UI
// ═══════════════════════════════════════════════════════════════════════

/// Status line text. `None` hides the status line.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FishingStatusEvent {
    pub message: Option<String>,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FishingOutcomeEvent {
    pub outcome: CatchOutcome,
}

/// The outcome shown for the last catch attempt has expired.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishingResultClearedEvent;

#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
    pub duration_secs: f32,
}
