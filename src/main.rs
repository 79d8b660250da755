mod shared;
mod input;
mod boat;
mod fishing;
mod ui;

use std::path::Path;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use fishing::FishingConfig;
use shared::*;

const FISHING_CONFIG_PATH: &str = "assets/config/fishing.ron";

/// Where the fishing tuning came from, reported once logging is up.
#[derive(Resource, Debug)]
enum ConfigSource {
    File(String),
    Defaults,
    Rejected(String),
}

fn main() {
    let (config, source) = load_fishing_config(Path::new(FISHING_CONFIG_PATH));

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Driftline".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .insert_resource(ClearColor(Color::srgb(0.09, 0.3, 0.45)))
        // Must be present before FishingPlugin builds.
        .insert_resource(config)
        .insert_resource(source)
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(boat::BoatPlugin)
        .add_plugins(fishing::FishingPlugin)
        .add_plugins(fishing::FishingRenderPlugin)
        .add_plugins(ui::UiPlugin)
        // Camera
        .add_systems(Startup, (setup_camera, report_config_source))
        .run();
}

fn load_fishing_config(path: &Path) -> (FishingConfig, ConfigSource) {
    if !path.exists() {
        return (FishingConfig::default(), ConfigSource::Defaults);
    }
    match FishingConfig::load(path) {
        Ok(config) => (config, ConfigSource::File(path.display().to_string())),
        Err(e) => (FishingConfig::default(), ConfigSource::Rejected(e)),
    }
}

fn report_config_source(source: Res<ConfigSource>) {
    match &*source {
        ConfigSource::File(path) => info!("[Config] Loaded fishing tuning from {}", path),
        ConfigSource::Defaults => info!("[Config] No fishing tuning file; using defaults"),
        ConfigSource::Rejected(e) => warn!("[Config] {}; using defaults", e),
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
