use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;

use cosmic_fusion::audio::CueAudioPlugin;
use cosmic_fusion::config::{self, GameConfig};
use cosmic_fusion::graphics;
use cosmic_fusion::input::InputPlugin;
use cosmic_fusion::menu::MenuPlugin;
use cosmic_fusion::particles::ParticlesPlugin;
use cosmic_fusion::rendering::{self, RenderingPlugin};
use cosmic_fusion::simulation::SimulationPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Cosmic Fusion".into(),
                resolution: WindowResolution::new(520, 780),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.01, 0.01, 0.04)))
        // Compiled defaults; load_game_config overwrites them from
        // assets/game.toml (if present) in the Startup schedule.
        .insert_resource(GameConfig::default())
        // pixels_per_meter(1.0) keeps world units equal to Rapier units, so
        // gravity and attraction constants are in pixels per second squared.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
        .add_plugins((
            SimulationPlugin,
            InputPlugin,
            ParticlesPlugin,
            CueAudioPlugin,
            RenderingPlugin,
            MenuPlugin,
        ))
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the final values.
                config::load_game_config,
                graphics::setup_camera.after(config::load_game_config),
                rendering::setup_planet_visuals.after(config::load_game_config),
                rendering::setup_hud,
            ),
        )
        .run();
}
