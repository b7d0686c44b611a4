use crate::config::GameConfig;
use bevy::prelude::*;

/// Setup camera for 2D rendering, centred on the middle of the well.
///
/// The window in `main.rs` is sized so the whole well plus the HUD margin is
/// visible at the default 1:1 projection scale.
pub fn setup_camera(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, config.well_height * 0.5 + 20.0, 0.0),
    ));
    info!("[SETUP] Camera spawned");
}
