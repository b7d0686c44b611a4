//! Pointer, touch and keyboard input for aiming and dropping.
//!
//! Input never touches the world.  It writes the clamped aim and a one-shot
//! drop request into [`DropIntent`]; the drop controller consumes both on the
//! same frame, later in the `Playing` schedule.

use crate::config::GameConfig;
use crate::drop::{DropController, DropIntent};
use crate::rank::RankTable;
use crate::simulation::FusionSet;
use crate::session::GameState;
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (aim_input_system, drop_input_system)
                .chain()
                .in_set(FusionSet::Input)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Clamp `x` so a planet of `radius` stays fully inside a well of `half_width`.
pub fn clamp_aim(x: f32, half_width: f32, radius: f32) -> f32 {
    let limit = (half_width - radius).max(0.0);
    x.clamp(-limit, limit)
}

/// Track the pointer (or first touch) in world space and nudge with arrow keys.
///
/// The pointer only moves the aim when it actually moves, so keyboard nudges
/// are not overwritten by a stationary cursor.
#[allow(clippy::too_many_arguments)]
pub fn aim_input_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    touches: Res<Touches>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<GameConfig>,
    ranks: Res<RankTable>,
    controller: Res<DropController>,
    mut intent: ResMut<DropIntent>,
    mut last_pointer: Local<Option<Vec2>>,
) {
    let mut aim = intent.aim_x;

    let screen_pos = windows
        .single()
        .ok()
        .and_then(|w| w.cursor_position())
        .or_else(|| touches.first_pressed_position());

    if let (Some(screen_pos), Ok((camera, cam_tf))) = (screen_pos, cameras.single()) {
        if *last_pointer != Some(screen_pos) {
            *last_pointer = Some(screen_pos);
            if let Ok(world_pos) = camera.viewport_to_world_2d(cam_tf, screen_pos) {
                aim = world_pos.x;
            }
        }
    }

    let mut dir = 0.0;
    if keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        dir -= 1.0;
    }
    if keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
        dir += 1.0;
    }
    aim += dir * config.keyboard_aim_speed * time.delta_secs();

    let radius = ranks.get(controller.next_rank).map_or(0.0, |r| r.radius);
    intent.set_aim_x(clamp_aim(aim, config.half_width(), radius));
}

/// Register a drop request on click, touch release, or Space / Enter / Down.
pub fn drop_input_system(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    mut intent: ResMut<DropIntent>,
) {
    if mouse.just_pressed(MouseButton::Left)
        || touches.any_just_released()
        || keys.any_just_pressed([KeyCode::Space, KeyCode::Enter, KeyCode::ArrowDown])
    {
        intent.request_drop();
    }
}
