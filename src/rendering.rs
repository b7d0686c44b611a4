//! Rendering: planet fills, well and limit-line gizmos, drop preview, and HUD.
//!
//! ## Layer Model
//!
//! | Layer            | Technology | Visible in          |
//! |------------------|------------|---------------------|
//! | Planet fills     | `Mesh2d`   | Playing, GameOver   |
//! | Planet rims      | Gizmos     | Playing, GameOver   |
//! | Well walls       | Gizmos     | Playing, GameOver   |
//! | Limit line       | Gizmos     | Playing, GameOver   |
//! | Drop preview     | Gizmos     | Playing             |
//! | Score HUD        | Bevy UI    | Playing, GameOver   |
//!
//! ## System Responsibilities
//!
//! | System                       | Schedule  | Purpose                                 |
//! |------------------------------|-----------|-----------------------------------------|
//! | `setup_planet_visuals`       | Startup   | One mesh and material per rank          |
//! | `setup_hud`                  | Startup   | Spawn the hidden HUD node               |
//! | `attach_planet_visuals_system` | Update  | Give new planets their rank's fill      |
//! | `well_gizmo_system`          | Update    | Walls, limit line, planet rims          |
//! | `drop_preview_system`        | Update    | Ghost of the next planet at the aim     |
//! | `hud_display_system`         | Update    | Refresh score / best / combo / next     |
//! | `show_hud` / `hide_hud`      | OnEnter   | HUD visible outside the main menu       |

use std::time::Duration;

use crate::combo::ComboTracker;
use crate::config::GameConfig;
use crate::constants::HUD_FONT_SIZE;
use crate::danger::DangerTimer;
use crate::drop::{DropController, DropIntent};
use crate::particles::circle_mesh;
use crate::planet::Planet;
use crate::rank::RankTable;
use crate::registry::BodyRegistry;
use crate::session::{GameState, HighScore, RunClock, Score};
use bevy::prelude::*;

// ── Resources and markers ─────────────────────────────────────────────────────

/// Shared fill mesh and material for each rank, index-aligned with the table.
#[derive(Resource, Default)]
pub struct PlanetVisuals {
    pub per_rank: Vec<(Handle<Mesh>, Handle<ColorMaterial>)>,
}

/// Root node of the in-game HUD.
#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct HudScoreText;

#[derive(Component)]
pub struct HudBestText;

#[derive(Component)]
pub struct HudComboText;

#[derive(Component)]
pub struct HudNextText;

#[derive(Component)]
pub struct HudDangerText;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlanetVisuals>()
            .add_systems(OnEnter(GameState::MainMenu), hide_hud)
            .add_systems(OnEnter(GameState::Playing), show_hud)
            .add_systems(
                Update,
                (
                    attach_planet_visuals_system,
                    well_gizmo_system,
                    hud_display_system,
                )
                    .run_if(not(in_state(GameState::MainMenu))),
            )
            .add_systems(
                Update,
                drop_preview_system.run_if(in_state(GameState::Playing)),
            );
    }
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Build one circle mesh and colour material per rank.
///
/// Must run after [`crate::config::load_game_config`] so a configured rank
/// table is honoured.
pub fn setup_planet_visuals(
    ranks: Res<RankTable>,
    mut visuals: ResMut<PlanetVisuals>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    visuals.per_rank = ranks
        .iter()
        .map(|rank| {
            (
                meshes.add(circle_mesh(rank.radius, 48)),
                materials.add(ColorMaterial::from_color(rank.color)),
            )
        })
        .collect();
}

/// Spawn the top-left HUD column, hidden until a run starts.
pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(2.0),
                ..default()
            },
            Visibility::Hidden,
            HudRoot,
        ))
        .with_children(|parent| {
            hud_line(parent, "Score: 0", Color::srgb(0.95, 0.88, 0.45), HudScoreText);
            hud_line(parent, "Best: 0", Color::srgb(0.60, 0.65, 0.80), HudBestText);
            hud_line(parent, "", Color::srgb(1.0, 0.80, 0.25), HudComboText);
            hud_line(parent, "Next: -", Color::srgb(0.75, 0.85, 1.0), HudNextText);
            hud_line(parent, "", Color::srgb(1.0, 0.30, 0.30), HudDangerText);
        });
}

fn hud_line(
    parent: &mut ChildSpawnerCommands<'_>,
    text: &str,
    color: Color,
    marker: impl Component,
) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(color),
        marker,
    ));
}

pub fn show_hud(mut query: Query<&mut Visibility, With<HudRoot>>) {
    for mut v in query.iter_mut() {
        *v = Visibility::Visible;
    }
}

pub fn hide_hud(mut query: Query<&mut Visibility, With<HudRoot>>) {
    for mut v in query.iter_mut() {
        *v = Visibility::Hidden;
    }
}

// ── Update ────────────────────────────────────────────────────────────────────

/// Insert the rank's fill mesh on every planet spawned since last frame.
pub fn attach_planet_visuals_system(
    mut commands: Commands,
    visuals: Res<PlanetVisuals>,
    registry: Res<BodyRegistry>,
    query: Query<Entity, Added<Planet>>,
) {
    for entity in query.iter() {
        let Some((mesh, material)) = registry
            .rank_of(entity)
            .and_then(|rank| visuals.per_rank.get(rank))
        else {
            continue;
        };
        commands
            .entity(entity)
            .insert((Mesh2d(mesh.clone()), MeshMaterial2d(material.clone())));
    }
}

/// Colour of the limit line for a danger fill level: dim white when safe,
/// pulsing red as the timer fills.
pub fn limit_line_color(ratio: f32, frame: u64) -> Color {
    if ratio <= 0.0 {
        return Color::srgba(1.0, 1.0, 1.0, 0.25);
    }
    let pulse = 0.5 + 0.5 * (frame as f32 * (0.15 + 0.35 * ratio)).sin();
    Color::srgba(1.0, 0.25 * (1.0 - ratio), 0.2, 0.45 + 0.55 * ratio * pulse)
}

/// Draw the well walls, the limit line and a rim on every planet.
pub fn well_gizmo_system(
    mut gizmos: Gizmos,
    config: Res<GameConfig>,
    ranks: Res<RankTable>,
    registry: Res<BodyRegistry>,
    danger: Res<DangerTimer>,
    clock: Res<RunClock>,
    planets: Query<(Entity, &Transform), With<Planet>>,
) {
    let hw = config.half_width();
    let h = config.well_height;
    let wall = Color::srgb(0.35, 0.40, 0.60);
    gizmos.line_2d(Vec2::new(-hw, 0.0), Vec2::new(hw, 0.0), wall);
    gizmos.line_2d(Vec2::new(-hw, 0.0), Vec2::new(-hw, h), wall);
    gizmos.line_2d(Vec2::new(hw, 0.0), Vec2::new(hw, h), wall);

    let ratio = danger.ratio(config.danger_threshold_ticks);
    let limit = config.limit_y();
    gizmos.line_2d(
        Vec2::new(-hw, limit),
        Vec2::new(hw, limit),
        limit_line_color(ratio, clock.frames),
    );

    for (entity, transform) in planets.iter() {
        let Some(rank) = registry.rank_of(entity).and_then(|r| ranks.get(r).ok()) else {
            continue;
        };
        let pos = transform.translation.truncate();
        gizmos.circle_2d(pos, rank.radius, rank.color.with_alpha(0.9));
        if rank.terminal {
            gizmos.circle_2d(pos, rank.radius * 1.25, Color::srgba(0.7, 0.3, 1.0, 0.5));
        }
    }
}

/// Where the drop preview sits, or `None` while a drop would be rejected.
pub fn drop_preview_center(
    controller: &DropController,
    now: Duration,
    cooldown: Duration,
    aim_x: f32,
    spawn_y: f32,
) -> Option<Vec2> {
    controller
        .ready(now, cooldown)
        .then_some(Vec2::new(aim_x, spawn_y))
}

/// Ghost of the next planet at the aim position, with a drop guide line.
///
/// Hidden while the drop cooldown is running.
pub fn drop_preview_system(
    mut gizmos: Gizmos,
    time: Res<Time<Real>>,
    config: Res<GameConfig>,
    ranks: Res<RankTable>,
    intent: Res<DropIntent>,
    controller: Res<DropController>,
) {
    let Ok(rank) = ranks.get(controller.next_rank) else {
        return;
    };
    let Some(center) = drop_preview_center(
        &controller,
        time.elapsed(),
        config.drop_cooldown(),
        intent.aim_x,
        config.spawn_y(),
    ) else {
        return;
    };

    gizmos.circle_2d(center, rank.radius, rank.color.with_alpha(0.8));
    gizmos.line_2d(
        center - Vec2::new(0.0, rank.radius),
        Vec2::new(center.x, 0.0),
        Color::srgba(1.0, 1.0, 1.0, 0.12),
    );
}

/// Seconds remaining before the danger timer breaches, for the warning line.
pub fn danger_seconds_left(ticks: u32, threshold: u32) -> f32 {
    threshold.saturating_sub(ticks) as f32 / 60.0
}

/// Refresh the HUD texts from the session resources.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub fn hud_display_system(
    score: Res<Score>,
    high: Res<HighScore>,
    combo: Res<ComboTracker>,
    danger: Res<DangerTimer>,
    controller: Res<DropController>,
    ranks: Res<RankTable>,
    config: Res<GameConfig>,
    mut texts: ParamSet<(
        Query<&mut Text, With<HudScoreText>>,
        Query<&mut Text, With<HudBestText>>,
        Query<&mut Text, With<HudComboText>>,
        Query<&mut Text, With<HudNextText>>,
        Query<&mut Text, With<HudDangerText>>,
    )>,
) {
    if score.is_changed() {
        for mut t in texts.p0().iter_mut() {
            *t = Text::new(format!("Score: {}", score.points));
        }
    }
    if high.is_changed() || score.is_changed() {
        let best = high.0.max(score.points);
        for mut t in texts.p1().iter_mut() {
            *t = Text::new(format!("Best: {best}"));
        }
    }
    if combo.is_changed() {
        let line = if combo.is_active() {
            format!("{}x COMBO", combo.count)
        } else {
            String::new()
        };
        for mut t in texts.p2().iter_mut() {
            *t = Text::new(line.clone());
        }
    }
    if controller.is_changed() {
        let name = ranks
            .get(controller.next_rank)
            .map_or("-", |r| r.name.as_str());
        for mut t in texts.p3().iter_mut() {
            *t = Text::new(format!("Next: {name}"));
        }
    }
    if danger.is_changed() {
        let line = if danger.ticks > 0 {
            format!(
                "DANGER {:.1}s",
                danger_seconds_left(danger.ticks, config.danger_threshold_ticks)
            )
        } else {
            String::new()
        };
        for mut t in texts.p4().iter_mut() {
            *t = Text::new(line.clone());
        }
    }
}
