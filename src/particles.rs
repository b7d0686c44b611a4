//! Merge effects: particle bursts, expanding rings and floating score labels.
//!
//! ## Design
//!
//! Particles are lightweight ECS entities with a [`Particle`] component that
//! stores velocity, age and base colour.  Effects are driven purely by the
//! rule engine's messages and never feed back into it.
//!
//! | System                        | Schedule | Purpose                                       |
//! |-------------------------------|----------|-----------------------------------------------|
//! | `merge_effects_system`        | Update   | Burst, ring and "+points" label per merge     |
//! | `combo_text_system`           | Update   | "Nx COMBO +bonus" label per combo award       |
//! | `attach_particle_mesh_system` | Update   | Attach `Mesh2d` to freshly-spawned particles  |
//! | `particle_update_system`      | Update   | Move, fade, and despawn expired particles     |
//! | `floating_text_system`        | Update   | Rise, fade, and despawn labels                |
//! | `merge_ring_system`           | Update   | Draw and expire gizmo rings                   |
//! | `clear_effects`               | `OnEnter(MainMenu)`, `OnEnter(Playing)` | Remove leftovers |
//!
//! A single shared circle-mesh [`ParticleMesh`] resource is created at plugin
//! startup to avoid per-particle mesh allocation.  Each particle receives its
//! own unique [`ColorMaterial`] so its alpha can be faded individually.

use crate::config::GameConfig;
use crate::constants::{FLOATING_TEXT_LIFETIME, FLOATING_TEXT_RISE, MERGE_PARTICLE_COUNT};
use crate::events::{ComboAwarded, PlanetsMerged, TerminalRankReached};
use crate::rank::RankTable;
use crate::session::GameState;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use rand::Rng;

// ── Resources ────────────────────────────────────────────────────────────────

/// Shared circle mesh used by all particle entities (created once at startup).
#[derive(Resource)]
pub struct ParticleMesh(pub Handle<Mesh>);

// ── Components ───────────────────────────────────────────────────────────────

/// Short-lived visual particle entity.
#[derive(Component)]
pub struct Particle {
    /// World-space velocity (units/s).
    pub velocity: Vec2,
    /// Time alive so far (s).
    pub age: f32,
    /// Total lifetime (s); entity is despawned when `age >= lifetime`.
    pub lifetime: f32,
    pub color: Srgba,
    /// `None` until `attach_particle_mesh_system` runs.
    pub material: Option<Handle<ColorMaterial>>,
}

/// Rising, fading text label in world space.
#[derive(Component)]
pub struct FloatingText {
    pub age: f32,
    pub lifetime: f32,
    pub color: Srgba,
}

/// Expanding gizmo ring marking a merge point.
#[derive(Component)]
pub struct MergeRing {
    pub center: Vec2,
    pub age: f32,
    pub lifetime: f32,
    pub start_radius: f32,
    pub color: Srgba,
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_particle_mesh)
            .add_systems(OnEnter(GameState::MainMenu), clear_effects)
            .add_systems(OnEnter(GameState::Playing), clear_effects)
            .add_systems(
                Update,
                (
                    (merge_effects_system, combo_text_system),
                    attach_particle_mesh_system,
                    particle_update_system,
                    floating_text_system,
                    merge_ring_system,
                )
                    .chain(),
            );
    }
}

// ── Startup system ────────────────────────────────────────────────────────────

/// Create the shared circle mesh and store it as a [`ParticleMesh`] resource.
fn init_particle_mesh(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let handle = meshes.add(circle_mesh(2.5, 8));
    commands.insert_resource(ParticleMesh(handle));
}

// ── Message consumers ─────────────────────────────────────────────────────────

/// Spawn the burst, ring and score label for every merge this frame.
///
/// Reaching the terminal rank adds a second, wider violet burst.
pub fn merge_effects_system(
    mut commands: Commands,
    ranks: Res<RankTable>,
    mut merged: MessageReader<PlanetsMerged>,
    mut terminal: MessageReader<TerminalRankReached>,
) {
    for m in merged.read() {
        let Ok(rank) = ranks.get(m.rank) else {
            continue;
        };
        let color = rank.color.to_srgba();
        spawn_merge_particles(&mut commands, m.position, color, MERGE_PARTICLE_COUNT, 1.0);
        commands.spawn(MergeRing {
            center: m.position,
            age: 0.0,
            lifetime: 0.45,
            start_radius: rank.radius,
            color,
        });
        spawn_floating_text(
            &mut commands,
            format!("+{}", m.points),
            m.position + Vec2::new(0.0, rank.radius),
            18.0,
            Srgba::new(1.0, 1.0, 1.0, 1.0),
        );
    }

    for t in terminal.read() {
        spawn_merge_particles(
            &mut commands,
            t.position,
            Srgba::new(0.75, 0.35, 1.0, 1.0),
            MERGE_PARTICLE_COUNT * 3,
            2.5,
        );
    }
}

/// Show the combo label above the limit line.
pub fn combo_text_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut combos: MessageReader<ComboAwarded>,
) {
    for c in combos.read() {
        spawn_floating_text(
            &mut commands,
            format!("{}x COMBO +{}", c.count, c.bonus),
            Vec2::new(0.0, config.limit_y() - 60.0),
            26.0,
            Srgba::new(1.0, 0.85, 0.2, 1.0),
        );
    }
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Attach `Mesh2d` + `MeshMaterial2d` to every newly-spawned [`Particle`].
pub fn attach_particle_mesh_system(
    mut commands: Commands,
    particle_mesh: Res<ParticleMesh>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Particle), Added<Particle>>,
) {
    for (entity, mut particle) in query.iter_mut() {
        let mat_handle = materials.add(ColorMaterial::from_color(particle.color));
        particle.material = Some(mat_handle.clone());
        commands
            .entity(entity)
            .insert((Mesh2d(particle_mesh.0.clone()), MeshMaterial2d(mat_handle)));
    }
}

/// Advance all particles: translate by velocity, fade alpha quadratically,
/// and despawn any whose age has exceeded their lifetime.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Transform, &mut Particle)>,
) {
    let dt = time.delta_secs();

    for (entity, mut transform, mut particle) in query.iter_mut() {
        particle.age += dt;

        if particle.age >= particle.lifetime {
            commands.entity(entity).despawn();
            continue;
        }

        transform.translation += (particle.velocity * dt).extend(0.0);
        // Light drag so bursts bloom then hang.
        particle.velocity *= 1.0 - (2.5 * dt).min(1.0);

        let t = particle.age / particle.lifetime;
        let alpha = (1.0 - t).powi(2);

        if let Some(ref handle) = particle.material {
            if let Some(mat) = materials.get_mut(handle) {
                mat.color = Color::from(particle.color.with_alpha(alpha));
            }
        }
    }
}

/// Rise and fade floating labels, despawning them at the end of their life.
pub fn floating_text_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut TextColor, &mut FloatingText)>,
) {
    let dt = time.delta_secs();
    for (entity, mut transform, mut color, mut label) in query.iter_mut() {
        label.age += dt;
        if label.age >= label.lifetime {
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation.y += FLOATING_TEXT_RISE * dt;
        let alpha = 1.0 - label.age / label.lifetime;
        *color = TextColor(Color::from(label.color.with_alpha(alpha)));
    }
}

/// Draw each merge ring expanding and fading, then despawn it.
pub fn merge_ring_system(
    mut commands: Commands,
    time: Res<Time>,
    mut gizmos: Gizmos,
    mut query: Query<(Entity, &mut MergeRing)>,
) {
    let dt = time.delta_secs();
    for (entity, mut ring) in query.iter_mut() {
        ring.age += dt;
        if ring.age >= ring.lifetime {
            commands.entity(entity).despawn();
            continue;
        }
        let t = ring.age / ring.lifetime;
        let radius = ring.start_radius * (1.0 + t);
        gizmos.circle_2d(ring.center, radius, Color::from(ring.color.with_alpha(1.0 - t)));
    }
}

/// Despawn every leftover particle, ring and label.
#[allow(clippy::type_complexity)]
pub fn clear_effects(
    mut commands: Commands,
    query: Query<Entity, Or<(With<Particle>, With<FloatingText>, With<MergeRing>)>>,
) {
    for e in query.iter() {
        commands.entity(e).despawn();
    }
}

// ── Public spawn helpers ──────────────────────────────────────────────────────

/// Spawn `count` particles bursting radially from `center`.
///
/// `energy` scales both speed and lifetime.
pub fn spawn_merge_particles(
    commands: &mut Commands,
    center: Vec2,
    color: Srgba,
    count: u32,
    energy: f32,
) {
    let mut rng = rand::thread_rng();

    for _ in 0..count {
        let angle = rng.gen_range(0.0_f32..std::f32::consts::TAU);
        let speed = rng.gen_range(60.0_f32..180.0_f32) * energy;
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;
        let lifetime = rng.gen_range(0.35_f32..0.65_f32) * energy.sqrt();

        // Jitter brightness so a burst is not a flat disc of one colour.
        let shade = rng.gen_range(0.8_f32..1.0_f32);
        let color = Srgba::new(
            (color.red * shade + 0.1).min(1.0),
            (color.green * shade + 0.1).min(1.0),
            (color.blue * shade + 0.1).min(1.0),
            1.0,
        );

        commands.spawn((
            Particle {
                velocity,
                age: 0.0,
                lifetime,
                color,
                material: None,
            },
            Transform::from_translation(center.extend(0.9)),
            Visibility::default(),
        ));
    }
}

/// Spawn a floating label at `position`.
pub fn spawn_floating_text(
    commands: &mut Commands,
    text: String,
    position: Vec2,
    font_size: f32,
    color: Srgba,
) {
    commands.spawn((
        Text2d::new(text),
        TextFont {
            font_size,
            ..default()
        },
        TextColor(Color::from(color)),
        Transform::from_translation(position.extend(2.0)),
        FloatingText {
            age: 0.0,
            lifetime: FLOATING_TEXT_LIFETIME,
            color,
        },
    ));
}

/// Build a filled circle mesh approximated by an `n`-sided regular polygon.
///
/// Uses a triangle fan from the centre: `(0, i, i+1 mod n)`.
pub fn circle_mesh(radius: f32, sides: u32) -> Mesh {
    let n = sides as usize;
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n + 1);

    positions.push([0.0, 0.0, 0.0]);
    normals.push([0.0, 0.0, 1.0]);
    uvs.push([0.5, 0.5]);

    for i in 0..n {
        let angle = std::f32::consts::TAU * i as f32 / n as f32;
        let (x, y) = (radius * angle.cos(), radius * angle.sin());
        positions.push([x, y, 0.0]);
        normals.push([0.0, 0.0, 1.0]);
        uvs.push([x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5]);
    }

    let indices: Vec<u32> = (0..n as u32)
        .flat_map(|i| [0, i + 1, (i + 1) % n as u32 + 1])
        .collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}
