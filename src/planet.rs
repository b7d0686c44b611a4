//! Planet and wall entities.
//!
//! Planets are dynamic Rapier balls whose rank lives in the
//! [`BodyRegistry`]; every spawn goes through [`spawn_planet`] so an entity
//! never exists in the world without being registered.  Walls are static
//! cuboids that close the well on three sides and are never registered.

use crate::config::GameConfig;
use crate::error::FusionResult;
use crate::rank::RankTable;
use crate::registry::BodyRegistry;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Marker component for planet entities.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Planet;

/// Marker component for the static well walls.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wall;

/// Spawn a planet of `rank` at `position` with zero velocity and register it.
///
/// Fails only if `rank` is outside the rank table.
pub fn spawn_planet(
    commands: &mut Commands,
    registry: &mut BodyRegistry,
    ranks: &RankTable,
    config: &GameConfig,
    rank: usize,
    position: Vec2,
) -> FusionResult<Entity> {
    let radius = ranks.get(rank)?.radius;
    let density = ranks.density(rank, config.density_scale);

    let entity = commands
        .spawn((
            (
                Transform::from_translation(position.extend(0.1)),
                GlobalTransform::default(),
                Visibility::default(),
                Planet,
                RigidBody::Dynamic,
            ),
            (
                Collider::ball(radius),
                ColliderMassProperties::Density(density),
                Restitution::coefficient(config.planet_restitution),
                Friction::coefficient(config.planet_friction),
                Velocity::zero(),
                ExternalForce {
                    force: Vec2::ZERO,
                    torque: 0.0,
                },
                ActiveEvents::COLLISION_EVENTS,
                Sleeping::disabled(),
            ),
        ))
        .id();

    registry.register(entity, rank);
    Ok(entity)
}

/// Spawn the floor and both side walls around the well.
///
/// Side walls reach twice the well height so energetic planets cannot escape
/// over the top edge.
pub fn spawn_walls(commands: &mut Commands, config: &GameConfig) {
    let t = config.wall_thickness;
    let half_w = config.half_width();
    let h = config.well_height;

    let walls = [
        // Floor, wide enough to sit under both side walls.
        (Vec2::new(0.0, -t * 0.5), Vec2::new(half_w + t, t * 0.5)),
        // Left
        (Vec2::new(-half_w - t * 0.5, h * 0.5), Vec2::new(t * 0.5, h)),
        // Right
        (Vec2::new(half_w + t * 0.5, h * 0.5), Vec2::new(t * 0.5, h)),
    ];

    for (center, half_extents) in walls {
        commands.spawn((
            Transform::from_translation(center.extend(0.0)),
            GlobalTransform::default(),
            Wall,
            RigidBody::Fixed,
            Collider::cuboid(half_extents.x, half_extents.y),
            Friction::coefficient(config.wall_friction),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_in_world(world: &mut World, rank: usize) -> FusionResult<Entity> {
        let mut registry = BodyRegistry::default();
        let ranks = RankTable::default();
        let config = GameConfig::default();
        let result = spawn_planet(
            &mut world.commands(),
            &mut registry,
            &ranks,
            &config,
            rank,
            Vec2::new(0.0, 300.0),
        );
        world.flush();
        if let Ok(e) = result {
            assert_eq!(registry.rank_of(e), Some(rank));
        }
        result
    }

    #[test]
    fn spawned_planet_is_registered_and_at_rest() {
        let mut world = World::new();
        let e = spawn_in_world(&mut world, 2).expect("rank 2 exists");
        let vel = world.get::<Velocity>(e).expect("velocity present");
        assert_eq!(vel.linvel, Vec2::ZERO);
        assert!(world.get::<Planet>(e).is_some());
    }

    #[test]
    fn out_of_range_rank_is_rejected() {
        let mut world = World::new();
        assert!(spawn_in_world(&mut world, 99).is_err());
    }

    #[test]
    fn three_walls_are_spawned() {
        let mut world = World::new();
        spawn_walls(&mut world.commands(), &GameConfig::default());
        world.flush();
        let count = world.query_filtered::<Entity, With<Wall>>().iter(&world).count();
        assert_eq!(count, 3);
    }
}
