//! Short-range pairwise attraction between planets.
//!
//! Every frame, before the physics step, [`gravity_field_system`] zeroes each
//! planet's [`ExternalForce`] and re-accumulates the attraction from every
//! planet within [`GameConfig::attraction_range`].  Because the force is
//! rebuilt from zero each frame it acts on exactly one physics step.
//!
//! The computation is O(n²) in the planet count, which the well's area keeps
//! small (a few dozen planets at most).

use crate::config::GameConfig;
use crate::rank::RankTable;
use crate::registry::BodyRegistry;
use bevy::prelude::*;
use bevy_rapier2d::prelude::ExternalForce;

/// Position and mass of one planet for the attraction pass.
#[derive(Debug, Clone, Copy)]
pub struct AttractionBody {
    pub entity: Entity,
    pub position: Vec2,
    pub mass: f32,
}

/// Compute the net attraction force on every body.
///
/// For each unordered pair with `min_dist < d < range`, a force of magnitude
/// `g·m_a·m_b/d²` pulls `a` toward `b` and `b` toward `a`.  The returned vector
/// is index-aligned with `bodies`.
pub fn pairwise_attraction(
    bodies: &[AttractionBody],
    g: f32,
    min_dist: f32,
    range: f32,
) -> Vec<Vec2> {
    let mut forces = vec![Vec2::ZERO; bodies.len()];

    for i in 0..bodies.len() {
        let a = bodies[i];
        for j in (i + 1)..bodies.len() {
            let b = bodies[j];
            let delta = b.position - a.position;
            let dist = delta.length();

            if dist <= min_dist || dist >= range {
                continue;
            }

            let force = delta / dist * (g * a.mass * b.mass / (dist * dist));
            forces[i] += force;
            forces[j] -= force;
        }
    }

    forces
}

/// Apply the attraction field to every registered planet for this frame.
pub fn gravity_field_system(
    registry: Res<BodyRegistry>,
    ranks: Res<RankTable>,
    config: Res<GameConfig>,
    mut query: Query<(Entity, &Transform, &mut ExternalForce)>,
) {
    let mut bodies = Vec::with_capacity(registry.len());
    for (entity, transform, mut ext) in query.iter_mut() {
        let Some(rank) = registry.rank_of(entity) else {
            continue;
        };
        ext.force = Vec2::ZERO;
        bodies.push(AttractionBody {
            entity,
            position: transform.translation.truncate(),
            mass: ranks.mass(rank, config.density_scale),
        });
    }

    let forces = pairwise_attraction(
        &bodies,
        config.attraction_const,
        config.min_attraction_dist,
        config.attraction_range,
    );

    for (body, force) in bodies.iter().zip(forces) {
        if let Ok((_, _, mut ext)) = query.get_mut(body.entity) {
            ext.force += force;
        }
    }
}
