//! Limit-line danger monitor.
//!
//! A frame is "in danger" when any registered, non-grace planet is settled
//! (speed below [`GameConfig::settle_speed`]) with its top edge above the
//! limit line.  The [`DangerTimer`] climbs by one on danger frames and decays
//! by [`GameConfig::danger_decay_per_tick`] on safe frames.  The first danger
//! frame that would push it past the threshold ends the run.

use std::time::Duration;

use crate::config::GameConfig;
use crate::drop::GraceSet;
use crate::rank::RankTable;
use crate::registry::BodyRegistry;
use crate::session::GameState;
use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

/// Accumulated danger frames, kept in `[0, threshold]`.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DangerTimer {
    pub ticks: u32,
}

impl DangerTimer {
    /// Advance by one frame.  Returns `true` on the frame the threshold is
    /// breached; the stored value never exceeds `threshold`.
    pub fn advance(&mut self, in_danger: bool, threshold: u32, decay: u32) -> bool {
        if in_danger {
            if self.ticks >= threshold {
                self.ticks = threshold;
                return true;
            }
            self.ticks += 1;
        } else {
            self.ticks = self.ticks.saturating_sub(decay);
        }
        false
    }

    /// Fill level for the warning overlay, `0.0..=1.0`.
    pub fn ratio(&self, threshold: u32) -> f32 {
        if threshold == 0 {
            return 0.0;
        }
        (self.ticks as f32 / threshold as f32).min(1.0)
    }
}

/// Snapshot of one planet for the danger check.
#[derive(Debug, Clone, Copy)]
pub struct DangerProbe {
    pub entity: Entity,
    pub position: Vec2,
    pub radius: f32,
    pub speed: f32,
}

/// Whether any non-exempt probe is settled above the limit line at `now`.
pub fn any_settled_above_limit(
    probes: impl IntoIterator<Item = DangerProbe>,
    grace: &GraceSet,
    now: Duration,
    limit_y: f32,
    settle_speed: f32,
) -> bool {
    probes.into_iter().any(|p| {
        !grace.is_exempt(p.entity, now)
            && p.position.y + p.radius > limit_y
            && p.speed < settle_speed
    })
}

/// Evaluate the limit line and request `GameOver` on breach.
#[allow(clippy::too_many_arguments)]
pub fn danger_monitor_system(
    time: Res<Time<Real>>,
    config: Res<GameConfig>,
    ranks: Res<RankTable>,
    registry: Res<BodyRegistry>,
    grace: Res<GraceSet>,
    planets: Query<(&Transform, &Velocity)>,
    mut timer: ResMut<DangerTimer>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let probes = registry.all_registered().filter_map(|(entity, rank)| {
        let (transform, velocity) = planets.get(entity).ok()?;
        Some(DangerProbe {
            entity,
            position: transform.translation.truncate(),
            radius: ranks.get(rank).ok()?.radius,
            speed: velocity.linvel.length(),
        })
    });

    let in_danger = any_settled_above_limit(
        probes,
        &grace,
        time.elapsed(),
        config.limit_y(),
        config.settle_speed,
    );

    if timer.advance(
        in_danger,
        config.danger_threshold_ticks,
        config.danger_decay_per_tick,
    ) {
        info!("Limit line held for {} frames; run over", timer.ticks + 1);
        next_state.set(GameState::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── DangerTimer ──

    #[test]
    fn breach_happens_on_first_frame_past_threshold() {
        let mut t = DangerTimer::default();
        for frame in 1..=120 {
            assert!(!t.advance(true, 120, 2), "no breach on frame {frame}");
        }
        assert_eq!(t.ticks, 120);
        assert!(t.advance(true, 120, 2));
        assert_eq!(t.ticks, 120);
    }

    #[test]
    fn safe_frames_decay_twice_as_fast() {
        let mut t = DangerTimer { ticks: 5 };
        t.advance(false, 120, 2);
        assert_eq!(t.ticks, 3);
        t.advance(false, 120, 2);
        t.advance(false, 120, 2);
        assert_eq!(t.ticks, 0);
        t.advance(false, 120, 2);
        assert_eq!(t.ticks, 0);
    }

    #[test]
    fn alternating_frames_never_accumulate() {
        let mut t = DangerTimer::default();
        for _ in 0..500 {
            assert!(!t.advance(true, 120, 2));
            assert!(!t.advance(false, 120, 2));
        }
        assert_eq!(t.ticks, 0);
    }

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(DangerTimer { ticks: 60 }.ratio(120), 0.5);
        assert_eq!(DangerTimer { ticks: 120 }.ratio(120), 1.0);
        assert_eq!(DangerTimer { ticks: 5 }.ratio(0), 0.0);
    }

    // ── any_settled_above_limit ──

    fn probe(world: &mut World, y: f32, speed: f32) -> DangerProbe {
        DangerProbe {
            entity: world.spawn_empty().id(),
            position: Vec2::new(0.0, y),
            radius: 20.0,
            speed,
        }
    }

    #[test]
    fn settled_planet_above_line_is_danger() {
        let mut world = World::new();
        let p = probe(&mut world, 550.0, 10.0);
        assert!(any_settled_above_limit(
            [p],
            &GraceSet::default(),
            Duration::ZERO,
            560.0,
            120.0
        ));
    }

    #[test]
    fn falling_or_low_planets_are_safe() {
        let mut world = World::new();
        let falling = probe(&mut world, 550.0, 400.0);
        let low = probe(&mut world, 300.0, 0.0);
        assert!(!any_settled_above_limit(
            [falling, low],
            &GraceSet::default(),
            Duration::ZERO,
            560.0,
            120.0
        ));
    }

    #[test]
    fn grace_planet_is_exempt_until_window_passes() {
        let mut world = World::new();
        let p = probe(&mut world, 600.0, 0.0);
        let mut grace = GraceSet::default();
        grace.insert(p.entity, Duration::ZERO, Duration::from_millis(1500));

        assert!(!any_settled_above_limit(
            [p],
            &grace,
            Duration::from_millis(1000),
            560.0,
            120.0
        ));
        assert!(any_settled_above_limit(
            [p],
            &grace,
            Duration::from_millis(1500),
            560.0,
            120.0
        ));
    }
}
