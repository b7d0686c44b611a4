//! Drop controller and grace set.
//!
//! Input only records an aim position and a one-shot drop request in
//! [`DropIntent`].  On the next `Playing` frame [`drop_controller_system`]
//! consumes the request: if the wall-clock cooldown has elapsed it spawns the
//! pre-selected next rank at the aim position, gives the new planet a grace
//! window, and rolls the following rank.  Requests during cooldown are
//! dropped silently.
//!
//! Cooldown and grace use `Time<Real>` so they stay correct when frames are
//! skipped or the window is backgrounded.

use std::collections::HashMap;
use std::time::Duration;

use crate::config::GameConfig;
use crate::events::{PlanetDropped, SoundCue};
use crate::planet::spawn_planet;
use crate::rank::RankTable;
use crate::registry::BodyRegistry;
use bevy::prelude::*;
use rand::Rng;

/// Latest aim and pending drop request from input.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct DropIntent {
    /// Horizontal aim in world units, already clamped to the well.
    pub aim_x: f32,
    /// Set by input, cleared by the drop controller on the next frame.
    pub requested: bool,
}

impl DropIntent {
    pub fn set_aim_x(&mut self, x: f32) {
        self.aim_x = x;
    }

    pub fn request_drop(&mut self) {
        self.requested = true;
    }
}

/// Next rank to drop and the time of the last accepted drop.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DropController {
    pub next_rank: usize,
    /// `Time<Real>::elapsed()` at the last accepted drop.
    pub last_drop: Option<Duration>,
}

impl DropController {
    /// Whether a drop at `now` respects the cooldown.
    pub fn ready(&self, now: Duration, cooldown: Duration) -> bool {
        self.last_drop
            .is_none_or(|last| now.saturating_sub(last) >= cooldown)
    }

    /// Pick the next rank uniformly from the `drop_rank_count` lowest ranks.
    pub fn roll_next_rank<R: Rng>(&mut self, rng: &mut R, drop_rank_count: usize) {
        self.next_rank = rng.gen_range(0..drop_rank_count.max(1));
    }
}

/// Planets currently exempt from the limit-line check, with their expiry time.
#[derive(Resource, Debug, Default, Clone)]
pub struct GraceSet {
    expiries: HashMap<Entity, Duration>,
}

impl GraceSet {
    pub fn insert(&mut self, entity: Entity, now: Duration, window: Duration) {
        self.expiries.insert(entity, now + window);
    }

    /// True while `entity`'s grace window has not yet passed at `now`.
    pub fn is_exempt(&self, entity: Entity, now: Duration) -> bool {
        self.expiries.get(&entity).is_some_and(|until| now < *until)
    }

    /// Drop every entry whose window has passed.
    pub fn prune(&mut self, now: Duration) {
        self.expiries.retain(|_, until| now < *until);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.expiries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }

    pub fn clear(&mut self) {
        self.expiries.clear();
    }
}

/// Consume a pending drop request and spawn the next planet if allowed.
#[allow(clippy::too_many_arguments)]
pub fn drop_controller_system(
    mut commands: Commands,
    time: Res<Time<Real>>,
    config: Res<GameConfig>,
    ranks: Res<RankTable>,
    mut intent: ResMut<DropIntent>,
    mut controller: ResMut<DropController>,
    mut registry: ResMut<BodyRegistry>,
    mut grace: ResMut<GraceSet>,
    mut dropped: MessageWriter<PlanetDropped>,
    mut cues: MessageWriter<SoundCue>,
) -> Result {
    if !intent.requested {
        return Ok(());
    }
    intent.requested = false;

    let now = time.elapsed();
    if !controller.ready(now, config.drop_cooldown()) {
        return Ok(());
    }

    let rank = controller.next_rank;
    let position = Vec2::new(intent.aim_x, config.spawn_y());
    let entity = spawn_planet(
        &mut commands,
        &mut registry,
        &ranks,
        &config,
        rank,
        position,
    )?;

    grace.insert(entity, now, config.grace_period());
    controller.last_drop = Some(now);
    controller.roll_next_rank(&mut rand::thread_rng(), config.drop_rank_count);

    dropped.write(PlanetDropped { rank, position });
    cues.write(SoundCue::Drop);
    debug!("Dropped rank {rank} at x = {:.1}", position.x);

    Ok(())
}

/// Remove expired grace entries so the set only holds recent drops.
pub fn grace_expiry_system(time: Res<Time<Real>>, mut grace: ResMut<GraceSet>) {
    grace.prune(time.elapsed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const COOLDOWN: Duration = Duration::from_millis(500);

    // ── DropController ──

    #[test]
    fn first_drop_is_always_ready() {
        let c = DropController::default();
        assert!(c.ready(Duration::ZERO, COOLDOWN));
    }

    #[test]
    fn cooldown_blocks_until_elapsed() {
        let c = DropController {
            next_rank: 0,
            last_drop: Some(Duration::from_millis(1000)),
        };
        assert!(!c.ready(Duration::from_millis(1000), COOLDOWN));
        assert!(!c.ready(Duration::from_millis(1499), COOLDOWN));
        assert!(c.ready(Duration::from_millis(1500), COOLDOWN));
    }

    #[test]
    fn next_rank_stays_within_drop_ranks() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut c = DropController::default();
        let mut seen = [false; 3];
        for _ in 0..200 {
            c.roll_next_rank(&mut rng, 3);
            assert!(c.next_rank < 3);
            seen[c.next_rank] = true;
        }
        assert!(seen.iter().all(|s| *s), "all three drop ranks should appear");
    }

    // ── GraceSet ──

    #[test]
    fn grace_expires_after_window_without_further_drops() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut grace = GraceSet::default();
        let window = Duration::from_millis(1500);
        grace.insert(e, Duration::from_millis(200), window);

        assert!(grace.is_exempt(e, Duration::from_millis(200)));
        assert!(grace.is_exempt(e, Duration::from_millis(1699)));
        assert!(!grace.is_exempt(e, Duration::from_millis(1700)));

        grace.prune(Duration::from_millis(1700));
        assert!(grace.is_empty());
    }

    #[test]
    fn unknown_entity_is_not_exempt() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        assert!(!GraceSet::default().is_exempt(e, Duration::ZERO));
    }

    // ── drop_controller_system ──

    fn drop_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        crate::events::add_fusion_messages(&mut app);
        app.insert_resource(GameConfig::default());
        app.insert_resource(RankTable::default());
        app.insert_resource(BodyRegistry::default());
        app.insert_resource(GraceSet::default());
        app.insert_resource(DropIntent::default());
        app.insert_resource(DropController::default());
        app.add_systems(Update, drop_controller_system);
        app
    }

    #[test]
    fn request_spawns_planet_at_aim_and_grants_grace() {
        let mut app = drop_test_app();
        {
            let mut intent = app.world_mut().resource_mut::<DropIntent>();
            intent.set_aim_x(42.0);
            intent.request_drop();
        }
        app.world_mut().resource_mut::<DropController>().next_rank = 2;

        app.update();

        let registry = app.world().resource::<BodyRegistry>();
        assert_eq!(registry.len(), 1);
        let (planet, rank) = registry.all_registered().next().expect("dropped planet");
        assert_eq!(rank, 2);

        let pos = app.world().get::<Transform>(planet).expect("spawned").translation;
        assert_eq!(pos.x, 42.0);
        assert_eq!(pos.y, GameConfig::default().spawn_y());

        assert_eq!(app.world().resource::<GraceSet>().len(), 1);
        assert!(!app.world().resource::<DropIntent>().requested);
        assert!(app.world().resource::<DropController>().last_drop.is_some());
    }

    #[test]
    fn request_during_cooldown_is_ignored() {
        let mut app = drop_test_app();
        app.world_mut().resource_mut::<DropIntent>().request_drop();
        app.update();

        // Wall time between two immediate updates is far below 500 ms.
        app.world_mut().resource_mut::<DropIntent>().request_drop();
        app.update();

        assert_eq!(app.world().resource::<BodyRegistry>().len(), 1);
        assert!(!app.world().resource::<DropIntent>().requested);
    }

    #[test]
    fn no_request_no_drop() {
        let mut app = drop_test_app();
        app.update();
        assert!(app.world().resource::<BodyRegistry>().is_empty());
    }
}
