//! Game session: the top-level state machine and the per-run lifecycle.
//!
//! ## States
//!
//! | State      | Description                                                 |
//! |------------|-------------------------------------------------------------|
//! | `MainMenu` | Initial state; no planets or walls exist, physics inactive  |
//! | `Playing`  | A run is live; every [`crate::simulation::FusionSet`] ticks |
//! | `GameOver` | Run ended; world frozen in place under the overlay          |
//!
//! Valid transitions are `MainMenu → Playing`, `Playing → GameOver`,
//! `GameOver → Playing` (retry) and `GameOver → MainMenu`.
//!
//! ## Lifecycle systems
//!
//! | System          | Schedule             | Purpose                                          |
//! |-----------------|----------------------|--------------------------------------------------|
//! | `load_high_score` | `Startup`          | Read the persisted high score once               |
//! | `teardown_run`  | `OnEnter(MainMenu)`, `OnEnter(Playing)` | Despawn planets and walls, stop physics |
//! | `start_run`     | `OnEnter(Playing)`   | Reset run state, build the well, start physics   |
//! | `finalize_run`  | `OnEnter(GameOver)`  | Freeze physics, persist `max(score, best)`       |
//! | `advance_run_clock` | `Update / Playing` | Count frames of the current run               |

use crate::combo::ComboTracker;
use crate::config::GameConfig;
use crate::danger::DangerTimer;
use crate::drop::{DropController, DropIntent, GraceSet};
use crate::events::{RunEnded, SoundCue};
use crate::highscore::HighScoreStorage;
use crate::merge::{MergeQueue, MergeTally};
use crate::planet::{spawn_walls, Planet, Wall};
use crate::registry::BodyRegistry;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level application state machine.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Title screen; shown on startup.
    #[default]
    MainMenu,
    /// A run is in progress.
    Playing,
    /// The danger threshold was breached; the world is frozen.
    GameOver,
}

// ── Session resources ─────────────────────────────────────────────────────────

/// Points earned in the current run.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub points: u64,
}

impl Score {
    #[inline]
    pub fn add(&mut self, points: u64) {
        self.points = self.points.saturating_add(points);
    }

    /// Whether this score deserves the "new record" banner against `high`.
    ///
    /// `high` is the already-updated best, so a tie with it counts.
    #[inline]
    pub fn is_new_record(&self, high: u64) -> bool {
        self.points > 0 && self.points >= high
    }
}

/// Best score across runs.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HighScore(pub u64);

/// Frames elapsed in the current run.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunClock {
    pub frames: u64,
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Startup: read the persisted high score into [`HighScore`].
pub fn load_high_score(storage: Res<HighScoreStorage>, mut high: ResMut<HighScore>) {
    high.0 = storage.read();
    info!("High score loaded: {}", high.0);
}

/// Startup: apply world gravity and keep the pipeline idle until a run starts.
pub fn configure_physics(config: Res<GameConfig>, mut rapier: Query<&mut RapierConfiguration>) {
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -config.world_gravity);
        cfg.physics_pipeline_active = false;
    }
}

/// Destroy the run world: despawn every planet and wall, clear the registry
/// and queues, and stop the physics pipeline.
///
/// Runs on entering `MainMenu` and at the start of every `Playing` entry so a
/// retry from `GameOver` never inherits the frozen world.
#[allow(clippy::type_complexity)]
pub fn teardown_run(
    mut commands: Commands,
    bodies: Query<Entity, Or<(With<Planet>, With<Wall>)>>,
    mut registry: ResMut<BodyRegistry>,
    mut queue: ResMut<MergeQueue>,
    mut grace: ResMut<GraceSet>,
    mut rapier: Query<&mut RapierConfiguration>,
) {
    for e in bodies.iter() {
        commands.entity(e).despawn();
    }
    registry.clear();
    queue.clear();
    grace.clear();
    for mut cfg in rapier.iter_mut() {
        cfg.physics_pipeline_active = false;
    }
}

/// Begin a fresh run: reset every per-run counter, build the well, start
/// physics and choose the first planet.
#[allow(clippy::too_many_arguments)]
pub fn start_run(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut score: ResMut<Score>,
    mut combo: ResMut<ComboTracker>,
    mut danger: ResMut<DangerTimer>,
    mut tally: ResMut<MergeTally>,
    mut intent: ResMut<DropIntent>,
    mut controller: ResMut<DropController>,
    mut clock: ResMut<RunClock>,
    mut rapier: Query<&mut RapierConfiguration>,
) {
    *score = Score::default();
    *combo = ComboTracker::default();
    *danger = DangerTimer::default();
    *tally = MergeTally::default();
    *intent = DropIntent::default();
    *controller = DropController::default();
    *clock = RunClock::default();
    controller.roll_next_rank(&mut rand::thread_rng(), config.drop_rank_count);

    spawn_walls(&mut commands, &config);

    for mut cfg in rapier.iter_mut() {
        cfg.gravity = Vec2::new(0.0, -config.world_gravity);
        cfg.physics_pipeline_active = true;
    }

    info!("Run started");
}

/// End the run: freeze physics, persist the better of this score and the
/// best loaded at startup, and announce it.
///
/// Storage is written exactly once here and never read.  A failed write is logged and the in-memory high score still updates.
pub fn finalize_run(
    score: Res<Score>,
    mut high: ResMut<HighScore>,
    mut storage: ResMut<HighScoreStorage>,
    mut rapier: Query<&mut RapierConfiguration>,
    mut ended: MessageWriter<RunEnded>,
    mut cues: MessageWriter<SoundCue>,
) {
    for mut cfg in rapier.iter_mut() {
        cfg.physics_pipeline_active = false;
    }

    let best = score.points.max(high.0);
    if let Err(e) = storage.write(best) {
        warn!("Could not persist high score: {e}");
    }
    high.0 = best;

    ended.write(RunEnded {
        score: score.points,
        high_score: best,
        new_record: score.is_new_record(best),
    });
    cues.write(SoundCue::GameOver);
    info!("Run over: score {} (best {})", score.points, best);
}

/// Count frames of the active run.
pub fn advance_run_clock(mut clock: ResMut<RunClock>) {
    clock.frames += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_saturates() {
        let mut s = Score { points: u64::MAX - 1 };
        s.add(10);
        assert_eq!(s.points, u64::MAX);
    }

    #[test]
    fn new_record_requires_points_and_tie_counts() {
        assert!(!Score { points: 0 }.is_new_record(0));
        assert!(Score { points: 500 }.is_new_record(500));
        assert!(!Score { points: 499 }.is_new_record(500));
    }
}
