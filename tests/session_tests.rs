//! Headless tests for a whole run driven through [`SimulationPlugin`].
//!
//! These tests use [`MinimalPlugins`] with no window, renderer or Rapier
//! pipeline.  Contacts are injected as `CollisionEvent`s and time advances by
//! a fixed 1/60 s per update, so every scenario is deterministic.
//!
//! Covered scenarios:
//! 1. Default state is `MainMenu`; starting a run builds the well.
//! 2. An equal-rank contact merges, scores and shrinks the body count.
//! 3. A terminal-rank pair never merges.
//! 4. Four consecutive merge frames pay the 100 / 150 / 200 combo bonuses.
//! 5. A planet resting above the limit ends the run on the 121st frame and
//!    the best score is persisted.
//! 6. A freshly dropped planet is exempt from the danger check.
//! 7. Retry from `GameOver` starts from a clean slate.
//! 8. Returning to the menu tears the world down.
//! 9. Storage is read once at startup and written once per finished run.

use std::time::Duration;

use bevy::ecs::message::Messages;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier2d::prelude::*;
use bevy_rapier2d::rapier::geometry::CollisionEventFlags;
use cosmic_fusion::combo::ComboTracker;
use cosmic_fusion::danger::DangerTimer;
use cosmic_fusion::drop::{DropIntent, GraceSet};
use cosmic_fusion::events::{ComboAwarded, PlanetDropped, RunEnded};
use cosmic_fusion::highscore::{HighScoreStorage, MemoryHighScoreStore};
use cosmic_fusion::planet::{Planet, Wall};
use cosmic_fusion::registry::BodyRegistry;
use cosmic_fusion::session::{GameState, HighScore, Score};
use cosmic_fusion::simulation::SimulationPlugin;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Headless app with a stored best of `stored_best` and a fixed frame time.
fn session_app(stored_best: u64) -> App {
    session_app_with_store(MemoryHighScoreStore::with_value(stored_best))
}

/// Headless app backed by `store`; keep a clone to inspect its counters.
fn session_app_with_store(store: MemoryHighScoreStore) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(HighScoreStorage::from_store(store));
    app.add_plugins(SimulationPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / 60.0,
    )));
    app.update(); // Startup + settle into MainMenu
    app
}

fn set_state(app: &mut App, state: GameState) {
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(state);
    app.update();
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

/// App already inside a fresh run.
fn playing_app(stored_best: u64) -> App {
    let mut app = session_app(stored_best);
    set_state(&mut app, GameState::Playing);
    assert_eq!(state(&app), GameState::Playing);
    app
}

/// Place a resting registered planet without going through the drop path.
fn place_planet(app: &mut App, rank: usize, pos: Vec2) -> Entity {
    let e = app
        .world_mut()
        .spawn((
            Planet,
            Transform::from_translation(pos.extend(0.0)),
            Velocity::zero(),
        ))
        .id();
    app.world_mut().resource_mut::<BodyRegistry>().register(e, rank);
    e
}

fn touch(app: &mut App, a: Entity, b: Entity) {
    app.world_mut()
        .write_message(CollisionEvent::Started(a, b, CollisionEventFlags::empty()));
}

fn count<T: Component>(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<Entity, With<T>>();
    query.iter(app.world()).count()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn app_starts_in_main_menu_with_stored_best() {
    let app = session_app(420);
    assert_eq!(state(&app), GameState::MainMenu);
    assert_eq!(app.world().resource::<HighScore>().0, 420);
}

#[test]
fn starting_a_run_builds_the_well() {
    let mut app = playing_app(0);
    assert_eq!(count::<Wall>(&mut app), 3);
    assert_eq!(count::<Planet>(&mut app), 0);
    assert_eq!(app.world().resource::<Score>().points, 0);
    assert!(app.world().resource::<BodyRegistry>().is_empty());
}

#[test]
fn equal_rank_contact_merges_and_scores() {
    let mut app = playing_app(0);
    let a = place_planet(&mut app, 0, Vec2::new(-10.0, 100.0));
    let b = place_planet(&mut app, 0, Vec2::new(10.0, 100.0));

    touch(&mut app, a, b);
    app.update();

    let registry = app.world().resource::<BodyRegistry>();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.all_registered().next().map(|(_, r)| r), Some(1));
    assert_eq!(app.world().resource::<Score>().points, 30);
    assert!(app.world().get_entity(a).is_err());
    assert!(app.world().get_entity(b).is_err());
}

#[test]
fn terminal_rank_pair_never_merges() {
    let mut app = playing_app(0);
    let a = place_planet(&mut app, 7, Vec2::new(-100.0, 100.0));
    let b = place_planet(&mut app, 7, Vec2::new(100.0, 100.0));

    touch(&mut app, a, b);
    app.update();

    assert_eq!(app.world().resource::<BodyRegistry>().len(), 2);
    assert_eq!(app.world().resource::<Score>().points, 0);
}

#[test]
fn consecutive_merge_frames_pay_growing_combo_bonus() {
    let mut app = playing_app(0);
    let pairs: Vec<(Entity, Entity)> = (0..4)
        .map(|i| {
            let x = -150.0 + 80.0 * i as f32;
            (
                place_planet(&mut app, 0, Vec2::new(x, 50.0)),
                place_planet(&mut app, 0, Vec2::new(x + 20.0, 50.0)),
            )
        })
        .collect();

    for (a, b) in pairs {
        touch(&mut app, a, b);
        app.update();
    }

    // 4 merges at 30 plus bonuses 100 + 150 + 200.
    assert_eq!(app.world().resource::<Score>().points, 4 * 30 + 450);
    assert_eq!(app.world().resource::<ComboTracker>().count, 4);
    assert!(!app.world().resource::<Messages<ComboAwarded>>().is_empty());
}

#[test]
fn planet_held_above_limit_ends_run_on_frame_121() {
    let mut app = playing_app(50);
    place_planet(&mut app, 0, Vec2::new(0.0, 600.0));
    app.world_mut().resource_mut::<Score>().points = 80;

    for _ in 0..120 {
        app.update();
    }
    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(app.world().resource::<DangerTimer>().ticks, 120);

    // Frame 121 breaches; the transition lands on the following frame.
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::GameOver);

    assert_eq!(app.world().resource::<HighScore>().0, 80);
    assert_eq!(app.world().resource::<HighScoreStorage>().read(), 80);
    assert_eq!(app.world().resource::<Messages<RunEnded>>().len(), 1);
}

#[test]
fn lower_score_keeps_stored_best() {
    let mut app = playing_app(500);
    place_planet(&mut app, 0, Vec2::new(0.0, 600.0));
    app.world_mut().resource_mut::<Score>().points = 80;

    for _ in 0..130 {
        app.update();
    }
    assert_eq!(state(&app), GameState::GameOver);
    assert_eq!(app.world().resource::<HighScore>().0, 500);
    assert_eq!(app.world().resource::<HighScoreStorage>().read(), 500);
}

#[test]
fn dropped_planet_is_exempt_during_grace() {
    let mut app = playing_app(0);
    {
        let mut intent = app.world_mut().resource_mut::<DropIntent>();
        intent.set_aim_x(0.0);
        intent.request_drop();
    }
    app.update();

    assert_eq!(app.world().resource::<BodyRegistry>().len(), 1);
    assert_eq!(app.world().resource::<GraceSet>().len(), 1);
    assert_eq!(app.world().resource::<Messages<PlanetDropped>>().len(), 1);

    // Without a physics step the planet stays at the spawn height, above
    // the limit line, but the grace window keeps the timer idle.
    for _ in 0..60 {
        app.update();
    }
    assert_eq!(app.world().resource::<DangerTimer>().ticks, 0);

    // Once grace expires the resting planet counts.
    for _ in 0..60 {
        app.update();
    }
    assert!(app.world().resource::<GraceSet>().is_empty());
    assert!(app.world().resource::<DangerTimer>().ticks > 0);
}

#[test]
fn retry_after_game_over_starts_clean() {
    let mut app = playing_app(0);
    place_planet(&mut app, 2, Vec2::new(0.0, 600.0));
    app.world_mut().resource_mut::<Score>().points = 60;
    for _ in 0..130 {
        app.update();
    }
    assert_eq!(state(&app), GameState::GameOver);

    set_state(&mut app, GameState::Playing);

    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(count::<Planet>(&mut app), 0);
    assert_eq!(count::<Wall>(&mut app), 3);
    assert!(app.world().resource::<BodyRegistry>().is_empty());
    assert_eq!(app.world().resource::<Score>().points, 0);
    assert_eq!(app.world().resource::<DangerTimer>().ticks, 0);
    assert_eq!(app.world().resource::<HighScore>().0, 60);
}

#[test]
fn returning_to_menu_tears_down_the_world() {
    let mut app = playing_app(0);
    place_planet(&mut app, 1, Vec2::new(0.0, 100.0));
    app.update();

    set_state(&mut app, GameState::MainMenu);

    assert_eq!(state(&app), GameState::MainMenu);
    assert_eq!(count::<Planet>(&mut app), 0);
    assert_eq!(count::<Wall>(&mut app), 0);
    assert!(app.world().resource::<BodyRegistry>().is_empty());
}

#[test]
fn simulation_is_idle_outside_playing() {
    let mut app = session_app(0);
    let a = place_planet(&mut app, 0, Vec2::new(-10.0, 100.0));
    let b = place_planet(&mut app, 0, Vec2::new(10.0, 100.0));
    touch(&mut app, a, b);
    app.update();

    assert_eq!(app.world().resource::<BodyRegistry>().len(), 2);
    assert_eq!(app.world().resource::<Score>().points, 0);
}

#[test]
fn storage_is_read_once_and_written_once_per_run() {
    let store = MemoryHighScoreStore::with_value(40);
    let mut app = session_app_with_store(store.clone());
    assert_eq!(store.reads(), 1);
    assert_eq!(store.writes(), 0);

    set_state(&mut app, GameState::Playing);
    place_planet(&mut app, 0, Vec2::new(0.0, 600.0));
    app.world_mut().resource_mut::<Score>().points = 90;
    for _ in 0..130 {
        app.update();
    }
    assert_eq!(state(&app), GameState::GameOver);
    assert_eq!(store.writes(), 1);
    assert_eq!(store.reads(), 1);
    assert_eq!(store.value(), 90);

    // Lingering on the game-over screen does not write again.
    for _ in 0..10 {
        app.update();
    }
    assert_eq!(store.writes(), 1);

    set_state(&mut app, GameState::Playing);
    assert_eq!(store.writes(), 1);

    set_state(&mut app, GameState::MainMenu);
    assert_eq!(store.writes(), 1);
    assert_eq!(store.reads(), 1);
    assert_eq!(app.world().resource::<HighScore>().0, 90);
}
