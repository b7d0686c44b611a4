//! Simulation plugin: the per-frame rule engine and its ordering.
//!
//! ## Frame order
//!
//! | Order | Schedule     | Set                  | Systems                                       |
//! |-------|--------------|----------------------|-----------------------------------------------|
//! | 1     | `Update`     | `FusionSet::Input`   | `advance_run_clock`, input collection         |
//! | 2     | `Update`     | `FusionSet::Drop`    | `drop_controller_system`, `grace_expiry_system` |
//! | 3     | `Update`     | `FusionSet::Forces`  | `gravity_field_system`                        |
//! | 4     | `PostUpdate` | Rapier `PhysicsSet`  | physics step, `CollisionEvent`s written       |
//! | 5     | `PostUpdate` | `FusionSet::Detect`  | `merge_detection_system`                      |
//! | 6     | `PostUpdate` | `FusionSet::Resolve` | `merge_resolution_system`                     |
//! | 7     | `PostUpdate` | `FusionSet::Evaluate`| `combo_tracker_system`, `danger_monitor_system` |
//!
//! Every set runs only in [`GameState::Playing`].  Forces are written before
//! the step; all world mutation from merges happens after Rapier's writeback.
//!
//! The plugin carries no windowing, rendering or Rapier plugin of its own,
//! so headless tests can add it next to `MinimalPlugins` and feed
//! `CollisionEvent`s by hand.

use crate::combo::{combo_tracker_system, ComboTracker};
use crate::config::{load_game_config, GameConfig};
use crate::danger::{danger_monitor_system, DangerTimer};
use crate::drop::{
    drop_controller_system, grace_expiry_system, DropController, DropIntent, GraceSet,
};
use crate::events::add_fusion_messages;
use crate::gravity::gravity_field_system;
use crate::highscore::HighScoreStorage;
use crate::merge::{merge_detection_system, merge_resolution_system, MergeQueue, MergeTally};
use crate::rank::RankTable;
use crate::registry::BodyRegistry;
use crate::session::{
    advance_run_clock, configure_physics, finalize_run, load_high_score, start_run, teardown_run,
    GameState, HighScore, RunClock, Score,
};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Ordered stages of one `Playing` frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FusionSet {
    Input,
    Drop,
    Forces,
    Detect,
    Resolve,
    Evaluate,
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<HighScoreStorage>() {
            app.insert_resource(HighScoreStorage::default());
        }

        app.init_state::<GameState>()
            .add_message::<CollisionEvent>()
            .init_resource::<GameConfig>()
            .init_resource::<RankTable>()
            .init_resource::<BodyRegistry>()
            .init_resource::<MergeQueue>()
            .init_resource::<MergeTally>()
            .init_resource::<ComboTracker>()
            .init_resource::<DangerTimer>()
            .init_resource::<GraceSet>()
            .init_resource::<DropIntent>()
            .init_resource::<DropController>()
            .init_resource::<Score>()
            .init_resource::<HighScore>()
            .init_resource::<RunClock>();
        add_fusion_messages(app);

        app.configure_sets(
            Update,
            (FusionSet::Input, FusionSet::Drop, FusionSet::Forces)
                .chain()
                .run_if(in_state(GameState::Playing)),
        )
        .configure_sets(
            PostUpdate,
            (FusionSet::Detect, FusionSet::Resolve, FusionSet::Evaluate)
                .chain()
                .after(PhysicsSet::Writeback)
                .run_if(in_state(GameState::Playing)),
        );

        app.add_systems(
            Startup,
            (load_high_score, configure_physics.after(load_game_config)),
        )
        .add_systems(OnEnter(GameState::MainMenu), teardown_run)
        .add_systems(OnEnter(GameState::Playing), (teardown_run, start_run).chain())
        .add_systems(OnEnter(GameState::GameOver), finalize_run)
        .add_systems(Update, advance_run_clock.in_set(FusionSet::Input))
        .add_systems(
            Update,
            (drop_controller_system, grace_expiry_system)
                .chain()
                .in_set(FusionSet::Drop),
        )
        .add_systems(Update, gravity_field_system.in_set(FusionSet::Forces))
        .add_systems(PostUpdate, merge_detection_system.in_set(FusionSet::Detect))
        .add_systems(PostUpdate, merge_resolution_system.in_set(FusionSet::Resolve))
        .add_systems(
            PostUpdate,
            (combo_tracker_system, danger_monitor_system)
                .chain()
                .in_set(FusionSet::Evaluate),
        );
    }
}
