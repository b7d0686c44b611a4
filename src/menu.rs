//! Title screen and game-over overlay.
//!
//! ## States
//!
//! | State      | UI shown                                    |
//! |------------|---------------------------------------------|
//! | `MainMenu` | Full-screen title with best score           |
//! | `Playing`  | None (HUD lives in `rendering`)             |
//! | `GameOver` | Translucent card over the frozen well       |
//!
//! ## Systems (registered by `MenuPlugin`)
//!
//! | System                    | Schedule              | Purpose                          |
//! |---------------------------|-----------------------|----------------------------------|
//! | `setup_main_menu`         | `OnEnter(MainMenu)`   | Spawn title, START and QUIT      |
//! | `cleanup_main_menu`       | `OnExit(MainMenu)`    | Despawn the title tree           |
//! | `main_menu_button_system` | `Update / MainMenu`   | START, QUIT, Enter key           |
//! | `setup_game_over`         | `OnEnter(GameOver)`   | Spawn result card                |
//! | `cleanup_game_over`       | `OnExit(GameOver)`    | Despawn the card                 |
//! | `game_over_button_system` | `Update / GameOver`   | RETRY, MENU, Enter and Escape    |

use bevy::prelude::*;

use crate::events::SoundCue;
use crate::session::{finalize_run, HighScore, Score};

pub use crate::session::GameState;

mod common;
mod game_over;
mod main_menu;

use common::*;
pub use game_over::{cleanup_game_over, game_over_button_system, setup_game_over};
pub use main_menu::{cleanup_main_menu, main_menu_button_system, setup_main_menu};

// ── Component markers ─────────────────────────────────────────────────────────

/// Root node of the title screen; despawned on `OnExit(MainMenu)`.
#[derive(Component)]
pub struct MainMenuRoot;

#[derive(Component)]
pub struct MenuStartButton;

#[derive(Component)]
pub struct MenuQuitButton;

/// Root node of the game-over overlay; despawned on `OnExit(GameOver)`.
#[derive(Component)]
pub struct GameOverRoot;

#[derive(Component)]
pub struct GameOverRetryButton;

#[derive(Component)]
pub struct GameOverMenuButton;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(OnExit(GameState::MainMenu), cleanup_main_menu)
            .add_systems(
                OnEnter(GameState::GameOver),
                setup_game_over.after(finalize_run),
            )
            .add_systems(OnExit(GameState::GameOver), cleanup_game_over)
            .add_systems(
                Update,
                (
                    main_menu_button_system.run_if(in_state(GameState::MainMenu)),
                    game_over_button_system.run_if(in_state(GameState::GameOver)),
                ),
            );
    }
}
