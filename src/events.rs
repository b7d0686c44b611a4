//! Messages emitted by the rule engine for cosmetic, audio and UI consumers.
//!
//! Nothing in the core reads these back; they flow one way out of the
//! simulation.

use bevy::prelude::*;

/// A planet was dropped into the well.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlanetDropped {
    pub rank: usize,
    pub position: Vec2,
}

/// Two planets merged; `rank` is the rank of the planet produced.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlanetsMerged {
    pub rank: usize,
    pub position: Vec2,
    /// Points awarded for this merge (the produced rank's score).
    pub points: u64,
}

/// A merge produced the terminal rank.
#[derive(Message, Debug, Clone, Copy)]
pub struct TerminalRankReached {
    pub position: Vec2,
}

/// A frame extended an active combo past one step.
#[derive(Message, Debug, Clone, Copy)]
pub struct ComboAwarded {
    pub count: u32,
    pub bonus: u64,
}

/// The run ended.  Written once on entering `GameOver`.
#[derive(Message, Debug, Clone, Copy)]
pub struct RunEnded {
    pub score: u64,
    pub high_score: u64,
    pub new_record: bool,
}

/// Fire-and-forget audio notifications.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Drop,
    Merge(usize),
    Combo(u32),
    TerminalRank,
    GameOver,
    UiClick,
}

/// Register every rule-engine message type on `app`.
pub fn add_fusion_messages(app: &mut App) {
    app.add_message::<PlanetDropped>()
        .add_message::<PlanetsMerged>()
        .add_message::<TerminalRankReached>()
        .add_message::<ComboAwarded>()
        .add_message::<RunEnded>()
        .add_message::<SoundCue>();
}
