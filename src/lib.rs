//! Cosmic Fusion game library
//!
//! A falling-planet merge puzzle: drop planets into a walled well, merge
//! equal ranks on contact, chain merges into combos, and keep the stack
//! below the limit line.

pub mod audio;
pub mod combo;
pub mod config;
pub mod constants;
pub mod danger;
pub mod drop;
pub mod error;
pub mod events;
pub mod graphics;
pub mod gravity;
pub mod highscore;
pub mod input;
pub mod menu;
pub mod merge;
pub mod particles;
pub mod planet;
pub mod rank;
pub mod registry;
pub mod rendering;
pub mod session;
pub mod simulation;
