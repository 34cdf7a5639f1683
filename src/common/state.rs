//! Global state machine.
//!
//! `Restarting` exists for one frame between two `InGame` runs so that
//! `DespawnOnExit(InGame)` tears the level down before it is rebuilt.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    Restarting,
}
