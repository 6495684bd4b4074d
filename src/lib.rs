//! Alien Invasion: a terminal arcade shooter.
//!
//! The library is the game core: entities, the fleet sweep, collision
//! effects and the round state machine, all driven by an injected RNG and
//! an immutable `GameConfig`. Rendering, input polling and sound live in
//! the binary and only talk to the core through `RoundState`,
//! `FrameInput` and `Cue`.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod fleet;
pub mod score;
