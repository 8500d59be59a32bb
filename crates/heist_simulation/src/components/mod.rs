//! ECS components for game entities
//!
//! Organised by domain:
//! - actor: health (guards)
//! - movement: velocity, facing, speed
//! - player: player marker, visibility flag, movement lock, keys, objectives
//!
//! Guard AI state lives in `crate::ai`, level props in `crate::level`.

pub mod actor;
pub mod movement;
pub mod player;

pub use actor::*;
pub use movement::*;
pub use player::*;
