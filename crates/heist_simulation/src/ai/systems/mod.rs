//! Guard AI systems

pub mod capture;
pub mod locomotion;
pub mod perception;
pub mod timers;

pub use capture::*;
pub use locomotion::*;
pub use perception::*;
pub use timers::*;
