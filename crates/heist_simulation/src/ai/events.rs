//! AI events: contacts from the host physics in, collaborator calls out.
//!
//! Host physics → `GuardCollision` → contact / wall-flip handling
//! Guard FSM → `QteUiEvent` (QTE panel), `PlayerCaptured` (game session)

use bevy::prelude::*;

use super::components::EscapeKey;

/// Collision reported by the host for a guard body.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct GuardCollision {
    pub guard: Entity,
    pub other: Entity,
    /// Trigger volumes (pickups, hiding spots) never flip a patrol
    pub other_is_trigger: bool,
}

/// Commands for the QTE panel.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum QteUiEvent {
    Show {
        guard: Entity,
        required_presses: u32,
        time_limit: f32,
        key: EscapeKey,
    },
    Hide {
        guard: Entity,
    },
}

/// A guard won the QTE. Consumed by the game session (lives / restart).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCaptured {
    pub guard: Entity,
    pub player: Entity,
}

/// Guard knocked out (health depleted).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardIncapacitated {
    pub guard: Entity,
}

/// Guard back on patrol after incapacitation, health restored.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardRecovered {
    pub guard: Entity,
}
