//! Guard AI: perception, patrol/chase locomotion, contact-QTE capture, stun.
//!
//! Архитектура:
//! - `GuardState` enum FSM, timers live in the variants
//! - Update: frame-rate logic (timers, damage, contacts, perception, QTE)
//! - FixedUpdate: locomotion writes `Velocity`, host physics (or
//!   `HeadlessPhysicsPlugin`) moves the body

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

pub use components::*;
pub use events::*;

/// Per-frame ordering of everything that touches `GuardState`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardSet {
    /// Stun / incapacitation / audio cutoff countdowns
    Timers,
    /// Player swings and guard damage (`CombatPlugin`)
    Damage,
    /// Host collisions: QTE start, wall flip
    Contact,
    Perception,
    /// QTE clock, escape/capture resolution, cling
    Qte,
    /// HUD sync and other read-only consumers
    Presentation,
}

/// AI Plugin
///
/// Update (chained sets):
/// 1. tick_guard_timers
/// 2. (CombatPlugin damage)
/// 3. handle_guard_collisions
/// 4. perceive_players
/// 5. advance_qte_sessions → cling_to_captive
///
/// FixedUpdate: guard_locomotion
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Guard>()
            .register_type::<GuardState>()
            .register_type::<GuardConfig>()
            .register_type::<GuardTint>();

        app.add_event::<GuardCollision>()
            .add_event::<QteUiEvent>()
            .add_event::<PlayerCaptured>()
            .add_event::<GuardIncapacitated>()
            .add_event::<GuardRecovered>();

        app.configure_sets(
            Update,
            (
                GuardSet::Timers,
                GuardSet::Damage,
                GuardSet::Contact,
                GuardSet::Perception,
                GuardSet::Qte,
                GuardSet::Presentation,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                systems::tick_guard_timers.in_set(GuardSet::Timers),
                systems::handle_guard_collisions.in_set(GuardSet::Contact),
                systems::perceive_players.in_set(GuardSet::Perception),
                (systems::advance_qte_sessions, systems::cling_to_captive)
                    .chain()
                    .in_set(GuardSet::Qte),
            ),
        )
        .add_systems(FixedUpdate, systems::guard_locomotion);
    }
}
