//! Combat module: player swings, guard damage, knockback.
//!
//! ECS ответственность:
//! - game state: Health, Knockback, Attacker cooldown
//! - rules: immunity while down/capturing, QTE cancel on hit
//!
//! Host ответственность:
//! - swing animation, hit VFX, grey sprite tint (reads `GuardTint`)

use bevy::prelude::*;

pub mod attacker;
pub mod damage;
pub mod knockback;

pub use attacker::{tick_attack_cooldowns, AttackIntent, Attacker};
pub use damage::{resolve_hit, DamageRequested, HitOutcome};
pub use knockback::Knockback;

use crate::ai::GuardSet;

/// Combat Plugin
///
/// Update (`GuardSet::Damage`):
/// 1. resolve_attack_intents — AttackIntent → DamageRequested
/// 2. apply_guard_damage — health, knockback, incapacitation
///
/// FixedUpdate: tick_attack_cooldowns
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackIntent>()
            .add_event::<DamageRequested>();

        app.add_systems(
            Update,
            (attacker::resolve_attack_intents, damage::apply_guard_damage)
                .chain()
                .in_set(GuardSet::Damage),
        )
        .add_systems(FixedUpdate, tick_attack_cooldowns);
    }
}
