//! Attacker component: the player's melee swing that knocks guards back.
//!
//! Архитектура:
//! - host input → `AttackIntent` (direction the player is facing)
//! - ECS: cooldown check, hit area query, `DamageRequested` per guard hit
//! - animation stays in the host

use bevy::prelude::*;

use super::damage::DamageRequested;
use crate::ai::Guard;

/// Attack stats of an actor that can hit guards.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Damage per hit (guards have 2 HP by default)
    pub base_damage: u32,

    /// Seconds between swings
    pub attack_cooldown: f32,

    /// Counts down to 0
    pub cooldown_timer: f32,

    /// Reach in front of the attacker
    pub attack_radius: f32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            base_damage: 1,
            attack_cooldown: 0.5,
            cooldown_timer: 0.0,
            attack_radius: 1.5,
        }
    }
}

impl Attacker {
    pub fn can_attack(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    pub fn start_attack(&mut self) {
        self.cooldown_timer = self.attack_cooldown;
    }

    /// Hit area: circle of diameter `attack_radius` just in front of the
    /// attacker, touching `origin` on its back edge.
    pub fn reaches(&self, origin: Vec2, direction: Vec2, target: Vec2) -> bool {
        let half = self.attack_radius * 0.5;
        let center = origin + direction * half;
        center.distance(target) <= half
    }
}

/// Swing request from the host input layer.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub direction: Vec2,
}

/// System: cooldown timers
pub fn tick_attack_cooldowns(mut query: Query<&mut Attacker>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut attacker in query.iter_mut() {
        if attacker.cooldown_timer > 0.0 {
            attacker.cooldown_timer = (attacker.cooldown_timer - delta).max(0.0);
        }
    }
}

/// System: AttackIntent → DamageRequested for every guard in the hit area
pub fn resolve_attack_intents(
    mut intents: EventReader<AttackIntent>,
    mut attackers: Query<(&mut Attacker, &Transform), Without<Guard>>,
    guards: Query<(Entity, &Transform), With<Guard>>,
    mut damage: EventWriter<DamageRequested>,
) {
    for intent in intents.read() {
        let Ok((mut attacker, attacker_transform)) = attackers.get_mut(intent.attacker) else {
            crate::log_warning(&format!(
                "AttackIntent: {:?} has no Attacker component",
                intent.attacker
            ));
            continue;
        };
        if !attacker.can_attack() {
            continue;
        }
        attacker.start_attack();

        let origin = attacker_transform.translation.truncate();
        let direction = intent.direction.normalize_or_zero();
        for (guard, guard_transform) in guards.iter() {
            let position = guard_transform.translation.truncate();
            if !attacker.reaches(origin, direction, position) {
                continue;
            }

            crate::log(&format!("🗡️ {:?} hits guard {:?}", intent.attacker, guard));
            damage.write(DamageRequested {
                target: guard,
                amount: attacker.base_damage,
                knockback_direction: (position - origin).normalize_or(direction),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attacker_cooldown() {
        let mut attacker = Attacker::default();
        assert!(attacker.can_attack());

        attacker.start_attack();
        assert!(!attacker.can_attack());
        assert_eq!(attacker.cooldown_timer, 0.5);

        attacker.cooldown_timer -= 0.5;
        assert!(attacker.can_attack());
    }

    #[test]
    fn test_reach_is_a_circle_in_front() {
        let attacker = Attacker::default();
        let origin = Vec2::ZERO;

        assert!(attacker.reaches(origin, Vec2::X, Vec2::new(1.0, 0.5)));
        assert!(attacker.reaches(origin, Vec2::X, Vec2::new(1.5, 0.0)));
        assert!(!attacker.reaches(origin, Vec2::X, Vec2::new(-1.0, 0.0)));
        assert!(!attacker.reaches(origin, Vec2::X, Vec2::new(3.0, 0.0)));

        // Close but off to the side: outside the circle
        assert!(!attacker.reaches(origin, Vec2::X, Vec2::new(0.2, 0.7)));
    }
}
