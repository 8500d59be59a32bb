//! Pickups: keys, objective materials, speed boots.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{KeyRing, MovementSpeed, Objectives, Player, SpeedBoost};

pub const SPEED_BOOST_MULTIPLIER: f32 = 2.0;
pub const SPEED_BOOST_DURATION: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub enum PickupKind {
    Key,
    Material,
    SpeedBoost,
}

/// Host trigger: the player walked over a pickup (the host removes it).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupCollected {
    pub player: Entity,
    pub kind: PickupKind,
}

/// System: PickupCollected → inventory / objectives / speed
pub fn apply_pickups(
    mut commands: Commands,
    mut collected: EventReader<PickupCollected>,
    mut players: Query<
        (
            &mut KeyRing,
            &mut Objectives,
            &mut MovementSpeed,
            Option<&mut SpeedBoost>,
        ),
        With<Player>,
    >,
) {
    for pickup in collected.read() {
        let Ok((mut keys, mut objectives, mut speed, boost)) = players.get_mut(pickup.player) else {
            continue;
        };

        match pickup.kind {
            PickupKind::Key => {
                keys.add(1);
                crate::log(&format!("🔑 Key collected ({} total)", keys.keys));
            }
            PickupKind::Material => {
                objectives.materials_collected = objectives.materials_collected.saturating_add(1);
                crate::log(&format!(
                    "💎 Material {}/{}",
                    objectives.materials_collected, objectives.materials_required
                ));
            }
            PickupKind::SpeedBoost => {
                speed.current = speed.base * SPEED_BOOST_MULTIPLIER;
                match boost {
                    // Restart, don't stack
                    Some(mut boost) => boost.remaining = SPEED_BOOST_DURATION,
                    None => {
                        commands.entity(pickup.player).insert(SpeedBoost {
                            multiplier: SPEED_BOOST_MULTIPLIER,
                            remaining: SPEED_BOOST_DURATION,
                        });
                    }
                }
                crate::log(&format!("👟 Speed boost: {:.1} for {:.0}s", speed.current, SPEED_BOOST_DURATION));
            }
        }
    }
}

/// System: boost countdown; base speed back on expiry
pub fn tick_speed_boosts(
    time: Res<Time>,
    mut commands: Commands,
    mut boosted: Query<(Entity, &mut SpeedBoost, &mut MovementSpeed)>,
) {
    let delta = time.delta_secs();

    for (entity, mut boost, mut speed) in boosted.iter_mut() {
        boost.remaining -= delta;
        if boost.remaining > 0.0 {
            speed.current = speed.base * boost.multiplier;
            continue;
        }

        speed.current = speed.base;
        commands.entity(entity).remove::<SpeedBoost>();
        crate::log(&format!("👟 Speed boost ended ({:.1})", speed.current));
    }
}
