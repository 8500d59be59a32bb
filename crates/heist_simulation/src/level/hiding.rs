//! Hiding spots: the player vanishes from every guard's perception.

use bevy::prelude::*;

use crate::components::{MovementLock, Player, PlayerVisibility, Velocity};

/// Locker / bush the player can step into. One occupant at a time.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct HidingSpot {
    pub occupant: Option<Entity>,
}

impl HidingSpot {
    /// Evicts the occupant, if any.
    pub fn force_reveal(&mut self) -> Option<Entity> {
        self.occupant.take()
    }
}

/// Player pressed "interact" at a hiding spot: enter or leave.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HideToggle {
    pub player: Entity,
    pub spot: Entity,
}

/// Pull whoever hides in `spot` back out.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceReveal {
    pub spot: Entity,
}

fn reveal(visibility: &mut PlayerVisibility, lock: &mut MovementLock) {
    visibility.visible = true;
    lock.unlock();
}

/// System: HideToggle → hide / unhide
///
/// A locked player (held by a guard, captured) cannot hide.
pub fn handle_hide_toggles(
    mut toggles: EventReader<HideToggle>,
    mut spots: Query<&mut HidingSpot>,
    mut players: Query<(&mut PlayerVisibility, &mut MovementLock, &mut Velocity), With<Player>>,
) {
    for toggle in toggles.read() {
        let (Ok(mut spot), Ok((mut visibility, mut lock, mut velocity))) =
            (spots.get_mut(toggle.spot), players.get_mut(toggle.player))
        else {
            continue;
        };

        match spot.occupant {
            Some(occupant) if occupant == toggle.player => {
                spot.occupant = None;
                reveal(&mut visibility, &mut lock);
                crate::log(&format!("🫥 Player {:?} left hiding spot {:?}", toggle.player, toggle.spot));
            }
            Some(_) => {
                crate::log(&format!("Hiding spot {:?} is taken", toggle.spot));
            }
            None if lock.locked || !visibility.visible => {
                crate::log(&format!(
                    "Player {:?} can't hide right now (locked or already hidden)",
                    toggle.player
                ));
            }
            None => {
                spot.occupant = Some(toggle.player);
                visibility.visible = false;
                lock.lock();
                velocity.0 = Vec2::ZERO;
                crate::log(&format!("🫥 Player {:?} hid in {:?}", toggle.player, toggle.spot));
            }
        }
    }
}

/// System: ForceReveal → evict the occupant
pub fn handle_force_reveal(
    mut reveals: EventReader<ForceReveal>,
    mut spots: Query<&mut HidingSpot>,
    mut players: Query<(&mut PlayerVisibility, &mut MovementLock), With<Player>>,
) {
    for event in reveals.read() {
        let Ok(mut spot) = spots.get_mut(event.spot) else {
            continue;
        };
        let Some(player) = spot.force_reveal() else {
            continue;
        };
        if let Ok((mut visibility, mut lock)) = players.get_mut(player) {
            reveal(&mut visibility, &mut lock);
            crate::log(&format!("Player {:?} forced out of {:?}", player, event.spot));
        }
    }
}
