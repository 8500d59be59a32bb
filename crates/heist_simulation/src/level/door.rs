//! Locked doors opened with keys.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{KeyRing, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum DoorState {
    #[default]
    Locked,
    Open,
}

/// Door blocking a passage. The host disables its collider once `Open`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Door {
    pub state: DoorState,
}

impl Door {
    /// Opens with one key from the ring. `None` if already open.
    pub fn try_open(&mut self, keys: &mut KeyRing) -> Option<DoorEvent> {
        match self.state {
            DoorState::Open => None,
            DoorState::Locked if keys.try_use() => {
                self.state = DoorState::Open;
                Some(DoorEvent::Opened)
            }
            DoorState::Locked => Some(DoorEvent::StillLocked),
        }
    }
}

/// Player bumped into a door.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorTouched {
    pub door: Entity,
    pub player: Entity,
}

/// Door feedback for the host (open animation, "locked" sound).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorEvent {
    Opened,
    StillLocked,
}

/// System: DoorTouched → try the player's keys
pub fn handle_door_touches(
    mut touches: EventReader<DoorTouched>,
    mut doors: Query<&mut Door>,
    mut players: Query<&mut KeyRing, With<Player>>,
    mut feedback: EventWriter<DoorEvent>,
) {
    for touch in touches.read() {
        let (Ok(mut door), Ok(mut keys)) = (doors.get_mut(touch.door), players.get_mut(touch.player))
        else {
            continue;
        };

        if let Some(event) = door.try_open(&mut keys) {
            match event {
                DoorEvent::Opened => crate::log(&format!(
                    "🚪 Door {:?} opened ({} key(s) left)",
                    touch.door, keys.keys
                )),
                DoorEvent::StillLocked => {
                    crate::log(&format!("🔒 Door {:?} is locked, no key", touch.door))
                }
            }
            feedback.write(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_needs_a_key() {
        let mut door = Door::default();
        let mut keys = KeyRing::default();

        assert_eq!(door.try_open(&mut keys), Some(DoorEvent::StillLocked));
        assert_eq!(door.state, DoorState::Locked);

        keys.add(1);
        assert_eq!(door.try_open(&mut keys), Some(DoorEvent::Opened));
        assert_eq!(door.state, DoorState::Open);
        assert_eq!(keys.keys, 0);
    }

    #[test]
    fn test_open_door_keeps_keys() {
        let mut door = Door {
            state: DoorState::Open,
        };
        let mut keys = KeyRing { keys: 2 };

        assert_eq!(door.try_open(&mut keys), None);
        assert_eq!(keys.keys, 2);
    }
}
