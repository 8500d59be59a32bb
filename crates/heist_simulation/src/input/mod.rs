//! Escape-action input sampled once per frame.
//!
//! Host input layer calls `EscapeInput::press` for every key-down edge it sees
//! during the frame; the buffer is cleared in `Last`, after every consumer ran.

use bevy::prelude::*;

use crate::ai::EscapeKey;

#[derive(Resource, Debug, Default, Clone)]
pub struct EscapeInput {
    just_pressed: Vec<EscapeKey>,
}

impl EscapeInput {
    pub fn press(&mut self, key: EscapeKey) {
        if !self.just_pressed.contains(&key) {
            self.just_pressed.push(key);
        }
    }

    pub fn was_just_pressed(&self, key: EscapeKey) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn clear(&mut self) {
        self.just_pressed.clear();
    }
}

pub fn clear_escape_input(mut input: ResMut<EscapeInput>) {
    input.clear();
}

pub struct EscapeInputPlugin;

impl Plugin for EscapeInputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EscapeInput>()
            .add_systems(Last, clear_escape_input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_is_per_key_and_deduplicated() {
        let mut input = EscapeInput::default();
        input.press(EscapeKey::E);
        input.press(EscapeKey::E);

        assert!(input.was_just_pressed(EscapeKey::E));
        assert!(!input.was_just_pressed(EscapeKey::Space));

        input.clear();
        assert!(!input.was_just_pressed(EscapeKey::E));
    }
}
