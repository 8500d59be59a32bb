//! Main HUD counters: lives, keys, materials.

use bevy::prelude::*;

use crate::components::{KeyRing, Objectives, Player};
use crate::level::GameSession;

/// Colour band of the lives counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivesWarning {
    /// 3+ lives (white)
    Healthy,
    /// 2 lives (yellow)
    Caution,
    /// 1 life or less (red)
    Danger,
}

/// Counters the host draws at the top of the screen during a level.
///
/// `visible` is false while no player is spawned (menus, game over);
/// lives are tracked regardless.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct GameHud {
    pub visible: bool,
    pub lives: u32,
    pub keys: u32,
    pub materials_collected: u32,
    pub materials_required: u32,
}

impl GameHud {
    pub fn lives_text(&self) -> String {
        format!("x {}", self.lives)
    }

    pub fn keys_text(&self) -> String {
        format!("x {}", self.keys)
    }

    pub fn materials_text(&self) -> String {
        format!("{} / {}", self.materials_collected, self.materials_required)
    }

    pub fn lives_warning(&self) -> LivesWarning {
        match self.lives {
            0 | 1 => LivesWarning::Danger,
            2 => LivesWarning::Caution,
            _ => LivesWarning::Healthy,
        }
    }

    /// Materials counter turns green.
    pub fn materials_complete(&self) -> bool {
        self.materials_collected >= self.materials_required
    }
}

/// System: session + player inventory → HUD counters
pub fn sync_game_hud(
    hud: Option<ResMut<GameHud>>,
    session: Option<Res<GameSession>>,
    players: Query<(&KeyRing, &Objectives), With<Player>>,
) {
    let Some(mut hud) = hud else {
        return;
    };

    let mut next = GameHud {
        lives: session.map_or(hud.lives, |s| s.lives),
        ..default()
    };
    if let Some((keys, objectives)) = players.iter().next() {
        next.visible = true;
        next.keys = keys.keys;
        next.materials_collected = objectives.materials_collected;
        next.materials_required = objectives.materials_required;
    }

    hud.set_if_neq(next);
}
