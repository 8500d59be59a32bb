//! HUD models the host UI renders: the QTE panel and the main counters.
//!
//! `QteUiEvent` opens/closes the QTE panel, `sync_qte_hud` polls the owning
//! guard's session every frame. Without a `QteHud` resource (host has no
//! panel) events are dropped with a single warning; the QTE itself still runs.
//! `GameHud` (lives, keys, materials) lives in `counters`.

use bevy::prelude::*;

pub mod counters;

pub use counters::{sync_game_hud, GameHud, LivesWarning};

use crate::ai::{EscapeKey, Guard, GuardSet, GuardState, QteUiEvent};

#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct QteHud {
    pub visible: bool,
    pub guard: Option<Entity>,
    pub key: EscapeKey,
    pub required: u32,
    pub presses: u32,
    pub time_limit: f32,
    pub remaining: f32,
}

impl QteHud {
    pub fn show(&mut self, guard: Entity, required: u32, time_limit: f32, key: EscapeKey) {
        *self = Self {
            visible: true,
            guard: Some(guard),
            key,
            required,
            presses: 0,
            time_limit,
            remaining: time_limit,
        };
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.guard = None;
    }

    pub fn prompt_text(&self) -> String {
        format!("Press {} to escape!", self.key)
    }

    pub fn progress_text(&self) -> String {
        format!("{} / {}", self.presses, self.required)
    }

    pub fn time_text(&self) -> String {
        format!("{:.1}s", self.remaining)
    }
}

/// System: QteUiEvent → panel open/close
pub fn apply_qte_ui_events(
    mut events: EventReader<QteUiEvent>,
    hud: Option<ResMut<QteHud>>,
    mut warned: Local<bool>,
) {
    let Some(mut hud) = hud else {
        if !events.is_empty() && !*warned {
            crate::log_warning("QTE: no QteHud bound, panel updates skipped");
            *warned = true;
        }
        events.clear();
        return;
    };

    for event in events.read() {
        match *event {
            QteUiEvent::Show {
                guard,
                required_presses,
                time_limit,
                key,
            } => hud.show(guard, required_presses, time_limit, key),
            QteUiEvent::Hide { guard } => {
                if hud.guard == Some(guard) {
                    hud.hide();
                }
            }
        }
    }
}

/// System: copy the owning guard's session into the panel
pub fn sync_qte_hud(hud: Option<ResMut<QteHud>>, guards: Query<&GuardState, With<Guard>>) {
    let Some(mut hud) = hud else {
        return;
    };
    let Some(guard) = hud.guard.filter(|_| hud.visible) else {
        return;
    };

    match guards.get(guard).ok().and_then(|state| state.qte()) {
        Some(session) => {
            hud.presses = session.presses;
            hud.remaining = session.remaining;
        }
        // Guard gone or no longer holding
        None => hud.hide(),
    }
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<QteHud>()
            .init_resource::<GameHud>()
            .add_systems(
                Update,
                (apply_qte_ui_events, sync_qte_hud, sync_game_hud)
                    .chain()
                    .in_set(GuardSet::Presentation),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hud_texts() {
        let mut hud = QteHud::default();
        hud.show(Entity::from_raw(3), 15, 5.0, EscapeKey::E);
        hud.presses = 4;
        hud.remaining = 3.26;

        assert!(hud.visible);
        assert_eq!(hud.progress_text(), "4 / 15");
        assert_eq!(hud.time_text(), "3.3s");
        assert_eq!(hud.prompt_text(), "Press E to escape!");
    }

    #[test]
    fn test_hide_only_for_owner() {
        let mut app = App::new();
        app.add_event::<QteUiEvent>()
            .init_resource::<QteHud>()
            .add_systems(Update, apply_qte_ui_events);

        let owner = Entity::from_raw(1);
        app.world_mut().send_event(QteUiEvent::Show {
            guard: owner,
            required_presses: 15,
            time_limit: 5.0,
            key: EscapeKey::F,
        });
        app.world_mut().send_event(QteUiEvent::Hide {
            guard: Entity::from_raw(2),
        });
        app.update();

        let hud = app.world().resource::<QteHud>();
        assert!(hud.visible);
        assert_eq!(hud.guard, Some(owner));
        assert_eq!(hud.key, EscapeKey::F);
    }
}
