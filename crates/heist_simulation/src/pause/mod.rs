//! Pause menu: Esc toggles, resume, restart the level, back to the main menu.
//!
//! Архитектура:
//! - host input / menu buttons → `PauseCommand`
//! - pausing stops `Time<Virtual>`: fixed-step locomotion and every
//!   countdown (QTE, stun, knockback, scene delay) freeze
//! - guard contact, perception and QTE sets don't run while paused, so
//!   escape presses made on the menu never count
//! - restart / main menu leave the pause first, then ask the host for the scene

use bevy::prelude::*;

use crate::ai::GuardSet;
use crate::level::{GameSession, SceneRequest, SessionPhase};

/// Pause menu actions.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseCommand {
    /// Esc key: pause if running, resume if paused
    Toggle,
    Resume,
    /// Reload the current level, no life lost
    RestartLevel,
    MainMenu,
}

/// Pause panel state the host UI mirrors.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PauseMenu {
    pub visible: bool,
}

/// Run condition: virtual time is running (true without a time resource).
pub fn simulation_running(time: Option<Res<Time<Virtual>>>) -> bool {
    time.map_or(true, |time| !time.is_paused())
}

fn pause(time: &mut Time<Virtual>, menu: &mut PauseMenu) {
    if menu.visible {
        return;
    }
    time.pause();
    menu.visible = true;
    crate::log("⏸️ Game paused");
}

fn resume(time: &mut Time<Virtual>, menu: &mut PauseMenu) {
    if !menu.visible && !time.is_paused() {
        return;
    }
    time.unpause();
    menu.visible = false;
    crate::log("▶️ Game resumed");
}

/// System: PauseCommand → virtual time, panel, scene requests
pub fn handle_pause_commands(
    mut pause_commands: EventReader<PauseCommand>,
    mut time: ResMut<Time<Virtual>>,
    mut menu: ResMut<PauseMenu>,
    mut session: ResMut<GameSession>,
    mut requests: EventWriter<SceneRequest>,
) {
    for command in pause_commands.read() {
        match command {
            PauseCommand::Toggle if menu.visible => resume(&mut time, &mut menu),
            PauseCommand::Toggle => pause(&mut time, &mut menu),
            PauseCommand::Resume => resume(&mut time, &mut menu),
            PauseCommand::RestartLevel => {
                resume(&mut time, &mut menu);
                if session.phase != SessionPhase::Playing {
                    crate::log_warning(&format!(
                        "Restart level ignored: session is {:?}",
                        session.phase
                    ));
                    continue;
                }
                if let Some(cancelled) = session.cancel_pending() {
                    crate::log(&format!("Pending {:?} dropped for the restart", cancelled));
                }
                let request = SceneRequest::Restart(session.current_level.clone());
                crate::log(&format!("🔄 Restarting level: {:?}", request));
                requests.write(request);
            }
            PauseCommand::MainMenu => {
                resume(&mut time, &mut menu);
                session.cancel_pending();
                crate::log("🏠 Back to the main menu");
                requests.write(SceneRequest::MainMenu);
            }
        }
    }
}

/// Pause Plugin
///
/// Commands are handled before the guard sets; contact, perception and QTE
/// are gated on `simulation_running`.
pub struct PausePlugin;

impl Plugin for PausePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PauseMenu>()
            .add_event::<PauseCommand>()
            .configure_sets(Update, GuardSet::Contact.run_if(simulation_running))
            .configure_sets(Update, GuardSet::Perception.run_if(simulation_running))
            .configure_sets(Update, GuardSet::Qte.run_if(simulation_running))
            .add_systems(Update, handle_pause_commands.before(GuardSet::Timers));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::SessionConfig;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<Time<Virtual>>()
            .insert_resource(GameSession::new(&SessionConfig::default()))
            .add_event::<SceneRequest>()
            .add_plugins(PausePlugin);
        app
    }

    fn requests(app: &App) -> Vec<SceneRequest> {
        app.world()
            .resource::<Events<SceneRequest>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    #[test]
    fn test_toggle_pauses_and_resumes() {
        let mut app = app();

        app.world_mut().send_event(PauseCommand::Toggle);
        app.update();
        assert!(app.world().resource::<PauseMenu>().visible);
        assert!(app.world().resource::<Time<Virtual>>().is_paused());

        app.world_mut().send_event(PauseCommand::Toggle);
        app.update();
        assert!(!app.world().resource::<PauseMenu>().visible);
        assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    }

    #[test]
    fn test_restart_level_unpauses_and_requests_reload() {
        let mut app = app();
        app.world_mut().send_event(PauseCommand::Toggle);
        app.update();

        app.world_mut().send_event(PauseCommand::RestartLevel);
        app.update();

        assert!(!app.world().resource::<Time<Virtual>>().is_paused());
        assert_eq!(requests(&app), vec![SceneRequest::Restart("Level1".to_string())]);
        assert_eq!(app.world().resource::<GameSession>().lives, 3);
    }

    #[test]
    fn test_main_menu_drops_pending_scene() {
        let mut app = app();
        app.world_mut()
            .resource_mut::<GameSession>()
            .schedule(SceneRequest::Restart("Level1".to_string()), 2.0);

        app.world_mut().send_event(PauseCommand::MainMenu);
        app.update();

        assert_eq!(requests(&app), vec![SceneRequest::MainMenu]);
        assert!(!app.world().resource::<GameSession>().is_transitioning());
    }

    #[test]
    fn test_restart_level_refused_after_game_over() {
        let mut app = app();
        app.world_mut().resource_mut::<GameSession>().phase = SessionPhase::GameOver;

        app.world_mut().send_event(PauseCommand::RestartLevel);
        app.update();

        assert!(requests(&app).is_empty());
    }
}
