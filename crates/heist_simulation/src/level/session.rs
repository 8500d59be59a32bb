//! Game session: lives, delayed scene changes, level exit.
//!
//! Архитектура:
//! - `PlayerCaptured` → one life lost → after `restart_delay` the session
//!   emits `SceneRequest::Restart` (or `GameOver` at zero lives)
//! - `ExitReached` with all materials → after `exit_delay` the next level
//!   (or victory) is requested
//! - the host loads scenes and reports back via `LevelLoaded`

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::LevelError;
use crate::ai::{Guard, GuardState, PlayerCaptured};
use crate::audio::{GuardAudio, MusicDirector};
use crate::components::{Objectives, Player};

/// Session tuning.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub starting_lives: u32,
    /// Seconds between a capture and the restart/game-over request
    pub restart_delay: f32,
    /// Seconds between reaching the exit and loading the next level
    pub exit_delay: f32,
    pub first_level: String,
    pub game_over_scene: String,
    pub victory_scene: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            restart_delay: 2.0,
            exit_delay: 1.0,
            first_level: "Level1".to_string(),
            game_over_scene: "GameOver".to_string(),
            victory_scene: "Victory".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum SessionPhase {
    #[default]
    Playing,
    GameOver,
    Victory,
    /// Pause menu "back to menu"
    MainMenu,
}

/// Scene change the host should perform.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum SceneRequest {
    /// Reload the current level after a capture
    Restart(String),
    /// Next level after the exit
    Load(String),
    GameOver,
    Victory,
    /// Pause menu "back to menu"
    MainMenu,
}

/// Host finished loading a scene.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LevelLoaded {
    pub level: String,
}

/// Player touched the level exit (trophy).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReached {
    pub player: Entity,
}

/// Full restart from the first level (menu "play again").
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RestartGame;

/// Exit of the current level. Consumed once per load.
#[derive(Component, Debug, Clone, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct LevelExit {
    pub next_level: Option<String>,
    pub consumed: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct PendingScene {
    request: SceneRequest,
    remaining: f32,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameSession {
    pub lives: u32,
    pub current_level: String,
    pub phase: SessionPhase,
    pending: Option<PendingScene>,
}

impl GameSession {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            lives: config.starting_lives,
            current_level: config.first_level.clone(),
            phase: SessionPhase::Playing,
            pending: None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_request(&self) -> Option<&SceneRequest> {
        self.pending.as_ref().map(|p| &p.request)
    }

    /// Scene-loaded callback: the new level is current and live.
    pub fn on_level_loaded(&mut self, level: &str) {
        self.current_level = level.to_string();
        self.pending = None;
        if self.lives > 0 {
            self.phase = SessionPhase::Playing;
        }
        crate::log(&format!("🗺️ Level loaded: {} (lives {})", level, self.lives));
    }

    /// One life lost. Returns the scheduled request, `None` when a scene
    /// change is already pending (second guard, same capture).
    pub fn register_capture(&mut self, config: &SessionConfig) -> Option<SceneRequest> {
        if self.phase != SessionPhase::Playing || self.pending.is_some() {
            return None;
        }

        self.lives = self.lives.saturating_sub(1);
        let request = if self.lives == 0 {
            self.phase = SessionPhase::GameOver;
            SceneRequest::GameOver
        } else {
            SceneRequest::Restart(self.current_level.clone())
        };
        crate::log(&format!(
            "💔 Captured: {} lives left → {:?} in {:.1}s",
            self.lives, request, config.restart_delay
        ));
        self.schedule(request.clone(), config.restart_delay);
        Some(request)
    }

    /// Resolves the exit's next level and schedules the load.
    pub fn request_exit(
        &mut self,
        next_level: Option<&str>,
        config: &SessionConfig,
    ) -> Result<SceneRequest, LevelError> {
        let next = next_level
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| LevelError::NextLevelNotConfigured {
                level: self.current_level.clone(),
            })?;

        let request = if next == config.victory_scene {
            self.phase = SessionPhase::Victory;
            SceneRequest::Victory
        } else {
            SceneRequest::Load(next.to_string())
        };
        self.schedule(request.clone(), config.exit_delay);
        Ok(request)
    }

    pub fn schedule(&mut self, request: SceneRequest, delay: f32) {
        self.pending = Some(PendingScene {
            request,
            remaining: delay.max(0.0),
        });
    }

    /// Advances the pending delay; returns the request once it is due.
    pub fn tick(&mut self, delta: f32) -> Option<SceneRequest> {
        let pending = self.pending.as_mut()?;
        pending.remaining -= delta.max(0.0);
        if pending.remaining > 0.0 {
            return None;
        }
        self.pending.take().map(|p| p.request)
    }

    /// Drops a scheduled scene change (pause menu restart / main menu).
    pub fn cancel_pending(&mut self) -> Option<SceneRequest> {
        self.pending.take().map(|p| p.request)
    }

    /// Back to the first level with full lives.
    pub fn reset(&mut self, config: &SessionConfig) {
        *self = Self::new(config);
    }
}

/// System: PlayerCaptured → lose a life, schedule restart / game over
pub fn handle_player_captured(
    mut captures: EventReader<PlayerCaptured>,
    mut session: ResMut<GameSession>,
    config: Res<SessionConfig>,
) {
    for capture in captures.read() {
        if session.register_capture(&config).is_none() {
            crate::log(&format!(
                "Capture of {:?} by {:?} ignored (scene change pending)",
                capture.player, capture.guard
            ));
        }
    }
}

/// System: ExitReached → next level once all materials are collected
pub fn handle_exit_reached(
    mut reached: EventReader<ExitReached>,
    players: Query<&Objectives, With<Player>>,
    mut exits: Query<&mut LevelExit>,
    mut session: ResMut<GameSession>,
    config: Res<SessionConfig>,
) {
    for event in reached.read() {
        let Ok(objectives) = players.get(event.player) else {
            continue;
        };
        if !objectives.is_complete() {
            crate::log_warning(&format!(
                "Exit locked: {} material(s) still missing",
                objectives.missing()
            ));
            continue;
        }

        let Some(mut exit) = exits.iter_mut().next() else {
            crate::log_warning("ExitReached but the level has no LevelExit");
            continue;
        };
        if exit.consumed || session.is_transitioning() {
            continue;
        }
        exit.consumed = true;

        match session.request_exit(exit.next_level.as_deref(), &config) {
            Ok(request) => crate::log(&format!(
                "🏆 Exit reached → {:?} in {:.1}s",
                request, config.exit_delay
            )),
            Err(err) => crate::log_error(&format!("Level transition aborted: {}", err)),
        }
    }
}

/// System: pending delay → SceneRequest
pub fn tick_pending_scene(
    time: Res<Time>,
    mut session: ResMut<GameSession>,
    mut requests: EventWriter<SceneRequest>,
) {
    if !session.is_transitioning() {
        return;
    }
    if let Some(request) = session.tick(time.delta_secs()) {
        crate::log(&format!("🎬 SceneRequest: {:?}", request));
        requests.write(request);
    }
}

/// System: LevelLoaded → session callback
pub fn handle_level_loaded(mut loaded: EventReader<LevelLoaded>, mut session: ResMut<GameSession>) {
    for event in loaded.read() {
        session.on_level_loaded(&event.level);
    }
}

/// System: RestartGame → full session reset
///
/// Every guard track is stopped through the director first, so the counter
/// and the per-guard flags agree. Chasing guards drop back to patrol and
/// restart their chase (and its music) on the next sighting.
pub fn handle_restart_game(
    mut restarts: EventReader<RestartGame>,
    mut session: ResMut<GameSession>,
    mut guards: Query<(Entity, &mut GuardState, &mut GuardAudio), With<Guard>>,
    mut music: MusicDirector,
    config: Res<SessionConfig>,
) {
    if restarts.is_empty() {
        return;
    }
    restarts.clear();

    for (guard, mut state, mut audio) in guards.iter_mut() {
        music.stop_all(guard, &mut audio);
        if state.is_chasing() {
            *state = GuardState::Patrol;
        }
    }
    // Tracks registered outside of any guard
    music.force_resume();

    session.reset(&config);
    crate::log(&format!(
        "🔄 Game restarted: {} ({} lives)",
        session.current_level, session.lives
    ));
}
