//! Level module: session/lives, exit, doors, hiding spots, pickups, level files.
//!
//! ECS ответственность:
//! - game state: lives, keys, materials, door state, who hides where
//! - rules: delayed restart after capture, exit gated on materials
//!
//! Host ответственность:
//! - scene loading (consumes `SceneRequest`, answers with `LevelLoaded`)
//! - trigger volumes (`PickupCollected`, `DoorTouched`, `HideToggle`, `ExitReached`)

use bevy::prelude::*;

pub mod config;
pub mod door;
pub mod error;
pub mod hiding;
pub mod pickups;
pub mod session;

pub use config::{
    despawn_level, spawn_guard, spawn_level, spawn_player, LevelConfig, LevelEntity, SpawnedLevel,
};
pub use door::{Door, DoorEvent, DoorState, DoorTouched};
pub use error::LevelError;
pub use hiding::{ForceReveal, HideToggle, HidingSpot};
pub use pickups::{PickupCollected, PickupKind};
pub use session::{
    ExitReached, GameSession, LevelExit, LevelLoaded, RestartGame, SceneRequest, SessionConfig,
    SessionPhase,
};

use crate::ai::GuardSet;

/// Level Plugin
///
/// Hiding/doors/pickups run before guard contacts so a player who just hid
/// is already invisible this frame. Session systems run after the QTE.
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionConfig>();
        let session = app
            .world()
            .get_resource::<SessionConfig>()
            .map(GameSession::new)
            .unwrap_or_else(|| GameSession::new(&SessionConfig::default()));
        app.insert_resource(session);

        app.register_type::<Door>()
            .register_type::<HidingSpot>()
            .register_type::<LevelExit>();

        app.add_event::<SceneRequest>()
            .add_event::<LevelLoaded>()
            .add_event::<ExitReached>()
            .add_event::<RestartGame>()
            .add_event::<DoorTouched>()
            .add_event::<DoorEvent>()
            .add_event::<HideToggle>()
            .add_event::<ForceReveal>()
            .add_event::<PickupCollected>();

        app.add_systems(
            Update,
            (
                (
                    hiding::handle_hide_toggles,
                    hiding::handle_force_reveal,
                    door::handle_door_touches,
                    pickups::apply_pickups,
                    pickups::tick_speed_boosts,
                )
                    .chain()
                    .before(GuardSet::Contact),
                (
                    session::handle_level_loaded,
                    session::handle_restart_game,
                    session::handle_player_captured,
                    session::handle_exit_reached,
                    session::tick_pending_scene,
                )
                    .chain()
                    .after(GuardSet::Qte)
                    .before(GuardSet::Presentation),
            ),
        );
    }
}
