//! Heist Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: guard AI for a 2D stealth game.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = game state and rules (guard FSM, QTE, lives, keys, music priority)
//! - Host = physics bodies, rendering, audio playback, UI widgets, scene loading
//! - Host → ECS: collision/trigger events, escape key presses, pause menu
//! - ECS → host: Velocity, GuardTint, MusicCue, QteHud, GameHud, SceneRequest

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod audio;
pub mod combat;
pub mod components;
pub mod hud;
pub mod input;
pub mod level;
pub mod logger;
pub mod pause;
pub mod physics;

pub use ai::{AIPlugin, EscapeKey, Guard, GuardConfig, GuardSet, GuardState};
pub use audio::{AudioPriority, MusicCue, MusicPlugin};
pub use combat::CombatPlugin;
pub use components::*;
pub use hud::{GameHud, HudPlugin, QteHud};
pub use input::{EscapeInput, EscapeInputPlugin};
pub use level::{GameSession, LevelConfig, LevelError, LevelPlugin, SceneRequest, SessionConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use pause::{PauseCommand, PauseMenu, PausePlugin};
pub use physics::HeadlessPhysicsPlugin;

/// Simulation tick rate (FixedUpdate).
pub const TICK_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Host physics is not included: add `HeadlessPhysicsPlugin` (done by
/// `create_headless_app`) or drive `Velocity` from the host engine.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .register_type::<Velocity>()
            .register_type::<Facing>()
            .register_type::<Health>()
            .register_type::<Player>()
            .register_type::<PlayerVisibility>()
            .register_type::<MovementLock>()
            .add_plugins((
                MusicPlugin,
                EscapeInputPlugin,
                AIPlugin,
                CombatPlugin,
                HudPlugin,
                LevelPlugin,
                PausePlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Time advances by exactly one fixed step per `app.update()` (the first
/// update has a zero delta), so tests count frames instead of sleeping.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / TICK_HZ,
        )))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .add_plugins(HeadlessPhysicsPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
