//! Headless симуляция: one level, a scripted player walking into a guard.
//!
//! The player walks right, gets spotted and grabbed, mashes the escape key at
//! a seeded random rate, and either breaks free and reaches the exit or gets
//! captured (lives, restart). Usage: `heist_simulation [seed]`.

use bevy::prelude::*;
use rand::Rng;

use heist_simulation::level::{despawn_level, spawn_level, ExitReached, LevelExit};
use heist_simulation::{
    create_headless_app, log_error, log_info, DeterministicRng, EscapeInput, GuardSet,
    GuardState, LevelConfig, MovementLock, MovementSpeed, Player, SceneRequest,
    SimulationPlugin, Velocity,
};

const LEVEL_JSON: &str = r#"{
    "name": "Level1",
    "next_level": "Victory",
    "player_spawn": [0.0, 0.0],
    "guards": [
        { "position": [12.0, 0.0], "facing": "Left" }
    ],
    "walls": [
        { "position": [-6.0, 0.0], "half_extents": [0.5, 3.0] }
    ],
    "trophy": [30.0, 0.0]
}"#;

const MAX_FRAMES: u32 = 60 * 60;

/// Chance per frame that the scripted player hits the escape key.
const MASH_RATE: f64 = 0.06;

#[derive(Resource, Default)]
struct SceneQueue(Vec<SceneRequest>);

fn scripted_walk(mut players: Query<(&MovementLock, &MovementSpeed, &mut Velocity), With<Player>>) {
    for (lock, speed, mut velocity) in players.iter_mut() {
        velocity.0 = if lock.locked {
            Vec2::ZERO
        } else {
            Vec2::new(speed.current, 0.0)
        };
    }
}

fn scripted_mash(
    mut rng: ResMut<DeterministicRng>,
    mut input: ResMut<EscapeInput>,
    guards: Query<&GuardState>,
) {
    for state in guards.iter() {
        if let Some(session) = state.qte() {
            if rng.rng.gen_bool(MASH_RATE) {
                input.press(session.key);
            }
        }
    }
}

fn scripted_exit(
    players: Query<(Entity, &Transform), With<Player>>,
    exits: Query<(&Transform, &LevelExit)>,
    mut reached: EventWriter<ExitReached>,
) {
    for (player, player_transform) in players.iter() {
        for (exit_transform, exit) in exits.iter() {
            let distance = player_transform
                .translation
                .truncate()
                .distance(exit_transform.translation.truncate());
            if !exit.consumed && distance < 0.5 {
                reached.write(ExitReached { player });
            }
        }
    }
}

fn queue_scene_requests(mut requests: EventReader<SceneRequest>, mut queue: ResMut<SceneQueue>) {
    queue.0.extend(requests.read().cloned());
}

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    println!("Starting heist headless simulation (seed: {})", seed);

    let level = match LevelConfig::from_json(LEVEL_JSON) {
        Ok(level) => level,
        Err(err) => {
            log_error(&format!("Level config rejected: {}", err));
            return;
        }
    };

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .init_resource::<SceneQueue>()
        .add_systems(FixedUpdate, scripted_walk)
        .add_systems(
            Update,
            (
                scripted_mash.before(GuardSet::Qte),
                scripted_exit.before(GuardSet::Timers),
                queue_scene_requests.after(GuardSet::Presentation),
            ),
        );

    spawn_level(app.world_mut(), &level);

    for frame in 0..MAX_FRAMES {
        app.update();

        let requests = std::mem::take(&mut app.world_mut().resource_mut::<SceneQueue>().0);
        for request in requests {
            match request {
                SceneRequest::Restart(_) | SceneRequest::Load(_) => {
                    despawn_level(app.world_mut());
                    spawn_level(app.world_mut(), &level);
                }
                SceneRequest::GameOver => {
                    log_info(&format!("Game over at frame {}", frame));
                    return;
                }
                SceneRequest::Victory => {
                    log_info(&format!("Victory at frame {}", frame));
                    return;
                }
                SceneRequest::MainMenu => {
                    log_info(&format!("Main menu at frame {}", frame));
                    return;
                }
            }
        }

        if frame % 120 == 0 {
            let session = app.world().resource::<heist_simulation::GameSession>();
            println!(
                "Frame {}: lives {}, level {}, phase {:?}",
                frame, session.lives, session.current_level, session.phase
            );
        }
    }

    println!("Simulation complete!");
}
