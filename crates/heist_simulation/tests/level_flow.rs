//! Integration тесты level flow: pickups, doors, exit, lives

use bevy::prelude::*;
use heist_simulation::audio::GuardAudio;
use heist_simulation::hud::LivesWarning;
use heist_simulation::level::{
    despawn_level, spawn_level, Door, DoorEvent, DoorState, DoorTouched, ExitReached, LevelExit,
    PickupCollected, PickupKind, RestartGame, SessionPhase,
};
use heist_simulation::*;

const LEVEL: &str = r#"{
    "name": "Vault",
    "next_level": "Level2",
    "materials_required": 2,
    "player_spawn": [0.0, 0.0],
    "doors": [ { "position": [4.0, 0.0] } ],
    "trophy": [10.0, 0.0]
}"#;

fn setup(json: &str) -> (App, Entity) {
    let mut app = create_headless_app(3);
    app.add_plugins(SimulationPlugin);
    app.update();

    let level = LevelConfig::from_json(json).expect("valid level");
    let spawned = spawn_level(app.world_mut(), &level);
    (app, spawned.player)
}

fn collect(app: &mut App, player: Entity, kind: PickupKind) {
    app.world_mut().send_event(PickupCollected { player, kind });
    app.update();
}

#[test]
fn test_level_load_updates_session() {
    let (app, _) = setup(LEVEL);
    let session = app.world().resource::<GameSession>();
    assert_eq!(session.current_level, "Vault");
    assert_eq!(session.lives, 3);
    assert_eq!(session.phase, SessionPhase::Playing);
}

#[test]
fn test_exit_needs_all_materials() {
    let (mut app, player) = setup(LEVEL);

    app.world_mut().send_event(ExitReached { player });
    app.update();
    assert!(!app.world().resource::<GameSession>().is_transitioning());

    collect(&mut app, player, PickupKind::Material);
    collect(&mut app, player, PickupKind::Material);
    assert_eq!(
        app.world().get::<Objectives>(player).map(|o| o.is_complete()),
        Some(true)
    );

    app.world_mut().send_event(ExitReached { player });
    app.update();

    let session = app.world().resource::<GameSession>();
    assert_eq!(
        session.pending_request(),
        Some(&SceneRequest::Load("Level2".to_string()))
    );

    // Exit is consumed once
    let mut exits = app.world_mut().query::<&LevelExit>();
    let consumed = exits.iter(app.world()).all(|exit| exit.consumed);
    assert!(consumed);
}

#[test]
fn test_exit_without_next_level_aborts() {
    let (mut app, player) = setup(
        r#"{ "name": "Dead End", "player_spawn": [0.0, 0.0], "trophy": [3.0, 0.0] }"#,
    );

    app.world_mut().send_event(ExitReached { player });
    app.update();

    assert!(!app.world().resource::<GameSession>().is_transitioning());
    assert_eq!(app.world().resource::<GameSession>().phase, SessionPhase::Playing);
}

#[test]
fn test_door_opens_with_a_key() {
    let (mut app, player) = setup(LEVEL);
    let door = app
        .world_mut()
        .query_filtered::<Entity, With<Door>>()
        .iter(app.world())
        .next()
        .expect("level has a door");

    app.world_mut().send_event(DoorTouched { door, player });
    app.update();
    assert_eq!(app.world().get::<Door>(door).map(|d| d.state), Some(DoorState::Locked));
    let feedback: Vec<DoorEvent> = app
        .world()
        .resource::<Events<DoorEvent>>()
        .iter_current_update_events()
        .copied()
        .collect();
    assert_eq!(feedback, vec![DoorEvent::StillLocked]);

    collect(&mut app, player, PickupKind::Key);
    app.world_mut().send_event(DoorTouched { door, player });
    app.update();

    assert_eq!(app.world().get::<Door>(door).map(|d| d.state), Some(DoorState::Open));
    assert_eq!(app.world().get::<KeyRing>(player).map(|k| k.keys), Some(0));
}

#[test]
fn test_speed_boost_restarts_instead_of_stacking() {
    let (mut app, player) = setup(LEVEL);
    let base = app.world().get::<MovementSpeed>(player).map(|s| s.base).unwrap_or_default();

    collect(&mut app, player, PickupKind::SpeedBoost);
    assert_eq!(
        app.world().get::<MovementSpeed>(player).map(|s| s.current),
        Some(base * 2.0)
    );

    // 4 s in, grab another: the boost lasts 5 s from here
    for _ in 0..240 {
        app.update();
    }
    collect(&mut app, player, PickupKind::SpeedBoost);
    for _ in 0..240 {
        app.update();
    }
    assert_eq!(
        app.world().get::<MovementSpeed>(player).map(|s| s.current),
        Some(base * 2.0)
    );

    for _ in 0..90 {
        app.update();
    }
    assert_eq!(
        app.world().get::<MovementSpeed>(player).map(|s| s.current),
        Some(base)
    );
    assert!(app.world().get::<SpeedBoost>(player).is_none());
}

const GUARDED: &str = r#"{
    "name": "Lobby",
    "next_level": "Level2",
    "player_spawn": [0.0, 0.0],
    "guards": [
        { "position": [3.0, 0.0], "facing": "Left", "config": { "auto_patrol": false } },
        { "position": [-3.0, 0.0], "facing": "Right", "config": { "auto_patrol": false } }
    ]
}"#;

fn chase_playing(app: &App, guard: Entity) -> bool {
    app.world()
        .get::<GuardAudio>(guard)
        .is_some_and(|audio| audio.chase_playing)
}

#[test]
fn test_restart_game_resets_lives_and_audio() {
    let mut app = create_headless_app(3);
    app.add_plugins(SimulationPlugin);
    app.update();
    let level = LevelConfig::from_json(GUARDED).expect("valid level");
    let spawned = spawn_level(app.world_mut(), &level);
    let (first, second) = (spawned.guards[0], spawned.guards[1]);

    app.update();
    assert!(chase_playing(&app, first) && chase_playing(&app, second));
    assert_eq!(app.world().resource::<AudioPriority>().active_tracks(), 2);

    app.world_mut().resource_mut::<GameSession>().lives = 1;
    app.world_mut().send_event(RestartGame);
    app.update();

    let session = app.world().resource::<GameSession>();
    assert_eq!(session.lives, 3);
    assert_eq!(session.current_level, "Level1");
    assert!(app.world().resource::<AudioPriority>().background_playing());
    assert!(!chase_playing(&app, first) && !chase_playing(&app, second));
    assert_eq!(app.world().get::<GuardState>(first).copied(), Some(GuardState::Patrol));

    // Both guards spot the player again: the count follows the real tracks
    app.update();
    assert!(chase_playing(&app, first) && chase_playing(&app, second));
    assert_eq!(app.world().resource::<AudioPriority>().active_tracks(), 2);

    app.world_mut().despawn(first);
    let priority = app.world().resource::<AudioPriority>();
    assert_eq!(priority.active_tracks(), 1);
    assert!(!priority.background_playing());
}

#[test]
fn test_game_hud_tracks_lives_keys_and_materials() {
    let (mut app, player) = setup(LEVEL);
    app.update();

    let hud = app.world().resource::<GameHud>();
    assert!(hud.visible);
    assert_eq!(hud.lives_text(), "x 3");
    assert_eq!(hud.keys_text(), "x 0");
    assert_eq!(hud.materials_text(), "0 / 2");
    assert_eq!(hud.lives_warning(), LivesWarning::Healthy);

    collect(&mut app, player, PickupKind::Key);
    collect(&mut app, player, PickupKind::Material);
    collect(&mut app, player, PickupKind::Material);
    app.world_mut().resource_mut::<GameSession>().lives = 1;
    app.update();

    let hud = app.world().resource::<GameHud>();
    assert_eq!(hud.keys_text(), "x 1");
    assert_eq!(hud.materials_text(), "2 / 2");
    assert!(hud.materials_complete());
    assert_eq!(hud.lives_warning(), LivesWarning::Danger);

    // Level torn down: counters hidden, lives kept
    despawn_level(app.world_mut());
    app.update();
    let hud = app.world().resource::<GameHud>();
    assert!(!hud.visible);
    assert_eq!(hud.lives, 1);
}

#[test]
fn test_despawn_level_clears_entities() {
    let (mut app, player) = setup(LEVEL);

    despawn_level(app.world_mut());

    assert!(app.world().get_entity(player).is_err());
    let doors = app
        .world_mut()
        .query_filtered::<Entity, With<Door>>()
        .iter(app.world())
        .count();
    assert_eq!(doors, 0);
}
