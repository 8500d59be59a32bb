//! Level description (JSON) and spawning into a World.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::door::{Door, DoorState};
use super::error::LevelError;
use super::hiding::HidingSpot;
use super::session::{GameSession, LevelExit};
use crate::ai::{Guard, GuardConfig};
use crate::combat::Attacker;
use crate::components::{Facing, Health, Objectives, Player};
use crate::physics::Wall;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardSpawn {
    pub position: [f32; 2],
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub config: GuardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorSpawn {
    pub position: [f32; 2],
    #[serde(default)]
    pub state: DoorState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSpawn {
    pub position: [f32; 2],
    pub half_extents: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    #[serde(default)]
    pub next_level: Option<String>,
    #[serde(default)]
    pub materials_required: u32,
    pub player_spawn: [f32; 2],
    #[serde(default)]
    pub guards: Vec<GuardSpawn>,
    #[serde(default)]
    pub doors: Vec<DoorSpawn>,
    #[serde(default)]
    pub hiding_spots: Vec<[f32; 2]>,
    #[serde(default)]
    pub walls: Vec<WallSpawn>,
    #[serde(default)]
    pub trophy: Option<[f32; 2]>,
}

impl LevelConfig {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if self.name.trim().is_empty() {
            return Err(LevelError::InvalidConfig("level name is empty".to_string()));
        }

        let positions = std::iter::once(&self.player_spawn)
            .chain(self.guards.iter().map(|g| &g.position))
            .chain(self.doors.iter().map(|d| &d.position))
            .chain(self.hiding_spots.iter())
            .chain(self.walls.iter().map(|w| &w.position))
            .chain(self.trophy.iter());
        for [x, y] in positions {
            if !x.is_finite() || !y.is_finite() {
                return Err(LevelError::InvalidConfig(format!(
                    "{}: non-finite position ({}, {})",
                    self.name, x, y
                )));
            }
        }

        if self.walls.iter().any(|w| w.half_extents.iter().any(|e| *e < 0.0)) {
            return Err(LevelError::InvalidConfig(format!(
                "{}: wall with negative extents",
                self.name
            )));
        }
        Ok(())
    }
}

/// Marker on everything `spawn_level` creates, for teardown on restart.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LevelEntity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedLevel {
    pub player: Entity,
    pub guards: Vec<Entity>,
}

fn at(position: [f32; 2]) -> Transform {
    Transform::from_xyz(position[0], position[1], 0.0)
}

pub fn spawn_guard(world: &mut World, position: Vec2, facing: Facing, config: GuardConfig) -> Entity {
    let config = config.sanitized();
    world
        .spawn((
            Guard,
            Health::new(config.max_health),
            facing,
            config,
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

pub fn spawn_player(world: &mut World, position: Vec2, materials_required: u32) -> Entity {
    world
        .spawn((
            Player,
            Objectives::new(materials_required),
            Attacker::default(),
            Transform::from_translation(position.extend(0.0)),
        ))
        .id()
}

/// Spawns the whole level and reports it loaded to the session (if any).
pub fn spawn_level(world: &mut World, level: &LevelConfig) -> SpawnedLevel {
    let spawn = level.player_spawn;
    let player = spawn_player(world, Vec2::new(spawn[0], spawn[1]), level.materials_required);
    world.entity_mut(player).insert(LevelEntity);

    let guards = level
        .guards
        .iter()
        .map(|g| {
            let guard = spawn_guard(
                world,
                Vec2::new(g.position[0], g.position[1]),
                g.facing,
                g.config.clone(),
            );
            world.entity_mut(guard).insert(LevelEntity);
            guard
        })
        .collect::<Vec<_>>();

    for door in &level.doors {
        world.spawn((Door { state: door.state }, at(door.position), LevelEntity));
    }
    for spot in &level.hiding_spots {
        world.spawn((HidingSpot::default(), at(*spot), LevelEntity));
    }
    for wall in &level.walls {
        world.spawn((
            Wall {
                half_extents: Vec2::new(wall.half_extents[0], wall.half_extents[1]),
            },
            at(wall.position),
            LevelEntity,
        ));
    }
    if let Some(trophy) = level.trophy {
        world.spawn((
            LevelExit {
                next_level: level.next_level.clone(),
                consumed: false,
            },
            at(trophy),
            LevelEntity,
        ));
    }

    if let Some(mut session) = world.get_resource_mut::<GameSession>() {
        session.on_level_loaded(&level.name);
    }
    crate::log(&format!(
        "Level {} spawned: {} guard(s), {} door(s), {} hiding spot(s)",
        level.name,
        guards.len(),
        level.doors.len(),
        level.hiding_spots.len()
    ));

    SpawnedLevel { player, guards }
}

/// Removes everything `spawn_level` created.
pub fn despawn_level(world: &mut World) {
    let entities: Vec<Entity> = world
        .query_filtered::<Entity, With<LevelEntity>>()
        .iter(world)
        .collect();
    for entity in entities {
        world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "name": "Vault",
        "next_level": "Level2",
        "materials_required": 2,
        "player_spawn": [0.0, 0.0],
        "guards": [
            { "position": [8.0, 0.0], "facing": "Left", "config": { "vision_range": 4.0 } }
        ],
        "doors": [ { "position": [3.0, 0.0] } ],
        "hiding_spots": [[5.0, 0.0]],
        "trophy": [20.0, 0.0]
    }"#;

    #[test]
    fn test_level_from_json() {
        let level = LevelConfig::from_json(LEVEL).expect("valid level");

        assert_eq!(level.name, "Vault");
        assert_eq!(level.next_level.as_deref(), Some("Level2"));
        assert_eq!(level.guards[0].facing, Facing::Left);
        assert_eq!(level.guards[0].config.vision_range, 4.0);
        assert_eq!(level.guards[0].config.capture_range, 7.0);
        assert_eq!(level.doors[0].state, DoorState::Locked);
        assert!(level.walls.is_empty());
    }

    #[test]
    fn test_level_rejects_blank_name() {
        let err = LevelConfig::from_json(r#"{ "name": " ", "player_spawn": [0.0, 0.0] }"#);
        assert!(matches!(err, Err(LevelError::InvalidConfig(_))));
    }

    #[test]
    fn test_level_reports_parse_errors() {
        let err = LevelConfig::from_json("{ not json");
        assert!(matches!(err, Err(LevelError::Parse(_))));
    }

    #[test]
    fn test_spawn_and_despawn_level() {
        let level = LevelConfig::from_json(LEVEL).expect("valid level");
        let mut world = World::new();

        let spawned = spawn_level(&mut world, &level);
        assert_eq!(spawned.guards.len(), 1);
        let objectives = world.get::<Objectives>(spawned.player).copied();
        assert_eq!(objectives.map(|o| o.materials_required), Some(2));

        despawn_level(&mut world);
        assert!(world.get_entity(spawned.player).is_err());
        assert!(world.get_entity(spawned.guards[0]).is_err());
    }
}
