//! Perception: vision cone while roaming, angle-free capture range while holding.
//!
//! A candidate is detected iff it is visible, within the effective range, and
//! (outside a QTE) within half the vision angle of the facing direction.
//! With several candidates the nearest wins.

use bevy::prelude::*;

use super::capture::release_hold;
use crate::ai::{Guard, GuardConfig, GuardState, QteUiEvent};
use crate::audio::{GuardAudio, MusicDirector, TrackKind};
use crate::combat::Knockback;
use crate::components::{Facing, MovementLock, Player, PlayerVisibility};

/// Snapshot of a guard's senses for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub position: Vec2,
    pub facing: Facing,
    pub vision_range: f32,
    pub half_angle_deg: f32,
    pub capture_range: f32,
    /// QTE running: the angle test is skipped and capture_range applies
    pub holding: bool,
}

impl Observer {
    pub fn new(position: Vec2, facing: Facing, config: &GuardConfig, holding: bool) -> Self {
        Self {
            position,
            facing,
            vision_range: config.vision_range,
            half_angle_deg: config.half_vision_angle(),
            capture_range: config.capture_range,
            holding,
        }
    }

    pub fn effective_range(&self) -> f32 {
        if self.holding {
            self.capture_range
        } else {
            self.vision_range
        }
    }

    pub fn can_see(&self, position: Vec2, visible: bool) -> bool {
        if !visible {
            return false;
        }

        let offset = position - self.position;
        let distance = offset.length();
        if distance > self.effective_range() {
            return false;
        }
        // Same spot: no direction to test
        if self.holding || distance <= f32::EPSILON {
            return true;
        }

        let cos = self.facing.as_vec2().dot(offset / distance).clamp(-1.0, 1.0);
        cos.acos().to_degrees() <= self.half_angle_deg
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub entity: Entity,
    pub position: Vec2,
    pub visible: bool,
}

/// Nearest detectable candidate, ties resolved by iteration order.
pub fn detect(observer: &Observer, candidates: impl IntoIterator<Item = Candidate>) -> Option<Entity> {
    candidates
        .into_iter()
        .filter(|c| observer.can_see(c.position, c.visible))
        .map(|c| (c.entity, c.position.distance_squared(observer.position)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entity, _)| entity)
}

/// System: perception-driven transitions
///
/// Patrol + detected → Chase (chase track on)
/// Chase + nothing detected → Patrol (chase track off)
/// Contact + held player out of capture range or hidden → hold released
///
/// Skipped while knocked back and in states that don't perceive.
pub fn perceive_players(
    mut guards: Query<
        (
            Entity,
            &mut GuardState,
            &GuardConfig,
            &Facing,
            &Transform,
            &Knockback,
            &mut GuardAudio,
        ),
        With<Guard>,
    >,
    mut players: Query<
        (Entity, &Transform, &PlayerVisibility, Option<&mut MovementLock>),
        (With<Player>, Without<Guard>),
    >,
    mut music: MusicDirector,
    mut qte_ui: EventWriter<QteUiEvent>,
) {
    let candidates: Vec<Candidate> = players
        .iter()
        .map(|(entity, transform, visibility, _)| Candidate {
            entity,
            position: transform.translation.truncate(),
            visible: visibility.visible,
        })
        .collect();

    for (guard, mut state, config, facing, transform, knockback, mut audio) in guards.iter_mut() {
        if !state.perceives() || knockback.is_active() {
            continue;
        }

        let observer = Observer::new(
            transform.translation.truncate(),
            *facing,
            config,
            state.is_in_contact(),
        );

        match *state {
            GuardState::Contact { target, .. } => {
                let still_held = players
                    .get(target)
                    .map(|(_, t, v, _)| observer.can_see(t.translation.truncate(), v.visible))
                    .unwrap_or(false);
                if still_held {
                    continue;
                }

                let mut lock = players.get_mut(target).ok().and_then(|(_, _, _, lock)| lock);
                release_hold(guard, lock.as_deref_mut(), &mut audio, &mut music, &mut qte_ui);
                *state = GuardState::Patrol;
                crate::log(&format!(
                    "🏃 Guard {:?}: Contact → Patrol (lost hold of {:?})",
                    guard, target
                ));
            }
            GuardState::Patrol => {
                let detected = detect(&observer, candidates.iter().copied());
                if let Some(target) = detected {
                    *state = GuardState::Chase { target };
                    music.start(guard, TrackKind::Chase, config.chase_track.as_deref(), &mut audio);
                    crate::log(&format!("👁️ Guard {:?}: Patrol → Chase (target {:?})", guard, target));
                }
            }
            GuardState::Chase { target: current } => match detect(&observer, candidates.iter().copied()) {
                Some(target) if target != current => {
                    *state = GuardState::Chase { target };
                    crate::log(&format!("👁️ Guard {:?}: retarget {:?} → {:?}", guard, current, target));
                }
                Some(_) => {}
                None => {
                    *state = GuardState::Patrol;
                    music.stop(guard, TrackKind::Chase, &mut audio);
                    crate::log(&format!("👻 Guard {:?}: Chase → Patrol (lost {:?})", guard, current));
                }
            },
            _ => {}
        }
    }
}
