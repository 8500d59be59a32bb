//! Capture flow: contact → QTE → escape (stun) or capture.
//!
//! Архитектура:
//! - host physics reports `GuardCollision` (player body or wall)
//! - contact locks the player, swaps chase music for capture music, shows the QTE
//! - `advance_qte_sessions` runs the clock and counts presses each frame
//! - `cling_to_captive` keeps the guard glued to the player while the QTE runs

use bevy::prelude::*;

use crate::ai::{
    Guard, GuardCollision, GuardConfig, GuardState, PlayerCaptured, QteOutcome, QteSession,
    QteUiEvent,
};
use crate::audio::{GuardAudio, MusicDirector, TrackKind};
use crate::combat::Knockback;
use crate::components::{Facing, MovementLock, Player, PlayerVisibility, Velocity};
use crate::input::EscapeInput;

/// Ends a hold without capturing: hides the QTE, frees the player, silences
/// the capture track. Shared by escape, damage and lost contact.
pub fn release_hold(
    guard: Entity,
    lock: Option<&mut MovementLock>,
    audio: &mut GuardAudio,
    music: &mut MusicDirector,
    qte_ui: &mut EventWriter<QteUiEvent>,
) {
    qte_ui.write(QteUiEvent::Hide { guard });
    match lock {
        Some(lock) => {
            lock.unlock();
        }
        None => crate::log_warning(&format!(
            "Guard {:?}: held player has no movement lock to release",
            guard
        )),
    }
    music.stop(guard, TrackKind::Capture, audio);
}

/// System: GuardCollision → QTE start (player) or patrol flip (wall)
pub fn handle_guard_collisions(
    mut collisions: EventReader<GuardCollision>,
    mut guards: Query<
        (
            &mut GuardState,
            &GuardConfig,
            &mut Facing,
            &mut Velocity,
            &mut GuardAudio,
            &Knockback,
        ),
        With<Guard>,
    >,
    mut players: Query<
        (Option<&mut MovementLock>, Option<&PlayerVisibility>),
        (With<Player>, Without<Guard>),
    >,
    mut music: MusicDirector,
    mut qte_ui: EventWriter<QteUiEvent>,
) {
    for collision in collisions.read() {
        let guard = collision.guard;
        let Ok((mut state, config, mut facing, mut velocity, mut audio, knockback)) =
            guards.get_mut(guard)
        else {
            continue;
        };

        if let Ok((lock, visibility)) = players.get_mut(collision.other) {
            // Down, stunned, already holding, or mid-knockback
            if !state.can_grab() || knockback.is_active() {
                continue;
            }
            if visibility.is_some_and(|v| !v.visible) {
                continue;
            }
            // Somebody else is already holding this player
            if lock.as_ref().is_some_and(|l| l.locked) {
                crate::log(&format!(
                    "Guard {:?}: contact with locked player {:?} ignored",
                    guard, collision.other
                ));
                continue;
            }

            let previous = state.name();
            let session = QteSession::new(
                config.qte_required_presses,
                config.qte_time_limit,
                config.escape_key,
            );
            *state = GuardState::Contact {
                target: collision.other,
                session,
            };
            velocity.0 = Vec2::ZERO;

            match lock {
                Some(mut lock) => {
                    lock.lock();
                }
                None => crate::log_warning(&format!(
                    "Guard {:?}: player {:?} has no movement lock, QTE runs without it",
                    guard, collision.other
                )),
            }

            // Capture first so the background stays paused across the swap
            music.start(guard, TrackKind::Capture, config.capture_track.as_deref(), &mut audio);
            music.stop(guard, TrackKind::Chase, &mut audio);

            qte_ui.write(QteUiEvent::Show {
                guard,
                required_presses: session.required,
                time_limit: session.time_limit,
                key: session.key,
            });
            crate::log(&format!(
                "🤼 Guard {:?}: {} → Contact (QTE: {} × {} in {:.1}s)",
                guard, previous, session.required, session.key, session.time_limit
            ));
            continue;
        }

        if collision.other_is_trigger {
            continue;
        }
        if matches!(*state, GuardState::Patrol) {
            *facing = facing.flipped();
            crate::log(&format!("🧱 Guard {:?}: wall hit, patrol → {:?}", guard, *facing));
        }
    }
}

/// System: QTE clock and presses; resolves escape or capture
pub fn advance_qte_sessions(
    time: Res<Time>,
    input: Res<EscapeInput>,
    mut guards: Query<
        (
            Entity,
            &mut GuardState,
            &GuardConfig,
            &Transform,
            &Facing,
            &mut Velocity,
            &mut Knockback,
            &mut GuardAudio,
        ),
        With<Guard>,
    >,
    mut players: Query<
        (Option<&mut MovementLock>, &Transform, &mut Velocity),
        (With<Player>, Without<Guard>),
    >,
    mut music: MusicDirector,
    mut qte_ui: EventWriter<QteUiEvent>,
    mut captured: EventWriter<PlayerCaptured>,
) {
    let delta = time.delta_secs();

    for (guard, mut state, config, transform, facing, mut velocity, mut knockback, mut audio) in
        guards.iter_mut()
    {
        let GuardState::Contact { target, mut session } = *state else {
            continue;
        };

        let pressed = input.was_just_pressed(session.key);
        match session.advance(delta, pressed) {
            QteOutcome::Pending => {
                *state = GuardState::Contact { target, session };
            }
            QteOutcome::Escaped => {
                let (mut lock, player_position) = match players.get_mut(target) {
                    Ok((lock, player_transform, _)) => {
                        (lock, Some(player_transform.translation.truncate()))
                    }
                    Err(_) => (None, None),
                };
                release_hold(guard, lock.as_deref_mut(), &mut audio, &mut music, &mut qte_ui);

                let away = player_position
                    .map(|p| transform.translation.truncate() - p)
                    .unwrap_or(Vec2::ZERO)
                    .normalize_or(-facing.as_vec2());
                knockback.start(away, config.knockback_force, config.knockback_duration);

                *state = GuardState::Stunned {
                    remaining: config.escape_stun_duration,
                };
                crate::log(&format!(
                    "🔓 Guard {:?}: Contact → Stunned ({:?} escaped, {}/{} presses, {:.1}s left)",
                    guard, target, session.presses, session.required, session.remaining
                ));
            }
            QteOutcome::Failed => {
                qte_ui.write(QteUiEvent::Hide { guard });
                velocity.0 = Vec2::ZERO;
                if let Ok((lock, _, mut player_velocity)) = players.get_mut(target) {
                    player_velocity.0 = Vec2::ZERO;
                    if let Some(mut lock) = lock {
                        lock.lock();
                    }
                }

                captured.write(PlayerCaptured {
                    guard,
                    player: target,
                });
                *state = GuardState::Captured {
                    target,
                    audio_cutoff: Some(config.capture_audio_cutoff),
                };
                crate::log(&format!(
                    "🚨 Guard {:?}: Contact → Captured ({:?} caught, {}/{} presses)",
                    guard, target, session.presses, session.required
                ));
            }
        }
    }
}

/// System: snap-follow the held player, staying on the guard's side of them
pub fn cling_to_captive(
    time: Res<Time>,
    mut guards: Query<(&GuardState, &GuardConfig, &mut Transform), With<Guard>>,
    players: Query<&Transform, (With<Player>, Without<Guard>)>,
) {
    let delta = time.delta_secs();

    for (state, config, mut transform) in guards.iter_mut() {
        let GuardState::Contact { target, .. } = *state else {
            continue;
        };
        let Ok(player) = players.get(target) else {
            continue;
        };

        let player_position = player.translation.truncate();
        let position = transform.translation.truncate();
        let side = if position.x < player_position.x { -1.0 } else { 1.0 };
        let desired = player_position + Vec2::new(side * config.cling_offset, 0.0);

        let factor = (config.cling_smoothing * delta).clamp(0.0, 1.0);
        let next = position.lerp(desired, factor);
        transform.translation.x = next.x;
        transform.translation.y = next.y;
    }
}
