//! Countdown states: stun, incapacitation, post-capture audio cutoff.

use bevy::prelude::*;

use crate::ai::{Guard, GuardRecovered, GuardState, GuardTint};
use crate::audio::{GuardAudio, MusicDirector};
use crate::components::Health;

/// System: tick the timers carried by `GuardState` variants
///
/// Stunned → Patrol on expiry
/// Incapacitated → Patrol on expiry (health restored, tint back to normal)
/// Captured: all guard tracks stop once the audio cutoff runs out
pub fn tick_guard_timers(
    time: Res<Time>,
    mut guards: Query<
        (
            Entity,
            &mut GuardState,
            &mut Health,
            &mut GuardTint,
            &mut GuardAudio,
        ),
        With<Guard>,
    >,
    mut music: MusicDirector,
    mut recovered: EventWriter<GuardRecovered>,
) {
    let delta = time.delta_secs();

    for (guard, mut state, mut health, mut tint, mut audio) in guards.iter_mut() {
        match *state {
            GuardState::Stunned { remaining } => {
                let remaining = remaining - delta;
                if remaining <= 0.0 {
                    *state = GuardState::Patrol;
                    crate::log(&format!("Guard {:?}: Stunned → Patrol", guard));
                } else {
                    *state = GuardState::Stunned { remaining };
                }
            }
            GuardState::Incapacitated { remaining } => {
                let remaining = remaining - delta;
                if remaining <= 0.0 {
                    health.restore_full();
                    *tint = GuardTint::Normal;
                    *state = GuardState::Patrol;
                    recovered.write(GuardRecovered { guard });
                    crate::log(&format!(
                        "🩹 Guard {:?}: Incapacitated → Patrol (health {}/{})",
                        guard, health.current, health.max
                    ));
                } else {
                    *state = GuardState::Incapacitated { remaining };
                }
            }
            GuardState::Captured {
                target,
                audio_cutoff: Some(cutoff),
            } => {
                let cutoff = cutoff - delta;
                if cutoff <= 0.0 {
                    music.stop_all(guard, &mut audio);
                    *state = GuardState::Captured {
                        target,
                        audio_cutoff: None,
                    };
                } else {
                    *state = GuardState::Captured {
                        target,
                        audio_cutoff: Some(cutoff),
                    };
                }
            }
            _ => {}
        }
    }
}
