//! Music priority: exclusive event tracks (chase, capture) over ambient background.
//!
//! Архитектура:
//! - `AudioPriority` — shared reference count of active event tracks
//! - count 0 → 1: background pauses; count → 0: background resumes
//! - order of stop calls is irrelevant, only the count matters
//! - actual playback is the host's job: it consumes `MusicCue` events

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

/// Background transition caused by a register/unregister call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundCue {
    Pause,
    Resume,
}

/// Shared counter of playing event tracks.
///
/// Invariant: background is playing iff `active_tracks() == 0`.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct AudioPriority {
    active: u32,
}

impl AudioPriority {
    pub fn active_tracks(&self) -> u32 {
        self.active
    }

    pub fn background_playing(&self) -> bool {
        self.active == 0
    }

    pub fn register_active_track(&mut self) -> Option<BackgroundCue> {
        self.active = self.active.saturating_add(1);
        (self.active == 1).then_some(BackgroundCue::Pause)
    }

    /// Unregistering with nothing registered is clamped (and reported).
    pub fn unregister_active_track(&mut self) -> Option<BackgroundCue> {
        if self.active == 0 {
            crate::log_warning("AudioPriority: unregister with zero active tracks, clamped to 0");
            return None;
        }
        self.active -= 1;
        (self.active == 0).then_some(BackgroundCue::Resume)
    }

    /// Emergency reset when the count got out of sync with reality.
    pub fn force_resume(&mut self) -> Option<BackgroundCue> {
        let was_active = self.active;
        self.active = 0;
        if was_active > 0 {
            crate::log_warning(&format!(
                "AudioPriority: forced background resume (count was {})",
                was_active
            ));
            Some(BackgroundCue::Resume)
        } else {
            None
        }
    }

    /// Full session restart.
    pub fn reset(&mut self) {
        self.active = 0;
    }
}

/// Which of a guard's two looping tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TrackKind {
    Chase,
    Capture,
}

/// Playback commands for the host audio system.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum MusicCue {
    Play {
        guard: Entity,
        kind: TrackKind,
        track: String,
    },
    Stop {
        guard: Entity,
        kind: TrackKind,
    },
    BackgroundPaused,
    BackgroundResumed,
}

/// Which of a guard's tracks are currently registered as playing.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct GuardAudio {
    pub chase_playing: bool,
    pub capture_playing: bool,
}

impl GuardAudio {
    pub fn is_playing(&self, kind: TrackKind) -> bool {
        match kind {
            TrackKind::Chase => self.chase_playing,
            TrackKind::Capture => self.capture_playing,
        }
    }

    fn set_playing(&mut self, kind: TrackKind, playing: bool) {
        match kind {
            TrackKind::Chase => self.chase_playing = playing,
            TrackKind::Capture => self.capture_playing = playing,
        }
    }
}

/// System param bundling the priority counter and the cue writer.
///
/// Start/stop are idempotent per guard track, so the counter only moves
/// on real transitions.
#[derive(SystemParam)]
pub struct MusicDirector<'w> {
    priority: ResMut<'w, AudioPriority>,
    cues: EventWriter<'w, MusicCue>,
}

impl MusicDirector<'_> {
    pub fn start(
        &mut self,
        guard: Entity,
        kind: TrackKind,
        track: Option<&str>,
        audio: &mut GuardAudio,
    ) {
        if audio.is_playing(kind) {
            return;
        }
        let Some(track) = track else {
            crate::log_warning(&format!(
                "Guard {:?}: no {:?} track assigned, skipping music",
                guard, kind
            ));
            return;
        };

        audio.set_playing(kind, true);
        if let Some(cue) = self.priority.register_active_track() {
            self.write_background(cue);
        }
        self.cues.write(MusicCue::Play {
            guard,
            kind,
            track: track.to_string(),
        });
        crate::log(&format!("🎵 Guard {:?}: {:?} track started", guard, kind));
    }

    pub fn stop(&mut self, guard: Entity, kind: TrackKind, audio: &mut GuardAudio) {
        if !audio.is_playing(kind) {
            return;
        }

        audio.set_playing(kind, false);
        self.cues.write(MusicCue::Stop { guard, kind });
        if let Some(cue) = self.priority.unregister_active_track() {
            self.write_background(cue);
        }
        crate::log(&format!("🎵 Guard {:?}: {:?} track stopped", guard, kind));
    }

    pub fn stop_all(&mut self, guard: Entity, audio: &mut GuardAudio) {
        self.stop(guard, TrackKind::Chase, audio);
        self.stop(guard, TrackKind::Capture, audio);
    }

    /// Drops whatever is still counted and resumes the background.
    pub fn force_resume(&mut self) {
        if let Some(cue) = self.priority.force_resume() {
            self.write_background(cue);
        }
    }

    fn write_background(&mut self, cue: BackgroundCue) {
        match cue {
            BackgroundCue::Pause => {
                self.cues.write(MusicCue::BackgroundPaused);
                crate::log("⏸️ Background music paused");
            }
            BackgroundCue::Resume => {
                self.cues.write(MusicCue::BackgroundResumed);
                crate::log("▶️ Background music resumed");
            }
        }
    }
}

/// Observer: a guard leaving the world (level teardown) gives its tracks back.
pub fn release_tracks_on_removal(
    trigger: Trigger<OnRemove, GuardAudio>,
    audio: Query<&GuardAudio>,
    mut director: MusicDirector,
) {
    let guard = trigger.target();
    let Ok(mut audio) = audio.get(guard).copied() else {
        return;
    };
    director.stop_all(guard, &mut audio);
}

/// Registers the shared counter and the cue event.
pub struct MusicPlugin;

impl Plugin for MusicPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AudioPriority>()
            .add_event::<MusicCue>()
            .add_observer(release_tracks_on_removal);
    }
}
