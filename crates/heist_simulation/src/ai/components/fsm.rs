//! Guard FSM components (state machine, config, visual tint).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::qte::QteSession;
use crate::audio::GuardAudio;
use crate::combat::Knockback;
use crate::components::{Facing, Health, Velocity};

/// Guard marker. Pulls in every component the guard systems query.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(GuardState, GuardConfig, GuardTint, Health, Facing, Velocity, Knockback, GuardAudio)]
pub struct Guard;

/// Guard FSM state.
///
/// Patrol → Chase → Contact (QTE) → Stunned → Patrol
///                              └──→ Captured (terminal)
/// any active state → Incapacitated → Patrol
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum GuardState {
    /// Walking left/right, flipping on walls
    #[default]
    Patrol,

    /// Player spotted, running at them
    Chase { target: Entity },

    /// Holding the player; the QTE decides the outcome
    Contact {
        target: Entity,
        session: QteSession,
    },

    /// Short stun after the player broke free
    Stunned { remaining: f32 },

    /// Health depleted, out of the game until recovery
    Incapacitated { remaining: f32 },

    /// Player caught. Terminal for this life; audio stops after the cutoff
    Captured {
        target: Entity,
        audio_cutoff: Option<f32>,
    },
}

impl GuardState {
    pub fn name(&self) -> &'static str {
        match self {
            GuardState::Patrol => "Patrol",
            GuardState::Chase { .. } => "Chase",
            GuardState::Contact { .. } => "Contact",
            GuardState::Stunned { .. } => "Stunned",
            GuardState::Incapacitated { .. } => "Incapacitated",
            GuardState::Captured { .. } => "Captured",
        }
    }

    pub fn is_chasing(&self) -> bool {
        matches!(self, GuardState::Chase { .. })
    }

    pub fn is_in_contact(&self) -> bool {
        matches!(self, GuardState::Contact { .. })
    }

    pub fn is_incapacitated(&self) -> bool {
        matches!(self, GuardState::Incapacitated { .. })
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, GuardState::Captured { .. })
    }

    /// States in which perception runs at all.
    pub fn perceives(&self) -> bool {
        matches!(
            self,
            GuardState::Patrol | GuardState::Chase { .. } | GuardState::Contact { .. }
        )
    }

    /// Physical contact with the player can start a QTE from here.
    pub fn can_grab(&self) -> bool {
        matches!(self, GuardState::Patrol | GuardState::Chase { .. })
    }

    pub fn target(&self) -> Option<Entity> {
        match self {
            GuardState::Chase { target }
            | GuardState::Contact { target, .. }
            | GuardState::Captured { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub fn qte(&self) -> Option<&QteSession> {
        match self {
            GuardState::Contact { session, .. } => Some(session),
            _ => None,
        }
    }
}

/// Key the player mashes to break free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum EscapeKey {
    #[default]
    E,
    F,
    Q,
    Space,
}

impl fmt::Display for EscapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EscapeKey::E => "E",
            EscapeKey::F => "F",
            EscapeKey::Q => "Q",
            EscapeKey::Space => "Space",
        };
        f.write_str(label)
    }
}

/// Per-guard tuning, exposed to level files.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct GuardConfig {
    /// Patrol speed (units/sec)
    pub patrol_speed: f32,
    /// Chase speed = patrol_speed × chase_multiplier
    pub chase_multiplier: f32,
    /// Patrol stops when false (guard stands still until it spots someone)
    pub auto_patrol: bool,

    /// Detection radius while not holding anyone
    pub vision_range: f32,
    /// Full cone angle in degrees, centred on the facing direction
    pub vision_angle_deg: f32,
    /// Angle-free radius used while a QTE is running (≥ vision_range)
    pub capture_range: f32,

    pub max_health: u32,
    /// Seconds knocked out after health hits zero
    pub incapacitation_duration: f32,
    pub knockback_force: f32,
    pub knockback_duration: f32,

    pub qte_required_presses: u32,
    pub qte_time_limit: f32,
    pub escape_key: EscapeKey,
    /// Short stun after the player escapes the QTE
    pub escape_stun_duration: f32,
    /// Distance kept from the player while clinging during the QTE
    pub cling_offset: f32,
    /// Lerp rate (1/sec) of the cling snap-follow
    pub cling_smoothing: f32,

    /// Delay between the capture and silencing the guard's tracks
    pub capture_audio_cutoff: f32,
    pub chase_track: Option<String>,
    pub capture_track: Option<String>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            patrol_speed: 2.0,
            chase_multiplier: 3.0,
            auto_patrol: true,
            vision_range: 5.0,
            vision_angle_deg: 90.0,
            capture_range: 7.0,
            max_health: 2,
            incapacitation_duration: 10.0,
            knockback_force: 5.0,
            knockback_duration: 0.2,
            qte_required_presses: 15,
            qte_time_limit: 5.0,
            escape_key: EscapeKey::E,
            escape_stun_duration: 2.0,
            cling_offset: 0.6,
            cling_smoothing: 10.0,
            capture_audio_cutoff: 2.0,
            chase_track: Some("chase".to_string()),
            capture_track: Some("capture".to_string()),
        }
    }
}

impl GuardConfig {
    pub fn chase_speed(&self) -> f32 {
        self.patrol_speed * self.chase_multiplier
    }

    pub fn half_vision_angle(&self) -> f32 {
        self.vision_angle_deg * 0.5
    }

    /// Clamps out-of-range values instead of rejecting the level.
    pub fn sanitized(mut self) -> Self {
        self.patrol_speed = self.patrol_speed.max(0.0);
        self.chase_multiplier = self.chase_multiplier.max(0.0);
        self.vision_range = self.vision_range.max(0.0);
        self.vision_angle_deg = self.vision_angle_deg.clamp(0.0, 360.0);
        if self.capture_range < self.vision_range {
            crate::log_warning(&format!(
                "GuardConfig: capture_range {} < vision_range {}, raising it",
                self.capture_range, self.vision_range
            ));
            self.capture_range = self.vision_range;
        }
        self.max_health = self.max_health.max(1);
        self.incapacitation_duration = self.incapacitation_duration.max(0.0);
        self.knockback_force = self.knockback_force.max(0.0);
        self.knockback_duration = self.knockback_duration.max(0.0);
        self.qte_required_presses = self.qte_required_presses.max(1);
        self.qte_time_limit = self.qte_time_limit.max(0.0);
        self.escape_stun_duration = self.escape_stun_duration.max(0.0);
        self.cling_offset = self.cling_offset.max(0.0);
        self.cling_smoothing = self.cling_smoothing.max(0.0);
        self.capture_audio_cutoff = self.capture_audio_cutoff.max(0.0);
        self
    }
}

/// Sprite tint the renderer applies (grey while knocked out).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum GuardTint {
    #[default]
    Normal,
    Incapacitated,
}
