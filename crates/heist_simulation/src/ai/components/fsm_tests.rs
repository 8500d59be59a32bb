//! Tests for guard FSM components.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::fsm::{EscapeKey, GuardConfig, GuardState};
    use super::super::qte::QteSession;

    #[test]
    fn test_guard_state_default() {
        let state = GuardState::default();
        assert!(matches!(state, GuardState::Patrol));
        assert!(state.perceives());
        assert!(state.can_grab());
        assert_eq!(state.target(), None);
    }

    #[test]
    fn test_guard_config_default() {
        let config = GuardConfig::default();
        assert_eq!(config.max_health, 2);
        assert_eq!(config.vision_range, 5.0);
        assert_eq!(config.qte_required_presses, 15);
        assert_eq!(config.qte_time_limit, 5.0);
        assert_eq!(config.chase_speed(), 6.0);
        assert!(config.capture_range >= config.vision_range);
    }

    #[test]
    fn test_sanitized_raises_capture_range() {
        let config = GuardConfig {
            vision_range: 8.0,
            capture_range: 3.0,
            vision_angle_deg: 720.0,
            qte_required_presses: 0,
            ..default()
        }
        .sanitized();

        assert_eq!(config.capture_range, 8.0);
        assert_eq!(config.vision_angle_deg, 360.0);
        assert_eq!(config.qte_required_presses, 1);
    }

    #[test]
    fn test_only_contact_exposes_a_session() {
        let target = Entity::from_raw(7);
        let contact = GuardState::Contact {
            target,
            session: QteSession::new(15, 5.0, EscapeKey::E),
        };

        assert!(contact.qte().is_some());
        assert_eq!(contact.target(), Some(target));
        assert!(!contact.can_grab());
        assert!(GuardState::Chase { target }.qte().is_none());
    }

    #[test]
    fn test_disabled_states_do_not_perceive() {
        assert!(!GuardState::Stunned { remaining: 1.0 }.perceives());
        assert!(!GuardState::Incapacitated { remaining: 1.0 }.perceives());
        assert!(!GuardState::Captured {
            target: Entity::PLACEHOLDER,
            audio_cutoff: None
        }
        .perceives());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: GuardConfig =
            serde_json::from_str(r#"{ "vision_range": 4.0, "escape_key": "Space" }"#)
                .expect("valid guard config");
        assert_eq!(config.vision_range, 4.0);
        assert_eq!(config.escape_key, EscapeKey::Space);
        assert_eq!(config.max_health, 2);
    }
}
