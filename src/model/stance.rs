use crate::config::{BobConfig, BobProfile, MovementConfig};

/// Movement mode of the player. Crouching and sprinting are exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stance {
    #[default]
    Standing,
    Crouching,
    Sprinting,
}

/// A press of one of the stance toggle keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanceToggle {
    Crouch,
    Sprint,
}

impl Stance {
    /// Apply a toggle press. Pressing the key of the active mode returns to standing.
    /// Crouching outranks sprinting: crouch cancels a sprint, but a sprint press while
    /// crouched leaves the player crouched.
    pub fn toggled(self, toggle: StanceToggle) -> Stance {
        match (toggle, self) {
            (StanceToggle::Crouch, Stance::Crouching) => Stance::Standing,
            (StanceToggle::Crouch, _) => Stance::Crouching,
            (StanceToggle::Sprint, Stance::Crouching) => Stance::Crouching,
            (StanceToggle::Sprint, Stance::Sprinting) => Stance::Standing,
            (StanceToggle::Sprint, _) => Stance::Sprinting,
        }
    }

    pub fn is_crouching(self) -> bool {
        self == Stance::Crouching
    }

    pub fn is_sprinting(self) -> bool {
        self == Stance::Sprinting
    }

    pub fn move_speed(self, movement: &MovementConfig) -> f32 {
        match self {
            Stance::Crouching => movement.crouch_speed,
            Stance::Sprinting => movement.sprint_speed,
            Stance::Standing => movement.walk_speed,
        }
    }

    pub fn bob_profile(self, bob: &BobConfig) -> BobProfile {
        match self {
            Stance::Crouching => bob.crouch,
            Stance::Sprinting => bob.sprint,
            Stance::Standing => bob.walk,
        }
    }

    pub fn collider_height(self, movement: &MovementConfig) -> f32 {
        match self {
            Stance::Crouching => movement.crouch_height,
            Stance::Standing | Stance::Sprinting => movement.standing_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crouch_toggle_cycles() {
        let s = Stance::Standing.toggled(StanceToggle::Crouch);
        assert_eq!(s, Stance::Crouching);
        assert_eq!(s.toggled(StanceToggle::Crouch), Stance::Standing);
    }

    #[test]
    fn test_crouch_outranks_sprint() {
        let s = Stance::Sprinting.toggled(StanceToggle::Crouch);
        assert_eq!(s, Stance::Crouching);
        assert!(!s.is_sprinting());

        assert_eq!(s.toggled(StanceToggle::Sprint), Stance::Crouching);
        let s = s.toggled(StanceToggle::Crouch).toggled(StanceToggle::Sprint);
        assert_eq!(s, Stance::Sprinting);
        assert_eq!(s.toggled(StanceToggle::Sprint), Stance::Standing);
    }

    #[test]
    fn test_speed_and_bob_follow_stance() {
        let movement = MovementConfig::default();
        let bob = BobConfig::default();
        assert_eq!(Stance::Standing.move_speed(&movement), 5.0);
        assert_eq!(Stance::Sprinting.move_speed(&movement), 8.0);
        assert_eq!(Stance::Crouching.move_speed(&movement), 2.5);
        assert_eq!(Stance::Sprinting.bob_profile(&bob).speed, 14.0);
        assert_eq!(Stance::Crouching.bob_profile(&bob).amount, 0.03);
        assert_eq!(Stance::Crouching.collider_height(&movement), 1.0);
        assert_eq!(Stance::Sprinting.collider_height(&movement), 2.0);
    }
}
