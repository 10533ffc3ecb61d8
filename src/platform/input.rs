//! Keyboard input mapping
//!
//! Key-down events are edge-triggered: one event, one action. Held keys
//! that auto-repeat are filtered by the caller (`KeyboardEvent.repeat`).

/// Discrete player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    LaneLeft,
    LaneRight,
    Jump,
    Slide,
    Pause,
}

/// Map a `KeyboardEvent.code` to an action
pub fn action_for_key(code: &str) -> Option<Action> {
    match code {
        "KeyA" | "ArrowLeft" => Some(Action::LaneLeft),
        "KeyD" | "ArrowRight" => Some(Action::LaneRight),
        "KeyW" | "ArrowUp" | "Space" => Some(Action::Jump),
        "KeyS" | "ArrowDown" | "ShiftLeft" | "ShiftRight" => Some(Action::Slide),
        "Escape" => Some(Action::Pause),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(action_for_key("ArrowLeft"), Some(Action::LaneLeft));
        assert_eq!(action_for_key("KeyD"), Some(Action::LaneRight));
        assert_eq!(action_for_key("Space"), Some(Action::Jump));
        assert_eq!(action_for_key("ShiftRight"), Some(Action::Slide));
        assert_eq!(action_for_key("Escape"), Some(Action::Pause));
        assert_eq!(action_for_key("KeyQ"), None);
    }
}
