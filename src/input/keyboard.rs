use super::{Direction, Intent};
use crate::animation::MoveId;

/// Fixed key bindings, matched case-insensitively on DOM-style key names.
pub fn intent_for_key(key: &str) -> Option<Intent> {
    let intent = match key.to_ascii_lowercase().as_str() {
        "a" | "arrowleft" => Intent::Move {
            direction: Direction::Left,
        },
        "d" | "arrowright" => Intent::Move {
            direction: Direction::Right,
        },
        "w" | "arrowup" | " " | "space" => Intent::Jump,
        "j" => Intent::attack(MoveId::PunchLight),
        "k" => Intent::attack(MoveId::KickLight),
        "l" => Intent::Block,
        "u" => Intent::attack(MoveId::Uppercut),
        "i" => Intent::attack(MoveId::Roundhouse),
        _ => return None,
    };
    Some(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(intent_for_key("ArrowLeft"), Some(Intent::Move { direction: Direction::Left }));
        assert_eq!(intent_for_key("D"), Some(Intent::Move { direction: Direction::Right }));
        assert_eq!(intent_for_key(" "), Some(Intent::Jump));
        assert_eq!(intent_for_key("i"), Some(Intent::attack(MoveId::Roundhouse)));
        assert_eq!(intent_for_key("l"), Some(Intent::Block));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(intent_for_key("q"), None);
        assert_eq!(intent_for_key(""), None);
        assert_eq!(intent_for_key("Escape"), None);
    }
}
