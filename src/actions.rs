//! Gesture to desktop action table.
//!
//! The service performs the actions itself; this table only tells the user
//! what a recognized gesture is bound to.

use serde::Serialize;

/// One binding of a gesture label to a system action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionMapping {
    pub gesture: &'static str,
    pub action: &'static str,
}

pub const DEFAULT_MAPPINGS: &[ActionMapping] = &[
    ActionMapping {
        gesture: "Palm_Open",
        action: "Play/Pause",
    },
    ActionMapping {
        gesture: "Thumb_Up",
        action: "Volume Up",
    },
    ActionMapping {
        gesture: "Fist",
        action: "Boss Key (Mute & Hide)",
    },
    ActionMapping {
        gesture: "Peace",
        action: "Switch App",
    },
];

/// Action bound to a predicted label, if any.
pub fn action_for(prediction: &str) -> Option<&'static str> {
    DEFAULT_MAPPINGS
        .iter()
        .find(|m| m.gesture == prediction)
        .map(|m| m.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fist_is_boss_key() {
        assert_eq!(action_for("Fist"), Some("Boss Key (Mute & Hide)"));
    }

    #[test]
    fn unmapped_label_has_no_action() {
        assert_eq!(action_for("Pinch"), None);
        assert_eq!(action_for("fist"), None);
    }

    #[test]
    fn mappings_serialise_for_display() {
        let json = serde_json::to_value(DEFAULT_MAPPINGS).unwrap();
        assert_eq!(json[0]["gesture"], "Palm_Open");
        assert_eq!(json[0]["action"], "Play/Pause");
    }
}
