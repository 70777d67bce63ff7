//! Semantic events exchanged between the gesture recognizer and the host.
//!
//! A semantic event is a discrete, typed intent derived from raw touch data.
//! It carries no identity beyond its payload: two `Move { dx: 1.0, dy: 0.0 }`
//! values are interchangeable.
//!
//! # JSON representation
//!
//! Every event is a JSON object with a `"type"` discriminant; the remaining
//! fields are flattened into the same object.  Field names follow the wire
//! format used by the touch client, so `dx`/`dy` travel as `x`/`y` and a zoom
//! factor travels as `scale`:
//!
//! ```json
//! {"type":"move","x":3.5,"y":-7.0}
//! {"type":"scroll","x":0.0,"y":2.0}
//! {"type":"zoom","scale":1.1}
//! {"type":"click","button":"left"}
//! {"type":"nextWindow"}
//! {"type":"verticalGesture","direction":"down"}
//! ```

use serde::{Deserialize, Serialize};

/// Zoom factor carried by a zoom-in event.
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Zoom factor carried by a zoom-out event.
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Wire names of every event type the host understands.
pub const EVENT_TYPES: [&str; 6] = [
    "move",
    "scroll",
    "zoom",
    "click",
    "nextWindow",
    "verticalGesture",
];

/// A mouse button named in a click event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Direction of a three-finger vertical swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalDirection {
    Up,
    Down,
}

/// All intents the touch client can send to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SemanticEvent {
    /// Relative pointer motion, already scaled by the drag sensitivity.
    Move {
        #[serde(rename = "x")]
        dx: f64,
        #[serde(rename = "y")]
        dy: f64,
    },

    /// Scroll intent in client units.  The host converts these to wheel units.
    Scroll {
        #[serde(rename = "x")]
        dx: f64,
        #[serde(rename = "y")]
        dy: f64,
    },

    /// Zoom step.  A factor above 1 zooms in, anything else zooms out.
    Zoom {
        #[serde(rename = "scale")]
        factor: f64,
    },

    /// A single click.  Older clients omit the button; it defaults to left.
    Click {
        #[serde(default)]
        button: MouseButton,
    },

    /// Switch to the next application window.
    NextWindow,

    /// Three-finger vertical swipe.
    VerticalGesture { direction: VerticalDirection },
}

impl SemanticEvent {
    /// Returns the wire name of this event's type.
    ///
    /// Used in log messages so payload values stay out of the logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SemanticEvent::Move { .. } => "move",
            SemanticEvent::Scroll { .. } => "scroll",
            SemanticEvent::Zoom { .. } => "zoom",
            SemanticEvent::Click { .. } => "click",
            SemanticEvent::NextWindow => "nextWindow",
            SemanticEvent::VerticalGesture { .. } => "verticalGesture",
        }
    }

    /// Builds the zoom event for a rail displacement of the given sign.
    pub fn zoom_towards(positive: bool) -> Self {
        SemanticEvent::Zoom {
            factor: if positive {
                ZOOM_IN_FACTOR
            } else {
                ZOOM_OUT_FACTOR
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_serializes_deltas_as_x_and_y() {
        // Arrange
        let event = SemanticEvent::Move { dx: 3.5, dy: -7.0 };

        // Act
        let json = serde_json::to_string(&event).unwrap();

        // Assert
        assert_eq!(json, r#"{"type":"move","x":3.5,"y":-7.0}"#);
    }

    #[test]
    fn test_next_window_serializes_as_bare_type() {
        let json = serde_json::to_string(&SemanticEvent::NextWindow).unwrap();
        assert_eq!(json, r#"{"type":"nextWindow"}"#);
    }

    #[test]
    fn test_zoom_uses_scale_field() {
        let json = serde_json::to_string(&SemanticEvent::Zoom { factor: 1.1 }).unwrap();
        assert!(json.contains(r#""scale":1.1"#));
        assert!(json.contains(r#""type":"zoom""#));
    }

    #[test]
    fn test_vertical_gesture_direction_is_lowercase() {
        let event = SemanticEvent::VerticalGesture {
            direction: VerticalDirection::Down,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"verticalGesture","direction":"down"}"#);
    }

    #[test]
    fn test_click_without_button_defaults_to_left() {
        // Arrange: the button field is absent
        let json = r#"{"type":"click"}"#;

        // Act
        let event: SemanticEvent = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(
            event,
            SemanticEvent::Click {
                button: MouseButton::Left
            }
        );
    }

    #[test]
    fn test_kind_matches_serialized_type_for_every_variant() {
        let events = [
            SemanticEvent::Move { dx: 1.0, dy: 1.0 },
            SemanticEvent::Scroll { dx: 0.0, dy: 1.0 },
            SemanticEvent::Zoom { factor: 0.9 },
            SemanticEvent::Click {
                button: MouseButton::Right,
            },
            SemanticEvent::NextWindow,
            SemanticEvent::VerticalGesture {
                direction: VerticalDirection::Up,
            },
        ];

        for event in events {
            let value: serde_json::Value = serde_json::to_value(event).unwrap();
            assert_eq!(value["type"], event.kind());
            assert!(EVENT_TYPES.contains(&event.kind()));
        }
    }

    #[test]
    fn test_zoom_towards_picks_factor_by_sign() {
        assert_eq!(
            SemanticEvent::zoom_towards(true),
            SemanticEvent::Zoom { factor: ZOOM_IN_FACTOR }
        );
        assert_eq!(
            SemanticEvent::zoom_towards(false),
            SemanticEvent::Zoom { factor: ZOOM_OUT_FACTOR }
        );
    }
}
