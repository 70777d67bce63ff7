//! The touch page served at `/`.
//!
//! The page is compiled into the binary.  The current gesture settings are
//! substituted into it on every request, so a settings reload takes effect
//! on the next page load.

use trackpad_core::GestureConfig;

const TEMPLATE: &str = include_str!("../../assets/trackpad.html");

/// Renders the touch page with `config` substituted in.
pub fn render_page(config: &GestureConfig) -> String {
    let substitutions: [(&str, String); 10] = [
        ("{{MOVE_SENSITIVITY}}", js_number(config.move_sensitivity)),
        ("{{SCROLL_SENSITIVITY}}", js_number(config.scroll_sensitivity)),
        (
            "{{RAIL_SCROLL_SENSITIVITY}}",
            js_number(config.rail_scroll_sensitivity),
        ),
        ("{{TAP_THRESHOLD_MS}}", config.tap_threshold_ms.to_string()),
        ("{{SWIPE_THRESHOLD}}", js_number(config.swipe_threshold)),
        ("{{VERTICAL_THRESHOLD}}", js_number(config.vertical_threshold)),
        ("{{ZOOM_THRESHOLD}}", js_number(config.zoom_threshold)),
        ("{{ZOOM_COOLDOWN_MS}}", config.zoom_cooldown_ms.to_string()),
        ("{{ZOOM_IN_FACTOR}}", js_number(config.zoom_in_factor)),
        ("{{ZOOM_OUT_FACTOR}}", js_number(config.zoom_out_factor)),
    ];

    substitutions
        .iter()
        .fold(TEMPLATE.to_string(), |page, (placeholder, value)| {
            page.replace(placeholder, value)
        })
}

/// Formats a float as a JavaScript literal.  Validated configs are finite,
/// but `0` keeps the script parseable if one is not.
fn js_number(value: f64) -> String {
    if value.is_finite() {
        format!("{value:?}")
    } else {
        "0".to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_placeholder() {
        let page = render_page(&GestureConfig::default());
        assert!(!page.contains("{{"), "unrendered placeholder left in page");
    }

    #[test]
    fn test_render_includes_configured_sensitivities() {
        // Arrange
        let config = GestureConfig {
            move_sensitivity: 4.25,
            scroll_sensitivity: 0.3,
            ..GestureConfig::default()
        };

        // Act
        let page = render_page(&config);

        // Assert
        assert!(page.contains("moveSensitivity: 4.25,"));
        assert!(page.contains("scrollSensitivity: 0.3,"));
        assert!(page.contains("tapThresholdMs: 150,"));
    }

    #[test]
    fn test_whole_numbers_render_as_valid_literals() {
        assert_eq!(js_number(50.0), "50.0");
        assert_eq!(js_number(f64::NAN), "0");
    }

    #[test]
    fn test_page_opens_websocket_on_ws_path() {
        assert!(render_page(&GestureConfig::default()).contains("/ws`"));
    }
}
