use serde::{Deserialize, Serialize};

use super::editor::{DiagramEditor, Outcome};
use super::types::{Mode, Point};

/// One interaction reported by the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CanvasEvent {
    Click { x: f32, y: f32 },
    Drag { from: Point, to: Point },
    SetMode { mode: Mode },
    ToggleMode,
    Reset,
}

/// Parses one JSON event line. Blank lines, `#` comments and anything that
/// does not describe a complete event yield `None`.
pub fn parse_event_line(line: &str) -> Option<CanvasEvent> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    match serde_json::from_str(line) {
        Ok(event) => Some(event),
        Err(_err) => {
            crate::log::warn!(line, error = %_err, "skipping malformed canvas event");
            None
        }
    }
}

pub fn parse_event_script(source: &str) -> Vec<CanvasEvent> {
    source.lines().filter_map(parse_event_line).collect()
}

/// Applies every event in `source` to `editor`, in order.
pub fn replay(editor: &mut DiagramEditor, source: &str) -> Vec<Outcome> {
    parse_event_script(source)
        .iter()
        .map(|event| editor.handle(event))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_event_kind() {
        let script = r#"
# switch to point placement
{"event":"set_mode","mode":"place_points"}
{"event":"click","x":250,"y":170}
{"event":"toggle_mode"}
{"event":"drag","from":{"x":120,"y":80},"to":{"x":130,"y":90}}
{"event":"reset"}
"#;
        assert_eq!(
            parse_event_script(script),
            [
                CanvasEvent::SetMode {
                    mode: Mode::PlacePoints
                },
                CanvasEvent::Click { x: 250.0, y: 170.0 },
                CanvasEvent::ToggleMode,
                CanvasEvent::Drag {
                    from: Point::new(120.0, 80.0),
                    to: Point::new(130.0, 90.0)
                },
                CanvasEvent::Reset,
            ]
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        assert_eq!(parse_event_line(r#"{"event":"click","x":250}"#), None);
        assert_eq!(parse_event_line(r#"{"event":"teleport"}"#), None);
        assert_eq!(parse_event_line("not json"), None);
        assert_eq!(parse_event_line("   "), None);
    }

    #[test]
    fn replay_reports_outcomes_in_order() {
        let mut editor = DiagramEditor::new();
        let outcomes = replay(
            &mut editor,
            "{\"event\":\"toggle_mode\"}\n{\"event\":\"click\",\"x\":5,\"y\":5}\n{\"event\":\"click\",\"x\":300,\"y\":200}\n",
        );
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1], Outcome::Rejected(Point::new(5.0, 5.0)));
        assert!(matches!(outcomes[2], Outcome::Placed(p) if p.number == 1));
    }
}
