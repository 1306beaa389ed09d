use super::editor::DiagramEditor;
use super::types::{CANVAS_HEIGHT, CANVAS_WIDTH, CART, GRID_SPACING};
use crate::style::DiagramStyle;

/// Render the editor's current canvas as a standalone SVG document: grid
/// background, cart, ports, then numbered points on top.
pub fn render_canvas(editor: &DiagramEditor, style: &DiagramStyle) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">
<rect width="{w}" height="{h}" fill="{bg}"/>
"#,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT,
        font = escape_xml(&style.font_family),
        bg = escape_xml(&style.background),
    );

    svg.push_str(&render_grid(style));

    svg.push_str(&format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" stroke-width="{:.2}" />
"#,
        CART.x,
        CART.y,
        CART.width,
        CART.height,
        escape_xml(&style.cart_fill),
        escape_xml(&style.cart_stroke),
        style.stroke_width
    ));

    for port in editor.ports() {
        svg.push_str(&render_marker(
            port.position.x,
            port.position.y,
            style.port_radius,
            &style.port_fill,
            &style.port_stroke,
            &style.port_text,
            port.label,
            style,
        ));
    }

    for point in editor.points() {
        svg.push_str(&render_marker(
            point.position.x,
            point.position.y,
            style.point_radius,
            &style.point_fill,
            &style.point_fill,
            &style.point_text,
            &point.number.to_string(),
            style,
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn render_grid(style: &DiagramStyle) -> String {
    let mut grid = format!(
        r#"<g stroke="{}" stroke-width="1">
"#,
        escape_xml(&style.grid_color)
    );

    let columns = (CANVAS_WIDTH / GRID_SPACING) as usize;
    for i in 1..columns {
        let x = i as f32 * GRID_SPACING;
        grid.push_str(&format!(
            r#"<line x1="{x:.2}" y1="0" x2="{x:.2}" y2="{CANVAS_HEIGHT:.2}" />
"#
        ));
    }

    let rows = (CANVAS_HEIGHT / GRID_SPACING) as usize;
    for i in 1..rows {
        let y = i as f32 * GRID_SPACING;
        grid.push_str(&format!(
            r#"<line x1="0" y1="{y:.2}" x2="{CANVAS_WIDTH:.2}" y2="{y:.2}" />
"#
        ));
    }

    grid.push_str("</g>\n");
    grid
}

#[allow(clippy::too_many_arguments)]
fn render_marker(
    cx: f32,
    cy: f32,
    radius: f32,
    fill: &str,
    stroke: &str,
    text_color: &str,
    label: &str,
    style: &DiagramStyle,
) -> String {
    format!(
        r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{radius:.2}" fill="{}" stroke="{}" stroke-width="{:.2}" />
<text x="{cx:.2}" y="{cy:.2}" fill="{}" font-size="{:.2}" text-anchor="middle" dominant-baseline="central">{}</text>
"#,
        escape_xml(fill),
        escape_xml(stroke),
        style.stroke_width,
        escape_xml(text_color),
        style.font_size,
        escape_xml(label)
    )
}

/// XML 1.0 valid char ranges:
/// - 0x09, 0x0A, 0x0D
/// - 0x20..=0xD7FF
/// - 0xE000..=0xFFFD
/// - 0x10000..=0x10FFFF
fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

/// Escapes text and attribute values, dropping characters XML cannot hold.
/// Style values come from user files and end up inside attributes.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|&c| is_valid_xml_char(c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::types::{Mode, Point};

    #[test]
    fn fresh_canvas_has_cart_and_three_ports() {
        let svg = render_canvas(&DiagramEditor::new(), &DiagramStyle::default());
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"600\" height=\"400\""));
        assert!(svg.contains(r#"<rect x="220.00" y="140.00" width="160.00" height="120.00""#));
        for label in [">P1</text>", ">P2</text>", ">P3</text>"] {
            assert!(svg.contains(label), "{label}");
        }
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn placed_points_are_drawn_with_their_numbers() {
        let mut editor = DiagramEditor::new();
        editor.set_mode(Mode::PlacePoints);
        editor.click(Point::new(250.0, 170.0));
        editor.click(Point::new(260.0, 170.0));

        let svg = render_canvas(&editor, &DiagramStyle::default());
        assert_eq!(svg.matches("<circle").count(), 5);
        assert!(svg.contains(r#"<circle cx="250.00" cy="170.00""#));
        assert!(svg.contains(">1</text>"));
        assert!(svg.contains(">2</text>"));
    }

    #[test]
    fn style_values_are_escaped() {
        let style = DiagramStyle {
            cart_fill: "red\" onload=\"x".to_string(),
            ..DiagramStyle::default()
        };
        let svg = render_canvas(&DiagramEditor::new(), &style);
        assert!(svg.contains("fill=\"red&quot; onload=&quot;x\""));
    }

    #[test]
    fn escape_drops_invalid_control_chars() {
        assert_eq!(escape_xml("A\u{0007}B<C>"), "AB&lt;C&gt;");
        assert_eq!(escape_xml("a\tb\nc"), "a\tb\nc");
    }
}
