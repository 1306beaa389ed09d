use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const LIGHT_BACKGROUND: &str = "#ffffff";
const LIGHT_GRID: &str = "#e3e8ee";
const LIGHT_CART_FILL: &str = "#dbe9f7";
const LIGHT_CART_STROKE: &str = "#0066cc";
const LIGHT_PORT_FILL: &str = "#fff4d6";
const LIGHT_PORT_STROKE: &str = "#b07800";
const LIGHT_PORT_TEXT: &str = "#3d2a00";
const LIGHT_POINT_FILL: &str = "#d93025";
const LIGHT_POINT_TEXT: &str = "#ffffff";

const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE: f32 = 14.0;
const STROKE_WIDTH: f32 = 2.0;
const PORT_RADIUS: f32 = 14.0;
const POINT_RADIUS: f32 = 10.0;

const BUILTIN_STYLES: &[(&str, &str)] = &[
    ("light", ""),
    (
        "print",
        r##"
background = "#ffffff"
grid_color = "#f0f0f0"
cart_fill = "#ffffff"
cart_stroke = "#000000"
port_fill = "#ffffff"
port_stroke = "#000000"
port_text = "#000000"
point_fill = "#000000"
point_text = "#ffffff"
"##,
    ),
    (
        "dark",
        r##"
background = "#1e1e2e"
grid_color = "#313244"
cart_fill = "#45475a"
cart_stroke = "#89b4fa"
port_fill = "#f9e2af"
port_stroke = "#fab387"
port_text = "#1e1e2e"
point_fill = "#f38ba8"
point_text = "#1e1e2e"
"##,
    ),
];

/// Colors and sizes for the exported cart/port diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramStyle {
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_grid")]
    pub grid_color: String,
    #[serde(default = "default_cart_fill")]
    pub cart_fill: String,
    #[serde(default = "default_cart_stroke")]
    pub cart_stroke: String,
    #[serde(default = "default_port_fill")]
    pub port_fill: String,
    #[serde(default = "default_port_stroke")]
    pub port_stroke: String,
    #[serde(default = "default_port_text")]
    pub port_text: String,
    #[serde(default = "default_point_fill")]
    pub point_fill: String,
    #[serde(default = "default_point_text")]
    pub point_text: String,

    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default = "default_port_radius")]
    pub port_radius: f32,
    #[serde(default = "default_point_radius")]
    pub point_radius: f32,
}

fn default_background() -> String {
    LIGHT_BACKGROUND.to_string()
}
fn default_grid() -> String {
    LIGHT_GRID.to_string()
}
fn default_cart_fill() -> String {
    LIGHT_CART_FILL.to_string()
}
fn default_cart_stroke() -> String {
    LIGHT_CART_STROKE.to_string()
}
fn default_port_fill() -> String {
    LIGHT_PORT_FILL.to_string()
}
fn default_port_stroke() -> String {
    LIGHT_PORT_STROKE.to_string()
}
fn default_port_text() -> String {
    LIGHT_PORT_TEXT.to_string()
}
fn default_point_fill() -> String {
    LIGHT_POINT_FILL.to_string()
}
fn default_point_text() -> String {
    LIGHT_POINT_TEXT.to_string()
}
fn default_font_family() -> String {
    FONT_FAMILY.to_string()
}
fn default_font_size() -> f32 {
    FONT_SIZE
}
fn default_stroke_width() -> f32 {
    STROKE_WIDTH
}
fn default_port_radius() -> f32 {
    PORT_RADIUS
}
fn default_point_radius() -> f32 {
    POINT_RADIUS
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self::light()
    }
}

impl DiagramStyle {
    pub fn light() -> Self {
        DiagramStyle {
            background: default_background(),
            grid_color: default_grid(),
            cart_fill: default_cart_fill(),
            cart_stroke: default_cart_stroke(),
            port_fill: default_port_fill(),
            port_stroke: default_port_stroke(),
            port_text: default_port_text(),
            point_fill: default_point_fill(),
            point_text: default_point_text(),

            font_family: default_font_family(),
            font_size: FONT_SIZE,
            stroke_width: STROKE_WIDTH,
            port_radius: PORT_RADIUS,
            point_radius: POINT_RADIUS,
        }
    }

    pub fn from_builtin(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_STYLES
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| Error::UnknownStyle {
                name: name.to_string(),
                available: Self::list_builtins().join(", "),
            })?;
        Self::from_toml(content)
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_STYLES.iter().map(|(n, _)| *n).collect()
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::StyleParse(format!("TOML: {}", e)))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::StyleParse(format!("YAML: {}", e)))
    }

    /// Resolves `--style`: an existing file (TOML, then YAML) or the name of
    /// a built-in style.
    pub fn resolve(spec: &str) -> Result<Self> {
        let path = Path::new(spec);
        if !path.is_file() {
            return Self::from_builtin(spec);
        }

        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        match Self::from_toml(&content) {
            Ok(style) => Ok(style),
            Err(toml_err) => Self::from_yaml(&content).map_err(|_| toml_err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DiagramStyle;

    #[test]
    fn from_builtin_ignores_case_and_padding() {
        let lower = DiagramStyle::from_builtin("print").expect("lowercase");
        let upper = DiagramStyle::from_builtin(" PRINT ").expect("uppercase");
        assert_eq!(lower, upper);
        assert_eq!(lower.cart_stroke, "#000000");
    }

    #[test]
    fn light_builtin_matches_defaults() {
        assert_eq!(DiagramStyle::from_builtin("light").expect("light"), DiagramStyle::default());
    }

    #[test]
    fn unknown_builtin_lists_available() {
        let err = DiagramStyle::from_builtin("neon").unwrap_err().to_string();
        assert!(err.contains("light, print, dark"), "{err}");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let style = DiagramStyle::from_yaml("point_fill: \"#00ff00\"\nfont_size: 18\n").expect("yaml");
        assert_eq!(style.point_fill, "#00ff00");
        assert_eq!(style.font_size, 18.0);
        assert_eq!(style.cart_fill, DiagramStyle::default().cart_fill);
    }
}
