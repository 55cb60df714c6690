//! Card configuration module.
//!
//! Handles loading, validating, and merging `cards.toml`. Every layout
//! constant of the printed card lives here: canvas size, photo rectangle,
//! text anchors, fonts, colors, and the fallback values used for blank
//! fields. Stock defaults match the shipped front/back templates; a
//! `cards.toml` next to the workspace overrides only what it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! templates_dir = "templates"
//! front_template = "front.png"  # inside templates_dir
//! back_template = "back.png"    # inside templates_dir
//! photos_dir = "photos"
//! output_dir = "cards"
//! batch_filename = "all_cards.pdf"
//! # fonts_dir = "fonts"         # extra .ttf/.otf files for card text
//!
//! [card]
//! width = 1748                  # canvas and PDF page size, pixels = points
//! height = 1240
//!
//! [front]
//! photo = { x = 58, y = 40, width = 220, height = 280 }
//! name = [320, 880]             # [x, baseline y]
//! role = [320, 1130]
//!
//! [front.text]
//! font_family = "Arial"
//! size = 50
//! bold = true
//! color = "#000000"
//!
//! [front.placeholder]
//! fill = "#CCCCCC"
//! label = "No Photo"
//! label_position = [90, 180]
//!
//! [back]
//! tax_id = [1099, 200]
//! birth_date = [250, 200]
//! baptism_date = [250, 425]
//! congregation = [1099, 425]
//! valid_until = [250, 650]
//!
//! [defaults]
//! role = "Member"
//! valid_until = "31/12/2025"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the workspace root.
pub const CONFIG_FILENAME: &str = "cards.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Card configuration loaded from `cards.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    /// Where templates, photos, fonts, and output live (workspace-relative).
    pub paths: PathsConfig,
    /// Canvas size in pixels.
    pub card: CardSize,
    /// Front side layout.
    pub front: FrontLayout,
    /// Back side layout.
    pub back: BackLayout,
    /// Values substituted for blank member fields.
    pub defaults: DefaultsConfig,
}

impl CardConfig {
    /// Validate geometry, colors, and file names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let CardSize { width, height } = self.card;
        if width == 0 || height == 0 {
            return Err(ConfigError::Validation(
                "card.width and card.height must be non-zero".into(),
            ));
        }

        let photo = self.front.photo;
        if photo.width == 0 || photo.height == 0 {
            return Err(ConfigError::Validation(
                "front.photo width and height must be non-zero".into(),
            ));
        }
        if photo.x.saturating_add(photo.width) > width
            || photo.y.saturating_add(photo.height) > height
        {
            return Err(ConfigError::Validation(format!(
                "front.photo ({}x{} at {},{}) does not fit a {width}x{height} card",
                photo.width, photo.height, photo.x, photo.y
            )));
        }

        let anchors = [
            ("front.name", self.front.name),
            ("front.role", self.front.role),
            ("front.placeholder.label_position", self.front.placeholder.label_position),
            ("back.tax_id", self.back.tax_id),
            ("back.birth_date", self.back.birth_date),
            ("back.baptism_date", self.back.baptism_date),
            ("back.congregation", self.back.congregation),
            ("back.valid_until", self.back.valid_until),
        ];
        for (key, [x, y]) in anchors {
            if x >= width || y >= height {
                return Err(ConfigError::Validation(format!(
                    "{key} [{x}, {y}] lies outside the {width}x{height} card"
                )));
            }
        }

        for (key, style) in [
            ("front.text", &self.front.text),
            ("front.placeholder.text", &self.front.placeholder.text),
            ("back.text", &self.back.text),
        ] {
            if style.size == 0 {
                return Err(ConfigError::Validation(format!(
                    "{key}.size must be non-zero"
                )));
            }
            parse_hex_color(&style.color)
                .map_err(|e| ConfigError::Validation(format!("{key}.color: {e}")))?;
        }
        parse_hex_color(&self.front.placeholder.fill)
            .map_err(|e| ConfigError::Validation(format!("front.placeholder.fill: {e}")))?;

        let batch = &self.paths.batch_filename;
        if batch.is_empty() || batch.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "paths.batch_filename must be a plain file name".into(),
            ));
        }
        Ok(())
    }
}

/// Workspace-relative locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub templates_dir: String,
    /// Front template file name inside `templates_dir`.
    pub front_template: String,
    /// Back template file name inside `templates_dir`.
    pub back_template: String,
    pub photos_dir: String,
    /// Individual cards and the batch document are written here.
    pub output_dir: String,
    pub batch_filename: String,
    /// Optional directory of `.ttf`/`.otf`/`.ttc` files added to the font database.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts_dir: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            templates_dir: "templates".to_string(),
            front_template: "front.png".to_string(),
            back_template: "back.png".to_string(),
            photos_dir: "photos".to_string(),
            output_dir: "cards".to_string(),
            batch_filename: "all_cards.pdf".to_string(),
            fonts_dir: None,
        }
    }
}

/// Canvas size. Also the PDF page size, one pixel per point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CardSize {
    fn default() -> Self {
        Self {
            width: 1748,
            height: 1240,
        }
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Text anchor: `[x, y]` where `y` is the baseline.
pub type Anchor = [u32; 2];

/// Font and fill for a block of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextStyle {
    /// CSS-style family list, e.g. `"Arial"` or `"DejaVu Sans, sans-serif"`.
    pub font_family: String,
    /// Font size in pixels.
    pub size: u32,
    pub bold: bool,
    /// `#RRGGBB`.
    pub color: String,
}

impl TextStyle {
    fn regular(size: u32, color: &str) -> Self {
        Self {
            font_family: "Arial".to_string(),
            size,
            bold: false,
            color: color.to_string(),
        }
    }

    fn bold(size: u32, color: &str) -> Self {
        Self {
            bold: true,
            ..Self::regular(size, color)
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::regular(40, "#000000")
    }
}

/// Front side: photo, name, role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrontLayout {
    pub photo: Rect,
    pub name: Anchor,
    pub role: Anchor,
    pub text: TextStyle,
    pub placeholder: PlaceholderStyle,
}

impl Default for FrontLayout {
    fn default() -> Self {
        Self {
            photo: Rect {
                x: 58,
                y: 40,
                width: 220,
                height: 280,
            },
            name: [320, 880],
            role: [320, 1130],
            text: TextStyle::bold(50, "#000000"),
            placeholder: PlaceholderStyle::default(),
        }
    }
}

/// What fills the photo rectangle when the photo cannot be loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderStyle {
    /// `#RRGGBB` fill of the photo rectangle.
    pub fill: String,
    pub label: String,
    pub label_position: Anchor,
    pub text: TextStyle,
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            fill: "#CCCCCC".to_string(),
            label: "No Photo".to_string(),
            label_position: [90, 180],
            text: TextStyle::regular(20, "#333333"),
        }
    }
}

/// Back side: one anchor per field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackLayout {
    pub tax_id: Anchor,
    pub birth_date: Anchor,
    pub baptism_date: Anchor,
    pub congregation: Anchor,
    pub valid_until: Anchor,
    pub text: TextStyle,
}

impl Default for BackLayout {
    fn default() -> Self {
        Self {
            tax_id: [1099, 200],
            birth_date: [250, 200],
            baptism_date: [250, 425],
            congregation: [1099, 425],
            valid_until: [250, 650],
            text: TextStyle::regular(40, "#000000"),
        }
    }
}

/// Substitutes for blank member fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsConfig {
    pub role: String,
    /// Printed when the validity date is absent or not a date.
    pub valid_until: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            role: "Member".to_string(),
            valid_until: "31/12/2025".to_string(),
        }
    }
}

/// Parse `#RRGGBB` (or `#RGB`) into RGB bytes.
pub fn parse_hex_color(s: &str) -> Result<[u8; 3], String> {
    let hex = s
        .strip_prefix('#')
        .ok_or_else(|| format!("'{s}' must start with '#'"))?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("'{s}' is not hex"));
    }
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return Err(format!("'{s}' must be #RGB or #RRGGBB")),
    };
    let byte = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|e| format!("'{s}': {e}"))
    };
    Ok([byte(0)?, byte(2)?, byte(4)?])
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CardConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, deserialize, validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CardConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CardConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a specific config file on top of the stock defaults.
pub fn load_config_file(path: &Path) -> Result<CardConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `cards.toml` from the workspace root, or stock defaults if absent.
pub fn load_config(root: &Path) -> Result<CardConfig, ConfigError> {
    let path = root.join(CONFIG_FILENAME);
    if !path.exists() {
        return resolve_config(None);
    }
    load_config_file(&path)
}

/// Returns a fully-commented stock `cards.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Member Cards Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults and match the stock templates.
#
# Coordinates are canvas pixels from the top-left corner. Text anchors are
# [x, y] with y on the text baseline. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Workspace layout (relative to --root)
# ---------------------------------------------------------------------------
[paths]
templates_dir = "templates"
front_template = "front.png"
back_template = "back.png"
photos_dir = "photos"
output_dir = "cards"
batch_filename = "all_cards.pdf"
# Extra fonts (.ttf, .otf, .ttc) for card text, on top of system fonts.
# fonts_dir = "fonts"

# ---------------------------------------------------------------------------
# Canvas size. PDF pages use the same numbers in points.
# ---------------------------------------------------------------------------
[card]
width = 1748
height = 1240

# ---------------------------------------------------------------------------
# Front side
# ---------------------------------------------------------------------------
[front]
# The photo is stretched to exactly this rectangle.
photo = { x = 58, y = 40, width = 220, height = 280 }
name = [320, 880]
role = [320, 1130]

[front.text]
font_family = "Arial"
size = 50
bold = true
color = "#000000"

# Drawn instead of the photo when it is missing or unreadable.
[front.placeholder]
fill = "#CCCCCC"
label = "No Photo"
label_position = [90, 180]

[front.placeholder.text]
font_family = "Arial"
size = 20
bold = false
color = "#333333"

# ---------------------------------------------------------------------------
# Back side
# ---------------------------------------------------------------------------
[back]
tax_id = [1099, 200]
birth_date = [250, 200]
baptism_date = [250, 425]
congregation = [1099, 425]
valid_until = [250, 650]

[back.text]
font_family = "Arial"
size = 40
bold = false
color = "#000000"

# ---------------------------------------------------------------------------
# Substitutes for blank fields
# ---------------------------------------------------------------------------
[defaults]
role = "Member"
valid_until = "31/12/2025"
"##
}
