//! Editor settings

use std::path::{Path, PathBuf};

use kurbo::Point;
use serde::{Deserialize, Serialize};
use shared::{Color, ZoneKind};

use crate::geometry::snap_to;

/// Table dimensions and grid quantization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpec {
    /// Pixels per inch; drawn points snap to this step
    pub grid_unit: f64,
    /// Table width in inches
    pub width_units: u32,
    /// Table height in inches
    pub height_units: u32,
    /// A major grid line every N inches
    pub major_every: u32,
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self {
            grid_unit: 20.0,
            width_units: 60,
            height_units: 44,
            major_every: 4,
        }
    }
}

impl CanvasSpec {
    pub fn width(&self) -> f64 {
        self.width_units as f64 * self.grid_unit
    }

    pub fn height(&self) -> f64 {
        self.height_units as f64 * self.grid_unit
    }

    pub fn center(&self) -> Point {
        Point::new(self.width() / 2.0, self.height() / 2.0)
    }

    pub fn snap(&self, p: Point) -> Point {
        snap_to(p, self.grid_unit)
    }
}

/// How a drawn polygon gets closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ClosurePolicy {
    /// Close when a click lands within one grid unit of the first point
    ExplicitClose,
    /// Close as soon as the buffer holds `vertices` points
    AutoClose { vertices: usize },
}

impl Default for ClosurePolicy {
    fn default() -> Self {
        ClosurePolicy::AutoClose { vertices: 3 }
    }
}

impl ClosurePolicy {
    /// Auto-close policy, clamped to at least 3 vertices
    pub fn auto_close(vertices: usize) -> Self {
        ClosurePolicy::AutoClose {
            vertices: vertices.max(3),
        }
    }

    /// Auto-close target, never below the 3-vertex minimum
    pub fn auto_close_at(&self) -> Option<usize> {
        match self {
            ClosurePolicy::ExplicitClose => None,
            ClosurePolicy::AutoClose { vertices } => Some((*vertices).max(3)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrawingSettings {
    pub closure: ClosurePolicy,
}

/// Fill color and opacity for one zone kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneStyle {
    pub color: Color,
    pub opacity: f64,
}

/// Default zone colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub attacker: ZoneStyle,
    pub defender: ZoneStyle,
    /// Starting point of the custom color dialog
    pub custom: ZoneStyle,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            attacker: ZoneStyle { color: Color::RED, opacity: 0.3 },
            defender: ZoneStyle { color: Color::GREEN, opacity: 0.3 },
            custom: ZoneStyle { color: Color::BLUE, opacity: 0.3 },
        }
    }
}

impl Palette {
    pub fn style_for(&self, kind: ZoneKind) -> ZoneStyle {
        match kind {
            ZoneKind::Attacker => self.attacker,
            ZoneKind::Defender => self.defender,
            ZoneKind::Custom => self.custom,
        }
    }
}

/// Selection handle shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CornerStyle {
    #[default]
    Circle,
    Rect,
}

/// Per-session object chrome handed to the factories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    pub corner_style: CornerStyle,
    pub corner_color: Color,
    pub corner_size: f32,
    pub transparent_corners: bool,
    pub border_color: Color,
    pub measurement_color: Color,
    pub label_color: Color,
    pub label_font_size: f64,
    pub draft_color: Color,
    pub draft_marker_radius: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            corner_style: CornerStyle::Circle,
            corner_color: Color::BLUE,
            corner_size: 8.0,
            transparent_corners: false,
            border_color: Color::rgb(0, 120, 215),
            measurement_color: Color::BLUE,
            label_color: Color::BLACK,
            label_font_size: 16.0,
            draft_color: Color::RED,
            draft_marker_radius: 5.0,
        }
    }
}

/// View toggles that affect rendering and export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSettings {
    pub show_grid: bool,
    pub show_center_marker: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_center_marker: false,
        }
    }
}

/// Where icon images are looked up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSettings {
    pub icon_dir: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            icon_dir: PathBuf::from("assets"),
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub canvas: CanvasSpec,
    #[serde(default)]
    pub drawing: DrawingSettings,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub assets: AssetSettings,
}

impl EditorSettings {
    fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "mission-map", "mission-map")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the user config dir, or defaults
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Save settings to the user config dir
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    /// Load settings from a file; a missing or broken file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Cannot create settings dir {}: {e}", parent.display());
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    tracing::warn!("Failed to write settings {}: {e}", path.display());
                }
            }
            Err(e) => tracing::warn!("Failed to serialize settings: {e}"),
        }
    }
}
