//! Configuration persistence for pagemark settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::RED
    }
}

impl ShapeColor {
    pub const RED: Self = Self::rgb(0.9, 0.1, 0.1);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const YELLOW: Self = Self::rgb(1.0, 0.9, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS hex color (`#rgb` or `#rrggbb`, leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        match digits.len() {
            3 => {
                let expand = |i: usize| {
                    let c = &digits[i..=i];
                    channel(&format!("{c}{c}"))
                };
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            255,
        ]
    }
}

/// Which segment shape the line tool draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTool {
    Line,
    #[default]
    Arrow,
}

/// Which box shape the shape tool draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeTool {
    Circle,
    #[default]
    Rect,
}

/// Values of the tool controls, snapshotted into every new annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolParameters {
    pub line_tool: LineTool,
    pub line_color: ShapeColor,
    pub line_width: f32,
    pub shape_tool: ShapeTool,
    pub shape_color: ShapeColor,
    pub shape_width: f32,
    pub text_font: String,
    pub text_color: ShapeColor,
    pub text_size: f32,
    pub highlight_color: ShapeColor,
    /// Fill alpha for highlights (0.0-1.0)
    pub highlight_opacity: f32,
    /// Blur radius in surface pixels
    pub blur_intensity: f32,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            line_tool: LineTool::Arrow,
            line_color: ShapeColor::RED,
            line_width: 3.0,
            shape_tool: ShapeTool::Rect,
            shape_color: ShapeColor::RED,
            shape_width: 3.0,
            text_font: "sans-serif".to_string(),
            text_color: ShapeColor::BLACK,
            text_size: 20.0,
            highlight_color: ShapeColor::YELLOW,
            highlight_opacity: 0.4,
            blur_intensity: 8.0,
        }
    }
}

/// Save location for exported images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

impl SaveLocation {
    /// Resolve the directory, falling back to a folder under the home directory
    pub fn dir(self) -> Option<PathBuf> {
        match self {
            SaveLocation::Pictures => {
                dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            }
            SaveLocation::Documents => {
                dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            }
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Initial values of the tool controls
    pub tools: ToolParameters,
    /// Where to save exported images
    pub save_location: SaveLocation,
}

impl EditorConfig {
    /// Directory name under the platform config dir
    pub const ID: &'static str = "pagemark";

    fn file_path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            log::warn!("Could not resolve config directory, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:#}", err);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            log::error!("Could not resolve config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:#}", err);
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}
