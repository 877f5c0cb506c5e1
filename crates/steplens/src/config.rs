//! Configuration file support for steplens
//!
//! Config file location: `~/.config/steplens/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [geometry]
//! font_size = 12.0
//! line_spacing = 1.25
//! pad_width = 50.0
//!
//! [ui]
//! gap_width = 12
//! mini_width = 16
//! mini_height = 6
//! editor_height = 8
//! show_guides = true
//! mouse = true
//!
//! [ui.theme]
//! accent = "cyan"
//! bridge = "#88C0D0"
//!
//! [backend]
//! command = ["tcldis-steps", "--json"]
//! initial_code = "~/sample.tcl"
//!
//! [log]
//! file = "/tmp/steplens.log"
//! level = "info"
//! ```

use ratatui::style::Color;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use steplens_core::Geometry;

/// Drawing constants for connector geometry (in pixels)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub font_size: f64,
    /// Line height as a multiple of the font size
    pub line_spacing: f64,
    /// A gap is five pad widths wide
    pub pad_width: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            line_spacing: 1.25,
            pad_width: 50.0,
        }
    }
}

impl GeometryConfig {
    pub fn geometry(&self) -> Geometry {
        let defaults = GeometryConfig::default();
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        Geometry::new(
            positive(self.pad_width, defaults.pad_width),
            positive(self.font_size, defaults.font_size),
            positive(self.line_spacing, defaults.line_spacing),
        )
    }
}

/// Color overrides; any value ratatui can parse ("cyan", "#88C0D0", "7")
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub text: Option<String>,
    pub text_muted: Option<String>,
    pub accent: Option<String>,
    pub selected: Option<String>,
    pub bridge: Option<String>,
    pub guide: Option<String>,
    pub annotation: Option<String>,
    pub error: Option<String>,
}

/// Resolved theme, ready for rendering
#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub selected: Color,
    pub bridge: Color,
    pub guide: Color,
    pub annotation: Color,
    pub error: Color,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        ThemeConfig::default().resolve()
    }
}

impl ThemeConfig {
    /// Resolve to concrete colors, falling back to ANSI defaults
    pub fn resolve(&self) -> ResolvedTheme {
        let resolve = |value: &Option<String>, fallback: Color| -> Color {
            value
                .as_deref()
                .and_then(|v| Color::from_str(v.trim()).ok())
                .unwrap_or(fallback)
        };
        let accent = resolve(&self.accent, Color::Cyan);
        ResolvedTheme {
            text: resolve(&self.text, Color::Reset),
            text_muted: resolve(&self.text_muted, Color::DarkGray),
            accent,
            selected: resolve(&self.selected, Color::Yellow),
            bridge: resolve(&self.bridge, accent),
            guide: resolve(&self.guide, Color::DarkGray),
            annotation: resolve(&self.annotation, Color::Magenta),
            error: resolve(&self.error, Color::Red),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Terminal columns per gap between panels
    pub gap_width: u16,
    /// Terminal columns per ministep in the overview strip
    pub mini_width: u16,
    /// Rows of the overview strip
    pub mini_height: u16,
    /// Rows of the source editor
    pub editor_height: u16,
    /// Draw the horizontal guide lines next to the panels
    pub show_guides: bool,
    /// Capture the mouse for panel scrolling
    pub mouse: bool,
    pub theme: ThemeConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            gap_width: 12,
            mini_width: 16,
            mini_height: 6,
            editor_height: 8,
            show_guides: true,
            mouse: true,
            theme: ThemeConfig::default(),
        }
    }
}

/// Decompiler backend configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Program and arguments; source on stdin, JSON step set on stdout
    pub command: Vec<String>,
    /// File to pre-populate the editor with
    pub initial_code: Option<PathBuf>,
}

/// Log configuration. Nothing is logged unless `file` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub geometry: GeometryConfig,
    pub ui: UiConfig,
    pub backend: BackendConfig,
    pub log: LogConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("steplens").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("steplens").join("config.toml"));
        }

        // Platform-specific config dir (~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("steplens").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from XDG config path
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| {
                Self::parse(&content)
                    .map_err(|e| {
                        eprintln!("Warning: Failed to parse config: {}", e);
                        e
                    })
                    .ok()
            })
            .unwrap_or_default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
