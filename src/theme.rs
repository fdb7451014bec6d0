//! Display theme.
//!
//! [`ThemeProvider`] is the one owner of the active theme. It is created at
//! startup from the config, toggled by the user and shut down on exit, and
//! render functions receive its [`Palette`] as an argument.

use ratatui::style::Color;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::{Rgb, ThemeConfig};

/// Light or dark display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

/// Colors for one theme mode.
///
/// Config files may set any subset of fields; see [`dark_palette`] and
/// [`light_palette`] for how the rest are filled in.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Palette {
    /// Border gradient start
    pub accent_start: Rgb,
    /// Border gradient end
    pub accent_end: Rgb,
    /// Body text
    pub text: Rgb,
    /// Secondary text (periods, hints)
    pub muted: Rgb,
    /// Title and section headings
    pub heading: Rgb,
    /// Subsection headings
    pub subheading: Rgb,
    /// Bold spans
    pub emphasis: Rgb,
    /// List bullets
    pub bullet: Rgb,
    /// Main background
    pub bg_primary: Rgb,
    /// Input and tab bar background
    pub bg_secondary: Rgb,
    /// Selected tab / project background
    pub highlight_bg: Rgb,
    /// Status: idle or completed
    pub status_ready: Rgb,
    /// Status: requesting or streaming
    pub status_streaming: Rgb,
    /// Status and banner: error
    pub status_error: Rgb,
}

impl Palette {
    pub fn dark() -> Self {
        Self {
            accent_start: [147, 51, 234], // Purple
            accent_end: [59, 130, 246],   // Blue
            text: [220, 220, 230],
            muted: [140, 140, 160],
            heading: [0, 255, 255], // Cyan
            subheading: [255, 140, 0],
            emphasis: [255, 0, 128], // Hot pink
            bullet: [16, 185, 129],
            bg_primary: [20, 20, 25],
            bg_secondary: [30, 30, 35],
            highlight_bg: [60, 60, 80],
            status_ready: [100, 255, 100],
            status_streaming: [100, 200, 255],
            status_error: [255, 100, 100],
        }
    }

    pub fn light() -> Self {
        Self {
            accent_start: [99, 102, 241],
            accent_end: [14, 165, 233],
            text: [30, 30, 40],
            muted: [100, 100, 115],
            heading: [37, 99, 235],
            subheading: [194, 65, 12],
            emphasis: [190, 24, 93],
            bullet: [5, 150, 105],
            bg_primary: [250, 250, 248],
            bg_secondary: [235, 235, 240],
            highlight_bg: [210, 215, 235],
            status_ready: [22, 163, 74],
            status_streaming: [37, 99, 235],
            status_error: [220, 38, 38],
        }
    }

    /// Convert an RGB array to a ratatui Color.
    pub fn to_color(rgb: &Rgb) -> Color {
        Color::Rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Convert an RGB array to a tuple for gradient math.
    pub fn to_tuple(rgb: &Rgb) -> (u8, u8, u8) {
        (rgb[0], rgb[1], rgb[2])
    }

    pub fn accent_gradient(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        (
            Self::to_tuple(&self.accent_start),
            Self::to_tuple(&self.accent_end),
        )
    }

    pub fn text(&self) -> Color {
        Self::to_color(&self.text)
    }

    pub fn muted(&self) -> Color {
        Self::to_color(&self.muted)
    }

    pub fn heading(&self) -> Color {
        Self::to_color(&self.heading)
    }

    pub fn subheading(&self) -> Color {
        Self::to_color(&self.subheading)
    }

    pub fn emphasis(&self) -> Color {
        Self::to_color(&self.emphasis)
    }

    pub fn bullet(&self) -> Color {
        Self::to_color(&self.bullet)
    }

    pub fn bg_primary(&self) -> Color {
        Self::to_color(&self.bg_primary)
    }

    pub fn bg_secondary(&self) -> Color {
        Self::to_color(&self.bg_secondary)
    }

    pub fn highlight_bg(&self) -> Color {
        Self::to_color(&self.highlight_bg)
    }

    pub fn status_ready(&self) -> Color {
        Self::to_color(&self.status_ready)
    }

    pub fn status_streaming(&self) -> Color {
        Self::to_color(&self.status_streaming)
    }

    pub fn status_error(&self) -> Color {
        Self::to_color(&self.status_error)
    }
}

/// A palette table as written in a config file, every field optional.
#[derive(Debug, Default, Deserialize)]
struct PaletteOverrides {
    accent_start: Option<Rgb>,
    accent_end: Option<Rgb>,
    text: Option<Rgb>,
    muted: Option<Rgb>,
    heading: Option<Rgb>,
    subheading: Option<Rgb>,
    emphasis: Option<Rgb>,
    bullet: Option<Rgb>,
    bg_primary: Option<Rgb>,
    bg_secondary: Option<Rgb>,
    highlight_bg: Option<Rgb>,
    status_ready: Option<Rgb>,
    status_streaming: Option<Rgb>,
    status_error: Option<Rgb>,
}

impl PaletteOverrides {
    /// Fill unset fields from `base`.
    fn over(self, base: Palette) -> Palette {
        Palette {
            accent_start: self.accent_start.unwrap_or(base.accent_start),
            accent_end: self.accent_end.unwrap_or(base.accent_end),
            text: self.text.unwrap_or(base.text),
            muted: self.muted.unwrap_or(base.muted),
            heading: self.heading.unwrap_or(base.heading),
            subheading: self.subheading.unwrap_or(base.subheading),
            emphasis: self.emphasis.unwrap_or(base.emphasis),
            bullet: self.bullet.unwrap_or(base.bullet),
            bg_primary: self.bg_primary.unwrap_or(base.bg_primary),
            bg_secondary: self.bg_secondary.unwrap_or(base.bg_secondary),
            highlight_bg: self.highlight_bg.unwrap_or(base.highlight_bg),
            status_ready: self.status_ready.unwrap_or(base.status_ready),
            status_streaming: self.status_streaming.unwrap_or(base.status_streaming),
            status_error: self.status_error.unwrap_or(base.status_error),
        }
    }
}

/// Deserialize a partial `[theme.dark]` table on top of [`Palette::dark`].
pub fn dark_palette<'de, D>(deserializer: D) -> Result<Palette, D::Error>
where
    D: Deserializer<'de>,
{
    PaletteOverrides::deserialize(deserializer).map(|o| o.over(Palette::dark()))
}

/// Deserialize a partial `[theme.light]` table on top of [`Palette::light`].
pub fn light_palette<'de, D>(deserializer: D) -> Result<Palette, D::Error>
where
    D: Deserializer<'de>,
{
    PaletteOverrides::deserialize(deserializer).map(|o| o.over(Palette::light()))
}

/// Owner of the active theme for the lifetime of the app.
#[derive(Debug, Clone)]
pub struct ThemeProvider {
    mode: ThemeMode,
    initial_mode: ThemeMode,
    dark: Palette,
    light: Palette,
}

impl ThemeProvider {
    /// Create the provider from the theme config.
    pub fn new(config: &ThemeConfig) -> Self {
        Self {
            mode: config.mode,
            initial_mode: config.mode,
            dark: config.dark.clone(),
            light: config.light.clone(),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Palette for the active mode.
    pub fn palette(&self) -> &Palette {
        match self.mode {
            ThemeMode::Dark => &self.dark,
            ThemeMode::Light => &self.light,
        }
    }

    /// Switch between dark and light; returns the new mode.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        tracing::debug!(mode = self.mode.label(), "theme toggled");
        self.mode
    }

    /// Whether the mode differs from the one loaded at startup.
    pub fn is_dirty(&self) -> bool {
        self.mode != self.initial_mode
    }

    /// Tear down the provider, writing the chosen mode back into `config`.
    ///
    /// Returns true if the config changed and should be saved.
    pub fn shutdown(self, config: &mut ThemeConfig) -> bool {
        let dirty = self.is_dirty();
        config.mode = self.mode;
        dirty
    }
}
