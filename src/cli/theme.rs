// src/cli/theme.rs — Terminal color palettes for dark and light mode

use crossterm::style::{Attribute, Color, ContentStyle};

use crate::infra::config::DisplayConfig;

/// Inline emphasis active at a point in a rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emphasis {
    pub strong: bool,
    pub italic: bool,
    pub heading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    dark: bool,
    styled: bool,
}

impl Theme {
    // ── Palette ─────────────────────────────────────────────────
    pub const DARK_TEXT: Color = Color::Rgb { r: 243, g: 244, b: 246 };
    pub const DARK_ACCENT: Color = Color::Rgb { r: 96, g: 165, b: 250 };
    pub const DARK_CODE: Color = Color::Rgb { r: 251, g: 191, b: 36 };
    pub const LIGHT_TEXT: Color = Color::Rgb { r: 17, g: 24, b: 39 };
    pub const LIGHT_ACCENT: Color = Color::Rgb { r: 29, g: 78, b: 216 };
    pub const LIGHT_CODE: Color = Color::Rgb { r: 180, g: 83, b: 9 };
    pub const GRAY: Color = Color::Rgb { r: 107, g: 114, b: 128 };

    pub fn new(dark: bool, styled: bool) -> Self {
        Self { dark, styled }
    }

    /// No escape codes at all.
    pub fn plain() -> Self {
        Self::new(false, false)
    }

    /// Theme for the current dark-mode preference. Styling needs both the
    /// `color` setting and a terminal on stdout.
    pub fn for_display(dark: bool, display: &DisplayConfig) -> Self {
        use std::io::IsTerminal;
        Self::new(dark, display.color && std::io::stdout().is_terminal())
    }

    fn text_color(&self) -> Color {
        if self.dark {
            Self::DARK_TEXT
        } else {
            Self::LIGHT_TEXT
        }
    }

    fn accent_color(&self) -> Color {
        if self.dark {
            Self::DARK_ACCENT
        } else {
            Self::LIGHT_ACCENT
        }
    }

    fn code_color(&self) -> Color {
        if self.dark {
            Self::DARK_CODE
        } else {
            Self::LIGHT_CODE
        }
    }

    fn paint(&self, text: &str, style: ContentStyle) -> String {
        if !self.styled {
            return text.to_string();
        }
        style.apply(text).to_string()
    }

    fn fg(color: Color) -> ContentStyle {
        let mut style = ContentStyle::new();
        style.foreground_color = Some(color);
        style
    }

    // ── Semantic styles ─────────────────────────────────────────

    /// Body text with the given inline emphasis.
    pub fn inline(&self, text: &str, emphasis: Emphasis) -> String {
        let color = if emphasis.heading {
            self.accent_color()
        } else {
            self.text_color()
        };
        let mut style = Self::fg(color);
        if emphasis.strong || emphasis.heading {
            style.attributes.set(Attribute::Bold);
        }
        if emphasis.italic {
            style.attributes.set(Attribute::Italic);
        }
        self.paint(text, style)
    }

    pub fn code(&self, text: &str) -> String {
        self.paint(text, Self::fg(self.code_color()))
    }

    pub fn bullet(&self, marker: &str) -> String {
        self.paint(marker, Self::fg(self.accent_color()))
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, Self::fg(Self::GRAY))
    }
}
