//! Theme color definitions for the dashboard

use crate::config::Theme;
use ratatui::style::Color;

/// Color palette for the dashboard
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Main background
    pub bg: Color,
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text and borders
    pub dim: Color,
    /// Headings and counters
    pub accent: Color,
    /// Current WPM and saved state
    pub good: Color,
    /// Unsaved changes
    pub pending: Color,
    /// History bars
    pub bar: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(22, 22, 30),
            fg: Color::Rgb(200, 200, 210),
            dim: Color::Rgb(90, 90, 110),
            accent: Color::Rgb(80, 200, 220),
            good: Color::Rgb(80, 200, 120),
            pending: Color::Rgb(240, 180, 80),
            bar: Color::Rgb(120, 140, 230),
        }
    }

    /// High contrast for bright terminals
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(245, 245, 248),
            fg: Color::Rgb(30, 30, 40),
            dim: Color::Rgb(130, 130, 150),
            accent: Color::Rgb(0, 130, 160),
            good: Color::Rgb(30, 150, 70),
            pending: Color::Rgb(180, 120, 0),
            bar: Color::Rgb(60, 80, 190),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_theme_selects_correct_palette() {
        let dark = ThemeColors::from_theme(Theme::Dark);
        let light = ThemeColors::from_theme(Theme::Light);
        assert_eq!(dark.bg, ThemeColors::dark().bg);
        assert_ne!(dark.bg, light.bg);
    }
}
