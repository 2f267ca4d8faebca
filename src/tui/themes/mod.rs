//! Theming for the console
//!
//! A theme is a flat set of semantic colors the components render with.
//! Two presets ship with the console; `Theme::by_name` falls back to the
//! dark preset for unknown names.

use ratatui::style::Color;

/// Complete visual style configuration.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub is_dark: bool,

    // Brand colors
    pub primary: Color,
    pub accent: Color,

    // Backgrounds
    pub bg_base: Color,
    pub bg_subtle: Color,
    pub bg_overlay: Color,

    // Foregrounds
    pub fg_base: Color,
    pub fg_muted: Color,
    pub fg_selected: Color,

    // Borders
    pub border: Color,
    pub border_focus: Color,

    // Status colors
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Theme {
    /// Default dark preset.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            is_dark: true,
            primary: Color::Rgb(130, 130, 255),
            accent: Color::Rgb(255, 200, 120),
            bg_base: Color::Rgb(23, 23, 23),
            bg_subtle: Color::Rgb(38, 38, 38),
            bg_overlay: Color::Rgb(15, 15, 15),
            fg_base: Color::Rgb(229, 229, 229),
            fg_muted: Color::Rgb(156, 156, 156),
            fg_selected: Color::White,
            border: Color::Rgb(82, 82, 82),
            border_focus: Color::Rgb(130, 130, 255),
            success: Color::Rgb(34, 197, 94),
            error: Color::Rgb(239, 68, 68),
            warning: Color::Rgb(245, 158, 11),
            info: Color::Rgb(59, 130, 246),
        }
    }

    /// Light preset for bright terminals.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            is_dark: false,
            primary: Color::Rgb(79, 70, 229),
            accent: Color::Rgb(180, 83, 9),
            bg_base: Color::Rgb(250, 250, 250),
            bg_subtle: Color::Rgb(229, 229, 229),
            bg_overlay: Color::Rgb(209, 209, 209),
            fg_base: Color::Rgb(23, 23, 23),
            fg_muted: Color::Rgb(82, 82, 82),
            fg_selected: Color::Black,
            border: Color::Rgb(156, 156, 156),
            border_focus: Color::Rgb(79, 70, 229),
            success: Color::Rgb(22, 163, 74),
            error: Color::Rgb(220, 38, 38),
            warning: Color::Rgb(217, 119, 6),
            info: Color::Rgb(37, 99, 235),
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_name_falls_back_to_dark() {
        assert!(Theme::by_name("dark").is_dark);
        assert!(!Theme::by_name("light").is_dark);
        assert!(Theme::by_name("no-such-theme").is_dark);
    }
}
