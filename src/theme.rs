use ratatui::style::Color;

pub struct Theme {
    pub name: &'static str,
    /// Played part of the scrub bar, play/pause glyph
    pub accent: Color,
    /// Key badges in the help line
    pub secondary: Color,
    pub text: Color,
    pub dimmed: Color,
    /// Backdrop when there is no artwork to blur
    pub surface: Color,
}

pub const THEMES: &[Theme] = &[
    Theme {
        name: "Default",
        accent: Color::White,
        secondary: Color::Gray,
        text: Color::White,
        dimmed: Color::DarkGray,
        surface: Color::Rgb(28, 28, 30),
    },
    Theme {
        name: "Forest",
        accent: Color::Rgb(167, 192, 128),
        secondary: Color::Rgb(219, 188, 127),
        text: Color::Rgb(211, 198, 170),
        dimmed: Color::Rgb(122, 132, 120),
        surface: Color::Rgb(39, 46, 34),
    },
    Theme {
        name: "Nord",
        accent: Color::Rgb(136, 192, 208),
        secondary: Color::Rgb(235, 203, 139),
        text: Color::Rgb(236, 239, 244),
        dimmed: Color::Rgb(97, 110, 136),
        surface: Color::Rgb(46, 52, 64),
    },
    Theme {
        name: "Rose Pine",
        accent: Color::Rgb(235, 188, 186),
        secondary: Color::Rgb(246, 193, 119),
        text: Color::Rgb(224, 222, 244),
        dimmed: Color::Rgb(110, 106, 134),
        surface: Color::Rgb(25, 23, 36),
    },
    Theme {
        name: "Solarized",
        accent: Color::Rgb(38, 139, 210),
        secondary: Color::Rgb(181, 137, 0),
        text: Color::Rgb(238, 232, 213),
        dimmed: Color::Rgb(88, 110, 117),
        surface: Color::Rgb(0, 43, 54),
    },
];

/// Index of the theme called `name`, ignoring case. Unknown names get the
/// first theme.
pub fn theme_index(name: &str) -> usize {
    THEMES
        .iter()
        .position(|t| t.name.eq_ignore_ascii_case(name.trim()))
        .unwrap_or(0)
}

pub fn next_theme(index: usize) -> usize {
    (index + 1) % THEMES.len()
}
