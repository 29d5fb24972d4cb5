//! Styles, palettes, and the closed set of named color schemes.

use std::fmt;

/// Foreground color. Mirrors the terminal model we actually emit; kept as our
/// own type so chart code does not depend on crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Reset,
    Ansi(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    pub(crate) fn to_crossterm(self) -> crossterm::style::Color {
        match self {
            Color::Reset => crossterm::style::Color::Reset,
            Color::Ansi(v) => crossterm::style::Color::AnsiValue(v),
            Color::Rgb(r, g, b) => crossterm::style::Color::Rgb { r, g, b },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bold: bool,
    pub dim: bool,
}

impl Style {
    pub const fn fg(color: Color) -> Self {
        Self {
            fg: color,
            bold: false,
            dim: false,
        }
    }

    pub const fn bold(color: Color) -> Self {
        Self {
            fg: color,
            bold: true,
            dim: false,
        }
    }

    pub const fn dim() -> Self {
        Self {
            fg: Color::Reset,
            bold: false,
            dim: true,
        }
    }
}

/// Closed set of scheme names accepted by the config. Unknown names fall back
/// to `Default` at parse time, never at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Default,
    Vivid,
    Pastel,
    Mono,
}

impl ColorScheme {
    pub const NAMES: [&'static str; 4] = ["default", "vivid", "pastel", "mono"];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::Default),
            "vivid" => Some(Self::Vivid),
            "pastel" => Some(Self::Pastel),
            "mono" => Some(Self::Mono),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Vivid => "vivid",
            Self::Pastel => "pastel",
            Self::Mono => "mono",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Self::Default => Palette::new(&DEFAULT_COLORS),
            Self::Vivid => Palette::new(&VIVID_COLORS),
            Self::Pastel => Palette::new(&PASTEL_COLORS),
            Self::Mono => Palette::new(&MONO_COLORS),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DEFAULT_COLORS: [Color; 8] = [
    Color::Ansi(81),  // sky
    Color::Ansi(214), // amber
    Color::Ansi(114), // green
    Color::Ansi(176), // orchid
    Color::Ansi(203), // coral
    Color::Ansi(123), // cyan
    Color::Ansi(229), // cream
    Color::Ansi(147), // periwinkle
];

const VIVID_COLORS: [Color; 8] = [
    Color::Ansi(51),
    Color::Ansi(208),
    Color::Ansi(46),
    Color::Ansi(201),
    Color::Ansi(196),
    Color::Ansi(226),
    Color::Ansi(93),
    Color::Ansi(39),
];

const PASTEL_COLORS: [Color; 8] = [
    Color::Ansi(152),
    Color::Ansi(223),
    Color::Ansi(151),
    Color::Ansi(183),
    Color::Ansi(217),
    Color::Ansi(159),
    Color::Ansi(230),
    Color::Ansi(189),
];

const MONO_COLORS: [Color; 8] = [
    Color::Ansi(255),
    Color::Ansi(250),
    Color::Ansi(245),
    Color::Ansi(240),
    Color::Ansi(252),
    Color::Ansi(247),
    Color::Ansi(242),
    Color::Ansi(237),
];

/// Cyclic color source. Index lookups wrap, so any hash or counter can pick a
/// stable color.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    colors: &'static [Color],
}

impl Palette {
    pub const fn new(colors: &'static [Color]) -> Self {
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// Stable color for a string key: identical keys always resolve to the
    /// same palette slot.
    pub fn color_for_key(&self, key: &str) -> Color {
        self.color(key_hash(key) as usize)
    }
}

/// FNV-1a, small and stable across runs of the same binary.
fn key_hash(key: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_scheme_name_is_rejected() {
        assert_eq!(ColorScheme::parse("default"), Some(ColorScheme::Default));
        assert_eq!(ColorScheme::parse("neon"), None);
    }

    #[test]
    fn palette_wraps_and_is_stable_per_key() {
        let p = ColorScheme::Default.palette();
        assert_eq!(p.color(0), p.color(p.len()));
        assert_eq!(p.color_for_key("train/loss"), p.color_for_key("train/loss"));
    }

    #[test]
    fn scheme_names_round_trip() {
        for name in ColorScheme::NAMES {
            let scheme = ColorScheme::parse(name).unwrap();
            assert_eq!(scheme.as_str(), name);
        }
    }
}
