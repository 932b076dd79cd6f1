use ratatui::style::Color;
use term_color_support::ColorSupport;

use crate::xth_game::MAX_DISKS;

/// Rainbow palette for disks 1..=7: ((R, G, B), ANSI_256_Index, basic 16-color fallback)
const DISK_PALETTE: [((u8, u8, u8), u8, Color); MAX_DISKS] = [
    ((231, 72, 86), 203, Color::Red),          // red
    ((247, 140, 40), 208, Color::LightRed),    // orange
    ((249, 226, 80), 221, Color::Yellow),      // yellow
    ((22, 198, 12), 40, Color::Green),         // green
    ((59, 120, 255), 63, Color::Blue),         // blue
    ((90, 60, 200), 61, Color::Magenta),       // indigo
    ((200, 110, 230), 177, Color::LightMagenta), // violet
];

/// Terminal color depth, detected once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    TrueColor,
    Ansi256,
    Basic,
}

impl Depth {
    pub fn detect() -> Depth {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Ansi256
        } else {
            Depth::Basic
        }
    }
}

/// Color of a disk of the given size at the given depth
/// Sizes beyond the palette wrap around
pub fn disk_color(size: u8, depth: Depth) -> Color {
    let idx = (size as usize).saturating_sub(1) % DISK_PALETTE.len();
    let ((r, g, b), index256, basic) = DISK_PALETTE[idx];
    match depth {
        Depth::TrueColor => Color::Rgb(r, g, b),
        Depth::Ansi256 => Color::Indexed(index256),
        Depth::Basic => basic,
    }
}

/// Adjusts a standard ANSI color to the Windows Terminal (Campbell) look at the given depth
pub fn wtmatch(color: Color, depth: Depth) -> Color {
    let mapping = match color {
        Color::Black => Some(((12, 12, 12), 232)),
        Color::Red => Some(((197, 15, 31), 160)),
        Color::Green => Some(((19, 161, 14), 28)),
        Color::Yellow => Some(((193, 156, 0), 178)),
        Color::Blue => Some(((0, 55, 218), 20)),
        Color::Gray => Some(((204, 204, 204), 250)),
        Color::DarkGray => Some(((118, 118, 118), 243)),
        Color::LightBlue => Some(((59, 120, 255), 63)),
        Color::White => Some(((242, 242, 242), 255)),
        _ => None,
    };
    match (mapping, depth) {
        (Some(((r, g, b), _)), Depth::TrueColor) => Color::Rgb(r, g, b),
        (Some((_, index256)), Depth::Ansi256) => Color::Indexed(index256),
        _ => color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_disk_has_a_distinct_color() {
        for depth in [Depth::TrueColor, Depth::Ansi256, Depth::Basic] {
            let colors: Vec<Color> = (1..=MAX_DISKS as u8).map(|s| disk_color(s, depth)).collect();
            for (i, a) in colors.iter().enumerate() {
                assert!(!colors[i + 1..].contains(a), "{depth:?} repeats {a:?}");
            }
        }
    }

    #[test]
    fn basic_depth_keeps_ansi_colors() {
        assert_eq!(wtmatch(Color::Yellow, Depth::Basic), Color::Yellow);
        assert_eq!(wtmatch(Color::Yellow, Depth::Ansi256), Color::Indexed(178));
        assert_eq!(wtmatch(Color::Cyan, Depth::TrueColor), Color::Cyan);
    }
}
