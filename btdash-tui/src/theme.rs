//! Neon-on-dark palette and the styles built from it.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(91, 231, 169);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn header() -> Style {
    accent_bold().add_modifier(Modifier::UNDERLINED)
}

/// Green for non-negative, pink for negative. Unparseable text stays plain.
pub fn pnl(text: &str) -> Style {
    match text.trim_end_matches('%').trim().parse::<f64>() {
        Ok(v) if v >= 0.0 => Style::default().fg(POSITIVE),
        Ok(_) => Style::default().fg(NEGATIVE),
        Err(_) => self::text(),
    }
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// `#rrggbb` to a terminal color. Anything else (named or `rgba(...)`)
/// falls back to `fallback`.
pub fn parse_color(css: &str, fallback: Color) -> Color {
    let hex = match css.trim().strip_prefix('#') {
        Some(h) if h.len() == 6 => h,
        _ => return fallback,
    };
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors_parse() {
        assert_eq!(parse_color("#5be7a9", Color::Reset), Color::Rgb(0x5b, 0xe7, 0xa9));
        assert_eq!(parse_color("rgba(255,255,255,0.6)", MUTED), MUTED);
        assert_eq!(parse_color("#zzzzzz", MUTED), MUTED);
    }

    #[test]
    fn pnl_colors() {
        assert_eq!(pnl("12.50").fg, Some(POSITIVE));
        assert_eq!(pnl("-3.00%").fg, Some(NEGATIVE));
        assert_eq!(pnl("--").fg, Some(TEXT));
    }
}
