//! Highlight class -> terminal colour.

use core_text::Highlight;
use crossterm::style::Color;

/// `None` means the terminal default foreground.
pub fn highlight_color(hl: Highlight) -> Option<Color> {
    match hl {
        Highlight::Normal => None,
        Highlight::Comment | Highlight::BlockComment => Some(Color::Cyan),
        Highlight::KeywordPrimary => Some(Color::Yellow),
        Highlight::KeywordSecondary => Some(Color::Green),
        Highlight::String => Some(Color::Magenta),
        Highlight::Number => Some(Color::Red),
        Highlight::SearchMatch => Some(Color::Blue),
    }
}

/// Control bytes are drawn inverted as `@`-offset letters, or `?`.
pub fn control_symbol(b: u8) -> Option<char> {
    if b.is_ascii_control() {
        Some(if b < 26 { (b'@' + b) as char } else { '?' })
    } else {
        None
    }
}
