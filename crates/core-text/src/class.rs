//! Byte classification used by motions and the line scanner.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Whitespace,
    Word,
    Punctuation,
}

impl CharClass {
    pub fn of(b: u8) -> Self {
        if b == 0 || b.is_ascii_whitespace() || b == 0x0b {
            CharClass::Whitespace
        } else if is_word_byte(b) {
            CharClass::Word
        } else {
            CharClass::Punctuation
        }
    }
}

pub fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Token boundary for keyword and number highlighting.
pub fn is_separator(b: u8) -> bool {
    b == 0 || b.is_ascii_whitespace() || b == 0x0b || b",.()+-/*=~%<>[];".contains(&b)
}
