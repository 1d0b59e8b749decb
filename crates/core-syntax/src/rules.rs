//! Line-local highlighter driven by profile markers and keyword lists.
//!
//! Only state carried between rows is whether a block comment is still open.

use core_text::{Highlight, Row, is_separator};

use crate::profile::{HighlightFlags, SyntaxProfile};
use crate::Highlighter;

/// Scan `render` left to right. Returns the classes and whether a block
/// comment is open at the end of the row.
pub fn scan(profile: &SyntaxProfile, render: &[u8], carry_in: bool) -> (Vec<Highlight>, bool) {
    let mut hl = vec![Highlight::Normal; render.len()];
    let line_comment = profile.line_comment.as_deref().filter(|m| !m.is_empty());
    let block = profile
        .block_comment
        .as_ref()
        .filter(|(s, e)| !s.is_empty() && !e.is_empty());
    let strings = profile.flags.contains(HighlightFlags::STRINGS);
    let numbers = profile.flags.contains(HighlightFlags::NUMBERS);

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;
    let mut in_comment = carry_in;
    let mut i = 0;

    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };
        let rest = &render[i..];

        if let Some(marker) = line_comment
            && in_string.is_none()
            && !in_comment
            && rest.starts_with(marker)
        {
            hl[i..].fill(Highlight::Comment);
            break;
        }

        if let Some((start, end)) = block
            && in_string.is_none()
        {
            if in_comment {
                if rest.starts_with(end) {
                    hl[i..i + end.len()].fill(Highlight::BlockComment);
                    i += end.len();
                    in_comment = false;
                    prev_sep = true;
                } else {
                    hl[i] = Highlight::BlockComment;
                    i += 1;
                }
                continue;
            } else if rest.starts_with(start) {
                hl[i..i + start.len()].fill(Highlight::BlockComment);
                i += start.len();
                in_comment = true;
                continue;
            }
        }

        if strings {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if numbers
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == b'.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep && let Some((len, class)) = keyword_at(profile, render, i) {
            hl[i..i + len].fill(class);
            i += len;
            prev_sep = false;
            continue;
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}

/// Longest keyword starting at `i` that is followed by a separator (or the row end).
fn keyword_at(profile: &SyntaxProfile, render: &[u8], i: usize) -> Option<(usize, Highlight)> {
    let rest = &render[i..];
    profile
        .keywords
        .iter()
        .filter(|k| !k.text.is_empty() && rest.starts_with(&k.text))
        .filter(|k| is_separator(rest.get(k.text.len()).copied().unwrap_or(0)))
        .max_by_key(|k| k.text.len())
        .map(|k| {
            let class = if k.secondary {
                Highlight::KeywordSecondary
            } else {
                Highlight::KeywordPrimary
            };
            (k.text.len(), class)
        })
}

/// Regex/state backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleHighlighter;

impl Highlighter for RuleHighlighter {
    fn paint(&self, profile: &SyntaxProfile, row: &mut Row, carry_in: bool) -> bool {
        let (hl, open) = scan(profile, &row.render, carry_in);
        row.hl = hl;
        row.open_comment = open;
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use Highlight::*;

    fn c() -> SyntaxProfile {
        SyntaxProfile::c().unwrap().without_grammar()
    }

    fn classes(profile: &SyntaxProfile, text: &str, carry: bool) -> (Vec<Highlight>, bool) {
        scan(profile, text.as_bytes(), carry)
    }

    #[test]
    fn keywords_need_separators_on_both_sides() {
        let p = c();
        let (hl, _) = classes(&p, "int x; ints", false);
        assert_eq!(&hl[0..3], &[KeywordSecondary; 3]);
        assert_eq!(hl[3], Normal);
        assert!(hl[7..].iter().all(|h| *h == Normal));
        let (hl, _) = classes(&p, "return;", false);
        assert_eq!(&hl[0..6], &[KeywordPrimary; 6]);
        assert_eq!(hl[6], Normal);
        let (hl, _) = classes(&p, "xif (1)", false);
        assert_eq!(&hl[0..3], &[Normal; 3]);
    }

    #[test]
    fn longest_keyword_wins() {
        let mut p = c();
        p.keywords = vec![
            crate::Keyword::parse("do"),
            crate::Keyword::parse("double|"),
        ];
        let (hl, _) = classes(&p, "double d", false);
        assert_eq!(&hl[0..6], &[KeywordSecondary; 6]);
    }

    #[test]
    fn line_comment_runs_to_end() {
        let p = c();
        let (hl, open) = classes(&p, "x = 1; // done", false);
        assert_eq!(hl[4], Number);
        assert!(hl[7..].iter().all(|h| *h == Comment));
        assert!(!open);
    }

    #[test]
    fn block_comment_opens_and_closes() {
        let p = c();
        let (hl, open) = classes(&p, "a /* b", false);
        assert_eq!(hl[0], Normal);
        assert!(hl[2..].iter().all(|h| *h == BlockComment));
        assert!(open);
        let (hl, open) = classes(&p, "b */ int", true);
        assert!(hl[..4].iter().all(|h| *h == BlockComment));
        assert_eq!(&hl[5..8], &[KeywordSecondary; 3]);
        assert!(!open);
    }

    #[test]
    fn strings_with_escapes_hide_markers() {
        let p = c();
        let (hl, open) = classes(&p, r#""a\"// /*" 7"#, false);
        assert!(hl[..10].iter().all(|h| *h == String));
        assert_eq!(hl[11], Number);
        assert!(!open);
    }

    #[test]
    fn numbers_need_a_separator_before() {
        let p = c();
        let (hl, _) = classes(&p, "x1 3.14 a.5", false);
        assert_eq!(hl[1], Normal);
        assert_eq!(&hl[3..7], &[Number; 4]);
        assert_eq!(hl[10], Number);
        assert_eq!(hl[9], Normal);
    }

    #[test]
    fn python_triple_quotes_are_block_comments() {
        let p = SyntaxProfile::python().unwrap().without_grammar();
        let (hl, open) = classes(&p, "\"\"\"doc", false);
        assert!(hl.iter().all(|h| *h == BlockComment));
        assert!(open);
        let (hl, open) = classes(&p, "end\"\"\" def", true);
        assert!(hl[..6].iter().all(|h| *h == BlockComment));
        assert_eq!(&hl[7..], &[KeywordPrimary; 3]);
        assert!(!open);
    }

    #[test]
    fn flags_disable_numbers_and_strings() {
        let mut p = c();
        p.flags = HighlightFlags::empty();
        let (hl, _) = classes(&p, "\"s\" 42", false);
        assert!(hl.iter().all(|h| *h == Normal));
    }

    #[test]
    fn painter_writes_row_state() {
        let p = c();
        let mut row = Row::new(0, b"/* open".to_vec());
        assert!(RuleHighlighter.paint(&p, &mut row, false));
        assert!(row.open_comment);
        assert_eq!(row.hl.len(), row.render.len());
    }
}
