//! Ex command line parsing.
//!
//! Pure classification of the text typed after `:`; no side effects.
//! Unknown input is carried back so the caller can report it.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Quit,
    Write,
    WriteQuit,
    /// `e <path>`; `None` for a bare `e`, which prompts for the path.
    Edit(Option<PathBuf>),
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let body = raw.trim();
        let body = body.strip_prefix(':').unwrap_or(body);
        match body {
            "q" => return ParsedCommand::Quit,
            "w" => return ParsedCommand::Write,
            "wq" => return ParsedCommand::WriteQuit,
            "e" => return ParsedCommand::Edit(None),
            _ => {}
        }
        if let Some(rest) = body.strip_prefix("e ") {
            let path_part = rest.trim_start();
            if !path_part.is_empty() {
                return ParsedCommand::Edit(Some(PathBuf::from(path_part)));
            }
        }
        ParsedCommand::Unknown(body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_and_write() {
        assert_eq!(CommandParser::parse("q"), ParsedCommand::Quit);
        assert_eq!(CommandParser::parse(":w"), ParsedCommand::Write);
        assert_eq!(CommandParser::parse("wq"), ParsedCommand::WriteQuit);
    }

    #[test]
    fn parse_edit() {
        match CommandParser::parse("e  foo.txt") {
            ParsedCommand::Edit(Some(p)) => assert_eq!(p, PathBuf::from("foo.txt")),
            other => panic!("expected Edit, got {:?}", other),
        }
        assert_eq!(CommandParser::parse("e"), ParsedCommand::Edit(None));
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            CommandParser::parse("doesnotexist"),
            ParsedCommand::Unknown("doesnotexist".into())
        );
        assert_eq!(CommandParser::parse("edit"), ParsedCommand::Unknown("edit".into()));
    }
}
