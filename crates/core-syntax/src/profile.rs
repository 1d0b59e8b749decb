//! Filetype profiles and the registry that picks one per file name.

use std::fmt;
use std::sync::Arc;

use core_config::ProfileConfig;
use regex::Regex;
use tracing::{debug, warn};
use tree_sitter::Language;

use crate::SyntaxError;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct HighlightFlags: u8 {
        const NUMBERS = 0b01;
        const STRINGS = 0b10;
    }
}

/// A keyword; `secondary` keywords (types) were written with a trailing `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub text: Vec<u8>,
    pub secondary: bool,
}

impl Keyword {
    pub fn parse(spec: &str) -> Self {
        match spec.strip_suffix('|') {
            Some(text) => Self {
                text: text.as_bytes().to_vec(),
                secondary: true,
            },
            None => Self {
                text: spec.as_bytes().to_vec(),
                secondary: false,
            },
        }
    }
}

/// Binding to a compiled tree-sitter grammar.
#[derive(Clone, Copy)]
pub struct Grammar {
    pub name: &'static str,
    language: fn() -> Language,
}

impl Grammar {
    pub const fn new(name: &'static str, language: fn() -> Language) -> Self {
        Self { name, language }
    }

    pub fn language(&self) -> Language {
        (self.language)()
    }
}

impl fmt::Debug for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxProfile {
    pub name: String,
    pub file_match: Regex,
    pub keywords: Vec<Keyword>,
    pub line_comment: Option<Vec<u8>>,
    pub block_comment: Option<(Vec<u8>, Vec<u8>)>,
    pub flags: HighlightFlags,
    pub grammar: Option<Grammar>,
}

const C_KEYWORDS: &[&str] = &[
    "switch", "if", "while", "for", "break", "continue", "return", "else", "struct", "union",
    "typedef", "static", "enum", "class", "case", "int|", "long|", "double|", "float|", "char|",
    "unsigned|", "signed|", "void|", "#define", "#include",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield", "True",
    "False", "None", "int|", "float|", "str|", "bool|", "list|", "dict|", "tuple|", "set|",
    "frozenset|", "bytes|", "bytearray|", "range|", "object|", "type|", "len|", "print|",
    "input|", "open|",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "i8|", "i16|", "i32|", "i64|", "i128|", "isize|",
    "u8|", "u16|", "u32|", "u64|", "u128|", "usize|", "f32|", "f64|", "bool|", "char|", "str|",
    "String|", "Vec|", "Option|", "Result|", "Box|",
];

fn c_language() -> Language {
    tree_sitter_c::LANGUAGE.into()
}

fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

fn rust_language() -> Language {
    tree_sitter_rust::LANGUAGE.into()
}

impl SyntaxProfile {
    fn builtin(
        name: &str,
        pattern: &str,
        keywords: &[&str],
        line_comment: &str,
        block_comment: (&str, &str),
        grammar: Grammar,
    ) -> Result<Self, SyntaxError> {
        let file_match = Regex::new(pattern).map_err(|source| SyntaxError::FilePattern {
            name: name.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            file_match,
            keywords: keywords.iter().map(|k| Keyword::parse(k)).collect(),
            line_comment: Some(line_comment.as_bytes().to_vec()),
            block_comment: Some((
                block_comment.0.as_bytes().to_vec(),
                block_comment.1.as_bytes().to_vec(),
            )),
            flags: HighlightFlags::NUMBERS | HighlightFlags::STRINGS,
            grammar: Some(grammar),
        })
    }

    pub fn c() -> Result<Self, SyntaxError> {
        Self::builtin(
            "c",
            r"\.(c|h|cpp)$",
            C_KEYWORDS,
            "//",
            ("/*", "*/"),
            Grammar::new("c", c_language),
        )
    }

    pub fn python() -> Result<Self, SyntaxError> {
        Self::builtin(
            "python",
            r"\.py$",
            PYTHON_KEYWORDS,
            "#",
            ("\"\"\"", "\"\"\""),
            Grammar::new("python", python_language),
        )
    }

    pub fn rust() -> Result<Self, SyntaxError> {
        Self::builtin(
            "rust",
            r"\.rs$",
            RUST_KEYWORDS,
            "//",
            ("/*", "*/"),
            Grammar::new("rust", rust_language),
        )
    }

    /// User profiles never carry a grammar; they run on the line scanner.
    pub fn from_config(cfg: &ProfileConfig) -> Result<Self, SyntaxError> {
        let file_match =
            Regex::new(&cfg.file_pattern).map_err(|source| SyntaxError::FilePattern {
                name: cfg.name.clone(),
                source,
            })?;
        let mut flags = HighlightFlags::empty();
        flags.set(HighlightFlags::NUMBERS, cfg.highlight_numbers);
        flags.set(HighlightFlags::STRINGS, cfg.highlight_strings);
        Ok(Self {
            name: cfg.name.clone(),
            file_match,
            keywords: cfg
                .keywords
                .iter()
                .filter(|k| !k.is_empty() && k.as_str() != "|")
                .map(|k| Keyword::parse(k))
                .collect(),
            line_comment: cfg
                .line_comment
                .as_ref()
                .filter(|s| !s.is_empty())
                .map(|s| s.as_bytes().to_vec()),
            block_comment: cfg
                .block_comment
                .as_ref()
                .filter(|(start, end)| !start.is_empty() && !end.is_empty())
                .map(|(start, end)| (start.as_bytes().to_vec(), end.as_bytes().to_vec())),
            flags,
            grammar: None,
        })
    }

    /// Same profile without its grammar binding.
    pub fn without_grammar(mut self) -> Self {
        self.grammar = None;
        self
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.file_match.is_match(file_name)
    }
}

/// Ordered set of profiles; the first match wins.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<Arc<SyntaxProfile>>,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileRegistry {
    pub fn builtin() -> Self {
        let profiles = [SyntaxProfile::c(), SyntaxProfile::python(), SyntaxProfile::rust()]
            .into_iter()
            .filter_map(|p| match p {
                Ok(p) => Some(Arc::new(p)),
                Err(e) => {
                    warn!(target: "syntax.profile", error = %e, "builtin_profile_skipped");
                    None
                }
            })
            .collect();
        Self { profiles }
    }

    /// Built-ins preceded by user profiles. Profiles with an invalid pattern
    /// are skipped with a warning.
    pub fn with_user_profiles(configs: &[ProfileConfig]) -> Self {
        let mut profiles = Vec::with_capacity(configs.len() + 3);
        for cfg in configs {
            match SyntaxProfile::from_config(cfg) {
                Ok(p) => {
                    debug!(target: "syntax.profile", name = %p.name, "user_profile_registered");
                    profiles.push(Arc::new(p));
                }
                Err(e) => warn!(target: "syntax.profile", error = %e, "user_profile_skipped"),
            }
        }
        profiles.extend(Self::builtin().profiles);
        Self { profiles }
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn select(&self, file_name: &str) -> Option<Arc<SyntaxProfile>> {
        let found = self.profiles.iter().find(|p| p.matches(file_name)).cloned();
        debug!(
            target: "syntax.profile",
            file = file_name,
            profile = found.as_ref().map(|p| p.name.as_str()).unwrap_or("none"),
            "select"
        );
        found
    }
}
