//! Parse-tree backend.
//!
//! One tree covers the whole buffer (rows joined by `\n`, trailing newline
//! included). Re-parses are full rebuilds; edits request them throttled,
//! loads and profile changes request them immediately.

use std::time::{Duration, Instant};

use core_text::{Highlight, Row};
use tracing::{debug, trace, warn};
use tree_sitter::{Node, Parser, Point, Tree};

use crate::profile::{Grammar, SyntaxProfile};
use crate::rules::RuleHighlighter;
use crate::{Highlighter, SyntaxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reparse {
    /// At most once per configured interval.
    Throttled,
    Immediate,
}

/// Composite nodes painted in full before their children are visited.
const WHOLESALE: &[&str] = &[
    "comment",
    "line_comment",
    "block_comment",
    "string_literal",
    "string",
    "raw_string_literal",
    "char_literal",
];

const PRIMARY_KEYWORDS: &[&str] = &[
    "if", "else", "while", "for", "return", "break", "continue", "switch", "case", "default",
    "do", "goto", "sizeof", "struct", "union", "enum", "typedef", "static", "extern", "const",
    "volatile", "inline", "register", "#include", "#define", "#ifdef", "#ifndef", "#endif",
    "#if", "#else", "#elif", "def", "class", "import", "from", "elif", "try", "except",
    "finally", "with", "as", "lambda", "pass", "raise", "yield", "global", "nonlocal", "assert",
    "del", "in", "is", "not", "and", "or", "async", "await", "fn", "let", "mut", "impl",
    "trait", "pub", "use", "mod", "match", "loop", "where", "move", "ref", "unsafe", "crate",
    "dyn", "type",
];

/// Class of a node kind; `span` is the node's column width on this row.
pub fn classify(kind: &str, span: usize) -> Option<Highlight> {
    let class = match kind {
        "comment" | "line_comment" | "block_comment" => Highlight::Comment,
        "string_start" | "string_end" if span >= 3 => Highlight::Comment,
        "string_start" | "string_end" => Highlight::String,
        "string_literal" | "string" | "string_content" | "raw_string_literal" | "char_literal"
        | "string_fragment" => Highlight::String,
        "number_literal" | "integer" | "float" | "integer_literal" | "float_literal" => {
            Highlight::Number
        }
        "primitive_type" | "type_identifier" | "sized_type_specifier" | "type_qualifier" => {
            Highlight::KeywordSecondary
        }
        k if PRIMARY_KEYWORDS.contains(&k) => Highlight::KeywordPrimary,
        _ => return None,
    };
    Some(class)
}

pub struct TreeHighlighter {
    grammar: Grammar,
    parser: Parser,
    tree: Option<Tree>,
    interval: Duration,
    last_parse: Option<Instant>,
}

impl std::fmt::Debug for TreeHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeHighlighter")
            .field("grammar", &self.grammar)
            .field("has_tree", &self.tree.is_some())
            .field("interval", &self.interval)
            .finish()
    }
}

impl TreeHighlighter {
    pub fn new(grammar: Grammar, interval: Duration) -> Result<Self, SyntaxError> {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar.language())
            .map_err(|source| SyntaxError::Grammar {
                name: grammar.name,
                source,
            })?;
        Ok(Self {
            grammar,
            parser,
            tree: None,
            interval,
            last_parse: None,
        })
    }

    pub fn has_tree(&self) -> bool {
        self.tree.is_some()
    }

    /// Rebuild the tree from `source`. Returns `true` when a parse ran (the
    /// caller should repaint every row), `false` when throttled.
    pub fn reparse(&mut self, source: &[u8], mode: Reparse, now: Instant) -> bool {
        if mode == Reparse::Throttled
            && let Some(last) = self.last_parse
            && now.saturating_duration_since(last) < self.interval
        {
            trace!(target: "syntax.tree", grammar = self.grammar.name, "reparse_throttled");
            return false;
        }
        self.tree = self.parser.parse(source, None);
        self.last_parse = Some(now);
        match &self.tree {
            Some(tree) => debug!(
                target: "syntax.tree",
                grammar = self.grammar.name,
                bytes = source.len(),
                errors = tree.root_node().has_error(),
                ?mode,
                "reparsed"
            ),
            None => warn!(target: "syntax.tree", grammar = self.grammar.name, "parse_failed"),
        }
        true
    }

    fn paint_tree(tree: &Tree, row: &mut Row) {
        row.hl.fill(Highlight::Normal);
        let line = row.index;
        let start = Point::new(line, 0);
        let end = Point::new(line, row.len());
        let Some(node) = tree.root_node().descendant_for_point_range(start, end) else {
            return;
        };
        visit(node, row);
    }
}

fn visit(node: Node<'_>, row: &mut Row) {
    let line = row.index;
    let start = node.start_position();
    let end = node.end_position();
    if start.row > line || end.row < line {
        return;
    }
    let start_col = if start.row == line { start.column } else { 0 };
    let end_col = if end.row == line { end.column } else { row.len() };

    if node.child_count() == 0 {
        paint(node.kind(), row, start_col, end_col);
        return;
    }
    if node.is_named() && WHOLESALE.contains(&node.kind()) {
        paint(node.kind(), row, start_col, end_col);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        visit(child, row);
    }
}

fn paint(kind: &str, row: &mut Row, start_col: usize, end_col: usize) {
    let Some(class) = classify(kind, end_col.saturating_sub(start_col)) else {
        return;
    };
    let from = row.cx_to_rx(start_col).min(row.hl.len());
    let to = row.cx_to_rx(end_col.min(row.len())).min(row.hl.len());
    if from < to {
        row.hl[from..to].fill(class);
    }
}

impl Highlighter for TreeHighlighter {
    /// Without a tree (failed parse) the line scanner takes over.
    fn paint(&self, profile: &SyntaxProfile, row: &mut Row, carry_in: bool) -> bool {
        match &self.tree {
            Some(tree) => {
                Self::paint_tree(tree, row);
                row.open_comment = false;
                false
            }
            None => RuleHighlighter.paint(profile, row, carry_in),
        }
    }
}
