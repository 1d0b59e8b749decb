//! Syntax highlighting: filetype profiles plus two interchangeable backends.
//!
//! `SyntaxEngine` is the single entry point used by the row store. It holds
//! the active profile (if any) and either the line scanner or the parse-tree
//! highlighter. Both paint `Row::hl` from `Row::render`.

pub mod profile;
pub mod rules;
pub mod tree;

use std::sync::Arc;
use std::time::{Duration, Instant};

use core_text::{Highlight, Row};
use thiserror::Error;
use tracing::{info, warn};

pub use profile::{Grammar, HighlightFlags, Keyword, ProfileRegistry, SyntaxProfile};
pub use rules::RuleHighlighter;
pub use tree::{Reparse, TreeHighlighter};

#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("invalid file pattern for profile `{name}`: {source}")]
    FilePattern {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("grammar `{name}` rejected by parser: {source}")]
    Grammar {
        name: &'static str,
        #[source]
        source: tree_sitter::LanguageError,
    },
}

/// Paints one row. `carry_in` is the previous row's open-comment state; the
/// return value is this row's.
pub trait Highlighter {
    fn paint(&self, profile: &SyntaxProfile, row: &mut Row, carry_in: bool) -> bool;
}

#[derive(Debug)]
pub enum Backend {
    Rules(RuleHighlighter),
    Tree(Box<TreeHighlighter>),
}

#[derive(Debug)]
pub struct SyntaxEngine {
    profile: Option<Arc<SyntaxProfile>>,
    backend: Backend,
}

impl Default for SyntaxEngine {
    fn default() -> Self {
        Self::none()
    }
}

impl SyntaxEngine {
    /// No profile: every row stays `Highlight::Normal`.
    pub fn none() -> Self {
        Self {
            profile: None,
            backend: Backend::Rules(RuleHighlighter),
        }
    }

    /// Bind `profile`, preferring its grammar. A grammar the parser rejects
    /// leaves the engine on the line scanner.
    pub fn new(profile: Arc<SyntaxProfile>, reparse_interval: Duration) -> Self {
        let backend = match profile.grammar {
            Some(grammar) => match TreeHighlighter::new(grammar, reparse_interval) {
                Ok(ts) => Backend::Tree(Box::new(ts)),
                Err(e) => {
                    warn!(target: "syntax.tree", profile = %profile.name, error = %e, "grammar_unavailable_using_rules");
                    Backend::Rules(RuleHighlighter)
                }
            },
            None => Backend::Rules(RuleHighlighter),
        };
        let engine = Self {
            profile: Some(profile),
            backend,
        };
        info!(
            target: "syntax.profile",
            profile = engine.filetype().unwrap_or("none"),
            backend = engine.backend_name(),
            "engine_bound"
        );
        engine
    }

    pub fn profile(&self) -> Option<&SyntaxProfile> {
        self.profile.as_deref()
    }

    pub fn filetype(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.name.as_str())
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn uses_tree(&self) -> bool {
        matches!(self.backend, Backend::Tree(_))
    }

    pub fn backend_name(&self) -> &'static str {
        match (&self.profile, &self.backend) {
            (None, _) => "none",
            (Some(_), Backend::Rules(_)) => "regex",
            (Some(_), Backend::Tree(_)) => "tree-sitter",
        }
    }

    /// Forward to the tree backend; the line scanner has nothing to rebuild.
    /// Returns `true` when every row must be repainted.
    pub fn reparse(&mut self, source: &[u8], mode: Reparse, now: Instant) -> bool {
        match &mut self.backend {
            Backend::Tree(ts) => ts.reparse(source, mode, now),
            Backend::Rules(_) => false,
        }
    }

    /// Repaint `row` (whose render is current). Returns the row's new
    /// open-comment state.
    pub fn paint(&self, row: &mut Row, carry_in: bool) -> bool {
        let Some(profile) = self.profile.as_deref() else {
            row.hl.clear();
            row.hl.resize(row.render.len(), Highlight::Normal);
            row.open_comment = false;
            return false;
        };
        match &self.backend {
            Backend::Rules(rules) => rules.paint(profile, row, carry_in),
            Backend::Tree(ts) => ts.paint(profile, row, carry_in),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_profile_paints_plain() {
        let engine = SyntaxEngine::none();
        let mut row = Row::new(0, b"int x; // c".to_vec());
        assert!(!engine.paint(&mut row, true));
        assert!(row.hl.iter().all(|h| *h == Highlight::Normal));
        assert_eq!(engine.backend_name(), "none");
        assert!(engine.filetype().is_none());
    }

    #[test]
    fn grammar_profiles_use_the_tree_backend() {
        let c = Arc::new(SyntaxProfile::c().unwrap());
        let engine = SyntaxEngine::new(c, Duration::from_secs(1));
        assert!(engine.uses_tree());
        assert_eq!(engine.backend_name(), "tree-sitter");
        assert_eq!(engine.filetype(), Some("c"));

        let plain = Arc::new(SyntaxProfile::c().unwrap().without_grammar());
        let mut engine = SyntaxEngine::new(plain, Duration::from_secs(1));
        assert!(!engine.uses_tree());
        assert_eq!(engine.backend_name(), "regex");
        assert!(!engine.reparse(b"int a;\n", Reparse::Immediate, Instant::now()));
    }
}
