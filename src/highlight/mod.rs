//! SQL lexical highlighting.
//!
//! Text flows one way: the [`scanner`] splits a line into raw ranges, the
//! [`classify`] step tags word ranges using the keyword [`catalog`], and
//! [`compose`] merges both into gap-free [`LineSpans`]. The [`controller`]
//! owns the editor buffer and re-runs the pipeline on every edit.

pub mod catalog;
pub mod classify;
pub mod compose;
pub mod controller;
pub mod scanner;

pub use catalog::Catalog;
pub use compose::{compose_document, compose_line};
pub use controller::{Highlighter, ScrollOffset, ScrollSync, Viewport};
pub use scanner::CommentPolicy;

/// Display category of a highlighted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `--` comment running to end of line.
    Comment,
    /// Quoted string literal.
    String,
    /// Integer or decimal literal.
    Number,
    /// SELECT, FROM, GROUP BY, ...
    QueryKeyword,
    /// INSERT, UPDATE, SET, ...
    ModificationKeyword,
    /// CREATE, TABLE, PRIMARY KEY, ...
    DefinitionKeyword,
    /// AND, NULL, COUNT, ...
    OperatorKeyword,
    /// BEGIN, COMMIT, SET TRANSACTION, ...
    TransactionKeyword,
    /// Identifiers, punctuation, whitespace.
    Plain,
}

impl Category {
    /// Whether this category is one of the five keyword classes.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            Category::QueryKeyword
                | Category::ModificationKeyword
                | Category::DefinitionKeyword
                | Category::OperatorKeyword
                | Category::TransactionKeyword
        )
    }

    /// Short human-readable label, used by the help legend.
    pub fn label(self) -> &'static str {
        match self {
            Category::Comment => "comment",
            Category::String => "string",
            Category::Number => "number",
            Category::QueryKeyword => "query",
            Category::ModificationKeyword => "modification",
            Category::DefinitionKeyword => "definition",
            Category::OperatorKeyword => "operator/function",
            Category::TransactionKeyword => "transaction",
            Category::Plain => "plain",
        }
    }
}

/// A half-open byte range `[start, end)` within one line, tagged with a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Category of every character in the range.
    pub category: Category,
}

impl Span {
    /// Create a new span.
    pub const fn new(start: usize, end: usize, category: Category) -> Self {
        Self {
            start,
            end,
            category,
        }
    }

    /// Whether the span covers no bytes.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The slice of `line` this span names.
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }
}

/// Ordered, gap-free spans covering one line.
pub type LineSpans = Vec<Span>;

/// One highlighted line, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedLine<'a> {
    /// 1-based line number for the gutter.
    pub number: usize,
    /// Category and text slice of every span, in order.
    pub segments: Vec<(Category, &'a str)>,
}

impl HighlightedLine<'_> {
    /// Concatenate the segment texts back into the raw line.
    pub fn text(&self) -> String {
        self.segments.iter().map(|(_, s)| *s).collect()
    }
}

/// Highlight a whole buffer with the standard catalog and default options.
///
/// Every call recomputes from scratch. An empty buffer yields no lines.
pub fn highlight(text: &str) -> Vec<HighlightedLine<'_>> {
    highlight_with(text, Catalog::standard(), CommentPolicy::default())
}

/// Highlight a buffer with an explicit catalog and comment policy.
pub fn highlight_with<'a>(
    text: &'a str,
    catalog: &Catalog,
    policy: CommentPolicy,
) -> Vec<HighlightedLine<'a>> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .enumerate()
        .map(|(i, line)| HighlightedLine {
            number: i + 1,
            segments: compose_line(line, catalog, policy)
                .iter()
                .map(|span| (span.category, span.text(line)))
                .collect(),
        })
        .collect()
}
