//! Stateful boundary between the editor widget and the highlighter.
//!
//! [`Highlighter`] owns the current buffer and its spans, recomputed in
//! full on every edit, plus the scroll state shared by the live input
//! layer and the styled overlay drawn in its place.

use super::compose::compose_document;
use super::{Catalog, CommentPolicy, HighlightedLine, LineSpans};

/// Scroll position of a text layer, in lines and display columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollOffset {
    /// First visible line.
    pub top: usize,
    /// First visible display column.
    pub left: usize,
}

/// Size of the visible text area, in rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Visible rows.
    pub height: usize,
    /// Visible columns.
    pub width: usize,
}

/// Scroll state of the live input layer and the overlay drawn over it.
///
/// The overlay is never scrolled on its own: every change to the live
/// layer is copied onto it immediately, and nothing flows back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollSync {
    live: ScrollOffset,
    overlay: ScrollOffset,
}

impl ScrollSync {
    /// Scroll position of the live input layer.
    pub fn live(&self) -> ScrollOffset {
        self.live
    }

    /// Scroll position of the styled overlay.
    pub fn overlay(&self) -> ScrollOffset {
        self.overlay
    }

    /// Handle a scroll event from the live layer.
    pub fn on_live_scroll(&mut self, offset: ScrollOffset) {
        self.live = offset;
        self.overlay = offset;
    }
}

/// Owns the editor text and its highlight output until the next edit.
#[derive(Debug)]
pub struct Highlighter {
    catalog: &'static Catalog,
    policy: CommentPolicy,
    text: String,
    spans: Vec<LineSpans>,
    scroll: ScrollSync,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(CommentPolicy::default())
    }
}

impl Highlighter {
    /// Create an empty highlighter using the standard catalog.
    pub fn new(policy: CommentPolicy) -> Self {
        Self::with_catalog(Catalog::standard(), policy)
    }

    /// Create an empty highlighter using a custom catalog.
    pub fn with_catalog(catalog: &'static Catalog, policy: CommentPolicy) -> Self {
        Self {
            catalog,
            policy,
            text: String::new(),
            spans: Vec::new(),
            scroll: ScrollSync::default(),
        }
    }

    /// Replace the buffer and recompute every line.
    ///
    /// Returns `true` if the text changed.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text.clear();
        self.text.push_str(text);
        self.spans = compose_document(&self.text, self.catalog, self.policy);
        let max_top = self.line_count().saturating_sub(1);
        if self.scroll.live().top > max_top {
            let offset = ScrollOffset {
                top: max_top,
                ..self.scroll.live()
            };
            self.scroll.on_live_scroll(offset);
        }
        tracing::trace!(lines = self.spans.len(), bytes = self.text.len(), "rehighlighted");
        true
    }

    /// The current buffer.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Comment policy in effect.
    pub fn policy(&self) -> CommentPolicy {
        self.policy
    }

    /// Keyword catalog used for classification.
    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    /// Raw spans of every line.
    pub fn spans(&self) -> &[LineSpans] {
        &self.spans
    }

    /// Number of lines in the buffer (an empty buffer has none).
    pub fn line_count(&self) -> usize {
        self.spans.len()
    }

    /// Highlighted lines with their text slices, for rendering.
    pub fn lines(&self) -> Vec<HighlightedLine<'_>> {
        self.text
            .split('\n')
            .zip(&self.spans)
            .enumerate()
            .map(|(i, (line, spans))| HighlightedLine {
                number: i + 1,
                segments: spans.iter().map(|s| (s.category, s.text(line))).collect(),
            })
            .collect()
    }

    /// The full, unmodified buffer to hand to the execution service.
    pub fn execute_request(&self) -> &str {
        &self.text
    }

    /// Scroll state of both layers.
    pub fn scroll(&self) -> ScrollSync {
        self.scroll
    }

    /// Scroll the live layer to `offset` and mirror it onto the overlay.
    pub fn scroll_live_to(&mut self, offset: ScrollOffset) {
        let max_top = self.line_count().saturating_sub(1);
        self.scroll.on_live_scroll(ScrollOffset {
            top: offset.top.min(max_top),
            left: offset.left,
        });
    }

    /// Scroll the live layer vertically by `delta` lines.
    pub fn scroll_live_by(&mut self, delta: isize) {
        let live = self.scroll.live();
        self.scroll_live_to(ScrollOffset {
            top: live.top.saturating_add_signed(delta),
            left: live.left,
        });
    }

    /// Scroll the live layer just enough to keep the cursor visible.
    ///
    /// `row` is a line index, `col` a display column.
    pub fn follow_cursor(&mut self, row: usize, col: usize, viewport: Viewport) {
        let mut offset = self.scroll.live();
        if viewport.height > 0 {
            if row < offset.top {
                offset.top = row;
            } else if row >= offset.top + viewport.height {
                offset.top = row + 1 - viewport.height;
            }
        }
        if viewport.width > 0 {
            if col < offset.left {
                offset.left = col;
            } else if col >= offset.left + viewport.width {
                offset.left = col + 1 - viewport.width;
            }
        }
        if offset != self.scroll.live() {
            self.scroll.on_live_scroll(offset);
        }
    }
}
