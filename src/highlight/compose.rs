//! Merge scanner ranges and word categories into final line spans.

use super::classify::classify_word;
use super::scanner::{CommentPolicy, RawKind, scan_line};
use super::{Catalog, Category, LineSpans, Span};

/// Produce the spans of one line.
///
/// The result is ordered, gap-free and covers exactly `[0, line.len())`.
/// Adjacent spans of the same category are coalesced.
pub fn compose_line(line: &str, catalog: &Catalog, policy: CommentPolicy) -> LineSpans {
    let mut spans: LineSpans = Vec::new();
    for range in scan_line(line, catalog, policy) {
        let category = match range.kind {
            RawKind::Comment => Category::Comment,
            RawKind::String => Category::String,
            RawKind::Filler => Category::Plain,
            RawKind::Word => classify_word(&line[range.start..range.end], catalog),
        };
        match spans.last_mut() {
            Some(last) if last.category == category && last.end == range.start => {
                last.end = range.end;
            }
            _ => spans.push(Span::new(range.start, range.end, category)),
        }
    }
    debug_assert!(covers(line, &spans));
    spans
}

/// Produce the spans of every line of a document, split on `\n`.
///
/// An empty document has no lines.
pub fn compose_document(text: &str, catalog: &Catalog, policy: CommentPolicy) -> Vec<LineSpans> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| compose_line(line, catalog, policy))
        .collect()
}

/// Rebuild a document from its lines and spans.
pub fn reconstruct(text: &str, document: &[LineSpans]) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, (line, spans)) in text.split('\n').zip(document).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for span in spans {
            out.push_str(span.text(line));
        }
    }
    out
}

/// Whether `spans` partition `line` exactly.
fn covers(line: &str, spans: &[Span]) -> bool {
    let mut expected = 0;
    for span in spans {
        if span.start != expected || span.is_empty() {
            return false;
        }
        expected = span.end;
    }
    expected == line.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> LineSpans {
        compose_line(text, Catalog::standard(), CommentPolicy::Anywhere)
    }

    #[test]
    fn test_compose_whole_line_comment() {
        assert_eq!(
            line("-- drop everything"),
            vec![Span::new(0, 18, Category::Comment)]
        );
    }

    #[test]
    fn test_compose_coalesces_plain() {
        let spans = line("a, b");
        assert_eq!(spans, vec![Span::new(0, 4, Category::Plain)]);
    }

    #[test]
    fn test_compose_adjacent_strings_coalesce() {
        let spans = line("'it''s'");
        assert_eq!(spans, vec![Span::new(0, 7, Category::String)]);
    }

    #[test]
    fn test_compose_keywords_stay_separate() {
        let text = "NOT NULL DEFAULT 0";
        let spans = line(text);
        let tagged: Vec<(Category, &str)> =
            spans.iter().map(|s| (s.category, s.text(text))).collect();
        assert_eq!(
            tagged,
            vec![
                (Category::DefinitionKeyword, "NOT NULL"),
                (Category::Plain, " "),
                (Category::ModificationKeyword, "DEFAULT"),
                (Category::Plain, " "),
                (Category::Number, "0"),
            ]
        );
    }

    #[test]
    fn test_compose_document_round_trip() {
        let text = "CREATE TABLE t (\r\n  id INT PRIMARY KEY -- key\n);\n";
        let document = compose_document(text, Catalog::standard(), CommentPolicy::Anywhere);
        assert_eq!(document.len(), 4);
        assert!(document[3].is_empty());
        assert_eq!(reconstruct(text, &document), text);
    }

    #[test]
    fn test_compose_document_empty() {
        assert!(compose_document("", Catalog::standard(), CommentPolicy::Anywhere).is_empty());
    }

    #[test]
    fn test_covers_rejects_gaps() {
        assert!(covers("ab", &[Span::new(0, 2, Category::Plain)]));
        assert!(!covers("ab", &[Span::new(0, 1, Category::Plain)]));
        assert!(!covers(
            "ab",
            &[
                Span::new(0, 1, Category::Plain),
                Span::new(0, 2, Category::Plain)
            ]
        ));
    }
}
