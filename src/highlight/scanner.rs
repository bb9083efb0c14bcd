//! Single-pass lexical scanner for one line of SQL.
//!
//! The scanner never looks past the end of the line: comments and string
//! literals cannot span lines, so every line is scanned independently.

use super::catalog::Catalog;

/// Where a `--` sequence is allowed to open a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentPolicy {
    /// `--` outside a string literal opens a comment at any position.
    #[default]
    Anywhere,
    /// Only a line whose first non-blank characters are `--` is a comment.
    LineStart,
}

/// Kind of a raw range produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// From `--` to end of line.
    Comment,
    /// Quoted literal, including both quotes (or running to end of line).
    String,
    /// A run of word characters, or a compound keyword including its inner whitespace.
    Word,
    /// Whitespace and punctuation between the other ranges.
    Filler,
}

/// A raw `[start, end)` byte range of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRange {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// What the range contains.
    pub kind: RawKind,
}

/// Split `line` into ordered, non-overlapping, gap-free raw ranges.
pub fn scan_line(line: &str, catalog: &Catalog, policy: CommentPolicy) -> Vec<RawRange> {
    if line.is_empty() {
        return Vec::new();
    }
    if policy == CommentPolicy::LineStart && line.trim_start().starts_with("--") {
        return vec![RawRange {
            start: 0,
            end: line.len(),
            kind: RawKind::Comment,
        }];
    }
    let mut scanner = Scanner::new(line, catalog, policy);
    scanner.run();
    scanner.ranges
}

/// Whether `c` can be part of a word.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

struct Scanner<'a> {
    input: &'a str,
    catalog: &'a Catalog,
    policy: CommentPolicy,
    pos: usize,
    /// Start of the pending filler run, if any.
    filler_start: Option<usize>,
    ranges: Vec<RawRange>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str, catalog: &'a Catalog, policy: CommentPolicy) -> Self {
        Self {
            input,
            catalog,
            policy,
            pos: 0,
            filler_start: None,
            ranges: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn run(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\'' || c == '"' {
                self.scan_string(c);
            } else if self.policy == CommentPolicy::Anywhere && self.input[self.pos..].starts_with("--")
            {
                self.push(self.pos, self.input.len(), RawKind::Comment);
                self.pos = self.input.len();
            } else if is_word_char(c) {
                self.scan_word();
            } else {
                if self.filler_start.is_none() {
                    self.filler_start = Some(self.pos);
                }
                self.pos += c.len_utf8();
            }
        }
        self.flush_filler();
    }

    /// Record a range, closing any pending filler run first.
    fn push(&mut self, start: usize, end: usize, kind: RawKind) {
        self.flush_filler();
        self.ranges.push(RawRange { start, end, kind });
    }

    fn flush_filler(&mut self) {
        if let Some(start) = self.filler_start.take()
            && start < self.pos
        {
            self.ranges.push(RawRange {
                start,
                end: self.pos,
                kind: RawKind::Filler,
            });
        }
    }

    /// Non-greedy match up to the next identical quote; unterminated runs to end of line.
    fn scan_string(&mut self, quote: char) {
        let start = self.pos;
        let body = start + quote.len_utf8();
        let end = match self.input[body..].find(quote) {
            Some(offset) => body + offset + quote.len_utf8(),
            None => self.input.len(),
        };
        self.push(start, end, RawKind::String);
        self.pos = end;
    }

    fn scan_word(&mut self) {
        let start = self.pos;
        let mut end = word_end(self.input, start);

        if self.input[start..end].bytes().all(|b| b.is_ascii_digit())
            && let Some(fraction_end) = fraction_end(self.input, end)
        {
            end = word_end(self.input, fraction_end);
        }

        if let Some(compound_end) = self.compound_end(start, end) {
            end = compound_end;
        }

        self.push(start, end, RawKind::Word);
        self.pos = end;
    }

    /// If the word at `[start, end)` opens a compound keyword, return where it ends.
    fn compound_end(&self, start: usize, end: usize) -> Option<usize> {
        let max_words = self.catalog.max_compound_words();
        if max_words < 2 {
            return None;
        }
        let mut words = vec![&self.input[start..end]];
        let mut cursor = end;
        let mut matched = None;

        while words.len() < max_words && self.catalog.is_compound_prefix(&words) {
            let gap_end = cursor
                + self.input[cursor..]
                    .bytes()
                    .take_while(|b| *b == b' ' || *b == b'\t')
                    .count();
            if gap_end == cursor {
                break;
            }
            let next_end = word_end(self.input, gap_end);
            if next_end == gap_end {
                break;
            }
            words.push(&self.input[gap_end..next_end]);
            cursor = next_end;
            if self.catalog.lookup_words(&words).is_some() {
                matched = Some(cursor);
            }
        }
        matched
    }
}

/// End of the run of word characters starting at `start`.
fn word_end(input: &str, start: usize) -> usize {
    input[start..]
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map_or(input.len(), |(i, _)| start + i)
}

/// If `.` followed by ASCII digits sits at `pos`, return the end of those digits.
fn fraction_end(input: &str, pos: usize) -> Option<usize> {
    let rest = input[pos..].strip_prefix('.')?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    (digits > 0).then_some(pos + 1 + digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<(RawKind, &str)> {
        scan_line(line, Catalog::standard(), CommentPolicy::Anywhere)
            .into_iter()
            .map(|r| (r.kind, &line[r.start..r.end]))
            .collect()
    }

    #[test]
    fn test_scan_empty() {
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_scan_words_and_filler() {
        assert_eq!(
            kinds("SELECT a, b"),
            vec![
                (RawKind::Word, "SELECT"),
                (RawKind::Filler, " "),
                (RawKind::Word, "a"),
                (RawKind::Filler, ", "),
                (RawKind::Word, "b"),
            ]
        );
    }

    #[test]
    fn test_scan_string_hides_comment_marker() {
        assert_eq!(
            kinds("SELECT 'a--b' FROM t"),
            vec![
                (RawKind::Word, "SELECT"),
                (RawKind::Filler, " "),
                (RawKind::String, "'a--b'"),
                (RawKind::Filler, " "),
                (RawKind::Word, "FROM"),
                (RawKind::Filler, " "),
                (RawKind::Word, "t"),
            ]
        );
    }

    #[test]
    fn test_scan_comment_mid_line() {
        assert_eq!(
            kinds("SELECT 1 -- it's fine"),
            vec![
                (RawKind::Word, "SELECT"),
                (RawKind::Filler, " "),
                (RawKind::Word, "1"),
                (RawKind::Filler, " "),
                (RawKind::Comment, "-- it's fine"),
            ]
        );
    }

    #[test]
    fn test_scan_unterminated_string_runs_to_end() {
        assert_eq!(
            kinds("WHERE name = 'bob"),
            vec![
                (RawKind::Word, "WHERE"),
                (RawKind::Filler, " "),
                (RawKind::Word, "name"),
                (RawKind::Filler, " = "),
                (RawKind::String, "'bob"),
            ]
        );
    }

    #[test]
    fn test_scan_mixed_quotes_do_not_pair() {
        assert_eq!(
            kinds(r#""it's" 'say "hi"'"#),
            vec![
                (RawKind::String, r#""it's""#),
                (RawKind::Filler, " "),
                (RawKind::String, r#"'say "hi"'"#),
            ]
        );
    }

    #[test]
    fn test_scan_compound_keyword() {
        assert_eq!(
            kinds("GROUP BY name"),
            vec![
                (RawKind::Word, "GROUP BY"),
                (RawKind::Filler, " "),
                (RawKind::Word, "name"),
            ]
        );
    }

    #[test]
    fn test_scan_compound_keyword_with_wide_gap() {
        assert_eq!(
            kinds("order \t by x"),
            vec![
                (RawKind::Word, "order \t by"),
                (RawKind::Filler, " "),
                (RawKind::Word, "x"),
            ]
        );
    }

    #[test]
    fn test_scan_compound_prefix_without_match() {
        assert_eq!(
            kinds("GROUP name"),
            vec![
                (RawKind::Word, "GROUP"),
                (RawKind::Filler, " "),
                (RawKind::Word, "name"),
            ]
        );
    }

    #[test]
    fn test_scan_decimal_is_one_word() {
        assert_eq!(
            kinds("3.14+x.y"),
            vec![
                (RawKind::Word, "3.14"),
                (RawKind::Filler, "+"),
                (RawKind::Word, "x"),
                (RawKind::Filler, "."),
                (RawKind::Word, "y"),
            ]
        );
    }

    #[test]
    fn test_scan_trailing_dot_not_absorbed() {
        assert_eq!(
            kinds("10."),
            vec![(RawKind::Word, "10"), (RawKind::Filler, ".")]
        );
    }

    #[test]
    fn test_scan_line_start_policy() {
        let catalog = Catalog::standard();
        let whole = scan_line("  -- note", catalog, CommentPolicy::LineStart);
        assert_eq!(whole.len(), 1);
        assert_eq!(whole[0].kind, RawKind::Comment);

        let mid = scan_line("SELECT 1 -- note", catalog, CommentPolicy::LineStart);
        assert!(mid.iter().all(|r| r.kind != RawKind::Comment));
    }

    #[test]
    fn test_scan_multibyte_characters() {
        let line = "SELECT 'héllo', naïve → x";
        let ranges = scan_line(line, Catalog::standard(), CommentPolicy::Anywhere);
        let rebuilt: String = ranges.iter().map(|r| &line[r.start..r.end]).collect();
        assert_eq!(rebuilt, line);
        assert!(ranges.iter().any(|r| &line[r.start..r.end] == "naïve"));
    }
}
