//! Static SQL keyword catalog, grouped by display category.

use super::Category;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Data query keywords.
const QUERY_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "HAVING", "GROUP BY", "ORDER BY", "LIMIT", "OFFSET", "JOIN",
    "INNER JOIN", "LEFT JOIN", "RIGHT JOIN", "FULL JOIN", "CROSS JOIN", "ON", "AS", "WITH",
    "UNION", "ALL", "DISTINCT", "CASE", "WHEN", "THEN", "ELSE", "END", "BETWEEN", "IN",
    "EXISTS", "ANY", "SOME", "ALL",
];

/// Data manipulation keywords.
const MODIFICATION_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "INTO", "VALUES", "SET", "MERGE", "RETURNING", "DEFAULT",
];

/// Data definition keywords.
const DEFINITION_KEYWORDS: &[&str] = &[
    "CREATE", "ALTER", "DROP", "TABLE", "VIEW", "INDEX", "SEQUENCE", "TRIGGER", "PROCEDURE",
    "FUNCTION", "DATABASE", "SCHEMA", "COLUMN", "CONSTRAINT", "PRIMARY KEY", "FOREIGN KEY",
    "REFERENCES", "UNIQUE", "CHECK", "NOT NULL",
];

/// Logical operators and built-in functions.
const OPERATOR_KEYWORDS: &[&str] = &[
    "AND", "OR", "NOT", "IS", "NULL", "LIKE", "ILIKE", "SIMILAR TO", "COUNT", "SUM", "AVG",
    "MIN", "MAX", "COALESCE", "NULLIF", "EXTRACT", "NOW", "CAST", "TO",
];

/// Transaction control keywords.
const TRANSACTION_KEYWORDS: &[&str] = &[
    "BEGIN",
    "COMMIT",
    "ROLLBACK",
    "TRANSACTION",
    "SAVEPOINT",
    "SET TRANSACTION",
    "ISOLATION LEVEL",
];

/// Keyword groups in priority order: the first group containing a keyword wins.
const STANDARD_GROUPS: &[(Category, &[&str])] = &[
    (Category::QueryKeyword, QUERY_KEYWORDS),
    (Category::ModificationKeyword, MODIFICATION_KEYWORDS),
    (Category::DefinitionKeyword, DEFINITION_KEYWORDS),
    (Category::OperatorKeyword, OPERATOR_KEYWORDS),
    (Category::TransactionKeyword, TRANSACTION_KEYWORDS),
];

static STANDARD: LazyLock<Catalog> = LazyLock::new(|| Catalog::from_groups(STANDARD_GROUPS));

/// Immutable keyword lookup table.
///
/// Keys are upper-cased; compound keywords are stored with their words
/// joined by a single space.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: HashMap<String, Category>,
    /// Every proper word prefix of a compound keyword, e.g. "GROUP".
    compound_prefixes: HashSet<String>,
    /// Longest compound keyword, in words.
    max_words: usize,
    /// Keywords per category, in declaration order, duplicates removed.
    by_category: Vec<(Category, Vec<String>)>,
}

impl Catalog {
    /// The built-in SQL catalog.
    pub fn standard() -> &'static Catalog {
        &STANDARD
    }

    /// Build a catalog from priority-ordered keyword groups.
    pub fn from_groups(groups: &[(Category, &[&str])]) -> Self {
        let mut entries = HashMap::new();
        let mut compound_prefixes = HashSet::new();
        let mut max_words = 1;
        let mut by_category: Vec<(Category, Vec<String>)> = Vec::new();

        for (category, keywords) in groups {
            let mut listed: Vec<String> = Vec::new();
            for keyword in keywords.iter() {
                let words: Vec<String> = keyword
                    .split_whitespace()
                    .map(|w| w.to_uppercase())
                    .collect();
                if words.is_empty() {
                    continue;
                }
                max_words = max_words.max(words.len());
                for end in 1..words.len() {
                    compound_prefixes.insert(words[..end].join(" "));
                }
                let key = words.join(" ");
                entries.entry(key.clone()).or_insert(*category);
                if !listed.contains(&key) {
                    listed.push(key);
                }
            }
            match by_category.iter_mut().find(|(c, _)| c == category) {
                Some((_, existing)) => existing.extend(listed),
                None => by_category.push((*category, listed)),
            }
        }

        Self {
            entries,
            compound_prefixes,
            max_words,
            by_category,
        }
    }

    /// Look up a single keyword or a space-joined compound, ignoring case.
    pub fn lookup(&self, text: &str) -> Option<Category> {
        self.entries.get(&text.to_uppercase()).copied()
    }

    /// Look up a sequence of words as one (possibly compound) keyword.
    pub fn lookup_words(&self, words: &[&str]) -> Option<Category> {
        self.entries.get(&normalize(words)).copied()
    }

    /// Whether `words` is the leading part of some longer compound keyword.
    pub fn is_compound_prefix(&self, words: &[&str]) -> bool {
        !self.compound_prefixes.is_empty() && self.compound_prefixes.contains(&normalize(words))
    }

    /// Number of words in the longest keyword.
    pub fn max_compound_words(&self) -> usize {
        self.max_words
    }

    /// Keywords of one category, upper-cased, in declaration order.
    pub fn keywords(&self, category: Category) -> &[String] {
        self.by_category
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, k)| k.as_slice())
            .unwrap_or(&[])
    }
}

fn normalize(words: &[&str]) -> String {
    let mut key = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            key.push(' ');
        }
        key.push_str(&word.to_uppercase());
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.lookup("select"), Some(Category::QueryKeyword));
        assert_eq!(catalog.lookup("SeLeCt"), Some(Category::QueryKeyword));
        assert_eq!(catalog.lookup("users"), None);
    }

    #[test]
    fn test_lookup_uses_full_unicode_uppercase() {
        let catalog = Catalog::standard();
        // U+017F LONG S and U+0131 DOTLESS I upper-case to ASCII S and I
        assert_eq!(catalog.lookup("ſelect"), Some(Category::QueryKeyword));
        assert_eq!(catalog.lookup("lımıt"), Some(Category::QueryKeyword));
        assert_eq!(
            catalog.lookup_words(&["ıſolation", "level"]),
            Some(Category::TransactionKeyword)
        );
    }

    #[test]
    fn test_lookup_each_group() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.lookup("insert"), Some(Category::ModificationKeyword));
        assert_eq!(catalog.lookup("table"), Some(Category::DefinitionKeyword));
        assert_eq!(catalog.lookup("coalesce"), Some(Category::OperatorKeyword));
        assert_eq!(catalog.lookup("savepoint"), Some(Category::TransactionKeyword));
    }

    #[test]
    fn test_lookup_compound() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.lookup_words(&["group", "by"]),
            Some(Category::QueryKeyword)
        );
        assert_eq!(
            catalog.lookup_words(&["Not", "Null"]),
            Some(Category::DefinitionKeyword)
        );
        assert_eq!(
            catalog.lookup_words(&["set", "transaction"]),
            Some(Category::TransactionKeyword)
        );
        assert_eq!(catalog.lookup_words(&["group", "name"]), None);
    }

    #[test]
    fn test_single_word_of_compound_is_not_a_keyword() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.lookup("GROUP"), None);
        assert_eq!(catalog.lookup("PRIMARY"), None);
        assert!(catalog.is_compound_prefix(&["group"]));
        assert!(catalog.is_compound_prefix(&["Isolation"]));
        assert!(!catalog.is_compound_prefix(&["select"]));
    }

    #[test]
    fn test_priority_first_group_wins() {
        let groups: [(Category, &[&str]); 2] = [
            (Category::TransactionKeyword, &["BEGIN", "END"]),
            (Category::QueryKeyword, &["END", "SELECT"]),
        ];
        let catalog = Catalog::from_groups(&groups);
        assert_eq!(catalog.lookup("end"), Some(Category::TransactionKeyword));
        assert_eq!(catalog.lookup("select"), Some(Category::QueryKeyword));
    }

    #[test]
    fn test_duplicate_keyword_listed_once() {
        let catalog = Catalog::standard();
        let all = catalog
            .keywords(Category::QueryKeyword)
            .iter()
            .filter(|k| k.as_str() == "ALL")
            .count();
        assert_eq!(all, 1);
        assert_eq!(catalog.max_compound_words(), 2);
    }

    #[test]
    fn test_set_is_modification_but_set_transaction_is_transaction() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.lookup("set"), Some(Category::ModificationKeyword));
        assert_eq!(
            catalog.lookup("set transaction"),
            Some(Category::TransactionKeyword)
        );
    }
}
