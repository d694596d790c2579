/// Profanity filter for chat messages.
/// Patterns come from configuration: roots match any word starting with the root,
/// exact patterns match whole words only.
use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Raised when a message matches one of the configured patterns
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Obscene word found: {pattern}")]
pub struct ProfanityFound {
    pub pattern: String,
}

#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    patterns: Vec<Regex>,
}

impl ProfanityFilter {
    /// Compile root and exact-word patterns. Entries are regex fragments; matching
    /// is case-insensitive and sees the same letter folding as message text.
    pub fn new<R, W>(roots: R, exact_words: W) -> Result<Self, regex::Error>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let root_patterns = roots
            .into_iter()
            .map(|root| format!(r"\b{}\w*\b", fold_letters(root.as_ref())));
        let exact_patterns = exact_words
            .into_iter()
            .map(|word| format!(r"\b{}\b", fold_letters(word.as_ref())));

        let patterns = root_patterns
            .chain(exact_patterns)
            .map(|pattern| RegexBuilder::new(&pattern).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check text against every pattern. Empty or missing text is always clean.
    pub fn check(&self, text: Option<&str>) -> Result<(), ProfanityFound> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        let normalized = normalize(text);

        match self.patterns.iter().find(|rx| rx.is_match(&normalized)) {
            Some(rx) => Err(ProfanityFound {
                pattern: rx.as_str().to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Lowercase and fold `ё` into `е`
pub fn normalize(text: &str) -> String {
    fold_letters(&text.to_lowercase())
}

fn fold_letters(text: &str) -> String {
    text.replace('ё', "е").replace('Ё', "Е")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn filter() -> ProfanityFilter {
        ProfanityFilter::new(["бляд", "обращ"], ["хер"]).unwrap()
    }

    #[test]
    fn test_root_matches_word_with_suffix() {
        let found = filter().check(Some("ну бляди какие")).unwrap_err();
        assert_eq!(found.pattern, r"\bбляд\w*\b");
    }

    #[test]
    fn test_root_inside_word_is_clean() {
        assert_ok!(filter().check(Some("кровообращение в норме")));
    }

    #[test]
    fn test_exact_word_only() {
        assert_err!(filter().check(Some("иди на хер")));
        assert_ok!(filter().check(Some("херсон")));
    }

    #[test]
    fn test_case_and_yo_folding() {
        let f = ProfanityFilter::new(["ёлк"], Vec::<String>::new()).unwrap();
        assert_err!(f.check(Some("ЕЛКИ палки")));
        assert_err!(f.check(Some("Ёлки")));
        assert_eq!(normalize("ЁЖ"), "еж");
    }

    #[test]
    fn test_pattern_escapes_survive() {
        // `\W` must stay a non-word class, not turn into `\w`
        let f = ProfanityFilter::new(Vec::<String>::new(), [r"a\Wb"]).unwrap();
        assert_err!(f.check(Some("a-b")));
        assert_ok!(f.check(Some("axb")));
    }

    #[test]
    fn test_empty_text_is_clean() {
        assert_ok!(filter().check(Some("")));
        assert_ok!(filter().check(None));
    }

    #[test]
    fn test_no_patterns_is_clean() {
        let f = ProfanityFilter::new(Vec::<String>::new(), Vec::<String>::new()).unwrap();
        assert!(f.is_empty());
        assert_ok!(f.check(Some("anything at all")));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        assert!(ProfanityFilter::new(["(unclosed"], Vec::<String>::new()).is_err());
    }
}
