//! English stopword list
//!
//! The bundled list is the standard 179-word English list shipped with NLTK.
//! Entries with apostrophes never match after punctuation removal but are
//! kept so the list stays identical to the one the artifacts were built with.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, StartupError};

pub const ENGLISH: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're",
    "you've", "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he",
    "him", "his", "himself", "she", "she's", "her", "hers", "herself", "it", "it's",
    "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "that'll", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do",
    "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because",
    "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below",
    "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
    "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some", "such",
    "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s",
    "t", "can", "will", "just", "don", "don't", "should", "should've", "now", "d",
    "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't",
    "didn", "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't",
    "haven", "haven't", "isn", "isn't", "ma", "mightn", "mightn't", "mustn",
    "mustn't", "needn", "needn't", "shan", "shan't", "shouldn", "shouldn't", "wasn",
    "wasn't", "weren", "weren't", "won", "won't", "wouldn", "wouldn't",
];

/// Immutable set of lowercase stopwords
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// The bundled English list
    pub fn english() -> Self {
        Self::from_words(ENGLISH.iter().copied())
    }

    /// Build a set from arbitrary words; entries are lowercased and trimmed
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Self { words }
    }

    /// Load a list with one word per line. Blank lines are ignored; a
    /// missing or empty file is a startup error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StartupError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let set = Self::from_words(content.lines());
        if set.is_empty() {
            return Err(StartupError::Resource(format!(
                "stopword list {} is empty",
                path.display()
            )));
        }

        Ok(set)
    }

    /// Check a token, which must already be lowercase
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_english_list() {
        let set = StopwordSet::english();
        assert_eq!(set.len(), 179);
        for word in ["the", "is", "a", "now", "s", "t", "don"] {
            assert!(set.contains(word), "{} should be a stopword", word);
        }
        assert!(!set.contains("free"));
        assert!(!set.contains("win"));
        assert!(!set.contains("nt"));
    }

    #[test]
    fn test_from_words_lowercases() {
        let set = StopwordSet::from_words(["The", "  IS ", ""]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("the"));
        assert!(set.contains("is"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "lol\n\nomg\n").unwrap();

        let set = StopwordSet::from_file(file.path()).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("omg"));
        assert!(!set.contains("the"));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = StopwordSet::from_file(file.path());
        assert!(matches!(result, Err(StartupError::Resource(_))));
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let result = StopwordSet::from_file(Path::new("/nonexistent/stopwords.txt"));
        assert!(matches!(result, Err(StartupError::Io { .. })));
    }
}
