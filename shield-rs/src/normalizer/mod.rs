//! Text normalization
//!
//! Converts a raw message into the canonical token string the vectorizer was
//! fitted on. The stage order is part of the artifact contract: reordering
//! any two stages silently changes the features the model sees.
//!
//! 1. Treebank word segmentation
//! 2. rejoin with single spaces
//! 3. drop ASCII punctuation characters
//! 4. drop ASCII digits
//! 5. split on whitespace, lowercase, drop stopwords
//! 6. stem
//! 7. join with single spaces
//!
//! Stages 3 and 4 work on characters of the rejoined string, not on tokens,
//! so fragments around a removed character may merge (`fr33ee` -> `free`).

pub mod porter;
pub mod stopwords;
pub mod tokenize;

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::config::LanguageConfig;
use crate::error::Result;

pub use porter::PorterStemmer;
pub use stopwords::StopwordSet;
pub use tokenize::WordTokenizer;

/// Stemming algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemmerKind {
    /// Porter (1980) with NLTK extensions
    #[default]
    Porter,
    /// Snowball English (Porter2)
    Snowball,
}

/// Rule-based stemmer selected at startup
pub enum TokenStemmer {
    Porter(PorterStemmer),
    Snowball(Stemmer),
}

impl TokenStemmer {
    pub fn new(kind: StemmerKind) -> Self {
        match kind {
            StemmerKind::Porter => Self::Porter(PorterStemmer::new()),
            StemmerKind::Snowball => Self::Snowball(Stemmer::create(Algorithm::English)),
        }
    }

    pub fn kind(&self) -> StemmerKind {
        match self {
            Self::Porter(_) => StemmerKind::Porter,
            Self::Snowball(_) => StemmerKind::Snowball,
        }
    }

    pub fn stem<'a>(&self, token: &'a str) -> Cow<'a, str> {
        match self {
            Self::Porter(stemmer) => Cow::Owned(stemmer.stem(token)),
            Self::Snowball(stemmer) => stemmer.stem(token),
        }
    }
}

impl fmt::Debug for TokenStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenStemmer").field(&self.kind()).finish()
    }
}

/// Normalized, space-separated stem sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalText(String);

impl CanonicalText {
    /// Wrap text that is already canonical (lowercase stems, single spaces)
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Linguistic resources, resolved once at startup and immutable afterwards
#[derive(Debug)]
pub struct NormalizerConfig {
    pub tokenizer: WordTokenizer,
    pub stopwords: StopwordSet,
    pub stemmer: TokenStemmer,
}

impl NormalizerConfig {
    /// Bundled English resources with the given stemmer
    pub fn english(stemmer: StemmerKind) -> Result<Self> {
        Ok(Self {
            tokenizer: WordTokenizer::new()?,
            stopwords: StopwordSet::english(),
            stemmer: TokenStemmer::new(stemmer),
        })
    }

    /// Resources as configured; a configured stopword file must exist
    pub fn from_language(config: &LanguageConfig) -> Result<Self> {
        let stopwords = match &config.stopwords_path {
            Some(path) => StopwordSet::from_file(path)?,
            None => StopwordSet::english(),
        };

        Ok(Self {
            tokenizer: WordTokenizer::new()?,
            stopwords,
            stemmer: TokenStemmer::new(config.stemmer),
        })
    }
}

/// Pure function of (raw text, config) to canonical text
#[derive(Debug)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    pub fn normalize(&self, raw: &str) -> CanonicalText {
        let rejoined = self.config.tokenizer.tokenize(raw).join(" ");
        let without_punctuation = strip_punctuation(&rejoined);
        let without_digits = strip_digits(&without_punctuation);

        let stems: Vec<String> = without_digits
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|token| !self.config.stopwords.contains(token))
            .map(|token| self.config.stemmer.stem(&token).into_owned())
            .collect();

        CanonicalText(stems.join(" "))
    }
}

/// Remove every ASCII punctuation character (``!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~``)
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Remove every ASCII digit
pub fn strip_digits(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(NormalizerConfig::english(StemmerKind::Porter).unwrap())
    }

    #[test]
    fn test_empty_and_blank_input() {
        let normalizer = normalizer();
        assert!(normalizer.normalize("").is_empty());
        assert!(normalizer.normalize("  \n\t ").is_empty());
    }

    #[test]
    fn test_only_filtered_content_yields_empty_text() {
        let normalizer = normalizer();
        assert!(normalizer.normalize("!!! ... 123 ?").is_empty());
        assert!(normalizer.normalize("The IS a").is_empty());
    }

    #[test]
    fn test_order_preserved_and_lowercased() {
        let normalizer = normalizer();
        // "now" is a stopword
        assert_eq!(normalizer.normalize("free WIN now").as_str(), "free win");
        assert_eq!(normalizer.normalize("WIN free").as_str(), "win free");
    }

    #[test]
    fn test_digits_and_punctuation_removed() {
        let normalizer = normalizer();
        let canonical = normalizer.normalize("Call 999-000 NOW!!!");
        assert!(!canonical.as_str().chars().any(|c| c.is_ascii_digit()));
        assert!(!canonical.as_str().chars().any(|c| c.is_ascii_punctuation()));
        assert_eq!(canonical.as_str(), "call");
    }

    #[test]
    fn test_digits_removed_before_stemming() {
        let normalizer = normalizer();
        assert_eq!(normalizer.normalize("fr33 entry").as_str(), "fr entri");
        // removed characters merge the surrounding fragments
        assert_eq!(normalizer.normalize("fr33ee").as_str(), "free");
    }

    #[test]
    fn test_stopwords_removed_regardless_of_case() {
        let normalizer = normalizer();
        let canonical = normalizer.normalize("THE offer IS a Great one");
        let tokens: Vec<&str> = canonical.tokens().collect();
        assert_eq!(tokens, vec!["offer", "great", "one"]);
    }

    #[test]
    fn test_clitics_become_stopwords() {
        let normalizer = normalizer();
        assert_eq!(normalizer.normalize("Don't worry, I'm fine").as_str(), "nt worri fine");
        assert_eq!(
            normalizer.normalize("I cannot believe it's John's. He'll come").as_str(),
            "believ john come"
        );
    }

    #[test]
    fn test_typical_spam_message() {
        let normalizer = normalizer();
        let canonical = normalizer.normalize(
            "WINNER!! As a valued network customer you have been selected to receivea £900 prize reward! \
             To claim call 09061701461. Claim code KL341. Valid 12 hours only.",
        );
        assert_eq!(
            canonical.as_str(),
            "winner valu network custom select receivea £ prize reward claim call claim code kl valid hour"
        );
    }

    #[test]
    fn test_canonical_input_is_a_fixed_point() {
        let normalizer = normalizer();
        let canonical = normalizer.normalize("free entri win prize call txt");
        assert_eq!(canonical.as_str(), "free entri win prize call txt");
        assert_eq!(normalizer.normalize(canonical.as_str()), canonical);
    }

    #[test]
    fn test_deterministic() {
        let normalizer = normalizer();
        let text = "U dun say so early hor... U c already then say...";
        assert_eq!(normalizer.normalize(text), normalizer.normalize(text));
        assert_eq!(normalizer.normalize(text).as_str(), "u dun say earli hor u c alreadi say");
    }

    #[test]
    fn test_snowball_stemmer() {
        let normalizer = Normalizer::new(NormalizerConfig::english(StemmerKind::Snowball).unwrap());
        assert_eq!(normalizer.normalize("running cats").as_str(), "run cat");
    }

    #[test]
    fn test_custom_stopwords() {
        let config = NormalizerConfig {
            tokenizer: WordTokenizer::new().unwrap(),
            stopwords: StopwordSet::from_words(["free"]),
            stemmer: TokenStemmer::new(StemmerKind::Porter),
        };
        let normalizer = Normalizer::new(config);
        assert_eq!(normalizer.normalize("free the prize").as_str(), "the prize");
    }

    #[test]
    fn test_strip_helpers() {
        assert_eq!(strip_punctuation("a-b_c! d'e £"), "abc de £");
        assert_eq!(strip_digits("ab12c 3"), "abc ");
    }
}
