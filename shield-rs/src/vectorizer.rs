//! Feature vectorization
//!
//! A [`Vectorizer`] maps canonical text onto the fixed feature space the model
//! was fitted on. The only shipped implementation interprets a fitted TF-IDF
//! artifact; vocabulary and weights never change after loading.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, StartupError};
use crate::normalizer::CanonicalText;

/// Fixed-dimension sparse vector with entries sorted by index
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build a vector from `(index, value)` pairs. Pairs are sorted, zero
    /// values and indices outside the dimension are dropped.
    pub fn new(dimension: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = entries
            .into_iter()
            .filter(|(index, value)| *index < dimension && *value != 0.0)
            .collect();
        entries.sort_by_key(|(index, _)| *index);
        entries.dedup_by_key(|(index, _)| *index);

        Self { dimension, entries }
    }

    /// All-zero vector
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Non-zero entries in ascending index order
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product with a dense weight row
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(index, value)| weights.get(*index).map(|w| w * value))
            .sum()
    }
}

/// Canonical text to feature vector
pub trait Vectorizer: Send + Sync {
    /// Map text onto the fitted feature space; unknown tokens contribute nothing
    fn transform(&self, text: &CanonicalText) -> FeatureVector;

    /// Number of features produced
    fn dimension(&self) -> usize;
}

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Fitted TF-IDF parameters as stored in the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfParams {
    /// Term to feature index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index
    #[serde(default)]
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub binary: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_true")]
    pub use_idf: bool,
    /// `null` disables normalization
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    r"\b\w\w+\b".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

impl TfidfParams {
    /// Parameters with default settings over the given vocabulary and IDF
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            lowercase: true,
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            binary: false,
            sublinear_tf: false,
            use_idf: true,
            norm: default_norm(),
        }
    }
}

/// Interpreter for a fitted TF-IDF artifact
#[derive(Debug)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Option<Vec<f64>>,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    binary: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl TfidfVectorizer {
    /// Validate fitted parameters and compile the token pattern
    pub fn from_params(params: TfidfParams) -> Result<Self> {
        let size = params.vocabulary.len();
        if size == 0 {
            return Err(StartupError::InvalidArtifact(
                "vectorizer vocabulary is empty".to_string(),
            ));
        }

        let mut seen = vec![false; size];
        for (term, &index) in &params.vocabulary {
            if index >= size || seen[index] {
                return Err(StartupError::InvalidArtifact(format!(
                    "vocabulary index {} of '{}' is out of range or duplicated (size {})",
                    index, term, size
                )));
            }
            seen[index] = true;
        }

        let idf = if params.use_idf {
            if params.idf.len() != size {
                return Err(StartupError::InvalidArtifact(format!(
                    "idf has {} weights for a vocabulary of {}",
                    params.idf.len(),
                    size
                )));
            }
            if params.idf.iter().any(|w| !w.is_finite()) {
                return Err(StartupError::InvalidArtifact(
                    "idf contains non-finite weights".to_string(),
                ));
            }
            Some(params.idf)
        } else {
            None
        };

        let (min_n, max_n) = params.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(StartupError::InvalidArtifact(format!(
                "invalid ngram_range [{}, {}]",
                min_n, max_n
            )));
        }

        let token_pattern = Regex::new(&params.token_pattern).map_err(|e| {
            StartupError::InvalidArtifact(format!(
                "token_pattern '{}': {}",
                params.token_pattern, e
            ))
        })?;
        if token_pattern.captures_len() > 2 {
            return Err(StartupError::InvalidArtifact(format!(
                "token_pattern '{}' has more than one capture group",
                params.token_pattern
            )));
        }

        Ok(Self {
            vocabulary: params.vocabulary,
            idf,
            lowercase: params.lowercase,
            token_pattern,
            ngram_range: params.ngram_range,
            binary: params.binary,
            sublinear_tf: params.sublinear_tf,
            norm: params.norm,
        })
    }

    /// Terms of a document as the fitted analyzer sees them
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        // With one capture group the group is the token
        let words: Vec<&str> = if self.token_pattern.captures_len() == 2 {
            self.token_pattern
                .captures_iter(&text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect()
        } else {
            self.token_pattern
                .find_iter(&text)
                .map(|m| m.as_str())
                .collect()
        };

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(words.len()) {
            terms.extend(words.windows(n).map(|window| window.join(" ")));
        }
        terms
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }
}

impl Vectorizer for TfidfVectorizer {
    fn transform(&self, text: &CanonicalText) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(text.as_str()) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        for (index, value) in counts.iter_mut() {
            if self.binary {
                *value = 1.0;
            }
            if self.sublinear_tf {
                *value = 1.0 + value.ln();
            }
            if let Some(idf) = &self.idf {
                *value *= idf[*index];
            }
        }

        let scale = match self.norm {
            Some(Norm::L2) => counts.values().map(|v| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => counts.values().map(|v| v.abs()).sum::<f64>(),
            None => 1.0,
        };

        let entries = counts.into_iter().map(|(index, value)| {
            if scale > 0.0 {
                (index, value / scale)
            } else {
                (index, value)
            }
        });

        FeatureVector::new(self.dimension(), entries)
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }
}
