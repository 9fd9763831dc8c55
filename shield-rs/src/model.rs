//! Fitted classifiers
//!
//! A [`Model`] reads one label off a feature vector. Interpreters exist for
//! the three model families the artifacts are exported from: multinomial and
//! Bernoulli naive Bayes, and binary linear models (logistic regression,
//! linear SVM, SGD).
//!
//! Ties always resolve to the first listed class.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StartupError};
use crate::vectorizer::FeatureVector;
use crate::verdict::Label;

/// Feature vector to label
pub trait Model: Send + Sync {
    /// Deterministic label for a vector of `n_features()` dimensions
    fn predict(&self, features: &FeatureVector) -> Label;

    /// Number of features the model was fitted on
    fn n_features(&self) -> usize;
}

/// Map the artifact's class values onto labels; exactly `0` and `1`, in any order
pub fn resolve_classes(classes: &[i64]) -> Result<[Label; 2]> {
    let labels = match classes {
        [first, second] => [Label::from_class(*first), Label::from_class(*second)],
        _ => {
            return Err(StartupError::InvalidArtifact(format!(
                "expected 2 classes, found {}",
                classes.len()
            )))
        }
    };

    match labels {
        [Some(first), Some(second)] if first != second => Ok([first, second]),
        _ => Err(StartupError::InvalidArtifact(format!(
            "classes must be 0 and 1, found {:?}",
            classes
        ))),
    }
}

fn argmax(labels: &[Label; 2], scores: [f64; 2]) -> Label {
    if scores[1] > scores[0] {
        labels[1]
    } else {
        labels[0]
    }
}

/// Validate per-class rows: two rows of equal, non-zero width with finite values
fn check_rows(name: &str, rows: &[Vec<f64>]) -> Result<usize> {
    if rows.len() != 2 {
        return Err(StartupError::InvalidArtifact(format!(
            "{} has {} rows, expected one per class",
            name,
            rows.len()
        )));
    }

    let width = rows[0].len();
    if width == 0 || rows[1].len() != width {
        return Err(StartupError::InvalidArtifact(format!(
            "{} rows have widths {} and {}",
            name,
            rows[0].len(),
            rows[1].len()
        )));
    }

    if rows.iter().flatten().any(|v| !v.is_finite()) {
        return Err(StartupError::InvalidArtifact(format!(
            "{} contains non-finite values",
            name
        )));
    }

    Ok(width)
}

fn check_prior(prior: &[f64]) -> Result<[f64; 2]> {
    match prior {
        [a, b] if a.is_finite() && b.is_finite() => Ok([*a, *b]),
        _ => Err(StartupError::InvalidArtifact(format!(
            "class_log_prior must hold 2 finite values, found {:?}",
            prior
        ))),
    }
}

/// Fitted naive Bayes parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesParams {
    pub classes: Vec<i64>,
    pub class_log_prior: Vec<f64>,
    /// Per class, log of the feature probabilities
    pub feature_log_prob: Vec<Vec<f64>>,
}

/// Multinomial naive Bayes
#[derive(Debug)]
pub struct MultinomialNb {
    labels: [Label; 2],
    class_log_prior: [f64; 2],
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl MultinomialNb {
    pub fn from_params(params: NaiveBayesParams) -> Result<Self> {
        let labels = resolve_classes(&params.classes)?;
        let class_log_prior = check_prior(&params.class_log_prior)?;
        let n_features = check_rows("feature_log_prob", &params.feature_log_prob)?;

        Ok(Self {
            labels,
            class_log_prior,
            feature_log_prob: params.feature_log_prob,
            n_features,
        })
    }

    /// Joint log likelihood per class, in class order
    pub fn joint_log_likelihood(&self, features: &FeatureVector) -> [f64; 2] {
        [0, 1].map(|c| self.class_log_prior[c] + features.dot(&self.feature_log_prob[c]))
    }
}

impl Model for MultinomialNb {
    fn predict(&self, features: &FeatureVector) -> Label {
        argmax(&self.labels, self.joint_log_likelihood(features))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Fitted Bernoulli naive Bayes parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BernoulliNbParams {
    #[serde(flatten)]
    pub naive_bayes: NaiveBayesParams,
    /// Threshold above which a feature counts as present; `null` when the
    /// input is already binary
    #[serde(default = "default_binarize")]
    pub binarize: Option<f64>,
}

fn default_binarize() -> Option<f64> {
    Some(0.0)
}

/// Bernoulli naive Bayes
///
/// Absent features contribute `log(1 - p)`, so the all-absent likelihood is
/// precomputed per class and present features add `log p - log(1 - p)`.
#[derive(Debug)]
pub struct BernoulliNb {
    labels: [Label; 2],
    class_log_prior: [f64; 2],
    presence_delta: Vec<Vec<f64>>,
    absent_log_prob: [f64; 2],
    binarize: Option<f64>,
    n_features: usize,
}

impl BernoulliNb {
    pub fn from_params(params: BernoulliNbParams) -> Result<Self> {
        let nb = params.naive_bayes;
        let labels = resolve_classes(&nb.classes)?;
        let class_log_prior = check_prior(&nb.class_log_prior)?;
        let n_features = check_rows("feature_log_prob", &nb.feature_log_prob)?;

        if nb.feature_log_prob.iter().flatten().any(|&lp| lp >= 0.0) {
            return Err(StartupError::InvalidArtifact(
                "bernoulli feature probabilities must be below 1".to_string(),
            ));
        }

        let mut presence_delta = Vec::with_capacity(2);
        let mut absent_log_prob = [0.0; 2];
        for (c, row) in nb.feature_log_prob.iter().enumerate() {
            let neg: Vec<f64> = row.iter().map(|lp| (-lp.exp()).ln_1p()).collect();
            absent_log_prob[c] = neg.iter().sum();
            presence_delta.push(row.iter().zip(&neg).map(|(lp, n)| lp - n).collect());
        }

        Ok(Self {
            labels,
            class_log_prior,
            presence_delta,
            absent_log_prob,
            binarize: params.binarize,
            n_features,
        })
    }

    pub fn joint_log_likelihood(&self, features: &FeatureVector) -> [f64; 2] {
        [0, 1].map(|c| {
            let present: f64 = features
                .entries()
                .iter()
                .filter_map(|&(index, value)| {
                    let x = match self.binarize {
                        Some(threshold) if value > threshold => 1.0,
                        Some(_) => 0.0,
                        None => value,
                    };
                    self.presence_delta[c].get(index).map(|d| d * x)
                })
                .sum();
            self.class_log_prior[c] + self.absent_log_prob[c] + present
        })
    }
}

impl Model for BernoulliNb {
    fn predict(&self, features: &FeatureVector) -> Label {
        argmax(&self.labels, self.joint_log_likelihood(features))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

/// Fitted binary linear model parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParams {
    pub classes: Vec<i64>,
    /// A single row of weights
    pub coef: Vec<Vec<f64>>,
    /// A single bias term
    pub intercept: Vec<f64>,
}

/// Binary linear decision function
#[derive(Debug)]
pub struct LinearModel {
    labels: [Label; 2],
    coef: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn from_params(params: LinearParams) -> Result<Self> {
        let labels = resolve_classes(&params.classes)?;

        let coef = match <[Vec<f64>; 1]>::try_from(params.coef) {
            Ok([row]) if !row.is_empty() => row,
            _ => {
                return Err(StartupError::InvalidArtifact(
                    "linear model needs exactly one non-empty coef row".to_string(),
                ))
            }
        };

        let intercept = match params.intercept.as_slice() {
            [b] => *b,
            other => {
                return Err(StartupError::InvalidArtifact(format!(
                    "linear model needs one intercept, found {}",
                    other.len()
                )))
            }
        };

        if !intercept.is_finite() || coef.iter().any(|w| !w.is_finite()) {
            return Err(StartupError::InvalidArtifact(
                "linear model has non-finite weights".to_string(),
            ));
        }

        Ok(Self {
            labels,
            coef,
            intercept,
        })
    }

    /// Signed distance to the decision boundary; positive selects the second class
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        self.intercept + features.dot(&self.coef)
    }
}

impl Model for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Label {
        if self.decision_function(features) > 0.0 {
            self.labels[1]
        } else {
            self.labels[0]
        }
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }
}
