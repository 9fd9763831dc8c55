//! Classification pipeline
//!
//! raw text -> [`Normalizer`] -> [`Vectorizer`] -> [`Model`] -> [`Verdict`]

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::artifacts::Artifacts;
use crate::config::ShieldConfig;
use crate::error::{Result, StartupError, ValidationError};
use crate::model::Model;
use crate::normalizer::{CanonicalText, Normalizer, NormalizerConfig};
use crate::vectorizer::Vectorizer;
use crate::verdict::Verdict;

/// Spam classifier over one set of immutable artifacts
pub struct SpamClassifier {
    normalizer: Normalizer,
    vectorizer: Arc<dyn Vectorizer>,
    model: Arc<dyn Model>,
}

impl SpamClassifier {
    /// Assemble a classifier; the vectorizer and model must agree on the
    /// number of features
    pub fn new(
        normalizer: Normalizer,
        vectorizer: Arc<dyn Vectorizer>,
        model: Arc<dyn Model>,
    ) -> Result<Self> {
        if vectorizer.dimension() != model.n_features() {
            return Err(StartupError::DimensionMismatch {
                vectorizer: vectorizer.dimension(),
                model: model.n_features(),
            });
        }

        Ok(Self {
            normalizer,
            vectorizer,
            model,
        })
    }

    /// Resolve linguistic resources and load both artifacts from configuration
    pub fn load(config: &ShieldConfig) -> Result<Self> {
        let normalizer_config = NormalizerConfig::from_language(&config.language)?;
        info!(
            "Normalizer ready: {:?} stemmer, {} stopwords",
            normalizer_config.stemmer.kind(),
            normalizer_config.stopwords.len()
        );

        let artifacts = Artifacts::load(&config.artifacts)?;

        Self::new(
            Normalizer::new(normalizer_config),
            artifacts.vectorizer,
            artifacts.model,
        )
    }

    /// Classify one message. Blank input is rejected before normalization.
    pub fn classify(&self, raw: &str) -> std::result::Result<Verdict, ValidationError> {
        if raw.trim().is_empty() {
            warn!("Rejected blank message");
            return Err(ValidationError::EmptyMessage);
        }

        let canonical = self.normalizer.normalize(raw);
        let features = self.vectorizer.transform(&canonical);
        let label = self.model.predict(&features);

        debug!(
            tokens = canonical.tokens().count(),
            active_features = features.nnz(),
            label = %label,
            "Classified message"
        );

        Ok(Verdict::from_label(label))
    }

    /// Canonical form of a message, as the vectorizer sees it
    pub fn normalize(&self, raw: &str) -> CanonicalText {
        self.normalizer.normalize(raw)
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn vectorizer(&self) -> &Arc<dyn Vectorizer> {
        &self.vectorizer
    }

    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::StemmerKind;
    use crate::vectorizer::FeatureVector;
    use crate::verdict::Label;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and flags any vector with a feature set
    struct CountingModel {
        calls: AtomicUsize,
        n_features: usize,
    }

    impl Model for CountingModel {
        fn predict(&self, features: &FeatureVector) -> Label {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if features.is_zero() {
                Label::NotSpam
            } else {
                Label::Spam
            }
        }

        fn n_features(&self) -> usize {
            self.n_features
        }
    }

    /// One feature, set when the text contains "free"
    struct KeywordVectorizer;

    impl Vectorizer for KeywordVectorizer {
        fn transform(&self, text: &CanonicalText) -> FeatureVector {
            if text.tokens().any(|t| t == "free") {
                FeatureVector::new(1, vec![(0, 1.0)])
            } else {
                FeatureVector::zeros(1)
            }
        }

        fn dimension(&self) -> usize {
            1
        }
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(NormalizerConfig::english(StemmerKind::Porter).unwrap())
    }

    fn classifier(model: Arc<CountingModel>) -> SpamClassifier {
        SpamClassifier::new(normalizer(), Arc::new(KeywordVectorizer), model).unwrap()
    }

    fn counting_model(n_features: usize) -> Arc<CountingModel> {
        Arc::new(CountingModel {
            calls: AtomicUsize::new(0),
            n_features,
        })
    }

    #[test]
    fn test_classify() {
        let classifier = classifier(counting_model(1));

        let verdict = classifier.classify("FREE entry!!!").unwrap();
        assert_eq!(verdict.label, Label::Spam);
        assert_eq!(verdict.rationale, Label::Spam.rationale());

        let verdict = classifier.classify("See you at lunch").unwrap();
        assert_eq!(verdict.label, Label::NotSpam);
    }

    #[test]
    fn test_blank_input_never_reaches_model() {
        let model = counting_model(1);
        let classifier = classifier(model.clone());

        assert_eq!(classifier.classify(""), Err(ValidationError::EmptyMessage));
        assert_eq!(classifier.classify("  \n\t"), Err(ValidationError::EmptyMessage));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stopword_only_input_is_classified() {
        let model = counting_model(1);
        let classifier = classifier(model.clone());

        let verdict = classifier.classify("the and of").unwrap();
        assert_eq!(verdict.label, Label::NotSpam);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = SpamClassifier::new(normalizer(), Arc::new(KeywordVectorizer), counting_model(3));
        assert!(matches!(
            result,
            Err(StartupError::DimensionMismatch { vectorizer: 1, model: 3 })
        ));
    }

    #[test]
    fn test_deterministic() {
        let classifier = classifier(counting_model(1));
        let message = "Free entry in 2 a wkly comp to win FA Cup final tkts";
        assert_eq!(classifier.classify(message), classifier.classify(message));
        assert_eq!(classifier.normalize(message), classifier.normalize(message));
    }
}
