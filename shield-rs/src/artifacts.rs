//! Artifact loading
//!
//! The vectorizer and the model are persisted as JSON documents carrying a
//! `format_version` and a `kind` tag. Both are loaded once at startup and
//! must agree on the feature dimension; any failure aborts startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ArtifactConfig;
use crate::error::{Result, StartupError};
use crate::model::{
    BernoulliNb, BernoulliNbParams, LinearModel, LinearParams, Model, MultinomialNb,
    NaiveBayesParams,
};
use crate::vectorizer::{TfidfParams, TfidfVectorizer, Vectorizer};

/// Artifact layout version understood by this build
pub const FORMAT_VERSION: u32 = 1;

/// Vectorizer artifact, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorizerArtifact {
    Tfidf(TfidfParams),
}

impl VectorizerArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tfidf(_) => "tfidf",
        }
    }

    pub fn build(self) -> Result<Arc<dyn Vectorizer>> {
        match self {
            Self::Tfidf(params) => Ok(Arc::new(TfidfVectorizer::from_params(params)?)),
        }
    }
}

/// Model artifact, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    MultinomialNb(NaiveBayesParams),
    BernoulliNb(BernoulliNbParams),
    Linear(LinearParams),
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MultinomialNb(_) => "multinomial_nb",
            Self::BernoulliNb(_) => "bernoulli_nb",
            Self::Linear(_) => "linear",
        }
    }

    pub fn build(self) -> Result<Arc<dyn Model>> {
        match self {
            Self::MultinomialNb(params) => Ok(Arc::new(MultinomialNb::from_params(params)?)),
            Self::BernoulliNb(params) => Ok(Arc::new(BernoulliNb::from_params(params)?)),
            Self::Linear(params) => Ok(Arc::new(LinearModel::from_params(params)?)),
        }
    }
}

/// Read a JSON artifact, checking its format version before its layout
fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| StartupError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| StartupError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

    let found = value
        .get("format_version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| {
            StartupError::InvalidArtifact(format!(
                "{} has no numeric format_version",
                path.display()
            ))
        })?;

    if found != u64::from(FORMAT_VERSION) {
        return Err(StartupError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: u32::try_from(found).unwrap_or(u32::MAX),
            expected: FORMAT_VERSION,
        });
    }

    serde_json::from_value(value).map_err(|e| StartupError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load and validate a vectorizer artifact
pub fn load_vectorizer(path: &Path) -> Result<Arc<dyn Vectorizer>> {
    let artifact: VectorizerArtifact = read_document(path)?;
    debug!("Vectorizer artifact {} is of kind {}", path.display(), artifact.kind());

    let vectorizer = artifact.build()?;
    info!(
        "Loaded vectorizer from {} ({} features)",
        path.display(),
        vectorizer.dimension()
    );
    Ok(vectorizer)
}

/// Load and validate a model artifact
pub fn load_model(path: &Path) -> Result<Arc<dyn Model>> {
    let artifact: ModelArtifact = read_document(path)?;
    let kind = artifact.kind();

    let model = artifact.build()?;
    info!(
        "Loaded {} model from {} ({} features)",
        kind,
        path.display(),
        model.n_features()
    );
    Ok(model)
}

/// Vectorizer and model fitted together
#[derive(Clone)]
pub struct Artifacts {
    pub vectorizer: Arc<dyn Vectorizer>,
    pub model: Arc<dyn Model>,
}

impl Artifacts {
    /// Load both artifacts; nothing is returned unless both load and agree
    pub fn load(config: &ArtifactConfig) -> Result<Self> {
        let vectorizer = load_vectorizer(&config.vectorizer_path)?;
        let model = load_model(&config.model_path)?;

        if vectorizer.dimension() != model.n_features() {
            return Err(StartupError::DimensionMismatch {
                vectorizer: vectorizer.dimension(),
                model: model.n_features(),
            });
        }

        Ok(Self { vectorizer, model })
    }
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("dimension", &self.vectorizer.dimension())
            .field("n_features", &self.model.n_features())
            .finish()
    }
}
