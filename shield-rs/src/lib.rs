//! shield-rs: SMS spam classifier
//!
//! Classifies a short text message as spam or legitimate using a fitted
//! vectorizer and model exported as JSON artifacts.
//!
//! # Pipeline
//!
//! - Normalization: Treebank word segmentation, punctuation and digit
//!   removal, English stopwords, Porter (or Snowball) stemming
//! - Vectorization: TF-IDF over the fitted vocabulary
//! - Classification: multinomial/Bernoulli naive Bayes or a linear model
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! listen_addr = "127.0.0.1:8501"
//!
//! [artifacts]
//! vectorizer_path = "artifacts/vectorizer.json"
//! model_path = "artifacts/model.json"
//!
//! [language]
//! stemmer = "porter"
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

pub mod api;
pub mod artifacts;
pub mod classifier;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalizer;
pub mod server;
pub mod vectorizer;
pub mod verdict;

pub use classifier::SpamClassifier;
pub use config::ShieldConfig;
pub use error::{Result, StartupError, ValidationError};
pub use normalizer::{CanonicalText, Normalizer, NormalizerConfig};
pub use server::ShieldServer;
pub use verdict::{Label, Verdict};
