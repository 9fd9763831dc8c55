//! Shared fixtures: a small fitted vectorizer and model written to disk

#![allow(dead_code)]

use serde_json::json;
use shield_rs::config::ArtifactConfig;
use shield_rs::{ShieldConfig, SpamClassifier};
use std::path::Path;

const VOCABULARY: [&str; 10] = [
    "free", "win", "prize", "claim", "txt", "call", "home", "lunch", "see", "ok",
];

/// Word probabilities per class, in vocabulary order
const HAM_PROBS: [f64; 10] = [0.02, 0.02, 0.01, 0.01, 0.04, 0.15, 0.2, 0.2, 0.15, 0.2];
const SPAM_PROBS: [f64; 10] = [0.2, 0.2, 0.2, 0.15, 0.15, 0.04, 0.02, 0.01, 0.02, 0.01];

pub fn vectorizer_json() -> serde_json::Value {
    let vocabulary: serde_json::Map<String, serde_json::Value> = VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, term)| (term.to_string(), json!(i)))
        .collect();

    json!({
        "format_version": 1,
        "kind": "tfidf",
        "vocabulary": vocabulary,
        "idf": vec![1.0; VOCABULARY.len()],
        "lowercase": true,
        "token_pattern": "\\b\\w\\w+\\b",
        "ngram_range": [1, 1],
        "binary": false,
        "sublinear_tf": false,
        "use_idf": true,
        "norm": "l2"
    })
}

fn log_probs(probs: &[f64]) -> Vec<f64> {
    probs.iter().map(|p| p.ln()).collect()
}

pub fn model_json() -> serde_json::Value {
    json!({
        "format_version": 1,
        "kind": "multinomial_nb",
        "classes": [0, 1],
        "class_log_prior": [0.87f64.ln(), 0.13f64.ln()],
        "feature_log_prob": [log_probs(&HAM_PROBS), log_probs(&SPAM_PROBS)]
    })
}

/// Write both artifacts into `dir`
pub fn write_artifacts(dir: &Path) -> ArtifactConfig {
    let vectorizer_path = dir.join("vectorizer.json");
    let model_path = dir.join("model.json");

    std::fs::write(&vectorizer_path, vectorizer_json().to_string()).unwrap();
    std::fs::write(&model_path, model_json().to_string()).unwrap();

    ArtifactConfig {
        vectorizer_path,
        model_path,
    }
}

pub fn test_config(dir: &Path) -> ShieldConfig {
    let mut config = ShieldConfig::development();
    config.server.listen_addr = "127.0.0.1:0".to_string();
    config.artifacts = write_artifacts(dir);
    config
}

pub fn classifier(dir: &Path) -> SpamClassifier {
    SpamClassifier::load(&test_config(dir)).unwrap()
}
