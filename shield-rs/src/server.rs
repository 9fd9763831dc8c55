//! HTTP server host

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::api;
use crate::classifier::SpamClassifier;
use crate::config::ShieldConfig;
use crate::error::Result;

/// Serves one classifier, loaded at construction, for the process lifetime
pub struct ShieldServer {
    config: ShieldConfig,
    classifier: Arc<SpamClassifier>,
}

impl ShieldServer {
    /// Load the classifier described by the configuration
    pub fn new(config: ShieldConfig) -> Result<Self> {
        let classifier = Arc::new(SpamClassifier::load(&config)?);
        Ok(Self::with_classifier(config, classifier))
    }

    /// Serve an already assembled classifier
    pub fn with_classifier(config: ShieldConfig, classifier: Arc<SpamClassifier>) -> Self {
        Self { config, classifier }
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        api::router(self.classifier.clone(), self.config.server.max_body_bytes)
    }

    pub fn classifier(&self) -> &Arc<SpamClassifier> {
        &self.classifier
    }

    /// Run the server until the process is stopped
    pub async fn run(&self) -> std::io::Result<()> {
        let addr = &self.config.server.listen_addr;
        let listener = TcpListener::bind(addr).await?;

        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router()).await
    }
}
