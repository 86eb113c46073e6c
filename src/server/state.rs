//! Application state shared across all request handlers.
//!
//! Built once at startup, read-only afterwards, closed once at shutdown.

use std::sync::Arc;

use tracing::info;

use crate::memory::core::config::Settings;
use crate::memory::core::errors::{GatewayError, GatewayResult};
use crate::memory::gate::admission::MemoryGate;
use crate::memory::gate::classifier::{OpenAiClassifier, TextClassifier};
use crate::memory::index::client::IndexClient;
use crate::memory::index::pinecone::PineconeIndex;
use crate::memory::ingest::writer::MemoryWriter;
use crate::memory::retrieval::search::Retriever;

/// Shared application state.
pub struct AppState {
    /// Settings loaded at startup.
    pub settings: Settings,
    /// Dense (semantic) index client.
    pub dense: Arc<dyn IndexClient>,
    /// Sparse (lexical) index client.
    pub sparse: Arc<dyn IndexClient>,
    /// Search orchestration over both indexes.
    pub retriever: Retriever,
    /// Memory admission gate.
    pub gate: MemoryGate,
    /// Dual-index memory writer.
    pub writer: MemoryWriter,
}

impl AppState {
    /// Open the Pinecone clients and the classifier described by `settings`.
    ///
    /// Call this outside the async runtime: the classifier uses a blocking HTTP client.
    ///
    /// # Errors
    /// Returns an error if an index host is invalid or an HTTP client cannot be built.
    pub fn new(settings: Settings) -> GatewayResult<Arc<Self>> {
        let dense = PineconeIndex::new("dense", &settings.dense_index_host, &settings.pinecone_api_key)?;
        let sparse =
            PineconeIndex::new("sparse", &settings.sparse_index_host, &settings.pinecone_api_key)?;

        let classifier: Option<Arc<dyn TextClassifier>> = match &settings.openai_api_key {
            Some(api_key) => Some(Arc::new(
                OpenAiClassifier::new(&settings.openai_base_url, api_key, &settings.openai_model)
                    .map_err(|err| {
                        GatewayError::Config(format!("Failed to create classifier: {err}"))
                    })?,
            )),
            None => None,
        };

        info!(
            dense = %settings.dense_index_host,
            sparse = %settings.sparse_index_host,
            namespace = %settings.namespace,
            top_k = settings.top_k,
            gate = settings.classifier_configured(),
            "Index clients opened"
        );

        Ok(Arc::new(Self::with_clients(
            settings,
            Arc::new(dense),
            Arc::new(sparse),
            classifier,
        )))
    }

    /// Assemble state around already-opened collaborators.
    #[must_use]
    pub fn with_clients(
        settings: Settings,
        dense: Arc<dyn IndexClient>,
        sparse: Arc<dyn IndexClient>,
        classifier: Option<Arc<dyn TextClassifier>>,
    ) -> Self {
        let retriever = Retriever::new(Arc::clone(&dense), Arc::clone(&sparse), &settings);
        let gate = MemoryGate::new(classifier);
        let writer = MemoryWriter::new(
            Arc::clone(&dense),
            Arc::clone(&sparse),
            settings.namespace.clone(),
        );
        Self {
            settings,
            dense,
            sparse,
            retriever,
            gate,
            writer,
        }
    }

    /// Whether both index clients are open.
    #[must_use]
    pub fn indexes_open(&self) -> bool {
        self.dense.is_open() && self.sparse.is_open()
    }

    /// Close both index clients.
    ///
    /// # Errors
    /// Returns an error if either client fails to close.
    pub async fn close(&self) -> GatewayResult<()> {
        let (dense, sparse) = tokio::join!(self.dense.close(), self.sparse.close());
        dense?;
        sparse?;
        info!("Index clients closed");
        Ok(())
    }
}
