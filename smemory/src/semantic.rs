//! Text indexing and search over a [`VectorStore`] using a provider's
//! embedding endpoint.

use std::sync::Arc;

use sprovider::ProviderExecutor;
use tokio_util::sync::CancellationToken;

use crate::{MemoryError, ScoredItem, VectorItem, VectorStore};

pub struct SemanticIndex {
    executor: Arc<dyn ProviderExecutor>,
    store: VectorStore,
}

impl SemanticIndex {
    pub fn new(executor: Arc<dyn ProviderExecutor>) -> Self {
        Self::with_store(executor, VectorStore::new())
    }

    pub fn with_store(executor: Arc<dyn ProviderExecutor>, store: VectorStore) -> Self {
        Self { executor, store }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Embeds and stores each `(id, text)` pair with one provider call.
    pub async fn index<I, S>(
        &mut self,
        documents: I,
        cancel: &CancellationToken,
    ) -> Result<usize, MemoryError>
    where
        I: IntoIterator<Item = (S, String)>,
        S: Into<String>,
    {
        let (ids, texts): (Vec<String>, Vec<String>) = documents
            .into_iter()
            .map(|(id, text)| (id.into(), text))
            .unzip();
        if texts.is_empty() {
            return Ok(0);
        }

        let embeddings = self.executor.embed(texts.clone(), cancel).await?;
        if embeddings.len() != texts.len() {
            return Err(MemoryError::other(format!(
                "provider returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        let items = ids
            .into_iter()
            .zip(texts)
            .zip(embeddings)
            .map(|((id, text), embedding)| VectorItem::new(id, embedding, text))
            .collect();
        self.store.add_all(items)?;

        tracing::debug!(
            phase = "memory",
            event = "indexed",
            items = self.store.len(),
            dimension = ?self.store.dimension()
        );
        Ok(self.store.len())
    }

    pub async fn search(
        &self,
        query: &str,
        top_k: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<ScoredItem>, MemoryError> {
        if self.store.is_empty() {
            return Ok(Vec::new());
        }

        let embedding = self
            .executor
            .embed(vec![query.to_string()], cancel)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MemoryError::other("provider returned no embedding for the query"))?;

        self.store.query(&embedding, top_k)
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }
}
