use std::sync::Arc;

use smemory::prelude::*;
use sprovider::{ModelRequest, ProviderError, ProviderExecutor, ProviderFuture, ProviderKind};
use tokio_util::sync::CancellationToken;

/// Embeds text as letter-frequency counts for `a`, `b`, and `c`.
struct LetterEmbedder;

impl ProviderExecutor for LetterEmbedder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GatewayProxy
    }

    fn model(&self) -> &str {
        "letters"
    }

    fn complete<'a>(
        &'a self,
        _request: ModelRequest,
        _cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async { Err(ProviderError::unsupported("embedding only")) })
    }

    fn list_models<'a>(&'a self, _cancel: &'a CancellationToken) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async { vec!["letters".to_string()] })
    }

    fn embed<'a>(
        &'a self,
        inputs: Vec<String>,
        _cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<Vec<Vec<f32>>, ProviderError>> {
        Box::pin(async move {
            Ok(inputs
                .iter()
                .map(|text| {
                    ['a', 'b', 'c']
                        .iter()
                        .map(|letter| text.chars().filter(|c| c == letter).count() as f32)
                        .collect()
                })
                .collect())
        })
    }
}

struct NoEmbeddings;

impl ProviderExecutor for NoEmbeddings {
    fn kind(&self) -> ProviderKind {
        ProviderKind::DeviceFlow
    }

    fn model(&self) -> &str {
        "chat-only"
    }

    fn complete<'a>(
        &'a self,
        _request: ModelRequest,
        _cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async { Ok(String::new()) })
    }

    fn list_models<'a>(&'a self, _cancel: &'a CancellationToken) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async { Vec::new() })
    }
}

/// Returns one embedding per input, each one element longer than the last.
struct RaggedEmbedder;

impl ProviderExecutor for RaggedEmbedder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GatewayProxy
    }

    fn model(&self) -> &str {
        "ragged"
    }

    fn complete<'a>(
        &'a self,
        _request: ModelRequest,
        _cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async { Err(ProviderError::unsupported("embedding only")) })
    }

    fn list_models<'a>(&'a self, _cancel: &'a CancellationToken) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async { Vec::new() })
    }

    fn embed<'a>(
        &'a self,
        inputs: Vec<String>,
        _cancel: &'a CancellationToken,
    ) -> ProviderFuture<'a, Result<Vec<Vec<f32>>, ProviderError>> {
        Box::pin(async move {
            Ok((0..inputs.len())
                .map(|position| vec![1.0; position + 1])
                .collect())
        })
    }
}

#[tokio::test]
async fn index_then_search_ranks_by_similarity() {
    let mut index = SemanticIndex::new(Arc::new(LetterEmbedder));
    let cancel = CancellationToken::new();

    let count = index
        .index(
            vec![
                ("doc-a", "aaaa".to_string()),
                ("doc-b", "bbbb".to_string()),
                ("doc-ab", "aabb".to_string()),
            ],
            &cancel,
        )
        .await
        .expect("index");
    assert_eq!(count, 3);
    assert_eq!(index.store().dimension(), Some(3));

    let hits = index.search("a", 2, &cancel).await.expect("search");
    let ids = hits.iter().map(|hit| hit.item.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["doc-a", "doc-ab"]);
    assert_eq!(hits[0].item.text, "aaaa");
}

#[tokio::test]
async fn provider_without_embeddings_surfaces_provider_error() {
    let mut index = SemanticIndex::new(Arc::new(NoEmbeddings));

    let error = index
        .index(vec![("x", "text".to_string())], &CancellationToken::new())
        .await
        .expect_err("unsupported");
    assert_eq!(error.kind, MemoryErrorKind::Provider);
    assert_eq!(
        error.provider_error.map(|provider| provider.kind),
        Some(sprovider::ProviderErrorKind::Unsupported)
    );
}

#[tokio::test]
async fn mismatched_batch_leaves_the_index_empty() {
    let mut index = SemanticIndex::new(Arc::new(RaggedEmbedder));

    let error = index
        .index(
            vec![("one", "x".to_string()), ("two", "y".to_string())],
            &CancellationToken::new(),
        )
        .await
        .expect_err("dimension mismatch");

    assert_eq!(error.kind, MemoryErrorKind::DimensionMismatch);
    assert!(index.store().is_empty());
    assert_eq!(index.store().dimension(), None);
}

#[test]
fn vector_items_serialize_with_metadata() {
    let item = VectorItem::new("id-1", vec![0.5, 0.25], "hello").with_metadata("source", "faq");
    let json = serde_json::to_value(&item).expect("serialize");
    assert_eq!(json["metadata"]["source"], "faq");

    let back: VectorItem = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, item);
}
