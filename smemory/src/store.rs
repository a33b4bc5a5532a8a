//! In-memory vector store with cosine top-K search.
//!
//! ```rust
//! use smemory::{VectorItem, VectorStore};
//!
//! let mut store = VectorStore::new();
//! store.add(VectorItem::new("a", vec![1.0, 0.0], "alpha")).expect("add");
//! store.add(VectorItem::new("b", vec![0.0, 1.0], "beta")).expect("add");
//!
//! let hits = store.query(&[0.9, 0.1], 1).expect("query");
//! assert_eq!(hits[0].item.id, "a");
//! ```

use scommon::MetadataMap;
use serde::{Deserialize, Serialize};

use crate::{MemoryError, cosine_similarity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorItem {
    pub id: String,
    pub embedding: Vec<f32>,
    pub text: String,
    #[serde(default)]
    pub metadata: MetadataMap,
}

impl VectorItem {
    pub fn new(id: impl Into<String>, embedding: Vec<f32>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            embedding,
            text: text.into(),
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub item: VectorItem,
    pub score: f32,
}

/// Items in insertion order. Duplicate ids are allowed. Not synchronized;
/// wrap in a lock to share across tasks.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    items: Vec<VectorItem>,
    dimension: Option<usize>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item`. The first insert fixes the embedding length.
    pub fn add(&mut self, item: VectorItem) -> Result<(), MemoryError> {
        self.dimension = Some(Self::check_dimension(self.dimension, &item)?);
        self.items.push(item);
        Ok(())
    }

    /// Appends every item or none of them.
    pub fn add_all(&mut self, items: Vec<VectorItem>) -> Result<(), MemoryError> {
        let mut dimension = self.dimension;
        for item in &items {
            dimension = Some(Self::check_dimension(dimension, item)?);
        }

        self.dimension = dimension;
        self.items.extend(items);
        Ok(())
    }

    fn check_dimension(expected: Option<usize>, item: &VectorItem) -> Result<usize, MemoryError> {
        let length = item.embedding.len();
        if length == 0 {
            return Err(MemoryError::invalid_request("embedding must not be empty"));
        }

        match expected {
            Some(expected) if expected != length => {
                Err(MemoryError::dimension_mismatch(expected, length))
            }
            _ => Ok(length),
        }
    }

    /// Returns up to `top_k` items by descending cosine similarity; ties keep
    /// insertion order. A `top_k` of zero is treated as one.
    pub fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredItem>, MemoryError> {
        if let Some(expected) = self.dimension
            && expected != embedding.len()
        {
            return Err(MemoryError::dimension_mismatch(expected, embedding.len()));
        }

        let mut scored = self
            .items
            .iter()
            .map(|item| (cosine_similarity(&item.embedding, embedding), item))
            .collect::<Vec<_>>();
        // sort_by is stable, so equal scores stay in insertion order.
        scored.sort_by(|(left, _), (right, _)| right.total_cmp(left));

        Ok(scored
            .into_iter()
            .take(top_k.max(1))
            .map(|(score, item)| ScoredItem {
                item: item.clone(),
                score,
            })
            .collect())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.dimension = None;
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn items(&self) -> &[VectorItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryErrorKind;

    #[test]
    fn second_insert_with_other_length_is_rejected() {
        let mut store = VectorStore::new();
        store
            .add(VectorItem::new("a", vec![1.0, 2.0, 3.0], "three"))
            .expect("first insert");

        let error = store
            .add(VectorItem::new("b", vec![1.0, 2.0, 3.0, 4.0], "four"))
            .expect_err("mismatch");
        assert_eq!(error.kind, MemoryErrorKind::DimensionMismatch);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn batch_with_one_bad_embedding_inserts_nothing() {
        let mut store = VectorStore::new();
        let error = store
            .add_all(vec![
                VectorItem::new("a", vec![1.0, 0.0], ""),
                VectorItem::new("b", vec![0.0, 1.0], ""),
                VectorItem::new("c", vec![1.0], ""),
            ])
            .expect_err("mismatch");

        assert_eq!(error.kind, MemoryErrorKind::DimensionMismatch);
        assert!(store.is_empty());
        assert_eq!(store.dimension(), None);

        store
            .add_all(vec![VectorItem::new("a", vec![1.0], "")])
            .expect("batch after rejection");
        assert_eq!(store.dimension(), Some(1));
    }

    #[test]
    fn top_k_larger_than_store_returns_everything_sorted() {
        let mut store = VectorStore::new();
        store.add(VectorItem::new("far", vec![0.0, 1.0], "")).expect("add");
        store.add(VectorItem::new("near", vec![1.0, 0.1], "")).expect("add");
        store.add(VectorItem::new("mid", vec![1.0, 1.0], "")).expect("add");

        let hits = store.query(&[1.0, 0.0], 10).expect("query");
        let ids = hits.iter().map(|hit| hit.item.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(hits.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn ties_keep_insertion_order_and_zero_top_k_means_one() {
        let mut store = VectorStore::new();
        store.add(VectorItem::new("first", vec![2.0, 0.0], "")).expect("add");
        store.add(VectorItem::new("second", vec![1.0, 0.0], "")).expect("add");
        store.add(VectorItem::new("first", vec![3.0, 0.0], "duplicate id")).expect("add");

        let hits = store.query(&[1.0, 0.0], 3).expect("query");
        assert_eq!(hits[0].item.text, "");
        assert_eq!(hits[1].item.id, "second");
        assert_eq!(hits[2].item.text, "duplicate id");

        assert_eq!(store.query(&[1.0, 0.0], 0).expect("query").len(), 1);
    }

    #[test]
    fn zero_query_vector_scores_zero() {
        let mut store = VectorStore::new();
        store.add(VectorItem::new("a", vec![1.0, 0.0], "")).expect("add");
        let hits = store.query(&[0.0, 0.0], 1).expect("query");
        assert_eq!(hits[0].score, 0.0);
    }

    #[test]
    fn clear_resets_dimension() {
        let mut store = VectorStore::new();
        store.add(VectorItem::new("a", vec![1.0], "")).expect("add");
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.dimension(), None);
        store.add(VectorItem::new("b", vec![1.0, 2.0], "")).expect("new dimension");
    }

    #[test]
    fn empty_store_query_returns_nothing() {
        let store = VectorStore::new();
        assert!(store.query(&[1.0, 2.0], 5).expect("query").is_empty());
    }
}
