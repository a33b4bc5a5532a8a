//! Vector similarity search for embeddings.

mod error;
mod semantic;
mod similarity;
mod store;

pub mod prelude {
    pub use crate::{
        MemoryError, MemoryErrorKind, ScoredItem, SemanticIndex, VectorItem, VectorStore,
    };
}

pub use error::{MemoryError, MemoryErrorKind};
pub use semantic::SemanticIndex;
pub use similarity::cosine_similarity;
pub use store::{ScoredItem, VectorItem, VectorStore};
