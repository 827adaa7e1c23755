//! Async wrappers for use inside a tokio runtime.
//!
//! Extraction blocks on external processes and image work, so these run it
//! on tokio's blocking thread pool instead of a runtime worker.

use crate::error::{Error, Result};
use crate::extract::{Extraction, Extractor};
use crate::model::Document;
use std::sync::Arc;
use tokio::task::{spawn_blocking, JoinError};

fn join_error(err: JoinError) -> Error {
    Error::Io(std::io::Error::other(format!(
        "extraction task failed: {}",
        err
    )))
}

/// Extract one document on the blocking pool.
pub async fn extract(extractor: Arc<Extractor>, doc: Document) -> Result<Extraction> {
    spawn_blocking(move || extractor.extract(&doc))
        .await
        .map_err(join_error)?
}

/// Extract from raw bytes with a declared kind name on the blocking pool.
pub async fn extract_bytes(
    extractor: Arc<Extractor>,
    bytes: Vec<u8>,
    kind: String,
) -> Result<Extraction> {
    spawn_blocking(move || extractor.extract_bytes(&bytes, &kind))
        .await
        .map_err(join_error)?
}

/// Extract several documents on the blocking pool.
pub async fn extract_batch(
    extractor: Arc<Extractor>,
    docs: Vec<Document>,
) -> Result<Vec<Result<Extraction>>> {
    spawn_blocking(move || extractor.extract_batch(&docs))
        .await
        .map_err(join_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractOptions;

    #[tokio::test]
    async fn test_unsupported_kind_async() {
        let extractor = Arc::new(Extractor::new(ExtractOptions::default()).unwrap());
        let result = extract_bytes(extractor, b"%PDF-1.4\n".to_vec(), "invoice".into()).await;
        assert!(matches!(result, Err(Error::UnsupportedKind(_))));
    }

    #[tokio::test]
    async fn test_empty_batch_async() {
        let extractor = Arc::new(Extractor::new(ExtractOptions::default()).unwrap());
        let results = extract_batch(extractor, Vec::new()).await.unwrap();
        assert!(results.is_empty());
    }
}
