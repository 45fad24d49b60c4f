use async_trait::async_trait;
use ragctx::embedding::{Embedder, Embedding, EmbeddingError};
use ragctx::rag::VectorStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Embedder that blocks every call until the test releases it
#[derive(Default)]
struct GatedEmbedder {
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl Embedder for GatedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(vec![1.0, 0.0])
    }

    fn model_name(&self) -> &str {
        "gated"
    }
}

async fn wait_for_embed(embedder: &GatedEmbedder) {
    tokio::time::timeout(Duration::from_secs(5), embedder.entered.notified())
        .await
        .expect("embedder was never called");
}

#[tokio::test]
async fn test_second_add_dropped_while_first_in_flight() {
    let embedder = Arc::new(GatedEmbedder::default());
    let store = Arc::new(VectorStore::new(embedder.clone()));

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.add_documents(&["first document"]).await })
    };
    wait_for_embed(&embedder).await;
    assert!(store.is_busy());

    // Returns without waiting for the first add and stores nothing
    tokio::time::timeout(
        Duration::from_secs(1),
        store.add_documents(&["second document"]),
    )
    .await
    .expect("busy add should return immediately");

    assert!(store.similarity_search(&[1.0, 0.0], 3).is_empty());

    embedder.release.notify_one();
    first.await.unwrap();

    assert!(!store.is_busy());
    assert_eq!(store.texts(), vec!["first document"]);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        store.similarity_search(&[1.0, 0.0], 3),
        vec!["first document"]
    );
}

#[tokio::test]
async fn test_cancelled_add_releases_guard() {
    let embedder = Arc::new(GatedEmbedder::default());
    let store = Arc::new(VectorStore::new(embedder.clone()));

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.add_documents(&["abandoned"]).await })
    };
    wait_for_embed(&embedder).await;
    assert!(store.is_busy());

    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());
    assert!(!store.is_busy());
    assert!(store.is_empty());

    // Permit stored ahead so the next embed completes at once
    embedder.release.notify_one();
    store.add_documents(&["kept"]).await;
    assert_eq!(store.texts(), vec!["kept"]);
}
