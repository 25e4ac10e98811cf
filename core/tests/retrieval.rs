mod common;

use std::sync::Arc;

use common::{FailingEmbedder, KeywordEmbedder, MisconfiguredEmbedder, NanEmbedder, ShortBatchEmbedder};
use newsroom_core::{
    document::{batch, Document},
    embedding::{Embedder, IndexError, SimilarityIndex},
    retrieval::{RetrievalError, RetrievalStatus, Retriever},
};

const VOCABULARY: [&str; 9] = ["cats", "purr", "mammals", "stock", "market", "rose", "today", "rain", "forecast"];

fn keyword_retriever() -> Retriever {
    Retriever::new(Arc::new(KeywordEmbedder::new(&VOCABULARY)))
}

fn news_batch() -> Vec<Document> {
    batch([
        ("https://example.com/cats", "Cats are mammals that purr."),
        ("https://example.com/markets", "The stock market rose 2% today."),
    ])
}

#[tokio::test]
async fn picks_the_document_about_cats() {
    let documents = news_batch();
    let retriever = keyword_retriever();

    let result = retriever.retrieve(&documents, "Do cats purr?").await.unwrap();
    assert_eq!(result.position, 0);
    assert_eq!(result.document.source(), "https://example.com/cats");
    assert!(matches!(result.status, RetrievalStatus::Exact));
    assert!(!result.is_degraded());

    // The chosen document must be strictly closer than the other one.
    let embedder = KeywordEmbedder::new(&VOCABULARY);
    let texts = documents.iter().map(Document::text).collect::<Vec<_>>();
    let index = SimilarityIndex::build(embedder.embed_batch(&texts).await.unwrap()).unwrap();
    let hits = index.nearest(&embedder.embed("Do cats purr?").await.unwrap(), 2).unwrap();
    assert_eq!(hits[0].position, 0);
    assert_eq!(result.distance, Some(hits[0].distance));
    assert!(hits[0].distance < hits[1].distance);
}

#[tokio::test]
async fn empty_document_set_yields_no_context() {
    let retriever = keyword_retriever();
    assert!(retriever.retrieve(&[], "Do cats purr?").await.is_none());

    let strict = retriever.try_retrieve(&[], "Do cats purr?").await;
    assert!(matches!(strict, Err(RetrievalError::EmptyDocumentSet)));
}

#[tokio::test]
async fn result_is_always_a_member_of_the_set() {
    let documents = batch([
        ("https://a.example", "Rain is in the forecast."),
        ("https://b.example", "The market rose."),
        ("https://c.example", "Mammals."),
    ]);
    let retriever = keyword_retriever();

    for query in ["rain forecast", "stock market", "cats", "", "nothing in the vocabulary"] {
        let result = retriever.retrieve(&documents, query).await.unwrap();
        assert!(result.position < documents.len());
        assert_eq!(result.document, &documents[result.position]);
    }
}

#[tokio::test]
async fn every_document_retrieves_itself() {
    let documents = batch([
        ("https://a.example", "Rain is in the forecast for today."),
        ("https://b.example", "The stock market rose."),
        ("https://c.example", "Cats are mammals that purr."),
    ]);
    let retriever = keyword_retriever();

    for document in &documents {
        let result = retriever.retrieve(&documents, document.text()).await.unwrap();
        assert_eq!(result.position, document.position());
        assert_eq!(result.distance, Some(0.0));
    }
}

#[tokio::test]
async fn dimension_mismatch_falls_back_to_first_document() {
    let documents = batch([
        ("https://a.example", "The stock market rose 2% today."),
        ("https://b.example", "Cats purr."),
    ]);
    let retriever = Retriever::new(Arc::new(MisconfiguredEmbedder));

    let result = retriever.retrieve(&documents, "Do cats purr?").await.unwrap();
    assert_eq!(result.position, 0);
    assert_eq!(result.document.source(), "https://a.example");
    assert_eq!(result.distance, None);
    assert!(result.is_degraded());
    assert!(matches!(
        result.fallback_cause(),
        Some(RetrievalError::Index(IndexError::DimensionMismatch { .. }))
    ));

    let strict = retriever.try_retrieve(&documents, "Do cats purr?").await;
    assert!(matches!(strict, Err(RetrievalError::Index(IndexError::DimensionMismatch { .. }))));
}

#[tokio::test]
async fn configured_dimension_is_enforced() {
    let documents = news_batch();
    let retriever = keyword_retriever().with_dimension(384);
    assert_eq!(retriever.dimension(), 384);

    let result = retriever.retrieve(&documents, "Do cats purr?").await.unwrap();
    assert!(result.is_degraded());
    assert!(matches!(
        result.fallback_cause(),
        Some(RetrievalError::Index(IndexError::DimensionMismatch { expected: 384, actual: 9, .. }))
    ));
}

#[tokio::test]
async fn embedding_failure_falls_back() {
    let documents = news_batch();
    let retriever = Retriever::new(Arc::new(FailingEmbedder));

    let result = retriever.retrieve(&documents, "Do cats purr?").await.unwrap();
    assert_eq!(result.position, 0);
    assert!(matches!(result.fallback_cause(), Some(RetrievalError::Embedding(_))));
}

#[tokio::test]
async fn missing_embeddings_fall_back() {
    let documents = news_batch();
    let retriever = Retriever::new(Arc::new(ShortBatchEmbedder));

    let result = retriever.retrieve(&documents, "Do cats purr?").await.unwrap();
    assert!(result.is_degraded());
    assert!(matches!(
        result.fallback_cause(),
        Some(RetrievalError::EmbeddingCount { expected: 2, actual: 1 })
    ));
}

#[tokio::test]
async fn nan_document_never_wins() {
    let documents = batch([
        ("https://a.example", "Cats purr."),
        ("https://b.example", "Corrupted page."),
    ]);
    let retriever = Retriever::new(Arc::new(NanEmbedder { poisoned_word: "corrupted" }));

    let result = retriever.retrieve(&documents, "Do cats purr?").await.unwrap();
    assert!(result.is_degraded());
    assert_eq!(result.position, 0);
    assert_eq!(result.distance, None);
    assert!(matches!(
        result.fallback_cause(),
        Some(RetrievalError::Index(IndexError::NonFinite { position: Some(1) }))
    ));
}

#[tokio::test]
async fn nan_query_is_degraded_not_exact() {
    let documents = news_batch();
    let retriever = Retriever::new(Arc::new(NanEmbedder { poisoned_word: "purr" }));

    // The first document mentions "purr" too, so the index build already rejects it.
    let result = retriever.retrieve(&documents, "Do cats purr?").await.unwrap();
    assert!(result.is_degraded());
    assert!(result.distance.is_none());

    let documents = batch([("https://a.example", "Stock market news.")]);
    let strict = retriever.try_retrieve(&documents, "Do cats purr?").await;
    assert!(matches!(strict, Err(RetrievalError::Index(IndexError::NonFinite { position: None }))));
}

#[tokio::test]
async fn misnumbered_documents_are_rejected() {
    let documents = vec![
        Document::new("Cats are mammals that purr.", "https://a.example", 5),
        Document::new("The stock market rose 2% today.", "https://b.example", 6),
    ];
    let retriever = keyword_retriever();

    let strict = retriever.try_retrieve(&documents, "Do cats purr?").await;
    assert!(matches!(strict, Err(RetrievalError::Misnumbered { index: 0, position: 5 })));

    let result = retriever.retrieve(&documents, "Do cats purr?").await.unwrap();
    assert!(result.is_degraded());
    assert!(matches!(result.fallback_cause(), Some(RetrievalError::Misnumbered { .. })));
}
