//! Word-overlap retrieval over raw corpus lines.
//!
//! The earliest retrieval strategy: a verse matches when its lowercase word
//! set shares at least one word with the query's. Scores are 1 / (1 + overlap)
//! so larger overlaps sort first under the ascending-score contract; equal
//! overlaps keep corpus order, preserving the original first-match behavior.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use concord_core::error::Result;
use concord_core::types::{RetrievalStrategy, ScoredVerse};
use concord_corpus::Corpus;

use crate::Retriever;

/// Keyword-overlap retriever.
pub struct KeywordRetriever {
    corpus: Arc<Corpus>,
}

impl KeywordRetriever {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self { corpus }
    }
}

/// Lowercase whitespace tokenization into a word set.
fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}

#[async_trait]
impl Retriever for KeywordRetriever {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredVerse>> {
        let query_words = word_set(query);
        if query_words.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, usize)> = Vec::new();
        for (position, verse) in self.corpus.iter() {
            let overlap = word_set(verse)
                .intersection(&query_words)
                .count();
            if overlap > 0 {
                scored.push((position, overlap));
            }
        }

        // Larger overlap first; ties keep corpus order.
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .filter_map(|(position, overlap)| {
                self.corpus.get(position).map(|verse| ScoredVerse {
                    verse: verse.to_string(),
                    score: 1.0 / (1.0 + overlap as f32),
                })
            })
            .collect())
    }

    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Keyword
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creation_corpus() -> Arc<Corpus> {
        Arc::new(Corpus::from_text(
            "In the beginning God created the heaven and the earth.\n\
             And the earth was without form, and void.\n",
        ))
    }

    #[tokio::test]
    async fn test_creation_query_returns_first_verse() {
        let retriever = KeywordRetriever::new(creation_corpus());
        let results = retriever.retrieve("creation of the world", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].verse.starts_with("In the beginning"));
    }

    #[tokio::test]
    async fn test_larger_overlap_ranks_first() {
        let corpus = Arc::new(Corpus::from_text(
            "the sheep grazed\nthe shepherd watched the sheep by night\n",
        ));
        let retriever = KeywordRetriever::new(corpus);
        let results = retriever
            .retrieve("the shepherd and the sheep", 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].verse.contains("shepherd"));
        assert!(results[0].score < results[1].score);
    }

    #[tokio::test]
    async fn test_scores_ascending() {
        let corpus = Arc::new(Corpus::from_text(
            "a b c d\na b c\na b\na\n",
        ));
        let retriever = KeywordRetriever::new(corpus);
        let results = retriever.retrieve("a b c d", 10).await.unwrap();
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_no_overlap_returns_empty() {
        let retriever = KeywordRetriever::new(creation_corpus());
        let results = retriever.retrieve("zzz qqq", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_returns_empty() {
        let retriever = KeywordRetriever::new(creation_corpus());
        let results = retriever.retrieve("", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_k_truncates() {
        let corpus = Arc::new(Corpus::from_text("the a\nthe b\nthe c\nthe d\n"));
        let retriever = KeywordRetriever::new(corpus);
        let results = retriever.retrieve("the", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_matching_is_case_insensitive() {
        let retriever = KeywordRetriever::new(creation_corpus());
        let results = retriever.retrieve("BEGINNING", 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_strategy_name() {
        let retriever = KeywordRetriever::new(creation_corpus());
        assert_eq!(retriever.strategy(), RetrievalStrategy::Keyword);
    }
}
