use serde::{Deserialize, Serialize};

/// A single retrieved passage with its relevance score.
///
/// Scores use distance semantics across every strategy: lower = more
/// relevant, and result lists are always sorted ascending by score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredVerse {
    /// The verse text, exactly as stored in the corpus.
    pub verse: String,
    /// Relevance score (distance; lower is better).
    pub score: f32,
}

/// Retrieval strategy selected at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStrategy {
    /// Word-overlap matching over the raw corpus lines.
    Keyword,
    /// Embed the query and search the nearest-neighbor index.
    Dense,
    /// Delegate to a remote completion API.
    Completion,
}

impl RetrievalStrategy {
    /// Parse a config string ("keyword", "dense", "completion").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "keyword" => Some(RetrievalStrategy::Keyword),
            "dense" => Some(RetrievalStrategy::Dense),
            "completion" => Some(RetrievalStrategy::Completion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalStrategy::Keyword => "keyword",
            RetrievalStrategy::Dense => "dense",
            RetrievalStrategy::Completion => "completion",
        }
    }
}

/// Nearest-neighbor index backend for the dense strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexBackend {
    /// Brute-force exact L2 search.
    Exact,
    /// Approximate HNSW graph search.
    Hnsw,
}

impl IndexBackend {
    /// Parse a config string ("exact", "hnsw").
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(IndexBackend::Exact),
            "hnsw" => Some(IndexBackend::Hnsw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexBackend::Exact => "exact",
            IndexBackend::Hnsw => "hnsw",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse_roundtrip() {
        for s in ["keyword", "dense", "completion"] {
            let strategy = RetrievalStrategy::parse(s).unwrap();
            assert_eq!(strategy.as_str(), s);
        }
        assert!(RetrievalStrategy::parse("bm25").is_none());
    }

    #[test]
    fn test_backend_parse_roundtrip() {
        for s in ["exact", "hnsw"] {
            let backend = IndexBackend::parse(s).unwrap();
            assert_eq!(backend.as_str(), s);
        }
        assert!(IndexBackend::parse("faiss").is_none());
    }

    #[test]
    fn test_strategy_serde_snake_case() {
        let json = serde_json::to_string(&RetrievalStrategy::Dense).unwrap();
        assert_eq!(json, "\"dense\"");
        let back: RetrievalStrategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RetrievalStrategy::Dense);
    }

    #[test]
    fn test_scored_verse_serialization() {
        let sv = ScoredVerse {
            verse: "In the beginning".to_string(),
            score: 0.25,
        };
        let json = serde_json::to_string(&sv).unwrap();
        assert!(json.contains("\"verse\""));
        assert!(json.contains("\"score\""));
    }
}
