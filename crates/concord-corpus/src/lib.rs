//! Corpus loading for Concord.
//!
//! A corpus is a flat UTF-8 text file, one verse per line. Loading splits the
//! file on line boundaries, trims whitespace, and discards empty lines while
//! preserving the original order. The resulting [`Corpus`] is immutable; the
//! nearest-neighbor index is built from it in the same order, so positions
//! returned by index queries are always valid verse positions.

use std::path::Path;

use tracing::info;

use concord_core::error::Result;

/// An ordered, immutable collection of verses.
///
/// Each verse is a non-empty trimmed line of the source text, addressable by
/// its stable position.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    verses: Vec<String>,
}

impl Corpus {
    /// Load a corpus from a text file.
    ///
    /// Fails if the file cannot be read or is not valid UTF-8. Callers treat
    /// this as fatal at startup: the service must not run without its corpus.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let corpus = Self::from_text(&text);
        info!(
            path = %path.display(),
            verses = corpus.len(),
            "Corpus loaded"
        );
        Ok(corpus)
    }

    /// Build a corpus from an in-memory string using the same line rules.
    pub fn from_text(text: &str) -> Self {
        let verses = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { verses }
    }

    /// The verse at `position`, if it exists.
    pub fn get(&self, position: usize) -> Option<&str> {
        self.verses.get(position).map(String::as_str)
    }

    /// All verses in corpus order.
    pub fn verses(&self) -> &[String] {
        &self.verses
    }

    /// Number of verses.
    pub fn len(&self) -> usize {
        self.verses.len()
    }

    /// True if the corpus contains no verses.
    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Iterate over `(position, verse)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.verses.iter().enumerate().map(|(i, v)| (i, v.as_str()))
    }
}
