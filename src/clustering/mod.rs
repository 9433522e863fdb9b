//! Story clustering.
//!
//! Headlines whose embeddings are close enough are grouped into stories with
//! a greedy community detection: repeatedly take the unassigned headline with
//! the most unassigned neighbours at or above the similarity threshold, and
//! turn that neighbourhood into a story, until no neighbourhood is big
//! enough. The result is deterministic for a given set of embeddings.

mod embedding;

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};

use crate::config::{MIN_STORY_SIZE, STORY_SIMILARITY_THRESHOLD};
use crate::models::StoryCluster;

pub use embedding::{cosine_similarity, Embedder, HttpEmbedder};

/// Groups batch headlines into stories.
#[derive(Clone)]
pub struct StoryClusterer {
    embedder: Option<Arc<dyn Embedder>>,
    min_size: usize,
    threshold: f64,
}

impl std::fmt::Debug for StoryClusterer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryClusterer")
            .field("embedder", &self.embedder.is_some())
            .field("min_size", &self.min_size)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl StoryClusterer {
    pub fn new(embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self {
            embedder,
            min_size: MIN_STORY_SIZE,
            threshold: STORY_SIMILARITY_THRESHOLD as f64,
        }
    }

    pub fn with_params(mut self, min_size: usize, threshold: f32) -> Self {
        self.min_size = min_size;
        self.threshold = threshold as f64;
        self
    }

    /// Clusters `texts`, logging and returning no stories on any failure.
    pub async fn cluster_stories(&self, texts: &[String]) -> Vec<StoryCluster> {
        match self.try_cluster_stories(texts).await {
            Ok(stories) => stories,
            Err(e) => {
                log::warn!("Story clustering skipped: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Clusters `texts`.
    ///
    /// # Errors
    ///
    /// No embedder configured, an embedder failure, or a malformed embedding
    /// result (wrong count or mismatched dimensions).
    pub async fn try_cluster_stories(&self, texts: &[String]) -> Result<Vec<StoryCluster>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let embedder = self
            .embedder
            .as_ref()
            .ok_or_else(|| anyhow!("no embedding service configured"))?;

        log::info!("Embedding {} headlines for story clustering", texts.len());
        let embeddings = embedder.embed_batch(texts).await?;
        validate_embeddings(&embeddings, texts.len())?;

        let stories: Vec<StoryCluster> =
            community_detection(&embeddings, self.min_size, self.threshold)
                .into_iter()
                .enumerate()
                .map(|(i, members)| StoryCluster {
                    id: i as i64 + 1,
                    members,
                })
                .collect();
        log::info!("Found {} stories", stories.len());
        Ok(stories)
    }
}

fn validate_embeddings(embeddings: &[Vec<f32>], expected: usize) -> Result<()> {
    if embeddings.len() != expected {
        bail!(
            "expected {} embeddings, got {}",
            expected,
            embeddings.len()
        );
    }
    let dim = embeddings.first().map(Vec::len).unwrap_or(0);
    if dim == 0 || embeddings.iter().any(|e| e.len() != dim) {
        bail!("embeddings have inconsistent dimensions");
    }
    Ok(())
}

/// Greedy threshold community detection over `embeddings`.
///
/// Returns disjoint groups of indices, each sorted ascending and of size at
/// least `min_size`, in formation order. Ties between equally large
/// neighbourhoods go to the lowest index.
pub fn community_detection(embeddings: &[Vec<f32>], min_size: usize, threshold: f64) -> Vec<Vec<usize>> {
    let n = embeddings.len();
    let similarity: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| cosine_similarity(&embeddings[i], &embeddings[j]))
                .collect()
        })
        .collect();

    let mut assigned = vec![false; n];
    let mut communities = Vec::new();
    loop {
        let mut best: Option<Vec<usize>> = None;
        for i in (0..n).filter(|&i| !assigned[i]) {
            let neighbourhood: Vec<usize> = (0..n)
                .filter(|&j| !assigned[j] && (j == i || similarity[i][j] >= threshold))
                .collect();
            if best.as_ref().map_or(true, |b| neighbourhood.len() > b.len()) {
                best = Some(neighbourhood);
            }
        }
        match best {
            Some(members) if !members.is_empty() && members.len() >= min_size => {
                for &m in &members {
                    assigned[m] = true;
                }
                communities.push(members);
            }
            _ => break,
        }
    }
    communities
}
