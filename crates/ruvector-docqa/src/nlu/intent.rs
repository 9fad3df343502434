//! Zero-shot question-type classification

use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{Entity, EntityRecognizer, IntentAnalysis};
use crate::config::NluConfig;
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use crate::error::{Error, Result};

/// Classifies questions against candidate labels and extracts entities
///
/// Each label is phrased as a hypothesis ("This question is a factoid
/// question.") and embedded once. A question is scored by cosine similarity
/// to every hypothesis, softmaxed with the configured temperature.
pub struct IntentAnalyzer {
    embedder: Arc<dyn EmbeddingProvider>,
    recognizer: Arc<dyn EntityRecognizer>,
    config: NluConfig,
    label_embeddings: OnceCell<Vec<Vec<f32>>>,
}

impl IntentAnalyzer {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        recognizer: Arc<dyn EntityRecognizer>,
        config: NluConfig,
    ) -> Self {
        Self {
            embedder,
            recognizer,
            config,
            label_embeddings: OnceCell::new(),
        }
    }

    /// Candidate labels in configured order
    pub fn labels(&self) -> &[String] {
        &self.config.candidate_labels
    }

    /// Rank every candidate label for `question` and extract its entities
    pub async fn analyze(&self, question: &str) -> Result<IntentAnalysis> {
        if self.config.candidate_labels.is_empty() {
            return Err(Error::Nlu("No candidate labels configured".to_string()));
        }

        let hypotheses = self
            .label_embeddings
            .get_or_try_init(|| self.embed_hypotheses())
            .await?;
        let question_embedding = self.embedder.embed(question).await?;

        let similarities: Vec<f32> = hypotheses
            .iter()
            .map(|h| cosine_similarity(&question_embedding, h))
            .collect();
        let probabilities = softmax(&similarities, self.config.temperature);

        let mut ranked: Vec<(String, f32)> = self
            .config
            .candidate_labels
            .iter()
            .cloned()
            .zip(probabilities)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        let (labels, scores): (Vec<String>, Vec<f32>) = ranked.into_iter().unzip();
        let entities = self.extract_entities(question).await?;

        tracing::debug!("Question classified as '{}' ({:.3})", labels[0], scores[0]);

        Ok(IntentAnalysis {
            question: question.to_string(),
            top_label: labels[0].clone(),
            top_score: scores[0],
            labels,
            scores,
            entities,
        })
    }

    /// Named entities in `text`
    pub async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        self.recognizer.extract(text).await
    }

    async fn embed_hypotheses(&self) -> Result<Vec<Vec<f32>>> {
        let hypotheses: Vec<String> = self
            .config
            .candidate_labels
            .iter()
            .map(|label| self.config.hypothesis_template.replace("{}", label))
            .collect();

        tracing::info!(
            "Embedding {} intent hypotheses with {}",
            hypotheses.len(),
            self.embedder.name()
        );

        self.embedder.embed_batch(&hypotheses).await
    }
}

/// Words of the entities whose group is in `entity_types`
pub fn filter_entities(entities: &[Entity], entity_types: &[String]) -> Vec<String> {
    entities
        .iter()
        .filter(|e| entity_types.iter().any(|t| *t == e.entity_group))
        .map(|e| e.word.clone())
        .collect()
}

fn softmax(values: &[f32], temperature: f32) -> Vec<f32> {
    let temperature = temperature.max(f32::EPSILON);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values
        .iter()
        .map(|v| ((v - max) / temperature).exp())
        .collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
