//! Named-entity recognisers

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;

use super::Entity;
use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use crate::generation::{OllamaClient, PromptBuilder};

/// Trait for entity extraction backends
///
/// Implementations:
/// - `PatternEntityRecognizer`: capitalised word groups, offline
/// - `OllamaEntityRecognizer`: LLM extraction in JSON mode
#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    /// Entities in `text`, in order of appearance
    async fn extract(&self, text: &str) -> Result<Vec<Entity>>;

    /// Get recogniser name for logging
    fn name(&self) -> &str;
}

static WORD_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][\w&'-]*(?:[ \t]+[A-Z][\w&'-]*)*").expect("valid word-group regex")
});

const ORG_SUFFIXES: &[&str] = &[
    "Inc", "Corp", "Corporation", "Company", "Co", "Ltd", "LLC", "GmbH", "University",
    "Institute", "Bank", "Group", "Foundation", "Association",
];

const PERSON_TITLES: &[&str] = &["Mr", "Mrs", "Ms", "Dr", "Prof", "Sir", "Madam", "Lord", "Lady"];

const LOCATION_CUES: &[&str] = &["in", "at", "from", "to", "near", "into"];

/// Capitalised function words that start sentences without naming anything
const LEADING_STOPWORDS: &[&str] = &[
    "A", "An", "And", "Are", "But", "Can", "Could", "Did", "Do", "Does", "For", "From", "Has",
    "Have", "How", "I", "If", "In", "Is", "It", "List", "Name", "Of", "On", "Please", "Should",
    "Tell", "That", "The", "These", "This", "Those", "To", "Was", "Were", "What", "When", "Where",
    "Which", "Who", "Whom", "Whose", "Why", "Will", "Would", "Explain", "Define", "Describe",
];

/// Regex word-group recogniser with PER / ORG / LOC / MISC heuristics
#[derive(Debug, Clone, Default)]
pub struct PatternEntityRecognizer;

impl PatternEntityRecognizer {
    pub fn new() -> Self {
        Self
    }

    /// Extract synchronously
    pub fn extract_sync(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        for m in WORD_GROUP.find_iter(text) {
            let mut start = m.start();
            let mut group = m.as_str();

            // Drop leading function words ("What", "The", ...) and titles
            let mut title = false;
            loop {
                let first = group.split_whitespace().next().unwrap_or("");
                let is_title = PERSON_TITLES.contains(&first);
                if !(is_title || LEADING_STOPWORDS.contains(&first)) {
                    break;
                }
                title |= is_title;
                let rest = group[first.len()..].trim_start();
                start += group.len() - rest.len();
                group = rest;
            }
            if group.is_empty() {
                continue;
            }

            let before = &text[..start];
            let entity_group = classify(group, before, title);
            entities.push(Entity {
                score: confidence(entity_group),
                entity_group: entity_group.to_string(),
                word: group.to_string(),
                start,
                end: start + group.len(),
            });
        }

        entities
    }
}

fn classify(group: &str, before: &str, after_title: bool) -> &'static str {
    let last = group.split_whitespace().last().unwrap_or("");
    if ORG_SUFFIXES.contains(&last) {
        return "ORG";
    }

    let preceding = before
        .trim_end()
        .trim_end_matches('.')
        .rsplit(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("");
    if after_title || PERSON_TITLES.contains(&preceding) {
        return "PER";
    }
    if LOCATION_CUES.contains(&preceding.to_lowercase().as_str()) {
        return "LOC";
    }
    "MISC"
}

fn confidence(entity_group: &str) -> f32 {
    match entity_group {
        "ORG" | "PER" => 0.9,
        "LOC" => 0.8,
        _ => 0.5,
    }
}

#[async_trait]
impl EntityRecognizer for PatternEntityRecognizer {
    async fn extract(&self, text: &str) -> Result<Vec<Entity>> {
        Ok(self.extract_sync(text))
    }

    fn name(&self) -> &str {
        "pattern"
    }
}

#[derive(Debug, Deserialize)]
struct LlmEntities {
    #[serde(default)]
    entities: Vec<LlmEntity>,
}

#[derive(Debug, Deserialize)]
struct LlmEntity {
    word: String,
    entity_group: String,
    #[serde(default)]
    score: Option<f32>,
}

/// Entity extraction through an Ollama model in JSON mode
pub struct OllamaEntityRecognizer {
    client: Arc<OllamaClient>,
    options: GenerationConfig,
}

impl OllamaEntityRecognizer {
    /// Create from an existing OllamaClient
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self {
            client,
            options: GenerationConfig {
                max_length: 256,
                temperature: 0.0,
                stop: Vec::new(),
            },
        }
    }
}

#[async_trait]
impl EntityRecognizer for OllamaEntityRecognizer {
    async fn extract(&self, text: &str) -> Result<Vec<Entity>> {
        let prompt = PromptBuilder::build_entity_prompt(text);
        let raw = self.client.generate_json(&prompt, &self.options).await?;
        let parsed: LlmEntities = serde_json::from_value(raw)
            .map_err(|e| Error::Nlu(format!("Unexpected entity JSON: {}", e)))?;
        Ok(locate_entities(text, parsed.entities))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Anchor model-reported words in `text`; words that do not occur verbatim
/// are dropped. Repeated words are matched left to right.
fn locate_entities(text: &str, found: Vec<LlmEntity>) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut cursor = 0;

    for item in found {
        let word = item.word.trim();
        if word.is_empty() {
            continue;
        }
        let hit = text[cursor..]
            .find(word)
            .map(|i| cursor + i)
            .or_else(|| text.find(word));
        let Some(start) = hit else {
            tracing::debug!("Dropping entity '{}' not present in text", word);
            continue;
        };
        let end = start + word.len();
        if start >= cursor {
            cursor = end;
        }
        entities.push(Entity {
            entity_group: item.entity_group.to_uppercase(),
            word: word.to_string(),
            score: item.score.unwrap_or(1.0),
            start,
            end,
        });
    }

    entities.sort_by_key(|e| e.start);
    entities
}
