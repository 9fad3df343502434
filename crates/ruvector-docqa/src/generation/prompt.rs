//! Prompt templates

/// Prompt builder for answer generation and entity extraction
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunks, best match first, one per line
    pub fn build_context(chunks: &[String]) -> String {
        chunks.join("\n")
    }

    /// Seq2seq-style QA prompt: `question: <Q> context: <C>`
    pub fn build_qa_prompt(question: &str, chunks: &[String]) -> String {
        format!(
            "question: {} context: {}",
            question,
            Self::build_context(chunks)
        )
    }

    /// Ask the model for CoNLL-style entities as JSON
    pub fn build_entity_prompt(text: &str) -> String {
        format!(
            r#"Extract the named entities from the text below.
Use only these entity groups: PER (person), ORG (organization), LOC (location), MISC (other names).
Respond with JSON of the form {{"entities": [{{"word": "...", "entity_group": "PER"}}]}}.
Copy each word exactly as it appears in the text. Respond with {{"entities": []}} if there are none.

Text: {text}"#,
            text = text
        )
    }
}
