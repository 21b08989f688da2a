//! Prompt refinement facade.
//!
//! Two operations back the wizard: generating refinement questions for
//! a raw idea, and synthesizing the final prompt from the idea plus the
//! user's answers. Both delegate to an [`LlmProvider`] behind the retry
//! policy.
//!
//! The questions call requests a schema-constrained JSON object
//! (`{"questions": [...]}`). Some models ignore the schema, so the
//! numbered-list splitter remains as a fallback parser.

use std::sync::Arc;

use serde::Deserialize;

use crate::config::LlmConfig;
use crate::core::llm::provider::LlmProvider;
use crate::core::llm::retry::RetryPolicy;
use crate::core::llm::types::{ChatMessage, ChatRequest, LlmError, Result};

/// Structured payload requested from the questions call.
#[derive(Debug, Deserialize)]
struct RefinementResponse {
    questions: Vec<String>,
}

/// Wizard-facing client: refinement questions and final-prompt synthesis.
pub struct PromptRefiner {
    provider: Arc<dyn LlmProvider>,
    retry: RetryPolicy,
    question_count: usize,
    question_temperature: f64,
    synthesis_temperature: f64,
}

impl PromptRefiner {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            retry: RetryPolicy::new(config.max_attempts, config.retry_base_delay()),
            question_count: config.effective_question_count(),
            question_temperature: config.question_temperature,
            synthesis_temperature: config.synthesis_temperature,
        }
    }

    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Generate refinement questions for a raw idea.
    ///
    /// Retries transparently; on success the returned list is non-empty
    /// with every entry trimmed and non-blank.
    pub async fn generate_questions(&self, idea: &str) -> Result<Vec<String>> {
        let prompt = build_question_prompt(idea, self.question_count);
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(self.question_temperature)
            .with_response_schema(question_schema(self.question_count));

        self.retry
            .run(|| {
                let request = request.clone();
                async move {
                    let response = self.provider.chat(request).await?;
                    parse_questions(&response.content)
                }
            })
            .await
    }

    /// Synthesize the final optimized prompt from the idea and Q&A pairs.
    ///
    /// The raw model text is returned verbatim (trimmed), no markup
    /// stripping beyond what the instruction prompt already forbids.
    pub async fn generate_final_prompt(
        &self,
        idea: &str,
        qa_pairs: &[(String, String)],
    ) -> Result<String> {
        let prompt = build_synthesis_prompt(idea, qa_pairs);
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(self.synthesis_temperature);

        self.retry
            .run(|| {
                let request = request.clone();
                async move {
                    let response = self.provider.chat(request).await?;
                    let text = response.content.trim().to_string();
                    if text.is_empty() {
                        return Err(LlmError::InvalidResponse(
                            "Empty synthesis response".to_string(),
                        ));
                    }
                    Ok(text)
                }
            })
            .await
    }
}

// ── Prompt construction ─────────────────────────────────────────────────────

fn build_question_prompt(idea: &str, count: usize) -> String {
    format!(
        "You are an expert prompt engineer. The user has a raw idea:\n\n\
         \"{idea}\"\n\n\
         Generate exactly {count} highly relevant, specific refinement questions \
         that will help clarify the user's intent, tone, format, and constraints.\n\
         Rules:\n\
         - Each question must explore a different dimension (emotion, structure, \
         constraints, creativity, audience, or technicality).\n\
         - Avoid generic questions. Be specific to the idea.\n\
         - Each question must meaningfully affect the final prompt.\n\
         Return a JSON object with a \"questions\" array of {count} strings. \
         If you cannot return JSON, return a numbered list ({count} items), \
         no explanations."
    )
}

fn build_synthesis_prompt(idea: &str, qa_pairs: &[(String, String)]) -> String {
    let context = qa_pairs
        .iter()
        .enumerate()
        .map(|(i, (q, a))| format!("Q{n}: {q}\nA{n}: {a}", n = i + 1))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Task: Create one extremely sophisticated, optimized AI prompt based on \
         the following context.\n\n\
         Original Intent: \"{idea}\"\n\n\
         User Refinements:\n{context}\n\n\
         Instructions:\n\
         1. Act as a world-class prompt engineering expert.\n\
         2. Synthesize the original intent and the user's answers into a single, \
         powerful prompt.\n\
         3. Use advanced techniques: system role definition, chain-of-thought \
         instructions, clear delimiters, output formatting, and constraints.\n\
         4. The final output must be ready to copy-paste into an LLM.\n\
         5. RETURN ONLY THE RAW TEXT OF THE PROMPT. Do not wrap the response in \
         markdown code fences, just the text."
    )
}

fn question_schema(count: usize) -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": format!("A list of {count} refinement questions."),
            }
        },
        "required": ["questions"]
    })
}

// ── Response parsing ────────────────────────────────────────────────────────

/// Extract questions from the raw model text.
///
/// Tries the structured JSON contract first, then falls back to
/// splitting on numeric prefixes ("1.", "2)" …). Empty fragments are
/// discarded; zero usable questions is an error so the retry policy
/// treats it like any other failure.
fn parse_questions(raw: &str) -> Result<Vec<String>> {
    let questions = parse_structured(raw).unwrap_or_else(|| split_numbered_list(raw));

    if questions.is_empty() {
        return Err(LlmError::InvalidResponse(
            "No questions in response".to_string(),
        ));
    }
    Ok(questions)
}

fn parse_structured(raw: &str) -> Option<Vec<String>> {
    // Models occasionally wrap JSON in code fences despite instructions.
    let trimmed = raw
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let parsed: RefinementResponse = serde_json::from_str(trimmed).ok()?;
    let questions: Vec<String> = parsed
        .questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if questions.is_empty() {
        None
    } else {
        Some(questions)
    }
}

/// Split raw text on lines starting with a numeric prefix ("1." or "1)").
fn split_numbered_list(raw: &str) -> Vec<String> {
    let mut questions: Vec<String> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match strip_numeric_prefix(trimmed) {
            Some(rest) => {
                if !rest.is_empty() {
                    questions.push(rest.to_string());
                }
            }
            None => {
                // Continuation of the previous question, if any.
                if let Some(last) = questions.last_mut() {
                    last.push(' ');
                    last.push_str(trimmed);
                }
            }
        }
    }

    questions
}

/// Strip a leading "<digits>." or "<digits>)" prefix, returning the rest.
fn strip_numeric_prefix(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    rest.strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .map(str::trim)
}
