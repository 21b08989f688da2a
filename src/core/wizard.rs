//! Three-step refinement wizard state machine.
//!
//! Pure session state, no UI or network dependencies: the TUI feeds it
//! user intents and completed/failed call results, and renders from it.
//! A single loading flag guards both generation steps so a step can
//! never have two requests in flight.

/// Current wizard step. Advances monotonically; `reset` returns to the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    IdeaEntry,
    Questions,
    Result,
}

impl Step {
    /// 1-based position for the step indicator.
    pub fn position(self) -> usize {
        match self {
            Step::IdeaEntry => 1,
            Step::Questions => 2,
            Step::Result => 3,
        }
    }

    pub const COUNT: usize = 3;
}

/// Outcome of a submit intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A generation call should be started with this payload.
    StartGeneration,
    /// The intent was rejected (guard failed or a call is in flight).
    Rejected,
}

/// Session state for one pass through the wizard.
///
/// Invariant: once questions are populated, `answers.len() == questions.len()`.
#[derive(Debug)]
pub struct WizardSession {
    step: Step,
    idea: String,
    questions: Vec<String>,
    answers: Vec<String>,
    final_prompt: String,
    loading: bool,
    status: Option<String>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self {
            step: Step::IdeaEntry,
            idea: String::new(),
            questions: Vec::new(),
            answers: Vec::new(),
            final_prompt: String::new(),
            loading: false,
            status: None,
        }
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn idea(&self) -> &str {
        &self.idea
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn final_prompt(&self) -> &str {
        &self.final_prompt
    }

    /// True while a generation call is pending; submits are suppressed.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Transient status message (e.g. after a failed call).
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // ── IdeaEntry → Questions ───────────────────────────────────────────

    /// Submit the idea text. Blank ideas and in-flight calls are rejected
    /// without triggering a generation call.
    pub fn submit_idea(&mut self, text: &str) -> SubmitOutcome {
        if self.loading || self.step() != Step::IdeaEntry {
            return SubmitOutcome::Rejected;
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return SubmitOutcome::Rejected;
        }

        self.idea = trimmed.to_string();
        self.loading = true;
        self.status = None;
        SubmitOutcome::StartGeneration
    }

    /// Question generation succeeded: populate questions and an equal
    /// number of empty answers, advance to the Questions step.
    pub fn questions_ready(&mut self, questions: Vec<String>) {
        self.loading = false;
        self.answers = vec![String::new(); questions.len()];
        self.questions = questions;
        self.step = Step::Questions;
        self.status = None;
    }

    // ── Questions → Result ──────────────────────────────────────────────

    pub fn set_answer(&mut self, index: usize, text: String) {
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = text;
        }
    }

    /// True iff every answer is non-empty after trimming.
    pub fn all_answered(&self) -> bool {
        !self.answers.is_empty() && self.answers.iter().all(|a| !a.trim().is_empty())
    }

    /// Completion percentage: round(100 × answered / total).
    pub fn completion_percent(&self) -> u16 {
        if self.questions.is_empty() {
            return 0;
        }
        let answered = self.answers.iter().filter(|a| !a.trim().is_empty()).count();
        ((answered as f64 / self.questions.len() as f64) * 100.0).round() as u16
    }

    /// Submit the answers. Returns the zipped (question, answer) pairs to
    /// feed the synthesis call, or rejects if any answer is blank or a
    /// call is already in flight.
    pub fn submit_answers(&mut self) -> Option<Vec<(String, String)>> {
        if self.loading || self.step() != Step::Questions || !self.all_answered() {
            return None;
        }

        self.loading = true;
        self.status = None;
        Some(
            self.questions
                .iter()
                .cloned()
                .zip(self.answers.iter().map(|a| a.trim().to_string()))
                .collect(),
        )
    }

    /// Final-prompt synthesis succeeded: store it and advance to Result.
    pub fn prompt_ready(&mut self, prompt: String) {
        self.loading = false;
        self.final_prompt = prompt;
        self.step = Step::Result;
        self.status = None;
    }

    // ── Failure / reset ─────────────────────────────────────────────────

    /// A generation call failed after exhausting retries. Stay on the
    /// current step so no user input is lost.
    pub fn call_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.status = Some(message.into());
    }

    /// Reset to a fresh session at the idea entry step.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
