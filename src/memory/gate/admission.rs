//! Memory admission gate.
//!
//! Fails open: a missing classifier, a classifier error, or an unclear answer
//! all lead to storing the memory. Only an explicit "no" skips it, and every
//! verdict is logged since that log is the only trace of a skipped memory.

use std::sync::Arc;

use tracing::{info, warn};

use crate::memory::core::errors::ClassifierError;
use crate::memory::gate::classifier::TextClassifier;
use crate::memory::gate::verdict::GateVerdict;

/// Instruction sent to the classifier with every candidate.
pub const GATE_SYSTEM_PROMPT: &str = "You decide whether a message contains a durable fact worth \
remembering about the user: a preference, a personal detail, a plan, a decision, or a lasting \
piece of knowledge. Greetings, small talk, questions, and transient chatter are not durable. \
Answer with exactly one word: YES or NO.";

/// Maximum characters of the candidate text written to the audit log.
pub const LOG_SNIPPET_CHARS: usize = 120;

/// Model label logged when no classifier is configured.
const NO_MODEL: &str = "none";

/// Decides whether a candidate memory should be persisted.
pub struct MemoryGate {
    classifier: Option<Arc<dyn TextClassifier>>,
}

impl MemoryGate {
    /// Create a gate. `None` stores every candidate.
    #[must_use]
    pub const fn new(classifier: Option<Arc<dyn TextClassifier>>) -> Self {
        Self { classifier }
    }

    /// Whether a classifier is wired in.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.classifier.is_some()
    }

    /// Identifier of the wired classifier, as written to the audit log.
    #[must_use]
    pub fn model(&self) -> &str {
        self.classifier
            .as_deref()
            .map_or(NO_MODEL, TextClassifier::model)
    }

    /// Gate one candidate.
    ///
    /// The blocking classifier call runs on tokio's blocking pool and is
    /// awaited here, so the decision is always known before returning.
    pub async fn should_store(&self, candidate: &str) -> GateVerdict {
        let verdict = match &self.classifier {
            None => GateVerdict::unconfigured(),
            Some(classifier) => match run_classifier(Arc::clone(classifier), candidate).await {
                Ok(raw) => GateVerdict::from_classifier_output(raw),
                Err(err) => {
                    warn!(model = %self.model(), error = %err, "memory gate classifier failed, storing anyway");
                    GateVerdict::classifier_failed(&err)
                }
            },
        };

        info!(
            target: "memory_gate",
            model = %self.model(),
            decision = %verdict.decision,
            reason = %verdict.reason,
            raw = %verdict.raw_output,
            snippet = %snippet(candidate, LOG_SNIPPET_CHARS),
            "memory gate verdict"
        );

        verdict
    }
}

async fn run_classifier(
    classifier: Arc<dyn TextClassifier>,
    candidate: &str,
) -> Result<String, ClassifierError> {
    let text = candidate.to_string();
    tokio::task::spawn_blocking(move || classifier.classify(GATE_SYSTEM_PROMPT, &text))
        .await
        .map_err(|err| ClassifierError::Task(err.to_string()))?
}

/// First `max_chars` characters of `text`.
#[must_use]
pub fn snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
