//! Gate verdicts and classifier output parsing.

use std::fmt;

use serde::Serialize;

/// Whether a candidate memory is persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateDecision {
    /// Write the memory.
    Store,
    /// Drop the memory.
    Skip,
}

impl GateDecision {
    /// Upper-case label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "STORE",
            Self::Skip => "SKIP",
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the gate reached its decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateReason {
    /// No classifier credential configured; stored by default.
    NoClassifierConfigured,
    /// Classifier call failed; stored by default.
    ClassifierError,
    /// Classifier answered yes.
    ClassifierYes,
    /// Classifier answered no.
    ClassifierNo,
    /// Classifier answer was neither yes nor no; stored by default.
    ClassifierAmbiguous,
}

impl GateReason {
    /// Upper-case label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoClassifierConfigured => "NO_CLASSIFIER_CONFIGURED",
            Self::ClassifierError => "CLASSIFIER_ERROR",
            Self::ClassifierYes => "CLASSIFIER_YES",
            Self::ClassifierNo => "CLASSIFIER_NO",
            Self::ClassifierAmbiguous => "CLASSIFIER_AMBIGUOUS",
        }
    }
}

impl fmt::Display for GateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of gating one candidate memory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GateVerdict {
    /// Store or skip.
    pub decision: GateDecision,
    /// Rule that produced the decision.
    pub reason: GateReason,
    /// Raw classifier output, or the error text when the call failed.
    pub raw_output: String,
}

impl GateVerdict {
    /// Verdict used when no classifier is configured.
    #[must_use]
    pub const fn unconfigured() -> Self {
        Self {
            decision: GateDecision::Store,
            reason: GateReason::NoClassifierConfigured,
            raw_output: String::new(),
        }
    }

    /// Verdict used when the classifier call failed.
    #[must_use]
    pub fn classifier_failed(error: &impl fmt::Display) -> Self {
        Self {
            decision: GateDecision::Store,
            reason: GateReason::ClassifierError,
            raw_output: error.to_string(),
        }
    }

    /// Interpret raw classifier output (trimmed, upper-cased, prefix match).
    #[must_use]
    pub fn from_classifier_output(raw: impl Into<String>) -> Self {
        let raw_output = raw.into();
        let normalized = raw_output.trim().to_uppercase();
        let (decision, reason) = if normalized.starts_with("YES") {
            (GateDecision::Store, GateReason::ClassifierYes)
        } else if normalized.starts_with("NO") {
            (GateDecision::Skip, GateReason::ClassifierNo)
        } else {
            (GateDecision::Store, GateReason::ClassifierAmbiguous)
        };
        Self {
            decision,
            reason,
            raw_output,
        }
    }

    /// Whether the memory should be written.
    #[must_use]
    pub fn should_store(&self) -> bool {
        self.decision == GateDecision::Store
    }
}
