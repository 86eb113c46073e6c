//! Memory admission: classifier seam, verdicts, and the gate itself.

pub mod admission;
pub mod classifier;
pub mod verdict;

pub use admission::{GATE_SYSTEM_PROMPT, LOG_SNIPPET_CHARS, MemoryGate, snippet};
pub use classifier::{OpenAiClassifier, TextClassifier};
pub use verdict::{GateDecision, GateReason, GateVerdict};
