// src/types/mod.rs - Core trigger types shared across the engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a fired reaction should be delivered by the surrounding bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Plain chat message.
    #[default]
    Say,
    /// Emote-style action ("/me ...").
    Act,
}

/// A pattern-to-reaction rule with probabilistic activation.
///
/// Records are bulk-loaded from an external corpus collaborator and are
/// read-only during matching; the whole set is swapped atomically on reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRecord {
    /// Literal keyword phrase, fuzzy-compiled unless `regex` is set.
    pub pattern: String,
    /// Match with exact case instead of case-insensitively.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Require word boundaries around the match.
    #[serde(default)]
    pub whole_word: bool,
    /// Explicit regex, overriding `pattern` entirely when present.
    #[serde(default)]
    pub regex: Option<String>,
    /// Template resolved and spoken when the trigger fires.
    pub reaction: String,
    /// Activation chance in percent; 100 means "always".
    #[serde(default = "default_chance")]
    pub chance_percent: f32,
    /// Raise an operator alert whenever the pattern matches.
    #[serde(default)]
    pub alert: bool,
    #[serde(default)]
    pub mode: TriggerMode,
}

pub(crate) fn default_chance() -> f32 {
    100.0
}

/// A trigger that matched, passed its chance roll, and produced a reaction.
#[derive(Debug, Clone)]
pub struct FiredTrigger {
    /// Fully resolved reaction text, ready to send.
    pub reaction: String,
    pub mode: TriggerMode,
    pub alert: bool,
    /// The pattern text of the record that fired.
    pub pattern: String,
}

/// Side-channel notification for an alert-flagged pattern that matched.
/// Independent of whether any reply was spoken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerAlert {
    pub pattern: String,
}

/// Result of evaluating one inbound line against the corpus.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Reactions to speak, per the engine's `MatchPolicy`.
    pub fired: Vec<FiredTrigger>,
    /// Alerts from every matching alert-flagged record.
    pub alerts: Vec<TriggerAlert>,
}

impl Evaluation {
    pub fn is_empty(&self) -> bool {
        self.fired.is_empty() && self.alerts.is_empty()
    }
}

/// What to do when several records fire for a single input line.
///
/// The historical bot exhibited both behaviors; they are kept as explicit,
/// selectable policies. Alerts are collected from all matching records under
/// either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Speak only the first record that fires.
    #[default]
    StopOnFirstMatch,
    /// Speak every record that fires.
    CollectAll,
}

/// Errors raised while compiling a trigger corpus.
///
/// Corpus data is operator-authored, so a bad explicit regex fails the whole
/// reload rather than being silently dropped.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("invalid regex for trigger {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid fuzzy pattern compiled from {pattern:?}: {source}")]
    InvalidFuzzyPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
