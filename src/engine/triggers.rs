// src/engine/triggers.rs - Trigger corpus evaluation with atomic reload

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rand::Rng;
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use crate::engine::matching::fuzzy_pattern;
use crate::engine::template::TemplateEngine;
use crate::types::{
    CorpusError, Evaluation, FiredTrigger, MatchPolicy, TriggerAlert, TriggerRecord,
};

/// A trigger record with its effective matcher built ahead of time, so
/// evaluation never compiles anything.
#[derive(Debug, Clone)]
struct CompiledTrigger {
    record: TriggerRecord,
    matcher: Regex,
}

/// Evaluates inbound chat lines against a corpus of trigger records.
///
/// The corpus is a read-only snapshot behind an `Arc`; `load` installs a
/// freshly compiled snapshot in one swap, so an evaluation that started
/// against the old corpus keeps seeing it in full and never observes a mix
/// of old and new records. Evaluations themselves are pure apart from the
/// chance rolls and may run concurrently.
pub struct TriggerEngine {
    snapshot: RwLock<Arc<Vec<CompiledTrigger>>>,
    templates: TemplateEngine,
    policy: MatchPolicy,
}

impl TriggerEngine {
    /// Create an engine with an empty corpus.
    pub fn new(templates: TemplateEngine, policy: MatchPolicy) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Vec::new())),
            templates,
            policy,
        }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Number of records in the current snapshot.
    pub fn record_count(&self) -> usize {
        self.current_snapshot().len()
    }

    /// Compile a record set and install it as the new corpus snapshot.
    ///
    /// Every record must compile before anything is installed: an invalid
    /// explicit regex fails the whole reload and leaves the previous
    /// snapshot in place. Returns the number of records installed.
    pub fn load(&self, records: Vec<TriggerRecord>) -> Result<usize, CorpusError> {
        let compiled = records
            .into_iter()
            .map(compile_record)
            .collect::<Result<Vec<_>, _>>()?;
        let count = compiled.len();

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(compiled);

        info!("Installed trigger corpus with {} records", count);
        Ok(count)
    }

    /// Evaluate one inbound line using the thread-local RNG.
    pub fn evaluate(&self, line: &str) -> Evaluation {
        self.evaluate_with(line, &mut rand::rng())
    }

    /// Evaluate one inbound line with a caller-supplied random source.
    ///
    /// Alerts are collected from every matching alert-flagged record,
    /// independent of chance rolls and of the reply policy. Under
    /// `StopOnFirstMatch` only the first successful chance roll produces a
    /// spoken reaction; `CollectAll` keeps them all.
    pub fn evaluate_with<R: Rng>(&self, line: &str, rng: &mut R) -> Evaluation {
        let snapshot = self.current_snapshot();
        let mut evaluation = Evaluation::default();

        for trigger in snapshot.iter() {
            if !trigger.matcher.is_match(line) {
                continue;
            }
            debug!("Trigger {:?} matched line {:?}", trigger.record.pattern, line);

            if trigger.record.alert {
                evaluation.alerts.push(TriggerAlert {
                    pattern: trigger.record.pattern.clone(),
                });
            }

            if self.policy == MatchPolicy::StopOnFirstMatch && !evaluation.fired.is_empty() {
                continue;
            }

            if rng.random_range(0.0f32..100.0) < trigger.record.chance_percent {
                evaluation.fired.push(FiredTrigger {
                    reaction: self.templates.resolve_with(&trigger.record.reaction, rng),
                    mode: trigger.record.mode,
                    alert: trigger.record.alert,
                    pattern: trigger.record.pattern.clone(),
                });
            }
        }

        evaluation
    }

    fn current_snapshot(&self) -> Arc<Vec<CompiledTrigger>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Build the effective matcher for one record.
///
/// An explicit regex overrides the pattern entirely and is compiled as
/// written. Otherwise the literal pattern goes through the fuzzy pipeline,
/// gets word-boundary wrapping when `whole_word` is set, and matches
/// case-insensitively unless `case_sensitive` is set.
fn compile_record(mut record: TriggerRecord) -> Result<CompiledTrigger, CorpusError> {
    if !record.chance_percent.is_finite() || !(0.0..=100.0).contains(&record.chance_percent) {
        warn!(
            "Trigger {:?} has invalid chance {}, defaulting to 100",
            record.pattern, record.chance_percent
        );
        record.chance_percent = 100.0;
    }

    let matcher = match &record.regex {
        Some(explicit) => {
            Regex::new(explicit).map_err(|source| CorpusError::InvalidRegex {
                pattern: explicit.clone(),
                source,
            })?
        }
        None => {
            let mut body = fuzzy_pattern(&record.pattern);
            if record.whole_word {
                body = format!(r"\b(?:{})\b", body);
            }
            RegexBuilder::new(&body)
                .case_insensitive(!record.case_sensitive)
                .build()
                .map_err(|source| CorpusError::InvalidFuzzyPattern {
                    pattern: record.pattern.clone(),
                    source,
                })?
        }
    };

    Ok(CompiledTrigger { record, matcher })
}

#[derive(Debug, Deserialize)]
struct CorpusFile {
    #[serde(default)]
    triggers: Vec<TriggerRecord>,
}

/// Load trigger records from a YAML corpus file.
///
/// A missing file is an empty corpus, not an error; malformed YAML is.
pub fn load_corpus_file<P: AsRef<Path>>(path: P) -> Result<Vec<TriggerRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        warn!("Trigger corpus not found at {}, starting empty", path.display());
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trigger corpus: {}", path.display()))?;

    let corpus: CorpusFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse trigger corpus: {}", path.display()))?;

    Ok(corpus.triggers)
}
