// src/engine/template.rs - Random phrase resolution from templates

use log::debug;
use rand::Rng;
use std::collections::HashMap;

use crate::config::DelimiterSet;
use crate::engine::scanner::{collapse_escapes, contains_unescaped, scan, split_alternatives};

/// Resolves phrase templates into literal chat lines.
///
/// A template may contain choice blocks (`<a|b|c>`, one alternative picked
/// uniformly at random), optional blocks (`{text}`, kept or dropped with
/// equal probability) and escaped delimiters. Blocks nest arbitrarily.
/// Resolution is a pure function of the template and the random source;
/// the engine never mutates shared state.
///
/// Optional blocks resolve first, then choice blocks: dropping an optional
/// span can eliminate entire choice blocks and shrinks the remaining work.
/// Output of a full resolution contains no structural delimiters, so
/// resolving already-resolved text is a no-op.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    delimiters: DelimiterSet,
}

impl TemplateEngine {
    pub fn new(delimiters: DelimiterSet) -> Self {
        Self { delimiters }
    }

    pub fn delimiters(&self) -> &DelimiterSet {
        &self.delimiters
    }

    /// Resolve a template into a literal string using the thread-local RNG.
    pub fn resolve(&self, template: &str) -> String {
        self.resolve_with(template, &mut rand::rng())
    }

    /// Resolve a template with a caller-supplied random source.
    pub fn resolve_with<R: Rng>(&self, template: &str, rng: &mut R) -> String {
        let resolved = self.resolve_optionals(template.to_string(), rng);
        let resolved = self.resolve_choices(resolved, rng);

        if contains_unescaped(&resolved, self.delimiters.choice_open, self.delimiters.escape)
            || contains_unescaped(&resolved, self.delimiters.optional_open, self.delimiters.escape)
        {
            debug!("Unbalanced delimiters left as literal text in {:?}", resolved);
        }

        collapse_escapes(&resolved, self.delimiters.escape)
    }

    /// Resolve choice blocks to a fixed point, leftmost-first.
    ///
    /// Each pass splices the chosen alternative over the whole block, then
    /// re-scans the updated string; a nested block inside the chosen
    /// alternative is picked up on the next pass. Every splice strictly
    /// shrinks the string, so the loop terminates.
    fn resolve_choices<R: Rng>(&self, mut text: String, rng: &mut R) -> String {
        let DelimiterSet {
            choice_open: open,
            choice_close: close,
            escape,
            splitter,
            ..
        } = self.delimiters;

        while let Some((start, end)) = scan(&text, open, close, escape) {
            let inner = &text[start + open.len_utf8()..end];
            let alternatives = split_alternatives(inner, open, close, escape, splitter);
            let pick = &alternatives[rng.random_range(0..alternatives.len())];

            let mut updated =
                String::with_capacity(text.len() - (end - start) + pick.len());
            updated.push_str(&text[..start]);
            updated.push_str(pick);
            updated.push_str(&text[end + close.len_utf8()..]);
            text = updated;
        }

        text
    }

    /// Resolve optional blocks to a fixed point, leftmost-first.
    /// One unbiased bit per block: drop it entirely or keep the inner text.
    fn resolve_optionals<R: Rng>(&self, mut text: String, rng: &mut R) -> String {
        let DelimiterSet {
            optional_open: open,
            optional_close: close,
            escape,
            ..
        } = self.delimiters;

        while let Some((start, end)) = scan(&text, open, close, escape) {
            let mut updated = String::with_capacity(text.len());
            updated.push_str(&text[..start]);
            if !rng.random_bool(0.5) {
                updated.push_str(&text[start + open.len_utf8()..end]);
            }
            updated.push_str(&text[end + close.len_utf8()..]);
            text = updated;
        }

        text
    }
}

/// Substitute placeholder variables into a line before resolution.
///
/// Callers define the placeholder syntax themselves, e.g.
/// `{"%nick%": "meatbag"}`.
pub fn substitute(line: &str, variables: &HashMap<String, String>) -> String {
    let mut line = line.to_string();
    for (placeholder, value) in variables {
        debug!("Substitution variable: {} -> {}", placeholder, value);
        line = line.replace(placeholder.as_str(), value);
    }
    line
}
