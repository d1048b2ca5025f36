//! # Phrase Templating & Fuzzy Trigger Matching
//!
//! The text-transformation core of a chat bot: generate varied phrases from
//! static templates, and recognize that an incoming line "means" a known
//! trigger phrase even when punctuation, casing, drawn-out letters or
//! colloquial spelling differ.
//!
//! ## Features
//!
//! - **Template Resolution**: choice blocks (`<a|b|c>`), optional blocks
//!   (`{maybe}`), nesting and escaped delimiters
//! - **Fuzzy Matching**: deterministic rewrite pipeline turning a literal
//!   phrase into a permissive matcher ("Yay" matches "Yaaaaayyy")
//! - **Dumb-Down Normalization**: aggressive canonicalization for
//!   exact-form comparison and dictionary keys
//! - **Trigger Engine**: probabilistic pattern-to-reaction rules with
//!   atomic corpus reload
//!
//! Transport, persistence and protocol concerns live in external
//! collaborators; this crate only transforms text.
//!
//! ## Quick Start
//!
//! ```rust
//! use banter::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let templates = TemplateEngine::new(DelimiterSet::default());
//!     let phrase = templates.resolve("<Hi|Hey|Yo>{ there}, adventurer!");
//!
//!     let engine = TriggerEngine::new(templates, MatchPolicy::StopOnFirstMatch);
//!     engine.load(vec![TriggerRecord {
//!         pattern: "hello".into(),
//!         case_sensitive: false,
//!         whole_word: false,
//!         regex: None,
//!         reaction: "<Hello|Greetings>{ yourself}!".into(),
//!         chance_percent: 100.0,
//!         alert: false,
//!         mode: TriggerMode::Say,
//!     }])?;
//!
//!     for fired in engine.evaluate("well hellooo there").fired {
//!         println!("{} (as {:?})", fired.reaction, fired.mode);
//!     }
//!     let _ = phrase;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod types;

// Re-export commonly used items
pub mod prelude {
    pub use crate::config::DelimiterSet;
    pub use crate::engine::{
        clean, compile_fuzzy, dumb_down, fuzzy_pattern, load_corpus_file, substitute,
        FuzzyCache, TemplateEngine, TriggerEngine,
    };
    pub use crate::types::{
        CorpusError, Evaluation, FiredTrigger, MatchPolicy, TriggerAlert, TriggerMode,
        TriggerRecord,
    };
    pub use anyhow::Result;
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
