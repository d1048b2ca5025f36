// src/engine/mod.rs - The text-transformation engine

pub mod matching;
pub mod scanner;
pub mod template;
pub mod triggers;

pub use matching::{clean, compile_fuzzy, dumb_down, fuzzy_pattern, FuzzyCache};
pub use template::{substitute, TemplateEngine};
pub use triggers::{load_corpus_file, TriggerEngine};
