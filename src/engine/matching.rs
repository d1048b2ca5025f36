// src/engine/matching.rs - Dumb-down normalization and fuzzy pattern compilation

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Letters people draw out for emphasis ("yaaaay", "nooooo").
const DRAW_OUT_LETTERS: &str = "aeghilmnorsuwyz";

static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Runs of anything that is not a word character, apostrophe or hyphen.
static NON_WORD_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w'\\-]+").expect("non-word pattern"));

/// Trailing "g" or apostrophe after a word body ("running" / "runnin'").
static TRAILING_G: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\Bg+|'\b").expect("trailing-g pattern"));

/// Colloquial spelling variants, applied in order. Later rules operate on the
/// output of earlier ones, so a few of them match rewritten pattern text
/// (e.g. the `\W*` runs inserted for punctuation) rather than raw input.
static VARIANT_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // Either kind of OK: normalize "ok"/"oook" up to "okay" first,
        // then make the tail optional.
        (r"(?i)\bo+k\b", "okay"),
        (r"(?i)\bo+ka+y+\b", "ok(ay)?"),
        // Several kinds of "whoa".
        (
            r"(?i)\b(whoah*|woah*|wh*ooh*)\b",
            "(whoah*|woah*|wh*ooh*)",
        ),
        // Ha or hah.
        (r"(?i)\bhah*\b", "hah*"),
        // Kinds of "because".
        (r"(?i)\b(cause|cuz|because)\b", "(cause|cuz|because)"),
        // "Wanna"/"gonna" and their spelled-out forms are interchangeable.
        (r"(?i)\b(wa+n+a+|wa+n+t\\W\*to+)\b", r"(wanna|want\W*to)"),
        (
            r"(?i)\b(go+n+a+|go+i+n+\(g+\|'\)\?\\W\*to+)\b",
            r"(gonna|goin(g|')?\W*to)",
        ),
        // Optional "u" between "o" and "r": colour or color.
        (r"(?i)\Bo+u*r+(\\W\*|$)", r"o(u-?)*r\W*"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (Regex::new(pattern).expect("variant pattern"), replacement)
    })
    .collect()
});

/// Strip a string down to alphanumerics and underscores. Useful for turning
/// free-form text into keys safe to hand to external collaborators.
pub fn clean(line: &str) -> String {
    line.chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_')
        .collect()
}

/// Aggressively canonicalize a line for exact-form comparison.
///
/// Trailing punctuation goes, spaces become underscores, every other
/// non-word character is dropped and underscore runs collapse. Idempotent.
/// This is a dictionary key, not a matcher for free-form text.
///
/// ```
/// use banter::engine::matching::dumb_down;
/// assert_eq!(dumb_down("Give me underscores, please.", false), "give_me_underscores_please");
/// ```
pub fn dumb_down(text: &str, preserve_case: bool) -> String {
    let trimmed = text.trim_end_matches([' ', ',', '.', '!', '?', '-']).trim();

    let mut line: String = trimmed
        .replace(' ', "_")
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_')
        .collect();

    while line.contains("__") {
        line = line.replace("__", "_");
    }
    let line = line.trim_matches('_').to_string();

    if preserve_case {
        line
    } else {
        line.to_lowercase()
    }
}

/// Rewrite a literal phrase into permissive regex pattern text.
///
/// The result tolerates spacing and punctuation differences, drawn-out
/// letters and a handful of colloquial spelling variants. No case flag is
/// applied; [`compile_fuzzy`] adds `(?i)` and compiles.
///
/// Only ever feed raw literal phrases through this pipeline. Running a
/// compiled pattern's text through it again is unsupported.
///
/// ```
/// use banter::engine::matching::fuzzy_pattern;
/// assert_eq!(fuzzy_pattern("Hello."), "(h-?)+(e-?)+(l-?)+(o-?)+");
/// ```
pub fn fuzzy_pattern(literal: &str) -> String {
    let collapsed = WHITESPACE_RUNS.replace_all(literal, " ");
    let trimmed = collapsed
        .trim_end_matches([' ', '.', '!', '?', ',', '-'])
        .trim();

    // Spacing and punctuation shouldn't matter.
    let mut pattern = NON_WORD_RUNS.replace_all(trimmed, r"\W*").into_owned();

    // "running" could be "running", "runnin'", or "runnin".
    pattern = TRAILING_G.replace_all(&pattern, "(g|')?").into_owned();

    for (rule, replacement) in VARIANT_RULES.iter() {
        pattern = rule.replace_all(&pattern, *replacement).into_owned();
    }

    expand_drawn_out(&pattern)
}

/// Compile a literal phrase into a case-insensitive fuzzy matcher.
pub fn compile_fuzzy(literal: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){}", fuzzy_pattern(literal)))
}

/// Exact-form match after dumb-down normalization on both sides.
/// An empty candidate line never matches.
pub fn matches_dumb(expression: &str, line: &str) -> bool {
    !line.is_empty() && dumb_down(expression, false) == dumb_down(line, false)
}

/// Fuzzy search of `expression` (a raw literal phrase) within `line`.
pub fn matches_fuzzy(expression: &str, line: &str) -> Result<bool, regex::Error> {
    Ok(!line.is_empty() && compile_fuzzy(expression)?.is_match(line))
}

/// Per-literal memo of compiled fuzzy patterns. Compilation is pure, so a
/// cached entry is valid for the cache's whole lifetime.
#[derive(Debug, Default)]
pub struct FuzzyCache {
    patterns: HashMap<String, Regex>,
}

impl FuzzyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the compiled pattern for a literal phrase, compiling on first use.
    pub fn get_or_compile(&mut self, literal: &str) -> Result<&Regex, regex::Error> {
        match self.patterns.entry(literal.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(compile_fuzzy(literal)?)),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Rewrite runs of draw-out-prone letters as "one or more, each optionally
/// hyphen-separated", so "yay" also matches "yaaaay" and "y-a-y".
///
/// Operates on pattern text that already contains regex syntax: `\`-escapes
/// pass through untouched and a letter that already carries a `*` or `-?`
/// quantifier is left alone.
fn expand_drawn_out(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\\' {
            out.push(ch);
            if let Some(&next) = chars.get(i + 1) {
                out.push(next);
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }

        let lower = ch.to_ascii_lowercase();
        if DRAW_OUT_LETTERS.contains(lower) {
            if has_quantifier(&chars, i + 1) {
                out.push(ch);
                i += 1;
                continue;
            }

            // Consume the rest of the run, hyphen-separated repeats included.
            let mut j = i + 1;
            while j < chars.len() {
                let current = chars[j].to_ascii_lowercase();
                if current == lower {
                    if has_quantifier(&chars, j + 1) {
                        break;
                    }
                    j += 1;
                } else if current == '-'
                    && chars
                        .get(j + 1)
                        .map(|next| next.to_ascii_lowercase() == lower)
                        .unwrap_or(false)
                {
                    j += 2;
                } else {
                    break;
                }
            }

            out.push('(');
            out.push(lower);
            out.push_str("-?)+");
            i = j;
            continue;
        }

        out.push(ch);
        i += 1;
    }

    out
}

/// Whether the character at `index - 1` is followed by regex syntax (`*` or
/// `-?`) that must not be folded into a drawn-out group.
fn has_quantifier(chars: &[char], index: usize) -> bool {
    chars.get(index) == Some(&'*')
        || (chars.get(index) == Some(&'-') && chars.get(index + 1) == Some(&'?'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_strips_everything_dangerous() {
        assert_eq!(clean("Robert'); DROP TABLE Students;"), "RobertDROPTABLEStudents");
        assert_eq!(clean("safe_name1"), "safe_name1");
    }

    #[test]
    fn dumb_down_joins_with_underscores() {
        assert_eq!(
            dumb_down("Give me underscores, please.", false),
            "give_me_underscores_please"
        );
        assert_eq!(dumb_down("Hello!?", false), "hello");
        assert_eq!(dumb_down("  spaced   out  ", false), "spaced_out");
    }

    #[test]
    fn dumb_down_preserves_case_on_request() {
        assert_eq!(dumb_down("Hello There", true), "Hello_There");
    }

    #[test]
    fn dumb_down_is_idempotent() {
        for sample in [
            "Give me underscores, please.",
            "Hello!?",
            "  spaced   out  ",
            "already_dumb",
            "don't",
            "",
        ] {
            let once = dumb_down(sample, false);
            assert_eq!(dumb_down(&once, false), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn fuzzy_pattern_matches_historical_form() {
        assert_eq!(fuzzy_pattern("Hello."), "(h-?)+(e-?)+(l-?)+(o-?)+");
    }

    #[test]
    fn fuzzy_tolerates_case_and_drawn_out_letters() {
        let hello = compile_fuzzy("Hello!").unwrap();
        assert!(hello.is_match("hello"));
        assert!(hello.is_match("HELLO"));
        assert!(hello.is_match("oh hello world"));
        assert!(hello.is_match("hellooo"));
        assert!(!hello.is_match("goodbye"));

        let yay = compile_fuzzy("Yay").unwrap();
        assert!(yay.is_match("Yaaaaayyy"));
        assert!(yay.is_match("y-a-y"));
        assert!(!yay.is_match("nay nay"));
    }

    #[test]
    fn fuzzy_tolerates_spacing_and_punctuation() {
        let pattern = compile_fuzzy("good morning, everyone").unwrap();
        assert!(pattern.is_match("good morning everyone"));
        assert!(pattern.is_match("Good...morning!! Everyone?"));
        assert!(!pattern.is_match("good evening everyone"));
    }

    #[test]
    fn fuzzy_accepts_dropped_g_endings() {
        let pattern = compile_fuzzy("running").unwrap();
        assert!(pattern.is_match("running"));
        assert!(pattern.is_match("runnin'"));
        assert!(pattern.is_match("runnin"));
    }

    #[test]
    fn fuzzy_accepts_ok_variants() {
        for literal in ["ok", "okay"] {
            let pattern = compile_fuzzy(literal).unwrap();
            assert!(pattern.is_match("ok"), "{literal} should match ok");
            assert!(pattern.is_match("okay"), "{literal} should match okay");
            assert!(pattern.is_match("okaaay"), "{literal} should match okaaay");
        }
    }

    #[test]
    fn fuzzy_accepts_because_variants() {
        let pattern = compile_fuzzy("because").unwrap();
        assert!(pattern.is_match("cause"));
        assert!(pattern.is_match("cuz"));
        assert!(pattern.is_match("because"));
    }

    #[test]
    fn fuzzy_accepts_gonna_and_going_to() {
        for literal in ["gonna", "going to"] {
            let pattern = compile_fuzzy(literal).unwrap();
            assert!(pattern.is_match("gonna"), "{literal} should match gonna");
            assert!(pattern.is_match("going to"), "{literal} should match going to");
            assert!(pattern.is_match("goin' to"), "{literal} should match goin' to");
        }
    }

    #[test]
    fn fuzzy_accepts_british_and_american_spelling() {
        for literal in ["color", "colour"] {
            let pattern = compile_fuzzy(literal).unwrap();
            assert!(pattern.is_match("color"), "{literal} should match color");
            assert!(pattern.is_match("colour"), "{literal} should match colour");
        }
    }

    #[test]
    fn match_helpers() {
        assert!(matches_dumb("Hello there!", "hello   there"));
        assert!(!matches_dumb("Hello there!", "hello where"));
        assert!(!matches_dumb("anything", ""));

        assert!(matches_fuzzy("whoa", "woah that's wild").unwrap());
        assert!(!matches_fuzzy("whoa", "").unwrap());
    }

    #[test]
    fn cache_compiles_each_literal_once() {
        let mut cache = FuzzyCache::new();
        assert!(cache.is_empty());
        assert!(cache.get_or_compile("Hello").unwrap().is_match("hello"));
        assert!(cache.get_or_compile("Hello").unwrap().is_match("helloooo"));
        assert_eq!(cache.len(), 1);
        cache.get_or_compile("Yay").unwrap();
        assert_eq!(cache.len(), 2);
    }
}
