// src/engine/scanner.rs - Delimiter scanning and escape normalization

/// Private-use character standing in for a literal escape character during
/// the final cleanup pass. Doubled escapes are parked here so the surviving
/// escape cannot be mistaken for the start of another escape sequence.
const ESCAPE_SENTINEL: char = '\u{E000}';

/// Locate the first (leftmost) top-level balanced `open ... close` pair.
///
/// Returns the byte offsets of the open and close characters. Nesting depth
/// increments on `open` and decrements on `close`; a delimiter immediately
/// preceded by an odd run of escape characters is literal and does not affect
/// depth. A close character seen before any open is literal too. Returns
/// `None` when no balanced pair exists - unbalanced delimiters are left as
/// plain text, never treated as an error.
pub fn scan(text: &str, open: char, close: char, escape: char) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut escapes = 0u32;
    let mut start = 0usize;

    for (index, ch) in text.char_indices() {
        if ch == open && escapes % 2 == 0 {
            if depth == 0 {
                start = index;
            }
            depth += 1;
            escapes = 0;
        } else if ch == close && escapes % 2 == 0 {
            if depth > 0 {
                depth -= 1;
                if depth == 0 {
                    return Some((start, index));
                }
            }
            escapes = 0;
        } else if ch == escape {
            escapes += 1;
        } else {
            escapes = 0;
        }
    }

    None
}

/// Split the inner content of a choice block on the splitter character.
///
/// Only splitters at nesting depth zero (relative to the block's content) and
/// even escape parity cut; anything deeper belongs to a nested block and
/// anything escaped is literal. Always yields at least one alternative, which
/// may be empty.
pub fn split_alternatives(
    inner: &str,
    open: char,
    close: char,
    escape: char,
    splitter: char,
) -> Vec<String> {
    let mut alternatives = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut escapes = 0u32;

    for ch in inner.chars() {
        if ch == open && escapes % 2 == 0 {
            depth += 1;
            escapes = 0;
            current.push(ch);
        } else if ch == close && escapes % 2 == 0 {
            depth = depth.saturating_sub(1);
            escapes = 0;
            current.push(ch);
        } else if ch == splitter && escapes % 2 == 0 && depth == 0 {
            escapes = 0;
            alternatives.push(std::mem::take(&mut current));
        } else if ch == escape {
            escapes += 1;
            current.push(ch);
        } else {
            escapes = 0;
            current.push(ch);
        }
    }

    alternatives.push(current);
    alternatives
}

/// Final escape cleanup once all structural resolution is done.
///
/// Doubled escapes collapse to one literal escape character; remaining single
/// escapes were spent protecting a delimiter and are deleted. The sentinel
/// round-trip keeps the surviving literal escape out of the deletion pass.
pub fn collapse_escapes(text: &str, escape: char) -> String {
    let doubled: String = [escape, escape].iter().collect();
    let sentinel = ESCAPE_SENTINEL.to_string();
    let literal = escape.to_string();

    text.replace(&doubled, &sentinel)
        .replace(escape, "")
        .replace(&sentinel, &literal)
}

/// Whether `text` still contains an unescaped occurrence of `target`.
/// Used to decide if leftover delimiters are worth a log line.
pub fn contains_unescaped(text: &str, target: char, escape: char) -> bool {
    let mut escapes = 0u32;

    for ch in text.chars() {
        if ch == target && escapes % 2 == 0 {
            return true;
        }
        if ch == escape {
            escapes += 1;
        } else {
            escapes = 0;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_leftmost_top_level_pair() {
        assert_eq!(scan("a <b|c> d <e>", '<', '>', '\\'), Some((2, 6)));
    }

    #[test]
    fn spans_nested_blocks() {
        // Outermost span covers the whole nested structure.
        assert_eq!(scan("<a|<b|c>>", '<', '>', '\\'), Some((0, 8)));
    }

    #[test]
    fn ignores_escaped_delimiters() {
        assert_eq!(scan(r"a \<b\> c", '<', '>', '\\'), None);
        // Doubled escape is a literal escape, so the delimiter counts again.
        assert_eq!(scan(r"a \\<b> c", '<', '>', '\\'), Some((4, 6)));
    }

    #[test]
    fn unbalanced_is_not_a_block() {
        assert_eq!(scan("a <b c", '<', '>', '\\'), None);
        assert_eq!(scan("a b> c", '<', '>', '\\'), None);
    }

    #[test]
    fn stray_close_does_not_poison_later_pair() {
        assert_eq!(scan(">a<b>", '<', '>', '\\'), Some((2, 4)));
    }

    #[test]
    fn splits_on_top_level_splitter_only() {
        let alts = split_alternatives("a|<b|c>|d", '<', '>', '\\', '|');
        assert_eq!(alts, vec!["a", "<b|c>", "d"]);
    }

    #[test]
    fn escaped_splitter_is_literal() {
        let alts = split_alternatives(r"a\|b|c", '<', '>', '\\', '|');
        assert_eq!(alts, vec![r"a\|b", "c"]);
    }

    #[test]
    fn empty_content_is_one_empty_alternative() {
        assert_eq!(split_alternatives("", '<', '>', '\\', '|'), vec![""]);
    }

    #[test]
    fn collapses_escapes_after_resolution() {
        assert_eq!(collapse_escapes(r"a\<b\>c", '\\'), "a<b>c");
        assert_eq!(collapse_escapes(r"a\\b", '\\'), r"a\b");
        assert_eq!(collapse_escapes("plain", '\\'), "plain");
    }

    #[test]
    fn detects_unescaped_delimiters() {
        assert!(contains_unescaped("a<b", '<', '\\'));
        assert!(!contains_unescaped(r"a\<b", '<', '\\'));
        assert!(contains_unescaped(r"a\\<b", '<', '\\'));
    }
}
