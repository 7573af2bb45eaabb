//! Depth-aware scanning of raw type text.
//!
//! Every structural split in the pipeline goes through these helpers. A
//! single integer depth is shared across `<>`, `()`, `{}`, `[]` (the kinds
//! need not pair up, only overall depth matters) together with an
//! inside-string flag toggled by unescaped quotes, so delimiters nested in
//! brackets or string literals never count. `=>` is special-cased so the
//! arrow's `>` does not close a bracket.

#[derive(Clone, Copy, Default)]
struct ScanState {
    depth: u32,
    quote: Option<char>,
    escaped: bool,
}

impl ScanState {
    fn at_top(&self) -> bool {
        self.depth == 0 && self.quote.is_none()
    }

    fn step(&mut self, prev: Option<char>, c: char) {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == q {
                self.quote = None;
            }
            return;
        }
        match c {
            '"' | '\'' | '`' => self.quote = Some(c),
            '<' | '(' | '{' | '[' => self.depth += 1,
            '>' => {
                // `=>` is an arrow, not a closing bracket
                if prev != Some('=') {
                    self.depth = self.depth.saturating_sub(1);
                }
            }
            ')' | '}' | ']' => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }
}

/// Split `text` on every occurrence of `delim` at nesting depth 0, outside
/// string literals. Always yields at least one segment.
pub fn split_top_level(text: &str, delim: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut state = ScanState::default();
    let mut prev = None;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if state.at_top() && c == delim {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
            prev = Some(c);
            continue;
        }
        state.step(prev, c);
        prev = Some(c);
    }
    parts.push(&text[start..]);
    parts
}

/// Split at the first top-level occurrence of `delim` (used for the
/// `name : type` split of a property or parameter).
pub fn split_once_top_level(text: &str, delim: char) -> Option<(&str, &str)> {
    let mut state = ScanState::default();
    let mut prev = None;
    for (i, c) in text.char_indices() {
        if state.at_top() && c == delim {
            return Some((&text[..i], &text[i + c.len_utf8()..]));
        }
        state.step(prev, c);
        prev = Some(c);
    }
    None
}

/// Byte index of the `=` of the first top-level `=>`, skipping arrows nested
/// inside parameter lists or object members.
pub fn find_top_level_arrow(text: &str) -> Option<usize> {
    let mut state = ScanState::default();
    let mut prev: Option<(usize, char)> = None;
    for (i, c) in text.char_indices() {
        if c == '>' && state.at_top() {
            if let Some((j, '=')) = prev {
                return Some(j);
            }
        }
        state.step(prev.map(|(_, p)| p), c);
        prev = Some((i, c));
    }
    None
}

/// Byte index of the bracket closing the one at `open`. The whole scan uses
/// the shared depth, so any nested bracket kind (and any string) is skipped;
/// the closer must be the counterpart of the opener or the scan fails.
pub fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    let expected = match text[open..].chars().next()? {
        '<' => '>',
        '(' => ')',
        '{' => '}',
        '[' => ']',
        _ => return None,
    };
    let mut state = ScanState::default();
    let mut prev = None;
    for (i, c) in text[open..].char_indices() {
        state.step(prev, c);
        prev = Some(c);
        if i > 0 && state.at_top() {
            return (c == expected).then_some(open + i);
        }
    }
    None
}

/// The full balanced `<...>` argument span starting at `open` (the byte
/// index of `<`). Tolerates multi-line object arguments. Returns the inner
/// text and the byte index of the closing `>`.
pub fn generic_argument_span(text: &str, open: usize) -> Option<(&str, usize)> {
    let close = matching_bracket(text, open)?;
    Some((&text[open + 1..close], close))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_split_respects_generics_and_parens() {
        assert_eq!(split_top_level("A | B", '|'), vec!["A ", " B"]);
        assert_eq!(split_top_level("Map<K, V | W>", '|'), vec!["Map<K, V | W>"]);
        assert_eq!(
            split_top_level("(A | B) | C", '|'),
            vec!["(A | B) ", " C"]
        );
    }

    #[test]
    fn object_member_split_skips_function_parameter_lists() {
        // the `;` inside the parameter list must not split
        let parts = split_top_level("a: (x:number)=>string; b: number", ';');
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], "a: (x:number)=>string");
        assert_eq!(parts[1].trim(), "b: number");
    }

    #[test]
    fn delimiters_inside_string_literals_do_not_split() {
        assert_eq!(split_top_level(r#""a|b" | "c""#, '|').len(), 2);
        assert_eq!(split_top_level(r#"'x;y'; z"#, ';').len(), 2);
        // escaped quote keeps the string open
        assert_eq!(split_top_level(r#""a\"|b" | C"#, '|').len(), 2);
    }

    #[test]
    fn once_split_finds_first_top_level_colon() {
        let (name, ty) = split_once_top_level("cb: (x: number) => void", ':').unwrap();
        assert_eq!(name, "cb");
        assert_eq!(ty.trim(), "(x: number) => void");
        assert!(split_once_top_level("{ a: b }", ':').is_none());
    }

    #[test]
    fn arrow_search_skips_nested_arrows() {
        let text = "(f: (a: string) => number) => boolean";
        let at = find_top_level_arrow(text).unwrap();
        assert_eq!(&text[at..at + 2], "=>");
        assert_eq!(text[..at].trim_end(), "(f: (a: string) => number)");
        assert!(find_top_level_arrow("{ cb: () => void }").is_none());
    }

    #[test]
    fn arrow_gt_does_not_close_brackets() {
        // without the `=>` special case the depth would go negative and the
        // trailing `;` would look nested
        let parts = split_top_level("a: () => void; b: number", ';');
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn balanced_generic_span_tolerates_newlines() {
        let text = "FC<{\n  title: string;\n  count: number;\n}>";
        let open = text.find('<').unwrap();
        let (inner, close) = generic_argument_span(text, open).unwrap();
        assert!(inner.contains("count: number"));
        assert_eq!(close, text.len() - 1);
    }

    #[test]
    fn matching_bracket_rejects_mismatched_closer() {
        assert_eq!(matching_bracket("(a b]", 0), None);
        assert_eq!(matching_bracket("(a (b) c)", 0), Some(8));
    }
}
