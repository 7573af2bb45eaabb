//! Arrow-function type parsing.

use crate::lexer;
use crate::ty::{Param, Ty, TypeNode};

/// `(<params>) => <ret>` at the top level. The arrow is located with the
/// lexer so arrows nested inside parameter types are skipped; the head must
/// be one balanced parenthesized span (a leading generic parameter list is
/// tolerated and dropped).
pub(super) fn parse_function(text: &str) -> Option<Ty> {
    let arrow = lexer::find_top_level_arrow(text)?;
    let mut head = text[..arrow].trim_end();
    let ret_text = &text[arrow + 2..];

    if head.starts_with('<') {
        let (_, close) = lexer::generic_argument_span(head, 0)?;
        head = head[close + 1..].trim_start();
    }
    if !head.starts_with('(') {
        return None;
    }
    let close = lexer::matching_bracket(head, 0)?;
    if close != head.len() - 1 {
        return None;
    }

    let mut params = Vec::new();
    for part in lexer::split_top_level(&head[1..close], ',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        params.push(parse_param(part));
    }
    Some(Ty::new(TypeNode::Function {
        params,
        returns: Box::new(super::parse(ret_text)),
        source: text.to_string(),
    }))
}

fn parse_param(part: &str) -> Param {
    // a default value never appears in printed type text, but drop it if a
    // raw source annotation leaks one through
    let part = lexer::split_once_top_level(part, '=')
        .filter(|(_, rest)| !rest.starts_with('>'))
        .map(|(head, _)| head.trim_end())
        .unwrap_or(part);
    match lexer::split_once_top_level(part, ':') {
        Some((name, ty)) => Param {
            name: clean_param_name(name),
            ty: super::parse(ty),
        },
        None => Param {
            name: clean_param_name(part),
            ty: Ty::any(),
        },
    }
}

fn clean_param_name(name: &str) -> String {
    name.trim().trim_end_matches('?').trim_end().to_string()
}
