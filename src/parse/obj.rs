//! Object-literal member parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexer;
use crate::ty::{Prop, Ty, TypeNode};

/// `name(...)` head of a method signature, optional marker included.
static METHOD_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_$][A-Za-z0-9_$]*)(\?)?\s*\(").unwrap());

/// `text` starts with `{` and ends with its balanced `}`. Members split on
/// `;`, `,`, and newlines at the top level of the body; each member splits
/// on its first top-level `:`; a trailing `?` on the name marks it optional.
pub(super) fn parse_object(text: &str) -> Ty {
    let inner = &text[1..text.len() - 1];
    let mut props = Vec::new();
    for member in members(inner) {
        if let Some(prop) = parse_member(member) {
            props.push(prop);
        }
    }
    Ty::new(TypeNode::Object(props))
}

fn members(inner: &str) -> impl Iterator<Item = &str> {
    lexer::split_top_level(inner, ';')
        .into_iter()
        .flat_map(|seg| lexer::split_top_level(seg, ','))
        .flat_map(|seg| lexer::split_top_level(seg, '\n'))
        .map(str::trim)
        .filter(|seg| !seg.is_empty())
}

fn parse_member(member: &str) -> Option<Prop> {
    // index/call/construct signatures carry no property name
    if member.starts_with('[') || member.starts_with('(') || member.starts_with("new ") {
        return None;
    }
    let member = member.strip_prefix("readonly ").unwrap_or(member).trim();

    // `name(params): ret` → `name: (params) => ret`
    if let Some(normalized) = normalize_method(member) {
        return parse_member(&normalized);
    }

    let (raw_name, type_text) = lexer::split_once_top_level(member, ':')?;
    let mut name = raw_name.trim();
    let optional = name.ends_with('?');
    if optional {
        name = name[..name.len() - 1].trim_end();
    }
    let name = name.trim_matches(|c| c == '"' || c == '\'');
    if name.is_empty() {
        return None;
    }
    Some(Prop {
        name: name.to_string(),
        ty: super::parse(type_text),
        optional,
    })
}

/// Method signatures print without a colon before the parameter list; the
/// parser only understands `name: type`, so rewrite them to arrow form.
fn normalize_method(member: &str) -> Option<String> {
    let caps = METHOD_HEAD.captures(member)?;
    let name = caps.get(1)?.as_str();
    let optional = caps.get(2).is_some();
    let open = caps.get(0)?.end() - 1;
    let close = lexer::matching_bracket(member, open)?;
    let params = &member[open..=close];
    let ret = member[close + 1..].trim_start().strip_prefix(':')?.trim();
    let marker = if optional { "?" } else { "" };
    Some(format!("{name}{marker}: {params} => {ret}"))
}
