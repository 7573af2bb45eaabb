//! Type-string → `Ty` parser.
//!
//! Reconstructs structure from a flattened type string: no type-AST is
//! available, only the oracle's printable text. Classification is a fixed
//! dispatch over the trimmed text, first match wins, every split going
//! through the depth-aware lexer. Anything unmatched degrades to
//! `TypeNode::Opaque`: a parse can never fail, only lose precision.

pub mod func;
pub mod obj;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexer;
use crate::ty::{Lit, Primitive, Ty, TypeNode};

// ------------------------------- Policy ---------------------------------- //

/// Generic wrappers recognized as functional-component types; their single
/// type argument is the component's props type.
static COMPONENT_WRAPPER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:React\s*\.\s*)?(?:FC|FunctionComponent|VFC|ComponentType)\s*<").unwrap()
});

static IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").unwrap());

pub fn is_ident(text: &str) -> bool {
    IDENT.is_match(text)
}

// ------------------------------- Dispatch --------------------------------- //

pub fn parse(text: &str) -> Ty {
    let text = text.trim();
    if text.is_empty() {
        return Ty::any();
    }
    // a fully parenthesized group is transparent: `(A | B)[]` recurses here
    // with `(A | B)` after the array suffix is stripped
    if let Some(inner) = paren_group(text) {
        return parse(inner);
    }
    if let Some(prim) = primitive(text) {
        return Ty::new(TypeNode::Primitive(prim));
    }
    if let Some(lit) = literal(text) {
        return Ty::new(TypeNode::Literal(lit));
    }
    if let Some(elem) = array_element(text) {
        return Ty::new(TypeNode::Array(Box::new(parse(elem))));
    }
    if let Some(arg) = component_argument(text) {
        return Ty::new(TypeNode::Component {
            props: Box::new(parse(arg)),
            source: text.to_string(),
        });
    }
    if is_object_literal(text) {
        return obj::parse_object(text);
    }
    if let Some(members) = union_members(text) {
        return build_union(members);
    }
    if let Some(ty) = func::parse_function(text) {
        return ty;
    }
    Ty::new(TypeNode::Opaque(text.to_string()))
}

fn primitive(text: &str) -> Option<Primitive> {
    match text {
        "string" => Some(Primitive::String),
        "number" => Some(Primitive::Number),
        "boolean" => Some(Primitive::Boolean),
        "null" | "undefined" | "void" => Some(Primitive::Null),
        "any" | "unknown" => Some(Primitive::Any),
        _ => None,
    }
}

fn literal(text: &str) -> Option<Lit> {
    match text {
        "true" => return Some(Lit::Bool(true)),
        "false" => return Some(Lit::Bool(false)),
        _ => {}
    }
    if NUMERIC.is_match(text) {
        return text.parse::<f64>().ok().map(Lit::Num);
    }
    string_literal(text).map(Lit::Str)
}

/// Accept only a single complete quoted string spanning the whole text;
/// `"a" | "b"` must fall through to the union case.
fn string_literal(text: &str) -> Option<String> {
    let mut chars = text.char_indices();
    let (_, quote) = chars.next()?;
    if !matches!(quote, '"' | '\'') {
        return None;
    }
    let mut out = String::new();
    let mut escaped = false;
    for (i, c) in chars {
        if escaped {
            out.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            c if c == quote => {
                return (i == text.len() - 1).then_some(out);
            }
            c => out.push(c),
        }
    }
    None
}

/// `T[]`, `Array<T>`, `ReadonlyArray<T>`. The `[]` suffix only binds when no
/// top-level `|` precedes it: `A | B[]` is a union whose second member is an
/// array, not an array of a union.
fn array_element(text: &str) -> Option<&str> {
    if lexer::split_top_level(text, '|').len() > 1 {
        return None;
    }
    if let Some(prefix) = text.strip_suffix("[]") {
        let prefix = prefix.trim_end();
        if !prefix.is_empty() {
            return Some(prefix);
        }
    }
    for base in ["ReadonlyArray", "Array"] {
        let Some(rest) = text.strip_prefix(base) else {
            continue;
        };
        if !rest.trim_start().starts_with('<') {
            continue;
        }
        let open = text.find('<')?;
        let (inner, close) = lexer::generic_argument_span(text, open)?;
        if close == text.len() - 1 && lexer::split_top_level(inner, ',').len() == 1 {
            return Some(inner.trim());
        }
    }
    None
}

/// Recognize `FC<Props>`-shaped wrappers with exactly one type argument.
/// Argument extraction is a balanced-bracket scan over the full span, so
/// multi-line object arguments survive.
fn component_argument(text: &str) -> Option<&str> {
    let matched = COMPONENT_WRAPPER.find(text)?;
    let open = matched.end() - 1;
    let (inner, close) = lexer::generic_argument_span(text, open)?;
    if close != text.len() - 1 {
        return None;
    }
    let args = lexer::split_top_level(inner, ',');
    if args.len() != 1 {
        return None;
    }
    Some(inner.trim())
}

fn is_object_literal(text: &str) -> bool {
    text.starts_with('{')
        && lexer::matching_bracket(text, 0) == Some(text.len() - 1)
}

fn paren_group(text: &str) -> Option<&str> {
    if !text.starts_with('(') {
        return None;
    }
    let close = lexer::matching_bracket(text, 0)?;
    (close == text.len() - 1).then(|| &text[1..close])
}

fn union_members(text: &str) -> Option<Vec<&str>> {
    let parts = lexer::split_top_level(text, '|');
    (parts.len() > 1).then_some(parts)
}

/// Union normalization: null-ish members fold into the `nullable` flag; a
/// single surviving member absorbs the flag instead of staying a one-way
/// union.
fn build_union(parts: Vec<&str>) -> Ty {
    let mut nullable = false;
    let mut members = Vec::new();
    for part in parts {
        let part = part.trim();
        match part {
            "" => {}
            "null" | "undefined" | "void" => nullable = true,
            _ => members.push(parse(part)),
        }
    }
    match members.len() {
        0 => Ty {
            node: TypeNode::Primitive(Primitive::Null),
            nullable: false,
        },
        1 => {
            let mut ty = members.remove(0);
            ty.nullable = ty.nullable || nullable;
            ty
        }
        _ => Ty {
            node: TypeNode::Union(members),
            nullable,
        },
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::Prop;

    fn prim(p: Primitive) -> Ty {
        Ty::new(TypeNode::Primitive(p))
    }

    #[test]
    fn primitives_parse_to_primitive_nodes() {
        assert_eq!(parse("string"), prim(Primitive::String));
        assert_eq!(parse("number"), prim(Primitive::Number));
        assert_eq!(parse("boolean"), prim(Primitive::Boolean));
        assert_eq!(parse("undefined"), prim(Primitive::Null));
        assert_eq!(parse("any"), prim(Primitive::Any));
        assert_eq!(parse("unknown"), prim(Primitive::Any));
    }

    #[test]
    fn literal_types() {
        assert_eq!(parse("\"on\""), Ty::new(TypeNode::Literal(Lit::Str("on".into()))));
        assert_eq!(parse("'off'"), Ty::new(TypeNode::Literal(Lit::Str("off".into()))));
        assert_eq!(parse("42"), Ty::new(TypeNode::Literal(Lit::Num(42.0))));
        assert_eq!(parse("true"), Ty::new(TypeNode::Literal(Lit::Bool(true))));
        // not a single literal: must become a union of two literals
        let u = parse(r#""a" | "b""#);
        assert!(matches!(u.node, TypeNode::Union(ref ms) if ms.len() == 2));
    }

    #[test]
    fn array_suffix_and_generic_forms() {
        let expected = Ty::new(TypeNode::Array(Box::new(prim(Primitive::String))));
        assert_eq!(parse("string[]"), expected);
        assert_eq!(parse("Array<string>"), expected);
        assert_eq!(parse("ReadonlyArray<string>"), expected);
        // suffix binds tighter than a union member, not the whole union
        let mixed = parse("A | B[]");
        match mixed.node {
            TypeNode::Union(ms) => {
                assert!(matches!(ms[1].node, TypeNode::Array(_)));
            }
            other => panic!("expected union, got {other:?}"),
        }
        // parenthesized union of arrays
        let arr = parse("(A | B)[]");
        assert!(matches!(arr.node, TypeNode::Array(ref e) if matches!(e.node, TypeNode::Union(_))));
    }

    #[test]
    fn nested_arrays() {
        let ty = parse("number[][]");
        let TypeNode::Array(inner) = ty.node else {
            panic!("outer array expected");
        };
        assert!(matches!(inner.node, TypeNode::Array(_)));
    }

    #[test]
    fn object_literal_members_and_optionality() {
        let ty = parse("{ a: string; b?: number }");
        let TypeNode::Object(props) = ty.node else {
            panic!("object expected");
        };
        assert_eq!(
            props,
            vec![
                Prop { name: "a".into(), ty: prim(Primitive::String), optional: false },
                Prop { name: "b".into(), ty: prim(Primitive::Number), optional: true },
            ]
        );
    }

    #[test]
    fn union_collapses_nullish_members() {
        let ty = parse("string | null");
        assert_eq!(ty.node, TypeNode::Primitive(Primitive::String));
        assert!(ty.nullable);

        let ty = parse("string | undefined");
        assert!(ty.nullable);

        // several non-null members keep the union, flag set
        let ty = parse("string | number | null");
        assert!(ty.nullable);
        assert!(matches!(ty.node, TypeNode::Union(ref ms) if ms.len() == 2));

        // nothing but nullish members
        let ty = parse("null | undefined");
        assert_eq!(ty.node, TypeNode::Primitive(Primitive::Null));
    }

    #[test]
    fn function_types() {
        let ty = parse("(x: number, y: string) => boolean");
        let TypeNode::Function { params, returns, .. } = ty.node else {
            panic!("function expected");
        };
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "x");
        assert_eq!(params[0].ty, prim(Primitive::Number));
        assert_eq!(params[1].name, "y");
        assert_eq!(params[1].ty, prim(Primitive::String));
        assert_eq!(*returns, prim(Primitive::Boolean));
    }

    #[test]
    fn component_wrapper_single_argument() {
        for text in ["FC<Props>", "React.FC<Props>", "FunctionComponent<Props>"] {
            let ty = parse(text);
            let TypeNode::Component { props, source } = ty.node else {
                panic!("component expected for {text}");
            };
            assert_eq!(source, text);
            assert_eq!(props.node, TypeNode::Opaque("Props".into()));
        }
        // inline object argument, spanning lines
        let ty = parse("FC<{\n  title: string;\n}>");
        let TypeNode::Component { props, .. } = ty.node else {
            panic!("component expected");
        };
        assert!(matches!(props.node, TypeNode::Object(_)));
    }

    #[test]
    fn two_argument_wrapper_is_not_a_component() {
        assert!(matches!(
            parse("ComponentType<A, B>").node,
            TypeNode::Opaque(_)
        ));
    }

    #[test]
    fn unmatched_text_degrades_to_opaque() {
        assert_eq!(
            parse("Map<string, number>").node,
            TypeNode::Opaque("Map<string, number>".into())
        );
        assert_eq!(parse("Props").node, TypeNode::Opaque("Props".into()));
    }
}
