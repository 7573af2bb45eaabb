//! JSON Schema fragment synthesis.
//!
//! Pure structural translation of a `Ty` tree into draft-07-shaped values:
//! one fragment per node, no shared state between fragments. Functions and
//! components are *described*, never validated as callables; opaque nodes
//! become an annotated string fragment so every export yields legal schema.

use serde_json::{json, Map, Value};

use crate::ty::{Lit, Prop, Ty, TypeNode};

pub const SCHEMA_DRAFT: &str = "http://json-schema.org/draft-07/schema#";

pub fn synthesize(ty: &Ty) -> Value {
    let mut out = match &ty.node {
        TypeNode::Primitive(prim) => match prim.schema_name() {
            Some(name) => json!({ "type": name }),
            None => json!({}),
        },
        TypeNode::Literal(lit) => match lit {
            Lit::Str(s) => json!({ "type": "string", "const": s }),
            Lit::Num(n) => json!({ "type": "number", "const": n }),
            Lit::Bool(b) => json!({ "type": "boolean", "const": b }),
        },
        TypeNode::Array(elem) => json!({ "type": "array", "items": synthesize(elem) }),
        TypeNode::Object(props) => object_fragment(props),
        TypeNode::Union(members) => json!({
            "oneOf": members.iter().map(synthesize).collect::<Vec<_>>(),
        }),
        TypeNode::Function {
            params,
            returns,
            source,
        } => json!({
            "type": "object",
            "description": format!("Function: {source}"),
            "parameters": params
                .iter()
                .map(|p| json!({ "name": p.name, "schema": synthesize(&p.ty) }))
                .collect::<Vec<_>>(),
            "returns": synthesize(returns),
        }),
        TypeNode::Component { props, source } => component_fragment(props, source),
        TypeNode::Opaque(raw) => json!({
            "type": "string",
            "description": format!("type: {raw}"),
        }),
    };
    if ty.nullable {
        out["nullable"] = Value::Bool(true);
    }
    out
}

fn object_fragment(props: &[Prop]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for prop in props {
        properties.insert(prop.name.clone(), synthesize(&prop.ty));
        if !prop.optional {
            required.push(Value::from(prop.name.clone()));
        }
    }
    let mut out = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        out["required"] = Value::Array(required);
    }
    out
}

/// Resolved props inline as the component's `properties`; unresolved props
/// keep the original type text under `tsType`.
fn component_fragment(props: &Ty, source: &str) -> Value {
    let fragment = synthesize(props);
    match fragment.get("properties") {
        Some(properties) => {
            let mut out = json!({
                "type": "object",
                "description": format!("Component: {source}"),
                "properties": properties.clone(),
            });
            if let Some(required) = fragment.get("required") {
                out["required"] = required.clone();
            }
            out
        }
        None => json!({ "type": "object", "tsType": source }),
    }
}

/// The top-level document: one property per exported binding, in
/// enumeration order (the map is insertion-ordered).
pub fn document(properties: Map<String, Value>) -> Value {
    json!({
        "$schema": SCHEMA_DRAFT,
        "type": "object",
        "properties": properties,
    })
}

// ------------------------------- Tests ------------------------------------ //
