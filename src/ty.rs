// Strongly-typed type-node IR. The parser produces it, the props expander
// rewrites it, the synthesizer consumes it. No serde_json::Value here.

/// A parsed type expression: one node plus the nullability mark that union
/// normalization folds out of `T | null` / `T | undefined`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ty {
    pub node: TypeNode,
    pub nullable: bool,
}

impl Ty {
    pub fn new(node: TypeNode) -> Self {
        Self { node, nullable: false }
    }

    pub fn any() -> Self {
        Self::new(TypeNode::Primitive(Primitive::Any))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Primitive(Primitive),
    Literal(Lit),
    Array(Box<Ty>),
    /// Object literal members in source order.
    Object(Vec<Prop>),
    /// ≥ 2 members; null/undefined members are folded into `Ty::nullable`.
    Union(Vec<Ty>),
    Function {
        params: Vec<Param>,
        returns: Box<Ty>,
        /// Original text, kept for the descriptive fragment.
        source: String,
    },
    Component {
        props: Box<Ty>,
        source: String,
    },
    /// Fallback for text no structured case matched.
    Opaque(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    /// Covers `null`, `undefined`, and `void`.
    Null,
    /// Unconstrained (`any` / `unknown`); synthesizes to `{}`.
    Any,
}

impl Primitive {
    pub fn schema_name(self) -> Option<&'static str> {
        match self {
            Primitive::String => Some("string"),
            Primitive::Number => Some("number"),
            Primitive::Boolean => Some("boolean"),
            Primitive::Null => Some("null"),
            Primitive::Any => None,
        }
    }
}

/// Literal types (`"on"`, `42`, `false`).
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Str(String),
    Num(f64),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: String,
    pub ty: Ty,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}
