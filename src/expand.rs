//! Props expansion for component-shaped types.
//!
//! A `Component` whose argument is a bare type name carries no structure on
//! its own; the name has to be resolved against the module's local
//! interface and type-alias declarations and replaced by the expanded
//! member list. Unresolvable names stay as they are; a degraded but valid
//! schema beats a failed run.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::parse;
use crate::ty::{Prop, Ty, TypeNode};

/// One interface or type-alias declaration, as the oracle reports it.
#[derive(Debug, Clone)]
pub enum PropsDecl {
    Interface(Vec<MemberSig>),
    Alias(String),
}

/// One interface member: property signatures as written, method signatures
/// already normalized to arrow form by the oracle.
#[derive(Debug, Clone)]
pub struct MemberSig {
    pub name: String,
    pub optional: bool,
    pub type_text: String,
}

/// The module's interfaces and type aliases, keyed by name. Read-only
/// during expansion, so per-export work can share it across threads.
#[derive(Debug, Clone, Default)]
pub struct DeclIndex {
    decls: IndexMap<String, PropsDecl>,
}

impl DeclIndex {
    pub fn insert(&mut self, name: impl Into<String>, decl: PropsDecl) {
        // first declaration wins, mirroring the enumerator's dedup rule
        self.decls.entry(name.into()).or_insert(decl);
    }

    pub fn get(&self, name: &str) -> Option<&PropsDecl> {
        self.decls.get(name)
    }
}

/// Parse `text` and resolve every component props reference in the result.
pub fn expand(text: &str, decls: &DeclIndex) -> Ty {
    let mut expanding = HashSet::new();
    resolve(parse::parse(text), decls, &mut expanding)
}

fn resolve(mut ty: Ty, decls: &DeclIndex, expanding: &mut HashSet<String>) -> Ty {
    ty.node = match ty.node {
        TypeNode::Component { props, source } => TypeNode::Component {
            props: Box::new(resolve_props(*props, decls, expanding)),
            source,
        },
        TypeNode::Array(elem) => TypeNode::Array(Box::new(resolve(*elem, decls, expanding))),
        TypeNode::Object(props) => TypeNode::Object(
            props
                .into_iter()
                .map(|p| Prop {
                    ty: resolve(p.ty, decls, expanding),
                    ..p
                })
                .collect(),
        ),
        TypeNode::Union(members) => TypeNode::Union(
            members
                .into_iter()
                .map(|m| resolve(m, decls, expanding))
                .collect(),
        ),
        TypeNode::Function {
            params,
            returns,
            source,
        } => TypeNode::Function {
            params: params
                .into_iter()
                .map(|p| crate::ty::Param {
                    ty: resolve(p.ty, decls, expanding),
                    ..p
                })
                .collect(),
            returns: Box::new(resolve(*returns, decls, expanding)),
            source,
        },
        other => other,
    };
    ty
}

/// Substitute a bare-name props argument by its local declaration. The
/// `expanding` set refuses re-entry on the same name, so self- and mutually
/// recursive declarations terminate as opaque placeholders.
fn resolve_props(props: Ty, decls: &DeclIndex, expanding: &mut HashSet<String>) -> Ty {
    let TypeNode::Opaque(name) = &props.node else {
        return resolve(props, decls, expanding);
    };
    if !parse::is_ident(name) {
        return props;
    }
    let name = name.clone();
    if !expanding.insert(name.clone()) {
        return props;
    }
    let resolved = match decls.get(&name) {
        Some(PropsDecl::Interface(members)) => {
            let mut ty = object_from_members(members, decls, expanding);
            ty.nullable = props.nullable;
            ty
        }
        Some(PropsDecl::Alias(text)) => {
            let mut ty = resolve_props(parse::parse(text), decls, expanding);
            ty.nullable = ty.nullable || props.nullable;
            ty
        }
        None => props,
    };
    expanding.remove(&name);
    resolved
}

fn object_from_members(
    members: &[MemberSig],
    decls: &DeclIndex,
    expanding: &mut HashSet<String>,
) -> Ty {
    let props = members
        .iter()
        .map(|m| Prop {
            name: m.name.clone(),
            ty: resolve(parse::parse(&m.type_text), decls, expanding),
            optional: m.optional,
        })
        .collect();
    Ty::new(TypeNode::Object(props))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[(&str, PropsDecl)]) -> DeclIndex {
        let mut decls = DeclIndex::default();
        for (name, decl) in entries {
            decls.insert(*name, decl.clone());
        }
        decls
    }

    fn member(name: &str, optional: bool, type_text: &str) -> MemberSig {
        MemberSig {
            name: name.into(),
            optional,
            type_text: type_text.into(),
        }
    }

    #[test]
    fn interface_props_are_inlined() {
        let decls = index(&[(
            "ButtonProps",
            PropsDecl::Interface(vec![
                member("label", false, "string"),
                member("count", true, "number"),
            ]),
        )]);
        let ty = expand("FC<ButtonProps>", &decls);
        let TypeNode::Component { props, .. } = ty.node else {
            panic!("component expected");
        };
        let TypeNode::Object(props) = &props.node else {
            panic!("object expected, got {:?}", props.node);
        };
        assert_eq!(props.len(), 2);
        assert_eq!(props[0].name, "label");
        assert!(props[1].optional);
    }

    #[test]
    fn alias_chains_resolve() {
        let decls = index(&[
            ("Props", PropsDecl::Alias("Inner".into())),
            ("Inner", PropsDecl::Alias("{ id: number }".into())),
        ]);
        let ty = expand("FC<Props>", &decls);
        let TypeNode::Component { props, .. } = ty.node else {
            panic!("component expected");
        };
        assert!(matches!(props.node, TypeNode::Object(ref ps) if ps.len() == 1));
    }

    #[test]
    fn unknown_props_stay_unresolved() {
        let ty = expand("FC<Elsewhere>", &DeclIndex::default());
        let TypeNode::Component { props, .. } = ty.node else {
            panic!("component expected");
        };
        assert_eq!(props.node, TypeNode::Opaque("Elsewhere".into()));
    }

    #[test]
    fn recursive_aliases_terminate() {
        let decls = index(&[
            ("A", PropsDecl::Alias("B".into())),
            ("B", PropsDecl::Alias("A".into())),
        ]);
        let ty = expand("FC<A>", &decls);
        // must terminate; the cycle degrades to an opaque placeholder
        let TypeNode::Component { props, .. } = ty.node else {
            panic!("component expected");
        };
        assert!(matches!(props.node, TypeNode::Opaque(_)));
    }

    #[test]
    fn self_referential_interface_members_terminate() {
        let decls = index(&[(
            "NodeProps",
            PropsDecl::Interface(vec![
                member("value", false, "string"),
                member("child", true, "FC<NodeProps>"),
            ]),
        )]);
        let ty = expand("FC<NodeProps>", &decls);
        let TypeNode::Component { props, .. } = ty.node else {
            panic!("component expected");
        };
        let TypeNode::Object(props) = &props.node else {
            panic!("object expected");
        };
        // the nested reference stays a bare component, not an expansion
        let TypeNode::Component { props: nested, .. } = &props[1].ty.node else {
            panic!("nested component expected");
        };
        assert_eq!(nested.node, TypeNode::Opaque("NodeProps".into()));
    }

    #[test]
    fn components_nested_in_other_shapes_are_reached() {
        let decls = index(&[(
            "P",
            PropsDecl::Interface(vec![member("on", false, "boolean")]),
        )]);
        let ty = expand("{ render: FC<P> }", &decls);
        let TypeNode::Object(props) = ty.node else {
            panic!("object expected");
        };
        let TypeNode::Component { props: inner, .. } = &props[0].ty.node else {
            panic!("component expected");
        };
        assert!(matches!(inner.node, TypeNode::Object(_)));
    }
}
