//! Export enumeration.
//!
//! Walks the module's declaration list in source order and produces the
//! ordered, deduplicated list of exported binding names. Every syntactic
//! export form contributes: export clauses (with aliases), exported
//! declarations, default declarations, and standalone default expressions.

use std::collections::{HashMap, HashSet};

use crate::decl::{DeclKind, Declaration, ModuleItem};

/// Reserved name for the module's default export.
pub const DEFAULT_EXPORT: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedBinding {
    /// Outward name (the alias for `export { a as b }`).
    pub name: String,
    pub target: BindingTarget,
}

/// How to ask the oracle about a binding: by local symbol, or by the
/// default expression itself for a standalone `export default <expr>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    Symbol(String),
    DefaultExpr(String),
}

pub fn enumerate(items: &[ModuleItem]) -> Vec<ExportedBinding> {
    // local declaration kinds, so clauses can tell value bindings from
    // type-only bindings (re-exported types carry no runtime schema)
    let mut kinds: HashMap<&str, DeclKind> = HashMap::new();
    for item in items {
        if let ModuleItem::Decl(decl) = item {
            kinds.entry(decl.name.as_str()).or_insert(decl.kind);
        }
    }
    let type_only_binding = |local: &str| {
        matches!(
            kinds.get(local),
            Some(DeclKind::Interface | DeclKind::TypeAlias)
        )
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |name: String, target: BindingTarget, out: &mut Vec<ExportedBinding>| {
        if seen.insert(name.clone()) {
            out.push(ExportedBinding { name, target });
        }
    };

    for item in items {
        match item {
            ModuleItem::Decl(Declaration {
                name,
                exported,
                default,
                ..
            }) => {
                if !exported {
                    continue;
                }
                let outward = if *default {
                    DEFAULT_EXPORT.to_string()
                } else {
                    name.clone()
                };
                push(outward, BindingTarget::Symbol(name.clone()), &mut out);
            }
            ModuleItem::ExportClause(specifiers) => {
                for spec in specifiers {
                    if spec.type_only || type_only_binding(&spec.local) {
                        continue;
                    }
                    push(
                        spec.exported.clone(),
                        BindingTarget::Symbol(spec.local.clone()),
                        &mut out,
                    );
                }
            }
            ModuleItem::DefaultExpr(expr) => {
                push(
                    DEFAULT_EXPORT.to_string(),
                    BindingTarget::DefaultExpr(expr.clone()),
                    &mut out,
                );
            }
        }
    }
    out
}

// ------------------------------- Tests ------------------------------------ //
