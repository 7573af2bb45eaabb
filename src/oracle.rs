//! Type-introspection oracle backed by tree-sitter.
//!
//! Parses a module once, then answers two questions without keeping the
//! tree around: what are the module's top-level declarations (with export
//! modifiers), and what is the widened, printable type text of a symbol.
//! Widening is best-effort: declared annotations are taken verbatim,
//! initializer literals widen to their base primitive, functions print as
//! `(params) => ret`, classes as `typeof C`, interfaces as an object
//! literal with method members normalized to arrow form.

use indexmap::IndexMap;
use thiserror::Error;
use tree_sitter::{Node, Parser};

use crate::decl::{DeclKind, Declaration, ExportSpecifier, ModuleItem};
use crate::expand::{DeclIndex, MemberSig, PropsDecl};
use crate::exports::{BindingTarget, ExportedBinding};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("grammar initialization failed: {0}")]
    Language(String),
    #[error("module text could not be parsed")]
    Parse,
}

pub struct ModuleOracle {
    items: Vec<ModuleItem>,
    types: IndexMap<String, String>,
    decls: DeclIndex,
    default_expr_type: Option<String>,
}

impl ModuleOracle {
    /// Parse `source` and extract the declaration list plus type text for
    /// every top-level symbol. `path_hint` only selects the grammar
    /// (`.tsx`/`.jsx` → TSX, otherwise TypeScript).
    pub fn parse_module(path_hint: &str, source: &str) -> Result<Self, OracleError> {
        let mut parser = Parser::new();
        let language = if wants_tsx(path_hint) {
            tree_sitter_typescript::LANGUAGE_TSX
        } else {
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT
        };
        parser
            .set_language(&language.into())
            .map_err(|err| OracleError::Language(err.to_string()))?;
        let tree = parser.parse(source, None).ok_or(OracleError::Parse)?;

        let mut oracle = Self {
            items: Vec::new(),
            types: IndexMap::new(),
            decls: DeclIndex::default(),
            default_expr_type: None,
        };
        let src = source.as_bytes();
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            oracle.collect_top(child, src);
        }
        Ok(oracle)
    }

    /// The module's declaration list, in source order.
    pub fn items(&self) -> &[ModuleItem] {
        &self.items
    }

    /// Interfaces and type aliases, for props expansion.
    pub fn decl_index(&self) -> &DeclIndex {
        &self.decls
    }

    /// Widened type text for one symbol, if the module declares it.
    pub fn type_of(&self, symbol: &str) -> Option<String> {
        self.types.get(symbol).cloned()
    }

    /// Type text for an enumerated binding; `None` marks an unresolved
    /// export (the caller skips it).
    pub fn type_text(&self, binding: &ExportedBinding) -> Option<String> {
        match &binding.target {
            BindingTarget::Symbol(symbol) => self.type_of(symbol),
            BindingTarget::DefaultExpr(_) => self.default_expr_type.clone(),
        }
    }

    // ------------------------- Collection ------------------------------ //

    fn collect_top(&mut self, node: Node, src: &[u8]) {
        match node.kind() {
            "export_statement" => self.collect_export(node, src),
            _ => self.collect_decl(node, src, false, false),
        }
    }

    fn collect_export(&mut self, node: Node, src: &[u8]) {
        let mut is_default = false;
        let mut clause_type_only = false;
        let mut handled = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "default" => is_default = true,
                "type" => clause_type_only = true,
                "export_clause" => {
                    handled = true;
                    // `export { x } from './other'` keeps its names too;
                    // with no local symbol they surface as unresolved
                    // exports and are skipped downstream
                    let specifiers = collect_specifiers(child, src, clause_type_only);
                    self.items.push(ModuleItem::ExportClause(specifiers));
                }
                kind if is_declaration_kind(kind) => {
                    handled = true;
                    self.collect_decl(child, src, true, is_default);
                }
                _ => {}
            }
        }

        if is_default && !handled {
            let Some(value) = node
                .child_by_field_name("value")
                .or_else(|| default_export_value(node))
            else {
                return;
            };
            let widened = self.widen_expression(value, src);
            if self.default_expr_type.is_none() {
                self.default_expr_type = Some(widened);
            }
            self.items
                .push(ModuleItem::DefaultExpr(node_text(value, src).to_string()));
        }
    }

    fn collect_decl(&mut self, node: Node, src: &[u8], exported: bool, default: bool) {
        match node.kind() {
            "function_declaration" | "function_signature" | "generator_function_declaration" => {
                let Some(name) = declared_name(node, src) else {
                    // anonymous `export default function () {}`
                    if default {
                        let widened = self.function_type_text(node, src);
                        if self.default_expr_type.is_none() {
                            self.default_expr_type = Some(widened);
                        }
                        self.items
                            .push(ModuleItem::DefaultExpr(node_text(node, src).to_string()));
                    }
                    return;
                };
                let widened = self.function_type_text(node, src);
                self.insert_type(&name, widened);
                self.push_decl(DeclKind::Function, name, exported, default);
            }
            "class_declaration" | "abstract_class_declaration" => {
                let Some(name) = declared_name(node, src) else {
                    return;
                };
                self.insert_type(&name, format!("typeof {name}"));
                self.push_decl(DeclKind::Class, name, exported, default);
            }
            "interface_declaration" => {
                let Some(name) = declared_name(node, src) else {
                    return;
                };
                let members = interface_members(node, src);
                self.insert_type(&name, object_text(&members));
                self.decls.insert(&name, PropsDecl::Interface(members));
                self.push_decl(DeclKind::Interface, name, exported, default);
            }
            "type_alias_declaration" => {
                let Some(name) = declared_name(node, src) else {
                    return;
                };
                let value = node
                    .child_by_field_name("value")
                    .map(|n| node_text(n, src).to_string())
                    .unwrap_or_else(|| "any".to_string());
                self.insert_type(&name, value.clone());
                self.decls.insert(&name, PropsDecl::Alias(value));
                self.push_decl(DeclKind::TypeAlias, name, exported, default);
            }
            "enum_declaration" => {
                let Some(name) = declared_name(node, src) else {
                    return;
                };
                self.insert_type(&name, enum_union_text(node, src));
                self.push_decl(DeclKind::Enum, name, exported, default);
            }
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = node.walk();
                for declarator in node.named_children(&mut cursor) {
                    if declarator.kind() != "variable_declarator" {
                        continue;
                    }
                    self.collect_declarator(declarator, src, exported);
                }
            }
            _ => {}
        }
    }

    fn collect_declarator(&mut self, node: Node, src: &[u8], exported: bool) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        if name_node.kind() == "identifier" {
            let name = node_text(name_node, src).to_string();
            let widened = match node.child_by_field_name("type") {
                Some(annotation) => strip_annotation(node_text(annotation, src)),
                None => match node.child_by_field_name("value") {
                    Some(value) => self.widen_expression(value, src),
                    None => "any".to_string(),
                },
            };
            self.insert_type(&name, widened);
            self.push_decl(DeclKind::Variable, name, exported, false);
            return;
        }
        // destructuring patterns: names are known, their types are not
        let mut names = Vec::new();
        pattern_binding_names(name_node, src, &mut names);
        for name in names {
            self.push_decl(DeclKind::Variable, name, exported, false);
        }
    }

    fn push_decl(&mut self, kind: DeclKind, name: String, exported: bool, default: bool) {
        self.items.push(ModuleItem::Decl(Declaration {
            kind,
            name,
            exported,
            default,
        }));
    }

    fn insert_type(&mut self, name: &str, widened: String) {
        self.types.entry(name.to_string()).or_insert(widened);
    }

    // -------------------------- Widening ------------------------------- //

    fn function_type_text(&self, node: Node, src: &[u8]) -> String {
        let params = node
            .child_by_field_name("parameters")
            .or_else(|| node.child_by_field_name("parameter"))
            .map(|p| rebuild_params(p, src))
            .unwrap_or_else(|| "()".to_string());
        let ret = match node.child_by_field_name("return_type") {
            Some(annotation) => strip_annotation(node_text(annotation, src)),
            None => node
                .child_by_field_name("body")
                .filter(|body| body.kind() != "statement_block")
                .map(|body| self.widen_expression(body, src))
                .unwrap_or_else(|| "any".to_string()),
        };
        format!("{params} => {ret}")
    }

    fn widen_expression(&self, node: Node, src: &[u8]) -> String {
        match node.kind() {
            "string" | "template_string" => "string".to_string(),
            "number" => "number".to_string(),
            "true" | "false" => "boolean".to_string(),
            "null" => "null".to_string(),
            "undefined" => "undefined".to_string(),
            "array" => self.widen_array(node, src),
            "object" => self.widen_object(node, src),
            "arrow_function" | "function_expression" | "function" => {
                self.function_type_text(node, src)
            }
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => self.widen_expression(inner, src),
                None => "any".to_string(),
            },
            "as_expression" | "satisfies_expression" => self.widen_cast(node, src),
            "new_expression" => node
                .child_by_field_name("constructor")
                .map(|c| node_text(c, src).to_string())
                .unwrap_or_else(|| "any".to_string()),
            "identifier" => {
                let name = node_text(node, src);
                self.types
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| name.to_string())
            }
            _ => "any".to_string(),
        }
    }

    fn widen_array(&self, node: Node, src: &[u8]) -> String {
        let mut elems: Vec<String> = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "comment" {
                continue;
            }
            let widened = self.widen_expression(child, src);
            if !elems.contains(&widened) {
                elems.push(widened);
            }
        }
        match elems.len() {
            0 => "any[]".to_string(),
            1 => {
                let elem = elems.remove(0);
                if crate::lexer::split_top_level(&elem, '|').len() > 1 {
                    format!("({elem})[]")
                } else {
                    format!("{elem}[]")
                }
            }
            _ => format!("({})[]", elems.join(" | ")),
        }
    }

    fn widen_object(&self, node: Node, src: &[u8]) -> String {
        let mut members = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "pair" => {
                    let Some(key) = child.child_by_field_name("key") else {
                        continue;
                    };
                    let key = node_text(key, src).trim_matches(['"', '\'']).to_string();
                    let value = child
                        .child_by_field_name("value")
                        .map(|v| self.widen_expression(v, src))
                        .unwrap_or_else(|| "any".to_string());
                    members.push(format!("{key}: {value}"));
                }
                "shorthand_property_identifier" => {
                    let name = node_text(child, src);
                    let value = self
                        .types
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| "any".to_string());
                    members.push(format!("{name}: {value}"));
                }
                "method_definition" => {
                    let Some(name) = child.child_by_field_name("name") else {
                        continue;
                    };
                    members.push(format!(
                        "{}: {}",
                        node_text(name, src),
                        self.function_type_text(child, src)
                    ));
                }
                _ => {}
            }
        }
        if members.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", members.join("; "))
        }
    }

    fn widen_cast(&self, node: Node, src: &[u8]) -> String {
        // `expr as T` reports T; `as const` and `satisfies` fall back to
        // the expression
        if node.kind() == "as_expression" {
            if let Some(ty) = node.named_child(1) {
                let text = node_text(ty, src);
                if text != "const" {
                    return text.to_string();
                }
            }
        }
        match node.named_child(0) {
            Some(inner) => self.widen_expression(inner, src),
            None => "any".to_string(),
        }
    }
}

fn wants_tsx(path_hint: &str) -> bool {
    let lower = path_hint.to_ascii_lowercase();
    lower.ends_with(".tsx") || lower.ends_with(".jsx")
}

fn is_declaration_kind(kind: &str) -> bool {
    matches!(
        kind,
        "function_declaration"
            | "function_signature"
            | "generator_function_declaration"
            | "class_declaration"
            | "abstract_class_declaration"
            | "interface_declaration"
            | "type_alias_declaration"
            | "enum_declaration"
            | "lexical_declaration"
            | "variable_declaration"
    )
}

fn node_text<'a>(node: Node, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or_default()
}

fn declared_name(node: Node, src: &[u8]) -> Option<String> {
    if let Some(name) = node.child_by_field_name("name") {
        return Some(node_text(name, src).to_string());
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "identifier" | "type_identifier") {
            return Some(node_text(child, src).to_string());
        }
    }
    None
}

/// `export default <expr>` without a `value` field: take the first named
/// child that is not a clause or comment.
fn default_export_value(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| !matches!(child.kind(), "export_clause" | "comment"))
}

fn collect_specifiers(clause: Node, src: &[u8], clause_type_only: bool) -> Vec<ExportSpecifier> {
    let mut specifiers = Vec::new();
    let mut cursor = clause.walk();
    for child in clause.named_children(&mut cursor) {
        if child.kind() != "export_specifier" {
            continue;
        }
        let Some(local) = child.child_by_field_name("name") else {
            continue;
        };
        let local = node_text(local, src).to_string();
        let exported = child
            .child_by_field_name("alias")
            .map(|alias| node_text(alias, src).to_string())
            .unwrap_or_else(|| local.clone());
        let mut type_only = clause_type_only;
        let mut spec_cursor = child.walk();
        for token in child.children(&mut spec_cursor) {
            if token.kind() == "type" {
                type_only = true;
            }
        }
        specifiers.push(ExportSpecifier {
            local,
            exported,
            type_only,
        });
    }
    specifiers
}

fn strip_annotation(text: &str) -> String {
    text.trim().trim_start_matches(':').trim().to_string()
}

/// Rebuild a parameter list as printable type text: annotations kept,
/// optional markers kept, default values dropped.
fn rebuild_params(node: Node, src: &[u8]) -> String {
    if node.kind() != "formal_parameters" {
        // single bare arrow parameter
        return format!("({})", node_text(node, src));
    }
    let mut parts = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "required_parameter" | "optional_parameter" => {
                let pattern = child
                    .child_by_field_name("pattern")
                    .map(|p| node_text(p, src).to_string())
                    .unwrap_or_default();
                let marker = if child.kind() == "optional_parameter" {
                    "?"
                } else {
                    ""
                };
                match child.child_by_field_name("type") {
                    Some(annotation) => parts.push(format!(
                        "{pattern}{marker}: {}",
                        strip_annotation(node_text(annotation, src))
                    )),
                    None => parts.push(format!("{pattern}{marker}")),
                }
            }
            "comment" => {}
            _ => parts.push(node_text(child, src).to_string()),
        }
    }
    format!("({})", parts.join(", "))
}

fn interface_members(node: Node, src: &[u8]) -> Vec<MemberSig> {
    let Some(body) = node.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut members = Vec::new();
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "property_signature" => {
                let Some(name) = member.child_by_field_name("name") else {
                    continue;
                };
                let type_text = member
                    .child_by_field_name("type")
                    .map(|t| strip_annotation(node_text(t, src)))
                    .unwrap_or_else(|| "any".to_string());
                members.push(MemberSig {
                    name: node_text(name, src).trim_matches(['"', '\'']).to_string(),
                    optional: has_question_mark(member),
                    type_text,
                });
            }
            "method_signature" => {
                let Some(name) = member.child_by_field_name("name") else {
                    continue;
                };
                let params = member
                    .child_by_field_name("parameters")
                    .map(|p| rebuild_params(p, src))
                    .unwrap_or_else(|| "()".to_string());
                let ret = member
                    .child_by_field_name("return_type")
                    .map(|r| strip_annotation(node_text(r, src)))
                    .unwrap_or_else(|| "any".to_string());
                members.push(MemberSig {
                    name: node_text(name, src).to_string(),
                    optional: has_question_mark(member),
                    type_text: format!("{params} => {ret}"),
                });
            }
            // index/call/construct signatures carry no named member
            _ => {}
        }
    }
    members
}

fn has_question_mark(member: Node) -> bool {
    let mut cursor = member.walk();
    for child in member.children(&mut cursor) {
        if child.kind() == "?" {
            return true;
        }
    }
    false
}

/// Printable object-literal form of an interface, the oracle's widened
/// representation of it.
fn object_text(members: &[MemberSig]) -> String {
    if members.is_empty() {
        return "{}".to_string();
    }
    let mut out = String::from("{ ");
    for (i, member) in members.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        out.push_str(&member.name);
        if member.optional {
            out.push('?');
        }
        out.push_str(": ");
        out.push_str(&member.type_text);
    }
    out.push_str(" }");
    out
}

/// Enums print as a union of member literal types: auto-incremented
/// numbers unless an initializer says otherwise.
fn enum_union_text(node: Node, src: &[u8]) -> String {
    let Some(body) = node.child_by_field_name("body") else {
        return "any".to_string();
    };
    let mut arms = Vec::new();
    let mut next_auto: i64 = 0;
    let mut cursor = body.walk();
    for member in body.named_children(&mut cursor) {
        match member.kind() {
            "property_identifier" | "string" => {
                arms.push(next_auto.to_string());
                next_auto += 1;
            }
            "enum_assignment" => {
                let value = member
                    .child_by_field_name("value")
                    .map(|v| node_text(v, src).trim().to_string())
                    .unwrap_or_default();
                if let Ok(n) = value.parse::<i64>() {
                    arms.push(n.to_string());
                    next_auto = n + 1;
                } else if !value.is_empty() {
                    arms.push(value);
                } else {
                    arms.push(next_auto.to_string());
                    next_auto += 1;
                }
            }
            _ => {}
        }
    }
    if arms.is_empty() {
        "any".to_string()
    } else {
        arms.join(" | ")
    }
}

fn pattern_binding_names(node: Node, src: &[u8], names: &mut Vec<String>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            names.push(node_text(node, src).to_string());
            return;
        }
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                pattern_binding_names(value, src, names);
            }
            return;
        }
        "assignment_pattern" => {
            if let Some(left) = node.child_by_field_name("left") {
                pattern_binding_names(left, src, names);
            }
            return;
        }
        "rest_pattern" => {
            if let Some(arg) = node.named_child(0) {
                pattern_binding_names(arg, src, names);
            }
            return;
        }
        _ => {}
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        pattern_binding_names(child, src, names);
    }
}

// ------------------------------- Tests ------------------------------------ //
