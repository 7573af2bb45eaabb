// Declaration-level view of a module: what the oracle reports, what the
// export enumerator consumes. Type text stays on the oracle side.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Function,
    Class,
    Variable,
    Interface,
    TypeAlias,
    Enum,
}

/// One top-level declaration with its export modifiers. A variable
/// statement declaring several bindings yields one `Declaration` each.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    pub exported: bool,
    pub default: bool,
}

/// One entry of `export { a, b as c }`. `local` is the symbol to query the
/// oracle with; `exported` is the outward name.
#[derive(Debug, Clone)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
    pub type_only: bool,
}

#[derive(Debug, Clone)]
pub enum ModuleItem {
    Decl(Declaration),
    ExportClause(Vec<ExportSpecifier>),
    /// `export default <expr>` with a non-declaration expression; carries
    /// the expression text.
    DefaultExpr(String),
}
