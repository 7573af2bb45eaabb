//! Pipeline entry point: target → schema document.
//!
//! Resolution and loading are the only fallible boundary; once the module
//! text is in hand, every export flows through oracle → props expansion →
//! parse → synthesis independently. Exports share nothing but the
//! read-only declaration index, so the per-export stage runs in parallel;
//! the ordered collect keeps document order equal to enumeration order.

use colored::Colorize;
use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::expand;
use crate::exports::{self, ExportedBinding};
use crate::loader::Loader;
use crate::oracle::ModuleOracle;
use crate::resolve;
use crate::schema;

/// Compute the schema document for `target`. Terminal failures (load,
/// manifest, module) return an error and never a partial document;
/// unresolved exports are skipped with a warning.
pub fn compute_schema(target: &str, loader: &dyn Loader) -> Result<Value, SchemaError> {
    let oracle = introspect(target, loader)?;
    let bindings = exports::enumerate(oracle.items());

    let fragments: Vec<(String, Option<Value>)> = bindings
        .par_iter()
        .map(|binding| (binding.name.clone(), fragment_for(binding, &oracle)))
        .collect();

    let mut properties = Map::new();
    for (name, fragment) in fragments {
        match fragment {
            Some(fragment) => {
                properties.insert(name, fragment);
            }
            None => warn_unresolved(&name),
        }
    }
    Ok(schema::document(properties))
}

/// Enumerated export names for `target`, in document order.
pub fn list_exports(target: &str, loader: &dyn Loader) -> Result<Vec<String>, SchemaError> {
    let oracle = introspect(target, loader)?;
    Ok(exports::enumerate(oracle.items())
        .into_iter()
        .map(|binding| binding.name)
        .collect())
}

fn introspect(target: &str, loader: &dyn Loader) -> Result<ModuleOracle, SchemaError> {
    let module_path = resolve::resolve_entry(target, loader)?;
    let source = loader
        .load_file(&module_path)
        .map_err(|err| SchemaError::ModuleNotFound {
            path: module_path.clone(),
            message: err.message,
        })?;
    ModuleOracle::parse_module(&module_path, &source).map_err(|err| SchemaError::ModuleNotFound {
        path: module_path.clone(),
        message: err.to_string(),
    })
}

fn fragment_for(binding: &ExportedBinding, oracle: &ModuleOracle) -> Option<Value> {
    let text = oracle.type_text(binding)?;
    let ty = expand::expand(&text, oracle.decl_index());
    Some(schema::synthesize(&ty))
}

fn warn_unresolved(name: &str) {
    eprintln!(
        "{} export `{name}` has no resolvable symbol; skipped",
        "warning:".yellow().bold()
    );
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ManifestError;
    use crate::loader::FsLoader;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use std::path::Path;

    fn write_file(path: &Path, content: &str) {
        let mut file = std::fs::File::create(path).unwrap();
        write!(file, "{content}").unwrap();
    }

    #[test]
    fn end_to_end_module_schema() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("mod.ts");
        write_file(
            &module,
            concat!(
                "export const name = \"svc\";\n",
                "export function check(flag: boolean): string | null { return null; }\n",
                "const retries = 3;\n",
                "export { retries as attempts };\n",
            ),
        );

        let doc = compute_schema(module.to_str().unwrap(), &FsLoader).unwrap();
        assert_eq!(doc["$schema"], schema::SCHEMA_DRAFT);
        assert_eq!(doc["type"], "object");

        let properties = doc["properties"].as_object().unwrap();
        let names: Vec<_> = properties.keys().cloned().collect();
        assert_eq!(names, vec!["name", "check", "attempts"]);

        assert_eq!(properties["name"], json!({ "type": "string" }));
        assert_eq!(properties["attempts"], json!({ "type": "number" }));
        // the trailing `| null` binds to the whole signature (union splits
        // before the arrow), so the function fragment is nullable
        assert_eq!(properties["check"]["nullable"], json!(true));
        assert_eq!(properties["check"]["returns"], json!({ "type": "string" }));
    }

    #[test]
    fn component_props_expand_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("button.tsx");
        write_file(
            &module,
            concat!(
                "interface ButtonProps {\n",
                "  label: string;\n",
                "  count?: number;\n",
                "}\n",
                "export const Button: React.FC<ButtonProps> = (props) => <button />;\n",
            ),
        );

        let doc = compute_schema(module.to_str().unwrap(), &FsLoader).unwrap();
        let button = &doc["properties"]["Button"];
        assert_eq!(button["type"], "object");
        assert_eq!(button["description"], "Component: React.FC<ButtonProps>");
        assert_eq!(button["properties"]["label"], json!({ "type": "string" }));
        assert_eq!(button["required"], json!(["label"]));
    }

    #[test]
    fn directory_without_main_yields_no_partial_document() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("package.json"), r#"{ "name": "pkg" }"#);

        let err = compute_schema(dir.path().to_str().unwrap(), &FsLoader).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Manifest(ManifestError::MissingMain { .. })
        ));
    }

    #[test]
    fn directory_with_main_resolves_module() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            &dir.path().join("package.json"),
            r#"{ "name": "pkg", "main": "index.ts" }"#,
        );
        write_file(&dir.path().join("index.ts"), "export const ok = true;\n");

        let doc = compute_schema(dir.path().to_str().unwrap(), &FsLoader).unwrap();
        assert_eq!(doc["properties"]["ok"], json!({ "type": "boolean" }));
    }

    #[test]
    fn missing_module_is_module_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            &dir.path().join("package.json"),
            r#"{ "main": "absent.ts" }"#,
        );

        let err = compute_schema(dir.path().to_str().unwrap(), &FsLoader).unwrap_err();
        assert!(matches!(err, SchemaError::ModuleNotFound { .. }));
    }

    #[test]
    fn unresolved_reexport_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("mod.ts");
        write_file(
            &module,
            concat!(
                "export const kept = 1;\n",
                "export { helper } from \"./other\";\n",
            ),
        );

        let doc = compute_schema(module.to_str().unwrap(), &FsLoader).unwrap();
        let properties = doc["properties"].as_object().unwrap();
        assert!(properties.contains_key("kept"));
        assert!(!properties.contains_key("helper"));
    }

    #[test]
    fn exports_listing_matches_document_order() {
        let dir = tempfile::tempdir().unwrap();
        let module = dir.path().join("mod.ts");
        write_file(
            &module,
            concat!(
                "export const a = 1;\n",
                "export default function f() {}\n",
                "export { a as b };\n",
            ),
        );

        let names = list_exports(module.to_str().unwrap(), &FsLoader).unwrap();
        assert_eq!(names, vec!["a", "default", "b"]);
    }
}
