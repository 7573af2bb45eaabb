//! Manifest (`package.json`) parsing with JSON-path context in errors.

use serde::Deserialize;

use crate::error::ManifestError;

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub name: Option<String>,
    pub main: Option<String>,
}

/// Deserialize a manifest, reporting the failing JSON path on error.
pub fn parse(path: &str, src: &str) -> Result<Manifest, ManifestError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, Manifest>(de).map_err(|err| {
        let json_path = err.path().to_string();
        ManifestError::Invalid {
            path: path.to_string(),
            json_path,
            message: err.into_inner().to_string(),
        }
    })
}

/// The `main` field is required wherever a manifest is consulted at all.
pub fn require_main(path: &str, manifest: &Manifest) -> Result<String, ManifestError> {
    manifest
        .main
        .clone()
        .filter(|main| !main.is_empty())
        .ok_or_else(|| ManifestError::MissingMain {
            path: path.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_main_field() {
        let manifest = parse("package.json", r#"{ "name": "pkg", "main": "src/index.ts" }"#)
            .unwrap();
        assert_eq!(require_main("package.json", &manifest).unwrap(), "src/index.ts");
    }

    #[test]
    fn missing_main_is_an_error() {
        let manifest = parse("package.json", r#"{ "name": "pkg" }"#).unwrap();
        let err = require_main("package.json", &manifest).unwrap_err();
        assert!(matches!(err, ManifestError::MissingMain { .. }));
    }

    #[test]
    fn invalid_manifest_reports_json_path() {
        let err = parse("package.json", r#"{ "main": 42 }"#).unwrap_err();
        let ManifestError::Invalid { json_path, .. } = err else {
            panic!("invalid expected");
        };
        assert_eq!(json_path, "main");
    }
}
