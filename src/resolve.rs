//! Target classification and entry-point resolution.
//!
//! A target is a local file, a local directory, a GitHub blob URL, or a
//! GitHub repository root. Blob URLs are rewritten to raw-content fetches;
//! directory-ish targets resolve their module through the manifest's `main`
//! field, which is required.

use std::path::Path;

use crate::error::SchemaError;
use crate::loader::Loader;
use crate::manifest;

/// Branch assumed for repository-root references.
pub const DEFAULT_BRANCH: &str = "main";

const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    LocalFile(String),
    LocalDir(String),
    /// Directly fetchable URL (blob URLs already rewritten to raw).
    RemoteFile(String),
    RemoteRepo { owner: String, repo: String },
}

pub fn classify(target: &str) -> Target {
    if let Some(rest) = target
        .strip_prefix("https://")
        .or_else(|| target.strip_prefix("http://"))
    {
        let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
        if host == "github.com" {
            if let Some(raw) = rewrite_blob_url(target) {
                return Target::RemoteFile(raw);
            }
            let mut segments = path.split('/').filter(|s| !s.is_empty());
            if let (Some(owner), Some(repo)) = (segments.next(), segments.next()) {
                return Target::RemoteRepo {
                    owner: owner.to_string(),
                    repo: repo.trim_end_matches(".git").to_string(),
                };
            }
        }
        return Target::RemoteFile(target.to_string());
    }
    if Path::new(target).is_dir() {
        Target::LocalDir(target.to_string())
    } else {
        Target::LocalFile(target.to_string())
    }
}

/// `github.com/{owner}/{repo}/blob/{branch}/{path}` →
/// `raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}`.
pub fn rewrite_blob_url(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))?;
    let (owner, rest) = rest.split_once('/')?;
    let (repo, rest) = rest.split_once('/')?;
    let rest = rest.strip_prefix("blob/")?;
    Some(format!("https://raw.githubusercontent.com/{owner}/{repo}/{rest}"))
}

pub fn raw_url(owner: &str, repo: &str, branch: &str, path: &str) -> String {
    format!("https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}")
}

pub fn api_contents_url(owner: &str, repo: &str, path: &str) -> String {
    format!("https://api.github.com/repos/{owner}/{repo}/contents/{path}")
}

/// Resolve the module to load for `target`. Directory and repository
/// targets go through the manifest; its absence or a missing `main` field
/// aborts the invocation.
pub fn resolve_entry(target: &str, loader: &dyn Loader) -> Result<String, SchemaError> {
    let use_api = loader.prefers_api();
    match classify(target) {
        Target::LocalFile(path) => Ok(path),
        Target::RemoteFile(url) => Ok(url),
        Target::LocalDir(dir) => {
            let manifest_path = Path::new(&dir).join(MANIFEST_FILE);
            let manifest_path = manifest_path.to_string_lossy();
            let text = loader.load_file(&manifest_path)?;
            let parsed = manifest::parse(&manifest_path, &text)?;
            let main = manifest::require_main(&manifest_path, &parsed)?;
            let main = main.trim_start_matches("./");
            Ok(Path::new(&dir).join(main).to_string_lossy().into_owned())
        }
        Target::RemoteRepo { owner, repo } => {
            let locate = |path: &str| {
                if use_api {
                    api_contents_url(&owner, &repo, path)
                } else {
                    raw_url(&owner, &repo, DEFAULT_BRANCH, path)
                }
            };
            let manifest_url = locate(MANIFEST_FILE);
            let text = loader.load_file(&manifest_url)?;
            let parsed = manifest::parse(&manifest_url, &text)?;
            let main = manifest::require_main(&manifest_url, &parsed)?;
            Ok(locate(main.trim_start_matches("./")))
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
