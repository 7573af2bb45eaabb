//! Content acquisition.
//!
//! The pipeline sees exactly one capability: `load_file(path) -> content`.
//! Local paths go through the filesystem, `http(s)` URLs through a blocking
//! `ureq` fetch. An optional GitHub token upgrades `api.github.com`
//! requests to authenticated contents-API fetches; without it only public
//! raw content is reachable, which is a downgrade, not an error.

use crate::error::LoadError;

pub trait Loader: Sync {
    fn load_file(&self, path: &str) -> Result<String, LoadError>;

    /// True when the loader authenticates against the repository contents
    /// API; resolution then builds API URLs instead of raw-content URLs.
    fn prefers_api(&self) -> bool {
        false
    }
}

// ------------------------------- Local ------------------------------------ //

pub struct FsLoader;

impl Loader for FsLoader {
    fn load_file(&self, path: &str) -> Result<String, LoadError> {
        std::fs::read_to_string(path).map_err(|err| LoadError::new(path, err.to_string()))
    }
}

// ------------------------------- Remote ----------------------------------- //

const USER_AGENT: &str = concat!("export-schema/", env!("CARGO_PKG_VERSION"));

pub struct HttpLoader {
    token: Option<String>,
}

impl HttpLoader {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl Loader for HttpLoader {
    fn load_file(&self, url: &str) -> Result<String, LoadError> {
        let mut request = ureq::get(url).header("User-Agent", USER_AGENT);
        if url.starts_with("https://api.github.com/") {
            if let Some(token) = &self.token {
                request = request
                    .header("Authorization", format!("Bearer {token}"))
                    .header("Accept", "application/vnd.github.v3.raw");
            }
        }
        let mut response = request
            .call()
            .map_err(|err| LoadError::new(url, err.to_string()))?;
        response
            .body_mut()
            .read_to_string()
            .map_err(|err| LoadError::new(url, err.to_string()))
    }
}

/// Scheme dispatch: URLs to `HttpLoader`, everything else to `FsLoader`.
pub struct DefaultLoader {
    fs: FsLoader,
    http: HttpLoader,
}

impl DefaultLoader {
    pub fn new(token: Option<String>) -> Self {
        Self {
            fs: FsLoader,
            http: HttpLoader::new(token),
        }
    }

    pub fn has_token(&self) -> bool {
        self.http.has_token()
    }
}

impl Loader for DefaultLoader {
    fn load_file(&self, path: &str) -> Result<String, LoadError> {
        if path.starts_with("http://") || path.starts_with("https://") {
            self.http.load_file(path)
        } else {
            self.fs.load_file(path)
        }
    }

    fn prefers_api(&self) -> bool {
        self.http.has_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn fs_loader_reads_files_and_surfaces_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mod.ts");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "export const a = 1;").unwrap();

        let loaded = FsLoader.load_file(path.to_str().unwrap()).unwrap();
        assert!(loaded.contains("export const a"));

        let missing = dir.path().join("absent.ts");
        let err = FsLoader.load_file(missing.to_str().unwrap()).unwrap_err();
        assert_eq!(err.path, missing.to_str().unwrap());
        assert!(!err.message.is_empty());
    }
}
