//! Maps request targets onto the document root.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::fs;

const INDEX_FILE: &str = "index.html";

/// What the filesystem says about a request target right now.
///
/// Never cached: files may change between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub path: PathBuf,
    pub exists: bool,
    pub is_file: bool,
    /// Only set when the path exists and is a regular file
    pub modified: Option<DateTime<Utc>>,
}

impl ResolvedResource {
    pub fn is_servable(&self) -> bool {
        self.exists && self.is_file
    }
}

/// Resolves `target` against `root` by plain concatenation.
///
/// A target naming a directory is replaced by the directory's `index.html`.
/// `..` segments are not normalized, so a target can reach outside `root`.
pub async fn resolve(root: &str, target: &str) -> ResolvedResource {
    let mut path = format!("{root}{target}");

    if fs::metadata(&path).await.is_ok_and(|m| m.is_dir()) {
        if !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(INDEX_FILE);
    }

    let path = PathBuf::from(path);

    match fs::metadata(&path).await {
        Ok(meta) => {
            let is_file = meta.is_file();
            let modified = if is_file {
                meta.modified().ok().map(DateTime::<Utc>::from)
            } else {
                None
            };

            ResolvedResource {
                path,
                exists: true,
                is_file,
                modified,
            }
        }
        Err(_) => ResolvedResource {
            path,
            exists: false,
            is_file: false,
            modified: None,
        },
    }
}
