//! Markdown API handlers
//!
//! Two endpoints back the viewer front-end: the file tree over the
//! content root, and the raw text of a single Markdown file. Every
//! failure on the file endpoint collapses into the same generic 404,
//! whether the parameter is missing, the file is absent, the extension
//! is wrong, or the path tries to escape the content root.

use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::tree::{self, MARKDOWN_EXT};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

use super::query;

/// Serve the Markdown file tree as JSON
///
/// The tree is rebuilt from the filesystem on every request. A missing
/// content root degrades to an empty tree rather than an error.
pub fn serve_file_tree(state: &Arc<AppState>, is_head: bool) -> Response<Full<Bytes>> {
    let file_tree = tree::build_tree(Path::new(&state.config.content.root));
    let body = serde_json::to_string(&file_tree).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to serialize file tree: {e}"));
        "{}".to_string()
    });
    http::build_json_response(body, is_head)
}

/// Serve the raw contents of one Markdown file
///
/// The file is addressed by the `path` query parameter, relative to the
/// content root.
pub async fn serve_file_content(
    raw_query: Option<&str>,
    state: &Arc<AppState>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let Some(relative) = raw_query.and_then(|q| query::query_param(q, "path")) else {
        return http::build_404_response();
    };

    match load_markdown(&state.config.content.root, &relative).await {
        Some(content) => http::build_text_response(content, is_head),
        None => http::build_404_response(),
    }
}

/// Load a Markdown file scoped to the content root
///
/// Requirements, all checked before the file is opened: the name ends in
/// `.md`, the resolved path is a regular file, and its canonical form is
/// contained within the canonical content root. Any miss returns `None`.
pub async fn load_markdown(root: &str, relative: &str) -> Option<String> {
    if !relative.ends_with(MARKDOWN_EXT) {
        return None;
    }

    let joined = Path::new(root).join(relative.trim_start_matches('/'));

    let root_canonical = Path::new(root).canonicalize().ok()?;
    let Ok(file_canonical) = joined.canonicalize() else {
        return None;
    };
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            file_canonical.display()
        ));
        return None;
    }
    if !file_canonical.is_file() {
        return None;
    }

    match fs::read_to_string(&file_canonical).await {
        Ok(content) => Some(content),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_canonical.display()
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = File::create(dir.join(name)).expect("create file");
        f.write_all(contents.as_bytes()).expect("write file");
    }

    #[tokio::test]
    async fn test_reads_markdown_verbatim() {
        let dir = TempDir::new().expect("tempdir");
        write_file(dir.path(), "notes.md", "# Hello");
        let root = dir.path().to_str().unwrap();

        let content = load_markdown(root, "notes.md").await;
        assert_eq!(content.as_deref(), Some("# Hello"));
    }

    #[tokio::test]
    async fn test_nested_path() {
        let dir = TempDir::new().expect("tempdir");
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).expect("mkdir");
        write_file(&sub, "c.md", "content");
        let root = dir.path().to_str().unwrap();

        assert_eq!(
            load_markdown(root, "sub/c.md").await.as_deref(),
            Some("content")
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = TempDir::new().expect("tempdir");
        let root = dir.path().to_str().unwrap();
        assert!(load_markdown(root, "missing.md").await.is_none());
    }

    #[tokio::test]
    async fn test_wrong_extension_is_none_even_when_file_exists() {
        let dir = TempDir::new().expect("tempdir");
        write_file(dir.path(), "image.png", "not markdown");
        let root = dir.path().to_str().unwrap();
        assert!(load_markdown(root, "image.png").await.is_none());
    }

    #[tokio::test]
    async fn test_directory_named_like_markdown_is_none() {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir(dir.path().join("folder.md")).expect("mkdir");
        let root = dir.path().to_str().unwrap();
        assert!(load_markdown(root, "folder.md").await.is_none());
    }

    #[tokio::test]
    async fn test_traversal_escape_is_none() {
        let outer = TempDir::new().expect("tempdir");
        write_file(outer.path(), "secret.md", "top secret");
        let inner = outer.path().join("samples");
        std::fs::create_dir(&inner).expect("mkdir");
        let root = inner.to_str().unwrap();

        assert!(load_markdown(root, "../secret.md").await.is_none());
    }
}
