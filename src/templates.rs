//! Template store module
//!
//! Resolves template names to rendered page bytes. Rendering is verbatim:
//! the file's contents are returned unchanged, no substitution occurs.
//!
//! In debug mode every render re-reads the file from disk so edits show up
//! without a restart. Otherwise the bytes are cached after the first read;
//! `flush` empties the cache (wired to SIGHUP).

use hyper::body::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

/// Template resolution failure, surfaced to clients as a 500
#[derive(Debug)]
pub enum TemplateError {
    /// Template file does not exist
    NotFound { name: String },
    /// Template file exists but could not be read
    Io { name: String, source: io::Error },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "template '{name}' not found"),
            Self::Io { name, source } => write!(f, "failed to read template '{name}': {source}"),
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Named template store backed by a directory on disk
pub struct TemplateStore {
    dir: PathBuf,
    debug: bool,
    cache: RwLock<HashMap<String, Bytes>>,
}

impl TemplateStore {
    pub fn new(templates_dir: &str, debug: bool) -> Self {
        Self {
            dir: PathBuf::from(templates_dir),
            debug,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Render the named template to its byte contents.
    ///
    /// Debug mode always reads from disk; otherwise a cached copy is
    /// returned when present and the read result is cached for next time.
    pub async fn render(&self, name: &str) -> Result<Bytes, TemplateError> {
        if !self.debug {
            let cache = self.cache.read().await;
            if let Some(content) = cache.get(name) {
                return Ok(content.clone());
            }
        }

        let path = self.dir.join(name);
        let content = match fs::read(&path).await {
            Ok(c) => Bytes::from(c),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(TemplateError::NotFound {
                    name: name.to_string(),
                });
            }
            Err(e) => {
                return Err(TemplateError::Io {
                    name: name.to_string(),
                    source: e,
                });
            }
        };

        if !self.debug {
            let mut cache = self.cache.write().await;
            cache.insert(name.to_string(), content.clone());
        }

        Ok(content)
    }

    /// Drop all cached templates so the next render re-reads from disk
    pub async fn flush(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn fixture_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pageserve-tpl-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_template(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[tokio::test]
    async fn test_render_returns_file_bytes_verbatim() {
        let dir = fixture_dir("verbatim");
        write_template(&dir, "index.html", "<html>hello</html>");
        let store = TemplateStore::new(dir.to_str().unwrap(), false);

        let content = store.render("index.html").await.unwrap();
        assert_eq!(&content[..], b"<html>hello</html>");
    }

    #[tokio::test]
    async fn test_missing_template_is_not_found() {
        let dir = fixture_dir("missing");
        let store = TemplateStore::new(dir.to_str().unwrap(), false);

        let err = store.render("nope.html").await.unwrap_err();
        assert!(matches!(err, TemplateError::NotFound { .. }));
        assert!(err.to_string().contains("nope.html"));
    }

    #[tokio::test]
    async fn test_debug_mode_rereads_on_every_render() {
        let dir = fixture_dir("debug-reload");
        write_template(&dir, "page.html", "v1");
        let store = TemplateStore::new(dir.to_str().unwrap(), true);

        assert_eq!(&store.render("page.html").await.unwrap()[..], b"v1");
        write_template(&dir, "page.html", "v2");
        assert_eq!(&store.render("page.html").await.unwrap()[..], b"v2");
    }

    #[tokio::test]
    async fn test_release_mode_caches_until_flush() {
        let dir = fixture_dir("cached");
        write_template(&dir, "page.html", "v1");
        let store = TemplateStore::new(dir.to_str().unwrap(), false);

        assert_eq!(&store.render("page.html").await.unwrap()[..], b"v1");
        write_template(&dir, "page.html", "v2");
        // Still the cached copy
        assert_eq!(&store.render("page.html").await.unwrap()[..], b"v1");

        store.flush().await;
        assert_eq!(&store.render("page.html").await.unwrap()[..], b"v2");
    }
}
