//! Locale data read from a directory tree.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use futures_util::future::{BoxFuture, FutureExt};
use tracing::trace;

use super::{LoadResult, LocaleDataProvider};
use crate::error::DataError;
use crate::locale::ROOT_SPEC;

/// Reads `<root>/<lang>/<Script>/<REGION>/<basename>.json`.
///
/// The root locale lives directly under `<root>`. Asynchronous loads use
/// `tokio::fs` and so need a Tokio runtime.
#[derive(Debug, Clone)]
pub struct DirectoryData {
    root: PathBuf,
}

impl DirectoryData {
    /// Serve data from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `basename` for `spec`.
    pub fn path_for(&self, basename: &str, spec: &str) -> PathBuf {
        let mut path = self.root.clone();
        if spec != ROOT_SPEC {
            path.extend(spec.split('-'));
        }
        path.push(format!("{basename}.json"));
        path
    }

    fn decode(
        basename: &str,
        spec: &str,
        path: PathBuf,
        read: std::io::Result<String>,
    ) -> LoadResult {
        match read {
            Ok(text) => {
                trace!("Read {}", path.display());
                serde_json::from_str(&text)
                    .map(Some)
                    .map_err(|e| DataError::malformed(basename, spec, e))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DataError::Read { path, source }),
        }
    }
}

impl LocaleDataProvider for DirectoryData {
    fn load_sync(&self, basename: &str, spec: &str) -> LoadResult {
        let path = self.path_for(basename, spec);
        let read = std::fs::read_to_string(&path);
        Self::decode(basename, spec, path, read)
    }

    fn load(&self, basename: &str, spec: &str) -> BoxFuture<'static, LoadResult> {
        let path = self.path_for(basename, spec);
        let basename = basename.to_string();
        let spec = spec.to_string();

        async move {
            let read = tokio::fs::read_to_string(&path).await;
            Self::decode(&basename, &spec, path, read)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn test_paths() {
        let data = DirectoryData::new("/data");
        assert_eq!(
            data.path_for("address", "und-US"),
            PathBuf::from("/data/und/US/address.json")
        );
        assert_eq!(
            data.path_for("ctrynames", "zh-Hant-HK"),
            PathBuf::from("/data/zh/Hant/HK/ctrynames.json")
        );
        assert_eq!(data.path_for("address", "root"), PathBuf::from("/data/address.json"));
    }

    #[test]
    fn test_load_sync() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "und/QQ/address.json", r#"{"formats": {"default": "{locality}"}}"#);
        write(dir.path(), "en/ctrynames.json", "{oops");

        let data = DirectoryData::new(dir.path());
        assert_eq!(
            data.load_sync("address", "und-QQ").unwrap(),
            Some(json!({"formats": {"default": "{locality}"}}))
        );
        assert_eq!(data.load_sync("address", "und-QX").unwrap(), None);
        assert!(matches!(
            data.load_sync("ctrynames", "en"),
            Err(DataError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_async() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "de/addressres.json", r#"{"City": "Ort"}"#);

        let data = DirectoryData::new(dir.path());
        assert_eq!(
            data.load("addressres", "de").await.unwrap(),
            Some(json!({"City": "Ort"}))
        );
        assert_eq!(data.load("addressres", "fr").await.unwrap(), None);
    }
}
