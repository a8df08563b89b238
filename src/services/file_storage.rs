use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Store for uploaded dataset files, rooted at the configured uploads
/// directory. All paths handed out and accepted are relative to the root.
#[derive(Clone, Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub async fn save(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        let path = self.resolve(relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    pub async fn read_to_string(&self, relative: &str) -> std::io::Result<String> {
        tokio::fs::read_to_string(self.resolve(relative)).await
    }

    pub async fn delete(&self, relative: &str) -> std::io::Result<()> {
        tokio::fs::remove_file(self.resolve(relative)).await
    }
}

/// Uploads are restricted to JSON files.
pub fn is_json_filename(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_json_extension_only() {
        assert!(is_json_filename("train.json"));
        assert!(is_json_filename("TRAIN.JSON"));
        assert!(!is_json_filename("train.csv"));
        assert!(!is_json_filename("train"));
        assert!(!is_json_filename(".json"));
    }

    #[tokio::test]
    async fn save_read_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        storage
            .save("datasets/sample.json", b"[1, 2, 3]")
            .await
            .unwrap();
        let content = storage.read_to_string("datasets/sample.json").await.unwrap();
        assert_eq!(content, "[1, 2, 3]");

        storage.delete("datasets/sample.json").await.unwrap();
        assert!(storage.read_to_string("datasets/sample.json").await.is_err());
    }
}
