use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Write-once store for generated assets. Keys are bare file names.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn upload(&self, key: &str, data: &[u8]) -> io::Result<()>;
    async fn download(&self, key: &str) -> io::Result<Vec<u8>>;
    async fn exists(&self, key: &str) -> io::Result<bool>;
}

/// Collision-resistant name for a newly generated PNG.
pub fn new_png_key() -> String {
    format!("{}.png", Uuid::new_v4().simple())
}

/// Reduce a caller-supplied reference to its final path component so lookups
/// never leave the storage directory.
pub fn sanitize_key(reference: &str) -> Option<String> {
    let name = Path::new(reference.trim()).file_name()?.to_str()?;
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> io::Result<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let key = sanitize_key(key).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid key '{}'", key))
        })?;
        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, data: &[u8]) -> io::Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, data).await
    }

    async fn download(&self, key: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_for(key)?).await
    }

    async fn exists(&self, key: &str) -> io::Result<bool> {
        match self.path_for(key) {
            Ok(path) => Ok(fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)),
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_key_strips_directories() {
        assert_eq!(sanitize_key("static/generated/a.png").as_deref(), Some("a.png"));
        assert_eq!(sanitize_key("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_key(".."), None);
        assert_eq!(sanitize_key(""), None);
    }

    #[test]
    fn png_keys_are_unique() {
        let a = new_png_key();
        let b = new_png_key();
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn upload_then_download() {
        let dir = format!("target/test-storage-{}", Uuid::new_v4());
        let storage = LocalStorage::new(&dir).await.unwrap();

        storage.upload("x.png", b"bytes").await.unwrap();
        assert!(storage.exists("x.png").await.unwrap());
        assert!(!storage.exists("y.png").await.unwrap());
        assert_eq!(storage.download("x.png").await.unwrap(), b"bytes");

        let _ = fs::remove_dir_all(&dir).await;
    }
}
