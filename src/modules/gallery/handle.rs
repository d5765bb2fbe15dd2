use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::modules::utils::time::get_current_timestamp;

const HANDLE_SCHEME: &str = "blob:biosync/";

/// A file the user picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
    pub path: PathBuf,
}

impl SelectedFile {
    /// Describe a file on disk by its name and current size
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            path: path.to_path_buf(),
        })
    }
}

/// Opaque reference to an accepted image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub url: String,
    pub name: String,
    pub added_at: u64,
}

/// Turns picked files into displayable references and releases them again
pub trait HandleSource {
    fn create(&mut self, file: &SelectedFile) -> io::Result<ImageHandle>;

    fn revoke(&mut self, handle: &ImageHandle);
}

/// Hands out `blob:`-style references for files on the local disk
#[derive(Debug, Default)]
pub struct LocalHandleSource {
    live: HashMap<String, PathBuf>,
}

impl LocalHandleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live.contains_key(url)
    }

    /// Path behind a live handle
    pub fn resolve(&self, url: &str) -> Option<&Path> {
        self.live.get(url).map(PathBuf::as_path)
    }

    fn fresh_url(&self) -> String {
        loop {
            let id: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(32)
                .map(char::from)
                .collect();
            let url = format!("{}{}", HANDLE_SCHEME, id.to_lowercase());
            if !self.live.contains_key(&url) {
                return url;
            }
        }
    }
}

impl HandleSource for LocalHandleSource {
    fn create(&mut self, file: &SelectedFile) -> io::Result<ImageHandle> {
        // The file has to still be there when the handle is issued
        fs::metadata(&file.path)?;

        let url = self.fresh_url();
        self.live.insert(url.clone(), file.path.clone());

        Ok(ImageHandle {
            url,
            name: file.name.clone(),
            added_at: get_current_timestamp(),
        })
    }

    fn revoke(&mut self, handle: &ImageHandle) {
        self.live.remove(&handle.url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_selected_file_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 100]).unwrap();

        let selected = SelectedFile::from_path(file.path()).unwrap();
        assert_eq!(selected.size, 100);
        assert_eq!(
            selected.name,
            file.path().file_name().unwrap().to_string_lossy()
        );

        let dir = tempdir().unwrap();
        assert!(SelectedFile::from_path(dir.path()).is_err());
        assert!(SelectedFile::from_path(&dir.path().join("missing.png")).is_err());
    }

    #[test]
    fn test_create_and_revoke() {
        let file = NamedTempFile::new().unwrap();
        let selected = SelectedFile::from_path(file.path()).unwrap();
        let mut source = LocalHandleSource::new();

        let first = source.create(&selected).unwrap();
        let second = source.create(&selected).unwrap();
        assert!(first.url.starts_with("blob:biosync/"));
        assert_ne!(first.url, second.url);
        assert!(source.is_live(&first.url));
        assert_eq!(source.resolve(&first.url), Some(file.path()));

        source.revoke(&first);
        assert!(!source.is_live(&first.url));
        assert!(source.resolve(&first.url).is_none());
        assert!(source.is_live(&second.url));
    }

    #[test]
    fn test_create_fails_for_vanished_file() {
        let dir = tempdir().unwrap();
        let selected = SelectedFile {
            name: "gone.png".to_string(),
            size: 10,
            path: dir.path().join("gone.png"),
        };
        let mut source = LocalHandleSource::new();
        assert!(source.create(&selected).is_err());
    }
}
