use std::path::Path;

use super::handle::{HandleSource, ImageHandle, LocalHandleSource, SelectedFile};
use crate::modules::config::GalleryConfig;
use crate::modules::forms::FieldErrors;
use crate::modules::utils::logging::log_gallery_event;

const MIB: u64 = 1024 * 1024;

/// Custom error type for gallery operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    /// Some files of a batch were left out; the `added` others still went in
    Rejected {
        oversized: Vec<String>,
        unreadable: Vec<String>,
        added: usize,
        limit: u64,
    },
    IndexOutOfRange(usize),
}

fn format_limit(limit: u64) -> String {
    if limit % MIB == 0 {
        format!("{} MB", limit / MIB)
    } else {
        format!("{} bytes", limit)
    }
}

fn oversized_message(names: &[String], limit: u64) -> String {
    match names {
        [name] => format!("El archivo {} supera el límite de {}.", name, format_limit(limit)),
        _ => format!(
            "Los archivos {} superan el límite de {}.",
            names.join(", "),
            format_limit(limit)
        ),
    }
}

fn unreadable_message(names: &[String]) -> String {
    match names {
        [name] => format!("No se pudo leer el archivo {}.", name),
        _ => format!("No se pudieron leer los archivos {}.", names.join(", ")),
    }
}

impl std::fmt::Display for GalleryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GalleryError::Rejected {
                oversized,
                unreadable,
                limit,
                ..
            } => {
                let mut parts = Vec::new();
                if !oversized.is_empty() {
                    parts.push(oversized_message(oversized, *limit));
                }
                if !unreadable.is_empty() {
                    parts.push(unreadable_message(unreadable));
                }
                write!(f, "{}", parts.join(" "))
            }
            GalleryError::IndexOutOfRange(index) => {
                write!(f, "No existe la imagen número {}.", index + 1)
            }
        }
    }
}

impl std::error::Error for GalleryError {}

/// Result of a delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(ImageHandle),
    Cancelled,
}

/// Ordered list of uploaded images plus the one currently shown enlarged
pub struct GalleryStore<S = LocalHandleSource> {
    source: S,
    config: GalleryConfig,
    handles: Vec<ImageHandle>,
    zoomed: Option<String>,
    errors: FieldErrors,
}

impl GalleryStore {
    pub fn new(config: GalleryConfig) -> Self {
        Self::with_source(LocalHandleSource::new(), config)
    }
}

impl<S: HandleSource> GalleryStore<S> {
    pub fn with_source(source: S, config: GalleryConfig) -> Self {
        Self {
            source,
            config,
            handles: Vec::new(),
            zoomed: None,
            errors: FieldErrors::default(),
        }
    }

    pub fn handles(&self) -> &[ImageHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Message for the last upload batch, if it had rejected files
    pub fn file_error(&self) -> Option<&str> {
        self.errors.file.as_deref()
    }

    /// Append a batch in selection order, skipping files over the size limit
    /// and files that can no longer be read.
    ///
    /// Returns how many handles were added. When something was left out the
    /// error names every such file; accepted files are kept regardless.
    pub fn add(&mut self, files: Vec<SelectedFile>) -> Result<usize, GalleryError> {
        self.add_batch(files, Vec::new())
    }

    /// Same as [`add`](Self::add), starting from paths on disk. Paths that
    /// cannot be opened count as unreadable files of the same batch.
    pub fn add_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, GalleryError> {
        let mut files = Vec::new();
        let mut unreadable = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match SelectedFile::from_path(path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    let name = path.display().to_string();
                    log_gallery_event("add", &name, false, Some(&e.to_string()));
                    unreadable.push(name);
                }
            }
        }
        self.add_batch(files, unreadable)
    }

    fn add_batch(
        &mut self,
        files: Vec<SelectedFile>,
        mut unreadable: Vec<String>,
    ) -> Result<usize, GalleryError> {
        let mut oversized = Vec::new();
        let mut added = 0;

        for file in files {
            if let Some(limit) = self.config.max_upload_bytes {
                if file.size > limit {
                    log_gallery_event("add", &file.name, false, Some("over size limit"));
                    oversized.push(file.name);
                    continue;
                }
            }

            match self.source.create(&file) {
                Ok(handle) => {
                    log_gallery_event("add", &handle.name, true, Some(&handle.url));
                    self.handles.push(handle);
                    added += 1;
                }
                Err(e) => {
                    log_gallery_event("add", &file.name, false, Some(&e.to_string()));
                    unreadable.push(file.name);
                }
            }
        }

        if oversized.is_empty() && unreadable.is_empty() {
            self.errors.file = None;
            return Ok(added);
        }

        let error = GalleryError::Rejected {
            oversized,
            unreadable,
            added,
            limit: self.config.max_upload_bytes.unwrap_or_default(),
        };
        self.errors.file = Some(error.to_string());
        Err(error)
    }

    /// Delete the image at `index`. With confirmations enabled, `confirm` is
    /// asked first and a `false` answer leaves everything as it was.
    pub fn remove<F>(&mut self, index: usize, confirm: F) -> Result<RemoveOutcome, GalleryError>
    where
        F: FnOnce(&ImageHandle) -> bool,
    {
        let handle = self
            .handles
            .get(index)
            .ok_or(GalleryError::IndexOutOfRange(index))?;

        if self.config.confirm_deletions && !confirm(handle) {
            log_gallery_event("remove", &handle.name, false, Some("cancelled"));
            return Ok(RemoveOutcome::Cancelled);
        }

        let handle = self.handles.remove(index);
        if self.zoomed.as_deref() == Some(handle.url.as_str()) {
            self.zoomed = None;
        }
        self.source.revoke(&handle);
        log_gallery_event("remove", &handle.name, true, None);
        Ok(RemoveOutcome::Removed(handle))
    }

    /// Show the image at `index` enlarged, or close the zoom with `None`
    pub fn set_zoom(&mut self, index: Option<usize>) -> Result<(), GalleryError> {
        match index {
            Some(i) => {
                let handle = self.handles.get(i).ok_or(GalleryError::IndexOutOfRange(i))?;
                self.zoomed = Some(handle.url.clone());
            }
            None => self.clear_zoom(),
        }
        Ok(())
    }

    pub fn clear_zoom(&mut self) {
        self.zoomed = None;
    }

    pub fn zoomed(&self) -> Option<&ImageHandle> {
        let url = self.zoomed.as_deref()?;
        self.handles.iter().find(|h| h.url == url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, TempDir};

    fn write_file(dir: &TempDir, name: &str, size: usize) -> SelectedFile {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&vec![0u8; size]).unwrap();
        SelectedFile::from_path(&path).unwrap()
    }

    /// Pretend-size file; only the metadata check in `create` touches disk
    fn sized(dir: &TempDir, name: &str, size: u64) -> SelectedFile {
        let mut file = write_file(dir, name, 0);
        file.size = size;
        file
    }

    fn names(store: &GalleryStore) -> Vec<&str> {
        store.handles().iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_add_batch_in_order() {
        let dir = tempdir().unwrap();
        let mut store = GalleryStore::new(GalleryConfig::default());

        let files = vec![
            write_file(&dir, "a.png", 10),
            write_file(&dir, "b.png", 20),
            write_file(&dir, "c.png", 30),
        ];
        assert_eq!(store.add(files).unwrap(), 3);
        assert_eq!(names(&store), vec!["a.png", "b.png", "c.png"]);
        assert!(store.file_error().is_none());

        assert_eq!(store.add(vec![write_file(&dir, "d.png", 1)]).unwrap(), 1);
        assert_eq!(store.len(), 4);
        for handle in store.handles() {
            assert!(store.source().is_live(&handle.url));
        }
    }

    #[test]
    fn test_oversized_file_rejected() {
        let dir = tempdir().unwrap();
        let mut store = GalleryStore::new(GalleryConfig::default());
        store.add(vec![write_file(&dir, "kept.png", 5)]).unwrap();

        let batch = vec![
            sized(&dir, "ok.png", 2 * MIB),
            sized(&dir, "big.png", 2 * MIB + 1),
        ];
        match store.add(batch) {
            Err(GalleryError::Rejected {
                oversized,
                unreadable,
                added,
                limit,
            }) => {
                assert_eq!(oversized, vec!["big.png".to_string()]);
                assert!(unreadable.is_empty());
                assert_eq!(added, 1);
                assert_eq!(limit, 2 * MIB);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(names(&store), vec!["kept.png", "ok.png"]);
        assert_eq!(
            store.file_error(),
            Some("El archivo big.png supera el límite de 2 MB.")
        );

        // A clean batch clears the message
        store.add(vec![write_file(&dir, "next.png", 1)]).unwrap();
        assert!(store.file_error().is_none());
    }

    #[test]
    fn test_every_rejected_file_is_named() {
        let dir = tempdir().unwrap();
        let mut store = GalleryStore::new(GalleryConfig::default());

        let batch = vec![sized(&dir, "x.png", 3 * MIB), sized(&dir, "y.png", 4 * MIB)];
        let error = store.add(batch).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Los archivos x.png, y.png superan el límite de 2 MB."
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_no_limit() {
        let dir = tempdir().unwrap();
        let config = GalleryConfig {
            max_upload_bytes: None,
            ..GalleryConfig::default()
        };
        let mut store = GalleryStore::new(config);
        assert_eq!(store.add(vec![sized(&dir, "huge.png", 50 * MIB)]).unwrap(), 1);
    }

    fn vanished(dir: &TempDir, name: &str) -> SelectedFile {
        SelectedFile {
            name: name.to_string(),
            size: 1,
            path: dir.path().join(name),
        }
    }

    #[test]
    fn test_vanished_file_does_not_stop_batch() {
        let dir = tempdir().unwrap();
        let mut store = GalleryStore::new(GalleryConfig::default());

        let batch = vec![
            write_file(&dir, "real.png", 1),
            vanished(&dir, "ghost.png"),
            write_file(&dir, "after.png", 1),
        ];
        match store.add(batch) {
            Err(GalleryError::Rejected {
                oversized,
                unreadable,
                added,
                ..
            }) => {
                assert!(oversized.is_empty());
                assert_eq!(unreadable, vec!["ghost.png".to_string()]);
                assert_eq!(added, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(names(&store), vec!["real.png", "after.png"]);
        assert_eq!(
            store.file_error(),
            Some("No se pudo leer el archivo ghost.png.")
        );
    }

    #[test]
    fn test_oversized_and_vanished_both_named() {
        let dir = tempdir().unwrap();
        let mut store = GalleryStore::new(GalleryConfig::default());
        store.add(vec![write_file(&dir, "kept.png", 1)]).unwrap();

        let batch = vec![sized(&dir, "big.png", 3 * MIB), vanished(&dir, "ghost.png")];
        let error = store.add(batch).unwrap_err();
        assert_eq!(
            error.to_string(),
            "El archivo big.png supera el límite de 2 MB. No se pudo leer el archivo ghost.png."
        );
        let message = store.file_error().unwrap();
        assert!(message.contains("big.png"));
        assert!(message.contains("ghost.png"));
        assert_eq!(names(&store), vec!["kept.png"]);
    }

    #[test]
    fn test_add_paths_reports_unopenable_paths() {
        let dir = tempdir().unwrap();
        let mut store = GalleryStore::new(GalleryConfig::default());
        let good = write_file(&dir, "good.png", 1).path;
        let missing = dir.path().join("missing.png");

        let error = store.add_paths(&[good.clone(), missing.clone()]).unwrap_err();
        match error {
            GalleryError::Rejected {
                unreadable, added, ..
            } => {
                assert_eq!(unreadable, vec![missing.display().to_string()]);
                assert_eq!(added, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(names(&store), vec!["good.png"]);
        assert!(store
            .file_error()
            .unwrap()
            .contains(&missing.display().to_string()));

        // A directory is not an image either
        assert!(store.add_paths(&[dir.path()]).is_err());
        assert_eq!(store.len(), 1);

        assert_eq!(store.add_paths(&[good]).unwrap(), 1);
        assert!(store.file_error().is_none());
    }

    #[test]
    fn test_remove_with_confirmation() {
        let dir = tempdir().unwrap();
        let mut store = GalleryStore::new(GalleryConfig::default());
        store
            .add(vec![write_file(&dir, "a.png", 1), write_file(&dir, "b.png", 1)])
            .unwrap();

        let mut asked = None;
        let outcome = store
            .remove(0, |h| {
                asked = Some(h.name.clone());
                false
            })
            .unwrap();
        assert_eq!(outcome, RemoveOutcome::Cancelled);
        assert_eq!(asked.as_deref(), Some("a.png"));
        assert_eq!(store.len(), 2);

        let first_url = store.handles()[0].url.clone();
        match store.remove(0, |_| true).unwrap() {
            RemoveOutcome::Removed(handle) => assert_eq!(handle.name, "a.png"),
            RemoveOutcome::Cancelled => panic!("deletion was confirmed"),
        }
        assert_eq!(names(&store), vec!["b.png"]);
        assert!(!store.source().is_live(&first_url));

        assert!(matches!(
            store.remove(5, |_| true),
            Err(GalleryError::IndexOutOfRange(5))
        ));
    }

    #[test]
    fn test_remove_without_confirmation_step() {
        let dir = tempdir().unwrap();
        let config = GalleryConfig {
            confirm_deletions: false,
            ..GalleryConfig::default()
        };
        let mut store = GalleryStore::new(config);
        store.add(vec![write_file(&dir, "a.png", 1)]).unwrap();

        let outcome = store.remove(0, |_| panic!("should not ask")).unwrap();
        assert!(matches!(outcome, RemoveOutcome::Removed(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_zoom() {
        let dir = tempdir().unwrap();
        let mut store = GalleryStore::new(GalleryConfig::default());
        store
            .add(vec![
                write_file(&dir, "a.png", 1),
                write_file(&dir, "b.png", 1),
                write_file(&dir, "c.png", 1),
            ])
            .unwrap();
        assert!(store.zoomed().is_none());

        store.set_zoom(Some(2)).unwrap();
        assert_eq!(store.zoomed().unwrap().name, "c.png");

        // Zoom follows the image, not the position
        store.remove(0, |_| true).unwrap();
        assert_eq!(store.zoomed().unwrap().name, "c.png");

        store.set_zoom(None).unwrap();
        store.clear_zoom();
        assert!(store.zoomed().is_none());

        store.set_zoom(Some(0)).unwrap();
        store.clear_zoom();
        assert!(store.zoomed().is_none());

        assert!(matches!(
            store.set_zoom(Some(9)),
            Err(GalleryError::IndexOutOfRange(9))
        ));

        store.set_zoom(Some(0)).unwrap();
        store.remove(0, |_| true).unwrap();
        assert!(store.zoomed().is_none());
    }
}
