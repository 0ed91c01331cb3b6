//! Filesystem collaborator
//!
//! The codec never touches the disk directly. Every read, write, mount and
//! directory listing goes through [`LevelFs`], so tests and embedders can
//! supply their own storage.
//!
//! Paths are relative to the user directory, e.g. `levels/mylevel.vvvvvv`.

use crate::{LevelError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directory holding level files, relative to the user directory
pub const LEVELS_DIR: &str = "levels";

/// Extension of level files
pub const LEVEL_EXTENSION: &str = ".vvvvvv";

/// Storage operations the level codec needs
pub trait LevelFs {
    /// Read a whole file as text, invalid UTF-8 replaced with U+FFFD
    fn load_file(&self, path: &str) -> Result<String>;

    /// Write a whole file, replacing any existing one
    fn save_file(&mut self, path: &str, contents: &str) -> Result<()>;

    /// Whether `path` names a regular file
    fn is_file(&self, path: &str) -> bool;

    /// Whether `path` lives inside currently mounted assets
    fn is_mounted(&self, path: &str) -> bool;

    /// Mount the asset bundle belonging to `path`
    ///
    /// A level without its own assets mounts nothing and succeeds.
    fn mount_assets(&mut self, path: &str) -> Result<()>;

    /// Unmount whatever assets are mounted
    fn unmount_assets(&mut self);

    /// Entries of the level directory, as paths relative to the user directory
    fn enumerate_level_dir(&self) -> Result<Vec<String>>;

    /// Mount a zipped level bundle, returning whether it was mounted
    fn load_zip(&mut self, path: &str) -> bool {
        debug!("Zip bundles unsupported, skipping {}", path);
        false
    }
}

/// Plain-directory implementation of [`LevelFs`]
///
/// # Purpose
/// Serves files from a user directory containing `levels/`. A level's
/// assets are the directory next to it named after the level, e.g.
/// `levels/mylevel/` for `levels/mylevel.vvvvvv`.
#[derive(Debug, Clone)]
pub struct DirFs {
    /// User directory (contains `levels/`)
    root: PathBuf,

    /// Currently mounted asset directory, relative to `root`
    mounted: Option<String>,
}

impl DirFs {
    /// Create a filesystem rooted at `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            mounted: None,
        }
    }

    /// User directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Currently mounted asset directory
    pub fn mounted(&self) -> Option<&str> {
        self.mounted.as_deref()
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl LevelFs for DirFs {
    fn load_file(&self, path: &str) -> Result<String> {
        let full = self.resolve(path);
        if !full.is_file() {
            return Err(LevelError::NotFound(path.to_string()));
        }
        let bytes = fs::read(full)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn save_file(&mut self, path: &str, contents: &str) -> Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, contents).map_err(|e| LevelError::SaveFailed(format!("{}: {}", path, e)))
    }

    fn is_file(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }

    fn is_mounted(&self, path: &str) -> bool {
        match &self.mounted {
            Some(dir) => Path::new(path).starts_with(dir),
            None => false,
        }
    }

    fn mount_assets(&mut self, path: &str) -> Result<()> {
        self.unmount_assets();

        let assets = match path.strip_suffix(LEVEL_EXTENSION) {
            // Level file: optional sibling directory
            Some(stem) => {
                if !self.resolve(stem).is_dir() {
                    return Ok(());
                }
                stem.to_string()
            }
            // Explicit bundle (play-test override): must exist
            None => {
                if !self.resolve(path).is_dir() {
                    warn!("Asset directory {} not found", path);
                    return Err(LevelError::MountFailed(path.to_string()));
                }
                path.to_string()
            }
        };

        debug!("Mounted assets from {}", assets);
        self.mounted = Some(assets);
        Ok(())
    }

    fn unmount_assets(&mut self) {
        if let Some(dir) = self.mounted.take() {
            debug!("Unmounted assets from {}", dir);
        }
    }

    fn enumerate_level_dir(&self) -> Result<Vec<String>> {
        let dir = self.resolve(LEVELS_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<String> = fs::read_dir(&dir)?
            .flatten()
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .map(|name| format!("{}/{}", LEVELS_DIR, name))
            .collect();
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DirFs) {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("levels/withassets")).unwrap();
        fs::write(temp_dir.path().join("levels/a.vvvvvv"), "<MapData/>").unwrap();
        fs::write(temp_dir.path().join("levels/withassets.vvvvvv"), "<MapData/>").unwrap();
        let fs = DirFs::new(temp_dir.path());
        (temp_dir, fs)
    }

    #[test]
    fn test_load_and_save() {
        let (_temp_dir, mut fs) = setup();

        assert_eq!(fs.load_file("levels/a.vvvvvv").unwrap(), "<MapData/>");
        assert!(matches!(
            fs.load_file("levels/missing.vvvvvv"),
            Err(LevelError::NotFound(_))
        ));

        fs.save_file("levels/new.vvvvvv", "hello").unwrap();
        assert!(fs.is_file("levels/new.vvvvvv"));
        assert!(!fs.is_file("levels/withassets"));
    }

    #[test]
    fn test_load_non_utf8_file() {
        let (temp_dir, fs) = setup();
        std::fs::write(
            temp_dir.path().join("levels/latin1.vvvvvv"),
            b"<MetaData><Title>Caf\xe9</Title></MetaData>",
        )
        .unwrap();

        let text = fs.load_file("levels/latin1.vvvvvv").unwrap();
        assert_eq!(text, "<MetaData><Title>Caf\u{FFFD}</Title></MetaData>");
    }

    #[test]
    fn test_mount_assets() {
        let (_temp_dir, mut fs) = setup();

        // No sibling directory: nothing mounted, still fine
        fs.mount_assets("levels/a.vvvvvv").unwrap();
        assert_eq!(fs.mounted(), None);

        fs.mount_assets("levels/withassets.vvvvvv").unwrap();
        assert_eq!(fs.mounted(), Some("levels/withassets"));
        assert!(fs.is_mounted("levels/withassets/graphics/tiles.png"));
        assert!(!fs.is_mounted("levels/a.vvvvvv"));

        fs.unmount_assets();
        assert_eq!(fs.mounted(), None);

        assert!(matches!(
            fs.mount_assets("playtest/nothere"),
            Err(LevelError::MountFailed(_))
        ));
    }

    #[test]
    fn test_enumerate_level_dir() {
        let (_temp_dir, mut fs) = setup();
        assert_eq!(
            fs.enumerate_level_dir().unwrap(),
            vec!["levels/a.vvvvvv", "levels/withassets", "levels/withassets.vvvvvv"]
        );
        assert!(!fs.load_zip("levels/bundle.zip"));
    }

    #[test]
    fn test_enumerate_without_level_dir() {
        let temp_dir = TempDir::new().unwrap();
        let fs = DirFs::new(temp_dir.path());
        assert!(fs.enumerate_level_dir().unwrap().is_empty());
    }
}
