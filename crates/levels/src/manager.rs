//! Level session
//!
//! [`LevelManager`] owns the live level together with the storage it came
//! from and remembers which file is loaded, so a later save can keep parts
//! of that file this codec does not model.

use crate::fs::{LevelFs, LEVELS_DIR};
use crate::level::CustomLevel;
use crate::markup::{parse_document, Document};
use crate::metadata::{self, LevelMetaData};
use crate::parser::LevelLoader;
use crate::writer::LevelSaver;
use crate::Result;
use tracing::{debug, error, info, warn};

/// Play-test overrides for loading
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaytestOptions {
    /// Running as a command-line play-test
    pub enabled: bool,

    /// Asset bundle to mount instead of the level's own
    pub assets: String,
}

impl PlaytestOptions {
    fn override_assets(&self) -> Option<&str> {
        (self.enabled && !self.assets.is_empty()).then_some(self.assets.as_str())
    }
}

/// Prefix `path` with the level directory unless it already is
pub fn level_path(path: &str) -> String {
    let prefix = format!("{}/", LEVELS_DIR);
    if path.starts_with(&prefix) {
        path.to_string()
    } else {
        prefix + path
    }
}

/// Level manager
///
/// Provides load/save of the single live level.
pub struct LevelManager<F: LevelFs> {
    /// Storage backend
    fs: F,

    /// The live level
    level: CustomLevel,

    /// File the live level came from (or was last saved to)
    loaded_filepath: Option<String>,

    /// Play-test overrides
    playtest: PlaytestOptions,
}

impl<F: LevelFs> LevelManager<F> {
    /// Create a manager with a blank level
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            level: CustomLevel::new(),
            loaded_filepath: None,
            playtest: PlaytestOptions::default(),
        }
    }

    /// Set play-test overrides used by later loads
    pub fn with_playtest(mut self, playtest: PlaytestOptions) -> Self {
        self.playtest = playtest;
        self
    }

    /// The live level
    pub fn level(&self) -> &CustomLevel {
        &self.level
    }

    /// The live level, mutably
    pub fn level_mut(&mut self) -> &mut CustomLevel {
        &mut self.level
    }

    /// Path of the loaded file, if any
    pub fn loaded_filepath(&self) -> Option<&str> {
        self.loaded_filepath.as_deref()
    }

    /// Storage backend
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Load a level
    ///
    /// # Arguments
    /// * `path` - Level path, with or without the `levels/` prefix
    ///
    /// # Returns
    /// The resolved path. On error the live level is left blank.
    pub fn load(&mut self, path: &str) -> Result<String> {
        let path = level_path(path);

        self.level.reset();
        self.fs.unmount_assets();
        match self.playtest.override_assets() {
            Some(assets) => self.fs.mount_assets(assets)?,
            None => self.fs.mount_assets(&path)?,
        }

        let source = self.fs.load_file(&path).map_err(|e| {
            warn!("{} not found", path);
            e
        })?;

        let document = parse_document(&source).map_err(|e| {
            error!("Error parsing {}: {}", path, e);
            e
        })?;

        self.loaded_filepath = Some(path.clone());
        LevelLoader::read_document(&mut self.level, &document);

        info!(
            "Loaded {} ({}x{} rooms, {} entities)",
            path,
            self.level.mapwidth,
            self.level.mapheight,
            self.level.entities.len()
        );
        Ok(path)
    }

    /// Save the live level as `levels/<name>`
    ///
    /// The previously loaded file is reopened so elements this codec does
    /// not model are carried over. If it cannot be reopened the level is
    /// written fresh.
    pub fn save(&mut self, name: &str) -> Result<String> {
        let path = format!("{}/{}", LEVELS_DIR, name);

        let previous = self.previous_document();
        self.loaded_filepath = Some(path.clone());

        let contents = LevelSaver::serialize_preserving(&self.level, previous);
        self.fs.save_file(&path, &contents)?;

        debug!("Saved {}", path);
        Ok(path)
    }

    fn previous_document(&self) -> Document {
        let Some(loaded) = self.loaded_filepath.as_deref() else {
            return Document::new();
        };

        match self.fs.load_file(loaded).and_then(|source| parse_document(&source)) {
            Ok(document) => document,
            Err(e) => {
                error!("Currently-loaded {} not found: {}", loaded, e);
                Document::new()
            }
        }
    }

    /// List the levels in the level directory
    pub fn list_levels(&mut self, sort: bool) -> Result<Vec<LevelMetaData>> {
        metadata::scan_levels(&mut self.fs, sort)
    }
}
