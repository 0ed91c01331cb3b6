//! Level listing
//!
//! Building the level list must stay cheap, so metadata is pulled out of each
//! file with a plain text search instead of a full parse.

use crate::entities;
use crate::fs::{LevelFs, LEVEL_EXTENSION};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::warn;

/// Summary of one level file for the level list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMetaData {
    pub title: String,
    pub creator: String,
    pub desc1: String,
    pub desc2: String,
    pub desc3: String,
    pub website: String,

    /// Path relative to the user directory
    pub filename: String,
}

/// Decoded body of the first `<tag>...</tag>` in `source`
///
/// Returns `None` when the tag or its closing tag is missing, or when the
/// body does not decode.
fn find_tag(source: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let start = source.find(&open)? + open.len();
    let len = source[start..].find(&close)?;
    entities::decode(&source[start..start + len])
}

/// Whether `source` has a `MetaData` element that decodes
fn has_metadata(source: &str) -> bool {
    find_tag(source, "MetaData").is_some() || source.contains("<MetaData/>")
}

/// Extract listing metadata from level source text
///
/// Returns `None` when the text has no usable `MetaData` element, i.e. it is
/// not a level.
pub fn probe(source: &str, filename: &str) -> Option<LevelMetaData> {
    if !has_metadata(source) {
        return None;
    }

    let field = |tag: &str| find_tag(source, tag).unwrap_or_default();
    Some(LevelMetaData {
        title: field("Title"),
        creator: field("Creator"),
        desc1: field("Desc1"),
        desc2: field("Desc2"),
        desc3: field("Desc3"),
        website: field("website"),
        filename: filename.to_string(),
    })
}

/// Read and probe one level file
pub fn read_level_metadata<F: LevelFs + ?Sized>(fs: &F, path: &str) -> Option<LevelMetaData> {
    let source = match fs.load_file(path) {
        Ok(source) => source,
        Err(e) => {
            warn!("Level {} not found: {}", path, e);
            return None;
        }
    };

    let metadata = probe(&source, path);
    if metadata.is_none() {
        warn!("Couldn't load metadata for {}", path);
    }
    metadata
}

/// ASCII case-insensitive title order, shorter prefix first
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Sort a level list by title
pub fn sort_by_title(levels: &mut [LevelMetaData]) {
    levels.sort_unstable_by(|a, b| compare_titles(&a.title, &b.title));
}

/// Scan the level directory
///
/// # Purpose
/// Mounts every `.zip` bundle, then probes every regular `.vvvvvv` file
/// that is not part of mounted assets.
///
/// # Arguments
/// * `fs` - Filesystem collaborator
/// * `sort` - Sort the result by title
pub fn scan_levels<F: LevelFs + ?Sized>(fs: &mut F, sort: bool) -> Result<Vec<LevelMetaData>> {
    for path in fs.enumerate_level_dir()? {
        if path.ends_with(".zip") && fs.is_file(&path) {
            fs.load_zip(&path);
        }
    }

    let mut levels: Vec<LevelMetaData> = fs
        .enumerate_level_dir()?
        .into_iter()
        .filter(|path| path.ends_with(LEVEL_EXTENSION))
        .filter(|path| fs.is_file(path) && !fs.is_mounted(path))
        .filter_map(|path| read_level_metadata(&*fs, &path))
        .collect();

    if sort {
        sort_by_title(&mut levels);
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::DirFs;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_probe_fields() {
        let source = "<MapData><Data><MetaData><Creator>Me</Creator>\
<Title>Fish &amp; &#x43;hips</Title><Desc1>one</Desc1><Desc3>&amp;#xZZ;</Desc3>\
</MetaData></Data></MapData>";

        let metadata = probe(source, "levels/fish.vvvvvv").unwrap();
        assert_eq!(metadata.title, "Fish & Chips");
        assert_eq!(metadata.creator, "Me");
        assert_eq!(metadata.desc1, "one");
        assert_eq!(metadata.desc2, "");
        assert_eq!(metadata.desc3, "&#xZZ;");
        assert_eq!(metadata.filename, "levels/fish.vvvvvv");
    }

    #[test]
    fn test_malformed_reference_in_metadata_rejects_file() {
        let source = "<MapData><Data><MetaData><Title>ok</Title>\
<Desc3>&#xZZ;</Desc3></MetaData></Data></MapData>";
        assert!(probe(source, "levels/bad.vvvvvv").is_none());

        let source = "<MapData><Data><MetaData><Title>&#xZZ;</Title></MetaData>\
<Title>shadow</Title></Data></MapData>";
        assert!(probe(source, "levels/bad.vvvvvv").is_none());
    }

    #[test]
    fn test_probe_requires_metadata() {
        assert!(probe("<MapData><Data></Data></MapData>", "x").is_none());
        assert!(probe("<MetaData>unterminated", "x").is_none());
        assert!(probe("<MetaData>&#;</MetaData>", "x").is_none());
        assert!(probe("<MetaData></MetaData>", "x").is_some());
        assert!(probe("<MetaData/>", "x").is_some());
    }

    #[test]
    fn test_metadata_json() {
        let metadata = probe("<MetaData><Title>T</Title></MetaData>", "levels/t.vvvvvv").unwrap();
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["creator"], "");
        assert_eq!(json["filename"], "levels/t.vvvvvv");
    }

    #[test]
    fn test_compare_titles() {
        assert_eq!(compare_titles("abc", "ABD"), Ordering::Less);
        assert_eq!(compare_titles("ab", "abc"), Ordering::Less);
        assert_eq!(compare_titles("Zed", "alpha"), Ordering::Greater);
        assert_eq!(compare_titles("Same", "sAME"), Ordering::Equal);
    }

    #[test]
    fn test_scan_levels() {
        let temp_dir = TempDir::new().unwrap();
        let levels = temp_dir.path().join("levels");
        fs::create_dir_all(levels.join("bravo")).unwrap();
        fs::write(levels.join("b.vvvvvv"), "<MetaData><Title>bravo</Title></MetaData>").unwrap();
        fs::write(levels.join("a.vvvvvv"), "<MetaData><Title>Charlie</Title></MetaData>").unwrap();
        fs::write(levels.join("c.vvvvvv"), "<MetaData><Title>Alpha</Title></MetaData>").unwrap();
        fs::write(levels.join("broken.vvvvvv"), "<MapData/>").unwrap();
        fs::write(levels.join("notes.txt"), "<MetaData/>").unwrap();
        fs::write(levels.join("bravo/inner.vvvvvv"), "<MetaData/>").unwrap();

        let mut dir_fs = DirFs::new(temp_dir.path());
        let found = scan_levels(&mut dir_fs, true).unwrap();
        let titles: Vec<&str> = found.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "bravo", "Charlie"]);
        assert_eq!(found[0].filename, "levels/c.vvvvvv");
    }

    #[test]
    fn test_scan_lists_non_utf8_level() {
        let temp_dir = TempDir::new().unwrap();
        let levels = temp_dir.path().join("levels");
        fs::create_dir_all(&levels).unwrap();
        fs::write(levels.join("e.vvvvvv"), b"<MetaData><Title>Caf\xe9</Title></MetaData>").unwrap();

        let mut dir_fs = DirFs::new(temp_dir.path());
        let found = scan_levels(&mut dir_fs, false).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Caf\u{FFFD}");
    }
}
