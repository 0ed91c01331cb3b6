//! Level file loader
//!
//! Walks the children of `MapData -> Data` and fills a [`CustomLevel`].
//! Loading is forgiving about content: unknown elements are skipped, missing
//! or malformed numbers keep their defaults and undecodable text reads as
//! empty. Only a document that cannot be parsed at all is an error.

use crate::delimited::{self, parse_int};
use crate::entities;
use crate::level::{CustomEntity, CustomLevel};
use crate::markup::{parse_document, Document, Element};
use crate::migrate;
use crate::room::RoomProperty;
use crate::Result;
use vvlevel_core::{LEVEL_VERSION, MAX_HEIGHT, MAX_WIDTH};

/// Closing-tag indentation older editors left inside `edentity` bodies
const LEGACY_ENTITY_SUFFIX: &str = "\n            ";

/// Elements recognised under `Data`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataTag {
    MetaData,
    MapWidth,
    MapHeight,
    LevMusic,
    Contents,
    EdEntities,
    LevelMetaData,
    Script,
    Unknown,
}

impl DataTag {
    fn from_name(name: &str) -> Self {
        match name {
            "MetaData" => Self::MetaData,
            "mapwidth" => Self::MapWidth,
            "mapheight" => Self::MapHeight,
            "levmusic" => Self::LevMusic,
            "contents" => Self::Contents,
            "edEntities" => Self::EdEntities,
            "levelMetaData" => Self::LevelMetaData,
            "script" => Self::Script,
            _ => Self::Unknown,
        }
    }
}

/// Decoded text body, empty when missing or undecodable
fn text_of(element: &Element) -> String {
    element
        .raw_text()
        .map(entities::decode_or_empty)
        .unwrap_or_default()
}

/// Level file loader
pub struct LevelLoader;

impl LevelLoader {
    /// Parse level source text into a fresh level
    pub fn parse(source: &str) -> Result<CustomLevel> {
        let document = parse_document(source)?;
        let mut level = CustomLevel::new();
        Self::read_document(&mut level, &document);
        Ok(level)
    }

    /// Fill `level` from a parsed document
    ///
    /// # Purpose
    /// Resets `level`, reads every recognised element under `Data`, then
    /// migrates legacy `platv` values and stamps the current version.
    /// A document without `Data` yields a blank level.
    pub fn read_document(level: &mut CustomLevel, document: &Document) {
        level.reset();
        level.version = 0;

        let data = document.root().and_then(|root| root.child("Data"));
        match data {
            Some(data) => {
                for element in data.elements() {
                    Self::read_data_element(level, element);
                }
            }
            None => tracing::debug!("Level document has no Data element"),
        }

        let mapwidth = level.mapwidth;
        migrate::unscramble_platv(level.rooms_mut(), mapwidth);
        level.version = LEVEL_VERSION;
    }

    fn read_data_element(level: &mut CustomLevel, element: &Element) {
        match DataTag::from_name(&element.name) {
            DataTag::MetaData => Self::read_metadata(level, element),
            DataTag::MapWidth => {
                level.mapwidth = parse_int(&text_of(element)).clamp(1, MAX_WIDTH);
            }
            DataTag::MapHeight => {
                level.mapheight = parse_int(&text_of(element)).clamp(1, MAX_HEIGHT);
            }
            DataTag::LevMusic => level.levmusic = parse_int(&text_of(element)),
            DataTag::Contents => {
                let text = text_of(element);
                if !text.is_empty() {
                    let run =
                        delimited::read_tile_run(&text, level.mapwidth, level.tiles.data_mut());
                    if run.dropped > 0 {
                        tracing::warn!("Dropped {} tiles outside the map", run.dropped);
                    }
                }
            }
            DataTag::EdEntities => {
                for child in element.elements() {
                    level.entities.push(Self::read_entity(child));
                }
            }
            DataTag::LevelMetaData => Self::read_rooms(level, element),
            DataTag::Script => {
                let text = text_of(element);
                if !text.is_empty() {
                    let block = delimited::read_scripts(&text);
                    if block.orphaned > 0 {
                        tracing::debug!("Discarded {} script lines without a header", block.orphaned);
                    }
                    for script in block.scripts {
                        level.scripts.push(script);
                    }
                }
            }
            DataTag::Unknown => {}
        }
    }

    fn read_metadata(level: &mut CustomLevel, metadata: &Element) {
        for field in metadata.elements() {
            let text = text_of(field);
            match field.name.as_str() {
                "Creator" => level.creator = text,
                "Title" => level.title = text,
                "Modified" => level.modifier = text,
                "Desc1" => level.desc1 = text,
                "Desc2" => level.desc2 = text,
                "Desc3" => level.desc3 = text,
                "website" => level.website = text,
                "onewaycol_override" => level.onewaycol_override = parse_int(&text) != 0,
                _ => {}
            }
        }
    }

    fn read_entity(element: &Element) -> CustomEntity {
        let mut entity = CustomEntity::default();

        if element.raw_text().is_some() {
            let text = text_of(element);
            entity.scriptname = match text.strip_suffix(LEGACY_ENTITY_SUFFIX) {
                Some(trimmed) => trimmed.to_string(),
                None => text,
            };
        }

        let fields: [(&str, &mut i32); 9] = [
            ("x", &mut entity.x),
            ("y", &mut entity.y),
            ("t", &mut entity.t),
            ("p1", &mut entity.p1),
            ("p2", &mut entity.p2),
            ("p3", &mut entity.p3),
            ("p4", &mut entity.p4),
            ("p5", &mut entity.p5),
            ("p6", &mut entity.p6),
        ];
        for (name, slot) in fields {
            if let Some(value) = element.attr_int(name) {
                *slot = value;
            }
        }

        entity
    }

    fn read_rooms(level: &mut CustomLevel, element: &Element) {
        let rooms = level.rooms_mut();
        let mut skipped = 0usize;

        for (i, child) in element.elements().enumerate() {
            let Some(room) = rooms.get_mut(i) else {
                skipped += 1;
                continue;
            };
            Self::read_room(room, child);
        }

        if skipped > 0 {
            tracing::warn!("Ignored {} room entries past the room grid", skipped);
        }
    }

    fn read_room(room: &mut RoomProperty, element: &Element) {
        if element.raw_text().is_some() {
            room.roomname = text_of(element);
        }

        let fields: [(&str, &mut i32); 14] = [
            ("tileset", &mut room.tileset),
            ("tilecol", &mut room.tilecol),
            ("platx1", &mut room.platx1),
            ("platy1", &mut room.platy1),
            ("platx2", &mut room.platx2),
            ("platy2", &mut room.platy2),
            ("platv", &mut room.platv),
            ("enemyx1", &mut room.enemyx1),
            ("enemyy1", &mut room.enemyy1),
            ("enemyx2", &mut room.enemyx2),
            ("enemyy2", &mut room.enemyy2),
            ("enemytype", &mut room.enemytype),
            ("directmode", &mut room.directmode),
            ("warpdir", &mut room.warpdir),
        ];
        for (name, slot) in fields {
            if let Some(value) = element.attr_int(name) {
                *slot = value;
            }
        }
    }
}
