//! Level file writer
//!
//! Saving updates a document in place rather than building a new one, so
//! elements this codec does not know about survive a load/save cycle when
//! the previous file's tree is passed in.

use crate::delimited;
use crate::level::CustomLevel;
use crate::markup::{write_document, Document, Element};
use crate::migrate;

/// Declaration written at the top of every level file
pub const XML_DECLARATION: &str = r#"xml version="1.0" encoding="UTF-8" standalone="no" "#;

/// Comment kept as the first child of `MapData`
pub const SAVE_COMMENT: &str = " Save file ";

/// Level file writer
pub struct LevelSaver;

impl LevelSaver {
    /// Serialize a level into a fresh document
    pub fn serialize(level: &CustomLevel) -> String {
        let mut document = Document::new();
        Self::update_document(level, &mut document);
        write_document(&document)
    }

    /// Serialize a level on top of a previously loaded document
    pub fn serialize_preserving(level: &CustomLevel, mut previous: Document) -> String {
        Self::update_document(level, &mut previous);
        write_document(&previous)
    }

    /// Write every level field into `document`
    ///
    /// # Purpose
    /// Creates whatever is missing and overwrites what exists. Entity and
    /// room lists are rebuilt from scratch; metadata fields are updated one
    /// by one so unknown siblings are kept.
    pub fn update_document(level: &CustomLevel, document: &mut Document) {
        document.update_declaration(XML_DECLARATION);

        let root = document.update_root("MapData");
        root.set_attr("version", level.version);
        root.update_comment(SAVE_COMMENT);

        let data = root.update_element("Data");
        Self::write_metadata(level, data.update_element("MetaData"));

        data.update_tag("mapwidth", level.mapwidth);
        data.update_tag("mapheight", level.mapheight);
        data.update_tag("levmusic", level.levmusic);
        data.update_tag(
            "contents",
            delimited::write_tile_run(level.tiles.data(), level.mapwidth, level.mapheight),
        );

        let entities = data.update_element_cleared("edEntities");
        for entity in &level.entities {
            let mut element = Element::new("edentity");
            element.set_attr("x", entity.x);
            element.set_attr("y", entity.y);
            element.set_attr("t", entity.t);
            element.set_attr("p1", entity.p1);
            element.set_attr("p2", entity.p2);
            element.set_attr("p3", entity.p3);
            element.set_attr("p4", entity.p4);
            element.set_attr("p5", entity.p5);
            element.set_attr("p6", entity.p6);
            element.set_text(&entity.scriptname);
            entities.push(element);
        }

        let platv = migrate::rescramble_platv(level.rooms(), level.mapwidth);
        let rooms = data.update_element_cleared("levelMetaData");
        for (room, platv) in level.rooms().iter().zip(platv) {
            let mut element = Element::new("edLevelClass");
            element.set_attr("tileset", room.tileset);
            element.set_attr("tilecol", room.tilecol);
            element.set_attr("platx1", room.platx1);
            element.set_attr("platy1", room.platy1);
            element.set_attr("platx2", room.platx2);
            element.set_attr("platy2", room.platy2);
            element.set_attr("platv", platv);
            element.set_attr("enemyx1", room.enemyx1);
            element.set_attr("enemyy1", room.enemyy1);
            element.set_attr("enemyx2", room.enemyx2);
            element.set_attr("enemyy2", room.enemyy2);
            element.set_attr("enemytype", room.enemytype);
            element.set_attr("directmode", room.directmode);
            element.set_attr("warpdir", room.warpdir);
            element.set_text(&room.roomname);
            rooms.push(element);
        }

        data.update_tag("script", delimited::write_scripts(&level.scripts));
    }

    fn write_metadata(level: &CustomLevel, metadata: &mut Element) {
        metadata.update_tag("Creator", &level.creator);
        metadata.update_tag("Title", &level.title);
        metadata.update_tag("Created", level.version);
        metadata.update_tag("Modified", &level.modifier);
        metadata.update_tag("Modifiers", level.version);
        metadata.update_tag("Desc1", &level.desc1);
        metadata.update_tag("Desc2", &level.desc2);
        metadata.update_tag("Desc3", &level.desc3);
        metadata.update_tag("website", &level.website);

        if level.onewaycol_override {
            metadata.update_tag("onewaycol_override", 1);
        } else {
            metadata.remove_elements("onewaycol_override");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::CustomEntity;
    use crate::markup::parse_document;
    use crate::parser::LevelLoader;
    use crate::script::Script;

    #[test]
    fn test_document_shape() {
        let mut level = CustomLevel::new();
        level.entities.push(CustomEntity::new(1, 2, 9));
        let document = parse_document(&LevelSaver::serialize(&level)).unwrap();

        let root = document.root().unwrap();
        assert_eq!(root.name, "MapData");
        assert_eq!(root.attr("version"), Some("2"));

        let data = root.child("Data").unwrap();
        let names: Vec<&str> = data.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "MetaData",
                "mapwidth",
                "mapheight",
                "levmusic",
                "contents",
                "edEntities",
                "levelMetaData",
                "script"
            ]
        );

        let metadata = data.child("MetaData").unwrap();
        assert_eq!(metadata.child("Created").unwrap().raw_text(), Some("2"));
        assert!(metadata.child("onewaycol_override").is_none());
        assert_eq!(data.child("levelMetaData").unwrap().elements().count(), 400);

        let entity = data.child("edEntities").unwrap().child("edentity").unwrap();
        let attributes: Vec<&str> = entity.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(attributes, vec!["x", "y", "t", "p1", "p2", "p3", "p4", "p5", "p6"]);
    }

    #[test]
    fn test_preserves_unknown_elements() {
        let previous = parse_document(
            "<MapData version=\"1\"><Data><MetaData><Custom>keep</Custom>\
<onewaycol_override>1</onewaycol_override><onewaycol_override>1</onewaycol_override>\
</MetaData><extra>x</extra></Data></MapData>",
        )
        .unwrap();

        let level = CustomLevel::new();
        let document = parse_document(&LevelSaver::serialize_preserving(&level, previous)).unwrap();

        let root = document.root().unwrap();
        assert_eq!(root.attr("version"), Some("2"));
        let data = root.child("Data").unwrap();
        assert!(data.child("extra").is_some());

        let metadata = data.child("MetaData").unwrap();
        assert_eq!(metadata.child("Custom").unwrap().raw_text(), Some("keep"));
        assert!(metadata.child("onewaycol_override").is_none());
    }

    #[test]
    fn test_text_escaped_and_restored() {
        let mut level = CustomLevel::new();
        level.title = "<Fish & \"Chips\">".into();
        level.onewaycol_override = true;
        level.scripts.push(Script::with_lines("a&b", ["say(1)"]));
        level.update_room(0, 0, |room| room.roomname = "It's <here>".into());

        let loaded = LevelLoader::parse(&LevelSaver::serialize(&level)).unwrap();
        assert_eq!(loaded.title, level.title);
        assert!(loaded.onewaycol_override);
        assert_eq!(loaded.room(0, 0).roomname, "It's <here>");
        assert_eq!(loaded.scripts.find("a&b").unwrap().contents, vec!["say(1)"]);
    }

    #[test]
    fn test_platv_rescrambled_below_full_width() {
        let mut level = CustomLevel::new();
        level.mapwidth = 3;
        level.update_room(0, 1, |room| room.platv = 11);

        let document = parse_document(&LevelSaver::serialize(&level)).unwrap();
        let rooms: Vec<&Element> = document
            .root()
            .and_then(|root| root.child("Data"))
            .and_then(|data| data.child("levelMetaData"))
            .unwrap()
            .elements()
            .collect();

        // Room (0, 1) is stored at packed slot 3
        assert_eq!(rooms[3].attr_int("platv"), Some(11));
        assert_eq!(rooms[20].attr_int("platv"), Some(4));
    }
}
