//! # VVLevel Levels System
//!
//! This crate loads, saves and queries custom levels.
//!
//! ## Features
//! - XML-shaped `.vvvvvv` level format (load and save)
//! - Fixed 20x20 room grid with per-room properties
//! - Flat 800x600 tile buffer with bounds-checked access
//! - Entities, scripts and level metadata
//! - Legacy `platv` layout migration
//! - Fast metadata probe for level listings
//!
//! ## Level Format
//!
//! Levels are stored as markup files with the following structure:
//! - **MapData**: root element, carries the format `version`
//! - **MetaData**: title, creator, descriptions, website
//! - **contents**: comma-separated tile codes for the active map
//! - **edEntities / levelMetaData**: placed objects and room properties
//! - **script**: pipe-separated script block

pub mod delimited;
pub mod entities;
pub mod error;
pub mod fs;
pub mod level;
pub mod manager;
pub mod markup;
pub mod metadata;
pub mod migrate;
pub mod palette;
pub mod parser;
pub mod room;
pub mod script;
pub mod tiles;
pub mod writer;

pub use error::{LevelError, Result};
pub use fs::{DirFs, LevelFs};
pub use level::{entity_type, CustomEntity, CustomLevel, StartPoint};
pub use manager::{LevelManager, PlaytestOptions};
pub use metadata::LevelMetaData;
pub use palette::Rgb;
pub use parser::LevelLoader;
pub use room::RoomProperty;
pub use script::{Script, ScriptGroup};
pub use tiles::{TileBuffer, MAX_TILE_COUNT};
pub use writer::LevelSaver;
