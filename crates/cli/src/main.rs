//! VVLevel - custom level tool
//!
//! Lists, inspects and re-saves `.vvvvvv` level files.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use vvlevel_config::{ConfigError, LevelConfig};
use vvlevel_core::{Tileset, GAME_ROOM_ORIGIN};
use vvlevel_levels::{DirFs, LevelManager, PlaytestOptions};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(&cli).context("loading options")?;
    if let Some(dir) = &cli.dir {
        config.levels_dir = dir.clone();
    }

    // Initialize tracing (stderr, so --json output stays clean)
    let default_filter = if cli.verbose { "debug" } else { config.log_level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    config.display();

    let fs = DirFs::new(&config.levels_dir);
    let mut manager = LevelManager::new(fs).with_playtest(PlaytestOptions {
        enabled: config.playtest,
        assets: config.play_assets.clone(),
    });

    match cli.command {
        Command::List { json } => list(&mut manager, config.sort_levels, json),
        Command::Info { level } => info(&mut manager, &level),
        Command::Resave { level, out } => resave(&mut manager, &level, out.as_deref()),
        Command::Tile { level, rx, ry, x, y } => tile(&mut manager, &level, rx, ry, x, y),
    }
}

/// Options file named on the command line, else `vvlevel.cfg` or defaults
fn load_config(cli: &Cli) -> vvlevel_core::Result<LevelConfig> {
    let config = match &cli.config {
        Some(path) => LevelConfig::load_from_file(path)?,
        None => match LevelConfig::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => LevelConfig::default(),
            Err(e) => return Err(e.into()),
        },
    };
    Ok(config)
}

fn load_level(manager: &mut LevelManager<DirFs>, name: &str) -> vvlevel_core::Result<String> {
    Ok(manager.load(name)?)
}

fn list(manager: &mut LevelManager<DirFs>, sort: bool, json: bool) -> Result<()> {
    let levels = manager.list_levels(sort).context("scanning level directory")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&levels)?);
        return Ok(());
    }

    if levels.is_empty() {
        warn!("No levels found in {}", manager.fs().root().display());
    }
    for level in &levels {
        println!("{:<32} {:<20} {}", level.title, level.creator, level.filename);
    }
    Ok(())
}

fn info(manager: &mut LevelManager<DirFs>, name: &str) -> Result<()> {
    let path = load_level(manager, name).with_context(|| format!("loading {}", name))?;
    let level = manager.level();

    println!("File:      {}", path);
    println!("Title:     {}", level.title);
    println!("Creator:   {}", level.creator);
    if !level.modifier.is_empty() {
        println!("Modified:  {}", level.modifier);
    }
    for desc in [&level.desc1, &level.desc2, &level.desc3] {
        if !desc.is_empty() {
            println!("           {}", desc);
        }
    }
    if !level.website.is_empty() {
        println!("Website:   {}", level.website);
    }
    println!("Size:      {}x{} rooms", level.mapwidth, level.mapheight);
    println!("Music:     {}", level.levmusic);
    println!(
        "Entities:  {} ({} trinkets, {} crewmates)",
        level.entities.len(),
        level.num_trinkets(),
        level.num_crewmates()
    );
    println!("Scripts:   {}", level.scripts.len());

    let start = level.find_start_point();
    println!(
        "Start:     room ({}, {}) at ({}, {})",
        start.rx - GAME_ROOM_ORIGIN,
        start.ry - GAME_ROOM_ORIGIN,
        start.x,
        start.y
    );
    Ok(())
}

fn resave(manager: &mut LevelManager<DirFs>, name: &str, out: Option<&str>) -> Result<()> {
    let path = load_level(manager, name).with_context(|| format!("loading {}", name))?;

    let target = match out {
        Some(out) => out.to_string(),
        None => path
            .strip_prefix("levels/")
            .unwrap_or(&path)
            .to_string(),
    };
    debug!("Re-saving {} as {}", path, target);

    let saved = manager.save(&target).with_context(|| format!("saving {}", target))?;
    println!("Saved {}", saved);
    Ok(())
}

fn tile(
    manager: &mut LevelManager<DirFs>,
    name: &str,
    rx: i32,
    ry: i32,
    x: i32,
    y: i32,
) -> Result<()> {
    load_level(manager, name).with_context(|| format!("loading {}", name))?;
    let level = manager.level();

    let room = level.room(rx, ry);
    let tileset = Tileset::from_i32(room.tileset)
        .map(|t| t.as_str())
        .unwrap_or("Unknown");

    println!("{}", level.get_tile(rx, ry, x, y));
    debug!("Room ({}, {}): {} colour {}", rx, ry, tileset, room.tilecol);
    Ok(())
}
