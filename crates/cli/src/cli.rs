use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vvlevel", author, version, about = "Inspect and convert custom levels")]
pub struct Cli {
    /// Options file (default: vvlevel.cfg in the working directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// User directory containing `levels/`, overrides the options file
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List levels in the level directory
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print a summary of one level
    Info {
        /// Level file, with or without the `levels/` prefix
        level: String,
    },
    /// Load a level and save it again in the current format
    Resave {
        level: String,

        /// File name to save as (default: same file)
        #[arg(long)]
        out: Option<String>,
    },
    /// Print one tile
    Tile {
        level: String,
        rx: i32,
        ry: i32,
        x: i32,
        y: i32,
    },
}
