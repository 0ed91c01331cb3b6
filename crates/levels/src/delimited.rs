//! Delimited sub-formats nested inside the level document
//!
//! Two small grammars live inside markup text bodies:
//!
//! - **Tile runs** (`contents`): comma-separated tile codes in row-major
//!   order over the active map area, trailing comma included.
//! - **Script blocks** (`script`): pipe-separated tokens. A token ending in
//!   `:` opens a named script, every following token is a line of it.
//!
//! ```text
//! contents: 0,0,7,7,0,...,
//! script:   intro:|say(1)|text(cyan,0,0,1)|outro:|endtext|
//! ```

use crate::script::Script;
use vvlevel_core::{MAX_WIDTH, SCREEN_HEIGHT_TILES, SCREEN_WIDTH_TILES};

/// Distance between two tile rows in the full-capacity buffer
const ROW_STRIDE: usize = (MAX_WIDTH * SCREEN_WIDTH_TILES) as usize;

/// Outcome of reading a tile run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileRun {
    /// Tokens written into the buffer
    pub stored: usize,
    /// Tokens that fell outside the buffer
    pub dropped: usize,
}

/// Outcome of reading a script block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptBlock {
    /// Scripts in header order
    pub scripts: Vec<Script>,
    /// Tokens seen before the first header, discarded
    pub orphaned: usize,
}

/// Parse an integer the way the level format expects
///
/// Malformed input decodes as `0`.
pub fn parse_int(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}

/// Split on `delim`; a trailing delimiter does not yield an empty token
fn tokens(text: &str, delim: char) -> impl Iterator<Item = &str> {
    text.strip_suffix(delim)
        .unwrap_or(text)
        .split(delim)
        .take(if text.is_empty() { 0 } else { usize::MAX })
}

/// Read a comma-separated tile run into `buffer`
///
/// Tokens fill the buffer row-major from `(0, 0)`, moving to the next row
/// after `mapwidth * 40` tokens. Tokens landing outside `buffer` are dropped.
///
/// # Arguments
/// * `text` - Raw `contents` text
/// * `mapwidth` - Active map width in rooms
/// * `buffer` - Full-capacity tile buffer
pub fn read_tile_run(text: &str, mapwidth: i32, buffer: &mut [i32]) -> TileRun {
    let row_len = (mapwidth.max(0) * SCREEN_WIDTH_TILES) as usize;
    let mut run = TileRun::default();
    let mut x = 0usize;
    let mut y = 0usize;

    for token in tokens(text, ',') {
        match buffer.get_mut(x + ROW_STRIDE * y) {
            Some(slot) => {
                *slot = parse_int(token);
                run.stored += 1;
            }
            None => run.dropped += 1,
        }

        x += 1;
        if x == row_len {
            x = 0;
            y += 1;
        }
    }

    run
}

/// Write the active area of `buffer` as a tile run
///
/// Every tile in `[0, mapwidth*40) x [0, mapheight*30)` is emitted row-major,
/// each followed by a comma.
pub fn write_tile_run(buffer: &[i32], mapwidth: i32, mapheight: i32) -> String {
    let width = (mapwidth.max(0) * SCREEN_WIDTH_TILES) as usize;
    let height = (mapheight.max(0) * SCREEN_HEIGHT_TILES) as usize;
    let mut out = String::with_capacity(width * height * 2);

    for y in 0..height {
        for x in 0..width {
            let tile = buffer.get(x + ROW_STRIDE * y).copied().unwrap_or(0);
            out.push_str(&tile.to_string());
            out.push(',');
        }
    }

    out
}

/// Read a pipe-delimited script block
///
/// A non-empty token ending in `:` starts a new script named by the token
/// without its colon. Tokens before the first header belong to no script.
pub fn read_scripts(text: &str) -> ScriptBlock {
    let mut block = ScriptBlock::default();
    let mut current: Option<Script> = None;

    for token in tokens(text, '|') {
        if let Some(name) = token.strip_suffix(':') {
            if let Some(done) = current.take() {
                block.scripts.push(done);
            }
            current = Some(Script::new(name));
            continue;
        }

        match current.as_mut() {
            Some(script) => script.contents.push(token.to_string()),
            None => block.orphaned += 1,
        }
    }

    if let Some(done) = current {
        block.scripts.push(done);
    }

    block
}

/// Write scripts as a pipe-delimited block
///
/// A line whose last character is `:` gets a trailing space so it is not
/// mistaken for a header when read back.
pub fn write_scripts<'a, I>(scripts: I) -> String
where
    I: IntoIterator<Item = &'a Script>,
{
    let mut out = String::new();

    for script in scripts {
        out.push_str(&script.name);
        out.push_str(":|");

        for line in &script.contents {
            out.push_str(line);
            if line.ends_with(':') {
                out.push(' ');
            }
            out.push('|');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use vvlevel_core::MAX_HEIGHT;

    const CAPACITY: usize = ROW_STRIDE * (MAX_HEIGHT * SCREEN_HEIGHT_TILES) as usize;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42"), 42);
        assert_eq!(parse_int("-7"), -7);
        assert_eq!(parse_int(" 3 "), 3);
        assert_eq!(parse_int("abc"), 0);
        assert_eq!(parse_int(""), 0);
    }

    #[test]
    fn test_tokens_trailing_delimiter() {
        assert_eq!(tokens("a,b,", ',').collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(tokens("a,,b", ',').collect::<Vec<_>>(), vec!["a", "", "b"]);
        assert_eq!(tokens("", ',').count(), 0);
        assert_eq!(tokens(",", ',').collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn test_tile_run_wraps_at_map_width() {
        let mut buffer = vec![0; CAPACITY];
        // One room wide: 40 tokens per row
        let mut text = String::new();
        for i in 0..45 {
            text.push_str(&format!("{},", i));
        }

        let run = read_tile_run(&text, 1, &mut buffer);
        assert_eq!(run, TileRun { stored: 45, dropped: 0 });
        assert_eq!(buffer[0], 0);
        assert_eq!(buffer[39], 39);
        assert_eq!(buffer[40], 0);
        assert_eq!(buffer[ROW_STRIDE], 40);
        assert_eq!(buffer[ROW_STRIDE + 4], 44);
    }

    #[test]
    fn test_tile_run_malformed_tokens() {
        let mut buffer = vec![9; CAPACITY];
        read_tile_run("1,x,3,", 5, &mut buffer);
        assert_eq!(&buffer[..4], &[1, 0, 3, 9]);
    }

    #[test]
    fn test_tile_run_drops_out_of_bounds() {
        let mut buffer = vec![0; 10];
        let run = read_tile_run("1,2,3,4,5,6,7,8,9,10,11,12,", 1, &mut buffer);
        assert_eq!(run.stored, 10);
        assert_eq!(run.dropped, 2);
        assert_eq!(buffer[9], 10);
    }

    #[test]
    fn test_write_tile_run() {
        let mut buffer = vec![0; CAPACITY];
        buffer[1] = 5;
        buffer[ROW_STRIDE] = 7;

        let text = write_tile_run(&buffer, 1, 1);
        let values: Vec<&str> = text.split(',').collect();
        // 40x30 tiles plus the empty tail after the final comma
        assert_eq!(values.len(), 1201);
        assert_eq!(values[1], "5");
        assert_eq!(values[40], "7");
        assert!(text.ends_with("0,"));
    }

    #[test]
    fn test_read_scripts() {
        let block = read_scripts("intro:|say hi|go away:|bye|");
        assert_eq!(block.orphaned, 0);
        assert_eq!(
            block.scripts,
            vec![
                Script::with_lines("intro", ["say hi"]),
                Script::with_lines("go away", ["bye"]),
            ]
        );
    }

    #[test]
    fn test_read_scripts_without_header() {
        let block = read_scripts("say hi|bye|");
        assert!(block.scripts.is_empty());
        assert_eq!(block.orphaned, 2);
    }

    #[test]
    fn test_read_scripts_empty_lines_and_empty_script() {
        let block = read_scripts("a:|b:|one||three|");
        assert_eq!(
            block.scripts,
            vec![
                Script::new("a"),
                Script::with_lines("b", ["one", "", "three"]),
            ]
        );
    }

    #[test]
    fn test_write_scripts_colon_line() {
        let scripts = vec![
            Script::with_lines("intro", ["say hi", "go away:"]),
            Script::with_lines("bye", Vec::<String>::new()),
        ];
        let text = write_scripts(&scripts);
        assert_eq!(text, "intro:|say hi|go away: |bye:|");

        let block = read_scripts(&text);
        assert_eq!(block.scripts.len(), 2);
        assert_eq!(block.scripts[0].contents, vec!["say hi", "go away: "]);
        assert!(block.scripts[1].contents.is_empty());
    }
}
