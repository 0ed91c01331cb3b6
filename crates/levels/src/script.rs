//! Named script blocks
//!
//! A level carries any number of scripts, each a label plus an ordered list
//! of opaque lines. The lines are interpreted later by the game's script
//! runtime; this crate only stores them.

use serde::{Deserialize, Serialize};

/// A single named script
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Script label as referenced by entities
    pub name: String,

    /// Script lines in order
    pub contents: Vec<String>,
}

impl Script {
    /// Create an empty script
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            contents: Vec::new(),
        }
    }

    /// Create a script from its lines
    pub fn with_lines<S, I, L>(name: S, lines: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            name: name.into(),
            contents: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// All scripts of a level, in declaration order
///
/// Names are not required to be unique. [`ScriptGroup::find`] resolves
/// duplicates by first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptGroup {
    scripts: Vec<Script>,
}

impl ScriptGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a script
    pub fn push(&mut self, script: Script) {
        self.scripts.push(script);
    }

    /// Remove all scripts
    pub fn clear(&mut self) {
        self.scripts.clear();
    }

    /// First script with the given name
    pub fn find(&self, name: &str) -> Option<&Script> {
        self.scripts.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Script> {
        self.scripts.iter()
    }
}

impl From<Vec<Script>> for ScriptGroup {
    fn from(scripts: Vec<Script>) -> Self {
        Self { scripts }
    }
}

impl<'a> IntoIterator for &'a ScriptGroup {
    type Item = &'a Script;
    type IntoIter = std::slice::Iter<'a, Script>;

    fn into_iter(self) -> Self::IntoIter {
        self.scripts.iter()
    }
}
