use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::GenerationError;

pub const NAMES_FILE: &str = "names.csv";
pub const WORDS_FILE: &str = "words.txt";
pub const LOREM_FILE: &str = "lorem.txt";

/// Directory holding the dictionary source files.
#[derive(Debug, Clone)]
pub struct AssetSource {
    root: PathBuf,
}

impl AssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Assets shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }
}

/// Read a whole dictionary source file.
pub fn read_text(kind: &'static str, path: &Path) -> Result<String, GenerationError> {
    fs::read_to_string(path).map_err(|source| GenerationError::Dictionary {
        kind,
        path: path.display().to_string(),
        source,
    })
}

/// Read the non-empty, trimmed lines of a dictionary source file.
pub fn read_lines(kind: &'static str, path: &Path) -> Result<Vec<String>, GenerationError> {
    let contents = read_text(kind, path)?;
    Ok(contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect())
}
