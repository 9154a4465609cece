use std::fs;
use std::path::{Path, PathBuf};

use catalog::{Gazetteer, GazetteerEntry};

#[derive(Debug)]
pub enum GazetteerLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl std::fmt::Display for GazetteerLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GazetteerLoadError::Io { path, source } => {
                write!(f, "failed to read gazetteer {}: {source}", path.display())
            }
            GazetteerLoadError::Parse(e) => write!(f, "failed to parse gazetteer: {e}"),
        }
    }
}

impl std::error::Error for GazetteerLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GazetteerLoadError::Io { source, .. } => Some(source),
            GazetteerLoadError::Parse(e) => Some(e),
        }
    }
}

/// Parses a JSON array of gazetteer entries.
///
/// Entries with non-finite coordinates are dropped rather than failing the
/// whole load.
pub fn parse_gazetteer_str(payload: &str) -> Result<Gazetteer, GazetteerLoadError> {
    let entries: Vec<GazetteerEntry> =
        serde_json::from_str(payload).map_err(GazetteerLoadError::Parse)?;
    Ok(Gazetteer::new(
        entries
            .into_iter()
            .filter(|e| e.position().is_valid())
            .collect(),
    ))
}

pub fn load_gazetteer(path: impl AsRef<Path>) -> Result<Gazetteer, GazetteerLoadError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|e| GazetteerLoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_gazetteer_str(&payload)
}
