//! Path resolution and raw file reading for `data/` content.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Prefer the top-level workspace `data/` so tests and tools can run from
/// any crate.
pub fn data_root() -> PathBuf {
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() {
        ws
    } else {
        here.join("data")
    }
}

/// Read a raw TOML file under `data/` and return its string.
pub fn read_toml(rel: impl AsRef<Path>) -> Result<String> {
    let path = data_root().join(rel);
    std::fs::read_to_string(&path).with_context(|| format!("read data: {}", path.display()))
}
