//! Reading base and tile images from disk for the command line.

use mosaic_core::PixelBuffer;
use std::io;
use std::path::{Path, PathBuf};

use crate::codec;

/// File extensions picked up from a tile directory (case-insensitive).
const TILE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Outcome of scanning a tile directory.
#[derive(Debug, Default)]
pub struct LoadedTiles {
    /// Decoded tiles in file-name order
    pub tiles: Vec<PixelBuffer>,
    /// Files with a tile extension that could not be read or decoded
    pub skipped: Vec<PathBuf>,
}

/// Read and decode a single image file.
pub fn load_image(path: &Path) -> anyhow::Result<PixelBuffer> {
    let bytes = std::fs::read(path)?;
    let buffer = codec::decode(&bytes)?;
    Ok(buffer)
}

/// Decode every PNG/JPEG file directly inside `dir`.
///
/// Files are visited sorted by name so tile order, and therefore tie
/// breaking during matching, is stable between runs. Undecodable files are
/// logged and skipped; only failure to list the directory is an error.
pub fn load_tile_dir(dir: &Path) -> io::Result<LoadedTiles> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_tile_extension(path))
        .collect();
    paths.sort();

    let mut loaded = LoadedTiles::default();
    for path in paths {
        match load_image(&path) {
            Ok(tile) => loaded.tiles.push(tile),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable tile");
                loaded.skipped.push(path);
            }
        }
    }

    tracing::debug!(
        dir = %dir.display(),
        tiles = loaded.tiles.len(),
        skipped = loaded.skipped.len(),
        "Loaded tile directory"
    );
    Ok(loaded)
}

fn has_tile_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TILE_EXTENSIONS.iter().any(|t| e.eq_ignore_ascii_case(t)))
        .unwrap_or(false)
}
