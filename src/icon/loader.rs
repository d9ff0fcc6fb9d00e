use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{ImageReader, RgbaImage};
use log::{debug, warn};

use crate::error::AtlasError;

/// Collect every PNG under `root`, keyed by file name (e.g. "stone.png").
///
/// Directory entries are visited in path order so the result is stable.
/// When the same file name appears in several directories the first one
/// visited wins. A missing root yields an empty map.
pub fn collect_png_files(root: &Path) -> Result<HashMap<String, PathBuf>> {
    let mut files = HashMap::new();

    if !root.is_dir() {
        warn!("Icon search path {} does not exist", root.display());
        return Ok(files);
    }

    collect_from_directory(root, &mut files)?;
    debug!("Found {} PNG files under {}", files.len(), root.display());

    Ok(files)
}

fn collect_from_directory(dir: &Path, files: &mut HashMap<String, PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_file() && is_png(&path) {
            if let Some(file_name) = path.file_name().and_then(|s| s.to_str()) {
                files.entry(file_name.to_string()).or_insert(path);
            }
        } else if path.is_dir() {
            collect_from_directory(&path, files)?;
        }
    }

    Ok(())
}

/// Icon names (file stems) available under `root`, sorted
pub fn available_icon_names(root: &Path) -> Result<Vec<String>> {
    let files = collect_png_files(root)?;
    let mut names: Vec<String> = files
        .keys()
        .filter_map(|file_name| file_name.strip_suffix(".png"))
        .map(str::to_string)
        .collect();
    names.sort();
    Ok(names)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

/// Decode an image file into RGBA8
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = ImageReader::open(path)
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{scratch_dir, write_png};
    use image::Rgba;

    #[test]
    fn test_collects_nested_pngs_only() {
        let dir = scratch_dir("collect_nested");
        write_png(&dir.join("stone.png"), 4, 4, Rgba([128, 128, 128, 255]));
        write_png(&dir.join("blocks/dirt.png"), 4, 4, Rgba([120, 80, 40, 255]));
        std::fs::write(dir.join("notes.txt"), "not an image").unwrap();

        let files = collect_png_files(&dir).unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files["stone.png"], dir.join("stone.png"));
        assert_eq!(files["dirt.png"], dir.join("blocks/dirt.png"));
    }

    #[test]
    fn test_duplicate_file_names_first_wins() {
        let dir = scratch_dir("collect_duplicates");
        write_png(&dir.join("a/sand.png"), 2, 2, Rgba([255, 255, 0, 255]));
        write_png(&dir.join("b/sand.png"), 8, 8, Rgba([255, 0, 0, 255]));

        let files = collect_png_files(&dir).unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files["sand.png"], dir.join("a/sand.png"));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = scratch_dir("collect_missing").join("nope");
        let files = collect_png_files(&dir).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_available_names_are_sorted_stems() {
        let dir = scratch_dir("collect_names");
        write_png(&dir.join("log.png"), 2, 2, Rgba([90, 60, 30, 255]));
        write_png(&dir.join("ores/coal.png"), 2, 2, Rgba([20, 20, 20, 255]));

        assert_eq!(available_icon_names(&dir).unwrap(), vec!["coal", "log"]);
    }

    #[test]
    fn test_load_rgba_reports_path() {
        let dir = scratch_dir("load_broken");
        let path = dir.join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = load_rgba(&path).unwrap_err();
        assert!(err.to_string().contains("broken.png"));
    }
}
