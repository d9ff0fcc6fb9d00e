use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

/// Fresh, empty directory under the system temp dir, unique per test tag
pub fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("voxel_atlas_{}_{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a solid-colored PNG, creating parent directories as needed
pub fn write_png(path: &Path, width: u32, height: u32, color: Rgba<u8>) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    RgbaImage::from_pixel(width, height, color).save(path).unwrap();
}
