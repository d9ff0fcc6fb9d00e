use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{ImageFormat, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::AtlasError;

/// Save an atlas image as PNG, optionally with compression
pub fn save_atlas_image(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    // Encode to PNG in memory
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| AtlasError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = if let Some(level) = compress {
        let opts = match level {
            CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
            CompressionLevel::Max => oxipng::Options::max_compression(),
        };
        oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
            AtlasError::PngCompress {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?
    } else {
        png_data.into_inner()
    };

    fs::write(path, output_data).map_err(|e| AtlasError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;
    use image::Rgba;

    #[test]
    fn test_save_plain_and_compressed() {
        let dir = scratch_dir("format_save");
        let mut image = RgbaImage::new(32, 32);
        image.put_pixel(3, 4, Rgba([10, 200, 30, 255]));

        let plain = dir.join("plain.png");
        let packed = dir.join("packed.png");
        save_atlas_image(&image, &plain, None).unwrap();
        save_atlas_image(&image, &packed, Some(CompressionLevel::Level(1))).unwrap();

        for path in [&plain, &packed] {
            let loaded = image::open(path).unwrap().into_rgba8();
            assert_eq!(loaded, image);
        }
    }

    #[test]
    fn test_unwritable_path_is_reported() {
        let dir = scratch_dir("format_unwritable");
        let path = dir.join("missing_dir").join("atlas.png");

        let err = save_atlas_image(&RgbaImage::new(1, 1), &path, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AtlasError>(),
            Some(AtlasError::OutputWrite { .. })
        ));
    }
}
