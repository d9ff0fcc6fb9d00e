use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Icon '{name}' ({width}x{height} with padding) exceeds maximum atlas size ({max}x{max})")]
    IconTooLarge {
        name: String,
        width: u32,
        height: u32,
        max: u32,
    },

    #[error("Could not fit all icons into a {width}x{height} atlas (maximum dimension {max})")]
    PackingExhausted { width: u32, height: u32, max: u32 },

    #[error("Cannot export atlas before it has been generated")]
    ExportBeforeGenerate,

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
