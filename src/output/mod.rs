mod format;
mod json;

pub use format::save_atlas_image;
pub use json::write_metadata;
