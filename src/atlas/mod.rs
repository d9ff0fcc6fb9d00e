mod compose;
mod packer;

pub use compose::blit_padded;
pub use packer::AtlasPacker;

/// Directory icon paths are resolved against by [`AtlasPacker::new`]
pub const DEFAULT_ASSETS_ROOT: &str = "assets/textures";

/// Width and height of the first packing attempt
pub const INITIAL_ATLAS_SIZE: u32 = 128;

/// Default cap on atlas width and height
pub const DEFAULT_MAX_DIMENSION: u32 = 16384;
