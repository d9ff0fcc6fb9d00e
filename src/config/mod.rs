mod load;
mod types;

pub use load::{LoadedConfig, expand_icon_patterns};
pub use types::{AtlasConfig, CompressConfig, ProceduralIcon};
