pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod icon;
pub mod output;
pub mod packing;

#[cfg(test)]
mod test_support;

pub use atlas::AtlasPacker;
pub use cli::{CliArgs, CompressionLevel, GrowthMode};
pub use error::AtlasError;
pub use icon::{Icon, IconKind, UvRect};
