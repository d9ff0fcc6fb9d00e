mod args;

pub use args::{CliArgs, CompressionLevel, GrowthMode};
