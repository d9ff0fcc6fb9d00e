use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::ProceduralIcon;

#[derive(Parser, Debug, Clone)]
#[command(name = "voxel-atlas")]
#[command(version, about = "Texture atlas packer for voxel block icons", long_about = None)]
pub struct CliArgs {
    /// Icon directory, relative to the assets root
    #[arg(required_unless_present = "config")]
    pub path: Option<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Root directory the icon path is resolved against [default: assets/textures]
    #[arg(long, value_name = "DIR")]
    pub assets_root: Option<PathBuf>,

    /// Icon to pack (file stem or glob pattern); packs every PNG found when omitted
    #[arg(short = 'i', long = "icon", value_name = "NAME")]
    pub icons: Vec<String>,

    /// Reserve a region with no backing file
    #[arg(long = "procedural", value_name = "NAME=WxH")]
    pub procedural: Vec<ProceduralIcon>,

    /// Output directory for the atlas files [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name for output files (atlas.png, atlas.json) [default: atlas]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Padding around each icon in pixels [default: 0]
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// How the atlas grows when icons don't fit [default: square]
    #[arg(long, value_enum)]
    pub growth: Option<GrowthMode>,

    /// Largest atlas width or height to try before giving up [default: 16384]
    #[arg(long, value_name = "PIXELS")]
    pub max_dimension: Option<u32>,

    /// Skip writing the JSON UV metadata
    #[arg(long)]
    pub no_metadata: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,
}

/// How the bin grows after a failed packing attempt
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum GrowthMode {
    /// Double width and height together
    #[default]
    #[value(name = "square")]
    Square,
    /// Double only the smaller side (width first when equal)
    #[value(name = "balanced")]
    Balanced,
}

impl std::str::FromStr for GrowthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(GrowthMode::Square),
            "balanced" => Ok(GrowthMode::Balanced),
            _ => Err(format!(
                "unknown growth mode '{}'. Valid values: square, balanced",
                s
            )),
        }
    }
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
