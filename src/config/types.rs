use serde::{Deserialize, Serialize};

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// A region reserved in the atlas without a backing image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProceduralIcon {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl std::str::FromStr for ProceduralIcon {
    type Err = String;

    /// Parse `NAME=WIDTHxHEIGHT`, e.g. `water=16x16`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, size) = s
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=WxH, got '{}'", s))?;
        let (width, height) = size
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WxH size, got '{}'", size))?;

        if name.is_empty() {
            return Err(format!("missing icon name in '{}'", s));
        }

        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_e| format!("invalid dimension '{}' in '{}'", v, s))
        };

        Ok(Self {
            name: name.to_string(),
            width: parse(width)?,
            height: parse(height)?,
        })
    }
}

/// Atlas configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Root directory icon paths are resolved against
    pub assets_root: String,
    /// Icon directory below the assets root
    pub path: String,
    /// Icon names or glob patterns; empty packs every PNG found
    pub icons: Vec<String>,
    /// Regions with an explicit size and no source file
    pub procedural: Vec<ProceduralIcon>,
    /// Padding around each icon in pixels
    pub padding: u32,
    /// Growth mode: "square" or "balanced"
    pub growth: String,
    /// Largest atlas width or height to try
    pub max_dimension: u32,
    /// Output directory for atlas files
    pub output_dir: String,
    /// Base name for output files (atlas.png, atlas.json)
    pub name: String,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            version: 1,
            assets_root: crate::atlas::DEFAULT_ASSETS_ROOT.to_string(),
            path: String::new(),
            icons: Vec::new(),
            procedural: Vec::new(),
            padding: 0,
            growth: "square".to_string(),
            max_dimension: crate::atlas::DEFAULT_MAX_DIMENSION,
            output_dir: ".".to_string(),
            name: "atlas".to_string(),
            compress: None,
        }
    }
}
