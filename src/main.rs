use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use voxel_atlas::atlas::{AtlasPacker, DEFAULT_ASSETS_ROOT, DEFAULT_MAX_DIMENSION};
use voxel_atlas::cli::{CliArgs, CompressionLevel, GrowthMode};
use voxel_atlas::config::{CompressConfig, LoadedConfig, ProceduralIcon, expand_icon_patterns};
use voxel_atlas::output::write_metadata;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    // Load config if specified and merge with CLI args
    let merged = merge_config_with_args(&args)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("voxel-atlas v{}", env!("CARGO_PKG_VERSION"));

    if !merged.output.exists() {
        fs::create_dir_all(&merged.output)?;
    }

    let mut packer = AtlasPacker::with_root(&merged.assets_root, &merged.path, merged.padding)
        .growth_mode(merged.growth)
        .max_dimension(merged.max_dimension)
        .compress(merged.compress);
    packer.check_base_path()?;

    if merged.icons.is_empty() {
        packer.register_all()?;
    } else {
        let available = packer.available_icons()?;
        for name in expand_icon_patterns(&merged.icons, &available)? {
            packer.register_icon(&name);
        }
    }
    for region in &merged.procedural {
        packer.create_icon(&region.name, region.width, region.height);
    }
    info!("Registered {} icons", packer.len());

    packer.generate_atlas()?;
    if !packer.is_generated() {
        info!("No icons to pack, nothing written");
        return Ok(());
    }

    let image_path = merged.output.join(format!("{}.png", merged.name));
    packer.export_image(&image_path)?;

    if merged.metadata {
        let json_path = write_metadata(&packer, &merged.output, &merged.name)?;
        info!("Generated {}", json_path.display());
    }

    info!("Done!");

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    assets_root: PathBuf,
    path: PathBuf,
    icons: Vec<String>,
    procedural: Vec<ProceduralIcon>,
    output: PathBuf,
    name: String,
    padding: u32,
    growth: GrowthMode,
    max_dimension: u32,
    compress: Option<CompressionLevel>,
    metadata: bool,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CliArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    let assets_root = args.assets_root.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_assets_root())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_ROOT))
    });

    let path = args.path.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| PathBuf::from(&lc.config.path))
            .unwrap_or_default()
    });

    let icons = if !args.icons.is_empty() {
        args.icons.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.config.icons.clone()
    } else {
        Vec::new()
    };

    // Procedural regions from both sources are combined
    let mut procedural = loaded_config
        .as_ref()
        .map(|lc| lc.config.procedural.clone())
        .unwrap_or_default();
    procedural.extend(args.procedural.iter().cloned());

    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let name = args.name.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.name.clone())
            .unwrap_or_else(|| "atlas".to_string())
    });

    let padding = args
        .padding
        .unwrap_or_else(|| loaded_config.as_ref().map(|lc| lc.config.padding).unwrap_or(0));

    let max_dimension = args.max_dimension.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.max_dimension)
            .unwrap_or(DEFAULT_MAX_DIMENSION)
    });

    let growth = if let Some(g) = args.growth {
        g
    } else if let Some(ref lc) = loaded_config {
        lc.config
            .growth
            .parse::<GrowthMode>()
            .map_err(|e| anyhow::anyhow!("{} in config file", e))?
    } else {
        GrowthMode::Square
    };

    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(ref lc) = loaded_config {
        lc.config.compress.as_ref().map(|c| match c {
            CompressConfig::Level(n) => CompressionLevel::Level(*n),
            CompressConfig::Max(_) => CompressionLevel::Max,
        })
    } else {
        None
    };

    Ok(MergedConfig {
        assets_root,
        path,
        icons,
        procedural,
        output,
        name,
        padding,
        growth,
        max_dimension,
        compress,
        metadata: !args.no_metadata,
        verbose: args.verbose,
    })
}
