use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::atlas::AtlasPacker;
use crate::error::AtlasError;
use crate::icon::{Icon, IconKind, UvRect};

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    image: String,
    size: Size,
    padding: u32,
    generation: u64,
    icons: Vec<JsonIcon>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    format: &'static str,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct JsonIcon {
    name: String,
    kind: IconKind,
    frame: Frame,
    uv: UvRect,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Write `<base_name>.json` with each icon's pixel frame and UV rectangle.
///
/// Fails if the packer has not generated an atlas yet.
pub fn write_metadata(
    packer: &AtlasPacker,
    output_dir: &Path,
    base_name: &str,
) -> Result<PathBuf> {
    if !packer.is_generated() {
        return Err(AtlasError::ExportBeforeGenerate.into());
    }

    let output = JsonOutput {
        meta: Meta {
            app: "voxel-atlas",
            version: env!("CARGO_PKG_VERSION"),
            format: "rgba8888",
        },
        image: format!("{}.png", base_name),
        size: Size {
            w: packer.width(),
            h: packer.height(),
        },
        padding: packer.padding(),
        generation: packer.generation(),
        icons: packer.icons().map(icon_to_json).collect(),
    };

    let json_path = output_dir.join(format!("{}.json", base_name));
    let content = serde_json::to_string_pretty(&output)?;

    fs::write(&json_path, content).map_err(|e| AtlasError::OutputWrite {
        path: json_path.clone(),
        source: e,
    })?;

    Ok(json_path)
}

fn icon_to_json(icon: &Icon) -> JsonIcon {
    JsonIcon {
        name: icon.name.clone(),
        kind: icon.kind,
        frame: Frame {
            x: icon.x,
            y: icon.y,
            w: icon.width,
            h: icon.height,
        },
        uv: icon.uv_rect(),
    }
}
