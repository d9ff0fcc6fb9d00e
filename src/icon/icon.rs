use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::AvgColor;

/// Where an icon's pixels come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    /// Backed by `<name>.png` somewhere under the packer's base path
    File,
    /// Region with an explicit size and no backing file
    Procedural,
}

/// UV rectangle of an icon inside the atlas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub u_min: f64,
    pub v_min: f64,
    pub u_max: f64,
    pub v_max: f64,
}

/// A named region of the atlas
#[derive(Debug, Clone)]
pub struct Icon {
    /// Unique identifier, also the source file stem
    pub name: String,
    pub kind: IconKind,
    /// Width of the icon content
    pub width: u32,
    /// Height of the icon content
    pub height: u32,
    /// Position of the content in the atlas (x coordinate)
    pub x: u32,
    /// Position of the content in the atlas (y coordinate)
    pub y: u32,
    /// Atlas width when this icon was placed
    pub atlas_width: u32,
    /// Atlas height when this icon was placed
    pub atlas_height: u32,
    /// Average visible color, used to group similar icons
    pub avg_color: AvgColor,
    /// Source file discovered for this icon
    pub source: Option<PathBuf>,
    /// Packer generation this placement belongs to (0 = never placed)
    pub generation: u64,
    /// Decoded pixels, only held between discovery and compositing
    pub(crate) pixels: Option<RgbaImage>,
}

impl Icon {
    pub(crate) fn file(name: &str) -> Self {
        Self::with_kind(name, IconKind::File, 0, 0)
    }

    pub(crate) fn procedural(name: &str, width: u32, height: u32) -> Self {
        Self::with_kind(name, IconKind::Procedural, width, height)
    }

    fn with_kind(name: &str, kind: IconKind, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            kind,
            width,
            height,
            x: 0,
            y: 0,
            atlas_width: 0,
            atlas_height: 0,
            avg_color: AvgColor::default(),
            source: None,
            generation: 0,
            pixels: None,
        }
    }

    /// File name searched for under the base path
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }

    /// Procedural icons reserve space but are never drawn or color-sorted
    pub fn is_placeholder(&self) -> bool {
        self.kind == IconKind::Procedural
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Size reserved in the atlas including padding on every side
    pub fn padded_size(&self, padding: u32) -> (u32, u32) {
        let border = padding.saturating_mul(2);
        (
            self.width.saturating_add(border),
            self.height.saturating_add(border),
        )
    }

    /// Attach freshly decoded pixels and refresh the size and color stats
    pub(crate) fn set_pixels(&mut self, source: PathBuf, image: RgbaImage) {
        self.width = image.width();
        self.height = image.height();
        self.avg_color = AvgColor::of_image(&image);
        self.source = Some(source);
        self.pixels = Some(image);
    }

    /// Forget discovered source data so the next discovery starts fresh.
    /// Procedural icons keep their explicit size.
    pub(crate) fn forget_source(&mut self) {
        if self.kind == IconKind::File {
            self.width = 0;
            self.height = 0;
            self.avg_color = AvgColor::default();
            self.source = None;
        }
        self.pixels = None;
    }

    pub(crate) fn clear_placement(&mut self) {
        self.x = 0;
        self.y = 0;
        self.atlas_width = 0;
        self.atlas_height = 0;
        self.generation = 0;
    }

    /// Map a fraction of the icon's width to an atlas U coordinate
    pub fn u(&self, t: f64) -> f64 {
        ratio(f64::from(self.x) + t * f64::from(self.width), self.atlas_width)
    }

    /// Map a fraction of the icon's height to an atlas V coordinate
    pub fn v(&self, t: f64) -> f64 {
        ratio(f64::from(self.y) + t * f64::from(self.height), self.atlas_height)
    }

    /// Left edge, optionally inset by a fraction of the icon width
    pub fn u_min(&self, min_x: f64) -> f64 {
        self.u(min_x)
    }

    pub fn u_max(&self, max_x: f64) -> f64 {
        self.u(max_x)
    }

    pub fn v_min(&self, min_y: f64) -> f64 {
        self.v(min_y)
    }

    pub fn v_max(&self, max_y: f64) -> f64 {
        self.v(max_y)
    }

    /// Width of `offset` icon-widths in U units
    pub fn offset_u(&self, offset: f64) -> f64 {
        ratio(offset * f64::from(self.width), self.atlas_width)
    }

    /// Height of `offset` icon-heights in V units
    pub fn offset_v(&self, offset: f64) -> f64 {
        ratio(offset * f64::from(self.height), self.atlas_height)
    }

    // Mirrored edges for faces that sample the tile flipped.
    pub fn flipped_u1(&self) -> f64 {
        self.u(1.0)
    }

    pub fn flipped_u2(&self) -> f64 {
        self.u(0.0)
    }

    pub fn flipped_v1(&self) -> f64 {
        self.v(1.0)
    }

    pub fn flipped_v2(&self) -> f64 {
        self.v(0.0)
    }

    pub fn uv_rect(&self) -> UvRect {
        UvRect {
            u_min: self.u(0.0),
            v_min: self.v(0.0),
            u_max: self.u(1.0),
            v_max: self.v(1.0),
        }
    }
}

fn ratio(value: f64, extent: u32) -> f64 {
    if extent == 0 {
        return 0.0;
    }
    value / f64::from(extent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(x: u32, y: u32, width: u32, height: u32, atlas: (u32, u32)) -> Icon {
        let mut icon = Icon::file("stone");
        icon.x = x;
        icon.y = y;
        icon.width = width;
        icon.height = height;
        icon.atlas_width = atlas.0;
        icon.atlas_height = atlas.1;
        icon
    }

    #[test]
    fn test_uv_edges_match_placement() {
        let icon = placed(32, 64, 16, 32, (128, 256));

        assert_eq!(icon.u(0.0), 32.0 / 128.0);
        assert_eq!(icon.u(1.0), 48.0 / 128.0);
        assert_eq!(icon.v(0.0), 64.0 / 256.0);
        assert_eq!(icon.v(1.0), 96.0 / 256.0);
        assert_eq!(icon.u(0.5), 40.0 / 128.0);
    }

    #[test]
    fn test_inset_edges() {
        let icon = placed(0, 0, 16, 16, (128, 128));

        assert_eq!(icon.u_min(0.25), 4.0 / 128.0);
        assert_eq!(icon.u_max(0.75), 12.0 / 128.0);
        assert_eq!(icon.v_min(0.0), 0.0);
        assert_eq!(icon.v_max(1.0), 16.0 / 128.0);
    }

    #[test]
    fn test_flipped_edges_swap_min_and_max() {
        let icon = placed(16, 16, 16, 16, (64, 64));

        assert_eq!(icon.flipped_u1(), icon.u_max(1.0));
        assert_eq!(icon.flipped_u2(), icon.u_min(0.0));
        assert_eq!(icon.flipped_v1(), icon.v_max(1.0));
        assert_eq!(icon.flipped_v2(), icon.v_min(0.0));
    }

    #[test]
    fn test_offsets_scale_with_icon_size() {
        let icon = placed(10, 10, 32, 16, (128, 64));

        assert_eq!(icon.offset_u(0.5), 16.0 / 128.0);
        assert_eq!(icon.offset_v(1.0), 16.0 / 64.0);
    }

    #[test]
    fn test_unplaced_icon_has_zero_uvs() {
        let icon = Icon::procedural("water", 16, 16);

        let rect = icon.uv_rect();
        assert_eq!(rect.u_min, 0.0);
        assert_eq!(rect.u_max, 0.0);
        assert_eq!(rect.v_max, 0.0);
        assert!(icon.is_placeholder());
    }

    #[test]
    fn test_padded_size() {
        let icon = Icon::procedural("grass", 10, 12);
        assert_eq!(icon.padded_size(2), (14, 16));
        assert_eq!(icon.padded_size(0), (10, 12));
        assert_eq!(icon.file_name(), "grass.png");
    }
}
