use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use image::RgbaImage;
use log::{debug, info, warn};
use rayon::prelude::*;

use super::compose::blit_padded;
use super::{DEFAULT_ASSETS_ROOT, DEFAULT_MAX_DIMENSION, INITIAL_ATLAS_SIZE};
use crate::cli::{CompressionLevel, GrowthMode};
use crate::error::AtlasError;
use crate::icon::{
    Icon, IconKind, available_icon_names, collect_png_files, load_rgba,
};
use crate::output::save_atlas_image;
use crate::packing::{OccupancyGrid, Rect, grow, sorted_indices};

/// Placement of every icon in a bin that fit them all
struct PackingLayout {
    width: u32,
    height: u32,
    /// Icon index and its padded footprint
    placements: Vec<(usize, Rect)>,
    occupancy: f64,
    attempts: u32,
}

/// Packs named icons into a single texture atlas.
///
/// Icons are registered by name (loaded from `<name>.png` under the base
/// path) or created with an explicit size. [`generate_atlas`] discovers the
/// source images, sorts them largest first and places them with a
/// first-fit scan, doubling the bin until everything fits.
///
/// [`generate_atlas`]: AtlasPacker::generate_atlas
pub struct AtlasPacker {
    base_path: PathBuf,
    padding: u32,
    growth: GrowthMode,
    max_dimension: u32,
    compress: Option<CompressionLevel>,
    icons: Vec<Icon>,
    index: HashMap<String, usize>,
    width: u32,
    height: u32,
    image: Option<RgbaImage>,
    generation: u64,
    /// PNGs under the base path, walked once per generation for registration lookups
    known_files: Option<HashMap<String, PathBuf>>,
}

impl AtlasPacker {
    /// Packer searching `assets/textures/<path>`
    pub fn new(path: impl AsRef<Path>, padding: u32) -> Self {
        Self::with_root(DEFAULT_ASSETS_ROOT, path, padding)
    }

    /// Packer searching `<root>/<path>`
    pub fn with_root(root: impl AsRef<Path>, path: impl AsRef<Path>, padding: u32) -> Self {
        let base_path = root.as_ref().join(path);
        if !base_path.exists() {
            warn!("Path {} does not exist", base_path.display());
        }

        Self {
            base_path,
            padding,
            growth: GrowthMode::Square,
            max_dimension: DEFAULT_MAX_DIMENSION,
            compress: None,
            icons: Vec::new(),
            index: HashMap::new(),
            width: 0,
            height: 0,
            image: None,
            generation: 0,
            known_files: None,
        }
    }

    pub fn growth_mode(mut self, growth: GrowthMode) -> Self {
        self.growth = growth;
        self
    }

    pub fn max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    pub fn compress(mut self, compress: Option<CompressionLevel>) -> Self {
        self.compress = compress;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Fail unless the base path is an existing directory.
    ///
    /// Individual missing icons are only warned about; a missing search
    /// directory means nothing can be loaded at all.
    pub fn check_base_path(&self) -> Result<()> {
        if !self.base_path.is_dir() {
            return Err(AtlasError::InputNotFound(self.base_path.clone()).into());
        }
        Ok(())
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Current atlas width (0 before the first generation)
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Current atlas height (0 before the first generation)
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Composite atlas image, for texture upload or inspection
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn is_generated(&self) -> bool {
        self.image.is_some()
    }

    /// Incremented on every successful generation. UVs cached from an
    /// icon whose `generation` differs are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn icon(&self, name: &str) -> Option<&Icon> {
        self.index.get(name).map(|&i| &self.icons[i])
    }

    /// All icons in registration order
    pub fn icons(&self) -> impl Iterator<Item = &Icon> {
        self.icons.iter()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Register an icon backed by `<name>.png`.
    ///
    /// Returns the existing icon unchanged if the name is already taken.
    pub fn register_icon(&mut self, name: &str) -> &Icon {
        if let Some(&i) = self.index.get(name) {
            return &self.icons[i];
        }

        let icon = Icon::file(name);
        if !self.has_source(&icon.file_name()) {
            warn!(
                "{} does not exist under {}",
                icon.file_name(),
                self.base_path.display()
            );
        }
        self.push(icon)
    }

    /// Create a region with an explicit size and no backing file.
    ///
    /// Returns the existing icon unchanged if the name is already taken.
    pub fn create_icon(&mut self, name: &str, width: u32, height: u32) -> &Icon {
        if let Some(&i) = self.index.get(name) {
            return &self.icons[i];
        }
        self.push(Icon::procedural(name, width, height))
    }

    /// Register every PNG under the base path by file stem.
    ///
    /// Returns how many new icons were added.
    pub fn register_all(&mut self) -> Result<usize> {
        let mut added = 0;
        for name in self.available_icons()? {
            if !self.index.contains_key(&name) {
                self.push(Icon::file(&name));
                added += 1;
            }
        }
        debug!("Registered {} icons from {}", added, self.base_path.display());
        Ok(added)
    }

    /// Icon names (file stems) available under the base path
    pub fn available_icons(&self) -> Result<Vec<String>> {
        available_icon_names(&self.base_path)
    }

    fn has_source(&mut self, file_name: &str) -> bool {
        if self.base_path.join(file_name).is_file() {
            return true;
        }
        // The constructor already warned about a missing base path
        if !self.base_path.is_dir() {
            return false;
        }
        let base_path = &self.base_path;
        self.known_files
            .get_or_insert_with(|| collect_png_files(base_path).unwrap_or_default())
            .contains_key(file_name)
    }

    fn push(&mut self, icon: Icon) -> &Icon {
        let i = self.icons.len();
        self.index.insert(icon.name.clone(), i);
        self.icons.push(icon);
        &self.icons[i]
    }

    /// Load every icon's source image, pack all icons and composite the atlas.
    ///
    /// Any previous atlas is released first. With no icons registered this
    /// succeeds without generating anything.
    pub fn generate_atlas(&mut self) -> Result<()> {
        let result = self.try_generate();
        if result.is_err() {
            for icon in &mut self.icons {
                icon.pixels = None;
            }
        }
        result
    }

    /// Forget all discovered sizes and placements, then generate again.
    pub fn regenerate_atlas(&mut self) -> Result<()> {
        for icon in &mut self.icons {
            icon.forget_source();
            icon.clear_placement();
        }
        self.generate_atlas()
    }

    /// Write the current atlas to `dest` as a PNG.
    pub fn export_image(&self, dest: &Path) -> Result<()> {
        let image = self.image.as_ref().ok_or(AtlasError::ExportBeforeGenerate)?;
        save_atlas_image(image, dest, self.compress)?;
        info!("Saved {}", dest.display());
        Ok(())
    }

    fn try_generate(&mut self) -> Result<()> {
        if self.image.take().is_some() {
            debug!("Released previous {}x{} atlas", self.width, self.height);
        }
        self.width = 0;
        self.height = 0;
        for icon in &mut self.icons {
            icon.clear_placement();
        }

        if self.icons.is_empty() {
            debug!("No icons registered, nothing to generate");
            return Ok(());
        }

        self.discover_icons()?;
        self.validate_sizes()?;

        let order = sorted_indices(&self.icons);
        let layout = self.pack(&order)?;

        let padding = self.padding;
        let generation = self.generation + 1;
        let mut image = RgbaImage::new(layout.width, layout.height);

        for &(i, rect) in &layout.placements {
            let icon = &mut self.icons[i];
            icon.x = rect.x + padding;
            icon.y = rect.y + padding;
            icon.atlas_width = layout.width;
            icon.atlas_height = layout.height;
            icon.generation = generation;

            if let Some(pixels) = icon.pixels.take() {
                blit_padded(&mut image, &pixels, icon.x, icon.y, padding);
            }
        }

        info!(
            "Atlas {}x{} with {} icons ({:.1}% efficiency, {} attempt(s))",
            layout.width,
            layout.height,
            layout.placements.len(),
            layout.occupancy * 100.0,
            layout.attempts,
        );

        self.width = layout.width;
        self.height = layout.height;
        self.generation = generation;
        self.image = Some(image);

        Ok(())
    }

    /// Resolve file icons against the base path and decode their images
    fn discover_icons(&mut self) -> Result<()> {
        self.known_files = None;
        let files = collect_png_files(&self.base_path)?;

        let jobs: Vec<(usize, PathBuf)> = self
            .icons
            .iter()
            .enumerate()
            .filter(|(_, icon)| icon.kind == IconKind::File && !icon.name.is_empty())
            .filter_map(|(i, icon)| match files.get(&icon.file_name()) {
                Some(path) => Some((i, path.clone())),
                None => {
                    warn!(
                        "{} does not exist under {}, skipping",
                        icon.file_name(),
                        self.base_path.display()
                    );
                    None
                }
            })
            .collect();

        let loaded = jobs
            .into_par_iter()
            .map(|(i, path)| -> Result<(usize, PathBuf, RgbaImage)> {
                let image = load_rgba(&path)?;
                Ok((i, path, image))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("Loaded {} of {} icon images", loaded.len(), self.icons.len());

        for (i, path, image) in loaded {
            self.icons[i].set_pixels(path, image);
        }

        Ok(())
    }

    fn validate_sizes(&self) -> Result<()> {
        let max = self.max_dimension;
        for icon in &self.icons {
            let (width, height) = icon.padded_size(self.padding);
            if width > max || height > max {
                return Err(AtlasError::IconTooLarge {
                    name: icon.name.clone(),
                    width,
                    height,
                    max,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Grow the bin from the initial size until every icon fits
    fn pack(&self, order: &[usize]) -> Result<PackingLayout> {
        let start = INITIAL_ATLAS_SIZE.min(self.max_dimension);
        let (mut width, mut height) = (start, start);
        let mut attempts = 0;

        loop {
            attempts += 1;
            if let Some((placements, occupancy)) = self.try_pack(order, width, height) {
                return Ok(PackingLayout {
                    width,
                    height,
                    placements,
                    occupancy,
                    attempts,
                });
            }

            let (next_width, next_height) = grow(self.growth, width, height);
            let stuck = (next_width, next_height) == (width, height);
            if stuck || next_width > self.max_dimension || next_height > self.max_dimension {
                return Err(AtlasError::PackingExhausted {
                    width,
                    height,
                    max: self.max_dimension,
                }
                .into());
            }

            debug!(
                "Icons do not fit in {}x{}, growing to {}x{}",
                width, height, next_width, next_height
            );
            width = next_width;
            height = next_height;
        }
    }

    /// Place all icons into a fresh bin, or `None` as soon as one doesn't fit
    fn try_pack(
        &self,
        order: &[usize],
        width: u32,
        height: u32,
    ) -> Option<(Vec<(usize, Rect)>, f64)> {
        let mut grid = OccupancyGrid::new(width, height);
        let mut placements = Vec::with_capacity(order.len());

        for &i in order {
            let (w, h) = self.icons[i].padded_size(self.padding);
            let rect = grid.insert(w, h)?;
            placements.push((i, rect));
        }

        Some((placements, grid.occupancy()))
    }
}
