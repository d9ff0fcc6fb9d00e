mod color;
mod icon;
mod loader;

pub use color::{AvgColor, HUE_BUCKET, SATURATION_CUTOFF, VISIBLE_ALPHA, compare_colors};
pub use icon::{Icon, IconKind, UvRect};
pub use loader::{available_icon_names, collect_png_files, load_rgba};
