use std::cmp::Ordering;

use crate::icon::{Icon, compare_colors};

/// Packing priority: largest area first.
///
/// Equal-area file icons are grouped by average color so similar tiles
/// land next to each other. Placeholders of the same area follow them.
pub fn packing_order(a: &Icon, b: &Icon) -> Ordering {
    b.area()
        .cmp(&a.area())
        .then_with(|| a.is_placeholder().cmp(&b.is_placeholder()))
        .then_with(|| {
            if a.is_placeholder() {
                Ordering::Equal
            } else {
                compare_colors(a.avg_color, b.avg_color)
            }
        })
}

/// Indices of `icons` in packing order. Ties keep insertion order.
pub fn sorted_indices(icons: &[Icon]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..icons.len()).collect();
    indices.sort_by(|&a, &b| packing_order(&icons[a], &icons[b]));
    indices
}
