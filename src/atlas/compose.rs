use image::RgbaImage;

/// Copy `icon` into `atlas` with its top-left content pixel at (`x`, `y`).
///
/// The `padding` border around the content is filled by clamping to the
/// nearest edge pixel so filtered sampling at tile edges never picks up
/// neighbouring transparency. The caller guarantees the padded footprint
/// lies inside the atlas.
pub fn blit_padded(atlas: &mut RgbaImage, icon: &RgbaImage, x: u32, y: u32, padding: u32) {
    let (w, h) = icon.dimensions();
    if w == 0 || h == 0 {
        return;
    }

    let left = x - padding;
    let top = y - padding;

    for dy in 0..h + padding * 2 {
        let sy = dy.saturating_sub(padding).min(h - 1);
        for dx in 0..w + padding * 2 {
            let sx = dx.saturating_sub(padding).min(w - 1);
            atlas.put_pixel(left + dx, top + dy, *icon.get_pixel(sx, sy));
        }
    }
}
