use std::cmp::Ordering;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Pixels with alpha below this are ignored when averaging
pub const VISIBLE_ALPHA: u8 = 20;

/// Quantised saturation (0..100) below which a color counts as greyscale
pub const SATURATION_CUTOFF: f32 = 10.0;

/// Hue is compared in buckets of `1 / HUE_BUCKET` degrees
pub const HUE_BUCKET: f32 = 10.0;

/// Mean color of an icon's visible pixels, channels normalised to 0..1
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AvgColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AvgColor {
    /// Average the RGB channels of every pixel with alpha >= [`VISIBLE_ALPHA`].
    ///
    /// Returns fully transparent black when no pixel qualifies.
    pub fn of_image(image: &RgbaImage) -> Self {
        let mut sum = [0.0f64; 3];
        let mut count = 0u64;

        for pixel in image.pixels() {
            if pixel[3] < VISIBLE_ALPHA {
                continue;
            }
            sum[0] += f64::from(pixel[0]) / 255.0;
            sum[1] += f64::from(pixel[1]) / 255.0;
            sum[2] += f64::from(pixel[2]) / 255.0;
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "averages are in 0..1 and only feed the sort order"
        )]
        let [r, g, b] = sum.map(|channel| (channel / count as f64) as f32);

        Self { r, g, b, a: 1.0 }
    }

    /// Hue in degrees (0..360), saturation and value in 0..100
    pub fn to_hsv(self) -> (f32, f32, f32) {
        let (r, g, b) = (self.r, self.g, self.b);
        let cmax = r.max(g).max(b);
        let cmin = r.min(g).min(b);
        let delta = cmax - cmin;
        let v = cmax * 100.0;

        if delta <= 0.0 {
            return (0.0, 0.0, v);
        }

        let mut h = if r >= cmax {
            60.0 * (((g - b) / delta) % 6.0)
        } else if g >= cmax {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };
        if h < 0.0 {
            h += 360.0;
        }

        let s = if cmax > 0.0 { delta / cmax * 100.0 } else { 0.0 };
        (h, s, v)
    }
}

/// Order two colors so similar-looking icons end up next to each other.
///
/// Greyscale colors come first, brightest to darkest. Saturated colors
/// follow, ordered by hue.
pub fn compare_colors(a: AvgColor, b: AvgColor) -> Ordering {
    let (ha, sa, va) = a.to_hsv();
    let (hb, sb, vb) = b.to_hsv();

    let sa = (sa * SATURATION_CUTOFF).floor() / SATURATION_CUTOFF;
    let sb = (sb * SATURATION_CUTOFF).floor() / SATURATION_CUTOFF;

    match (sa < SATURATION_CUTOFF, sb < SATURATION_CUTOFF) {
        (true, true) => vb.total_cmp(&va),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => {
            let ha = (ha * HUE_BUCKET).floor() / HUE_BUCKET;
            let hb = (hb * HUE_BUCKET).floor() / HUE_BUCKET;
            ha.total_cmp(&hb)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(r: f32, g: f32, b: f32) -> AvgColor {
        AvgColor { r, g, b, a: 1.0 }
    }

    #[test]
    fn test_average_ignores_faint_pixels() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 0, 255, 255]));
        // Alpha 19 is below the visibility threshold
        img.put_pixel(0, 1, Rgba([0, 255, 0, 19]));
        img.put_pixel(1, 1, Rgba([0, 255, 0, 0]));

        let avg = AvgColor::of_image(&img);

        assert!((avg.r - 0.5).abs() < 1e-6);
        assert!(avg.g.abs() < 1e-6);
        assert!((avg.b - 0.5).abs() < 1e-6);
        assert_eq!(avg.a, 1.0);
    }

    #[test]
    fn test_average_threshold_is_inclusive() {
        let mut img = RgbaImage::new(1, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, VISIBLE_ALPHA]));

        let avg = AvgColor::of_image(&img);
        assert_eq!(avg, solid(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_average_of_invisible_image_is_transparent_black() {
        let img = RgbaImage::new(4, 4);
        assert_eq!(AvgColor::of_image(&img), AvgColor::default());
    }

    #[test]
    fn test_hsv_primaries() {
        let (h, s, v) = solid(1.0, 0.0, 0.0).to_hsv();
        assert_eq!((h, s, v), (0.0, 100.0, 100.0));

        let (h, _, _) = solid(0.0, 1.0, 0.0).to_hsv();
        assert!((h - 120.0).abs() < 1e-4);

        let (h, _, _) = solid(0.0, 0.0, 1.0).to_hsv();
        assert!((h - 240.0).abs() < 1e-4);

        // Magenta-ish red wraps around to the top of the hue circle
        let (h, _, _) = solid(1.0, 0.0, 0.5).to_hsv();
        assert!((h - 330.0).abs() < 1e-3);
    }

    #[test]
    fn test_hsv_grey_has_no_saturation() {
        let (h, s, v) = solid(0.5, 0.5, 0.5).to_hsv();
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((v - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_greys_sorted_by_brightness_before_colors() {
        let white = solid(1.0, 1.0, 1.0);
        let dark = solid(0.2, 0.2, 0.2);
        let red = solid(1.0, 0.0, 0.0);

        assert_eq!(compare_colors(white, dark), Ordering::Less);
        assert_eq!(compare_colors(dark, white), Ordering::Greater);
        assert_eq!(compare_colors(dark, red), Ordering::Less);
        assert_eq!(compare_colors(red, white), Ordering::Greater);
    }

    #[test]
    fn test_saturated_colors_sorted_by_hue() {
        let red = solid(1.0, 0.0, 0.0);
        let green = solid(0.0, 1.0, 0.0);
        let blue = solid(0.0, 0.0, 1.0);

        assert_eq!(compare_colors(red, green), Ordering::Less);
        assert_eq!(compare_colors(blue, green), Ordering::Greater);
        assert_eq!(compare_colors(green, green), Ordering::Equal);
    }
}
