use crate::cli::GrowthMode;

/// Bin size for the next attempt after a failed one
pub fn grow(mode: GrowthMode, width: u32, height: u32) -> (u32, u32) {
    match mode {
        GrowthMode::Square => (width.saturating_mul(2), height.saturating_mul(2)),
        GrowthMode::Balanced if width <= height => (width.saturating_mul(2), height),
        GrowthMode::Balanced => (width, height.saturating_mul(2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_doubles_both() {
        assert_eq!(grow(GrowthMode::Square, 128, 128), (256, 256));
        assert_eq!(grow(GrowthMode::Square, 256, 128), (512, 256));
    }

    #[test]
    fn test_balanced_doubles_smaller_side_width_first() {
        let mut size = (128, 128);
        let mut seen = Vec::new();
        for _ in 0..4 {
            size = grow(GrowthMode::Balanced, size.0, size.1);
            seen.push(size);
        }

        assert_eq!(seen, vec![(256, 128), (256, 256), (512, 256), (512, 512)]);
    }
}
