//! Rotation-angle quantization and sprite-key formatting.
//!
//! Sprite sheets are rendered in 15-degree steps, so every continuous angle
//! the simulation produces has to be snapped to the grid before it can name
//! an asset.

pub const ANGLE_STEP: i32 = 15;

/// Snaps an angle to the nearest 15-degree step, normalized into [0, 360).
///
/// Ties round toward the higher multiple (half-up), matching how the sprite
/// keys were generated.
pub fn quantize(angle: f32) -> i32 {
    let normalized = angle.rem_euclid(360.0);
    let stepped = (normalized / ANGLE_STEP as f32 + 0.5).floor() as i32 * ANGLE_STEP;
    stepped.rem_euclid(360)
}

/// Key into the current sprite index: `"{shuv}_{flip}"`, both quantized.
pub fn sprite_key(shuv: f32, flip: f32) -> String {
    format!("{}_{}", quantize(shuv), quantize(flip))
}

/// Key format used by the older sprite batches: flip maps to the X axis,
/// Y is fixed at 90, shuv maps to Z, all decimal-normalized.
pub fn legacy_sprite_key(shuv: f32, flip: f32) -> String {
    format!("{}.0_90.0_{}.0", quantize(flip), quantize(shuv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_lands_on_fifteen_degree_grid_in_range() {
        for raw in [-1000.0f32, -361.0, -7.4, 0.0, 7.5, 90.0, 359.9, 360.0, 1234.5] {
            let q = quantize(raw);
            assert_eq!(q % 15, 0, "raw={raw}");
            assert!((0..360).contains(&q), "raw={raw} q={q}");
        }
    }

    #[test]
    fn quantize_is_periodic_in_full_turns() {
        for raw in [0.0f32, 7.6, 22.4, 141.0, 359.0] {
            assert_eq!(quantize(raw), quantize(raw + 360.0));
            assert_eq!(quantize(raw), quantize(raw - 720.0));
        }
    }

    #[test]
    fn quantize_rounds_half_up() {
        assert_eq!(quantize(7.5), 15);
        assert_eq!(quantize(7.4), 0);
        assert_eq!(quantize(22.5), 30);
        // 352.5 rounds up to 360, which normalizes back to 0.
        assert_eq!(quantize(352.5), 0);
    }

    #[test]
    fn sprite_keys_format_quantized_components() {
        assert_eq!(sprite_key(29.0, 44.0), "30_45");
        assert_eq!(legacy_sprite_key(29.0, 44.0), "45.0_90.0_30.0");
    }
}
