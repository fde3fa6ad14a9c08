//! Salt-marsh wave attenuation

use crate::core::types::WaterLevels;

/// Depth at or below which the shallow-water cap applies (m)
pub const SHALLOW_DEPTH_M: f64 = 0.1;

/// Attenuation fraction for shallow water
pub const SHALLOW_ATTENUATION: f64 = 0.60;

/// Power-law coefficients, percent attenuation = A * depth^B
pub const ATTENUATION_COEFF: f64 = 6.3398;
pub const ATTENUATION_EXPONENT: f64 = -0.974;

/// Fraction of the total water height a marsh removes at depth `height`
pub fn wave_attenuation(height: f64) -> f64 {
    if height <= SHALLOW_DEPTH_M {
        SHALLOW_ATTENUATION
    } else {
        ATTENUATION_COEFF * height.powf(ATTENUATION_EXPONENT) / 100.0
    }
}

/// Height removed by the marsh. Capped at the surge component since the marsh
/// cannot buffer the sea-level baseline.
pub fn height_reduction(levels: WaterLevels) -> f64 {
    let total = levels.total();
    if total <= 0.0 {
        return 0.0;
    }
    (wave_attenuation(total) * total).min(levels.surge_m.max(0.0))
}

/// Effective height behind the marsh
pub fn attenuated_height(levels: WaterLevels) -> f64 {
    (levels.total() - height_reduction(levels)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shallow_boundary_uses_cap() {
        assert_eq!(wave_attenuation(0.1), 0.60);
        assert_eq!(wave_attenuation(0.05), 0.60);
        assert!(wave_attenuation(0.1000001) < 0.60);
    }

    #[test]
    fn test_power_law_decay() {
        let at_one = wave_attenuation(1.0);
        assert!((at_one - 0.063398).abs() < 1e-12);
        assert!(wave_attenuation(2.0) < at_one);
    }

    #[test]
    fn test_reduction_capped_by_surge() {
        // 60% of 0.1 would be 0.06 but only 0.01 of it is surge
        let levels = WaterLevels::new(0.09, 0.01);
        assert!((height_reduction(levels) - 0.01).abs() < 1e-12);
        assert!((attenuated_height(levels) - 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_reduction_without_cap() {
        let levels = WaterLevels::new(0.4, 1.6);
        let expected = wave_attenuation(2.0) * 2.0;
        assert!((height_reduction(levels) - expected).abs() < 1e-12);
        assert!(attenuated_height(levels) > 0.0);
    }
}
