//! Score-driven scroll speed
//!
//! Speed follows a triangle wave over the score: it climbs for `cycle` points,
//! falls back for the next `cycle` points, and repeats.

use crate::config::Tuning;
use crate::consts::BG_SPEED_FACTOR;

/// Position on the ramp in `[0, 1]`
pub fn ramp_fraction(score: u64, cycle: u64) -> f32 {
    let cycle = cycle.max(1);
    let index = score / cycle;
    let within = (score % cycle) as f32;
    let cycle = cycle as f32;
    if index % 2 == 0 {
        within / cycle
    } else {
        (cycle - within) / cycle
    }
}

/// Ground speed for a score
pub fn ground_speed(score: u64, tuning: &Tuning) -> f32 {
    tuning.base_speed * (1.0 + ramp_fraction(score, tuning.ramp_cycle) * tuning.ramp_max_gain)
}

/// Background speed always trails the ground for parallax
pub fn background_speed(ground_speed: f32) -> f32 {
    ground_speed * BG_SPEED_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_at_base() {
        let tuning = Tuning::default();
        assert_eq!(ground_speed(0, &tuning), tuning.base_speed);
    }

    #[test]
    fn test_peaks_at_cycle_boundary() {
        let tuning = Tuning::default();
        let peak = tuning.base_speed * (1.0 + tuning.ramp_max_gain);
        assert!((ground_speed(tuning.ramp_cycle, &tuning) - peak).abs() < 1e-5);
        assert!((ground_speed(2 * tuning.ramp_cycle, &tuning) - tuning.base_speed).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_shape() {
        assert_eq!(ramp_fraction(0, 10), 0.0);
        assert_eq!(ramp_fraction(5, 10), 0.5);
        assert_eq!(ramp_fraction(10, 10), 1.0);
        assert_eq!(ramp_fraction(15, 10), 0.5);
        assert_eq!(ramp_fraction(20, 10), 0.0);
        assert_eq!(ramp_fraction(25, 10), 0.5);
    }

    #[test]
    fn test_background_ratio() {
        assert_eq!(background_speed(8.0), 6.0);
    }

    proptest! {
        #[test]
        fn prop_speed_bounded(score in 0u64..1_000_000, cycle in 1u64..200) {
            let tuning = Tuning { ramp_cycle: cycle, ..Default::default() };
            let speed = ground_speed(score, &tuning);
            let max = tuning.base_speed * (1.0 + tuning.ramp_max_gain);
            prop_assert!(speed >= tuning.base_speed - 1e-4);
            prop_assert!(speed <= max + 1e-4);
        }

        #[test]
        fn prop_slope_flips_each_cycle(score in 0u64..100_000, cycle in 2u64..100) {
            let tuning = Tuning { ramp_cycle: cycle, ..Default::default() };
            let step = ground_speed(score + 1, &tuning) - ground_speed(score, &tuning);
            let expected = tuning.base_speed * tuning.ramp_max_gain / cycle as f32;
            if (score / cycle) % 2 == 0 {
                prop_assert!((step - expected).abs() < 1e-3);
            } else {
                prop_assert!((step + expected).abs() < 1e-3);
            }
        }
    }
}
