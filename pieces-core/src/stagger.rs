//! Per-target delay and value policies. Index and count refer to a target's
//! position in the sequence handed to the engine.

use rand::Rng;

pub const PIECE_STEP_MS: f64 = 6.0;
pub const FX_FORWARD_STEP_MS: f64 = 5.0;
pub const FX_REVERSE_STEP_MS: f64 = 2.0;
pub const LETTER_STEP_MS: f64 = 50.0;
pub const MENU_STEP_MS: f64 = 30.0;

/// Delay as a function of (index, count).
pub type DelayFn = Box<dyn Fn(usize, usize) -> f64>;

fn seeded(step_index: usize, step: f64, seed: i32) -> f64 {
    (step_index as f64 * step + seed as f64).max(0.0)
}

pub fn piece_delay(index: usize, seed: i32) -> f64 {
    seeded(index, PIECE_STEP_MS, seed)
}

pub fn fx_forward_delay(index: usize, seed: i32) -> f64 {
    seeded(index, FX_FORWARD_STEP_MS, seed)
}

/// Last index starts first.
pub fn fx_reverse_delay(index: usize, count: usize, seed: i32) -> f64 {
    seeded(count.saturating_sub(index + 1), FX_REVERSE_STEP_MS, seed)
}

pub fn letter_in_delay(index: usize, _count: usize) -> f64 {
    index as f64 * LETTER_STEP_MS
}

pub fn letter_out_delay(index: usize, count: usize) -> f64 {
    count.saturating_sub(index + 1) as f64 * LETTER_STEP_MS
}

pub fn menu_delay(index: usize, _count: usize) -> f64 {
    index as f64 * MENU_STEP_MS
}

/// Horizontal drift away from the center line.
pub fn drift_x<R: Rng + ?Sized>(left_half: bool, rng: &mut R) -> f64 {
    if left_half {
        rng.random_range(50..=100) as f64
    } else {
        rng.random_range(-100..=-50) as f64
    }
}

pub fn lift_y<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(-1000..=-800) as f64
}

pub fn fx_push_x<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(-500..=-100) as f64
}

pub fn fx_drop_y<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(0..=100) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{DELAY_SEED_MAX, DELAY_SEED_MIN};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn piece_delays_never_go_negative() {
        for seed in DELAY_SEED_MIN..=DELAY_SEED_MAX {
            for index in 0..200 {
                assert!(piece_delay(index, seed) >= 0.0);
                assert!(fx_forward_delay(index, seed) >= 0.0);
                assert!(fx_reverse_delay(index, 200, seed) >= 0.0);
            }
        }
        assert_eq!(piece_delay(0, DELAY_SEED_MIN), 0.0);
        assert_eq!(piece_delay(10, -25), 35.0);
        assert_eq!(piece_delay(3, 7), 25.0);
    }

    #[test]
    fn reverse_delay_runs_last_index_first() {
        assert_eq!(fx_reverse_delay(9, 10, 0), 0.0);
        assert_eq!(fx_reverse_delay(0, 10, 0), 18.0);
        assert_eq!(fx_reverse_delay(0, 10, 5), 23.0);
    }

    #[test]
    fn letter_delays() {
        assert_eq!(letter_in_delay(3, 5), 150.0);
        assert_eq!(letter_out_delay(4, 5), 0.0);
        assert_eq!(letter_out_delay(0, 5), 200.0);
        assert_eq!(menu_delay(2, 40), 60.0);
    }

    #[test]
    fn motion_values_stay_in_their_ranges() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..500 {
            assert!((50.0..=100.0).contains(&drift_x(true, &mut rng)));
            assert!((-100.0..=-50.0).contains(&drift_x(false, &mut rng)));
            assert!((-1000.0..=-800.0).contains(&lift_y(&mut rng)));
            assert!((-500.0..=-100.0).contains(&fx_push_x(&mut rng)));
            assert!((0.0..=100.0).contains(&fx_drop_y(&mut rng)));
        }
    }
}
