//! Synthetic readings for demo mode (no board attached).

use rand::Rng;

use crate::config::defaults::{
    PH_MAX, PH_MIN, SYNTHETIC_DECIMALS, SYNTHETIC_LDR_MAX, SYNTHETIC_LDR_MIN,
};
use crate::types::Reading;

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Fabricate a plausible reading: LDR analog uniform in [200, 800],
/// LDR digital uniform in {0, 1}, pH uniform in [5.5, 8.5], two decimals.
pub fn synthesize<R: Rng + ?Sized>(rng: &mut R) -> Reading {
    let ldr_analog = round_to(
        rng.gen_range(SYNTHETIC_LDR_MIN..=SYNTHETIC_LDR_MAX),
        SYNTHETIC_DECIMALS,
    );
    let ldr_digital = rng.gen_range(0..=1u8);
    let ph = round_to(rng.gen_range(PH_MIN..=PH_MAX), SYNTHETIC_DECIMALS);
    Reading::new(ldr_analog, Some(ldr_digital), ph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_ranges_hold() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let r = synthesize(&mut rng);
            assert!((200.0..=800.0).contains(&r.ldr_analog), "ldr {}", r.ldr_analog);
            assert!((5.5..=8.5).contains(&r.ph), "ph {}", r.ph);
            assert!(matches!(r.ldr_digital, Some(0 | 1)));
            assert!(!r.has_abnormal_ph());
        }
    }

    #[test]
    fn test_two_decimals() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let r = synthesize(&mut rng);
            assert!(((r.ph * 100.0).round() - r.ph * 100.0).abs() < 1e-6);
            assert!(((r.ldr_analog * 100.0).round() - r.ldr_analog * 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_both_digital_values_occur() {
        let mut rng = StdRng::seed_from_u64(1);
        let digitals: Vec<_> = (0..200).map(|_| synthesize(&mut rng).ldr_digital).collect();
        assert!(digitals.contains(&Some(0)));
        assert!(digitals.contains(&Some(1)));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(6.789, 2), 6.79);
        assert_eq!(round_to(200.0, 2), 200.0);
    }
}
