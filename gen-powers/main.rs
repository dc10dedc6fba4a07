// Generator for the cached power-of-ten table in src/cached.rs: correctly
// rounded 64-bit significands of 10^k for k = -300, -292, ..., 324, each
// printed with the binary exponent that normalizes it.

use num_bigint::BigUint;
use num_integer::Integer as _;
use std::f64::consts::LOG2_10;

fn main() {
    for k in (-300..=324).step_by(8) {
        // First guess for the binary exponent that puts the rounded
        // significand in [2^63, 2^64); corrected below if rounding moves it
        // out of range.
        let mut e = ((k as f64) * LOG2_10).floor() as i32 - 63;
        loop {
            let mut num = if k >= 0 {
                BigUint::from(10u8).pow(k as u32)
            } else {
                BigUint::from(1u8)
            };
            let mut den = if k >= 0 {
                BigUint::from(1u8)
            } else {
                BigUint::from(10u8).pow(-k as u32)
            };
            if e >= 0 {
                den *= BigUint::from(2u8).pow(e as u32);
            } else {
                num *= BigUint::from(2u8).pow(-e as u32);
            }

            // f = 10^k / 2^e, rounded to nearest.
            let (q, r) = num.div_rem(&den);
            let f = if &r * 2u8 >= den { q + 1u8 } else { q };

            if f < BigUint::from(1u8) << 63u32 {
                e -= 1;
            } else if f >= BigUint::from(1u8) << 64u32 {
                e += 1;
            } else {
                let limbs = f.to_u64_digits();
                println!(
                    "CachedPower {{ f: 0x{:016X}, e: {:5}, k: {:4} }},",
                    limbs[0], e, k
                );
                break;
            }
        }
    }
}
