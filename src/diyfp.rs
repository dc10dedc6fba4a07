//! Extended-precision significand arithmetic.
//!
//! Digit generation works on 64-bit significands with a separate binary
//! exponent, giving the three extra bits of precision that the conversion
//! needs beyond an IEEE double's 53.

use crate::traits::RawFloat;

/// f * 2^e with an unsigned 64-bit significand.
///
/// Normalized means the top bit of `f` is set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct DiyFp {
    pub f: u64,
    pub e: i32,
}

impl DiyFp {
    pub(crate) const fn new(f: u64, e: i32) -> DiyFp {
        DiyFp { f, e }
    }

    /// self - other. Both operands must share an exponent and the result
    /// must not underflow.
    pub(crate) fn sub(self, other: DiyFp) -> DiyFp {
        debug_assert!(self.e == other.e);
        debug_assert!(self.f >= other.f);

        DiyFp::new(self.f - other.f, self.e)
    }

    /// self * other, keeping the upper 64 bits of the 128-bit product,
    /// rounded with ties up.
    ///
    /// The result is not necessarily normalized, but the product of two
    /// normalized operands keeps a significand of at least 2^62.
    pub(crate) fn mul(self, other: DiyFp) -> DiyFp {
        let p = u128::from(self.f) * u128::from(other.f);
        let h = (p >> 64) as u64;
        let l = p as u64;

        DiyFp::new(h + (l >> 63), self.e + other.e + 64)
    }

    /// Shifts the significand left until its top bit is set. `f` must be
    /// nonzero.
    pub(crate) fn normalize(self) -> DiyFp {
        debug_assert!(self.f != 0);

        let shift = self.f.leading_zeros() as i32;
        DiyFp::new(self.f << shift, self.e - shift)
    }

    /// Left-aligns the significand to the smaller exponent `e`. The shifted
    /// bits must all be zero.
    pub(crate) fn normalize_to(self, e: i32) -> DiyFp {
        let shift = self.e - e;
        debug_assert!(shift >= 0);
        debug_assert!(self.f << shift >> shift == self.f);

        DiyFp::new(self.f << shift, e)
    }
}

/// A value together with the midpoints to its representable neighbors, all
/// normalized to one shared exponent. Every real strictly between `minus`
/// and `plus` rounds to the value, however the parser breaks ties.
pub(crate) struct Boundaries {
    pub w: DiyFp,
    pub minus: DiyFp,
    pub plus: DiyFp,
}

/// Decodes a strictly positive finite value and computes its boundaries.
///
/// The predecessor of a power of two (other than the smallest normal) sits
/// half as far away as the successor, so the lower midpoint is computed at
/// twice the resolution in that case.
pub(crate) fn boundaries<F: RawFloat>(value: F) -> Boundaries {
    let bits = value.to_bits_u64();
    debug_assert!(bits != 0);
    debug_assert!(bits >> (F::SIG_DIGITS + F::EXP_BITS - 1) == 0);

    let biased_exp = (bits >> (F::SIG_DIGITS - 1)) as i32;
    let fraction = bits & (F::HIDDEN_BIT - 1);
    debug_assert!(biased_exp < (1 << F::EXP_BITS) - 1);

    let v = if biased_exp == 0 {
        // Denormal: no hidden bit, fixed exponent.
        DiyFp::new(fraction, 1 - F::BIAS)
    } else {
        DiyFp::new(fraction + F::HIDDEN_BIT, biased_exp - F::BIAS)
    };

    let lower_is_closer = fraction == 0 && biased_exp > 1;

    let plus = DiyFp::new(2 * v.f + 1, v.e - 1);
    let minus = if lower_is_closer {
        DiyFp::new(4 * v.f - 1, v.e - 2)
    } else {
        DiyFp::new(2 * v.f - 1, v.e - 1)
    };

    let w = v.normalize();
    // plus shares w's normalized exponent, so a plain shift suffices.
    let plus = plus.normalize_to(w.e);
    let minus = minus.normalize_to(plus.e);

    Boundaries { w, minus, plus }
}
