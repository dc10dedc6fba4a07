//! Digit generation.
//!
//! Generates the digits of the scaled upper boundary from left to right and
//! stops as soon as the truncated sequence is known to lie inside the
//! rounding interval, then walks the last digit back towards the scaled
//! input. The result is the shortest digit sequence inside the interval.

use crate::cached::{self, ALPHA, GAMMA};
use crate::diyfp::DiyFp;
#[cfg(feature = "no-panic")]
use no_panic::no_panic;

/// Largest integral part of any scaled upper boundary. Follows from the
/// index computation in `cached::for_binary_exponent`.
pub(crate) const MAX_INTEGRAL_PART: u32 = 798_336_123;

#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn write_pair(buffer: *mut u8, value: u32) -> *mut u8 {
    unsafe {
        buffer
            .cast::<u16>()
            .write_unaligned(*crate::digits2(value as usize));
        buffer.add(2)
    }
}

/// Writes the decimal digits of `n` and returns one past the last byte.
///
/// The divide-by-power-of-ten ladder is unrolled into one arm per digit
/// count so that every division has a constant divisor and each arm peels
/// two digits at a time from the pair table.
#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn write_integral_digits(mut buffer: *mut u8, mut n: u32) -> *mut u8 {
    debug_assert!(n <= MAX_INTEGRAL_PART);

    unsafe {
        if n >= 100_000_000 {
            buffer = write_pair(buffer, n / 10_000_000);
            n %= 10_000_000;
            buffer = write_pair(buffer, n / 100_000);
            n %= 100_000;
            buffer = write_pair(buffer, n / 1_000);
            n %= 1_000;
            buffer = write_pair(buffer, n / 10);
            n %= 10;
            *buffer = b'0' + n as u8;
            return buffer.add(1);
        }
        if n >= 10_000_000 {
            buffer = write_pair(buffer, n / 1_000_000);
            n %= 1_000_000;
            buffer = write_pair(buffer, n / 10_000);
            n %= 10_000;
            buffer = write_pair(buffer, n / 100);
            n %= 100;
            return write_pair(buffer, n);
        }
        if n >= 1_000_000 {
            buffer = write_pair(buffer, n / 100_000);
            n %= 100_000;
            buffer = write_pair(buffer, n / 1_000);
            n %= 1_000;
            buffer = write_pair(buffer, n / 10);
            n %= 10;
            *buffer = b'0' + n as u8;
            return buffer.add(1);
        }
        if n >= 100_000 {
            buffer = write_pair(buffer, n / 10_000);
            n %= 10_000;
            buffer = write_pair(buffer, n / 100);
            n %= 100;
            return write_pair(buffer, n);
        }
        if n >= 10_000 {
            buffer = write_pair(buffer, n / 1_000);
            n %= 1_000;
            buffer = write_pair(buffer, n / 10);
            n %= 10;
            *buffer = b'0' + n as u8;
            return buffer.add(1);
        }
        if n >= 1_000 {
            buffer = write_pair(buffer, n / 100);
            n %= 100;
            return write_pair(buffer, n);
        }
        if n >= 100 {
            buffer = write_pair(buffer, n / 10);
            n %= 10;
            *buffer = b'0' + n as u8;
            return buffer.add(1);
        }
        if n >= 10 {
            return write_pair(buffer, n);
        }
        *buffer = b'0' + n as u8;
        buffer.add(1)
    }
}

/// Walks the last generated digit towards the scaled input.
///
/// The buffer holds the digits of the upper boundary divided by 10^kappa;
/// `distance`, `delta`, `rest` and `ten_kappa` are all expressed in the same
/// fixed-point unit:
///
/// ```text
///                             <---- distance ----->
///          <--------------------------- delta ---->
///                                  <---- rest ---->
///                  <-- ten_kappa -->
/// ---------[------------------+----+--------------]---------
///          L                  w    B              H
/// ```
///
/// Decrementing the last digit moves B left by ten_kappa. The loop stops
/// when B would drop below w, fall out of [L, H], or end up farther from w
/// than it started. The comparisons stay in unsigned range only when
/// evaluated in exactly this order.
#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn round_last_digit(
    buffer: *mut u8,
    length: usize,
    distance: u64,
    delta: u64,
    mut rest: u64,
    ten_kappa: u64,
) {
    debug_assert!(length >= 1);
    debug_assert!(distance <= delta);
    debug_assert!(rest <= delta);
    debug_assert!(ten_kappa > 0);

    let last = unsafe { buffer.add(length - 1) };
    let mut digit = unsafe { *last } - b'0';

    while rest < distance
        && delta - rest >= ten_kappa
        && (rest + ten_kappa <= distance || rest + ten_kappa - distance < distance - rest)
    {
        // A zero digit would already have failed the delta check.
        debug_assert!(digit != 0);
        digit -= 1;
        rest += ten_kappa;
    }

    unsafe { *last = b'0' + digit };
}

/// Writes the shortest digit sequence whose value lies in [low, high] and
/// returns the digit count and the decimal exponent of the last digit.
///
/// All three inputs share one binary exponent in [ALPHA, GAMMA] with
/// low.f <= w.f <= high.f.
#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn digit_gen(buffer: *mut u8, low: DiyFp, w: DiyFp, high: DiyFp) -> (usize, i32) {
    debug_assert!(w.e >= ALPHA);
    debug_assert!(w.e <= GAMMA);
    debug_assert!(w.e == low.e);
    debug_assert!(w.e == high.e);

    let mut distance = high.sub(w).f;
    let mut delta = high.sub(low).f;

    // Split high = f * 2^e at the binary point. -e >= 32, so the integral
    // part fits in 32 bits and the fractional part keeps room for the
    // multiplications by ten below.
    let one = DiyFp::new(1u64 << -high.e, high.e);
    let p1 = (high.f >> -one.e) as u32;
    let mut p2 = high.f & (one.f - 1);
    debug_assert!(p1 >= 4);

    let mut length =
        unsafe { write_integral_digits(buffer, p1).offset_from(buffer) } as usize;

    if p2 > delta {
        // Every integral digit is significant. Produce fractional digits by
        // repeatedly scaling the remainder by ten and peeling off the bits
        // above the binary point, until the remainder fits inside the
        // interval. delta and distance track the same change of unit.
        let mut exponent = 0i32;
        loop {
            debug_assert!(length < 17);
            debug_assert!(p2 <= u64::MAX / 10);
            p2 *= 10;
            let d = (p2 >> -one.e) as u8;
            debug_assert!(d <= 9);
            unsafe { *buffer.add(length) = b'0' + d };
            length += 1;
            p2 &= one.f - 1;
            exponent -= 1;

            delta *= 10;
            distance *= 10;

            if p2 <= delta {
                unsafe { round_last_digit(buffer, length, distance, delta, p2, one.f) };
                return (length, exponent);
            }
        }
    }

    // The integral digits already overshoot the interval width. Drop
    // trailing digits while the value they reconstruct stays within delta;
    // the loop must stop before consuming every digit, because the full
    // integral part exceeds delta.
    debug_assert!((u64::from(p1) << -one.e) + p2 > delta);

    let mut rest = p2;
    let mut ten_kappa = one.f;
    let mut dropped = 0;
    loop {
        debug_assert!(dropped < length);
        debug_assert!(rest <= delta);

        let digit = u64::from(unsafe { *buffer.add(length - 1 - dropped) } - b'0');
        let reconstructed = digit * ten_kappa + rest;
        if reconstructed > delta {
            let length = length - dropped;
            let exponent = dropped as i32;
            unsafe { round_last_digit(buffer, length, distance, delta, rest, ten_kappa) };
            return (length, exponent);
        }
        rest = reconstructed;
        ten_kappa *= 10;
        dropped += 1;
    }
}

/// Scales the value and its boundaries into the [ALPHA, GAMMA] window,
/// generates digits there, and rebases the decimal exponent afterwards.
///
/// Writes at most 17 digits and returns the digit count together with the
/// decimal exponent, so that value = digits * 10^exponent.
#[cfg_attr(feature = "no-panic", no_panic)]
pub(crate) unsafe fn grisu2(
    buffer: *mut u8,
    minus: DiyFp,
    v: DiyFp,
    plus: DiyFp,
) -> (usize, i32) {
    debug_assert!(v.e == minus.e);
    debug_assert!(v.e == plus.e);

    let cached = cached::for_binary_exponent(v.e);
    let ten_mk = DiyFp::new(cached.f, cached.e);

    let w = v.mul(ten_mk);
    let w_minus = minus.mul(ten_mk);
    let w_plus = plus.mul(ten_mk);

    debug_assert!(w.e >= ALPHA);
    debug_assert!(w.e <= GAMMA);
    debug_assert!(w_plus.f >= 1 << 62);

    // Each product is off by less than one unit in the last place, both from
    // the rounded multiplication and from the cached power itself. Pulling
    // the interval ends inward by one unit each guarantees that anything we
    // emit inside [low, high] parses back to the original value.
    let low = DiyFp::new(w_minus.f + 1, w_minus.e);
    let high = DiyFp::new(w_plus.f - 1, w_plus.e);

    let (length, exponent) = unsafe { digit_gen(buffer, low, w, high) };
    (length, exponent - cached.k)
}
