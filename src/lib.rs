//! Conversion of floating point numbers to the shortest decimal string that
//! parses back to exactly the same value, based on the Grisu2 algorithm by
//! Florian Loitsch.
//!
//! The digit sequence is rendered either in positional notation or in
//! scientific notation with an always-signed exponent, matching the style
//! of number-to-string conversions in dynamic languages.
//!
//! Reference: Loitsch, "Printing Floating-Point Numbers Quickly and
//! Accurately with Integers", PLDI 2010.
//!
//! <br>
//!
//! # Example
//!
//! ```
//! fn main() {
//!     let mut buffer = grisu::Buffer::new();
//!     let printed = buffer.format(1.234);
//!     assert_eq!(printed, "1.234");
//! }
//! ```

#![no_std]
#![doc(html_root_url = "https://docs.rs/grisu/1.0.0")]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_ptr_alignment,
    clippy::cast_sign_loss,
    clippy::doc_markdown,
    clippy::many_single_char_names,
    clippy::must_use_candidate,
    clippy::needless_doctest_main,
    clippy::similar_names,
    clippy::unreadable_literal
)]

#[cfg(test)]
extern crate std;

mod cached;
mod diyfp;
mod grisu;
mod traits;

use crate::traits::RawFloat;
use core::mem::MaybeUninit;
use core::ptr;
use core::slice;
use core::str;
#[cfg(feature = "no-panic")]
use no_panic::no_panic;

/// Longest output for a strictly positive value: either 17 digits with a
/// decimal point and a five-byte exponent, or "0." followed by five zeros
/// and 17 digits.
const MAX_POSITIVE_LEN: usize = 24;

// One extra byte for the sign.
const BUFFER_LEN: usize = MAX_POSITIVE_LEN + 1;

// Align data since unaligned access may be slower when crossing a
// hardware-specific boundary.
#[repr(C, align(2))]
struct Digits2([u8; 200]);

static DIGITS2: Digits2 = Digits2(
    *b"0001020304050607080910111213141516171819\
       2021222324252627282930313233343536373839\
       4041424344454647484950515253545556575859\
       6061626364656667686970717273747576777879\
       8081828384858687888990919293949596979899",
);

// Converts value in the range [0, 100) to a pair of ASCII digits.
#[cfg_attr(feature = "no-panic", no_panic)]
pub(crate) unsafe fn digits2(value: usize) -> &'static u16 {
    debug_assert!(value < 100);

    #[allow(clippy::cast_ptr_alignment)]
    unsafe {
        &*DIGITS2.0.as_ptr().cast::<u16>().add(value)
    }
}

/// Rendering options for [`Buffer::format_with`].
///
/// The defaults match [`Buffer::format`]: no trailing ".0" on integral
/// output, NaN spelled `NaN`, infinities spelled `Infinity` after the sign.
#[derive(Copy, Clone, Debug)]
pub struct Options {
    /// Append ".0" to positional outputs without a fractional part, so that
    /// 1.0 prints as "1.0" rather than "1". Scientific outputs are
    /// unaffected.
    pub trailing_dot_zero: bool,
    /// Spelling used for NaN. Never preceded by a sign.
    pub nan: &'static str,
    /// Spelling used for infinities, after the sign when negative.
    pub infinity: &'static str,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            trailing_dot_zero: false,
            nan: "NaN",
            infinity: "Infinity",
        }
    }
}

/// Writes a decimal exponent with a mandatory sign and one to three digits.
#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn write_exponent(mut buffer: *mut u8, exponent: i32) -> *mut u8 {
    debug_assert!(exponent > -1000);
    debug_assert!(exponent < 1000);

    unsafe {
        if exponent < 0 {
            *buffer = b'-';
        } else {
            *buffer = b'+';
        }
        buffer = buffer.add(1);

        let k = exponent.unsigned_abs();
        if k < 10 {
            *buffer = b'0' + k as u8;
            buffer.add(1)
        } else if k < 100 {
            buffer.cast::<u16>().write_unaligned(*digits2(k as usize));
            buffer.add(2)
        } else {
            let q = k / 100;
            let r = k % 100;
            *buffer = b'0' + q as u8;
            buffer
                .add(1)
                .cast::<u16>()
                .write_unaligned(*digits2(r as usize));
            buffer.add(3)
        }
    }
}

/// Renders `length` digits already sitting at the start of `buffer` in
/// positional notation, placing the decimal point `decimal_point` digits
/// after the first one.
#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn format_fixed(
    buffer: *mut u8,
    length: usize,
    decimal_point: i32,
    trailing_dot_zero: bool,
) -> *mut u8 {
    debug_assert!(length >= 1);

    if decimal_point <= 0 {
        // 0.[000]digits
        let zeros = decimal_point.unsigned_abs() as usize;
        unsafe {
            ptr::copy(buffer, buffer.add(2 + zeros), length);
            *buffer = b'0';
            *buffer.add(1) = b'.';
            ptr::write_bytes(buffer.add(2), b'0', zeros);
            buffer.add(2 + zeros + length)
        }
    } else if (decimal_point as usize) < length {
        // digits.digits
        let point = decimal_point as usize;
        unsafe {
            ptr::copy(buffer.add(point), buffer.add(point + 1), length - point);
            *buffer.add(point) = b'.';
            buffer.add(length + 1)
        }
    } else {
        // digits[000]
        let point = decimal_point as usize;
        unsafe {
            ptr::write_bytes(buffer.add(length), b'0', point - length);
            let mut end = buffer.add(point);
            if trailing_dot_zero {
                *end = b'.';
                *end.add(1) = b'0';
                end = end.add(2);
            }
            end
        }
    }
}

/// Renders `length` digits in scientific notation, d.dddde±NNN, with no
/// decimal point for a one-digit significand.
#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn format_exponential(mut buffer: *mut u8, length: usize, decimal_point: i32) -> *mut u8 {
    debug_assert!(length >= 1);

    unsafe {
        if length == 1 {
            buffer = buffer.add(1);
        } else {
            ptr::copy(buffer.add(1), buffer.add(2), length - 1);
            *buffer.add(1) = b'.';
            buffer = buffer.add(1 + length);
        }
        *buffer = b'e';
        write_exponent(buffer.add(1), decimal_point - 1)
    }
}

/// Writes the shortest decimal form of a strictly positive finite value and
/// returns one past the last byte written. The caller must have classified
/// the value already; zero, negative values, NaN and infinities must never
/// reach this point.
#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn write_positive<F>(value: F, buffer: *mut u8, trailing_dot_zero: bool) -> *mut u8
where
    F: RawFloat,
{
    debug_assert!(value > F::ZERO);

    let b = diyfp::boundaries(value);
    let (length, exponent) = unsafe { grisu::grisu2(buffer, b.minus, b.w, b.plus) };
    debug_assert!(length <= F::MAX_DIGITS10);

    // Position of the decimal point relative to the first digit. Appending
    // the exponent as-is would already be a correct representation; the
    // rest is presentation.
    let decimal_point = length as i32 + exponent;

    // Positional notation covers everything from 0.000001 up to the largest
    // integer the type represents exactly; scientific notation covers the
    // rest.
    let use_fixed = -6 < decimal_point && value <= F::MAX_EXACT_INT;

    let end = if use_fixed {
        unsafe { format_fixed(buffer, length, decimal_point, trailing_dot_zero) }
    } else {
        unsafe { format_exponential(buffer, length, decimal_point) }
    };
    debug_assert!(unsafe { end.offset_from(buffer) } as usize <= MAX_POSITIVE_LEN);
    end
}

#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn write_str(buffer: *mut u8, s: &str) -> *mut u8 {
    unsafe {
        ptr::copy_nonoverlapping(s.as_ptr(), buffer, s.len());
        buffer.add(s.len())
    }
}

/// Driver for finite values: sign, zero, then digit generation.
#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn write_finite<F>(mut value: F, mut buffer: *mut u8, options: Options) -> *mut u8
where
    F: RawFloat,
{
    // signbit rather than a comparison, so that -0.0 keeps its sign.
    if value.is_sign_negative() {
        unsafe { *buffer = b'-' };
        buffer = unsafe { buffer.add(1) };
        value = -value;
    }

    if value == F::ZERO {
        unsafe {
            *buffer = b'0';
            buffer = buffer.add(1);
            if options.trailing_dot_zero {
                *buffer = b'.';
                *buffer.add(1) = b'0';
                buffer = buffer.add(2);
            }
        }
        return buffer;
    }

    unsafe { write_positive(value, buffer, options.trailing_dot_zero) }
}

/// Full driver: special values get their configured spellings, everything
/// else goes through the finite path.
#[cfg_attr(feature = "no-panic", no_panic)]
unsafe fn write<F>(value: F, mut buffer: *mut u8, options: Options) -> *mut u8
where
    F: RawFloat,
{
    if value.is_nan() {
        return unsafe { write_str(buffer, options.nan) };
    }

    if value.is_infinite() {
        if value.is_sign_negative() {
            unsafe { *buffer = b'-' };
            buffer = unsafe { buffer.add(1) };
        }
        return unsafe { write_str(buffer, options.infinity) };
    }

    unsafe { write_finite(value, buffer, options) }
}

/// Safe API for formatting floating point numbers to text.
///
/// ## Example
///
/// ```
/// let mut buffer = grisu::Buffer::new();
/// let printed = buffer.format_finite(1.234);
/// assert_eq!(printed, "1.234");
/// ```
pub struct Buffer {
    bytes: [MaybeUninit<u8>; BUFFER_LEN],
}

impl Buffer {
    /// This is a cheap operation; you don't need to worry about reusing
    /// buffers for efficiency.
    #[inline]
    #[cfg_attr(feature = "no-panic", no_panic)]
    pub fn new() -> Self {
        let bytes = [MaybeUninit::<u8>::uninit(); BUFFER_LEN];
        Buffer { bytes }
    }

    /// Print a floating point number into this buffer and return a
    /// reference to its string representation within the buffer.
    ///
    /// # Special cases
    ///
    /// This function formats NaN as the string "NaN" and infinities as
    /// "Infinity" / "-Infinity". Use [`format_with`][Self::format_with] to
    /// change the spellings.
    #[cfg_attr(feature = "no-panic", no_panic)]
    pub fn format<F: Float>(&mut self, f: F) -> &str {
        self.format_with(f, Options::default())
    }

    /// Print a floating point number into this buffer using the given
    /// rendering options and return a reference to its string
    /// representation within the buffer.
    ///
    /// # Panics
    ///
    /// Panics if a configured special-value spelling does not fit the
    /// internal buffer (25 bytes, including a sign byte for infinities).
    pub fn format_with<F: Float>(&mut self, f: F, options: Options) -> &str {
        assert!(options.nan.len() <= BUFFER_LEN);
        assert!(options.infinity.len() < BUFFER_LEN);
        unsafe {
            let start = self.bytes.as_mut_ptr().cast::<u8>();
            let end = f.write_to_buffer(start, options);
            let len = end.offset_from(start) as usize;
            str::from_utf8_unchecked(slice::from_raw_parts(start, len))
        }
    }

    /// Print a floating point number into this buffer and return a
    /// reference to its string representation within the buffer.
    ///
    /// # Special cases
    ///
    /// This function **does not** check for NaN or infinity. If the input
    /// number is not a finite float, the printed representation will be
    /// some correctly formatted but unspecified numerical value.
    ///
    /// Please check [`is_finite`] yourself before calling this function, or
    /// check [`is_nan`] and [`is_infinite`] and handle those cases
    /// yourself.
    ///
    /// [`is_finite`]: f64::is_finite
    /// [`is_nan`]: f64::is_nan
    /// [`is_infinite`]: f64::is_infinite
    #[cfg_attr(feature = "no-panic", no_panic)]
    pub fn format_finite<F: Float>(&mut self, f: F) -> &str {
        unsafe {
            let start = self.bytes.as_mut_ptr().cast::<u8>();
            let end = f.write_finite_to_buffer(start, Options::default());
            let len = end.offset_from(start) as usize;
            str::from_utf8_unchecked(slice::from_raw_parts(start, len))
        }
    }
}

impl Default for Buffer {
    #[inline]
    #[cfg_attr(feature = "no-panic", no_panic)]
    fn default() -> Self {
        Buffer::new()
    }
}

/// A floating point number, f32 or f64, that can be written into a
/// [`grisu::Buffer`][Buffer].
///
/// This trait is sealed and cannot be implemented for types outside of the
/// `grisu` crate.
#[allow(unknown_lints)] // rustc older than 1.74
#[allow(private_bounds)]
pub trait Float: private::Sealed {}
impl Float for f32 {}
impl Float for f64 {}

mod private {
    use crate::Options;

    pub trait Sealed: crate::traits::RawFloat {
        unsafe fn write_to_buffer(self, buffer: *mut u8, options: Options) -> *mut u8;
        unsafe fn write_finite_to_buffer(self, buffer: *mut u8, options: Options) -> *mut u8;
    }

    impl Sealed for f32 {
        #[cfg_attr(feature = "no-panic", inline)]
        unsafe fn write_to_buffer(self, buffer: *mut u8, options: Options) -> *mut u8 {
            unsafe { crate::write(self, buffer, options) }
        }

        #[cfg_attr(feature = "no-panic", inline)]
        unsafe fn write_finite_to_buffer(self, buffer: *mut u8, options: Options) -> *mut u8 {
            unsafe { crate::write_finite(self, buffer, options) }
        }
    }

    impl Sealed for f64 {
        #[cfg_attr(feature = "no-panic", inline)]
        unsafe fn write_to_buffer(self, buffer: *mut u8, options: Options) -> *mut u8 {
            unsafe { crate::write(self, buffer, options) }
        }

        #[cfg_attr(feature = "no-panic", inline)]
        unsafe fn write_finite_to_buffer(self, buffer: *mut u8, options: Options) -> *mut u8 {
            unsafe { crate::write_finite(self, buffer, options) }
        }
    }
}
