use grisu::{Buffer, Options};
use rand::{RngCore, SeedableRng};
use rand_xorshift::XorShiftRng;

fn fmt64(value: f64) -> String {
    Buffer::new().format(value).to_owned()
}

fn fmt32(value: f32) -> String {
    Buffer::new().format(value).to_owned()
}

fn fmt64_with(value: f64, options: Options) -> String {
    Buffer::new().format_with(value, options).to_owned()
}

#[track_caller]
fn round_trip_f64(value: f64) {
    let s = fmt64(value);
    let parsed: f64 = s.parse().unwrap();
    assert_eq!(parsed.to_bits(), value.to_bits(), "{value:?} -> {s}");
}

#[track_caller]
fn round_trip_f32(value: f32) {
    let s = fmt32(value);
    let parsed: f32 = s.parse().unwrap();
    assert_eq!(parsed.to_bits(), value.to_bits(), "{value:?} -> {s}");
}

// Splits a formatted positive number into its significant digits and the
// position of the decimal point, so that value = 0.digits * 10^point.
fn digits_and_point(s: &str) -> (String, i32) {
    let (mantissa, exp) = match s.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap()),
        None => (s, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    let all: String = int_part.chars().chain(frac_part.chars()).collect();
    let mut point = int_part.len() as i32 + exp;

    let leading = all.len() - all.trim_start_matches('0').len();
    point -= leading as i32;
    let digits = all[leading..].trim_end_matches('0');
    (digits.to_owned(), point)
}

// No digit string one shorter than the output may parse back to the same
// value: neither the truncation nor the truncation rounded up.
//
// This holds for the values tested below but is not universal: the digit
// generator finds the shortest form inside a slightly tightened rounding
// interval, so for a thin sliver of inputs a shorter form exists just
// outside it.
#[track_caller]
fn assert_shortest(s: &str, value: f64) {
    let (digits, point) = digits_and_point(s.trim_start_matches('-'));
    assert!(digits.len() <= 17, "{s}");
    if digits.len() < 2 {
        return;
    }

    let head: u64 = digits[..digits.len() - 1].parse().unwrap();
    let scale = point - (digits.len() as i32 - 1);
    for candidate in [head, head + 1] {
        if candidate.to_string().len() > digits.len() - 1 {
            // The carry gained a digit back; not a shorter form.
            continue;
        }
        let shorter: f64 = format!("{candidate}e{scale}").parse().unwrap();
        assert_ne!(shorter, value.abs(), "{s} has a shorter form {candidate}e{scale}");
    }
}

#[test]
fn literal_scenarios() {
    assert_eq!(fmt64(1.0), "1");
    assert_eq!(fmt64(1.5), "1.5");
    assert_eq!(fmt64(0.1), "0.1");
    assert_eq!(fmt64(0.3 - 0.2), "0.09999999999999998");
    assert_eq!(fmt64(1.7976931348623157e308), "1.7976931348623157e+308");
    assert_eq!(fmt64(5e-324), "5e-324");
    assert_eq!(fmt64(-0.0), "-0");
    assert_eq!(fmt64(1e21), "1e+21");
    assert_eq!(fmt64(1e20), "1e+20");
    assert_eq!(fmt64(100.0), "100");
    assert_eq!(fmt64(0.25), "0.25");
    assert_eq!(fmt64(1234.5678), "1234.5678");
    assert_eq!(fmt64(1.0 / 3.0), "0.3333333333333333");
    assert_eq!(fmt64(3.141592653589793), "3.141592653589793");
    assert_eq!(fmt64(123456789.0), "123456789");
    assert_eq!(fmt64(4294967295.0), "4294967295");
    assert_eq!(fmt64(6.02214076e23), "6.02214076e+23");
    assert_eq!(fmt64(1.23e-290), "1.23e-290");
    assert_eq!(fmt64(2.2250738585072014e-308), "2.2250738585072014e-308");
}

#[test]
fn literal_scenarios_f32() {
    assert_eq!(fmt32(1.0), "1");
    assert_eq!(fmt32(1.5), "1.5");
    assert_eq!(fmt32(0.1), "0.1");
    assert_eq!(fmt32(0.3), "0.3");
    assert_eq!(fmt32(f32::MAX), "3.4028235e+38");
    assert_eq!(fmt32(1e-45), "1e-45");
    assert_eq!(fmt32(1.1754944e-38), "1.1754944e-38");
    assert_eq!(fmt32(1e10), "1e+10");
}

#[test]
fn format_choice_boundaries() {
    // Positional notation reaches down to a decimal point at -5 and up to
    // the largest exactly representable integer of the type.
    assert_eq!(fmt64(0.000001), "0.000001");
    assert_eq!(fmt64(1e-7), "1e-7");
    assert_eq!(fmt64(0.00001), "0.00001");
    assert_eq!(fmt64(9007199254740992.0), "9007199254740992");
    assert_eq!(fmt64(9007199254740994.0), "9.007199254740994e+15");
    assert_eq!(fmt64(1e15), "1000000000000000");
    assert_eq!(fmt64(1e16), "1e+16");

    assert_eq!(fmt32(16777216.0), "16777216");
    assert_eq!(fmt32(33554432.0), "3.3554432e+7");
}

#[test]
fn trailing_dot_zero() {
    let options = Options {
        trailing_dot_zero: true,
        ..Options::default()
    };
    assert_eq!(fmt64_with(1.0, options), "1.0");
    assert_eq!(fmt64_with(-0.0, options), "-0.0");
    assert_eq!(fmt64_with(0.0, options), "0.0");
    assert_eq!(fmt64_with(100.0, options), "100.0");
    // Only integral positional output is affected.
    assert_eq!(fmt64_with(1.5, options), "1.5");
    assert_eq!(fmt64_with(0.1, options), "0.1");
    assert_eq!(fmt64_with(1e21, options), "1e+21");
}

#[test]
fn special_values() {
    assert_eq!(fmt64(f64::NAN), "NaN");
    assert_eq!(fmt64(-f64::NAN), "NaN");
    assert_eq!(fmt64(f64::INFINITY), "Infinity");
    assert_eq!(fmt64(f64::NEG_INFINITY), "-Infinity");
    assert_eq!(fmt64(0.0), "0");
    assert_eq!(fmt64(-0.0), "-0");
    assert_eq!(fmt32(f32::NAN), "NaN");
    assert_eq!(fmt32(f32::NEG_INFINITY), "-Infinity");
}

#[test]
fn configurable_spellings() {
    let options = Options {
        nan: "nan",
        infinity: "inf",
        ..Options::default()
    };
    assert_eq!(fmt64_with(f64::NAN, options), "nan");
    assert_eq!(fmt64_with(f64::INFINITY, options), "inf");
    assert_eq!(fmt64_with(f64::NEG_INFINITY, options), "-inf");
    // Finite formatting is unaffected.
    assert_eq!(fmt64_with(1.5, options), "1.5");
}

#[test]
fn negative_mirrors_positive() {
    for value in [1.0, 1.5, 0.1, 5e-324, 1e21, 123456789.0, f64::MAX] {
        let positive = fmt64(value);
        let negative = fmt64(-value);
        assert_eq!(negative, format!("-{positive}"));
    }
}

#[test]
fn shortest_form_of_known_values() {
    for value in [
        1.5,
        0.1,
        0.3 - 0.2,
        0.25,
        1.0 / 3.0,
        3.141592653589793,
        1234.5678,
        123456789.0,
        4294967295.0,
        6.02214076e23,
        1.23e-290,
        1.7976931348623157e308,
        2.2250738585072014e-308,
        2.2250738585072009e-308,
        9007199254740991.0,
        0.000001,
        1e-7,
    ] {
        assert_shortest(&fmt64(value), value);
    }
}

#[test]
fn round_trip_powers_of_two() {
    let mut value = 1.0f64;
    loop {
        value *= 2.0;
        if value.is_infinite() {
            break;
        }
        round_trip_f64(value);
        assert_shortest(&fmt64(value), value);
    }

    let mut value = 1.0f64;
    loop {
        value *= 0.5;
        if value == 0.0 {
            break;
        }
        round_trip_f64(value);
        assert_shortest(&fmt64(value), value);
    }

    let mut value = 1.0f32;
    loop {
        value *= 2.0;
        if value.is_infinite() {
            break;
        }
        round_trip_f32(value);
    }

    let mut value = 1.0f32;
    loop {
        value *= 0.5;
        if value == 0.0 {
            break;
        }
        round_trip_f32(value);
    }
}

#[test]
fn round_trip_boundary_values() {
    for value in [
        f64::MAX,
        f64::MIN_POSITIVE,
        5e-324,
        2.2250738585072009e-308, // largest denormal
        9007199254740991.0,      // 2^53 - 1
        9007199254740993.0,      // 2^53 + 1, rounds to 2^53
        0.3 - 0.2,
        2.0f64.powi(52),
        2.0f64.powi(53) - 1.0,
    ] {
        round_trip_f64(value);
    }

    for value in [
        f32::MAX,
        f32::MIN_POSITIVE,
        1e-45f32,
        7.0385307e-26f32,
        16777215.0f32,
    ] {
        round_trip_f32(value);
    }
}

#[test]
fn round_trip_random_f64() {
    let mut rng = XorShiftRng::seed_from_u64(0x5eed);
    let mut checked = 0;
    while checked < 100_000 {
        let bits = rng.next_u64();
        let value = f64::from_bits(bits);
        if !value.is_finite() || value == 0.0 {
            continue;
        }
        round_trip_f64(value);
        checked += 1;
    }
}

#[test]
fn round_trip_random_f32() {
    let mut rng = XorShiftRng::seed_from_u64(0x5eed);
    let mut checked = 0;
    while checked < 100_000 {
        let bits = rng.next_u32();
        let value = f32::from_bits(bits);
        if !value.is_finite() || value == 0.0 {
            continue;
        }
        round_trip_f32(value);
        checked += 1;
    }
}

#[test]
fn round_trip_f32_exponent_sweep() {
    // Every exponent with the extreme fraction fields.
    for exp in 0u32..255 {
        for frac in [0, 1, (1 << 23) - 1] {
            let bits = (exp << 23) | frac;
            let value = f32::from_bits(bits);
            if !value.is_finite() || value == 0.0 {
                continue;
            }
            round_trip_f32(value);
        }
    }
}

#[test]
fn idempotent_through_parse() {
    let mut rng = XorShiftRng::seed_from_u64(0xfeed);
    let mut checked = 0;
    while checked < 10_000 {
        let value = f64::from_bits(rng.next_u64());
        if !value.is_finite() || value == 0.0 {
            continue;
        }
        let first = fmt64(value);
        let reparsed: f64 = first.parse().unwrap();
        assert_eq!(fmt64(reparsed), first);
        checked += 1;
    }
}

#[test]
fn format_finite_matches_format_for_finite_values() {
    let mut buffer = Buffer::new();
    for value in [1.0, -1.5, 0.0, -0.0, 5e-324, 1e21] {
        let finite = buffer.format_finite(value).to_owned();
        assert_eq!(finite, fmt64(value));
    }
}
