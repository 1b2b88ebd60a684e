//! Integer range mapping and loop pacing helpers.

/// Number of microseconds in one second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Full-scale value of a raw host input.
pub const RAW_INPUT_MAX: i64 = u16::MAX as i64;

/// Linear integer re-mapping with truncation toward zero.
///
/// `(x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min`.
/// Inverted output bounds give an inverted mapping. A degenerate input
/// range maps everything to `out_min`. Intermediates are 128-bit, so extreme
/// bounds saturate instead of overflowing.
#[inline]
pub fn map_range(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
    let span = in_max - in_min;
    if span == 0 {
        return out_min;
    }
    let mapped = i128::from(x - in_min) * (i128::from(out_max) - i128::from(out_min))
        / i128::from(span)
        + i128::from(out_min);
    i64::try_from(mapped).unwrap_or(if mapped < 0 { i64::MIN } else { i64::MAX })
}

/// Compute the tick period in microseconds for a given rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 microsecond.
#[inline]
pub fn period_us(hz: u32) -> u64 {
    (MICROS_PER_SEC / u64::from(hz.max(1))).max(1)
}
