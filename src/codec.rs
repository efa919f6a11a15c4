//! Q12.4 fixed-point temperature codec.
//!
//! A sample is a signed 16-bit integer counting sixteenths of a degree
//! Celsius (LSB = 0.0625 °C), the same resolution the 12-bit sensor
//! delivers. Two bytes per sample, big-endian on the wire.

const SCALE: f32 = 16.0;

/// Encodes a temperature as Q12.4.
///
/// The cast truncates toward zero rather than rounding to nearest. The
/// quantization error distribution depends on this, and the round-trip
/// tolerances in the test suite are calibrated against truncation.
pub fn encode(celsius: f32) -> i16 {
    (celsius * SCALE) as i16
}

/// Decodes a Q12.4 sample back to degrees Celsius.
///
/// Exact inverse of [`encode`] only up to the truncation step: the round
/// trip stays within 1/16 of the original value, not bit-exact.
pub fn decode(encoded: i16) -> f32 {
    encoded as f32 / SCALE
}
