//! 80-bit IEEE 754 extended precision values, as stored in the AIFF `COMM`
//! chunk sample rate field.
//!
//! Layout (big-endian, 10 bytes): 1 sign bit, 15-bit exponent biased by
//! 16383, then a 64-bit mantissa whose top bit is the explicit integer bit.
//!
//! [`Extended80`] keeps the raw bytes, so a value read from a file can be
//! written back without disturbing a single bit. Conversion to and from
//! `f64` is exact for every finite `f64`, which covers every integer rate
//! up to `u32::MAX`.

use crate::prelude::*;

pub const EXTENDED_LEN: usize = 10;

const EXPONENT_BIAS: i32 = 16383;
const EXPONENT_MAX: u16 = 0x7FFF;
const SIGN_BIT: u16 = 0x8000;
const INTEGER_BIT: u64 = 1 << 63;

const F64_EXPONENT_BIAS: i32 = 1023;
const F64_FRACTION_BITS: u32 = 52;
const F64_FRACTION_MASK: u64 = (1 << F64_FRACTION_BITS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extended80([u8; EXTENDED_LEN]);

impl Extended80 {
    pub const ZERO: Extended80 = Extended80([0; EXTENDED_LEN]);

    pub fn from_bytes(bytes: [u8; EXTENDED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; EXTENDED_LEN] {
        self.0
    }

    pub fn read_from<Rd: Read>(reader: &mut Rd) -> std::io::Result<Self> {
        let mut bytes = [0u8; EXTENDED_LEN];
        reader.read_exact(&mut bytes)?;
        Ok(Self(bytes))
    }

    fn from_parts(negative: bool, exponent: u16, mantissa: u64) -> Self {
        let mut bytes = [0u8; EXTENDED_LEN];
        let sign = if negative { SIGN_BIT } else { 0 };
        BigEndian::write_u16(&mut bytes[0..2], sign | (exponent & EXPONENT_MAX));
        BigEndian::write_u64(&mut bytes[2..10], mantissa);
        Self(bytes)
    }

    pub fn is_negative(&self) -> bool {
        BigEndian::read_u16(&self.0[0..2]) & SIGN_BIT != 0
    }

    /// Biased exponent, 0..=0x7FFF.
    pub fn exponent(&self) -> u16 {
        BigEndian::read_u16(&self.0[0..2]) & EXPONENT_MAX
    }

    pub fn mantissa(&self) -> u64 {
        BigEndian::read_u64(&self.0[2..10])
    }

    /// Best-effort numeric value. Values outside the `f64` range saturate to
    /// infinity or zero; the all-ones exponent decodes to infinity or NaN.
    pub fn to_f64(&self) -> f64 {
        let exponent = self.exponent();
        let mantissa = self.mantissa();

        let magnitude = if exponent == EXPONENT_MAX {
            if mantissa & !INTEGER_BIT == 0 {
                f64::INFINITY
            } else {
                f64::NAN
            }
        } else if mantissa == 0 {
            // Pseudo-zeros: any exponent with an empty mantissa.
            0.0
        } else {
            // value = mantissa / 2^63 * 2^(exponent - bias)
            let scale = exponent as i32 - EXPONENT_BIAS - 63;
            // Split the scale so neither factor overflows before the product does.
            let half = scale / 2;
            mantissa as f64 * 2.0_f64.powi(half) * 2.0_f64.powi(scale - half)
        };

        if self.is_negative() { -magnitude } else { magnitude }
    }

    /// Exact conversion from `f64`. NaN and infinities map to their
    /// extended counterparts.
    pub fn from_f64(value: f64) -> Self {
        let bits = value.to_bits();
        let negative = value.is_sign_negative();
        let raw_exponent = ((bits >> F64_FRACTION_BITS) & 0x7FF) as i32;
        let fraction = bits & F64_FRACTION_MASK;

        if value.is_nan() {
            return Self::from_parts(negative, EXPONENT_MAX, INTEGER_BIT | (1 << 62));
        }
        if value.is_infinite() {
            return Self::from_parts(negative, EXPONENT_MAX, INTEGER_BIT);
        }
        if value == 0.0 {
            return Self::from_parts(negative, 0, 0);
        }

        let (unbiased, mantissa) = if raw_exponent == 0 {
            // Subnormal f64: normalize so the integer bit is set.
            let shift = fraction.leading_zeros();
            let exponent = -F64_EXPONENT_BIAS + 1 - (shift as i32 - 11);
            (exponent, fraction << shift)
        } else {
            (
                raw_exponent - F64_EXPONENT_BIAS,
                INTEGER_BIT | (fraction << (63 - F64_FRACTION_BITS)),
            )
        };

        Self::from_parts(negative, (unbiased + EXPONENT_BIAS) as u16, mantissa)
    }

    /// True when the value has no fractional part.
    pub fn is_integral(&self) -> bool {
        let value = self.to_f64();
        value.is_finite() && value.fract() == 0.0
    }
}

impl From<u32> for Extended80 {
    fn from(rate: u32) -> Self {
        if rate == 0 {
            return Self::ZERO;
        }
        let leading = rate.leading_zeros();
        let exponent = EXPONENT_BIAS as u16 + (31 - leading) as u16;
        let mantissa = (rate as u64) << (32 + leading);
        Self::from_parts(false, exponent, mantissa)
    }
}

impl std::fmt::Display for Extended80 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_common_rates_match_known_encodings() {
        let known: [(u32, [u8; 10]); 4] = [
            (44100, [0x40, 0x0E, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]),
            (48000, [0x40, 0x0E, 0xBB, 0x80, 0, 0, 0, 0, 0, 0]),
            (88200, [0x40, 0x0F, 0xAC, 0x44, 0, 0, 0, 0, 0, 0]),
            (96000, [0x40, 0x0F, 0xBB, 0x80, 0, 0, 0, 0, 0, 0]),
        ];
        for (rate, bytes) in known {
            assert_eq!(Extended80::from(rate).to_bytes(), bytes, "encoding {rate}");
            assert_eq!(Extended80::from_bytes(bytes).to_f64(), rate as f64);
        }
    }

    #[test]
    fn test_zero() {
        assert_eq!(Extended80::from(0).to_bytes(), [0; 10]);
        assert_eq!(Extended80::ZERO.to_f64(), 0.0);
        assert_eq!(Extended80::from_f64(0.0), Extended80::ZERO);
    }

    #[test]
    fn test_one_and_max_u32() {
        let one = Extended80::from(1);
        assert_eq!(one.exponent(), 16383);
        assert_eq!(one.mantissa(), 1 << 63);
        assert_eq!(one.to_f64(), 1.0);

        let max = Extended80::from(u32::MAX);
        assert_eq!(max.to_f64(), u32::MAX as f64);
    }

    #[test]
    fn test_negative_and_fractional() {
        let value = Extended80::from_f64(-22050.5);
        assert!(value.is_negative());
        assert_eq!(value.to_f64(), -22050.5);
        assert!(!value.is_integral());
        assert!(Extended80::from(22050).is_integral());
    }

    #[test]
    fn test_unnormalized_mantissa_decodes() {
        // 44100 with the integer bit cleared and the exponent bumped by one.
        let value = Extended80::from_parts(false, 16399, 0xAC44 << 47);
        assert_eq!(value.to_f64(), 44100.0);
    }

    #[test]
    fn test_special_values_do_not_panic() {
        let inf = Extended80::from_parts(false, EXPONENT_MAX, INTEGER_BIT);
        assert_eq!(inf.to_f64(), f64::INFINITY);
        let nan = Extended80::from_parts(true, EXPONENT_MAX, INTEGER_BIT | 1);
        assert!(nan.to_f64().is_nan());
        let huge = Extended80::from_parts(false, 0x7FFE, u64::MAX);
        assert_eq!(huge.to_f64(), f64::INFINITY);
        let pseudo_zero = Extended80::from_bytes([0x7F, 0xFE, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(pseudo_zero.to_f64(), 0.0);
        assert!(pseudo_zero.is_integral());
        let low_pseudo_zero = Extended80::from_bytes([0x40, 0x0E, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(low_pseudo_zero.to_f64(), 0.0);
        let denormal = Extended80::from_parts(false, 0, 1);
        assert_eq!(denormal.to_f64(), 0.0);
        assert!(Extended80::from_f64(f64::NAN).to_f64().is_nan());
        assert_eq!(
            Extended80::from_f64(f64::NEG_INFINITY).to_f64(),
            f64::NEG_INFINITY
        );
    }

    #[test]
    fn test_subnormal_f64_round_trips() {
        let tiny = f64::from_bits(1);
        assert_eq!(Extended80::from_f64(tiny).to_f64(), tiny);
    }

    proptest! {
        #[test]
        fn integer_rates_round_trip_bit_for_bit(rate in 1u32..=u32::MAX) {
            let encoded = Extended80::from(rate);
            let decoded = encoded.to_f64();
            prop_assert_eq!(decoded, rate as f64);
            prop_assert_eq!(Extended80::from_f64(decoded), encoded);
            prop_assert_eq!(Extended80::from_bytes(encoded.to_bytes()), encoded);
        }

        #[test]
        fn finite_f64_round_trips(value in proptest::num::f64::NORMAL | proptest::num::f64::SUBNORMAL) {
            prop_assert_eq!(Extended80::from_f64(value).to_f64(), value);
        }
    }
}
