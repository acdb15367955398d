// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2018-2026 Meridian Markets Pty Ltd. All rights reserved.
//  https://meridianmarkets.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Fixed-point arithmetic helpers for value types scaled by a decimal precision.

use meridian_core::correctness::check_in_range_inclusive_u8;

/// The maximum fixed-point decimal precision.
pub const PRECISION_MAX: u8 = 9;

const POW10: [i64; 10] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// Checks the given `precision` is within the valid fixed-point range.
///
/// # Errors
///
/// Returns an error if `precision` exceeds [`PRECISION_MAX`].
pub fn check_fixed_precision(precision: u8) -> anyhow::Result<()> {
    check_in_range_inclusive_u8(precision, 0, PRECISION_MAX, stringify!(precision))
}

/// Returns the power of ten scalar for the given `precision`.
///
/// # Panics
///
/// Panics if `precision` exceeds [`PRECISION_MAX`].
#[must_use]
pub fn pow10(precision: u8) -> i64 {
    POW10[precision as usize]
}

/// Converts an `f64` value to a raw fixed-point `i64` at the given `precision`.
#[must_use]
pub fn f64_to_fixed_i64(value: f64, precision: u8) -> i64 {
    (value * pow10(precision) as f64).round() as i64
}

/// Converts an `f64` value to a raw fixed-point `u64` at the given `precision`.
#[must_use]
pub fn f64_to_fixed_u64(value: f64, precision: u8) -> u64 {
    (value * pow10(precision) as f64).round() as u64
}

/// Converts a raw fixed-point `i64` back to an `f64` at the given `precision`.
#[must_use]
pub fn fixed_i64_to_f64(raw: i64, precision: u8) -> f64 {
    raw as f64 / pow10(precision) as f64
}

/// Converts a raw fixed-point `u64` back to an `f64` at the given `precision`.
#[must_use]
pub fn fixed_u64_to_f64(raw: u64, precision: u8) -> f64 {
    raw as f64 / pow10(precision) as f64
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 1)]
    #[case(2, 100)]
    #[case(9, 1_000_000_000)]
    fn test_pow10(#[case] precision: u8, #[case] expected: i64) {
        assert_eq!(pow10(precision), expected);
    }

    #[rstest]
    #[case(1.1005, 4, 11_005)]
    #[case(-1.1005, 4, -11_005)]
    #[case(0.0, 2, 0)]
    #[case(100.0, 0, 100)]
    fn test_f64_to_fixed_i64(#[case] value: f64, #[case] precision: u8, #[case] expected: i64) {
        assert_eq!(f64_to_fixed_i64(value, precision), expected);
    }

    #[rstest]
    fn test_round_trip() {
        let raw = f64_to_fixed_i64(1_525_000.25, 2);
        assert_eq!(raw, 152_500_025);
        assert_eq!(fixed_i64_to_f64(raw, 2), 1_525_000.25);
    }

    #[rstest]
    fn test_check_fixed_precision() {
        assert!(check_fixed_precision(9).is_ok());
        assert!(check_fixed_precision(10).is_err());
    }
}
