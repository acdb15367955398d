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

//! Functions for condition checks similar to the *design by contract* philosophy
//! to help ensure logical correctness.
//!
//! This module provides validation checking of function or method conditions.
//!
//! A condition is a predicate which must be true just prior to the execution of
//! some section of code, for correct behavior as per the design specification.

use std::{collections::HashMap, fmt::Debug, fmt::Display};

/// A message prefix that can be used with calls to `expect` or other assertion-related functions.
pub const FAILED: &str = "Condition failed";

/// Checks the `predicate` is true.
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_predicate_true(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if !predicate {
        anyhow::bail!("{fail_msg}")
    }
    Ok(())
}

/// Checks the `predicate` is false.
///
/// # Errors
///
/// Returns an error if the validation check fails.
#[inline(always)]
pub fn check_predicate_false(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if predicate {
        anyhow::bail!("{fail_msg}")
    }
    Ok(())
}

/// Checks the string `s` has semantic meaning and contains only ASCII characters.
///
/// # Errors
///
/// Returns an error if:
/// - The string is empty or all whitespace.
/// - The string contains non-ASCII characters.
pub fn check_valid_string<T: AsRef<str>>(s: T, param: &str) -> anyhow::Result<()> {
    let s = s.as_ref();
    if s.trim().is_empty() {
        anyhow::bail!("invalid string for '{param}', was empty")
    }
    if !s.is_ascii() {
        anyhow::bail!("invalid string for '{param}' contained non-ASCII chars, was '{s}'")
    }
    Ok(())
}

/// Checks the string `s` contains the pattern `pat`.
///
/// # Errors
///
/// Returns an error if the validation check fails.
pub fn check_string_contains<T: AsRef<str>>(s: T, pat: &str, param: &str) -> anyhow::Result<()> {
    let s = s.as_ref();
    if !s.contains(pat) {
        anyhow::bail!("invalid string for '{param}' did not contain '{pat}', was '{s}'")
    }
    Ok(())
}

/// Checks the values are equal.
///
/// # Errors
///
/// Returns an error if the validation check fails.
pub fn check_equal<T: PartialEq + Debug + Display>(
    lhs: &T,
    rhs: &T,
    lhs_param: &str,
    rhs_param: &str,
) -> anyhow::Result<()> {
    if lhs != rhs {
        anyhow::bail!("'{lhs_param}' value of {lhs} was not equal to '{rhs_param}' value of {rhs}")
    }
    Ok(())
}

/// Checks the `u8` values are equal.
///
/// # Errors
///
/// Returns an error if the validation check fails.
pub fn check_equal_u8(lhs: u8, rhs: u8, lhs_param: &str, rhs_param: &str) -> anyhow::Result<()> {
    if lhs != rhs {
        anyhow::bail!("'{lhs_param}' u8 of {lhs} was not equal to '{rhs_param}' u8 of {rhs}")
    }
    Ok(())
}

/// Checks the `usize` values are equal.
///
/// # Errors
///
/// Returns an error if the validation check fails.
pub fn check_equal_usize(
    lhs: usize,
    rhs: usize,
    lhs_param: &str,
    rhs_param: &str,
) -> anyhow::Result<()> {
    if lhs != rhs {
        anyhow::bail!("'{lhs_param}' usize of {lhs} was not equal to '{rhs_param}' usize of {rhs}")
    }
    Ok(())
}

/// Checks the `value` is positive (> 0).
///
/// # Errors
///
/// Returns an error if the validation check fails.
pub fn check_positive_i64(value: i64, param: &str) -> anyhow::Result<()> {
    if value <= 0 {
        anyhow::bail!("invalid i64 for '{param}' not positive, was {value}")
    }
    Ok(())
}

/// Checks the `value` is non-negative (>= 0).
///
/// # Errors
///
/// Returns an error if the validation check fails.
pub fn check_non_negative_f64(value: f64, param: &str) -> anyhow::Result<()> {
    if value.is_nan() || value.is_infinite() {
        anyhow::bail!("invalid f64 for '{param}', was {value}")
    }
    if value < 0.0 {
        anyhow::bail!("invalid f64 for '{param}' negative, was {value}")
    }
    Ok(())
}

/// Checks the `value` is in range [`l`, `r`] (inclusive).
///
/// # Errors
///
/// Returns an error if the validation check fails.
pub fn check_in_range_inclusive_u8(value: u8, l: u8, r: u8, param: &str) -> anyhow::Result<()> {
    if value < l || value > r {
        anyhow::bail!("invalid u8 for '{param}' not in range [{l}, {r}], was {value}")
    }
    Ok(())
}

/// Checks the map is **not** empty.
///
/// # Errors
///
/// Returns an error if the validation check fails.
pub fn check_map_not_empty<K, V>(map: &HashMap<K, V>, param: &str) -> anyhow::Result<()> {
    if map.is_empty() {
        anyhow::bail!("the '{param}' map `&<K, V>` was empty")
    }
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(true)]
    fn test_check_predicate_true_ok(#[case] predicate: bool) {
        assert!(check_predicate_true(predicate, "the predicate was false").is_ok());
    }

    #[rstest]
    fn test_check_predicate_true_err() {
        assert!(check_predicate_true(false, "the predicate was false").is_err());
    }

    #[rstest]
    #[case("a")]
    #[case("a ")]
    #[case("abc123")]
    fn test_check_valid_string_ok(#[case] s: &str) {
        assert!(check_valid_string(s, "value").is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case("abc\u{1F600}")]
    fn test_check_valid_string_err(#[case] s: &str) {
        assert!(check_valid_string(s, "value").is_err());
    }

    #[rstest]
    fn test_check_string_contains() {
        assert!(check_string_contains("SIM-001", "-", "value").is_ok());
        assert!(check_string_contains("SIM001", "-", "value").is_err());
    }

    #[rstest]
    fn test_check_equal_u8() {
        assert!(check_equal_u8(2, 2, "lhs", "rhs").is_ok());
        assert!(check_equal_u8(2, 5, "lhs", "rhs").is_err());
    }

    #[rstest]
    fn test_check_in_range_inclusive_u8() {
        assert!(check_in_range_inclusive_u8(0, 0, 9, "precision").is_ok());
        assert!(check_in_range_inclusive_u8(9, 0, 9, "precision").is_ok());
        assert!(check_in_range_inclusive_u8(10, 0, 9, "precision").is_err());
    }

    #[rstest]
    fn test_check_map_not_empty() {
        let mut map = HashMap::new();
        assert!(check_map_not_empty(&map, "map").is_err());
        map.insert("k", "v");
        assert!(check_map_not_empty(&map, "map").is_ok());
    }
}
