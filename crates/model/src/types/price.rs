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

//! Represents a price in a market with a fixed decimal precision.

use std::{
    fmt::{Debug, Display, Formatter},
    hash::Hash,
    str::FromStr,
};

use meridian_core::correctness::FAILED;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::fixed::{check_fixed_precision, f64_to_fixed_i64, fixed_i64_to_f64};

/// The raw i64 backing value of a [`Price`].
pub type PriceRaw = i64;

/// Represents a price in a market.
///
/// The number of decimal places may vary. For certain asset classes, prices may
/// have negative values. For example, prices for options instruments can be
/// negative under certain conditions.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price {
    /// The raw price value, scaled at `precision`.
    pub raw: PriceRaw,
    /// The price decimal precision.
    pub precision: u8,
}

impl Price {
    /// Creates a new [`Price`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not finite or `precision` is invalid.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        if !value.is_finite() {
            anyhow::bail!("invalid f64 for 'value', was {value}")
        }
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_i64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Price`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not finite or `precision` is invalid.
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Price`] instance from the given `raw` fixed-point value.
    #[must_use]
    pub fn from_raw(raw: PriceRaw, precision: u8) -> Self {
        Self { raw, precision }
    }

    /// Returns whether the price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns whether the price is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    /// Returns the price value as an `f64` (lossy).
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw, self.precision)
    }

    /// Returns the price value as a `Decimal` at the price precision.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from_i128_with_scale(self.raw as i128, u32::from(self.precision))
    }
}

impl FromStr for Price {
    type Err = anyhow::Error;

    /// Parses a price string, inferring the precision from the decimal places.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .parse()
            .map_err(|e| anyhow::anyhow!("Error parsing `Price` from '{s}': {e}"))?;
        let precision = s.split('.').nth(1).map_or(0, str::len) as u8;
        Self::new_checked(value, precision)
    }
}

impl From<&str> for Price {
    /// Creates a [`Price`] from a string slice, inferring the precision.
    ///
    /// # Panics
    ///
    /// Panics if the `value` string is not valid.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:.*})",
            stringify!(Price),
            self.precision as usize,
            self.as_f64(),
        )
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let price_str = String::deserialize(deserializer)?;
        Self::from_str(&price_str).map_err(serde::de::Error::custom)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_new() {
        let price = Price::new(1.1005, 4);
        assert_eq!(price.raw, 11_005);
        assert_eq!(price.as_f64(), 1.1005);
    }

    #[rstest]
    fn test_from_str_infers_precision() {
        let price = Price::from("1.1005");
        assert_eq!(price.precision, 4);
        assert_eq!(price.raw, 11_005);

        let price = Price::from("100");
        assert_eq!(price.precision, 0);
        assert_eq!(price.raw, 100);
    }

    #[rstest]
    fn test_negative_price() {
        let price = Price::from("-0.25");
        assert_eq!(price.raw, -25);
        assert!(!price.is_positive());
    }

    #[rstest]
    fn test_string_reprs() {
        let price = Price::from("1.1005");
        assert_eq!(price.to_string(), "1.1005");
        assert_eq!(format!("{price:?}"), "Price(1.1005)");
    }

    #[rstest]
    fn test_ordering() {
        assert!(Price::new(1.1005, 4) < Price::new(1.1007, 4));
        assert!(Price::new(1.1005, 4) == Price::from("1.1005"));
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_invalid_precision_panics() {
        let _ = Price::new(1.0, 10);
    }
}
