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

//! Represents a quantity with a non-negative value and fixed decimal precision.

use std::{
    fmt::{Debug, Display, Formatter},
    hash::Hash,
    ops::{Add, Sub},
    str::FromStr,
};

use meridian_core::correctness::{FAILED, check_non_negative_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::fixed::{check_fixed_precision, f64_to_fixed_u64, fixed_u64_to_f64};

/// The raw u64 backing value of a [`Quantity`].
pub type QuantityRaw = u64;

/// Represents a quantity with a non-negative value.
///
/// Capable of storing either a whole number (no decimal places) of 'contracts'
/// or 'shares' (instruments denominated in whole units) or a decimal value
/// containing decimal places for instruments denominated in fractional units.
#[repr(C)]
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity {
    /// The raw quantity value, scaled at `precision`.
    pub raw: QuantityRaw,
    /// The quantity decimal precision.
    pub precision: u8,
}

impl Quantity {
    /// Creates a new [`Quantity`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is negative or `precision` is invalid.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_non_negative_f64(value, stringify!(value))?;
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_u64(value, precision),
            precision,
        })
    }

    /// Creates a new [`Quantity`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative or `precision` is invalid.
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a new [`Quantity`] instance from the given `raw` fixed-point value.
    #[must_use]
    pub fn from_raw(raw: QuantityRaw, precision: u8) -> Self {
        Self { raw, precision }
    }

    /// Creates a new zero-valued [`Quantity`] with the given `precision`.
    #[must_use]
    pub fn zero(precision: u8) -> Self {
        Self { raw: 0, precision }
    }

    /// Returns whether the quantity is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns whether the quantity is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }

    /// Returns the quantity value as an `f64` (lossy).
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_u64_to_f64(self.raw, self.precision)
    }

    /// Returns the quantity value as a `Decimal` at the quantity precision.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from_i128_with_scale(self.raw as i128, u32::from(self.precision))
    }
}

impl FromStr for Quantity {
    type Err = anyhow::Error;

    /// Parses a quantity string, inferring the precision from the decimal places.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .parse()
            .map_err(|e| anyhow::anyhow!("Error parsing `Quantity` from '{s}': {e}"))?;
        let precision = s.split('.').nth(1).map_or(0, str::len) as u8;
        Self::new_checked(value, precision)
    }
}

impl From<&str> for Quantity {
    /// Creates a [`Quantity`] from a string slice, inferring the precision.
    ///
    /// # Panics
    ///
    /// Panics if the `value` string is not valid.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_add(rhs.raw)
                .expect("Overflow occurred when adding `Quantity`"),
            precision: self.precision,
        }
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Quantity`"),
            precision: self.precision,
        }
    }
}

impl Debug for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:.*})",
            stringify!(Quantity),
            self.precision as usize,
            self.as_f64(),
        )
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let quantity_str = String::deserialize(deserializer)?;
        Self::from_str(&quantity_str).map_err(serde::de::Error::custom)
    }
}
