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

//! Represents an amount of money in a specified currency denomination.

use std::{
    fmt::{Debug, Display, Formatter},
    hash::Hash,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use meridian_core::correctness::FAILED;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{
    Currency,
    fixed::{f64_to_fixed_i64, fixed_i64_to_f64},
};

/// The raw i64 backing value of a [`Money`] amount.
pub type MoneyRaw = i64;

/// Represents an amount of money in a specified currency denomination.
///
/// The raw value is scaled at the currency's own decimal precision; arithmetic
/// is only defined between amounts sharing the same currency. Conversion
/// between currencies requires an explicit exchange-rate step.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Money {
    /// The raw monetary amount, scaled at the currency's decimal precision.
    pub raw: MoneyRaw,
    /// The currency denomination associated with the monetary amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is not a finite number.
    pub fn new_checked(amount: f64, currency: Currency) -> anyhow::Result<Self> {
        if !amount.is_finite() {
            anyhow::bail!("invalid f64 for 'amount', was {amount}")
        }
        Ok(Self {
            raw: f64_to_fixed_i64(amount, currency.precision),
            currency,
        })
    }

    /// Creates a new [`Money`] instance.
    ///
    /// The amount is quantized to the currency's decimal precision.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not a finite number.
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self::new_checked(amount, currency).expect(FAILED)
    }

    /// Creates a new [`Money`] instance from the given `raw` fixed-point value.
    #[must_use]
    pub fn from_raw(raw: MoneyRaw, currency: Currency) -> Self {
        Self { raw, currency }
    }

    /// Creates a new zero-valued [`Money`] instance in the given `currency`.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self { raw: 0, currency }
    }

    /// Returns whether the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    /// Returns the amount as an `f64` (lossy).
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw, self.currency.precision)
    }

    /// Returns the amount as a `Decimal` at the currency's precision.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from_i128_with_scale(self.raw as i128, u32::from(self.currency.precision))
    }
}

impl FromStr for Money {
    type Err = anyhow::Error;

    /// Parses a money string such as `"100.50 USD"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount_part, code_part) = s
            .rsplit_once(' ')
            .ok_or_else(|| anyhow::anyhow!("invalid `Money` string '{s}', expected '<amount> <code>'"))?;
        let amount: f64 = amount_part
            .replace('_', "")
            .parse()
            .map_err(|e| anyhow::anyhow!("Error parsing `Money` amount from '{s}': {e}"))?;
        let currency = Currency::from_str(code_part)?;
        Self::new_checked(amount, currency)
    }
}

impl From<&str> for Money {
    /// Creates a [`Money`] from a string such as `"100.50 USD"`.
    ///
    /// # Panics
    ///
    /// Panics if the `value` string is not valid.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            raw: -self.raw,
            currency: self.currency,
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        assert_eq!(
            self.currency, rhs.currency,
            "Cannot add monies with different currencies: {} + {}",
            self.currency, rhs.currency,
        );
        Self {
            raw: self
                .raw
                .checked_add(rhs.raw)
                .expect("Overflow occurred when adding `Money`"),
            currency: self.currency,
        }
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert_eq!(
            self.currency, rhs.currency,
            "Cannot subtract monies with different currencies: {} - {}",
            self.currency, rhs.currency,
        );
        Self {
            raw: self
                .raw
                .checked_sub(rhs.raw)
                .expect("Underflow occurred when subtracting `Money`"),
            currency: self.currency,
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        assert_eq!(
            self.currency, other.currency,
            "Cannot compare monies with different currencies: {} vs {}",
            self.currency, other.currency,
        );
        self.raw.partial_cmp(&other.raw)
    }
}

impl Debug for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:.*} {})",
            stringify!(Money),
            self.currency.precision as usize,
            self.as_f64(),
            self.currency,
        )
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.*} {}",
            self.currency.precision as usize,
            self.as_f64(),
            self.currency,
        )
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let money_str = String::deserialize(deserializer)?;
        Self::from_str(&money_str).map_err(serde::de::Error::custom)
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
    fn test_new_quantizes_to_currency_precision() {
        let money = Money::new(1.234567, Currency::USD());
        assert_eq!(money.raw, 123);
        assert_eq!(money.as_f64(), 1.23);
    }

    #[rstest]
    fn test_from_raw() {
        let money = Money::from_raw(1_000_00, Currency::USD());
        assert_eq!(money.as_f64(), 1_000.0);
        assert_eq!(money, Money::new(1_000.0, Currency::USD()));
    }

    #[rstest]
    fn test_zero_precision_currency() {
        let money = Money::new(1_000.4, Currency::JPY());
        assert_eq!(money.raw, 1_000);
        assert_eq!(money.to_string(), "1000 JPY");
    }

    #[rstest]
    fn test_add_sub_same_currency() {
        let a = Money::new(100.50, Currency::USD());
        let b = Money::new(0.50, Currency::USD());
        assert_eq!(a + b, Money::new(101.0, Currency::USD()));
        assert_eq!(a - b, Money::new(100.0, Currency::USD()));
    }

    #[rstest]
    #[should_panic(expected = "Cannot add monies with different currencies")]
    fn test_add_different_currency_panics() {
        let _ = Money::new(1.0, Currency::USD()) + Money::new(1.0, Currency::EUR());
    }

    #[rstest]
    #[should_panic(expected = "Cannot subtract monies with different currencies")]
    fn test_sub_different_currency_panics() {
        let _ = Money::new(1.0, Currency::USD()) - Money::new(1.0, Currency::EUR());
    }

    #[rstest]
    fn test_neg() {
        let money = -Money::new(10.0, Currency::USD());
        assert_eq!(money.as_f64(), -10.0);
    }

    #[rstest]
    fn test_equality_includes_currency() {
        assert_eq!(
            Money::new(1.0, Currency::USD()),
            Money::new(1.0, Currency::USD())
        );
        assert_ne!(
            Money::new(1.0, Currency::USD()),
            Money::new(1.0, Currency::EUR())
        );
    }

    #[rstest]
    fn test_display() {
        let money = Money::new(1525000.00, Currency::USD());
        assert_eq!(money.to_string(), "1525000.00 USD");
    }

    #[rstest]
    fn test_from_str() {
        let money = Money::from("100.50 USD");
        assert_eq!(money, Money::new(100.50, Currency::USD()));
        assert!(Money::from_str("100.50").is_err());
        assert!(Money::from_str("100.50 ZZZ").is_err());
    }

    #[rstest]
    fn test_as_decimal() {
        let money = Money::new(100.55, Currency::USD());
        assert_eq!(money.as_decimal().to_string(), "100.55");
    }

    #[rstest]
    fn test_serde_round_trip() {
        let money = Money::new(42.42, Currency::AUD());
        let json = serde_json::to_string(&money).unwrap();
        assert_eq!(json, "\"42.42 AUD\"");
        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(money, deserialized);
    }
}
