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

//! Represents a medium of exchange in a specified denomination with a fixed decimal precision.

use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use meridian_core::correctness::{FAILED, check_valid_string};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ustr::Ustr;

use crate::{currencies::CURRENCY_MAP, enums::CurrencyType, types::fixed::check_fixed_precision};

/// Represents a medium of exchange in a specified denomination with a fixed decimal precision.
///
/// Handles up to 9 decimals of precision.
#[repr(C)]
#[derive(Clone, Copy, Eq)]
pub struct Currency {
    /// The currency code as an alpha-3 string (e.g. "USD", "EUR").
    pub code: Ustr,
    /// The currency decimal precision.
    pub precision: u8,
    /// The ISO 4217 currency code.
    pub iso4217: u16,
    /// The full name of the currency.
    pub name: Ustr,
    /// The currency type, indicating its category (e.g. Fiat, Crypto).
    pub currency_type: CurrencyType,
}

impl Currency {
    /// Creates a new [`Currency`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// Returns an error if a correctness check fails.
    pub fn new_checked<T: AsRef<str>>(
        code: T,
        precision: u8,
        iso4217: u16,
        name: T,
        currency_type: CurrencyType,
    ) -> anyhow::Result<Self> {
        let code = code.as_ref();
        let name = name.as_ref();
        check_valid_string(code, stringify!(code))?;
        check_valid_string(name, stringify!(name))?;
        check_fixed_precision(precision)?;

        Ok(Self {
            code: Ustr::from(code),
            precision,
            iso4217,
            name: Ustr::from(name),
            currency_type,
        })
    }

    /// Creates a new [`Currency`] instance.
    ///
    /// # Panics
    ///
    /// Panics if a correctness check fails.
    pub fn new<T: AsRef<str>>(
        code: T,
        precision: u8,
        iso4217: u16,
        name: T,
        currency_type: CurrencyType,
    ) -> Self {
        Self::new_checked(code, precision, iso4217, name, currency_type).expect(FAILED)
    }

    /// Registers the given `currency` in the internal currency map, allowing it
    /// to be resolved with [`Currency::from_str`].
    ///
    /// Will not overwrite an existing currency unless `overwrite` is true.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock on the currency map fails.
    pub fn register(currency: Self, overwrite: bool) -> anyhow::Result<()> {
        let mut map = CURRENCY_MAP
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to acquire lock on `CURRENCY_MAP`: {e}"))?;

        if !overwrite && map.contains_key(currency.code.as_str()) {
            return Ok(());
        }

        map.insert(currency.code.to_string(), currency);
        Ok(())
    }

    /// Returns whether this is a fiat currency.
    #[must_use]
    pub fn is_fiat(&self) -> bool {
        self.currency_type == CurrencyType::Fiat
    }

    /// Returns whether this is a crypto currency.
    #[must_use]
    pub fn is_crypto(&self) -> bool {
        self.currency_type == CurrencyType::Crypto
    }
}

// Currency identity is its code (the registry guarantees one definition per code)
impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let map_guard = CURRENCY_MAP
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to acquire lock on `CURRENCY_MAP`: {e}"))?;
        map_guard
            .get(s)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Unknown currency: {s}"))
    }
}

impl From<&str> for Currency {
    /// Creates a [`Currency`] from a currency code string.
    ///
    /// # Panics
    ///
    /// Panics if the `value` is not a registered currency code.
    fn from(value: &str) -> Self {
        Self::from_str(value).expect(FAILED)
    }
}

impl Debug for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}(code={}, precision={}, name={})",
            stringify!(Currency),
            self.code,
            self.precision,
            self.name,
        )
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.code.as_str())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let currency_str = String::deserialize(deserializer)?;
        Self::from_str(&currency_str).map_err(serde::de::Error::custom)
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
    fn test_registered_currency_from_str() {
        let usd = Currency::from_str("USD").unwrap();
        assert_eq!(usd.code.as_str(), "USD");
        assert_eq!(usd.precision, 2);
        assert_eq!(usd.iso4217, 840);
        assert!(usd.is_fiat());
    }

    #[rstest]
    fn test_unknown_currency_from_str() {
        assert!(Currency::from_str("ZZZ").is_err());
    }

    #[rstest]
    fn test_equality_is_code_based() {
        let usd1 = Currency::USD();
        let usd2 = Currency::new("USD", 2, 840, "United States dollar", CurrencyType::Fiat);
        assert_eq!(usd1, usd2);
        assert_ne!(Currency::USD(), Currency::EUR());
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_invalid_precision_panics() {
        let _ = Currency::new("XYZ", 10, 0, "Test currency", CurrencyType::Crypto);
    }

    #[rstest]
    fn test_register() {
        let custom = Currency::new("ZKK", 5, 0, "Zekkar", CurrencyType::Crypto);
        Currency::register(custom, false).unwrap();
        let resolved = Currency::from_str("ZKK").unwrap();
        assert_eq!(resolved.precision, 5);
    }

    #[rstest]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&Currency::AUD()).unwrap();
        assert_eq!(json, "\"AUD\"");
        let currency: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(currency, Currency::AUD());
    }
}
