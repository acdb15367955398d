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

//! A `QuoteTick` data type representing a top-of-book state.

use std::fmt::Display;

use meridian_core::{
    UnixNanos,
    correctness::{FAILED, check_equal_u8},
};
use serde::{Deserialize, Serialize};

use crate::{
    enums::PriceType,
    identifiers::InstrumentId,
    types::{Price, Quantity},
};

/// Represents a quote tick in a market.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct QuoteTick {
    /// The quotes instrument ID.
    pub instrument_id: InstrumentId,
    /// The top-of-book bid price.
    pub bid_price: Price,
    /// The top-of-book ask price.
    pub ask_price: Price,
    /// The top-of-book bid size.
    pub bid_size: Quantity,
    /// The top-of-book ask size.
    pub ask_size: Quantity,
    /// UNIX timestamp (nanoseconds) when the quote event occurred.
    pub ts_event: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the struct was initialized.
    pub ts_init: UnixNanos,
}

impl QuoteTick {
    /// Creates a new [`QuoteTick`] instance with correctness checking.
    ///
    /// # Errors
    ///
    /// This function returns an error:
    /// - If `bid_price.precision` does not equal `ask_price.precision`.
    /// - If `bid_size.precision` does not equal `ask_size.precision`.
    pub fn new_checked(
        instrument_id: InstrumentId,
        bid_price: Price,
        ask_price: Price,
        bid_size: Quantity,
        ask_size: Quantity,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> anyhow::Result<Self> {
        check_equal_u8(
            bid_price.precision,
            ask_price.precision,
            "bid_price.precision",
            "ask_price.precision",
        )?;
        check_equal_u8(
            bid_size.precision,
            ask_size.precision,
            "bid_size.precision",
            "ask_size.precision",
        )?;
        Ok(Self {
            instrument_id,
            bid_price,
            ask_price,
            bid_size,
            ask_size,
            ts_event,
            ts_init,
        })
    }

    /// Creates a new [`QuoteTick`] instance.
    ///
    /// # Panics
    ///
    /// This function panics:
    /// - If `bid_price.precision` does not equal `ask_price.precision`.
    /// - If `bid_size.precision` does not equal `ask_size.precision`.
    pub fn new(
        instrument_id: InstrumentId,
        bid_price: Price,
        ask_price: Price,
        bid_size: Quantity,
        ask_size: Quantity,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new_checked(
            instrument_id,
            bid_price,
            ask_price,
            bid_size,
            ask_size,
            ts_event,
            ts_init,
        )
        .expect(FAILED)
    }

    /// Returns the price for the given `price_type`.
    ///
    /// # Panics
    ///
    /// Panics if `price_type` cannot be derived from a quote (e.g. `Last`).
    #[must_use]
    pub fn extract_price(&self, price_type: PriceType) -> Price {
        match price_type {
            PriceType::Bid => self.bid_price,
            PriceType::Ask => self.ask_price,
            PriceType::Mid => Price::new(
                f64::midpoint(self.bid_price.as_f64(), self.ask_price.as_f64()),
                self.bid_price.precision + 1,
            ),
            _ => panic!("Cannot extract with `PriceType` {price_type}"),
        }
    }
}

impl Display for QuoteTick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.instrument_id,
            self.bid_price,
            self.ask_price,
            self.bid_size,
            self.ask_size,
            self.ts_event,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn quote_audusd() -> QuoteTick {
        QuoteTick::new(
            InstrumentId::from("AUD/USD.SIM"),
            Price::from("0.6600"),
            Price::from("0.6605"),
            Quantity::from("1000000"),
            Quantity::from("1000000"),
            UnixNanos::from(1),
            UnixNanos::from(2),
        )
    }

    #[rstest]
    fn test_extract_price() {
        let quote = quote_audusd();
        assert_eq!(quote.extract_price(PriceType::Bid), Price::from("0.6600"));
        assert_eq!(quote.extract_price(PriceType::Ask), Price::from("0.6605"));
        assert_eq!(quote.extract_price(PriceType::Mid), Price::from("0.66025"));
    }

    #[rstest]
    #[should_panic(expected = "Cannot extract with `PriceType` LAST")]
    fn test_extract_price_last_panics() {
        let _ = quote_audusd().extract_price(PriceType::Last);
    }

    #[rstest]
    #[should_panic(expected = "Condition failed")]
    fn test_precision_mismatch_panics() {
        let _ = QuoteTick::new(
            InstrumentId::from("AUD/USD.SIM"),
            Price::from("0.66"),
            Price::from("0.6605"),
            Quantity::from("1"),
            Quantity::from("1"),
            UnixNanos::default(),
            UnixNanos::default(),
        );
    }

    #[rstest]
    fn test_display() {
        let quote = quote_audusd();
        assert_eq!(
            quote.to_string(),
            "AUD/USD.SIM,0.6600,0.6605,1000000,1000000,1"
        );
    }
}
