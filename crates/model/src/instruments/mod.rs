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

//! Instrument definitions for tradable assets.

use rust_decimal::Decimal;

use crate::{
    identifiers::{InstrumentId, Symbol},
    types::{Currency, Money, Price, Quantity},
};

pub mod any;
pub mod betting;
pub mod currency_pair;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs;

// Re-exports
pub use any::InstrumentAny;
pub use betting::BettingInstrument;
pub use currency_pair::CurrencyPair;

/// The common contract for all instrument definitions.
pub trait Instrument: 'static {
    /// Returns the instrument ID.
    fn id(&self) -> InstrumentId;
    /// Returns the raw/local/native symbol for the instrument, assigned by the venue.
    fn raw_symbol(&self) -> Symbol;
    /// Returns the quote currency for the instrument.
    fn quote_currency(&self) -> Currency;
    /// Returns the base currency for the instrument (if applicable).
    fn base_currency(&self) -> Option<Currency>;
    /// Returns the settlement currency for the instrument.
    fn settlement_currency(&self) -> Currency;
    /// Returns whether the instrument is inverse (quantity expressed in quote currency units).
    fn is_inverse(&self) -> bool;
    /// Returns the price decimal precision.
    fn price_precision(&self) -> u8;
    /// Returns the trading size decimal precision.
    fn size_precision(&self) -> u8;
    /// Returns the minimum price increment (tick size).
    fn price_increment(&self) -> Price;
    /// Returns the minimum size increment.
    fn size_increment(&self) -> Quantity;
    /// Returns the contract multiplier.
    fn multiplier(&self) -> Quantity {
        Quantity::from("1")
    }
    /// Returns the initial (order) margin rate.
    fn margin_init(&self) -> Decimal;
    /// Returns the maintenance (position) margin rate.
    fn margin_maint(&self) -> Decimal;
    /// Returns the fee rate for liquidity makers.
    fn maker_fee(&self) -> Decimal;
    /// Returns the fee rate for liquidity takers.
    fn taker_fee(&self) -> Decimal;

    /// Calculates the notional value for the given `quantity` and `price`.
    ///
    /// The `use_quote_for_inverse` flag is only applicable for inverse instruments:
    /// when true, the notional is expressed in quote currency units.
    fn calculate_notional_value(
        &self,
        quantity: Quantity,
        price: Price,
        use_quote_for_inverse: Option<bool>,
    ) -> Money {
        let use_quote_for_inverse = use_quote_for_inverse.unwrap_or(false);
        let (amount, currency) = if self.is_inverse() {
            if use_quote_for_inverse {
                (quantity.as_f64(), self.quote_currency())
            } else {
                let amount =
                    quantity.as_f64() * self.multiplier().as_f64() * (1.0 / price.as_f64());
                let currency = self
                    .base_currency()
                    .expect("Inverse instruments require a base currency");
                (amount, currency)
            }
        } else {
            let amount = quantity.as_f64() * self.multiplier().as_f64() * price.as_f64();
            (amount, self.quote_currency())
        };
        Money::new(amount, currency)
    }

    /// Creates a new [`Price`] at the instrument's price precision.
    fn make_price(&self, value: f64) -> Price {
        Price::new(value, self.price_precision())
    }

    /// Creates a new [`Quantity`] at the instrument's size precision.
    fn make_qty(&self, value: f64) -> Quantity {
        Quantity::new(value, self.size_precision())
    }
}
