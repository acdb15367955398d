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

//! A tagged variant wrapping all instrument types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BettingInstrument, CurrencyPair, Instrument};
use crate::{
    identifiers::{InstrumentId, Symbol},
    types::{Currency, Money, Price, Quantity},
};

/// Wraps an instrument allowing polymorphism over the instrument family.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum InstrumentAny {
    /// A spot currency pair instrument.
    CurrencyPair(CurrencyPair),
    /// A betting market instrument.
    Betting(BettingInstrument),
}

impl InstrumentAny {
    /// Returns whether the instrument is a betting instrument.
    #[must_use]
    pub fn is_betting(&self) -> bool {
        matches!(self, Self::Betting(_))
    }
}

impl Instrument for InstrumentAny {
    fn id(&self) -> InstrumentId {
        match self {
            Self::CurrencyPair(inst) => inst.id(),
            Self::Betting(inst) => inst.id(),
        }
    }

    fn raw_symbol(&self) -> Symbol {
        match self {
            Self::CurrencyPair(inst) => inst.raw_symbol(),
            Self::Betting(inst) => inst.raw_symbol(),
        }
    }

    fn quote_currency(&self) -> Currency {
        match self {
            Self::CurrencyPair(inst) => inst.quote_currency(),
            Self::Betting(inst) => inst.quote_currency(),
        }
    }

    fn base_currency(&self) -> Option<Currency> {
        match self {
            Self::CurrencyPair(inst) => inst.base_currency(),
            Self::Betting(inst) => inst.base_currency(),
        }
    }

    fn settlement_currency(&self) -> Currency {
        match self {
            Self::CurrencyPair(inst) => inst.settlement_currency(),
            Self::Betting(inst) => inst.settlement_currency(),
        }
    }

    fn is_inverse(&self) -> bool {
        match self {
            Self::CurrencyPair(inst) => inst.is_inverse(),
            Self::Betting(inst) => inst.is_inverse(),
        }
    }

    fn price_precision(&self) -> u8 {
        match self {
            Self::CurrencyPair(inst) => inst.price_precision(),
            Self::Betting(inst) => inst.price_precision(),
        }
    }

    fn size_precision(&self) -> u8 {
        match self {
            Self::CurrencyPair(inst) => inst.size_precision(),
            Self::Betting(inst) => inst.size_precision(),
        }
    }

    fn price_increment(&self) -> Price {
        match self {
            Self::CurrencyPair(inst) => inst.price_increment(),
            Self::Betting(inst) => inst.price_increment(),
        }
    }

    fn size_increment(&self) -> Quantity {
        match self {
            Self::CurrencyPair(inst) => inst.size_increment(),
            Self::Betting(inst) => inst.size_increment(),
        }
    }

    fn margin_init(&self) -> Decimal {
        match self {
            Self::CurrencyPair(inst) => inst.margin_init(),
            Self::Betting(inst) => inst.margin_init(),
        }
    }

    fn margin_maint(&self) -> Decimal {
        match self {
            Self::CurrencyPair(inst) => inst.margin_maint(),
            Self::Betting(inst) => inst.margin_maint(),
        }
    }

    fn maker_fee(&self) -> Decimal {
        match self {
            Self::CurrencyPair(inst) => inst.maker_fee(),
            Self::Betting(inst) => inst.maker_fee(),
        }
    }

    fn taker_fee(&self) -> Decimal {
        match self {
            Self::CurrencyPair(inst) => inst.taker_fee(),
            Self::Betting(inst) => inst.taker_fee(),
        }
    }

    fn calculate_notional_value(
        &self,
        quantity: Quantity,
        price: Price,
        use_quote_for_inverse: Option<bool>,
    ) -> Money {
        match self {
            Self::CurrencyPair(inst) => {
                inst.calculate_notional_value(quantity, price, use_quote_for_inverse)
            }
            Self::Betting(inst) => {
                inst.calculate_notional_value(quantity, price, use_quote_for_inverse)
            }
        }
    }
}

impl From<CurrencyPair> for InstrumentAny {
    fn from(value: CurrencyPair) -> Self {
        Self::CurrencyPair(value)
    }
}

impl From<BettingInstrument> for InstrumentAny {
    fn from(value: BettingInstrument) -> Self {
        Self::Betting(value)
    }
}
