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

//! Fixture functions to provide stub instruments for testing.

use meridian_core::UnixNanos;
use rstest::fixture;
use rust_decimal_macros::dec;
use ustr::Ustr;

use super::{BettingInstrument, CurrencyPair};
use crate::{
    identifiers::{InstrumentId, Symbol},
    types::{Currency, Price, Quantity},
};

/// Returns an AUD/USD spot pair on the SIM venue.
#[fixture]
pub fn audusd_sim() -> CurrencyPair {
    CurrencyPair::new(
        InstrumentId::from("AUD/USD.SIM"),
        Symbol::from("AUD/USD"),
        Currency::AUD(),
        Currency::USD(),
        5,
        0,
        Price::from("0.00001"),
        Quantity::from("1"),
        dec!(0.03),
        dec!(0.03),
        dec!(0.00002),
        dec!(0.00002),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

/// Returns a EUR/USD spot pair on the SIM venue.
#[fixture]
pub fn eurusd_sim() -> CurrencyPair {
    CurrencyPair::new(
        InstrumentId::from("EUR/USD.SIM"),
        Symbol::from("EUR/USD"),
        Currency::EUR(),
        Currency::USD(),
        5,
        0,
        Price::from("0.00001"),
        Quantity::from("1"),
        dec!(0.03),
        dec!(0.03),
        dec!(0.00002),
        dec!(0.00002),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

/// Returns a USD/JPY spot pair on the SIM venue.
#[fixture]
pub fn usdjpy_sim() -> CurrencyPair {
    CurrencyPair::new(
        InstrumentId::from("USD/JPY.SIM"),
        Symbol::from("USD/JPY"),
        Currency::USD(),
        Currency::JPY(),
        3,
        0,
        Price::from("0.001"),
        Quantity::from("1"),
        dec!(0.03),
        dec!(0.03),
        dec!(0.00002),
        dec!(0.00002),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}

/// Returns a betting instrument for a single selection in a match-odds market.
#[fixture]
pub fn betting_instrument() -> BettingInstrument {
    BettingInstrument::new(
        InstrumentId::from("1-123456789.BETFAIR"),
        Symbol::from("1-123456789"),
        1,
        29678534,
        Ustr::from("NAC Breda v FC Utrecht"),
        Ustr::from("1.179082386"),
        Ustr::from("Match Odds"),
        UnixNanos::default(),
        50214,
        Ustr::from("NAC Breda"),
        0.0,
        Currency::GBP(),
        2,
        2,
        Price::from("0.01"),
        Quantity::from("0.01"),
        dec!(1),
        dec!(1),
        dec!(0),
        dec!(0),
        UnixNanos::default(),
        UnixNanos::default(),
    )
}
