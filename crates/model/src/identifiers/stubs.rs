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

//! Default implementations and fixture functions to provide stub identifiers for testing.

use rstest::fixture;

use crate::identifiers::{
    AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, Symbol, TradeId, TraderId,
    Venue, VenueOrderId,
};

#[fixture]
pub fn trader_id() -> TraderId {
    TraderId::from("TRADER-001")
}

#[fixture]
pub fn strategy_id_ema_cross() -> StrategyId {
    StrategyId::from("EMA-CROSS-001")
}

#[fixture]
pub fn account_id() -> AccountId {
    AccountId::from("SIM-001")
}

#[fixture]
pub fn venue_sim() -> Venue {
    Venue::from("SIM")
}

#[fixture]
pub fn symbol_aud_usd() -> Symbol {
    Symbol::from("AUD/USD")
}

#[fixture]
pub fn instrument_id_aud_usd_sim() -> InstrumentId {
    InstrumentId::from("AUD/USD.SIM")
}

#[fixture]
pub fn instrument_id_eur_usd_sim() -> InstrumentId {
    InstrumentId::from("EUR/USD.SIM")
}

#[fixture]
pub fn position_id_test() -> PositionId {
    PositionId::from("P-001")
}

#[fixture]
pub fn client_order_id_test() -> ClientOrderId {
    ClientOrderId::from("O-20260115-0001-001-1")
}

#[fixture]
pub fn venue_order_id_test() -> VenueOrderId {
    VenueOrderId::from("V-001")
}

#[fixture]
pub fn trade_id_test() -> TradeId {
    TradeId::from("T-001")
}
