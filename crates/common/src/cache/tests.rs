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

use bytes::Bytes;
use meridian_core::{UUID4, UnixNanos};
use meridian_model::{
    accounts::{AccountAny, stubs::cash_account_state},
    data::QuoteTick,
    enums::{LiquiditySide, OrderSide, OrderType, PriceType},
    events::OrderFilled,
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId, Venue,
        VenueOrderId,
    },
    instruments::{InstrumentAny, stubs::audusd_sim, stubs::eurusd_sim},
    position::Position,
    types::{Currency, Price, Quantity},
};
use rstest::rstest;

use super::*;

fn quote(instrument_id: &str, bid: &str, ask: &str) -> QuoteTick {
    QuoteTick::new(
        InstrumentId::from(instrument_id),
        Price::from(bid),
        Price::from(ask),
        Quantity::from("1000000"),
        Quantity::from("1000000"),
        UnixNanos::from(1),
        UnixNanos::from(1),
    )
}

fn buy_fill(instrument_id: &str, qty: &str, px: &str, position_id: &str) -> OrderFilled {
    OrderFilled::new(
        TraderId::from("TRADER-001"),
        StrategyId::from("EMA-CROSS-001"),
        InstrumentId::from(instrument_id),
        ClientOrderId::from("O-1"),
        VenueOrderId::from("V-1"),
        AccountId::from("SIM-001"),
        TradeId::from("T-1"),
        OrderSide::Buy,
        OrderType::Market,
        Quantity::from(qty),
        Price::from(px),
        Currency::USD(),
        LiquiditySide::Taker,
        UUID4::new(),
        UnixNanos::from(1),
        UnixNanos::from(1),
        Some(PositionId::from(position_id)),
        None,
    )
}

#[rstest]
fn test_price_by_type() {
    let mut cache = Cache::default();
    cache.add_quote(quote("AUD/USD.SIM", "0.66000", "0.66050"));

    let instrument_id = InstrumentId::from("AUD/USD.SIM");
    assert_eq!(
        cache.price(&instrument_id, PriceType::Bid),
        Some(Price::from("0.66000"))
    );
    assert_eq!(
        cache.price(&instrument_id, PriceType::Ask),
        Some(Price::from("0.66050"))
    );
    assert_eq!(cache.price(&instrument_id, PriceType::Last), None);
    assert_eq!(cache.price(&instrument_id, PriceType::Mark), None);
}

#[rstest]
fn test_latest_quote_is_front() {
    let mut cache = Cache::default();
    cache.add_quote(quote("AUD/USD.SIM", "0.66000", "0.66050"));
    cache.add_quote(quote("AUD/USD.SIM", "0.66100", "0.66150"));

    let instrument_id = InstrumentId::from("AUD/USD.SIM");
    assert_eq!(
        cache.quote(&instrument_id).unwrap().bid_price,
        Price::from("0.66100")
    );
}

#[rstest]
fn test_account_for_venue() {
    let mut cache = Cache::default();
    let account = AccountAny::new(cash_account_state(), true);
    cache.add_account(account);

    let venue = Venue::from("SIM");
    assert!(cache.account_for_venue(&venue).is_some());
    assert_eq!(cache.account_id(&venue), Some(&AccountId::from("SIM-001")));
    assert!(cache.account_for_venue(&Venue::from("BINANCE")).is_none());
}

#[rstest]
fn test_positions_open_and_closed_indexes() {
    let mut cache = Cache::default();
    let instrument = InstrumentAny::CurrencyPair(audusd_sim());
    let mut position = Position::new(
        &instrument,
        buy_fill("AUD/USD.SIM", "100000", "0.66000", "P-1"),
    );
    cache.add_position(position.clone());

    let instrument_id = InstrumentId::from("AUD/USD.SIM");
    assert_eq!(cache.positions_open(None, Some(&instrument_id)).len(), 1);
    assert_eq!(cache.positions_closed(None, Some(&instrument_id)).len(), 0);

    // Close the position and update
    let mut closing = buy_fill("AUD/USD.SIM", "100000", "0.66100", "P-1");
    closing.order_side = OrderSide::Sell;
    position.apply(&closing);
    cache.update_position(position);

    assert_eq!(cache.positions_open(None, Some(&instrument_id)).len(), 0);
    assert_eq!(cache.positions_closed(None, Some(&instrument_id)).len(), 1);
    assert_eq!(cache.positions(None, Some(&instrument_id)).len(), 1);
}

#[rstest]
fn test_get_xrate_from_quotes() {
    let mut cache = Cache::default();
    cache.add_instrument(InstrumentAny::CurrencyPair(audusd_sim()));
    cache.add_quote(quote("AUD/USD.SIM", "0.66000", "0.66050"));

    let rate = cache
        .get_xrate(
            Venue::from("SIM"),
            Currency::AUD(),
            Currency::USD(),
            PriceType::Bid,
        )
        .unwrap();
    assert_eq!(rate, 0.66);
}

#[rstest]
fn test_get_xrate_missing_pair_is_none() {
    let mut cache = Cache::default();
    cache.add_instrument(InstrumentAny::CurrencyPair(eurusd_sim()));
    cache.add_quote(quote("EUR/USD.SIM", "1.10000", "1.10020"));

    let rate = cache.get_xrate(
        Venue::from("SIM"),
        Currency::GBP(),
        Currency::USD(),
        PriceType::Bid,
    );
    assert!(rate.is_none());
}

#[rstest]
fn test_mark_xrate_sets_inverse() {
    let mut cache = Cache::default();
    cache.set_mark_xrate(Currency::AUD(), Currency::USD(), 0.66);

    assert_eq!(
        cache.get_mark_xrate(Currency::AUD(), Currency::USD()),
        Some(0.66)
    );
    let inverse = cache.get_mark_xrate(Currency::USD(), Currency::AUD()).unwrap();
    assert!((inverse - 1.0 / 0.66).abs() < 1e-12);

    cache.clear_mark_xrates();
    assert!(cache.get_mark_xrate(Currency::AUD(), Currency::USD()).is_none());
}

#[rstest]
fn test_position_snapshots() {
    let mut cache = Cache::default();
    let position_id = PositionId::from("P-1");
    assert!(cache.position_snapshots(&position_id).is_empty());

    cache.add_position_snapshot(position_id, Bytes::from_static(b"snapshot-1"));
    cache.add_position_snapshot(position_id, Bytes::from_static(b"snapshot-2"));

    assert_eq!(cache.position_snapshots(&position_id).len(), 2);
    assert!(cache.position_snapshot_ids().contains(&position_id));

    cache.set_position_snapshots(position_id, vec![Bytes::from_static(b"snapshot-2")]);
    assert_eq!(cache.position_snapshots(&position_id).len(), 1);

    cache.set_position_snapshots(position_id, vec![]);
    assert!(cache.position_snapshot_ids().is_empty());
}

#[rstest]
fn test_reset_clears_state() {
    let mut cache = Cache::default();
    cache.add_quote(quote("AUD/USD.SIM", "0.66000", "0.66050"));
    cache.add_account(AccountAny::new(cash_account_state(), true));
    cache.reset();

    assert!(cache.quote(&InstrumentId::from("AUD/USD.SIM")).is_none());
    assert!(cache.account_for_venue(&Venue::from("SIM")).is_none());
}
