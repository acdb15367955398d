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
use meridian_common::{cache::Cache, clock::TestClock, msgbus};
use meridian_core::UUID4;
use meridian_model::{
    accounts::{CashAccount, MarginAccount},
    data::{Bar, BarType},
    enums::{AccountType, LiquiditySide},
    events::{PositionClosed, PositionOpened},
    identifiers::{ClientOrderId, StrategyId, TradeId, TraderId, VenueOrderId},
    instruments::stubs::{audusd_sim, betting_instrument, eurusd_sim, usdjpy_sim},
    types::{AccountBalance, Quantity},
};
use rstest::rstest;
use rust_decimal_macros::dec;

use super::*;

// -- HARNESS ---------------------------------------------------------------------------------

fn portfolio(config: PortfolioConfig) -> Portfolio {
    let cache = Rc::new(RefCell::new(Cache::default()));
    let clock: Rc<RefCell<dyn Clock>> = Rc::new(RefCell::new(TestClock::new()));
    Portfolio::new(cache, clock, config)
}

fn default_portfolio() -> Portfolio {
    portfolio(PortfolioConfig::default())
}

fn account_state(
    account_id: &str,
    account_type: AccountType,
    balance: &str,
    base_currency: Option<Currency>,
) -> AccountState {
    let total = Money::from(balance);
    AccountState::new(
        AccountId::from(account_id),
        account_type,
        vec![AccountBalance::new(
            total,
            Money::zero(total.currency),
            total,
        )],
        vec![],
        true,
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
        base_currency,
    )
}

fn add_cash_account(portfolio: &Portfolio, account_id: &str, balance: &str) {
    let state = account_state(account_id, AccountType::Cash, balance, Some(Currency::USD()));
    let account = AccountAny::Cash(CashAccount::new(state, true));
    portfolio.cache.borrow_mut().add_account(account);
}

fn add_margin_account(portfolio: &Portfolio, account_id: &str, balance: &str) {
    let state = account_state(
        account_id,
        AccountType::Margin,
        balance,
        Some(Currency::USD()),
    );
    let account = AccountAny::Margin(MarginAccount::new(state, true));
    portfolio.cache.borrow_mut().add_account(account);
}

#[allow(clippy::too_many_arguments)]
fn fill(
    instrument: &InstrumentAny,
    account_id: &str,
    order_id: &str,
    side: OrderSide,
    qty: &str,
    px: &str,
    position_id: &str,
    commission: Option<Money>,
) -> meridian_model::events::OrderFilled {
    meridian_model::events::OrderFilled::new(
        TraderId::from("TRADER-001"),
        StrategyId::from("EMA-CROSS-001"),
        instrument.id(),
        ClientOrderId::from(order_id),
        VenueOrderId::from("V-001"),
        AccountId::from(account_id),
        TradeId::from(order_id),
        side,
        meridian_model::enums::OrderType::Market,
        Quantity::from(qty),
        Price::from(px),
        instrument.quote_currency(),
        LiquiditySide::Taker,
        UUID4::new(),
        UnixNanos::from(1_000_000_000),
        UnixNanos::from(1_000_000_000),
        Some(PositionId::from(position_id)),
        commission,
    )
}

fn quote(instrument_id: &str, bid: &str, ask: &str) -> QuoteTick {
    QuoteTick::new(
        InstrumentId::from(instrument_id),
        Price::from(bid),
        Price::from(ask),
        Quantity::from("1000000"),
        Quantity::from("1000000"),
        UnixNanos::from(2_000_000_000),
        UnixNanos::from(2_000_000_000),
    )
}

fn snapshot_blob(position: &Position) -> Bytes {
    let snapshot = PositionSnapshot::from(position, UnixNanos::from(1_000_000_000));
    Bytes::from(serde_json::to_vec(&snapshot).unwrap())
}

/// Builds a closed AUD/USD position lifecycle for the given realized PnL pips.
fn closed_audusd_position(
    instrument: &InstrumentAny,
    position_id: &str,
    open_px: &str,
    close_px: &str,
) -> Position {
    let mut position = Position::new(
        instrument,
        fill(
            instrument,
            "SIM-001",
            "O-open",
            OrderSide::Buy,
            "10000",
            open_px,
            position_id,
            None,
        ),
    );
    position.apply(&fill(
        instrument,
        "SIM-001",
        "O-close",
        OrderSide::Sell,
        "10000",
        close_px,
        position_id,
        None,
    ));
    position
}

// -- SEED SCENARIOS --------------------------------------------------------------------------

#[rstest]
fn test_empty_portfolio_is_completely_flat() {
    let mut portfolio = default_portfolio();
    let venue = Venue::from("SIM");

    assert!(portfolio.is_completely_flat());
    assert!(portfolio.realized_pnls(&venue).is_empty());
    assert!(portfolio.unrealized_pnls(&venue).is_empty());
    assert!(portfolio.total_pnls(&venue).is_empty());
    assert_eq!(
        portfolio.net_position(&InstrumentId::from("AUD/USD.SIM")),
        dec!(0)
    );
    assert!(!portfolio.initialized());
}

#[rstest]
fn test_cash_account_buy_fill_unrealized_pnl_uses_bid() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(eurusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100",
        "1.10000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    portfolio.cache.borrow_mut().add_position(position.clone());

    let opened = PositionEvent::PositionOpened(PositionOpened::create(
        &position,
        &buy,
        UUID4::new(),
        UnixNanos::from(1_000_000_000),
    ));
    portfolio.update_position(&opened);

    assert_eq!(portfolio.net_position(&instrument_id), dec!(100));
    assert!(portfolio.is_net_long(&instrument_id));
    assert!(!portfolio.is_completely_flat());

    let tick = quote("EUR/USD.SIM", "1.10050", "1.10070");
    portfolio.cache.borrow_mut().add_quote(tick);
    portfolio.update_quote_tick(&tick);

    // LONG position priced at BID 1.1005: (1.1005 - 1.1000) * 100 = 0.05 USD
    let unrealized = portfolio.unrealized_pnl(&instrument_id, None);
    assert_eq!(unrealized, Some(Money::from("0.05 USD")));

    let venue = Venue::from("SIM");
    let unrealized_pnls = portfolio.unrealized_pnls(&venue);
    assert_eq!(
        unrealized_pnls.get(&Currency::USD()),
        Some(&Money::from("0.05 USD"))
    );
}

#[rstest]
fn test_snapshot_combination_with_reopened_position() {
    let mut portfolio = default_portfolio();
    add_margin_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(audusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    // First lifecycle closed at +10 USD, snapshotted
    let first = closed_audusd_position(&instrument, "P-1", "0.66000", "0.66100");
    assert_eq!(first.realized_pnl, Some(Money::from("10.00 USD")));

    // Second lifecycle (same position ID) closed at +20 USD, also snapshotted
    let second = closed_audusd_position(&instrument, "P-1", "0.66000", "0.66200");
    assert_eq!(second.realized_pnl, Some(Money::from("20.00 USD")));

    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_position_snapshot(PositionId::from("P-1"), snapshot_blob(&first));
        cache.add_position_snapshot(PositionId::from("P-1"), snapshot_blob(&second));
        cache.add_position(second.clone());
    }

    // Live realized equals the most recent snapshot, so the net contribution
    // of the snapshots is the first cycle only
    assert_eq!(
        portfolio.realized_pnl(&instrument_id),
        Some(Money::from("30.00 USD"))
    );

    // Purge: only the second lifecycle remains, live position removed
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.purge_position(PositionId::from("P-1"));
        cache.set_position_snapshots(PositionId::from("P-1"), vec![snapshot_blob(&second)]);
    }
    let closing_fill = fill(
        &instrument,
        "SIM-001",
        "O-close",
        OrderSide::Sell,
        "10000",
        "0.66200",
        "P-1",
        None,
    );
    let closed = PositionEvent::PositionClosed(PositionClosed::create(
        &second,
        &closing_fill,
        UUID4::new(),
        UnixNanos::from(1_000_000_000),
    ));
    portfolio.update_position(&closed); // Invalidates the PnL caches

    // Snapshot count regression triggers a full rebuild
    assert_eq!(
        portfolio.realized_pnl(&instrument_id),
        Some(Money::from("20.00 USD"))
    );
}

#[rstest]
fn test_snapshot_combination_order_independence() {
    // Closing at X then reopening and closing at Y yields X + Y regardless of
    // whether the second cycle is snapshotted yet
    let instrument = InstrumentAny::CurrencyPair(audusd_sim());
    let instrument_id = instrument.id();

    let first = closed_audusd_position(&instrument, "P-1", "0.66000", "0.66100"); // +10
    let second = closed_audusd_position(&instrument, "P-1", "0.66000", "0.66200"); // +20

    // Variant A: only the first cycle snapshotted
    let mut portfolio_a = default_portfolio();
    add_margin_account(&portfolio_a, "SIM-001", "1000000.00 USD");
    {
        let mut cache = portfolio_a.cache.borrow_mut();
        cache.add_instrument(instrument);
        cache.add_position_snapshot(PositionId::from("P-1"), snapshot_blob(&first));
        cache.add_position(second.clone());
    }
    assert_eq!(
        portfolio_a.realized_pnl(&instrument_id),
        Some(Money::from("30.00 USD"))
    );

    // Variant B: both cycles snapshotted
    let mut portfolio_b = default_portfolio();
    add_margin_account(&portfolio_b, "SIM-001", "1000000.00 USD");
    {
        let mut cache = portfolio_b.cache.borrow_mut();
        cache.add_instrument(instrument);
        cache.add_position_snapshot(PositionId::from("P-1"), snapshot_blob(&first));
        cache.add_position_snapshot(PositionId::from("P-1"), snapshot_blob(&second));
        cache.add_position(second);
    }
    assert_eq!(
        portfolio_b.realized_pnl(&instrument_id),
        Some(Money::from("30.00 USD"))
    );
}

#[rstest]
fn test_betting_fills_aggregate_into_bet_position() {
    let mut portfolio = default_portfolio();
    let instrument = InstrumentAny::Betting(betting_instrument());
    let instrument_id = instrument.id();

    let state = account_state(
        "BETFAIR-001",
        AccountType::Cash,
        "10000.00 GBP",
        Some(Currency::GBP()),
    );
    let account = AccountAny::Cash(CashAccount::new(state, true));
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_account(account);
        cache.add_instrument(instrument);
    }

    let back = fill(
        &instrument,
        "BETFAIR-001",
        "O-1",
        OrderSide::Buy,
        "10.00",
        "2.00",
        "P-1",
        None,
    );
    let lay = fill(
        &instrument,
        "BETFAIR-001",
        "O-2",
        OrderSide::Sell,
        "5.00",
        "3.00",
        "P-1",
        None,
    );

    let mut position = Position::new(&instrument, back);
    position.apply(&lay);
    portfolio.cache.borrow_mut().add_position(position);

    portfolio.update_order(&OrderEventAny::Filled(back));
    portfolio.update_order(&OrderEventAny::Filled(lay));

    // Net exposure: 20 backed less 15 laid
    assert_eq!(
        portfolio.net_exposure(&instrument_id, None),
        Some(Money::from("5.00 GBP"))
    );
    // Unrealized at 2.5: flattening 2 @ 2.5 against 2.5 backed @ 2.0
    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, Some(Price::from("2.50"))),
        Some(Money::from("-0.50 GBP"))
    );
    // Realized from the partial lay decrease
    assert_eq!(
        portfolio.realized_pnl(&instrument_id),
        Some(Money::from("-2.50 GBP"))
    );
}

#[rstest]
fn test_pending_calculation_resolves_on_quote() {
    let mut portfolio = default_portfolio();
    add_margin_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(audusd_sim());
    let instrument_id = instrument.id();

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "10000",
        "0.66000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_instrument(instrument);
        cache.add_position(position);
    }

    // No price yet: initialization leaves the instrument pending
    portfolio.initialize_orders();
    portfolio.initialize_positions();
    assert!(!portfolio.initialized());
    assert!(portfolio.pending_calcs().contains(&instrument_id));

    // Quote arrives: the pending calculation resolves and initialization completes
    let tick = quote("AUD/USD.SIM", "0.66100", "0.66150");
    portfolio.cache.borrow_mut().add_quote(tick);
    portfolio.update_quote_tick(&tick);

    assert!(portfolio.pending_calcs().is_empty());
    assert!(portfolio.initialized());
    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, None),
        Some(Money::from("10.00 USD"))
    );
}

#[rstest]
fn test_fill_with_account_state_calculation_off_is_ignored() {
    let mut portfolio = default_portfolio();
    let state = account_state("SIM-001", AccountType::Cash, "1000000.00 USD", Some(Currency::USD()));
    let account = AccountAny::Cash(CashAccount::new(state, false));
    let instrument = InstrumentAny::CurrencyPair(audusd_sim());
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_account(account);
        cache.add_instrument(instrument);
    }

    let published = Rc::new(RefCell::new(0usize));
    let published_clone = published.clone();
    let handler = ShareableMessageHandler(Rc::new(TypedMessageHandler::new(
        Some("test-account-events"),
        move |_: &AccountState| *published_clone.borrow_mut() += 1,
    )));
    msgbus::subscribe("events.account.SIM-001", handler.clone(), None);

    let balances_before = portfolio
        .cache
        .borrow()
        .account(&AccountId::from("SIM-001"))
        .unwrap()
        .balances_total();

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "10000",
        "0.66000",
        "P-1",
        None,
    );
    portfolio.update_order(&OrderEventAny::Filled(buy));

    let balances_after = portfolio
        .cache
        .borrow()
        .account(&AccountId::from("SIM-001"))
        .unwrap()
        .balances_total();

    assert_eq!(*published.borrow(), 0);
    assert_eq!(balances_before, balances_after);
    msgbus::unsubscribe("events.account.SIM-001", &handler);
}

// -- INVARIANTS ------------------------------------------------------------------------------

#[rstest]
fn test_net_position_equals_sum_of_open_signed_quantities() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(audusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let long_fill = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100000",
        "0.66000",
        "P-1",
        None,
    );
    let short_fill = fill(
        &instrument,
        "SIM-001",
        "O-2",
        OrderSide::Sell,
        "30000",
        "0.66000",
        "P-2",
        None,
    );
    let long_position = Position::new(&instrument, long_fill);
    let short_position = Position::new(&instrument, short_fill);
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_position(long_position.clone());
        cache.add_position(short_position);
    }

    let opened = PositionEvent::PositionOpened(PositionOpened::create(
        &long_position,
        &long_fill,
        UUID4::new(),
        UnixNanos::from(1_000_000_000),
    ));
    portfolio.update_position(&opened);

    assert_eq!(portfolio.net_position(&instrument_id), dec!(70000));
    assert!(portfolio.is_net_long(&instrument_id));
    assert!(!portfolio.is_net_short(&instrument_id));
    assert!(!portfolio.is_flat(&instrument_id));
    assert!(!portfolio.is_completely_flat());
}

#[rstest]
fn test_total_pnls_equals_realized_plus_unrealized_at_raw_level() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(eurusd_sim());
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100",
        "1.10000",
        "P-1",
        Some(Money::from("2.00 USD")),
    );
    let position = Position::new(&instrument, buy);
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_position(position);
        cache.add_quote(quote("EUR/USD.SIM", "1.10050", "1.10070"));
    }

    let venue = Venue::from("SIM");
    let realized = portfolio.realized_pnls(&venue);
    let unrealized = portfolio.unrealized_pnls(&venue);
    let total = portfolio.total_pnls(&venue);

    for (currency, total_pnl) in &total {
        let realized_raw = realized.get(currency).map_or(0, |pnl| pnl.raw);
        let unrealized_raw = unrealized.get(currency).map_or(0, |pnl| pnl.raw);
        assert_eq!(total_pnl.raw, realized_raw + unrealized_raw);
    }
    assert_eq!(realized.get(&Currency::USD()), Some(&Money::from("-2.00 USD")));
    assert_eq!(unrealized.get(&Currency::USD()), Some(&Money::from("0.05 USD")));
    assert_eq!(total.get(&Currency::USD()), Some(&Money::from("-1.95 USD")));
}

#[rstest]
fn test_position_event_invalidates_pnl_caches() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(eurusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100",
        "1.10000",
        "P-1",
        None,
    );
    let mut position = Position::new(&instrument, buy);
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_position(position.clone());
        cache.add_quote(quote("EUR/USD.SIM", "1.10050", "1.10070"));
    }

    // Populate the cache
    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, None),
        Some(Money::from("0.05 USD"))
    );

    // Double the position without any new quote
    let second_buy = fill(
        &instrument,
        "SIM-001",
        "O-2",
        OrderSide::Buy,
        "100",
        "1.10000",
        "P-1",
        None,
    );
    position.apply(&second_buy);
    portfolio.cache.borrow_mut().update_position(position.clone());

    let changed = PositionEvent::PositionOpened(PositionOpened::create(
        &position,
        &second_buy,
        UUID4::new(),
        UnixNanos::from(1_500_000_000),
    ));
    portfolio.update_position(&changed);

    // A stale cache would still return 0.05
    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, None),
        Some(Money::from("0.10 USD"))
    );
}

#[rstest]
fn test_unrealized_pnl_with_explicit_price_bypasses_cache() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(eurusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100",
        "1.10000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_position(position);
        cache.add_quote(quote("EUR/USD.SIM", "1.10050", "1.10070"));
    }

    let explicit = Price::from("1.11000");
    let first = portfolio.unrealized_pnl(&instrument_id, Some(explicit));
    let second = portfolio.unrealized_pnl(&instrument_id, Some(explicit));
    assert_eq!(first, Some(Money::from("1.00 USD")));
    assert_eq!(first, second);

    // Policy-driven query still uses the BID, not the explicit price
    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, None),
        Some(Money::from("0.05 USD"))
    );
}

#[rstest]
fn test_apply_account_state_twice_is_idempotent() {
    let mut portfolio = default_portfolio();
    let event = account_state("SIM-001", AccountType::Cash, "1525000.00 USD", Some(Currency::USD()));

    portfolio.update_account(&event);
    let balances_once = portfolio
        .cache
        .borrow()
        .account(&AccountId::from("SIM-001"))
        .unwrap()
        .balances_total();

    portfolio.update_account(&event);
    let balances_twice = portfolio
        .cache
        .borrow()
        .account(&AccountId::from("SIM-001"))
        .unwrap()
        .balances_total();

    assert_eq!(balances_once, balances_twice);
}

#[rstest]
fn test_reset_then_replay_reproduces_results() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(eurusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100",
        "1.10000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    portfolio.cache.borrow_mut().add_position(position.clone());
    let opened = PositionEvent::PositionOpened(PositionOpened::create(
        &position,
        &buy,
        UUID4::new(),
        UnixNanos::from(1_000_000_000),
    ));
    let tick = quote("EUR/USD.SIM", "1.10050", "1.10070");
    portfolio.cache.borrow_mut().add_quote(tick);

    portfolio.update_position(&opened);
    portfolio.update_quote_tick(&tick);
    let net_before = portfolio.net_position(&instrument_id);
    let unrealized_before = portfolio.unrealized_pnl(&instrument_id, None);

    portfolio.reset();
    assert!(portfolio.is_completely_flat());
    assert!(!portfolio.initialized());

    portfolio.update_position(&opened);
    portfolio.update_quote_tick(&tick);
    assert_eq!(portfolio.net_position(&instrument_id), net_before);
    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, None),
        unrealized_before
    );
}

// -- BOUNDARY BEHAVIORS ----------------------------------------------------------------------

#[rstest]
fn test_missing_exchange_rate_returns_none_and_marks_pending() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(usdjpy_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "10000",
        "110.000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    portfolio.cache.borrow_mut().add_position(position);

    // JPY settlement with a USD base account and no quotes to derive a rate
    let result = portfolio.unrealized_pnl(&instrument_id, Some(Price::from("110.500")));
    assert_eq!(result, None);
    assert!(portfolio.pending_calcs().contains(&instrument_id));
    assert_eq!(portfolio.total_pnl(&instrument_id, None), None);
}

#[rstest]
fn test_betting_instrument_without_bet_position_returns_none() {
    let mut portfolio = default_portfolio();
    let instrument = InstrumentAny::Betting(betting_instrument());
    let instrument_id = instrument.id();

    let state = account_state(
        "BETFAIR-001",
        AccountType::Cash,
        "10000.00 GBP",
        Some(Currency::GBP()),
    );
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_account(AccountAny::Cash(CashAccount::new(state, true)));
        cache.add_instrument(instrument);
    }

    let back = fill(
        &instrument,
        "BETFAIR-001",
        "O-1",
        OrderSide::Buy,
        "10.00",
        "2.00",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, back);
    portfolio.cache.borrow_mut().add_position(position);

    // No fills were routed through the portfolio, so no bet position exists
    let result = portfolio.unrealized_pnl(&instrument_id, Some(Price::from("2.50")));
    assert_eq!(result, None);
    assert!(!portfolio.pending_calcs().contains(&instrument_id));
}

#[rstest]
fn test_unrealized_pnl_falls_back_to_bar_close() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(eurusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100",
        "1.10000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    portfolio.cache.borrow_mut().add_position(position);

    // No quotes or trades: the observed bar close is the last fallback
    let bar_type = BarType::from("EUR/USD.SIM-1-MINUTE-BID-EXTERNAL");
    let bar = Bar::new(
        bar_type,
        Price::from("1.10000"),
        Price::from("1.10100"),
        Price::from("1.09900"),
        Price::from("1.10020"),
        Quantity::from("1000"),
        UnixNanos::from(2_000_000_000),
        UnixNanos::from(2_000_000_000),
    );
    portfolio.update_bar(&bar);

    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, None),
        Some(Money::from("0.02 USD"))
    );
}

#[rstest]
fn test_unrealized_pnl_prefers_mark_price_when_configured() {
    let config = PortfolioConfig {
        use_mark_prices: true,
        ..Default::default()
    };
    let mut portfolio = portfolio(config);
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(eurusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100",
        "1.10000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_position(position);
        cache.add_quote(quote("EUR/USD.SIM", "1.10050", "1.10070"));
        cache.add_mark_price(MarkPriceUpdate::new(
            instrument_id,
            Price::from("1.10100"),
            UnixNanos::from(2_000_000_000),
            UnixNanos::from(2_000_000_000),
        ));
    }

    // MARK 1.101 rather than BID 1.1005
    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, None),
        Some(Money::from("0.10 USD"))
    );
}

#[rstest]
fn test_unrealized_pnl_converts_via_mark_xrate_when_configured() {
    let config = PortfolioConfig {
        use_mark_xrates: true,
        ..Default::default()
    };
    let mut portfolio = portfolio(config);
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(usdjpy_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "10000",
        "110.000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_position(position);
        cache.set_mark_xrate(Currency::JPY(), Currency::USD(), 0.009);
    }

    // (110.5 - 110.0) * 10_000 = 5_000 JPY -> 45 USD at the mark rate
    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, Some(Price::from("110.500"))),
        Some(Money::from("45.00 USD"))
    );
}

#[rstest]
fn test_net_exposure_uses_notional_value() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(eurusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100",
        "1.10000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    {
        let mut cache = portfolio.cache.borrow_mut();
        cache.add_position(position);
        cache.add_quote(quote("EUR/USD.SIM", "1.10050", "1.10070"));
    }

    // 100 * 1.1005 = 110.05 USD
    assert_eq!(
        portfolio.net_exposure(&instrument_id, None),
        Some(Money::from("110.05 USD"))
    );

    let venue = Venue::from("SIM");
    let exposures = portfolio.net_exposures(&venue).unwrap();
    assert_eq!(
        exposures.get(&Currency::USD()),
        Some(&Money::from("110.05 USD"))
    );
}

#[rstest]
fn test_queries_for_unknown_venue() {
    let mut portfolio = default_portfolio();
    let venue = Venue::from("UNKNOWN");

    assert!(portfolio.account(&venue).is_none());
    assert!(portfolio.balances_locked(&venue).is_none());
    assert!(portfolio.margins_init(&venue).is_none());
    assert!(portfolio.margins_maint(&venue).is_none());
    assert!(portfolio.net_exposures(&venue).is_none());
}

#[rstest]
fn test_margins_are_none_for_cash_accounts() {
    let portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let venue = Venue::from("SIM");

    assert!(portfolio.margins_init(&venue).is_none());
    assert!(portfolio.margins_maint(&venue).is_none());
    assert!(portfolio.balances_locked(&venue).is_some());
}

#[rstest]
fn test_margin_account_position_event_updates_maintenance_margin() {
    let mut portfolio = default_portfolio();
    add_margin_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(audusd_sim());
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let buy = fill(
        &instrument,
        "SIM-001",
        "O-1",
        OrderSide::Buy,
        "100000",
        "0.66000",
        "P-1",
        None,
    );
    let position = Position::new(&instrument, buy);
    portfolio.cache.borrow_mut().add_position(position.clone());

    let opened = PositionEvent::PositionOpened(PositionOpened::create(
        &position,
        &buy,
        UUID4::new(),
        UnixNanos::from(1_000_000_000),
    ));
    portfolio.update_position(&opened);

    let venue = Venue::from("SIM");
    let margins = portfolio.margins_maint(&venue).unwrap();
    // notional 66_000 * (3% margin + 0.002% taker fee)
    assert_eq!(margins.get(&Currency::USD()), Some(&Money::from("1981.32 USD")));
}

#[rstest]
fn test_closed_positions_leave_portfolio_completely_flat() {
    let mut portfolio = default_portfolio();
    add_cash_account(&portfolio, "SIM-001", "1000000.00 USD");
    let instrument = InstrumentAny::CurrencyPair(audusd_sim());
    let instrument_id = instrument.id();
    portfolio.cache.borrow_mut().add_instrument(instrument);

    let position = closed_audusd_position(&instrument, "P-1", "0.66000", "0.66100");
    portfolio.cache.borrow_mut().add_position(position.clone());

    let closing_fill = fill(
        &instrument,
        "SIM-001",
        "O-close",
        OrderSide::Sell,
        "10000",
        "0.66100",
        "P-1",
        None,
    );
    let closed = PositionEvent::PositionClosed(PositionClosed::create(
        &position,
        &closing_fill,
        UUID4::new(),
        UnixNanos::from(1_000_000_000),
    ));
    portfolio.update_position(&closed);

    assert_eq!(portfolio.net_position(&instrument_id), dec!(0));
    assert!(portfolio.is_flat(&instrument_id));
    assert!(portfolio.is_completely_flat());
    assert_eq!(
        portfolio.realized_pnl(&instrument_id),
        Some(Money::from("10.00 USD"))
    );
    assert_eq!(
        portfolio.unrealized_pnl(&instrument_id, None),
        Some(Money::from("0.00 USD"))
    );
}
