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

//! A `Portfolio` component maintaining net positions, PnL, exposures and margins.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    rc::Rc,
};

use meridian_common::{
    cache::Cache,
    clock::Clock,
    msgbus::{
        self,
        handler::{ShareableMessageHandler, TypedMessageHandler},
    },
};
use meridian_core::{UnixNanos, datetime::millis_to_nanos};
use meridian_model::{
    accounts::AccountAny,
    data::{Bar, Bet, BetPosition, MarkPriceUpdate, QuoteTick},
    enums::{BetSide, OrderSide, OrderType, PositionSide, PriceType},
    events::{AccountState, OrderEventAny, OrderEventType, PositionEvent, PositionSnapshot},
    identifiers::{AccountId, InstrumentId, PositionId, Venue},
    instruments::{Instrument, InstrumentAny},
    orders::Order,
    position::Position,
    types::{Currency, Money, Price},
};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use ustr::Ustr;

use crate::{config::PortfolioConfig, errors::PortfolioError, manager::AccountsManager};

/// Tracking state for the historical snapshots of a single position ID.
#[derive(Clone, Debug)]
struct SnapshotRecord {
    instrument_id: InstrumentId,
    processed_count: usize,
    sum_pnl: Option<Money>,
    last_pnl: Option<Money>,
}

/// Provides a portfolio which maintains net positions, realized and unrealized
/// PnL, net exposures and required margins across venues, accounts,
/// instruments and currencies.
///
/// Designed for single-threaded cooperative scheduling: the message bus
/// dispatches events serially to the handlers, each running to completion
/// before the next is invoked. The portfolio owns its caches and ledger
/// exclusively and borrows the shared cache read-mostly.
pub struct Portfolio {
    clock: Rc<RefCell<dyn Clock>>,
    cache: Rc<RefCell<Cache>>,
    config: PortfolioConfig,
    accounts: AccountsManager,
    net_positions: HashMap<InstrumentId, Decimal>,
    realized_pnls: HashMap<InstrumentId, Money>,
    unrealized_pnls: HashMap<InstrumentId, Money>,
    pending_calcs: HashSet<InstrumentId>,
    bet_positions: HashMap<PositionId, BetPosition>,
    snapshots: HashMap<PositionId, SnapshotRecord>,
    bar_close_prices: HashMap<InstrumentId, Price>,
    account_state_logged_ns: HashMap<AccountId, UnixNanos>,
    initialized: bool,
}

impl Portfolio {
    /// Creates a new [`Portfolio`] instance.
    #[must_use]
    pub fn new(
        cache: Rc<RefCell<Cache>>,
        clock: Rc<RefCell<dyn Clock>>,
        config: PortfolioConfig,
    ) -> Self {
        Self {
            clock,
            cache,
            config,
            accounts: AccountsManager::new(),
            net_positions: HashMap::new(),
            realized_pnls: HashMap::new(),
            unrealized_pnls: HashMap::new(),
            pending_calcs: HashSet::new(),
            bet_positions: HashMap::new(),
            snapshots: HashMap::new(),
            bar_close_prices: HashMap::new(),
            account_state_logged_ns: HashMap::new(),
            initialized: false,
        }
    }

    /// Wires the portfolio handlers into the message bus for the current thread.
    pub fn register_message_handlers(portfolio: Rc<RefCell<Self>>) {
        let bar_updates = portfolio.borrow().config.bar_updates;

        let p = portfolio.clone();
        msgbus::subscribe(
            "data.quotes.*",
            ShareableMessageHandler(Rc::new(TypedMessageHandler::new(
                Some("Portfolio.update_quote_tick"),
                move |quote: &QuoteTick| p.borrow_mut().update_quote_tick(quote),
            ))),
            Some(10),
        );

        if bar_updates {
            let p = portfolio.clone();
            msgbus::subscribe(
                "data.bars.*EXTERNAL",
                ShareableMessageHandler(Rc::new(TypedMessageHandler::new(
                    Some("Portfolio.update_bar"),
                    move |bar: &Bar| p.borrow_mut().update_bar(bar),
                ))),
                Some(10),
            );
        }

        let p = portfolio.clone();
        msgbus::subscribe(
            "data.mark_prices.*",
            ShareableMessageHandler(Rc::new(TypedMessageHandler::new(
                Some("Portfolio.update_mark_price"),
                move |mark: &MarkPriceUpdate| p.borrow_mut().update_mark_price(mark),
            ))),
            Some(10),
        );

        let p = portfolio.clone();
        msgbus::subscribe(
            "events.order.*",
            ShareableMessageHandler(Rc::new(TypedMessageHandler::new(
                Some("Portfolio.update_order"),
                move |event: &OrderEventAny| p.borrow_mut().update_order(event),
            ))),
            Some(10),
        );

        let p = portfolio.clone();
        msgbus::subscribe(
            "events.position.*",
            ShareableMessageHandler(Rc::new(TypedMessageHandler::new(
                Some("Portfolio.update_position"),
                move |event: &PositionEvent| p.borrow_mut().update_position(event),
            ))),
            Some(10),
        );

        let p = portfolio.clone();
        msgbus::subscribe(
            "events.account.*",
            ShareableMessageHandler(Rc::new(TypedMessageHandler::new(
                Some("Portfolio.update_account_events"),
                move |event: &AccountState| p.borrow_mut().update_account(event),
            ))),
            Some(10),
        );

        let p = portfolio;
        msgbus::register(
            "Portfolio.update_account",
            ShareableMessageHandler(Rc::new(TypedMessageHandler::new(
                Some("Portfolio.update_account"),
                move |event: &AccountState| p.borrow_mut().update_account(event),
            ))),
        );
    }

    /// Returns whether the portfolio has completed initialization.
    #[must_use]
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the instrument IDs with calculations pending on missing data.
    #[must_use]
    pub fn pending_calcs(&self) -> HashSet<InstrumentId> {
        self.pending_calcs.clone()
    }

    /// Resets the portfolio, clearing all stateful values.
    pub fn reset(&mut self) {
        self.net_positions.clear();
        self.realized_pnls.clear();
        self.unrealized_pnls.clear();
        self.pending_calcs.clear();
        self.bet_positions.clear();
        self.snapshots.clear();
        self.bar_close_prices.clear();
        self.account_state_logged_ns.clear();
        self.initialized = false;
        log::info!("Reset");
    }

    /// Disposes the portfolio (resets all stateful values).
    pub fn dispose(&mut self) {
        self.reset();
        log::info!("Disposed");
    }

    // -- INITIALIZATION --------------------------------------------------------------------------

    /// Initializes account balance locks and order margins from all open orders.
    pub fn initialize_orders(&mut self) {
        let ts_event = self.clock.borrow().timestamp_ns();
        let cache = self.cache.clone();

        let mut orders_by_instrument: HashMap<InstrumentId, Vec<Order>> = HashMap::new();
        {
            let cache = cache.borrow();
            for order in cache.orders_open(None, None) {
                orders_by_instrument
                    .entry(order.instrument_id)
                    .or_default()
                    .push(order.clone());
            }
        }

        let mut initialized = true;
        let mut account_updates: Vec<AccountAny> = Vec::new();

        for (instrument_id, orders) in &orders_by_instrument {
            let result = {
                let cache = cache.borrow();
                let Some(account) = cache.account_for_venue(&instrument_id.venue) else {
                    log::error!(
                        "Cannot update initial (order) margin: no account registered for {}",
                        instrument_id.venue
                    );
                    initialized = false;
                    break;
                };
                let Some(instrument) = cache.instrument(instrument_id) else {
                    log::error!(
                        "Cannot update initial (order) margin: no instrument for {instrument_id}"
                    );
                    initialized = false;
                    break;
                };

                let passive_orders: Vec<&Order> = orders
                    .iter()
                    .filter(|o| o.is_passive() && o.is_open())
                    .collect();

                self.accounts
                    .update_orders(account, instrument, &passive_orders, ts_event)
            };

            match result {
                Ok((updated_account, _)) => account_updates.push(updated_account),
                Err(e) => {
                    log::error!("Failed to update initial (order) margin: {e}");
                    initialized = false;
                }
            }
        }

        for account in account_updates {
            cache.borrow_mut().update_account(account);
        }

        let total_orders: usize = orders_by_instrument.values().map(Vec::len).sum();
        log::info!("Initialized {total_orders} open orders");
        self.initialized = initialized && self.pending_calcs.is_empty();
    }

    /// Initializes the net-position ledger, PnL caches and position margins
    /// from all open positions.
    pub fn initialize_positions(&mut self) {
        self.realized_pnls.clear();
        self.unrealized_pnls.clear();

        let ts_event = self.clock.borrow().timestamp_ns();
        let cache = self.cache.clone();

        let mut instrument_ids: HashSet<InstrumentId> = HashSet::new();
        let mut position_count = 0;
        {
            let cache = cache.borrow();
            for position in cache.positions_open(None, None) {
                instrument_ids.insert(position.instrument_id);
                position_count += 1;
            }
        }

        let mut initialized = true;

        for instrument_id in instrument_ids {
            self.update_net_position(instrument_id);

            if self.realized_pnl(&instrument_id).is_none() {
                initialized = false;
            }
            if self.unrealized_pnl(&instrument_id, None).is_none() {
                initialized = false;
            }

            let update = {
                let cache = cache.borrow();
                let Some(account) = cache.account_for_venue(&instrument_id.venue) else {
                    log::error!(
                        "Cannot update maintenance (position) margin: no account registered for {}",
                        instrument_id.venue
                    );
                    initialized = false;
                    continue;
                };
                if !account.is_margin_account() {
                    continue;
                }
                let Some(instrument) = cache.instrument(&instrument_id) else {
                    log::error!(
                        "Cannot update maintenance (position) margin: no instrument for {instrument_id}"
                    );
                    initialized = false;
                    continue;
                };
                let positions_open = cache.positions_open(None, Some(&instrument_id));
                self.accounts
                    .update_positions(account, instrument, &positions_open, ts_event)
            };

            match update {
                Ok((updated_account, _)) => cache.borrow_mut().update_account(updated_account),
                Err(e) => {
                    log::error!("Failed to update maintenance (position) margin: {e}");
                    initialized = false;
                }
            }
        }

        log::info!("Initialized {position_count} open positions");
        self.initialized = initialized && self.pending_calcs.is_empty();
    }

    // -- EVENT HANDLERS --------------------------------------------------------------------------

    /// Updates the portfolio with the given `quote`.
    pub fn update_quote_tick(&mut self, quote: &QuoteTick) {
        self.unrealized_pnls.remove(&quote.instrument_id);

        if self.initialized || !self.pending_calcs.contains(&quote.instrument_id) {
            return;
        }
        self.attempt_pending_calc(quote.instrument_id);
    }

    /// Updates the portfolio with the given `bar`, tracking the close price as
    /// a fallback for the pricing policy.
    pub fn update_bar(&mut self, bar: &Bar) {
        let instrument_id = bar.instrument_id();
        self.bar_close_prices.insert(instrument_id, bar.close);
        self.unrealized_pnls.remove(&instrument_id);

        if self.initialized || !self.pending_calcs.contains(&instrument_id) {
            return;
        }
        self.attempt_pending_calc(instrument_id);
    }

    /// Updates the portfolio with the given `mark` price update.
    ///
    /// Invalidates the unrealized PnL for the instrument and re-drives any
    /// pending calculation.
    pub fn update_mark_price(&mut self, mark: &MarkPriceUpdate) {
        self.unrealized_pnls.remove(&mark.instrument_id);

        if self.initialized || !self.pending_calcs.contains(&mark.instrument_id) {
            return;
        }
        self.attempt_pending_calc(mark.instrument_id);
    }

    /// Applies the given account state `event`, creating the account if unknown,
    /// and republishes the state.
    pub fn update_account(&mut self, event: &AccountState) {
        let cache = self.cache.clone();
        {
            let mut cache = cache.borrow_mut();
            if let Some(account) = cache.account(&event.account_id) {
                let mut account = account.clone();
                account.apply(event.clone());
                cache.update_account(account);
            } else {
                let account = AccountAny::new(event.clone(), false);
                cache.add_account(account);
            }
        }

        self.log_account_state_throttled(event);
        publish_account_state(event);
    }

    /// Updates the portfolio with the given order `event`.
    pub fn update_order(&mut self, event: &OrderEventAny) {
        let Some(account_id) = event.account_id() else {
            log::debug!(
                "Ignoring order event without account ID: {}",
                event.client_order_id()
            );
            return;
        };

        let ts_event = self.clock.borrow().timestamp_ns();
        let cache = self.cache.clone();
        let instrument_id = event.instrument_id();

        let (mut account, instrument, passive_orders) = {
            let cache = cache.borrow();
            let Some(account) = cache.account(&account_id) else {
                log::error!("Cannot update order: no account registered for {account_id}");
                return;
            };
            if !account.calculate_account_state() {
                return; // Nothing to calculate
            }
            if !matches!(
                event.event_type(),
                OrderEventType::Accepted
                    | OrderEventType::Canceled
                    | OrderEventType::Expired
                    | OrderEventType::Rejected
                    | OrderEventType::Updated
                    | OrderEventType::Filled
            ) {
                return;
            }
            if event.event_type() == OrderEventType::Rejected {
                let is_stop_limit = cache
                    .order(&event.client_order_id())
                    .is_some_and(|order| order.order_type == OrderType::StopLimit);
                if !is_stop_limit {
                    return; // No balance was locked
                }
            }

            let Some(instrument) = cache.instrument(&instrument_id) else {
                log::error!("Cannot update order: no instrument for {instrument_id}");
                return;
            };

            let passive_orders: Vec<Order> = cache
                .orders_open(None, Some(&instrument_id))
                .into_iter()
                .filter(|o| o.is_passive())
                .cloned()
                .collect();

            (account.clone(), *instrument, passive_orders)
        };

        let is_fill = matches!(event, OrderEventAny::Filled(_));

        if let OrderEventAny::Filled(fill) = event {
            match self.accounts.update_balances(&account, &instrument, fill) {
                Ok(updated) => {
                    account = updated;
                    cache.borrow_mut().update_account(account.clone());
                }
                Err(e) => log::error!("Failed to update account balances: {e}"),
            }

            if instrument.is_betting() {
                if let Some(position_id) = fill.position_id {
                    let bet = Bet::new(
                        fill.last_px.as_decimal(),
                        fill.last_qty.as_decimal(),
                        BetSide::from(fill.order_side),
                    );
                    self.bet_positions
                        .entry(position_id)
                        .or_default()
                        .add_bet(bet);
                    self.unrealized_pnls.remove(&instrument_id);
                } else {
                    log::error!("Cannot track bet position: fill without position ID");
                }
            }
        }

        let passive_order_refs: Vec<&Order> = passive_orders.iter().collect();
        match self
            .accounts
            .update_orders(&account, &instrument, &passive_order_refs, ts_event)
        {
            Ok((updated_account, _)) => {
                if !account.is_margin_account() || !is_fill {
                    account = updated_account;
                    cache.borrow_mut().update_account(account.clone());
                }
            }
            Err(e) => {
                log::error!("Failed to update account state: {e}");
                self.pending_calcs.insert(instrument_id);
            }
        }

        if let Some(state) = account.last_event() {
            publish_account_state(&state);
        }

        if self.config.debug {
            log::debug!("Updated {event:?}");
        }
    }

    /// Updates the portfolio with the given position `event`.
    pub fn update_position(&mut self, event: &PositionEvent) {
        let instrument_id = event.instrument_id();
        self.update_net_position(instrument_id);
        self.realized_pnls.remove(&instrument_id);
        self.unrealized_pnls.remove(&instrument_id);

        let ts_event = self.clock.borrow().timestamp_ns();
        let cache = self.cache.clone();
        let account_id = event.account_id();

        let update = {
            let cache = cache.borrow();
            let Some(account) = cache.account(&account_id) else {
                log::error!("Cannot update position: no account registered for {account_id}");
                return;
            };
            if account.is_margin_account() && account.calculate_account_state() {
                let Some(instrument) = cache.instrument(&instrument_id) else {
                    log::error!("Cannot update position: no instrument for {instrument_id}");
                    return;
                };
                let positions_open = cache.positions_open(None, Some(&instrument_id));
                match self
                    .accounts
                    .update_positions(account, instrument, &positions_open, ts_event)
                {
                    Ok((updated_account, state)) => Some((Some(updated_account), state)),
                    Err(e) => {
                        log::error!("Failed to update maintenance (position) margin: {e}");
                        account.last_event().map(|state| (None, state))
                    }
                }
            } else {
                account.last_event().map(|state| (None, state))
            }
        };

        if let Some((updated_account, state)) = update {
            if let Some(account) = updated_account {
                cache.borrow_mut().update_account(account);
            }
            publish_account_state(&state);
        }

        if self.config.debug {
            log::debug!("Updated {event:?}");
        }
    }

    // -- QUERIES ---------------------------------------------------------------------------------

    /// Returns the account registered for the given `venue` (if any).
    #[must_use]
    pub fn account(&self, venue: &Venue) -> Option<AccountAny> {
        let cache = self.cache.borrow();
        let account = cache.account_for_venue(venue);
        if account.is_none() {
            log::error!("Cannot get account: {}", PortfolioError::MissingAccount(*venue));
        }
        account.cloned()
    }

    /// Returns the locked balances for the given `venue` (if an account is registered).
    #[must_use]
    pub fn balances_locked(&self, venue: &Venue) -> Option<HashMap<Currency, Money>> {
        let cache = self.cache.borrow();
        match cache.account_for_venue(venue) {
            Some(account) => Some(account.balances_locked()),
            None => {
                log::error!(
                    "Cannot get balances locked: {}",
                    PortfolioError::MissingAccount(*venue)
                );
                None
            }
        }
    }

    /// Returns the initial (order) margins per currency for the given `venue`
    /// (`None` for cash accounts).
    #[must_use]
    pub fn margins_init(&self, venue: &Venue) -> Option<HashMap<Currency, Money>> {
        let cache = self.cache.borrow();
        match cache.account_for_venue(venue) {
            Some(AccountAny::Margin(margin)) => {
                let mut margins: HashMap<Currency, Money> = HashMap::new();
                for margin_init in margin.initial_margins().into_values() {
                    margins
                        .entry(margin_init.currency)
                        .and_modify(|total| *total += margin_init)
                        .or_insert(margin_init);
                }
                Some(margins)
            }
            Some(AccountAny::Cash(_)) => None,
            None => {
                log::error!(
                    "Cannot get initial margins: {}",
                    PortfolioError::MissingAccount(*venue)
                );
                None
            }
        }
    }

    /// Returns the maintenance (position) margins per currency for the given
    /// `venue` (`None` for cash accounts).
    #[must_use]
    pub fn margins_maint(&self, venue: &Venue) -> Option<HashMap<Currency, Money>> {
        let cache = self.cache.borrow();
        match cache.account_for_venue(venue) {
            Some(AccountAny::Margin(margin)) => {
                let mut margins: HashMap<Currency, Money> = HashMap::new();
                for margin_maint in margin.maintenance_margins().into_values() {
                    margins
                        .entry(margin_maint.currency)
                        .and_modify(|total| *total += margin_maint)
                        .or_insert(margin_maint);
                }
                Some(margins)
            }
            Some(AccountAny::Cash(_)) => None,
            None => {
                log::error!(
                    "Cannot get maintenance margins: {}",
                    PortfolioError::MissingAccount(*venue)
                );
                None
            }
        }
    }

    /// Returns the realized PnLs per currency for the given `venue`.
    ///
    /// Instruments whose realized PnL cannot yet be calculated are omitted.
    #[must_use]
    pub fn realized_pnls(&mut self, venue: &Venue) -> HashMap<Currency, Money> {
        let instrument_ids: HashSet<InstrumentId> = {
            let cache = self.cache.borrow();
            cache
                .positions(Some(venue), None)
                .iter()
                .map(|p| p.instrument_id)
                .collect()
        };

        let mut totals: HashMap<Currency, Money> = HashMap::new();
        for instrument_id in instrument_ids {
            if let Some(pnl) = self.realized_pnl(&instrument_id) {
                totals
                    .entry(pnl.currency)
                    .and_modify(|total| *total += pnl)
                    .or_insert(pnl);
            }
        }
        totals
    }

    /// Returns the unrealized PnLs per currency for the given `venue`.
    ///
    /// Instruments whose unrealized PnL cannot yet be calculated are omitted.
    #[must_use]
    pub fn unrealized_pnls(&mut self, venue: &Venue) -> HashMap<Currency, Money> {
        let instrument_ids: HashSet<InstrumentId> = {
            let cache = self.cache.borrow();
            cache
                .positions_open(Some(venue), None)
                .iter()
                .map(|p| p.instrument_id)
                .collect()
        };

        let mut totals: HashMap<Currency, Money> = HashMap::new();
        for instrument_id in instrument_ids {
            if let Some(pnl) = self.unrealized_pnl(&instrument_id, None) {
                totals
                    .entry(pnl.currency)
                    .and_modify(|total| *total += pnl)
                    .or_insert(pnl);
            }
        }
        totals
    }

    /// Returns the total PnLs (realized plus unrealized) per currency for the
    /// given `venue`.
    #[must_use]
    pub fn total_pnls(&mut self, venue: &Venue) -> HashMap<Currency, Money> {
        let mut totals = self.realized_pnls(venue);
        for (currency, pnl) in self.unrealized_pnls(venue) {
            totals
                .entry(currency)
                .and_modify(|total| *total += pnl)
                .or_insert(pnl);
        }
        totals
    }

    /// Returns the net exposures per currency for the given `venue` (if an
    /// account is registered).
    #[must_use]
    pub fn net_exposures(&mut self, venue: &Venue) -> Option<HashMap<Currency, Money>> {
        let instrument_ids: HashSet<InstrumentId> = {
            let cache = self.cache.borrow();
            if cache.account_for_venue(venue).is_none() {
                log::error!(
                    "Cannot get net exposures: {}",
                    PortfolioError::MissingAccount(*venue)
                );
                return None;
            }
            cache
                .positions_open(Some(venue), None)
                .iter()
                .map(|p| p.instrument_id)
                .collect()
        };

        let mut totals: HashMap<Currency, Money> = HashMap::new();
        for instrument_id in instrument_ids {
            if let Some(exposure) = self.net_exposure(&instrument_id, None) {
                totals
                    .entry(exposure.currency)
                    .and_modify(|total| *total += exposure)
                    .or_insert(exposure);
            }
        }
        Some(totals)
    }

    /// Returns the realized PnL for the given `instrument_id`, or `None` when
    /// the calculation cannot yet complete.
    #[must_use]
    pub fn realized_pnl(&mut self, instrument_id: &InstrumentId) -> Option<Money> {
        if let Some(pnl) = self.realized_pnls.get(instrument_id) {
            return Some(*pnl);
        }
        match self.calculate_realized_pnl(instrument_id) {
            Ok(pnl) => {
                self.realized_pnls.insert(*instrument_id, pnl);
                Some(pnl)
            }
            Err(e) => {
                log::error!("Cannot calculate realized PnL: {e}");
                if requires_market_data(&e) {
                    self.pending_calcs.insert(*instrument_id);
                }
                None
            }
        }
    }

    /// Returns the unrealized PnL for the given `instrument_id`, or `None`
    /// when the calculation cannot yet complete.
    ///
    /// When an explicit `price` is given, the pricing policy and the PnL cache
    /// are both bypassed.
    #[must_use]
    pub fn unrealized_pnl(
        &mut self,
        instrument_id: &InstrumentId,
        price: Option<Price>,
    ) -> Option<Money> {
        if price.is_none()
            && let Some(pnl) = self.unrealized_pnls.get(instrument_id)
        {
            return Some(*pnl);
        }
        match self.calculate_unrealized_pnl(instrument_id, price) {
            Ok(pnl) => {
                if price.is_none() {
                    self.unrealized_pnls.insert(*instrument_id, pnl);
                }
                Some(pnl)
            }
            Err(e) => {
                log::error!("Cannot calculate unrealized PnL: {e}");
                if requires_market_data(&e) {
                    self.pending_calcs.insert(*instrument_id);
                }
                None
            }
        }
    }

    /// Returns the total PnL (realized plus unrealized) for the given
    /// `instrument_id`, or `None` when either calculation cannot yet complete.
    #[must_use]
    pub fn total_pnl(
        &mut self,
        instrument_id: &InstrumentId,
        price: Option<Price>,
    ) -> Option<Money> {
        let realized = self.realized_pnl(instrument_id)?;
        let unrealized = self.unrealized_pnl(instrument_id, price)?;
        Some(realized + unrealized)
    }

    /// Returns the net exposure for the given `instrument_id`, or `None` when
    /// the calculation cannot yet complete.
    ///
    /// Open positions without a resolvable price are skipped (and marked
    /// pending); a missing exchange rate aborts the whole calculation.
    #[must_use]
    pub fn net_exposure(
        &mut self,
        instrument_id: &InstrumentId,
        price: Option<Price>,
    ) -> Option<Money> {
        match self.calculate_net_exposure(instrument_id, price) {
            Ok(exposure) => Some(exposure),
            Err(e) => {
                log::error!("Cannot calculate net exposure: {e}");
                None
            }
        }
    }

    /// Returns the net position for the given `instrument_id` (zero when flat
    /// or unknown).
    #[must_use]
    pub fn net_position(&self, instrument_id: &InstrumentId) -> Decimal {
        self.net_positions
            .get(instrument_id)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns whether the portfolio is net long the given `instrument_id`.
    #[must_use]
    pub fn is_net_long(&self, instrument_id: &InstrumentId) -> bool {
        self.net_position(instrument_id) > Decimal::ZERO
    }

    /// Returns whether the portfolio is net short the given `instrument_id`.
    #[must_use]
    pub fn is_net_short(&self, instrument_id: &InstrumentId) -> bool {
        self.net_position(instrument_id) < Decimal::ZERO
    }

    /// Returns whether the portfolio is flat the given `instrument_id`.
    #[must_use]
    pub fn is_flat(&self, instrument_id: &InstrumentId) -> bool {
        self.net_position(instrument_id) == Decimal::ZERO
    }

    /// Returns whether the portfolio is completely flat (no net position in
    /// any instrument).
    #[must_use]
    pub fn is_completely_flat(&self) -> bool {
        self.net_positions
            .values()
            .all(|net_position| *net_position == Decimal::ZERO)
    }

    // -- INTERNAL --------------------------------------------------------------------------------

    fn update_net_position(&mut self, instrument_id: InstrumentId) {
        let net_position = {
            let cache = self.cache.borrow();
            cache
                .positions_open(None, Some(&instrument_id))
                .iter()
                .fold(Decimal::ZERO, |acc, position| {
                    acc + Decimal::from_f64(position.signed_qty).unwrap_or(Decimal::ZERO)
                })
        };

        let existing = self
            .net_positions
            .get(&instrument_id)
            .copied()
            .unwrap_or(Decimal::ZERO);
        if existing != net_position {
            self.net_positions.insert(instrument_id, net_position);
            log::info!("{instrument_id} net_position={net_position}");
        }
    }

    /// Re-drives a pending calculation for `instrument_id` now that new market
    /// data has arrived.
    fn attempt_pending_calc(&mut self, instrument_id: InstrumentId) {
        let ts_event = self.clock.borrow().timestamp_ns();
        let cache = self.cache.clone();

        let (account, instrument, passive_orders, is_margin) = {
            let cache = cache.borrow();
            let Some(account) = cache.account_for_venue(&instrument_id.venue) else {
                log::error!(
                    "Cannot complete pending calculation: {}",
                    PortfolioError::MissingAccount(instrument_id.venue)
                );
                return;
            };
            let Some(instrument) = cache.instrument(&instrument_id) else {
                log::error!(
                    "Cannot complete pending calculation: {}",
                    PortfolioError::MissingInstrument(instrument_id)
                );
                return;
            };
            let passive_orders: Vec<Order> = cache
                .orders_open(None, Some(&instrument_id))
                .into_iter()
                .filter(|o| o.is_passive())
                .cloned()
                .collect();
            (
                account.clone(),
                *instrument,
                passive_orders,
                account.is_margin_account(),
            )
        };

        let passive_order_refs: Vec<&Order> = passive_orders.iter().collect();
        let result_init =
            self.accounts
                .update_orders(&account, &instrument, &passive_order_refs, ts_event);

        let mut account_after = match &result_init {
            Ok((updated_account, _)) => updated_account.clone(),
            Err(_) => account,
        };

        let mut result_maint_ok = true;
        if is_margin {
            let update = {
                let cache = cache.borrow();
                let positions_open = cache.positions_open(None, Some(&instrument_id));
                self.accounts.update_positions(
                    &account_after,
                    &instrument,
                    &positions_open,
                    ts_event,
                )
            };
            match update {
                Ok((updated_account, _)) => account_after = updated_account,
                Err(e) => {
                    log::debug!("Pending maintenance margin update failed: {e}");
                    result_maint_ok = false;
                }
            }
        }

        let result_unrealized = self.calculate_unrealized_pnl(&instrument_id, None).ok();

        // For cash accounts the order updates suffice; margin accounts also
        // require the margin updates and a resolvable unrealized PnL
        let success = if is_margin {
            result_init.is_ok() && result_maint_ok && result_unrealized.is_some()
        } else {
            result_init.is_ok()
        };

        if success {
            cache.borrow_mut().update_account(account_after);
            if let Some(pnl) = result_unrealized {
                self.unrealized_pnls.insert(instrument_id, pnl);
            }
            self.pending_calcs.remove(&instrument_id);
            if self.pending_calcs.is_empty() {
                self.initialized = true;
            }
        }
    }

    /// Synchronizes the snapshot tracking records with the snapshots currently
    /// held in the cache.
    fn update_snapshots(&mut self) {
        let cache = self.cache.clone();
        let cache = cache.borrow();
        let current_ids = cache.position_snapshot_ids();

        // A snapshot count regression indicates a purge: rebuild from scratch
        let purged = self.snapshots.iter().any(|(position_id, record)| {
            cache.position_snapshots(position_id).len() < record.processed_count
        });
        if purged {
            log::info!("Snapshot count regression detected: rebuilding snapshot records");
            self.snapshots.clear();
        }

        for position_id in &current_ids {
            let blobs = cache.position_snapshots(position_id);
            let processed = self
                .snapshots
                .get(position_id)
                .map_or(0, |record| record.processed_count);
            if blobs.len() <= processed {
                continue;
            }

            for blob in &blobs[processed..] {
                let snapshot: PositionSnapshot = match serde_json::from_slice(blob) {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        log::error!("Failed to deserialize position snapshot: {e}");
                        continue;
                    }
                };
                let record = self
                    .snapshots
                    .entry(*position_id)
                    .or_insert_with(|| SnapshotRecord {
                        instrument_id: snapshot.instrument_id,
                        processed_count: 0,
                        sum_pnl: None,
                        last_pnl: None,
                    });
                if let Some(pnl) = snapshot.realized_pnl {
                    record.sum_pnl = Some(match record.sum_pnl {
                        Some(sum) => sum + pnl,
                        None => pnl,
                    });
                    record.last_pnl = Some(pnl);
                }
            }
            self.snapshots
                .entry(*position_id)
                .and_modify(|record| record.processed_count = blobs.len());
        }

        // Prune records for position IDs no longer in the snapshot set
        self.snapshots
            .retain(|position_id, _| current_ids.contains(position_id));
    }

    /// Calculates the total realized PnL for `instrument_id`, combining
    /// historical snapshot cycles with the live position state.
    fn calculate_realized_pnl(
        &mut self,
        instrument_id: &InstrumentId,
    ) -> Result<Money, PortfolioError> {
        self.update_snapshots();

        let cache = self.cache.clone();
        let cache = cache.borrow();
        let account = cache
            .account_for_venue(&instrument_id.venue)
            .ok_or(PortfolioError::MissingAccount(instrument_id.venue))?;
        let instrument = cache
            .instrument(instrument_id)
            .ok_or(PortfolioError::MissingInstrument(*instrument_id))?;
        let currency = self.pnl_currency(account, instrument);

        let mut total_pnl = 0.0;
        let mut fully_handled: HashSet<PositionId> = HashSet::new();

        // First pass: historical snapshot cycles per position ID
        for (position_id, record) in &self.snapshots {
            if record.instrument_id != *instrument_id {
                continue;
            }
            let Some(sum_pnl) = record.sum_pnl else {
                fully_handled.insert(*position_id);
                continue;
            };

            let contribution = match cache.position(position_id) {
                None => {
                    // Position fully historical
                    fully_handled.insert(*position_id);
                    sum_pnl
                }
                Some(position) if position.is_open() => sum_pnl,
                Some(position) => {
                    // Closed: when the live realized PnL equals the most recent
                    // snapshot the last cycle is already recorded, so back it
                    // out (the live value is added in the second pass)
                    if position.realized_pnl.is_some() && position.realized_pnl == record.last_pnl {
                        sum_pnl - record.last_pnl.unwrap()
                    } else {
                        sum_pnl
                    }
                }
            };

            let xrate = self
                .xrate_to_target(
                    &cache,
                    instrument_id.venue,
                    contribution.currency,
                    currency,
                    OrderSide::Buy,
                )
                .ok_or(PortfolioError::NoExchangeRate {
                    from_currency: contribution.currency,
                    to_currency: currency,
                })?;
            total_pnl += contribution.as_f64() * xrate;
        }

        // Second pass: live positions (open and closed) for the instrument
        for position in cache.positions(None, Some(instrument_id)) {
            if fully_handled.contains(&position.id) {
                continue;
            }

            let pnl = if instrument.is_betting() {
                let bet_position = self
                    .bet_positions
                    .get(&position.id)
                    .ok_or(PortfolioError::MissingBetPosition(position.id))?;
                Money::new(
                    bet_position.realized_pnl().to_f64().unwrap_or(0.0),
                    instrument.settlement_currency(),
                )
            } else {
                match position.realized_pnl {
                    Some(pnl) => pnl,
                    None => continue,
                }
            };

            let xrate = self
                .xrate_to_target(
                    &cache,
                    instrument_id.venue,
                    pnl.currency,
                    currency,
                    position.entry,
                )
                .ok_or(PortfolioError::NoExchangeRate {
                    from_currency: pnl.currency,
                    to_currency: currency,
                })?;
            total_pnl += pnl.as_f64() * xrate;
        }

        if self.config.debug {
            log::debug!("Calculated realized PnL for {instrument_id}: {total_pnl} {currency}");
        }
        Ok(Money::new(total_pnl, currency))
    }

    /// Calculates the unrealized PnL for `instrument_id` over its open
    /// positions, using the given explicit `price` when provided.
    fn calculate_unrealized_pnl(
        &mut self,
        instrument_id: &InstrumentId,
        price: Option<Price>,
    ) -> Result<Money, PortfolioError> {
        let cache = self.cache.clone();
        let cache = cache.borrow();
        let account = cache
            .account_for_venue(&instrument_id.venue)
            .ok_or(PortfolioError::MissingAccount(instrument_id.venue))?;
        let instrument = cache
            .instrument(instrument_id)
            .ok_or(PortfolioError::MissingInstrument(*instrument_id))?;
        let currency = self.pnl_currency(account, instrument);

        let positions_open = cache.positions_open(None, Some(instrument_id));
        if positions_open.is_empty() {
            return Ok(Money::zero(currency));
        }

        let mut total_pnl = 0.0;
        for position in positions_open {
            let position_price = price
                .or_else(|| self.get_price(&cache, position))
                .ok_or(PortfolioError::NoPrice(*instrument_id))?;

            let pnl = if instrument.is_betting() {
                let bet_position = self
                    .bet_positions
                    .get(&position.id)
                    .ok_or(PortfolioError::MissingBetPosition(position.id))?;
                let unrealized = bet_position.unrealized_pnl(position_price.as_decimal());
                Money::new(
                    unrealized.to_f64().unwrap_or(0.0),
                    instrument.settlement_currency(),
                )
            } else {
                position.unrealized_pnl(position_price)
            };

            let xrate = self
                .xrate_to_target(
                    &cache,
                    instrument_id.venue,
                    pnl.currency,
                    currency,
                    position.entry,
                )
                .ok_or(PortfolioError::NoExchangeRate {
                    from_currency: pnl.currency,
                    to_currency: currency,
                })?;
            total_pnl += pnl.as_f64() * xrate;
        }

        if self.config.debug {
            log::debug!("Calculated unrealized PnL for {instrument_id}: {total_pnl} {currency}");
        }
        Ok(Money::new(total_pnl, currency))
    }

    /// Calculates the net exposure for `instrument_id` over its open positions.
    fn calculate_net_exposure(
        &mut self,
        instrument_id: &InstrumentId,
        price: Option<Price>,
    ) -> Result<Money, PortfolioError> {
        let cache = self.cache.clone();
        let cache = cache.borrow();
        let account = cache
            .account_for_venue(&instrument_id.venue)
            .ok_or(PortfolioError::MissingAccount(instrument_id.venue))?;
        let instrument = cache
            .instrument(instrument_id)
            .ok_or(PortfolioError::MissingInstrument(*instrument_id))?;
        let currency = self.pnl_currency(account, instrument);

        let mut net_exposure = 0.0;
        for position in cache.positions_open(None, Some(instrument_id)) {
            if instrument.is_betting() {
                let bet_position = self
                    .bet_positions
                    .get(&position.id)
                    .ok_or(PortfolioError::MissingBetPosition(position.id))?;
                let exposure = bet_position.exposure().to_f64().unwrap_or(0.0);
                let xrate = self
                    .xrate_to_target(
                        &cache,
                        instrument_id.venue,
                        instrument.settlement_currency(),
                        currency,
                        position.entry,
                    )
                    .ok_or(PortfolioError::NoExchangeRate {
                        from_currency: instrument.settlement_currency(),
                        to_currency: currency,
                    })?;
                net_exposure += exposure * xrate;
            } else {
                let Some(position_price) = price.or_else(|| self.get_price(&cache, position))
                else {
                    // Skip this position until a price arrives
                    self.pending_calcs.insert(*instrument_id);
                    continue;
                };
                let notional = position.notional_value(position_price);
                let xrate = self
                    .xrate_to_target(
                        &cache,
                        instrument_id.venue,
                        notional.currency,
                        currency,
                        position.entry,
                    )
                    .ok_or(PortfolioError::NoExchangeRate {
                        from_currency: notional.currency,
                        to_currency: currency,
                    })?;
                net_exposure += notional.as_f64() * xrate;
            }
        }
        Ok(Money::new(net_exposure, currency))
    }

    /// Selects the reference price for an open position per the pricing policy.
    fn get_price(&self, cache: &Cache, position: &Position) -> Option<Price> {
        let instrument_id = &position.instrument_id;
        let price_type = if self.config.use_mark_prices {
            PriceType::Mark
        } else {
            match position.side {
                PositionSide::Long => PriceType::Bid,
                PositionSide::Short => PriceType::Ask,
                _ => PriceType::Last,
            }
        };

        cache
            .price(instrument_id, price_type)
            .or_else(|| cache.price(instrument_id, PriceType::Last))
            .or_else(|| self.bar_close_prices.get(instrument_id).copied())
    }

    /// Resolves the exchange rate from `from_currency` into `to_currency`.
    fn xrate_to_target(
        &self,
        cache: &Cache,
        venue: Venue,
        from_currency: Currency,
        to_currency: Currency,
        side: OrderSide,
    ) -> Option<f64> {
        if !self.config.convert_to_account_base_currency || from_currency == to_currency {
            return Some(1.0);
        }
        if self.config.use_mark_xrates {
            return cache.get_mark_xrate(from_currency, to_currency);
        }
        let price_type = if side == OrderSide::Buy {
            PriceType::Bid
        } else {
            PriceType::Ask
        };
        cache.get_xrate(venue, from_currency, to_currency, price_type)
    }

    /// Returns the currency in which PnL for the instrument is reported.
    fn pnl_currency(&self, account: &AccountAny, instrument: &InstrumentAny) -> Currency {
        if self.config.convert_to_account_base_currency {
            account
                .base_currency()
                .unwrap_or_else(|| instrument.settlement_currency())
        } else {
            instrument.settlement_currency()
        }
    }

    fn log_account_state_throttled(&mut self, event: &AccountState) {
        let now = self.clock.borrow().timestamp_ns();
        let interval_ns = millis_to_nanos(self.config.min_account_state_logging_interval_ms as f64);
        let last = self.account_state_logged_ns.get(&event.account_id).copied();

        let should_log = match last {
            Some(last) => now.as_u64() >= last.as_u64() + interval_ns,
            None => true,
        };
        if should_log {
            log::info!("{event}");
            self.account_state_logged_ns.insert(event.account_id, now);
        } else {
            log::debug!("{event}");
        }
    }
}

/// Returns whether the error kind resolves once market data arrives.
fn requires_market_data(error: &PortfolioError) -> bool {
    matches!(
        error,
        PortfolioError::NoPrice(_) | PortfolioError::NoExchangeRate { .. }
    )
}

/// Publishes the given account `state` to `events.account.{account_id}`.
fn publish_account_state(state: &AccountState) {
    let topic = Ustr::from(&format!("events.account.{}", state.account_id));
    msgbus::publish(&topic, state);
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests;
