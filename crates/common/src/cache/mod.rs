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

//! A common in-memory `Cache` for market and execution related data.
//!
//! The cache is shared by reference between components: writers (the data and
//! execution engines) mutate it between handler invocations, readers (such as
//! the portfolio) treat it as a consistent snapshot for the duration of one
//! handler.

mod index;

use std::collections::{HashMap, HashSet, VecDeque};

use bytes::Bytes;
use index::CacheIndex;
use meridian_model::{
    accounts::AccountAny,
    data::{Bar, BarType, MarkPriceUpdate, QuoteTick, TradeTick},
    enums::PriceType,
    identifiers::{AccountId, ClientOrderId, InstrumentId, PositionId, Venue},
    instruments::{Instrument, InstrumentAny},
    orders::Order,
    position::Position,
    types::{Currency, Price},
};

use crate::xrate::get_exchange_rate;

/// Configuration for `Cache` instances.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// The maximum number of quotes/trades/mark prices retained per instrument.
    pub tick_capacity: usize,
    /// The maximum number of bars retained per bar type.
    pub bar_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            tick_capacity: 1024,
            bar_capacity: 1024,
        }
    }
}

/// A common in-memory cache of market and execution related data.
#[derive(Debug, Default)]
pub struct Cache {
    config: CacheConfig,
    index: CacheIndex,
    quotes: HashMap<InstrumentId, VecDeque<QuoteTick>>,
    trades: HashMap<InstrumentId, VecDeque<TradeTick>>,
    bars: HashMap<BarType, VecDeque<Bar>>,
    mark_prices: HashMap<InstrumentId, VecDeque<MarkPriceUpdate>>,
    mark_xrates: HashMap<(Currency, Currency), f64>,
    instruments: HashMap<InstrumentId, InstrumentAny>,
    accounts: HashMap<AccountId, AccountAny>,
    orders: HashMap<ClientOrderId, Order>,
    positions: HashMap<PositionId, Position>,
    position_snapshots: HashMap<PositionId, Vec<Bytes>>,
}

impl Cache {
    /// Creates a new [`Cache`] instance with the given `config`.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Resets the cache, clearing all stateful values.
    pub fn reset(&mut self) {
        self.index.clear();
        self.quotes.clear();
        self.trades.clear();
        self.bars.clear();
        self.mark_prices.clear();
        self.mark_xrates.clear();
        self.instruments.clear();
        self.accounts.clear();
        self.orders.clear();
        self.positions.clear();
        self.position_snapshots.clear();
        log::debug!("Reset cache");
    }

    // -- DATA COMMANDS ---------------------------------------------------------------------------

    /// Adds the given `quote` to the cache.
    pub fn add_quote(&mut self, quote: QuoteTick) {
        let quotes = self
            .quotes
            .entry(quote.instrument_id)
            .or_insert_with(|| VecDeque::with_capacity(self.config.tick_capacity));
        if quotes.len() == self.config.tick_capacity {
            quotes.pop_back();
        }
        quotes.push_front(quote);
    }

    /// Adds the given `trade` to the cache.
    pub fn add_trade(&mut self, trade: TradeTick) {
        let trades = self
            .trades
            .entry(trade.instrument_id)
            .or_insert_with(|| VecDeque::with_capacity(self.config.tick_capacity));
        if trades.len() == self.config.tick_capacity {
            trades.pop_back();
        }
        trades.push_front(trade);
    }

    /// Adds the given `bar` to the cache.
    pub fn add_bar(&mut self, bar: Bar) {
        let bars = self
            .bars
            .entry(bar.bar_type)
            .or_insert_with(|| VecDeque::with_capacity(self.config.bar_capacity));
        if bars.len() == self.config.bar_capacity {
            bars.pop_back();
        }
        bars.push_front(bar);
    }

    /// Adds the given `mark_price` update to the cache.
    pub fn add_mark_price(&mut self, mark_price: MarkPriceUpdate) {
        let mark_prices = self
            .mark_prices
            .entry(mark_price.instrument_id)
            .or_insert_with(|| VecDeque::with_capacity(self.config.tick_capacity));
        if mark_prices.len() == self.config.tick_capacity {
            mark_prices.pop_back();
        }
        mark_prices.push_front(mark_price);
    }

    /// Adds the given `instrument` to the cache.
    pub fn add_instrument(&mut self, instrument: InstrumentAny) {
        self.instruments.insert(instrument.id(), instrument);
    }

    // -- EXECUTION COMMANDS ----------------------------------------------------------------------

    /// Adds the given `account` to the cache, indexed by its issuer venue.
    pub fn add_account(&mut self, account: AccountAny) {
        let account_id = account.id();
        self.index
            .venue_account
            .insert(account_id.get_issuer(), account_id);
        self.accounts.insert(account_id, account);
    }

    /// Replaces the cached state for the given `account`.
    pub fn update_account(&mut self, account: AccountAny) {
        self.accounts.insert(account.id(), account);
    }

    /// Adds the given `order` to the cache, updating the indexes.
    pub fn add_order(&mut self, order: Order) {
        let client_order_id = order.client_order_id;
        self.index
            .instrument_orders
            .entry(order.instrument_id)
            .or_default()
            .insert(client_order_id);
        self.update_order_status_index(&order);
        self.orders.insert(client_order_id, order);
    }

    /// Replaces the cached state for the given `order`, updating the indexes.
    pub fn update_order(&mut self, order: Order) {
        self.update_order_status_index(&order);
        self.orders.insert(order.client_order_id, order);
    }

    fn update_order_status_index(&mut self, order: &Order) {
        if order.is_open() {
            self.index.orders_closed.remove(&order.client_order_id);
            self.index.orders_open.insert(order.client_order_id);
        } else if order.is_closed() {
            self.index.orders_open.remove(&order.client_order_id);
            self.index.orders_closed.insert(order.client_order_id);
        }
    }

    /// Adds the given `position` to the cache, updating the indexes.
    pub fn add_position(&mut self, position: Position) {
        let position_id = position.id;
        self.index
            .instrument_positions
            .entry(position.instrument_id)
            .or_default()
            .insert(position_id);
        self.update_position_status_index(&position);
        self.positions.insert(position_id, position);
    }

    /// Replaces the cached state for the given `position`, updating the indexes.
    pub fn update_position(&mut self, position: Position) {
        self.update_position_status_index(&position);
        self.positions.insert(position.id, position);
    }

    fn update_position_status_index(&mut self, position: &Position) {
        if position.is_open() {
            self.index.positions_closed.remove(&position.id);
            self.index.positions_open.insert(position.id);
        } else {
            self.index.positions_open.remove(&position.id);
            self.index.positions_closed.insert(position.id);
        }
    }

    /// Removes the position and any snapshots for the given `position_id`.
    pub fn purge_position(&mut self, position_id: PositionId) {
        if let Some(position) = self.positions.remove(&position_id)
            && let Some(ids) = self.index.instrument_positions.get_mut(&position.instrument_id)
        {
            ids.remove(&position_id);
        }
        self.index.positions_open.remove(&position_id);
        self.index.positions_closed.remove(&position_id);
        self.position_snapshots.remove(&position_id);
    }

    /// Adds a serialized position snapshot blob for the given `position_id`.
    pub fn add_position_snapshot(&mut self, position_id: PositionId, snapshot: Bytes) {
        self.position_snapshots
            .entry(position_id)
            .or_default()
            .push(snapshot);
    }

    /// Replaces all snapshot blobs for the given `position_id`.
    pub fn set_position_snapshots(&mut self, position_id: PositionId, snapshots: Vec<Bytes>) {
        if snapshots.is_empty() {
            self.position_snapshots.remove(&position_id);
        } else {
            self.position_snapshots.insert(position_id, snapshots);
        }
    }

    // -- DATA QUERIES ----------------------------------------------------------------------------

    /// Returns the price for the given `instrument_id` and `price_type` (if found).
    #[must_use]
    pub fn price(&self, instrument_id: &InstrumentId, price_type: PriceType) -> Option<Price> {
        match price_type {
            PriceType::Bid => self
                .quotes
                .get(instrument_id)
                .and_then(|quotes| quotes.front().map(|quote| quote.bid_price)),
            PriceType::Ask => self
                .quotes
                .get(instrument_id)
                .and_then(|quotes| quotes.front().map(|quote| quote.ask_price)),
            PriceType::Mid => self.quotes.get(instrument_id).and_then(|quotes| {
                quotes.front().map(|quote| {
                    Price::new(
                        f64::midpoint(quote.ask_price.as_f64(), quote.bid_price.as_f64()),
                        quote.bid_price.precision + 1,
                    )
                })
            }),
            PriceType::Last => self
                .trades
                .get(instrument_id)
                .and_then(|trades| trades.front().map(|trade| trade.price)),
            PriceType::Mark => self
                .mark_prices
                .get(instrument_id)
                .and_then(|marks| marks.front().map(|mark| mark.value)),
        }
    }

    /// Returns the latest quote for the given `instrument_id` (if found).
    #[must_use]
    pub fn quote(&self, instrument_id: &InstrumentId) -> Option<&QuoteTick> {
        self.quotes
            .get(instrument_id)
            .and_then(|quotes| quotes.front())
    }

    /// Returns the latest trade for the given `instrument_id` (if found).
    #[must_use]
    pub fn trade(&self, instrument_id: &InstrumentId) -> Option<&TradeTick> {
        self.trades
            .get(instrument_id)
            .and_then(|trades| trades.front())
    }

    /// Returns the latest bar for the given `bar_type` (if found).
    #[must_use]
    pub fn bar(&self, bar_type: &BarType) -> Option<&Bar> {
        self.bars.get(bar_type).and_then(|bars| bars.front())
    }

    /// Returns the latest mark price update for the given `instrument_id` (if found).
    #[must_use]
    pub fn mark_price(&self, instrument_id: &InstrumentId) -> Option<&MarkPriceUpdate> {
        self.mark_prices
            .get(instrument_id)
            .and_then(|marks| marks.front())
    }

    /// Returns the calculated exchange rate between the given currencies,
    /// derived from quotes (falling back to bid/ask bars) for the `venue`.
    #[must_use]
    pub fn get_xrate(
        &self,
        venue: Venue,
        from_currency: Currency,
        to_currency: Currency,
        price_type: PriceType,
    ) -> Option<f64> {
        if from_currency == to_currency {
            return Some(1.0);
        }

        let (bid_quotes, ask_quotes) = self.build_quote_table(&venue);

        match get_exchange_rate(
            from_currency.code,
            to_currency.code,
            price_type,
            bid_quotes,
            ask_quotes,
        ) {
            Ok(rate) => rate,
            Err(e) => {
                log::error!("Failed to calculate xrate: {e}");
                None
            }
        }
    }

    fn build_quote_table(&self, venue: &Venue) -> (HashMap<String, f64>, HashMap<String, f64>) {
        let mut bid_quotes = HashMap::new();
        let mut ask_quotes = HashMap::new();

        for instrument_id in self.instruments.keys() {
            if instrument_id.venue != *venue {
                continue;
            }

            let (bid_price, ask_price) = if let Some(ticks) = self.quotes.get(instrument_id) {
                match ticks.front() {
                    Some(tick) => (tick.bid_price, tick.ask_price),
                    None => continue,
                }
            } else {
                let bid_bar = self
                    .bars
                    .iter()
                    .find(|(k, _)| {
                        k.instrument_id() == *instrument_id
                            && matches!(k.spec().price_type, PriceType::Bid)
                    })
                    .and_then(|(_, v)| v.front());
                let ask_bar = self
                    .bars
                    .iter()
                    .find(|(k, _)| {
                        k.instrument_id() == *instrument_id
                            && matches!(k.spec().price_type, PriceType::Ask)
                    })
                    .and_then(|(_, v)| v.front());

                match (bid_bar, ask_bar) {
                    (Some(bid), Some(ask)) => (bid.close, ask.close),
                    _ => continue,
                }
            };

            bid_quotes.insert(instrument_id.symbol.to_string(), bid_price.as_f64());
            ask_quotes.insert(instrument_id.symbol.to_string(), ask_price.as_f64());
        }

        (bid_quotes, ask_quotes)
    }

    /// Returns the mark exchange rate for the given currency pair, or `None` if not set.
    #[must_use]
    pub fn get_mark_xrate(&self, from_currency: Currency, to_currency: Currency) -> Option<f64> {
        self.mark_xrates.get(&(from_currency, to_currency)).copied()
    }

    /// Sets the mark exchange rate for the given currency pair and automatically
    /// sets the inverse rate.
    ///
    /// # Panics
    ///
    /// Panics if `xrate` is not positive.
    pub fn set_mark_xrate(&mut self, from_currency: Currency, to_currency: Currency, xrate: f64) {
        assert!(xrate > 0.0, "xrate was zero");
        self.mark_xrates.insert((from_currency, to_currency), xrate);
        self.mark_xrates
            .insert((to_currency, from_currency), 1.0 / xrate);
    }

    /// Clears the mark exchange rate for the given currency pair.
    pub fn clear_mark_xrate(&mut self, from_currency: Currency, to_currency: Currency) {
        let _ = self.mark_xrates.remove(&(from_currency, to_currency));
    }

    /// Clears all mark exchange rates.
    pub fn clear_mark_xrates(&mut self) {
        self.mark_xrates.clear();
    }

    // -- INSTRUMENT QUERIES ----------------------------------------------------------------------

    /// Returns a reference to the instrument for the given `instrument_id` (if found).
    #[must_use]
    pub fn instrument(&self, instrument_id: &InstrumentId) -> Option<&InstrumentAny> {
        self.instruments.get(instrument_id)
    }

    /// Returns the instrument IDs for the given `venue` (all when `None`).
    #[must_use]
    pub fn instrument_ids(&self, venue: Option<&Venue>) -> Vec<&InstrumentId> {
        self.instruments
            .keys()
            .filter(|instrument_id| venue.is_none_or(|v| instrument_id.venue == *v))
            .collect()
    }

    // -- ACCOUNT QUERIES -------------------------------------------------------------------------

    /// Returns a reference to the account for the given `account_id` (if found).
    #[must_use]
    pub fn account(&self, account_id: &AccountId) -> Option<&AccountAny> {
        self.accounts.get(account_id)
    }

    /// Returns a reference to the account registered for the given `venue` (if any).
    #[must_use]
    pub fn account_for_venue(
        &self,
        venue: &Venue,
    ) -> Option<&AccountAny> {
        self.index
            .venue_account
            .get(venue)
            .and_then(|account_id| self.accounts.get(account_id))
    }

    /// Returns the account ID registered for the given `venue` (if any).
    #[must_use]
    pub fn account_id(&self, venue: &Venue) -> Option<&AccountId> {
        self.index.venue_account.get(venue)
    }

    // -- ORDER QUERIES ---------------------------------------------------------------------------

    /// Returns a reference to the order for the given `client_order_id` (if found).
    #[must_use]
    pub fn order(&self, client_order_id: &ClientOrderId) -> Option<&Order> {
        self.orders.get(client_order_id)
    }

    /// Returns all open orders, optionally filtered by venue and/or instrument.
    #[must_use]
    pub fn orders_open(
        &self,
        venue: Option<&Venue>,
        instrument_id: Option<&InstrumentId>,
    ) -> Vec<&Order> {
        self.index
            .orders_open
            .iter()
            .filter_map(|client_order_id| self.orders.get(client_order_id))
            .filter(|order| {
                venue.is_none_or(|v| order.instrument_id.venue == *v)
                    && instrument_id.is_none_or(|id| order.instrument_id == *id)
            })
            .collect()
    }

    // -- POSITION QUERIES ------------------------------------------------------------------------

    /// Returns a reference to the position for the given `position_id` (if found).
    #[must_use]
    pub fn position(&self, position_id: &PositionId) -> Option<&Position> {
        self.positions.get(position_id)
    }

    /// Returns whether a position exists for the given `position_id`.
    #[must_use]
    pub fn position_exists(&self, position_id: &PositionId) -> bool {
        self.positions.contains_key(position_id)
    }

    /// Returns all positions (open and closed), optionally filtered by venue
    /// and/or instrument.
    #[must_use]
    pub fn positions(
        &self,
        venue: Option<&Venue>,
        instrument_id: Option<&InstrumentId>,
    ) -> Vec<&Position> {
        self.positions
            .values()
            .filter(|position| {
                venue.is_none_or(|v| position.instrument_id.venue == *v)
                    && instrument_id.is_none_or(|id| position.instrument_id == *id)
            })
            .collect()
    }

    /// Returns all open positions, optionally filtered by venue and/or instrument.
    #[must_use]
    pub fn positions_open(
        &self,
        venue: Option<&Venue>,
        instrument_id: Option<&InstrumentId>,
    ) -> Vec<&Position> {
        self.index
            .positions_open
            .iter()
            .filter_map(|position_id| self.positions.get(position_id))
            .filter(|position| {
                venue.is_none_or(|v| position.instrument_id.venue == *v)
                    && instrument_id.is_none_or(|id| position.instrument_id == *id)
            })
            .collect()
    }

    /// Returns all closed positions, optionally filtered by venue and/or instrument.
    #[must_use]
    pub fn positions_closed(
        &self,
        venue: Option<&Venue>,
        instrument_id: Option<&InstrumentId>,
    ) -> Vec<&Position> {
        self.index
            .positions_closed
            .iter()
            .filter_map(|position_id| self.positions.get(position_id))
            .filter(|position| {
                venue.is_none_or(|v| position.instrument_id.venue == *v)
                    && instrument_id.is_none_or(|id| position.instrument_id == *id)
            })
            .collect()
    }

    /// Returns the position IDs which have serialized snapshots.
    #[must_use]
    pub fn position_snapshot_ids(&self) -> HashSet<PositionId> {
        self.position_snapshots.keys().copied().collect()
    }

    /// Returns the serialized snapshot blobs for the given `position_id`.
    #[must_use]
    pub fn position_snapshots(&self, position_id: &PositionId) -> Vec<Bytes> {
        self.position_snapshots
            .get(position_id)
            .cloned()
            .unwrap_or_default()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests;
