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

//! A `Position` aggregate for a netting order-management scheme.

use std::{
    collections::HashMap,
    fmt::{Display, Formatter},
};

use meridian_core::UnixNanos;
use serde::{Deserialize, Serialize};

use crate::{
    enums::{OrderSide, PositionSide},
    events::OrderFilled,
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId,
    },
    instruments::{Instrument, InstrumentAny},
    types::{Currency, Money, Price, Quantity},
};

/// Represents a position in a market.
///
/// The aggregate of fills for a single position ID under a netting
/// order-management scheme: opposing fills net into the same position, which
/// may close (quantity reaching zero) and later reopen under a new position
/// object with the same ID.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Position {
    /// The trader ID associated with the position.
    pub trader_id: TraderId,
    /// The strategy ID associated with the position.
    pub strategy_id: StrategyId,
    /// The instrument ID for the position.
    pub instrument_id: InstrumentId,
    /// The position ID.
    pub id: PositionId,
    /// The account ID associated with the position.
    pub account_id: AccountId,
    /// The client order ID for the order which opened the position.
    pub opening_order_id: ClientOrderId,
    /// The client order ID for the order which closed the position.
    pub closing_order_id: Option<ClientOrderId>,
    /// The entry direction from open.
    pub entry: OrderSide,
    /// The position side.
    pub side: PositionSide,
    /// The current signed quantity (positive for LONG, negative for SHORT).
    pub signed_qty: f64,
    /// The current open quantity.
    pub quantity: Quantity,
    /// The peak directional quantity reached by the position.
    pub peak_qty: Quantity,
    /// The position price decimal precision.
    pub price_precision: u8,
    /// The position size decimal precision.
    pub size_precision: u8,
    /// The contract multiplier.
    pub multiplier: Quantity,
    /// Whether the instrument is inverse.
    pub is_inverse: bool,
    /// The position quote currency.
    pub quote_currency: Currency,
    /// The position base currency (if applicable).
    pub base_currency: Option<Currency>,
    /// The position settlement currency.
    pub settlement_currency: Currency,
    /// UNIX timestamp (nanoseconds) when the position was initialized.
    pub ts_init: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the position opened.
    pub ts_opened: UnixNanos,
    /// UNIX timestamp (nanoseconds) of the last position event.
    pub ts_last: UnixNanos,
    /// UNIX timestamp (nanoseconds) when the position closed.
    pub ts_closed: Option<UnixNanos>,
    /// The open duration for the position (nanoseconds).
    pub duration_ns: u64,
    /// The average open price.
    pub avg_px_open: f64,
    /// The average closing price.
    pub avg_px_close: Option<f64>,
    /// The realized return for the position.
    pub realized_return: f64,
    /// The realized PnL for the position (including commissions).
    pub realized_pnl: Option<Money>,
    /// The trade match IDs for the position.
    pub trade_ids: Vec<TradeId>,
    /// The total buy quantity filled.
    pub buy_qty: Quantity,
    /// The total sell quantity filled.
    pub sell_qty: Quantity,
    events: Vec<OrderFilled>,
    commissions: HashMap<Currency, Money>,
}

impl Position {
    /// Creates a new [`Position`] instance from the opening `fill`.
    ///
    /// # Panics
    ///
    /// Panics if `fill.order_side` is `NoOrderSide`, or if the fill has no
    /// position ID.
    #[must_use]
    pub fn new(instrument: &InstrumentAny, fill: OrderFilled) -> Self {
        assert_ne!(fill.order_side, OrderSide::NoOrderSide);
        let position_id = fill
            .position_id
            .expect("Cannot create position without a position ID");

        let mut position = Self {
            trader_id: fill.trader_id,
            strategy_id: fill.strategy_id,
            instrument_id: fill.instrument_id,
            id: position_id,
            account_id: fill.account_id,
            opening_order_id: fill.client_order_id,
            closing_order_id: None,
            entry: fill.order_side,
            side: PositionSide::Flat,
            signed_qty: 0.0,
            quantity: Quantity::zero(instrument.size_precision()),
            peak_qty: Quantity::zero(instrument.size_precision()),
            price_precision: instrument.price_precision(),
            size_precision: instrument.size_precision(),
            multiplier: instrument.multiplier(),
            is_inverse: instrument.is_inverse(),
            quote_currency: instrument.quote_currency(),
            base_currency: instrument.base_currency(),
            settlement_currency: instrument.settlement_currency(),
            ts_init: fill.ts_init,
            ts_opened: fill.ts_event,
            ts_last: fill.ts_event,
            ts_closed: None,
            duration_ns: 0,
            avg_px_open: fill.last_px.as_f64(),
            avg_px_close: None,
            realized_return: 0.0,
            realized_pnl: None,
            trade_ids: Vec::new(),
            buy_qty: Quantity::zero(instrument.size_precision()),
            sell_qty: Quantity::zero(instrument.size_precision()),
            events: Vec::new(),
            commissions: HashMap::new(),
        };
        position.apply(&fill);
        position
    }

    /// Applies the given `fill` to the position.
    ///
    /// # Panics
    ///
    /// Panics if `fill.order_side` is `NoOrderSide`.
    pub fn apply(&mut self, fill: &OrderFilled) {
        self.events.push(*fill);
        self.trade_ids.push(fill.trade_id);
        self.ts_last = fill.ts_event;

        if let Some(commission) = fill.commission {
            self.update_commissions(commission);
        }

        match fill.order_side {
            OrderSide::Buy => self.handle_buy(fill),
            OrderSide::Sell => self.handle_sell(fill),
            OrderSide::NoOrderSide => panic!("Invalid `OrderSide` for fill, was NO_ORDER_SIDE"),
        }

        self.quantity = Quantity::new(self.signed_qty.abs(), self.size_precision);
        if self.quantity > self.peak_qty {
            self.peak_qty = self.quantity;
        }

        self.side = if self.signed_qty > 0.0 {
            PositionSide::Long
        } else if self.signed_qty < 0.0 {
            PositionSide::Short
        } else {
            PositionSide::Flat
        };

        if self.side == PositionSide::Flat {
            self.closing_order_id = Some(fill.client_order_id);
            self.ts_closed = Some(fill.ts_event);
            self.duration_ns = (fill.ts_event - self.ts_opened).as_u64();
        }
    }

    fn handle_buy(&mut self, fill: &OrderFilled) {
        let last_qty = fill.last_qty.as_f64();
        let last_px = fill.last_px.as_f64();
        self.buy_qty = self.buy_qty + fill.last_qty;

        if self.signed_qty >= 0.0 {
            // Increasing long (or opening)
            self.avg_px_open =
                Self::weighted_avg(self.avg_px_open, self.signed_qty, last_px, last_qty);
            self.signed_qty += last_qty;
        } else {
            // Reducing short
            let reduce_qty = last_qty.min(-self.signed_qty);
            self.update_close(last_px, reduce_qty);
            self.realize_pnl(reduce_qty, last_px);
            self.signed_qty += last_qty;
            if self.signed_qty > 0.0 {
                // Flipped to long with the remainder
                self.entry = OrderSide::Buy;
                self.avg_px_open = last_px;
            }
        }
    }

    fn handle_sell(&mut self, fill: &OrderFilled) {
        let last_qty = fill.last_qty.as_f64();
        let last_px = fill.last_px.as_f64();
        self.sell_qty = self.sell_qty + fill.last_qty;

        if self.signed_qty <= 0.0 {
            // Increasing short (or opening)
            self.avg_px_open =
                Self::weighted_avg(self.avg_px_open, -self.signed_qty, last_px, last_qty);
            self.signed_qty -= last_qty;
        } else {
            // Reducing long
            let reduce_qty = last_qty.min(self.signed_qty);
            self.update_close(last_px, reduce_qty);
            self.realize_pnl(reduce_qty, last_px);
            self.signed_qty -= last_qty;
            if self.signed_qty < 0.0 {
                // Flipped to short with the remainder
                self.entry = OrderSide::Sell;
                self.avg_px_open = last_px;
            }
        }
    }

    fn weighted_avg(avg: f64, qty: f64, new_px: f64, new_qty: f64) -> f64 {
        if qty + new_qty == 0.0 {
            return new_px;
        }
        ((avg * qty) + (new_px * new_qty)) / (qty + new_qty)
    }

    fn update_close(&mut self, last_px: f64, reduce_qty: f64) {
        let closed_qty = match self.entry {
            OrderSide::Buy => self.sell_qty.as_f64() - reduce_qty,
            _ => self.buy_qty.as_f64() - reduce_qty,
        };
        let prior = self.avg_px_close.unwrap_or(last_px);
        self.avg_px_close = Some(Self::weighted_avg(prior, closed_qty, last_px, reduce_qty));
        if self.avg_px_open != 0.0 {
            let direction = if self.signed_qty > 0.0 { 1.0 } else { -1.0 };
            self.realized_return =
                direction * (self.avg_px_close.unwrap() - self.avg_px_open) / self.avg_px_open;
        }
    }

    fn realize_pnl(&mut self, reduce_qty: f64, last_px: f64) {
        let pnl = self.calculate_pnl_raw(self.avg_px_open, last_px, reduce_qty);
        let current = self
            .realized_pnl
            .unwrap_or_else(|| Money::zero(self.settlement_currency));
        self.realized_pnl = Some(current + Money::new(pnl, self.settlement_currency));
    }

    fn update_commissions(&mut self, commission: Money) {
        let total = self
            .commissions
            .get(&commission.currency)
            .copied()
            .unwrap_or_else(|| Money::zero(commission.currency));
        self.commissions.insert(commission.currency, total + commission);

        // Commissions in the settlement currency reduce realized PnL directly
        if commission.currency == self.settlement_currency {
            let current = self
                .realized_pnl
                .unwrap_or_else(|| Money::zero(self.settlement_currency));
            self.realized_pnl = Some(current - commission);
        }
    }

    fn calculate_pnl_raw(&self, avg_px_open: f64, avg_px_close: f64, quantity: f64) -> f64 {
        let direction = if self.signed_qty >= 0.0 { 1.0 } else { -1.0 };
        let qty = quantity * self.multiplier.as_f64();
        if self.is_inverse {
            direction * qty * (1.0 / avg_px_open - 1.0 / avg_px_close)
        } else {
            direction * qty * (avg_px_close - avg_px_open)
        }
    }

    /// Calculates the PnL for the given open/close prices and quantity,
    /// in the settlement currency (commissions not included).
    #[must_use]
    pub fn calculate_pnl(&self, avg_px_open: f64, avg_px_close: f64, quantity: Quantity) -> Money {
        let pnl = self.calculate_pnl_raw(avg_px_open, avg_px_close, quantity.as_f64());
        Money::new(pnl, self.settlement_currency)
    }

    /// Calculates the unrealized PnL at the given `last` price, in the
    /// settlement currency.
    #[must_use]
    pub fn unrealized_pnl(&self, last: Price) -> Money {
        if self.side == PositionSide::Flat {
            return Money::zero(self.settlement_currency);
        }
        let pnl = self.calculate_pnl_raw(self.avg_px_open, last.as_f64(), self.quantity.as_f64());
        Money::new(pnl, self.settlement_currency)
    }

    /// Calculates the total PnL (realized plus unrealized at `last`), in the
    /// settlement currency.
    #[must_use]
    pub fn total_pnl(&self, last: Price) -> Money {
        let realized = self
            .realized_pnl
            .unwrap_or_else(|| Money::zero(self.settlement_currency));
        realized + self.unrealized_pnl(last)
    }

    /// Calculates the notional value of the position at the given `price`.
    #[must_use]
    pub fn notional_value(&self, price: Price) -> Money {
        if self.is_inverse {
            let amount =
                self.quantity.as_f64() * self.multiplier.as_f64() * (1.0 / price.as_f64());
            Money::new(
                amount,
                self.base_currency
                    .expect("Inverse instruments require a base currency"),
            )
        } else {
            let amount = self.quantity.as_f64() * self.multiplier.as_f64() * price.as_f64();
            Money::new(amount, self.quote_currency)
        }
    }

    /// Returns the commissions for the position.
    #[must_use]
    pub fn commissions(&self) -> Vec<Money> {
        self.commissions.values().copied().collect()
    }

    /// Returns a reference to the fill events for the position.
    #[must_use]
    pub fn events(&self) -> &[OrderFilled] {
        &self.events
    }

    /// Returns the number of fill events applied to the position.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Returns whether the position side is `LONG`.
    #[must_use]
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    /// Returns whether the position side is `SHORT`.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    /// Returns whether the position is open (not `FLAT`).
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.side != PositionSide::Flat && self.ts_closed.is_none()
    }

    /// Returns whether the position is closed (`FLAT`).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({} {} {}, id={})",
            stringify!(Position),
            self.side,
            self.quantity,
            self.instrument_id,
            self.id,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use meridian_core::{UUID4, UnixNanos};
    use rstest::rstest;

    use super::*;
    use crate::{
        enums::{LiquiditySide, OrderType},
        identifiers::VenueOrderId,
        instruments::stubs::audusd_sim,
    };

    fn fill(
        side: OrderSide,
        qty: &str,
        px: &str,
        position_id: &str,
        order_id: &str,
        commission: Option<Money>,
    ) -> OrderFilled {
        OrderFilled::new(
            TraderId::from("TRADER-001"),
            StrategyId::from("EMA-CROSS-001"),
            InstrumentId::from("AUD/USD.SIM"),
            ClientOrderId::from(order_id),
            VenueOrderId::from("V-001"),
            AccountId::from("SIM-001"),
            TradeId::from("T-001"),
            side,
            OrderType::Market,
            Quantity::from(qty),
            Price::from(px),
            Currency::USD(),
            LiquiditySide::Taker,
            UUID4::new(),
            UnixNanos::from(1_000_000_000),
            UnixNanos::from(1_000_000_000),
            Some(PositionId::from(position_id)),
            commission,
        )
    }

    #[rstest]
    fn test_position_opened_long() {
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let position = Position::new(
            &instrument,
            fill(OrderSide::Buy, "100000", "0.66000", "P-001", "O-1", None),
        );
        assert!(position.is_long());
        assert!(position.is_open());
        assert_eq!(position.signed_qty, 100_000.0);
        assert_eq!(position.quantity, Quantity::from("100000"));
        assert_eq!(position.entry, OrderSide::Buy);
        assert_eq!(position.avg_px_open, 0.66);
        assert_eq!(position.realized_pnl, None);
    }

    #[rstest]
    fn test_position_increase_averages_open_price() {
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let mut position = Position::new(
            &instrument,
            fill(OrderSide::Buy, "100000", "0.66000", "P-001", "O-1", None),
        );
        position.apply(&fill(
            OrderSide::Buy,
            "100000",
            "0.67000",
            "P-001",
            "O-2",
            None,
        ));
        assert_eq!(position.signed_qty, 200_000.0);
        assert!((position.avg_px_open - 0.665).abs() < 1e-12);
    }

    #[rstest]
    fn test_position_close_realizes_pnl() {
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let mut position = Position::new(
            &instrument,
            fill(OrderSide::Buy, "100000", "0.66000", "P-001", "O-1", None),
        );
        position.apply(&fill(
            OrderSide::Sell,
            "100000",
            "0.66100",
            "P-001",
            "O-2",
            None,
        ));
        assert!(position.is_closed());
        assert_eq!(position.side, PositionSide::Flat);
        assert!(position.quantity.is_zero());
        assert_eq!(position.peak_qty, Quantity::from("100000"));
        assert_eq!(position.signed_qty, 0.0);
        // (0.661 - 0.660) * 100_000 = 100 USD
        assert_eq!(position.realized_pnl, Some(Money::from("100.00 USD")));
        assert_eq!(position.closing_order_id, Some(ClientOrderId::from("O-2")));
    }

    #[rstest]
    fn test_commission_reduces_realized_pnl() {
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let position = Position::new(
            &instrument,
            fill(
                OrderSide::Buy,
                "100000",
                "0.66000",
                "P-001",
                "O-1",
                Some(Money::from("2.00 USD")),
            ),
        );
        assert_eq!(position.realized_pnl, Some(Money::from("-2.00 USD")));
    }

    #[rstest]
    fn test_short_position_unrealized_pnl() {
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let position = Position::new(
            &instrument,
            fill(OrderSide::Sell, "100000", "0.66000", "P-001", "O-1", None),
        );
        assert!(position.is_short());
        // Short 100_000 @ 0.660, price moves down to 0.659: +100 USD
        let pnl = position.unrealized_pnl(Price::from("0.65900"));
        assert_eq!(pnl, Money::from("100.00 USD"));
    }

    #[rstest]
    fn test_unrealized_pnl_long() {
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let position = Position::new(
            &instrument,
            fill(OrderSide::Buy, "100000", "0.66000", "P-001", "O-1", None),
        );
        let pnl = position.unrealized_pnl(Price::from("0.66100"));
        assert_eq!(pnl, Money::from("100.00 USD"));
        assert_eq!(
            position.total_pnl(Price::from("0.66100")),
            Money::from("100.00 USD")
        );
    }

    #[rstest]
    fn test_notional_value() {
        let instrument = InstrumentAny::CurrencyPair(audusd_sim());
        let position = Position::new(
            &instrument,
            fill(OrderSide::Buy, "100000", "0.66000", "P-001", "O-1", None),
        );
        assert_eq!(
            position.notional_value(Price::from("0.66000")),
            Money::from("66000.00 USD")
        );
    }
}
