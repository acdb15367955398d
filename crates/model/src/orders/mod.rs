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

//! An `Order` aggregate for the order types the portfolio operates over.

use std::fmt::{Display, Formatter};

use meridian_core::UnixNanos;
use serde::{Deserialize, Serialize};

use crate::{
    enums::{OrderSide, OrderStatus, OrderType},
    events::{OrderEventAny, OrderEventType},
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TraderId, VenueOrderId,
    },
    types::{Price, Quantity},
};

/// Represents an order in the system.
///
/// A single aggregate covering the order types the portfolio accounting core
/// operates over (market, limit, stop-market, stop-limit); the optional price
/// fields apply per order type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    /// The trader ID associated with the order.
    pub trader_id: TraderId,
    /// The strategy ID associated with the order.
    pub strategy_id: StrategyId,
    /// The instrument ID for the order.
    pub instrument_id: InstrumentId,
    /// The client order ID.
    pub client_order_id: ClientOrderId,
    /// The venue order ID (once assigned).
    pub venue_order_id: Option<VenueOrderId>,
    /// The position ID associated with the order (once assigned).
    pub position_id: Option<PositionId>,
    /// The account ID associated with the order (once assigned).
    pub account_id: Option<AccountId>,
    /// The order side.
    pub side: OrderSide,
    /// The order type.
    pub order_type: OrderType,
    /// The order quantity.
    pub quantity: Quantity,
    /// The limit price (limit and stop-limit orders).
    pub price: Option<Price>,
    /// The stop trigger price (stop-market and stop-limit orders).
    pub trigger_price: Option<Price>,
    /// The current order status.
    pub status: OrderStatus,
    /// The total filled quantity.
    pub filled_qty: Quantity,
    /// Whether the order may only reduce an existing position.
    pub is_reduce_only: bool,
    /// UNIX timestamp (nanoseconds) when the order was initialized.
    pub ts_init: UnixNanos,
    /// UNIX timestamp (nanoseconds) of the last order event.
    pub ts_last: UnixNanos,
}

impl Order {
    /// Creates a new market [`Order`] instance.
    #[must_use]
    pub fn market(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        side: OrderSide,
        quantity: Quantity,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new(
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            side,
            OrderType::Market,
            quantity,
            None,
            None,
            ts_init,
        )
    }

    /// Creates a new limit [`Order`] instance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn limit(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new(
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            side,
            OrderType::Limit,
            quantity,
            Some(price),
            None,
            ts_init,
        )
    }

    /// Creates a new stop-market [`Order`] instance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn stop_market(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        side: OrderSide,
        quantity: Quantity,
        trigger_price: Price,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new(
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            side,
            OrderType::StopMarket,
            quantity,
            None,
            Some(trigger_price),
            ts_init,
        )
    }

    /// Creates a new stop-limit [`Order`] instance.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn stop_limit(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
        trigger_price: Price,
        ts_init: UnixNanos,
    ) -> Self {
        Self::new(
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            side,
            OrderType::StopLimit,
            quantity,
            Some(price),
            Some(trigger_price),
            ts_init,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn new(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        side: OrderSide,
        order_type: OrderType,
        quantity: Quantity,
        price: Option<Price>,
        trigger_price: Option<Price>,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            venue_order_id: None,
            position_id: None,
            account_id: None,
            side,
            order_type,
            quantity,
            price,
            trigger_price,
            status: OrderStatus::Initialized,
            filled_qty: Quantity::zero(quantity.precision),
            is_reduce_only: false,
            ts_init,
            ts_last: ts_init,
        }
    }

    /// Applies the given `event` to the order, transitioning its status.
    pub fn apply(&mut self, event: &OrderEventAny) {
        if let Some(account_id) = event.account_id() {
            self.account_id = Some(account_id);
        }

        self.status = match event.event_type() {
            OrderEventType::Initialized => OrderStatus::Initialized,
            OrderEventType::Denied => OrderStatus::Denied,
            OrderEventType::Submitted => OrderStatus::Submitted,
            OrderEventType::Accepted => OrderStatus::Accepted,
            OrderEventType::Rejected => OrderStatus::Rejected,
            OrderEventType::Canceled => OrderStatus::Canceled,
            OrderEventType::Expired => OrderStatus::Expired,
            OrderEventType::Triggered => OrderStatus::Triggered,
            OrderEventType::PendingUpdate => OrderStatus::PendingUpdate,
            OrderEventType::PendingCancel => OrderStatus::PendingCancel,
            // Rejected requests leave the working status unchanged
            OrderEventType::ModifyRejected | OrderEventType::CancelRejected => self.status,
            OrderEventType::Updated => self.status,
            OrderEventType::Filled => {
                if let OrderEventAny::Filled(fill) = event {
                    self.venue_order_id = Some(fill.venue_order_id);
                    self.position_id = fill.position_id.or(self.position_id);
                    self.filled_qty = self.filled_qty + fill.last_qty;
                    if self.filled_qty >= self.quantity {
                        OrderStatus::Filled
                    } else {
                        OrderStatus::PartiallyFilled
                    }
                } else {
                    self.status
                }
            }
        };
    }

    /// Returns the quantity remaining to be filled.
    #[must_use]
    pub fn leaves_qty(&self) -> Quantity {
        self.quantity - self.filled_qty
    }

    /// Returns whether the order is open at the venue.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Accepted
                | OrderStatus::Triggered
                | OrderStatus::PendingUpdate
                | OrderStatus::PendingCancel
                | OrderStatus::PartiallyFilled
        )
    }

    /// Returns whether the order is closed (done).
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Denied
                | OrderStatus::Rejected
                | OrderStatus::Canceled
                | OrderStatus::Expired
                | OrderStatus::Filled
        )
    }

    /// Returns whether the order is passive (rests on the book, posting margin).
    #[must_use]
    pub fn is_passive(&self) -> bool {
        self.order_type != OrderType::Market
    }

    /// Returns whether the order side is `BUY`.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side == OrderSide::Buy
    }

    /// Returns whether the order side is `SELL`.
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.side == OrderSide::Sell
    }

    /// Returns the price against which balances or margins are locked
    /// (the limit price, else the trigger price).
    #[must_use]
    pub fn locking_price(&self) -> Option<Price> {
        self.price.or(self.trigger_price)
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({} {} {} {}, status={}, client_order_id={})",
            stringify!(Order),
            self.side,
            self.quantity,
            self.instrument_id,
            self.order_type,
            self.status,
            self.client_order_id,
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use meridian_core::UUID4;
    use rstest::rstest;

    use super::*;
    use crate::events::OrderAccepted;

    fn limit_order() -> Order {
        Order::limit(
            TraderId::from("TRADER-001"),
            StrategyId::from("EMA-CROSS-001"),
            InstrumentId::from("AUD/USD.SIM"),
            ClientOrderId::from("O-1"),
            OrderSide::Buy,
            Quantity::from("100000"),
            Price::from("0.66000"),
            UnixNanos::default(),
        )
    }

    #[rstest]
    fn test_limit_order_initialized() {
        let order = limit_order();
        assert_eq!(order.status, OrderStatus::Initialized);
        assert!(!order.is_open());
        assert!(!order.is_closed());
        assert!(order.is_passive());
        assert_eq!(order.locking_price(), Some(Price::from("0.66000")));
    }

    #[rstest]
    fn test_apply_accepted_opens_order() {
        let mut order = limit_order();
        let event = OrderEventAny::Accepted(OrderAccepted::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            None,
            Some(AccountId::from("SIM-001")),
            UUID4::new(),
            UnixNanos::from(1),
            UnixNanos::from(2),
        ));
        order.apply(&event);
        assert_eq!(order.status, OrderStatus::Accepted);
        assert!(order.is_open());
        assert_eq!(order.account_id, Some(AccountId::from("SIM-001")));
    }

    #[rstest]
    fn test_market_order_is_not_passive() {
        let order = Order::market(
            TraderId::from("TRADER-001"),
            StrategyId::from("EMA-CROSS-001"),
            InstrumentId::from("AUD/USD.SIM"),
            ClientOrderId::from("O-2"),
            OrderSide::Sell,
            Quantity::from("100000"),
            UnixNanos::default(),
        );
        assert!(!order.is_passive());
        assert_eq!(order.locking_price(), None);
    }

    #[rstest]
    fn test_stop_market_locking_price_is_trigger() {
        let order = Order::stop_market(
            TraderId::from("TRADER-001"),
            StrategyId::from("EMA-CROSS-001"),
            InstrumentId::from("AUD/USD.SIM"),
            ClientOrderId::from("O-3"),
            OrderSide::Sell,
            Quantity::from("100000"),
            Price::from("0.65000"),
            UnixNanos::default(),
        );
        assert_eq!(order.locking_price(), Some(Price::from("0.65000")));
    }
}
