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

//! A tagged variant wrapping all order event types.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::{
    OrderAccepted, OrderCancelRejected, OrderCanceled, OrderDenied, OrderEventType, OrderExpired,
    OrderInitialized, OrderModifyRejected, OrderPendingCancel, OrderPendingUpdate, OrderRejected,
    OrderSubmitted, OrderTriggered, OrderUpdated, filled::OrderFilled,
};
use crate::identifiers::{AccountId, ClientOrderId, InstrumentId, StrategyId, TraderId};

/// Wraps an order event allowing polymorphism over the event family.
#[derive(Clone, Copy, PartialEq, Display, Debug, Serialize, Deserialize)]
pub enum OrderEventAny {
    /// An order initialized event.
    Initialized(OrderInitialized),
    /// An order denied event.
    Denied(OrderDenied),
    /// An order submitted event.
    Submitted(OrderSubmitted),
    /// An order accepted event.
    Accepted(OrderAccepted),
    /// An order rejected event.
    Rejected(OrderRejected),
    /// An order canceled event.
    Canceled(OrderCanceled),
    /// An order expired event.
    Expired(OrderExpired),
    /// An order triggered event.
    Triggered(OrderTriggered),
    /// An order pending update event.
    PendingUpdate(OrderPendingUpdate),
    /// An order pending cancel event.
    PendingCancel(OrderPendingCancel),
    /// An order modify rejected event.
    ModifyRejected(OrderModifyRejected),
    /// An order cancel rejected event.
    CancelRejected(OrderCancelRejected),
    /// An order updated event.
    Updated(OrderUpdated),
    /// An order filled event.
    Filled(OrderFilled),
}

impl OrderEventAny {
    /// Returns the event type tag.
    #[must_use]
    pub fn event_type(&self) -> OrderEventType {
        match self {
            Self::Initialized(_) => OrderEventType::Initialized,
            Self::Denied(_) => OrderEventType::Denied,
            Self::Submitted(_) => OrderEventType::Submitted,
            Self::Accepted(_) => OrderEventType::Accepted,
            Self::Rejected(_) => OrderEventType::Rejected,
            Self::Canceled(_) => OrderEventType::Canceled,
            Self::Expired(_) => OrderEventType::Expired,
            Self::Triggered(_) => OrderEventType::Triggered,
            Self::PendingUpdate(_) => OrderEventType::PendingUpdate,
            Self::PendingCancel(_) => OrderEventType::PendingCancel,
            Self::ModifyRejected(_) => OrderEventType::ModifyRejected,
            Self::CancelRejected(_) => OrderEventType::CancelRejected,
            Self::Updated(_) => OrderEventType::Updated,
            Self::Filled(_) => OrderEventType::Filled,
        }
    }

    /// Returns the trader ID associated with the event.
    #[must_use]
    pub fn trader_id(&self) -> TraderId {
        match self {
            Self::Initialized(event) => event.trader_id,
            Self::Denied(event) => event.trader_id,
            Self::Submitted(event) => event.trader_id,
            Self::Accepted(event) => event.trader_id,
            Self::Rejected(event) => event.trader_id,
            Self::Canceled(event) => event.trader_id,
            Self::Expired(event) => event.trader_id,
            Self::Triggered(event) => event.trader_id,
            Self::PendingUpdate(event) => event.trader_id,
            Self::PendingCancel(event) => event.trader_id,
            Self::ModifyRejected(event) => event.trader_id,
            Self::CancelRejected(event) => event.trader_id,
            Self::Updated(event) => event.trader_id,
            Self::Filled(event) => event.trader_id,
        }
    }

    /// Returns the strategy ID associated with the event.
    #[must_use]
    pub fn strategy_id(&self) -> StrategyId {
        match self {
            Self::Initialized(event) => event.strategy_id,
            Self::Denied(event) => event.strategy_id,
            Self::Submitted(event) => event.strategy_id,
            Self::Accepted(event) => event.strategy_id,
            Self::Rejected(event) => event.strategy_id,
            Self::Canceled(event) => event.strategy_id,
            Self::Expired(event) => event.strategy_id,
            Self::Triggered(event) => event.strategy_id,
            Self::PendingUpdate(event) => event.strategy_id,
            Self::PendingCancel(event) => event.strategy_id,
            Self::ModifyRejected(event) => event.strategy_id,
            Self::CancelRejected(event) => event.strategy_id,
            Self::Updated(event) => event.strategy_id,
            Self::Filled(event) => event.strategy_id,
        }
    }

    /// Returns the instrument ID associated with the event.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::Initialized(event) => event.instrument_id,
            Self::Denied(event) => event.instrument_id,
            Self::Submitted(event) => event.instrument_id,
            Self::Accepted(event) => event.instrument_id,
            Self::Rejected(event) => event.instrument_id,
            Self::Canceled(event) => event.instrument_id,
            Self::Expired(event) => event.instrument_id,
            Self::Triggered(event) => event.instrument_id,
            Self::PendingUpdate(event) => event.instrument_id,
            Self::PendingCancel(event) => event.instrument_id,
            Self::ModifyRejected(event) => event.instrument_id,
            Self::CancelRejected(event) => event.instrument_id,
            Self::Updated(event) => event.instrument_id,
            Self::Filled(event) => event.instrument_id,
        }
    }

    /// Returns the client order ID associated with the event.
    #[must_use]
    pub fn client_order_id(&self) -> ClientOrderId {
        match self {
            Self::Initialized(event) => event.client_order_id,
            Self::Denied(event) => event.client_order_id,
            Self::Submitted(event) => event.client_order_id,
            Self::Accepted(event) => event.client_order_id,
            Self::Rejected(event) => event.client_order_id,
            Self::Canceled(event) => event.client_order_id,
            Self::Expired(event) => event.client_order_id,
            Self::Triggered(event) => event.client_order_id,
            Self::PendingUpdate(event) => event.client_order_id,
            Self::PendingCancel(event) => event.client_order_id,
            Self::ModifyRejected(event) => event.client_order_id,
            Self::CancelRejected(event) => event.client_order_id,
            Self::Updated(event) => event.client_order_id,
            Self::Filled(event) => event.client_order_id,
        }
    }

    /// Returns the account ID associated with the event (if assigned).
    #[must_use]
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Initialized(event) => event.account_id,
            Self::Denied(event) => event.account_id,
            Self::Submitted(event) => event.account_id,
            Self::Accepted(event) => event.account_id,
            Self::Rejected(event) => event.account_id,
            Self::Canceled(event) => event.account_id,
            Self::Expired(event) => event.account_id,
            Self::Triggered(event) => event.account_id,
            Self::PendingUpdate(event) => event.account_id,
            Self::PendingCancel(event) => event.account_id,
            Self::ModifyRejected(event) => event.account_id,
            Self::CancelRejected(event) => event.account_id,
            Self::Updated(event) => event.account_id,
            Self::Filled(event) => Some(event.account_id),
        }
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
    use crate::identifiers::AccountId;

    #[rstest]
    fn test_event_type_and_accessors() {
        let event = OrderEventAny::Accepted(OrderAccepted::new(
            TraderId::from("TRADER-001"),
            StrategyId::from("EMA-CROSS-001"),
            InstrumentId::from("AUD/USD.SIM"),
            ClientOrderId::from("O-19700101-000000-001-001-1"),
            None,
            Some(AccountId::from("SIM-001")),
            UUID4::new(),
            UnixNanos::from(1),
            UnixNanos::from(2),
        ));
        assert_eq!(event.event_type(), OrderEventType::Accepted);
        assert_eq!(event.instrument_id(), InstrumentId::from("AUD/USD.SIM"));
        assert_eq!(event.account_id(), Some(AccountId::from("SIM-001")));
    }
}
