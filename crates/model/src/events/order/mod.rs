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

//! Order events.

use meridian_core::{UUID4, UnixNanos};
use serde::{Deserialize, Serialize};
use strum::Display;

pub mod any;
pub mod filled;

pub use any::OrderEventAny;

use crate::identifiers::{
    AccountId, ClientOrderId, InstrumentId, StrategyId, TraderId, VenueOrderId,
};

/// The type of order event.
#[derive(Clone, Copy, Debug, Display, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEventType {
    /// The order was initialized.
    Initialized,
    /// The order was denied.
    Denied,
    /// The order was submitted.
    Submitted,
    /// The order was accepted.
    Accepted,
    /// The order was rejected.
    Rejected,
    /// The order was canceled.
    Canceled,
    /// The order expired.
    Expired,
    /// The order was triggered.
    Triggered,
    /// The order is pending update.
    PendingUpdate,
    /// The order is pending cancel.
    PendingCancel,
    /// A modify request for the order was rejected.
    ModifyRejected,
    /// A cancel request for the order was rejected.
    CancelRejected,
    /// The order was updated.
    Updated,
    /// The order was filled.
    Filled,
}

/// Defines an administrative order event carrying the common identifier set.
macro_rules! define_order_event {
    ($ty:ident, $doc:literal) => {
        #[doc = $doc]
        #[repr(C)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $ty {
            /// The trader ID associated with the event.
            pub trader_id: TraderId,
            /// The strategy ID associated with the event.
            pub strategy_id: StrategyId,
            /// The instrument ID associated with the event.
            pub instrument_id: InstrumentId,
            /// The client order ID associated with the event.
            pub client_order_id: ClientOrderId,
            /// The venue order ID associated with the event, if assigned.
            pub venue_order_id: Option<VenueOrderId>,
            /// The account ID associated with the event, if assigned.
            pub account_id: Option<AccountId>,
            /// The unique identifier for the event.
            pub event_id: UUID4,
            /// UNIX timestamp (nanoseconds) when the event occurred.
            pub ts_event: UnixNanos,
            /// UNIX timestamp (nanoseconds) when the event was initialized.
            pub ts_init: UnixNanos,
        }

        impl $ty {
            /// Creates a new event instance.
            #[allow(clippy::too_many_arguments)]
            pub fn new(
                trader_id: TraderId,
                strategy_id: StrategyId,
                instrument_id: InstrumentId,
                client_order_id: ClientOrderId,
                venue_order_id: Option<VenueOrderId>,
                account_id: Option<AccountId>,
                event_id: UUID4,
                ts_event: UnixNanos,
                ts_init: UnixNanos,
            ) -> Self {
                Self {
                    trader_id,
                    strategy_id,
                    instrument_id,
                    client_order_id,
                    venue_order_id,
                    account_id,
                    event_id,
                    ts_event,
                    ts_init,
                }
            }
        }
    };
}

define_order_event!(
    OrderInitialized,
    "Represents an event where an order has been initialized."
);
define_order_event!(
    OrderDenied,
    "Represents an event where an order has been denied by the system."
);
define_order_event!(
    OrderSubmitted,
    "Represents an event where an order has been submitted to the venue."
);
define_order_event!(
    OrderAccepted,
    "Represents an event where an order has been accepted by the venue."
);
define_order_event!(
    OrderRejected,
    "Represents an event where an order has been rejected by the venue."
);
define_order_event!(
    OrderCanceled,
    "Represents an event where an order has been canceled at the venue."
);
define_order_event!(
    OrderExpired,
    "Represents an event where an order has expired at the venue."
);
define_order_event!(
    OrderTriggered,
    "Represents an event where an order's stop price has been triggered."
);
define_order_event!(
    OrderPendingUpdate,
    "Represents an event where an update request has been sent for an order."
);
define_order_event!(
    OrderPendingCancel,
    "Represents an event where a cancel request has been sent for an order."
);
define_order_event!(
    OrderModifyRejected,
    "Represents an event where a request to modify an order has been rejected by the venue."
);
define_order_event!(
    OrderCancelRejected,
    "Represents an event where a request to cancel an order has been rejected by the venue."
);
define_order_event!(
    OrderUpdated,
    "Represents an event where an order has been updated at the venue."
);
