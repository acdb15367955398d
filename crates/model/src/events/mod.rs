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

//! Events for the trading domain model.

pub mod account;
pub mod order;
pub mod position;

// Re-exports
pub use account::state::AccountState;
pub use order::{
    OrderAccepted, OrderCancelRejected, OrderCanceled, OrderDenied, OrderEventAny, OrderEventType,
    OrderExpired, OrderInitialized, OrderModifyRejected, OrderPendingCancel, OrderPendingUpdate,
    OrderRejected, OrderSubmitted, OrderTriggered, OrderUpdated, filled::OrderFilled,
};
pub use position::{
    PositionEvent, changed::PositionChanged, closed::PositionClosed, opened::PositionOpened,
    snapshot::PositionSnapshot,
};
