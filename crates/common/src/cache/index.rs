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

//! Index lookups over the cached execution objects.

use std::collections::{HashMap, HashSet};

use meridian_model::identifiers::{AccountId, ClientOrderId, InstrumentId, PositionId, Venue};

/// Secondary indexes over the cached execution objects.
#[derive(Debug, Default)]
pub struct CacheIndex {
    /// The account registered per venue.
    pub venue_account: HashMap<Venue, AccountId>,
    /// The client order IDs per instrument.
    pub instrument_orders: HashMap<InstrumentId, HashSet<ClientOrderId>>,
    /// The client order IDs for open orders.
    pub orders_open: HashSet<ClientOrderId>,
    /// The client order IDs for closed orders.
    pub orders_closed: HashSet<ClientOrderId>,
    /// The position IDs per instrument.
    pub instrument_positions: HashMap<InstrumentId, HashSet<PositionId>>,
    /// The position IDs for open positions.
    pub positions_open: HashSet<PositionId>,
    /// The position IDs for closed positions.
    pub positions_closed: HashSet<PositionId>,
}

impl CacheIndex {
    /// Clears all index entries.
    pub fn clear(&mut self) {
        self.venue_account.clear();
        self.instrument_orders.clear();
        self.orders_open.clear();
        self.orders_closed.clear();
        self.instrument_positions.clear();
        self.positions_open.clear();
        self.positions_closed.clear();
    }
}
