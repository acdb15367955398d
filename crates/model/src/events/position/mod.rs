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

//! Position events.

use crate::identifiers::{AccountId, InstrumentId, PositionId};

pub mod changed;
pub mod closed;
pub mod opened;
pub mod snapshot;

use changed::PositionChanged;
use closed::PositionClosed;
use opened::PositionOpened;

/// Wraps a position event allowing polymorphism over the event family.
#[derive(Clone, Debug)]
pub enum PositionEvent {
    /// A position opened event.
    PositionOpened(PositionOpened),
    /// A position changed event.
    PositionChanged(PositionChanged),
    /// A position closed event.
    PositionClosed(PositionClosed),
}

impl PositionEvent {
    /// Returns the instrument ID associated with the event.
    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::PositionOpened(position) => position.instrument_id,
            Self::PositionChanged(position) => position.instrument_id,
            Self::PositionClosed(position) => position.instrument_id,
        }
    }

    /// Returns the position ID associated with the event.
    #[must_use]
    pub fn position_id(&self) -> PositionId {
        match self {
            Self::PositionOpened(position) => position.position_id,
            Self::PositionChanged(position) => position.position_id,
            Self::PositionClosed(position) => position.position_id,
        }
    }

    /// Returns the account ID associated with the event.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        match self {
            Self::PositionOpened(position) => position.account_id,
            Self::PositionChanged(position) => position.account_id,
            Self::PositionClosed(position) => position.account_id,
        }
    }
}
