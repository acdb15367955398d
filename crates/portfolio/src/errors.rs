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

//! Error types for portfolio calculations.

use meridian_model::{
    identifiers::{InstrumentId, PositionId, Venue},
    types::Currency,
};
use thiserror::Error;

/// The reasons a portfolio calculation cannot produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortfolioError {
    /// No account is registered for the venue.
    #[error("no account registered for venue {0}")]
    MissingAccount(Venue),
    /// The cache does not contain the instrument.
    #[error("no instrument found for {0}")]
    MissingInstrument(InstrumentId),
    /// No price could be resolved for the instrument.
    #[error("no price available for {0}")]
    NoPrice(InstrumentId),
    /// No exchange rate could be resolved between the currencies.
    #[error("no exchange rate available for {from_currency}/{to_currency}")]
    NoExchangeRate {
        /// The source currency for the failed conversion.
        from_currency: Currency,
        /// The target currency for the failed conversion.
        to_currency: Currency,
    },
    /// A betting instrument fill is missing its bet position.
    #[error("no bet position found for {0}")]
    MissingBetPosition(PositionId),
}
