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

//! Portfolio accounting for the Meridian portfolio engine.
//!
//! The *portfolio* crate consumes order, position, account and market data
//! events and continuously maintains a consistent picture of net positions,
//! realized and unrealized PnL, net exposure, and required margins across
//! venues, accounts, instruments and currencies.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod errors;
pub mod manager;
pub mod portfolio;

pub use config::PortfolioConfig;
pub use errors::PortfolioError;
pub use manager::AccountsManager;
pub use portfolio::Portfolio;
