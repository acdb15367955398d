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

//! The trading domain model for the Meridian portfolio engine.
//!
//! The *model* crate defines the value types, identifiers, events, and aggregates
//! which the portfolio accounting core operates over:
//!
//! - Fixed-precision value types (`Currency`, `Money`, `Price`, `Quantity`).
//! - Interned identifier types (`InstrumentId`, `AccountId`, `PositionId`, ...).
//! - Market data types (`QuoteTick`, `Bar`, `MarkPriceUpdate`, betting types).
//! - Event types (`AccountState`, order events, position events).
//! - Domain aggregates (`OrderAny`, `Position`, instruments, accounts).

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod accounts;
pub mod currencies;
pub mod data;
pub mod enums;
pub mod events;
pub mod identifiers;
pub mod instruments;
pub mod orders;
pub mod position;
pub mod types;
