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

//! Core foundational types and utilities for the Meridian portfolio engine.
//!
//! The *core* crate is designed to be lightweight and to provide the essential
//! building blocks used across the Meridian workspace, including:
//!
//! - Time handling with nanosecond UNIX timestamps.
//! - UUID generation and management.
//! - Correctness validation functions.
//! - Datetime conversion utilities.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod correctness;
pub mod datetime;
pub mod nanos;
pub mod uuid;

pub use nanos::UnixNanos;
pub use uuid::UUID4;
