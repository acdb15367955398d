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

//! Fixture functions to provide stub account events for testing.

use meridian_core::{UUID4, UnixNanos};
use rstest::fixture;

use crate::{
    enums::AccountType,
    events::AccountState,
    identifiers::AccountId,
    types::{AccountBalance, Currency, Money},
};

/// Returns a reported cash account state with a USD balance.
#[fixture]
pub fn cash_account_state() -> AccountState {
    AccountState::new(
        AccountId::from("SIM-001"),
        AccountType::Cash,
        vec![AccountBalance::new(
            Money::from("1525000.00 USD"),
            Money::from("0.00 USD"),
            Money::from("1525000.00 USD"),
        )],
        vec![],
        true,
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
        Some(Currency::USD()),
    )
}

/// Returns a reported margin account state with a USD balance.
#[fixture]
pub fn margin_account_state() -> AccountState {
    AccountState::new(
        AccountId::from("SIM-001"),
        AccountType::Margin,
        vec![AccountBalance::new(
            Money::from("1525000.00 USD"),
            Money::from("0.00 USD"),
            Money::from("1525000.00 USD"),
        )],
        vec![],
        true,
        UUID4::new(),
        UnixNanos::default(),
        UnixNanos::default(),
        Some(Currency::USD()),
    )
}
